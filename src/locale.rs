//! Locale-aware prose and numeral generation.
//!
//! Pure functions with no shared state. Malformed input degrades to a
//! pass-through of the original text; nothing here may abort a render.

use chrono::{Datelike, Local, NaiveDate};

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

// Gujarati lexicon. Values 20-99 compose from the tens and ones tables.
const GUJ_ONES: [&str; 20] = [
    "", "એક", "બે", "ત્રણ", "ચાર", "પાંચ", "છ", "સાત", "આઠ", "નવ", "દસ", "અગિયાર", "બાર", "તેર",
    "ચૌદ", "પંદર", "સોળ", "સત્તર", "અઢાર", "ઓગણીસ",
];

const GUJ_TENS: [&str; 10] = [
    "", "", "વીસ", "ત્રીસ", "ચાલીસ", "પચાસ", "સાઠ", "સિત્તેર", "એંસી", "નેવું",
];

const GUJ_DIGITS: [char; 10] = ['૦', '૧', '૨', '૩', '૪', '૫', '૬', '૭', '૮', '૯'];

const GUJ_MONTHS: [&str; 12] = [
    "જાન્યુઆરી", "ફેબ્રુઆરી", "માર્ચ", "એપ્રિલ", "મે", "જૂન", "જુલાઈ", "ઓગસ્ટ", "સપ્ટેમ્બર",
    "ઓક્ટોબર", "નવેમ્બર", "ડિસેમ્બર",
];

// Indexed by chrono's days-from-Sunday.
const GUJ_WEEKDAYS: [&str; 7] = [
    "રવિવાર", "સોમવાર", "મંગળવાર", "બુધવાર", "ગુરુવાર", "શુક્રવાર", "શનિવાર",
];

fn below_hundred(n: u64) -> String {
    debug_assert!(n < 100);
    if n < 20 {
        ONES[n as usize].to_string()
    } else if n % 10 == 0 {
        TENS[(n / 10) as usize].to_string()
    } else {
        format!("{} {}", TENS[(n / 10) as usize], ONES[(n % 10) as usize])
    }
}

fn below_thousand(n: u64) -> String {
    debug_assert!(n < 1000);
    if n < 100 {
        below_hundred(n)
    } else if n % 100 == 0 {
        format!("{} Hundred", ONES[(n / 100) as usize])
    } else {
        format!("{} Hundred {}", ONES[(n / 100) as usize], below_hundred(n % 100))
    }
}

/// English number-to-words with Indian grouping (thousand / lakh / crore).
/// Inputs are currency amounts, always non-negative integers.
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return "Zero".to_string();
    }
    let mut parts: Vec<String> = Vec::new();
    let crore = n / 10_000_000;
    let lakh = (n / 100_000) % 100;
    let thousand = (n / 1_000) % 100;
    let rest = n % 1_000;
    if crore > 0 {
        parts.push(format!("{} Crore", number_to_words(crore)));
    }
    if lakh > 0 {
        parts.push(format!("{} Lakh", below_hundred(lakh)));
    }
    if thousand > 0 {
        parts.push(format!("{} Thousand", below_hundred(thousand)));
    }
    if rest > 0 {
        parts.push(below_thousand(rest));
    }
    parts.join(" ")
}

fn guj_below_hundred(n: u64) -> String {
    debug_assert!(n < 100);
    if n < 20 {
        GUJ_ONES[n as usize].to_string()
    } else if n % 10 == 0 {
        GUJ_TENS[(n / 10) as usize].to_string()
    } else {
        format!("{} {}", GUJ_TENS[(n / 10) as usize], GUJ_ONES[(n % 10) as usize])
    }
}

fn guj_below_thousand(n: u64) -> String {
    debug_assert!(n < 1000);
    if n < 100 {
        guj_below_hundred(n)
    } else if n % 100 == 0 {
        format!("{} સો", GUJ_ONES[(n / 100) as usize])
    } else {
        format!("{} સો {}", GUJ_ONES[(n / 100) as usize], guj_below_hundred(n % 100))
    }
}

/// Gujarati number-to-words over the same thousand/lakh/crore breakpoints.
///
/// The closing word "પૂરા" is appended only at crore scale. The English
/// function never appends one; the asymmetry is deliberate.
pub fn number_to_gujarati_words(n: u64) -> String {
    if n == 0 {
        return "શૂન્ય".to_string();
    }
    let mut parts: Vec<String> = Vec::new();
    let crore = n / 10_000_000;
    let lakh = (n / 100_000) % 100;
    let thousand = (n / 1_000) % 100;
    let rest = n % 1_000;
    if crore > 0 {
        parts.push(format!("{} કરોડ", number_to_gujarati_words(crore)));
    }
    if lakh > 0 {
        parts.push(format!("{} લાખ", guj_below_hundred(lakh)));
    }
    if thousand > 0 {
        parts.push(format!("{} હજાર", guj_below_hundred(thousand)));
    }
    if rest > 0 {
        parts.push(guj_below_thousand(rest));
    }
    let mut out = parts.join(" ");
    if crore > 0 {
        out.push_str(" પૂરા");
    }
    out
}

/// Digit-by-digit transliteration into Gujarati numerals; everything that
/// is not an ASCII digit passes through unchanged.
pub fn to_gujarati_numerals(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => GUJ_DIGITS[d as usize],
            _ => c,
        })
        .collect()
}

/// `"2025-03-05"` → `"૫મી માર્ચ ૨૦૨૫"`. Invalid input is returned as-is.
pub fn format_gujarati_date(iso: &str) -> String {
    let Ok(date) = NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d") else {
        return iso.to_string();
    };
    format!(
        "{}મી {} {}",
        to_gujarati_numerals(&date.day().to_string()),
        GUJ_MONTHS[date.month0() as usize],
        to_gujarati_numerals(&date.year().to_string()),
    )
}

/// `"2025-03-05"` → `"05-03-2025"`. Invalid input is returned as-is.
pub fn format_date_dmy(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%d-%m-%Y").to_string(),
        Err(_) => iso.to_string(),
    }
}

/// Today's date in en-GB order, `DD/MM/YYYY`.
pub fn today_en_gb() -> String {
    Local::now().date_naive().format("%d/%m/%Y").to_string()
}

/// Gujarati name of the current weekday (week starts on Sunday).
pub fn current_gujarati_weekday() -> String {
    let idx = Local::now().date_naive().weekday().num_days_from_sunday();
    GUJ_WEEKDAYS[idx as usize].to_string()
}

/// Gujarati month name for the current month.
pub fn current_gujarati_month() -> String {
    GUJ_MONTHS[Local::now().date_naive().month0() as usize].to_string()
}

/// Whole months between two ISO dates, rounded to the nearest month.
/// Returns `None` when either date does not parse.
pub fn months_between(start_iso: &str, end_iso: &str) -> Option<i64> {
    let start = NaiveDate::parse_from_str(start_iso.trim(), "%Y-%m-%d").ok()?;
    let end = NaiveDate::parse_from_str(end_iso.trim(), "%Y-%m-%d").ok()?;
    let days = (end - start).num_days() as f64;
    Some((days / 30.44).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn english_boundaries() {
        assert_eq!(number_to_words(0), "Zero");
        assert_eq!(number_to_words(19), "Nineteen");
        assert_eq!(number_to_words(100), "One Hundred");
        assert_eq!(number_to_words(1000), "One Thousand");
        assert_eq!(number_to_words(100_000), "One Lakh");
        assert_eq!(number_to_words(10_000_000), "One Crore");
    }

    #[test]
    fn english_composition() {
        assert_eq!(number_to_words(15_000), "Fifteen Thousand");
        assert_eq!(number_to_words(21), "Twenty One");
        assert_eq!(number_to_words(550), "Five Hundred Fifty");
        assert_eq!(
            number_to_words(12_34_567),
            "Twelve Lakh Thirty Four Thousand Five Hundred Sixty Seven"
        );
    }

    #[test]
    fn gujarati_crore_closing_word_only_at_crore_scale() {
        assert!(!number_to_gujarati_words(15_000).contains("પૂરા"));
        assert!(number_to_gujarati_words(10_000_000).ends_with("પૂરા"));
        assert_eq!(number_to_gujarati_words(0), "શૂન્ય");
        assert_eq!(number_to_gujarati_words(15_000), "પંદર હજાર");
    }

    #[test]
    fn numeral_transliteration() {
        assert_eq!(to_gujarati_numerals("2025"), "૨૦૨૫");
        assert_eq!(to_gujarati_numerals("05-03-2025"), "૦૫-૦૩-૨૦૨૫");
        assert_eq!(to_gujarati_numerals("રૂ. 500"), "રૂ. ૫૦૦");
    }

    #[test]
    fn gujarati_date_formatting() {
        assert_eq!(format_gujarati_date("2025-03-05"), "૫મી માર્ચ ૨૦૨૫");
        assert_eq!(format_gujarati_date("not-a-date"), "not-a-date");
    }

    #[test]
    fn dmy_reformatting() {
        assert_eq!(format_date_dmy("2025-03-05"), "05-03-2025");
        assert_eq!(format_date_dmy("garbage"), "garbage");
    }

    #[test]
    fn month_arithmetic() {
        assert_eq!(months_between("2025-01-01", "2025-12-01"), Some(11));
        assert_eq!(months_between("2025-01-01", "2026-01-01"), Some(12));
        assert_eq!(months_between("bad", "2026-01-01"), None);
    }
}
