//! Field Mapper: flattens an `AgreementRecord` into the template field
//! table, applying kind-driven formatting, derived fields and defaults.

use chrono::{Datelike, Local};

use crate::fields::{FieldKind, FieldTable, field_mappings};
use crate::locale;
use crate::record::{AgreementRecord, Language};

const MAINTENANCE_INCLUDED_CLAUSE: &str =
    "The monthly rent is inclusive of maintenance charges for the premises.";
const MAINTENANCE_EXCLUDED_CLAUSE: &str =
    "Maintenance charges are not included in the rent and shall be paid separately by the Tenant.";
const NO_CLAUSES_SENTENCE: &str = "No additional clauses have been agreed upon by the parties.";

/// Build the flat field table for one agreement.
///
/// Walks the mapping table in declared order with first-wins precedence,
/// then computes derived fields and fills defaults. Never fails; absent or
/// malformed source data degrades to omitted fields or zero amounts.
pub fn build_fields(record: &AgreementRecord) -> FieldTable {
    let language = record.language();
    let mut fields = FieldTable::new();

    for entry in field_mappings() {
        let Some(raw) = record.path_str(&entry.source) else {
            continue;
        };
        let formatted = format_value(&raw, entry.kind, language);
        if !fields.insert_first(&entry.key, formatted) {
            log::debug!("field {} already resolved, skipping {}", entry.key, entry.source);
        }
    }

    // Defaults first, so words variants cover defaulted terms too.
    apply_defaults(&mut fields);
    derive_amount_words(&mut fields);
    derive_clauses(record, &mut fields);
    derive_maintenance(&mut fields);
    derive_purpose_flag(&mut fields);
    if language == Language::Gujarati {
        derive_gujarati_fields(record, &mut fields);
    }

    log::debug!("mapped {} template fields", fields.len());
    fields
}

fn format_value(raw: &str, kind: FieldKind, language: Language) -> String {
    match kind {
        FieldKind::Date => {
            let dmy = locale::format_date_dmy(raw);
            if language == Language::Gujarati {
                locale::to_gujarati_numerals(&dmy)
            } else {
                dmy
            }
        }
        FieldKind::Text => format_text(raw),
        FieldKind::Currency | FieldKind::Identifier | FieldKind::Url => raw.to_string(),
    }
}

fn looks_like_url(value: &str) -> bool {
    value.contains("://") || value.starts_with("/uploads/") || value.starts_with("www.")
}

/// Underscore-separated and all-lowercase values are stored-form noise
/// (`semi_furnished`, `commercial use`); present them title-cased.
fn format_text(value: &str) -> String {
    if looks_like_url(value) {
        return value.to_string();
    }
    let has_underscore = value.contains('_');
    let is_lowercase_prose = value.chars().any(|c| c.is_alphabetic())
        && !value.chars().any(|c| c.is_uppercase());
    if !has_underscore && !is_lowercase_prose {
        return value.to_string();
    }
    value
        .replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Currency strings arrive in assorted shapes ("15000", "15,000", "Rs. 15000").
/// Malformed input converts as zero.
fn parse_amount(value: &str) -> u64 {
    // Skip any currency prefix ("Rs. ", "₹") so its dot does not become
    // a decimal point, then strip grouping separators from the number.
    let Some(first_digit) = value.find(|c: char| c.is_ascii_digit()) else {
        return 0;
    };
    let cleaned: String = value[first_digit..]
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().map(|v| v.max(0.0) as u64).unwrap_or(0)
}

fn derive_amount_words(fields: &mut FieldTable) {
    for (source_key, words_key) in [
        ("RENT_AMOUNT", "RENT_AMOUNT_WORDS"),
        ("SECURITY_DEPOSIT", "SECURITY_DEPOSIT_WORDS"),
        ("NOTICE_PERIOD", "NOTICE_PERIOD_WORDS"),
    ] {
        let Some(value) = fields.get(source_key).map(str::to_string) else {
            continue;
        };
        let n = parse_amount(&value);
        fields.set(words_key, locale::number_to_words(n));
        fields.set(
            format!("{words_key}_GUJARATI").as_str(),
            locale::number_to_gujarati_words(n),
        );
    }
}

fn derive_clauses(record: &AgreementRecord, fields: &mut FieldTable) {
    let clauses = record.additional_clauses();
    let rendered = if clauses.is_empty() {
        NO_CLAUSES_SENTENCE.to_string()
    } else {
        clauses
            .iter()
            .enumerate()
            .map(|(i, clause)| format!("{}. {}", i + 1, clause))
            .collect::<Vec<_>>()
            .join("<br/>")
    };
    fields.set("ADDITIONAL_CLAUSES", rendered);
}

/// Exactly one of the two maintenance clause fields is set, so templates
/// can gate either clause with `{{#if}}`. Unset charge defaults to excluded.
fn derive_maintenance(fields: &mut FieldTable) {
    let charge = fields
        .get("MAINTENANCE_CHARGE")
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default();
    if charge == "included" || charge == "included in rent" {
        fields.set("MAINTENANCE_INCLUSION", MAINTENANCE_INCLUDED_CLAUSE);
    } else {
        fields.set("MAINTENANCE_EXCLUSION", MAINTENANCE_EXCLUDED_CLAUSE);
    }
}

/// Set only when the purpose is commercial; drives the GST clause.
fn derive_purpose_flag(fields: &mut FieldTable) {
    let commercial = fields
        .get("PROPERTY_PURPOSE")
        .is_some_and(|p| p.to_ascii_lowercase().contains("commercial"));
    if commercial {
        fields.set("PROPERTY_PURPOSE_COMMERCIAL", "true");
    }
}

fn apply_defaults(fields: &mut FieldTable) {
    fields.insert_first("TENURE", "11 Month".to_string());
    fields.insert_first("NOTICE_PERIOD", "2 month".to_string());
    fields.insert_first("MINIMUM_STAY", "11 months".to_string());
    // Mapping rows already tried agreementDate then createdAt.
    fields.insert_first("AGREEMENT_DATE", locale::today_en_gb());
}

fn first_source(record: &AgreementRecord, sources: &[&str]) -> Option<String> {
    sources.iter().find_map(|s| record.path_str(s))
}

fn derive_gujarati_fields(record: &AgreementRecord, fields: &mut FieldTable) {
    if let Some(purpose) = fields.get("PROPERTY_PURPOSE") {
        let translated = match purpose.to_ascii_lowercase().as_str() {
            "residential" => "રહેણાંક".to_string(),
            "commercial" => "વાણિજ્યિક".to_string(),
            other => locale::to_gujarati_numerals(other),
        };
        fields.set("PROPERTY_PURPOSE_GUJARATI", translated);
    }

    let today = Local::now().date_naive();
    fields.set("CURRENT_DAY", locale::current_gujarati_weekday());
    fields.set("CURRENT_DATE", locale::to_gujarati_numerals(&today.day().to_string()));
    fields.set("CURRENT_MONTH", locale::current_gujarati_month());
    fields.set("CURRENT_YEAR", locale::to_gujarati_numerals(&today.year().to_string()));

    let start = first_source(record, &["rentalTerms.startDate", "rentalTerms.agreementStartDate"]);
    let end = first_source(record, &["rentalTerms.endDate", "rentalTerms.agreementEndDate"]);
    if let Some(start) = &start {
        fields.set("START_DATE_GUJARATI", locale::format_gujarati_date(start));
    }
    if let Some(end) = &end {
        fields.set("END_DATE_GUJARATI", locale::format_gujarati_date(end));
    }
    if let (Some(start), Some(end)) = (&start, &end)
        && let Some(months) = locale::months_between(start, end)
    {
        fields.set(
            "AGREEMENT_DURATION",
            format!("{} મહિના", locale::to_gujarati_numerals(&months.to_string())),
        );
    }

    let address_parts: Vec<String> = [
        "propertyDetails.flatNo",
        "propertyDetails.buildingName",
        "propertyDetails.street",
        "propertyDetails.area",
        "propertyDetails.city",
        "propertyDetails.state",
        "propertyDetails.pincode",
    ]
    .iter()
    .filter_map(|s| record.path_str(s))
    .map(|part| locale::to_gujarati_numerals(&part))
    .collect();
    if !address_parts.is_empty() {
        fields.set("PROPERTY_FULL_ADDRESS", address_parts.join(", "));
    }
}
