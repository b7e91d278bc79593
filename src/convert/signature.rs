//! Signature-section normalization, run over the raw HTML before table
//! scanning.
//!
//! Templates author explicit structural markers for signing parties:
//!
//! ```html
//! <div data-region="signature" data-name="Ramesh Patel" data-role="Landlord"></div>
//! <div data-region="witnesses"></div>
//! ```
//!
//! Each signature marker is rewritten into the standard two-column table
//! (signature line, name and role on the left, photo placeholder on the
//! right). A legacy fallback still recognizes free-floating
//! underscore/name/role paragraphs followed by a "Passport Size Photo"
//! marker, so older templates keep working. Either way a (name, role)
//! seen-set guarantees one table per party even when a block matches more
//! than one detection pattern.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

pub const PHOTO_PLACEHOLDER: &str = "Passport Size Photo";
pub const SIGNATURE_RULE: &str = "____________________";

static SIGNATURE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<div[^>]*data-region="signature"[^>]*>.*?</div>"#,
    )
    .unwrap()
});

static PHOTO_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<div[^>]*data-region="photo"[^>]*>.*?</div>"#).unwrap()
});

static WITNESSES_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<div[^>]*data-region="witnesses"[^>]*>.*?</div>"#).unwrap()
});

static DATA_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"data-name="([^"]*)""#).unwrap());
static DATA_ROLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"data-role="([^"]*)""#).unwrap());

// Legacy shape: <p> ____ <br> Name <br> (Landlord) </p> with an optional
// trailing photo-placeholder paragraph.
static LEGACY_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)<p[^>]*>\s*_{4,}\s*<br\s*/?>\s*([^<]+?)\s*<br\s*/?>\s*\(?\s*(landlord|tenant|owner|lessor|lessee)\s*\)?\s*</p>(?:\s*<p[^>]*>\s*Passport\s+Size\s+Photo\s*</p>)?",
    )
    .unwrap()
});

/// Rewrite all recognized signature regions into the standard layout.
pub fn normalize(html: &str) -> String {
    let mut seen: HashSet<(String, String)> = HashSet::new();

    let out = SIGNATURE_MARKER.replace_all(html, |caps: &regex::Captures| {
        let tag = caps.get(0).map(|m| m.as_str()).unwrap_or("");
        let name = DATA_NAME
            .captures(tag)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default();
        let role = DATA_ROLE
            .captures(tag)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default();
        if !seen.insert((name.to_lowercase(), role.to_lowercase())) {
            return String::new();
        }
        signature_table(&name, &role)
    });

    let out = LEGACY_BLOCK.replace_all(&out, |caps: &regex::Captures| {
        let name = caps[1].trim().to_string();
        let role = title_case_role(caps[2].trim());
        if !seen.insert((name.to_lowercase(), role.to_lowercase())) {
            return String::new();
        }
        signature_table(&name, &role)
    });

    // Stray photo markers become plain placeholder paragraphs.
    let out = PHOTO_MARKER.replace_all(&out, format!("<p>{PHOTO_PLACEHOLDER}</p>").as_str());

    let converted_any = !seen.is_empty();
    let mut out = WITNESSES_MARKER.replace_all(&out, witnesses_block()).into_owned();
    // Legacy templates carry no witnesses marker; append the block after
    // the converted signature sections.
    if converted_any && !out.contains("WITNESSES") {
        out.push_str(&witnesses_block());
    }
    out
}

fn title_case_role(role: &str) -> String {
    let lower = role.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => lower,
    }
}

fn signature_table(name: &str, role: &str) -> String {
    format!(
        "<table class=\"signature-table\" style=\"width: 100%;\"><tr>\
         <td><p>{SIGNATURE_RULE}</p><p><strong>{name}</strong></p><p>{role}</p></td>\
         <td><p>{PHOTO_PLACEHOLDER}</p></td>\
         </tr></table>"
    )
}

fn witnesses_block() -> String {
    format!(
        "<p><strong>WITNESSES:</strong></p>\
         <p>1. {SIGNATURE_RULE}</p>\
         <p>2. {SIGNATURE_RULE}</p>"
    )
}
