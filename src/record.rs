use serde::Deserialize;
use serde_json::Value;

/// Document language requested by the CRUD layer.
///
/// Only Gujarati currently has dedicated localization logic; the other
/// languages render with English-style formatting and get their fonts
/// switched by the non-core rendering layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Hindi,
    Gujarati,
    Tamil,
    Marathi,
}

impl Language {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hindi" => Language::Hindi,
            "gujarati" => Language::Gujarati,
            "tamil" => Language::Tamil,
            "marathi" => Language::Marathi,
            _ => Language::English,
        }
    }
}

/// A rental agreement as handed over by the CRUD layer.
///
/// Nested JSON with `ownerDetails`, `tenantDetails`, `propertyDetails`,
/// `rentalTerms` sections plus top-level scalars. Read-only to this crate.
#[derive(Clone, Debug)]
pub struct AgreementRecord(Value);

impl AgreementRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    /// Dotted-path lookup, e.g. `"rentalTerms.monthlyRent"`.
    /// Missing intermediate keys resolve to `None`; array indices are not
    /// part of the path syntax (arrays are handled by the mapper).
    pub fn path(&self, dotted: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for seg in dotted.split('.') {
            cur = cur.as_object()?.get(seg)?;
        }
        if cur.is_null() { None } else { Some(cur) }
    }

    /// Path lookup rendered as a plain string, or `None` when the value
    /// is absent, null, or an unusable shape.
    ///
    /// Arrays resolve to their first element; objects carrying a `url`
    /// member resolve to it; any other object is skipped.
    pub fn path_str(&self, dotted: &str) -> Option<String> {
        let mut value = self.path(dotted)?;
        if let Value::Array(items) = value {
            value = items.first()?;
        }
        if let Value::Object(map) = value {
            value = map.get("url")?;
        }
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => {
                log::debug!("skipping non-scalar value at {dotted}");
                None
            }
        }
    }

    pub fn language(&self) -> Language {
        self.path_str("language")
            .map(|s| Language::parse(&s))
            .unwrap_or(Language::English)
    }

    /// Ordered additional clauses, empty when absent.
    pub fn additional_clauses(&self) -> Vec<String> {
        match self.path("additionalClauses") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }
}
