use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Deserialize;

/// Semantic type of a template field, declared once per mapping row.
///
/// Formatting is selected by this tag instead of guessing intent from the
/// shape of each value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text: underscores become spaces, all-lowercase phrases are
    /// title-cased.
    Text,
    /// ISO `YYYY-MM-DD` values reformatted to `DD-MM-YYYY`.
    Date,
    /// Monetary amount, passed through verbatim (words variants are
    /// derived separately).
    Currency,
    /// Opaque identifier (phone, email, PAN, pincode), never reformatted.
    Identifier,
    /// URL or storage path, never reformatted.
    Url,
}

/// One row of the FieldMapping table: dotted source path, template key,
/// semantic kind. Rows are evaluated in declared order and the first
/// successful resolution per key wins.
#[derive(Clone, Debug, Deserialize)]
pub struct MappingEntry {
    pub source: String,
    pub key: String,
    pub kind: FieldKind,
}

#[derive(Debug, Deserialize)]
struct MappingFile {
    #[allow(dead_code)]
    version: u32,
    mappings: Vec<MappingEntry>,
}

static FIELD_MAPPINGS: Lazy<MappingFile> = Lazy::new(|| {
    toml::from_str(include_str!("field_mappings.toml"))
        .expect("embedded field mapping table is valid TOML")
});

/// The immutable mapping table, loaded once from the embedded TOML.
pub fn field_mappings() -> &'static [MappingEntry] {
    &FIELD_MAPPINGS.mappings
}

/// Flat template-key → formatted-string table, built fresh per render.
#[derive(Clone, Debug, Default)]
pub struct FieldTable {
    values: HashMap<String, String>,
}

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// First-wins insert used while walking the mapping table. Returns
    /// false when the key was already resolved by an earlier row.
    pub fn insert_first(&mut self, key: &str, value: String) -> bool {
        if self.values.contains_key(key) {
            return false;
        }
        self.values.insert(key.to_string(), value);
        true
    }

    /// Unconditional set, used for derived fields and defaults.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// True when the key holds usable content: present, non-blank, and
    /// not a serialization sentinel. Drives `{{#if}}` evaluation.
    pub fn is_present(&self, key: &str) -> bool {
        match self.get(key) {
            Some(v) => {
                let t = v.trim();
                !t.is_empty() && t != "undefined" && t != "null"
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_parses_and_is_ordered() {
        let rows = field_mappings();
        assert!(!rows.is_empty());
        // Granular alias must precede its legacy fallback.
        let monthly = rows
            .iter()
            .position(|r| r.source == "rentalTerms.monthlyRent")
            .unwrap();
        let legacy = rows
            .iter()
            .position(|r| r.source == "rentalTerms.rentAmount")
            .unwrap();
        assert!(monthly < legacy);
        assert!(rows.iter().all(|r| !r.key.is_empty()));
    }

    #[test]
    fn first_wins_insert() {
        let mut t = FieldTable::new();
        assert!(t.insert_first("OWNER_NAME", "granular".into()));
        assert!(!t.insert_first("OWNER_NAME", "legacy".into()));
        assert_eq!(t.get("OWNER_NAME"), Some("granular"));
    }

    #[test]
    fn presence_rejects_sentinels() {
        let mut t = FieldTable::new();
        t.set("A", "yes");
        t.set("B", "   ");
        t.set("C", "undefined");
        t.set("D", "null");
        assert!(t.is_present("A"));
        assert!(!t.is_present("B"));
        assert!(!t.is_present("C"));
        assert!(!t.is_present("D"));
        assert!(!t.is_present("MISSING"));
    }
}
