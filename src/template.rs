//! Placeholder and conditional-block resolution for document templates.
//!
//! Three passes, in a fixed order: conditionals, substitution, cleanup.
//! Conditionals run first so the `{{#if}}` test sees the field value, not
//! already-substituted template text. The cleanup pass strips whatever
//! tokens remain, so no `{{...}}` syntax can leak into output.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fields::FieldTable;

// Non-nested blocks, narrowest span.
static CONDITIONAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{#if\s+([A-Za-z0-9_]+)\s*\}\}([\s\S]*?)\{\{/if\}\}").unwrap()
});

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").unwrap());

static LEFTOVER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{[^}]*\}\}").unwrap());

/// Render a template against a resolved field table.
pub fn render(template: &str, fields: &FieldTable) -> String {
    let conditioned = resolve_conditionals(template, fields);
    let substituted = substitute(&conditioned, fields);
    LEFTOVER.replace_all(&substituted, "").into_owned()
}

/// Keep or drop `{{#if KEY}}...{{/if}}` blocks. A block survives when the
/// key holds a present, non-blank, non-sentinel value. Unbalanced block
/// syntax is left alone here; the cleanup pass strips the stray tokens.
fn resolve_conditionals(template: &str, fields: &FieldTable) -> String {
    CONDITIONAL
        .replace_all(template, |caps: &regex::Captures| {
            if fields.is_present(&caps[1]) {
                caps[2].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

fn substitute(template: &str, fields: &FieldTable) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            fields.get(&caps[1]).unwrap_or("").to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(pairs: &[(&str, &str)]) -> FieldTable {
        let mut t = FieldTable::new();
        for (k, v) in pairs {
            t.set(k, *v);
        }
        t
    }

    #[test]
    fn substitutes_all_occurrences() {
        let fields = table(&[("OWNER_NAME", "Ramesh Patel")]);
        let out = render("{{OWNER_NAME}} signs. Witness for {{OWNER_NAME}}.", &fields);
        assert_eq!(out, "Ramesh Patel signs. Witness for Ramesh Patel.");
    }

    #[test]
    fn conditional_kept_when_present() {
        let fields = table(&[("X", "yes")]);
        assert_eq!(render("{{#if X}}A{{/if}}", &fields), "A");
    }

    #[test]
    fn conditional_dropped_for_absent_empty_and_sentinels() {
        for fields in [
            table(&[]),
            table(&[("X", "")]),
            table(&[("X", "   ")]),
            table(&[("X", "undefined")]),
            table(&[("X", "null")]),
        ] {
            assert_eq!(render("{{#if X}}A{{/if}}", &fields), "");
        }
    }

    #[test]
    fn conditionals_evaluate_before_substitution() {
        // The block body references the same key the condition tests.
        let fields = table(&[("GST", "applies")]);
        assert_eq!(render("{{#if GST}}GST: {{GST}}{{/if}}", &fields), "GST: applies");
    }

    #[test]
    fn unresolved_placeholders_are_stripped() {
        let fields = table(&[("A", "1")]);
        let out = render("{{A}} {{MISSING}} {{weird token}}", &fields);
        assert_eq!(out, "1  ");
        assert!(!out.contains("{{"));
    }

    #[test]
    fn unbalanced_conditional_degrades_to_cleanup() {
        let fields = table(&[("X", "yes")]);
        let out = render("before {{#if X}}never closed", &fields);
        assert_eq!(out, "before never closed");
    }

    #[test]
    fn substitution_is_idempotent_on_resolved_output() {
        let fields = table(&[("A", "alpha"), ("B", "beta")]);
        let once = render("{{#if A}}{{A}}{{/if}} and {{B}} and {{C}}", &fields);
        let twice = render(&once, &fields);
        assert_eq!(once, twice);
    }

    #[test]
    fn no_leak_invariant() {
        let fields = table(&[("PARTIAL", "x")]);
        let out = render(
            "{{PARTIAL}} {{UNKNOWN}} {{#if NOPE}}hidden {{INNER}}{{/if}} {{}}",
            &fields,
        );
        assert!(!LEFTOVER.is_match(&out), "leftover token in {out:?}");
    }
}
