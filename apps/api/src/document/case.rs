//! Field-name normalization for source documents.
//!
//! Documents are written with human-friendly keys (`Company Project`,
//! `LinkedIn`, `Descs`); the parser only understands camelCase.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static WORD_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^\w|[A-Z]|\b\w)").expect("valid word start regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Lowercases the first character, uppercases every later word start or
/// capital, then drops whitespace: `Company Project` → `companyProject`.
pub fn to_camel_case(key: &str) -> String {
    let cased = WORD_START_RE.replace_all(key, |caps: &regex::Captures| {
        let Some(m) = caps.get(0) else {
            return String::new();
        };
        if m.start() == 0 {
            m.as_str().to_lowercase()
        } else {
            m.as_str().to_uppercase()
        }
    });
    WHITESPACE_RE.replace_all(&cased, "").into_owned()
}

/// Rewrites every object key in `value`, recursing through arrays and objects.
/// Values themselves are left untouched. When two keys collapse to the same
/// name the later one wins.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut normalized = Map::with_capacity(map.len());
            for (key, inner) in map {
                normalized.insert(to_camel_case(&key), normalize_keys(inner));
            }
            Value::Object(normalized)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multi_word_key() {
        assert_eq!(to_camel_case("Company Project"), "companyProject");
        assert_eq!(to_camel_case("Personal Project"), "personalProject");
    }

    #[test]
    fn test_capitalised_words() {
        assert_eq!(to_camel_case("LinkedIn"), "linkedIn");
        assert_eq!(to_camel_case("GitHub"), "gitHub");
        assert_eq!(to_camel_case("Descs"), "descs");
    }

    #[test]
    fn test_acronym_keeps_trailing_capitals() {
        assert_eq!(to_camel_case("GPA"), "gPA");
    }

    #[test]
    fn test_already_camel_case_is_stable() {
        assert_eq!(to_camel_case("companyProject"), "companyProject");
        assert_eq!(to_camel_case("tags"), "tags");
    }

    #[test]
    fn test_normalize_recurses_but_keeps_values() {
        let raw = json!([
            { "Company": "Acme Corp", "Descs": [{ "Text": "Built *things*", "Tags": ["Rust"] }] },
            { "Meta": { "LinkedIn": "linkedin.com/in/someone" } }
        ]);
        let normalized = normalize_keys(raw);
        assert_eq!(normalized[0]["company"], "Acme Corp");
        assert_eq!(normalized[0]["descs"][0]["text"], "Built *things*");
        assert_eq!(normalized[0]["descs"][0]["tags"][0], "Rust");
        assert_eq!(normalized[1]["meta"]["linkedIn"], "linkedin.com/in/someone");
    }
}
