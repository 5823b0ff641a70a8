//! Loosely-typed entry shapes as they appear in a normalized source document.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A tag reference: bare text, or `[text, importance]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTag {
    Plain(#[serde(deserialize_with = "scalar_text")] String),
    Weighted(#[serde(deserialize_with = "scalar_text")] String, i64),
}

/// A description: bare text, or text with tags and importance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawDescription {
    Plain(String),
    Detailed {
        #[serde(deserialize_with = "scalar_text")]
        text: String,
        #[serde(default)]
        tags: Vec<RawTag>,
        #[serde(default)]
        importance: Option<i64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawJob {
    #[serde(deserialize_with = "scalar_text")]
    pub company: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub title: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub time: String,
    #[serde(default)]
    pub importance: Option<i64>,
    /// Decoded item by item so one bad tag does not drop the entity.
    #[serde(default, deserialize_with = "item_list")]
    pub tags: Vec<Value>,
    #[serde(default, deserialize_with = "item_list")]
    pub descs: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCompanyProject {
    #[serde(deserialize_with = "scalar_text")]
    pub company_project: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub importance: Option<i64>,
    /// Decoded item by item so one bad tag does not drop the entity.
    #[serde(default, deserialize_with = "item_list")]
    pub tags: Vec<Value>,
    #[serde(default, deserialize_with = "item_list")]
    pub descs: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPersonalProject {
    #[serde(deserialize_with = "scalar_text")]
    pub personal_project: String,
    #[serde(default)]
    pub importance: Option<i64>,
    /// Decoded item by item so one bad tag does not drop the entity.
    #[serde(default, deserialize_with = "item_list")]
    pub tags: Vec<Value>,
    #[serde(default, deserialize_with = "item_list")]
    pub descs: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEducation {
    #[serde(deserialize_with = "scalar_text")]
    pub education: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub location: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub degree: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub majors: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub minors: Vec<String>,
    // `GPA` normalizes to `gPA`.
    #[serde(default, alias = "gPA", deserialize_with = "scalar_text")]
    pub gpa: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub accolades: Vec<String>,
    #[serde(default)]
    pub importance: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTagDeclaration {
    #[serde(deserialize_with = "scalar_text")]
    pub tag: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMeta {
    pub meta: Map<String, Value>,
}

/// Renders a scalar (string, number, bool) as text. `null` becomes empty.
pub fn scalar_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_text(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected text, found {value}")))
}

/// A list of still-undecoded items. A lone value is a list of one.
fn item_list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    })
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                scalar_to_text(item)
                    .ok_or_else(|| serde::de::Error::custom(format!("expected text, found {item}")))
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => scalar_to_text(&other)
            .map(|text| vec![text])
            .ok_or_else(|| serde::de::Error::custom(format!("expected text, found {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_shapes() {
        let tags: Vec<RawTag> = serde_json::from_value(json!(["Rust", ["Go", 80]])).unwrap();
        assert_eq!(
            tags,
            vec![
                RawTag::Plain("Rust".to_string()),
                RawTag::Weighted("Go".to_string(), 80)
            ]
        );
    }

    #[test]
    fn test_description_shapes() {
        let descs: Vec<RawDescription> = serde_json::from_value(json!([
            "Plain text",
            { "text": "Tagged", "tags": ["Rust"], "importance": 70 }
        ]))
        .unwrap();
        assert_eq!(descs[0], RawDescription::Plain("Plain text".to_string()));
        match &descs[1] {
            RawDescription::Detailed {
                text,
                tags,
                importance,
            } => {
                assert_eq!(text, "Tagged");
                assert_eq!(tags.len(), 1);
                assert_eq!(*importance, Some(70));
            }
            other => panic!("expected detailed description, got {other:?}"),
        }
    }

    #[test]
    fn test_education_accepts_numeric_gpa_and_single_major() {
        let edu: RawEducation = serde_json::from_value(json!({
            "education": "State University",
            "gPA": 3.9,
            "majors": "Computer Science"
        }))
        .unwrap();
        assert_eq!(edu.gpa, "3.9");
        assert_eq!(edu.majors, vec!["Computer Science"]);
        assert!(edu.minors.is_empty());
    }

    #[test]
    fn test_numeric_tag_text() {
        let tags: Vec<RawTag> = serde_json::from_value(json!([8, [2024, 60]])).unwrap();
        assert_eq!(
            tags,
            vec![
                RawTag::Plain("8".to_string()),
                RawTag::Weighted("2024".to_string(), 60)
            ]
        );
    }

    #[test]
    fn test_entity_lists_are_kept_undecoded() {
        let job: RawJob = serde_json::from_value(json!({
            "company": "Acme",
            "tags": ["Java", ["Go", 7.5], { "odd": true }],
            "descs": "Single description"
        }))
        .unwrap();
        assert_eq!(job.tags.len(), 3, "bad items survive until decoded one by one");
        assert_eq!(job.descs, vec![json!("Single description")]);
    }

    #[test]
    fn test_job_numeric_time() {
        let job: RawJob = serde_json::from_value(json!({ "company": "Acme", "time": 2019 })).unwrap();
        assert_eq!(job.time, "2019");
        assert!(job.tags.is_empty());
    }
}
