//! Serde helpers for query strings and multipart text fields.
//!
//! Query strings and form fields arrive as strings. Numeric and boolean
//! filters are parsed from their string form here, and JSON numbers or
//! booleans are accepted too. Empty strings are treated as absent.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<StringOrNumber> = Option::deserialize(deserializer)?;
    match s {
        Some(StringOrNumber::Number(n)) => Ok(Some(n)),
        Some(StringOrNumber::String(s)) if s.trim().is_empty() => Ok(None),
        Some(StringOrNumber::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<StringOrBool> = Option::deserialize(deserializer)?;
    match s {
        Some(StringOrBool::Bool(b)) => Ok(Some(b)),
        Some(StringOrBool::String(s)) => parse_bool(&s).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Deserializes an optional string, mapping blank values to `None`.
pub fn deserialize_optional_trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Parses the boolean spellings HTML forms and query strings use.
pub fn parse_bool(value: &str) -> Result<Option<bool>, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        other => Err(format!("invalid boolean value '{}'", other)),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Number(i64),
    String(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrBool {
    Bool(bool),
    String(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Filters {
        #[serde(default, deserialize_with = "deserialize_optional_bool")]
        is_active: Option<bool>,
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        student_id: Option<Uuid>,
        #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
        search: Option<String>,
    }

    #[test]
    fn test_bool_from_string_and_bool() {
        let f: Filters = serde_json::from_value(json!({ "is_active": "true" })).unwrap();
        assert_eq!(f.is_active, Some(true));
        let f: Filters = serde_json::from_value(json!({ "is_active": false })).unwrap();
        assert_eq!(f.is_active, Some(false));
        let f: Filters = serde_json::from_value(json!({ "is_active": "" })).unwrap();
        assert_eq!(f.is_active, None);
        assert!(serde_json::from_value::<Filters>(json!({ "is_active": "maybe" })).is_err());
    }

    #[test]
    fn test_empty_uuid_is_none() {
        let f: Filters = serde_json::from_value(json!({ "student_id": "" })).unwrap();
        assert!(f.student_id.is_none());
        assert!(serde_json::from_value::<Filters>(json!({ "student_id": "nope" })).is_err());
    }

    #[test]
    fn test_trimmed_blank_is_none() {
        let f: Filters = serde_json::from_value(json!({ "search": "   " })).unwrap();
        assert!(f.search.is_none());
        let f: Filters = serde_json::from_value(json!({ "search": " Asha " })).unwrap();
        assert_eq!(f.search.as_deref(), Some("Asha"));
    }
}
