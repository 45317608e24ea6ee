//! Keyed CMS blocks (home page banner, about text, principal's message, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub id: Uuid,
    pub key: String,
    pub title: String,
    pub body: String,
    #[schema(value_type = Object)]
    pub metadata: Json<Value>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentDto {
    #[validate(length(min = 1, max = 100), custom(function = "validate_key"))]
    pub key: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[validate(custom(function = "validate_metadata"))]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<Value>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub body: Option<String>,
    #[validate(custom(function = "validate_metadata"))]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<Value>,
    pub is_active: Option<bool>,
}

/// Keys are lowercase slugs: letters, digits, `-` and `_`.
fn validate_key(key: &str) -> Result<(), ValidationError> {
    if key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        Ok(())
    } else {
        Err(ValidationError::new("key")
            .with_message("key may only contain lowercase letters, digits, '-' and '_'".into()))
    }
}

fn validate_metadata(metadata: &Value) -> Result<(), ValidationError> {
    if metadata.is_object() {
        Ok(())
    } else {
        Err(ValidationError::new("metadata").with_message("metadata must be an object".into()))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContentPayload {
    pub content: ContentBlock,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContentList {
    pub count: i64,
    pub contents: Vec<ContentBlock>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_validation() {
        assert!(validate_key("home-banner").is_ok());
        assert!(validate_key("about_us_2").is_ok());
        assert!(validate_key("Home Banner").is_err());
    }

    #[test]
    fn test_metadata_must_be_object() {
        let dto: CreateContentDto = serde_json::from_value(json!({
            "key": "home-banner",
            "title": "Welcome",
            "metadata": [1, 2]
        }))
        .unwrap();
        assert!(dto.validate().is_err());

        let dto: CreateContentDto = serde_json::from_value(json!({
            "key": "home-banner",
            "title": "Welcome",
            "metadata": { "image": "banner.png" }
        }))
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.body, "");
    }
}
