//! Postal address shared by admissions and students.
//!
//! Multipart submissions may carry the address in two shapes:
//!
//! - a structured `address` field holding a JSON object
//!   (`{"street": "...", "city": "...", "state": "...", "pincode": "..."}`)
//! - flattened `address.street`, `address.city`, `address.state` and
//!   `address.pincode` fields
//!
//! [`parse_address`] reads the structured object first and lets the flattened
//! fields fill any subfield it lacks. All four subfields are required.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::form::{FormError, FormFields};

pub const ADDRESS_FIELDS: [&str; 4] = ["street", "city", "state", "pincode"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema, Validate)]
pub struct Address {
    #[sqlx(rename = "address_street")]
    #[validate(length(min = 1, max = 255))]
    pub street: String,
    #[sqlx(rename = "address_city")]
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[sqlx(rename = "address_state")]
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[sqlx(rename = "address_pincode")]
    #[validate(length(min = 1, max = 20))]
    pub pincode: String,
}

/// Builds the canonical [`Address`] from submitted form fields.
///
/// # Errors
///
/// Fails when the structured field is not a JSON object, or when any
/// subfield is still missing after both shapes were read. The message names
/// every missing subfield.
pub fn parse_address(fields: &FormFields) -> Result<Address, FormError> {
    let structured = match fields.text("address") {
        Some(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Some(map),
            _ => return Err(FormError("address must be a JSON object".to_string())),
        },
        None => None,
    };

    let mut parts: [Option<String>; 4] = Default::default();
    for (slot, name) in parts.iter_mut().zip(ADDRESS_FIELDS) {
        *slot = structured
            .as_ref()
            .and_then(|map| map.get(name))
            .and_then(value_as_text)
            .or_else(|| fields.text(&format!("address.{}", name)));
    }

    let missing: Vec<&str> = parts
        .iter()
        .zip(ADDRESS_FIELDS)
        .filter(|(part, _)| part.is_none())
        .map(|(_, name)| name)
        .collect();

    if !missing.is_empty() {
        return Err(FormError(format!(
            "Complete address is required (missing: {})",
            missing.join(", ")
        )));
    }

    let [street, city, state, pincode] = parts.map(Option::unwrap_or_default);
    Ok(Address {
        street,
        city,
        state,
        pincode,
    })
}

fn value_as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
