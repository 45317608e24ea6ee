use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use scholaris_core::pagination::{PageInfo, PaginationParams};
use scholaris_core::serde::deserialize_optional_i64;

use crate::enums::ContactStatus;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateContactDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateContactStatusDto {
    pub status: ContactStatus,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContactFilterParams {
    pub status: Option<ContactStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl ContactFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactPayload {
    pub contact: Contact,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactList {
    #[serde(flatten)]
    pub page_info: PageInfo,
    pub contacts: Vec<Contact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_contact_validation() {
        let dto: CreateContactDto = serde_json::from_value(serde_json::json!({
            "name": "Parent",
            "email": "parent@example.com",
            "subject": "Admissions",
            "message": "When do admissions open?"
        }))
        .unwrap();
        assert!(dto.validate().is_ok());

        let dto: CreateContactDto = serde_json::from_value(serde_json::json!({
            "name": "Parent",
            "email": "nope",
            "subject": "",
            "message": "Hi"
        }))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("subject"));
    }

    #[test]
    fn test_status_dto() {
        let dto: UpdateContactStatusDto =
            serde_json::from_value(serde_json::json!({ "status": "replied" })).unwrap();
        assert_eq!(dto.status, ContactStatus::Replied);
    }
}
