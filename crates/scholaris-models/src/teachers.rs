use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use scholaris_core::pagination::{PageInfo, PaginationParams};
use scholaris_core::serde::{
    deserialize_optional_bool, deserialize_optional_i64, deserialize_optional_trimmed,
};

use crate::form::{FormError, FormFields};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: Uuid,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub qualification: Option<String>,
    pub experience_years: i32,
    pub designation: Option<String>,
    pub photo_url: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Built from the multipart create form; the optional `photo` part is
/// handled separately.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CreateTeacherDto {
    #[validate(length(min = 1, max = 50))]
    pub employee_id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email(message = "email must be a valid email"))]
    pub email: String,
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    pub qualification: Option<String>,
    #[validate(range(min = 0, max = 60))]
    pub experience_years: i32,
    pub designation: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl CreateTeacherDto {
    pub fn from_form(fields: &FormFields) -> Result<Self, FormError> {
        Ok(Self {
            employee_id: fields.required("employeeId")?,
            name: fields.required("name")?,
            email: fields.required("email")?.to_lowercase(),
            phone: fields.required("phone")?,
            subject: fields.required("subject")?,
            qualification: fields.text("qualification"),
            experience_years: fields.parse("experienceYears")?.unwrap_or(0),
            designation: fields.text("designation"),
            joining_date: fields.date("joiningDate")?,
            is_active: fields.bool("isActive")?.unwrap_or(true),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct UpdateTeacherDto {
    #[validate(length(min = 1, max = 50))]
    pub employee_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub subject: Option<String>,
    pub qualification: Option<String>,
    #[validate(range(min = 0, max = 60))]
    pub experience_years: Option<i32>,
    pub designation: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

impl UpdateTeacherDto {
    pub fn from_form(fields: &FormFields) -> Result<Self, FormError> {
        Ok(Self {
            employee_id: fields.text("employeeId"),
            name: fields.text("name"),
            email: fields.text("email").map(|e| e.to_lowercase()),
            phone: fields.text("phone"),
            subject: fields.text("subject"),
            qualification: fields.text("qualification"),
            experience_years: fields.parse("experienceYears")?,
            designation: fields.text("designation"),
            joining_date: fields.date("joiningDate")?,
            is_active: fields.bool("isActive")?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TeacherFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub subject: Option<String>,
    /// Honoured for authenticated admins only
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub include_inactive: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl TeacherFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherPayload {
    pub teacher: Teacher,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherList {
    #[serde(flatten)]
    pub page_info: PageInfo,
    pub teachers: Vec<Teacher>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_from_form() {
        let form: FormFields = [
            ("employeeId", "EMP001"),
            ("name", "Sunita Iyer"),
            ("email", "Sunita@School.edu"),
            ("phone", "9876543210"),
            ("subject", "Mathematics"),
            ("experienceYears", "12"),
            ("joiningDate", "2014-06-01"),
        ]
        .into_iter()
        .collect();

        let dto = CreateTeacherDto::from_form(&form).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.email, "sunita@school.edu");
        assert_eq!(dto.experience_years, 12);
        assert!(dto.is_active);
    }

    #[test]
    fn test_create_requires_subject() {
        let form: FormFields = [
            ("employeeId", "EMP001"),
            ("name", "Sunita Iyer"),
            ("email", "sunita@school.edu"),
            ("phone", "9876543210"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            CreateTeacherDto::from_form(&form).unwrap_err().0,
            "subject is required"
        );
    }

    #[test]
    fn test_update_from_form_only_sets_present_fields() {
        let form: FormFields = [("designation", "HOD"), ("isActive", "false")]
            .into_iter()
            .collect();
        let dto = UpdateTeacherDto::from_form(&form).unwrap();
        assert_eq!(dto.designation.as_deref(), Some("HOD"));
        assert_eq!(dto.is_active, Some(false));
        assert_eq!(dto.name, None);
        assert_eq!(dto.experience_years, None);
    }
}
