//! Admission application models and DTOs.
//!
//! An admission moves from `pending` to `approved`, `rejected` or `on_hold`
//! by an admin decision. Approval derives a [`crate::students::Student`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidateEmail};

use scholaris_core::pagination::{PageInfo, PaginationParams};
use scholaris_core::serde::{deserialize_optional_i64, deserialize_optional_trimmed};

use crate::address::{Address, parse_address};
use crate::enums::{AdmissionPaymentStatus, AdmissionStatus, Gender};
use crate::form::{FormError, FormFields};
use crate::ids::{AdminId, AdmissionId};
use crate::students::Student;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Admission {
    pub id: AdmissionId,
    pub application_number: String,
    pub student_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub blood_group: Option<String>,
    pub class_applied: String,
    pub previous_school: Option<String>,
    pub father_name: String,
    pub father_occupation: Option<String>,
    pub father_phone: Option<String>,
    pub father_email: Option<String>,
    pub mother_name: String,
    pub mother_occupation: Option<String>,
    pub mother_phone: Option<String>,
    pub mother_email: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    #[sqlx(flatten)]
    pub address: Address,
    pub photo_url: Option<String>,
    pub status: AdmissionStatus,
    pub remarks: Option<String>,
    pub approved_by: Option<AdminId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub payment_status: AdmissionPaymentStatus,
    pub academic_year: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated public application, built from the multipart form.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct AdmissionSubmission {
    #[validate(length(min = 1, max = 100, message = "studentName is required"))]
    pub student_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub blood_group: Option<String>,
    #[validate(length(min = 1, max = 50, message = "classApplied is required"))]
    pub class_applied: String,
    pub previous_school: Option<String>,
    #[validate(length(min = 1, max = 100, message = "fatherName is required"))]
    pub father_name: String,
    pub father_occupation: Option<String>,
    pub father_phone: Option<String>,
    #[validate(email(message = "fatherEmail must be a valid email"))]
    pub father_email: Option<String>,
    #[validate(length(min = 1, max = 100, message = "motherName is required"))]
    pub mother_name: String,
    pub mother_occupation: Option<String>,
    pub mother_phone: Option<String>,
    #[validate(email(message = "motherEmail must be a valid email"))]
    pub mother_email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(email(message = "email must be a valid email"))]
    pub email: Option<String>,
    #[validate(nested)]
    pub address: Address,
    pub academic_year: Option<String>,
}

impl AdmissionSubmission {
    /// Parses the text parts of a submission, including the address.
    ///
    /// Runs before any upload, so a rejected form never stores a photo.
    pub fn from_form(fields: &FormFields) -> Result<Self, FormError> {
        let address = parse_address(fields)?;
        let email = |name: &str| fields.text(name).map(|e| e.to_lowercase());

        Ok(Self {
            student_name: fields.required("studentName")?,
            date_of_birth: fields
                .date("dateOfBirth")?
                .ok_or_else(|| FormError("dateOfBirth is required".to_string()))?,
            gender: fields.parse_required("gender")?,
            blood_group: fields.text("bloodGroup"),
            class_applied: fields.required("classApplied")?,
            previous_school: fields.text("previousSchool"),
            father_name: fields.required("fatherName")?,
            father_occupation: fields.text("fatherOccupation"),
            father_phone: fields.text("fatherPhone"),
            father_email: email("fatherEmail"),
            mother_name: fields.required("motherName")?,
            mother_occupation: fields.text("motherOccupation"),
            mother_phone: fields.text("motherPhone"),
            mother_email: email("motherEmail"),
            phone: fields.required("phone")?,
            email: email("email"),
            address,
            academic_year: fields.text("academicYear"),
        })
    }

    /// The first available of the applicant, father and mother emails.
    pub fn contact_email(&self) -> Option<&str> {
        [&self.email, &self.father_email, &self.mother_email]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|e| e.validate_email())
    }
}

fn validate_phone(phone: &str) -> Result<(), validator::ValidationError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));

    if (7..=15).contains(&digits) && allowed {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("phone");
        err.message = Some("phone must contain at least 7 digits".into());
        Err(err)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveAdmissionDto {
    #[validate(length(max = 10))]
    pub section: Option<String>,
    #[validate(length(max = 20))]
    pub roll_number: Option<String>,
    #[validate(length(max = 1000))]
    pub remarks: Option<String>,
}

/// Body of the reject and hold decisions.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AdmissionRemarksDto {
    #[validate(length(max = 1000))]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AdmissionFilterParams {
    pub status: Option<AdmissionStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub class_applied: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub academic_year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl AdmissionFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdmissionPayload {
    pub admission: Admission,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdmissionList {
    #[serde(flatten)]
    pub page_info: PageInfo,
    pub admissions: Vec<Admission>,
}

/// Result of approving an admission.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovalOutcome {
    pub student: Student,
    pub admission: Admission,
}
