//! Student domain models and DTOs.
//!
//! Students are created directly by an admin or derived from an approved
//! admission. Once created a student is independent of its admission.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use scholaris_core::pagination::{PageInfo, PaginationParams};
use scholaris_core::serde::{
    deserialize_optional_bool, deserialize_optional_i64, deserialize_optional_trimmed,
};

use crate::address::Address;
use crate::admissions::Admission;
use crate::enums::Gender;
use crate::ids::StudentId;
use crate::numbers::default_academic_year;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub admission_number: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub blood_group: Option<String>,
    pub class_name: String,
    pub section: Option<String>,
    pub roll_number: Option<String>,
    pub father_name: String,
    pub mother_name: String,
    pub guardian_phone: String,
    pub email: Option<String>,
    #[sqlx(flatten)]
    pub address: Address,
    pub photo_url: Option<String>,
    pub is_approved: bool,
    pub is_active: bool,
    pub academic_year: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for a student insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub blood_group: Option<String>,
    pub class_name: String,
    pub section: Option<String>,
    pub roll_number: Option<String>,
    pub father_name: String,
    pub mother_name: String,
    pub guardian_phone: String,
    pub email: Option<String>,
    pub address: Address,
    pub photo_url: Option<String>,
    pub is_approved: bool,
    pub is_active: bool,
    pub academic_year: String,
}

impl NewStudent {
    /// Copies the applicant and guardian fields of an admission.
    ///
    /// The student's email is the father's, then the mother's, then the
    /// applicant's own.
    pub fn from_admission(
        admission: &Admission,
        section: Option<String>,
        roll_number: Option<String>,
    ) -> Self {
        let email = [
            &admission.father_email,
            &admission.mother_email,
            &admission.email,
        ]
        .into_iter()
        .flatten()
        .find(|e| !e.trim().is_empty())
        .cloned();

        Self {
            name: admission.student_name.clone(),
            date_of_birth: admission.date_of_birth,
            gender: admission.gender,
            blood_group: admission.blood_group.clone(),
            class_name: admission.class_applied.clone(),
            section,
            roll_number,
            father_name: admission.father_name.clone(),
            mother_name: admission.mother_name.clone(),
            guardian_phone: admission.phone.clone(),
            email,
            address: admission.address.clone(),
            photo_url: admission.photo_url.clone(),
            is_approved: true,
            is_active: true,
            academic_year: admission.academic_year.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentDto {
    /// Generated as `ADM<year><5 digits>` when omitted
    #[validate(length(min = 1, max = 50))]
    pub admission_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[validate(length(max = 10))]
    pub blood_group: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub class_name: String,
    #[validate(length(max = 10))]
    pub section: Option<String>,
    #[validate(length(max = 20))]
    pub roll_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub father_name: String,
    #[validate(length(min = 1, max = 100))]
    pub mother_name: String,
    #[validate(length(min = 7, max = 20))]
    pub guardian_phone: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(nested)]
    pub address: Address,
    #[validate(url)]
    pub photo_url: Option<String>,
    pub is_approved: Option<bool>,
    pub is_active: Option<bool>,
    #[validate(length(min = 1, max = 20))]
    pub academic_year: Option<String>,
}

impl CreateStudentDto {
    pub fn into_new_student(self) -> NewStudent {
        NewStudent {
            name: self.name.trim().to_string(),
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            blood_group: self.blood_group,
            class_name: self.class_name,
            section: self.section,
            roll_number: self.roll_number,
            father_name: self.father_name,
            mother_name: self.mother_name,
            guardian_phone: self.guardian_phone,
            email: self.email.map(|e| e.trim().to_lowercase()),
            address: self.address,
            photo_url: self.photo_url,
            is_approved: self.is_approved.unwrap_or(false),
            is_active: self.is_active.unwrap_or(true),
            academic_year: self.academic_year.unwrap_or_else(default_academic_year),
        }
    }
}

/// All fields are optional; only provided fields are updated.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    #[validate(length(max = 10))]
    pub blood_group: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub class_name: Option<String>,
    #[validate(length(max = 10))]
    pub section: Option<String>,
    #[validate(length(max = 20))]
    pub roll_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub father_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub mother_name: Option<String>,
    #[validate(length(min = 7, max = 20))]
    pub guardian_phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(nested)]
    pub address: Option<Address>,
    #[validate(url)]
    pub photo_url: Option<String>,
    pub is_approved: Option<bool>,
    pub is_active: Option<bool>,
    #[validate(length(min = 1, max = 20))]
    pub academic_year: Option<String>,
}

/// Query parameters for filtering and paginating students.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StudentFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub academic_year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
    /// Case-insensitive match on name or admission number
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl StudentFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentList {
    #[serde(flatten)]
    pub page_info: PageInfo,
    pub students: Vec<Student>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentPayload {
    pub student: Student,
}
