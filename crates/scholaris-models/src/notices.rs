use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use scholaris_core::pagination::{PageInfo, PaginationParams};
use scholaris_core::serde::deserialize_optional_i64;

use crate::enums::{NoticeCategory, Priority};
use crate::form::{FormError, FormFields};
use crate::ids::AdminId;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: NoticeCategory,
    pub priority: Priority,
    pub attachment_url: Option<String>,
    pub is_published: bool,
    pub publish_date: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub created_by: Option<AdminId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notice {
    /// Published and not past its expiry date.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.is_published && self.expiry_date.is_none_or(|expiry| expiry > now)
    }
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CreateNoticeDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    pub category: NoticeCategory,
    pub priority: Priority,
    pub is_published: bool,
    pub publish_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl CreateNoticeDto {
    pub fn from_form(fields: &FormFields) -> Result<Self, FormError> {
        let dto = Self {
            title: fields.required("title")?,
            content: fields.required("content")?,
            category: fields.parse("category")?.unwrap_or_default(),
            priority: fields.parse("priority")?.unwrap_or_default(),
            is_published: fields.bool("isPublished")?.unwrap_or(true),
            publish_date: fields.datetime("publishDate")?,
            expiry_date: fields.datetime("expiryDate")?,
        };
        check_dates(dto.publish_date, dto.expiry_date)?;
        Ok(dto)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct UpdateNoticeDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub category: Option<NoticeCategory>,
    pub priority: Option<Priority>,
    pub is_published: Option<bool>,
    pub publish_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl UpdateNoticeDto {
    pub fn from_form(fields: &FormFields) -> Result<Self, FormError> {
        let dto = Self {
            title: fields.text("title"),
            content: fields.text("content"),
            category: fields.parse("category")?,
            priority: fields.parse("priority")?,
            is_published: fields.bool("isPublished")?,
            publish_date: fields.datetime("publishDate")?,
            expiry_date: fields.datetime("expiryDate")?,
        };
        check_dates(dto.publish_date, dto.expiry_date)?;
        Ok(dto)
    }
}

fn check_dates(
    publish: Option<DateTime<Utc>>,
    expiry: Option<DateTime<Utc>>,
) -> Result<(), FormError> {
    match (publish, expiry) {
        (Some(p), Some(e)) if e <= p => Err(FormError(
            "expiryDate must be after publishDate".to_string(),
        )),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NoticeFilterParams {
    pub category: Option<NoticeCategory>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl NoticeFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoticePayload {
    pub notice: Notice,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeList {
    #[serde(flatten)]
    pub page_info: PageInfo,
    pub notices: Vec<Notice>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn notice(is_published: bool, expiry_date: Option<DateTime<Utc>>) -> Notice {
        let now = Utc::now();
        Notice {
            id: Uuid::new_v4(),
            title: "Holiday".to_string(),
            content: "School closed".to_string(),
            category: NoticeCategory::Holiday,
            priority: Priority::High,
            attachment_url: None,
            is_published,
            publish_date: now,
            expiry_date,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_visibility() {
        let now = Utc::now();
        assert!(notice(true, None).is_visible_at(now));
        assert!(notice(true, Some(now + Duration::days(1))).is_visible_at(now));
        assert!(!notice(true, Some(now - Duration::days(1))).is_visible_at(now));
        assert!(!notice(false, None).is_visible_at(now));
    }

    #[test]
    fn test_create_from_form_defaults() {
        let form: FormFields = [("title", "Exam schedule"), ("content", "See attached")]
            .into_iter()
            .collect();
        let dto = CreateNoticeDto::from_form(&form).unwrap();
        assert_eq!(dto.category, NoticeCategory::General);
        assert_eq!(dto.priority, Priority::Medium);
        assert!(dto.is_published);
    }

    #[test]
    fn test_create_rejects_expiry_before_publish() {
        let form: FormFields = [
            ("title", "Exam schedule"),
            ("content", "See attached"),
            ("publishDate", "2025-06-10"),
            ("expiryDate", "2025-06-01"),
        ]
        .into_iter()
        .collect();
        assert!(CreateNoticeDto::from_form(&form).is_err());
    }

    #[test]
    fn test_create_rejects_unknown_category() {
        let form: FormFields = [
            ("title", "Exam schedule"),
            ("content", "See attached"),
            ("category", "gossip"),
        ]
        .into_iter()
        .collect();
        let err = CreateNoticeDto::from_form(&form).unwrap_err();
        assert!(err.0.starts_with("category:"));
    }
}
