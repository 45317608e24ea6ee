use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use scholaris_core::pagination::{PageInfo, PaginationParams};
use scholaris_core::serde::deserialize_optional_i64;

use crate::enums::GalleryCategory;
use crate::form::{FormError, FormFields};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: GalleryCategory,
    pub image_url: String,
    /// Storage backend key, used to delete the image with the item
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub storage_key: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CreateGalleryItemDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub category: GalleryCategory,
    pub is_active: bool,
}

impl CreateGalleryItemDto {
    pub fn from_form(fields: &FormFields) -> Result<Self, FormError> {
        Ok(Self {
            title: fields.required("title")?,
            description: fields.text("description"),
            category: fields.parse("category")?.unwrap_or_default(),
            is_active: fields.bool("isActive")?.unwrap_or(true),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGalleryItemDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub category: Option<GalleryCategory>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GalleryFilterParams {
    pub category: Option<GalleryCategory>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl GalleryFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GalleryItemPayload {
    pub item: GalleryItem,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GalleryList {
    #[serde(flatten)]
    pub page_info: PageInfo,
    pub items: Vec<GalleryItem>,
}
