//! Internal, admin-facing notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use scholaris_core::pagination::{PageInfo, PaginationParams};
use scholaris_core::serde::{deserialize_optional_bool, deserialize_optional_i64};

use crate::enums::{NotificationType, Priority};
use crate::ids::NotificationId;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub related_id: Option<Uuid>,
    pub related_model: Option<String>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

/// A notification to be raised.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub related_id: Option<Uuid>,
    pub related_model: Option<String>,
    pub priority: Priority,
}

impl NewNotification {
    pub fn new(
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            notification_type,
            title: title.into(),
            message: message.into(),
            link: None,
            related_id: None,
            related_model: None,
            priority: Priority::default(),
        }
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn related(mut self, id: impl Into<Uuid>, model: impl Into<String>) -> Self {
        self.related_id = Some(id.into());
        self.related_model = Some(model.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NotificationFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_read: Option<bool>,
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub notification_type: Option<NotificationType>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl NotificationFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationPayload {
    pub notification: Notification,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    #[serde(flatten)]
    pub page_info: PageInfo,
    pub unread_count: i64,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkedRead {
    pub updated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let id = Uuid::new_v4();
        let n = NewNotification::new(NotificationType::Admission, "New admission", "Asha applied")
            .link(format!("/admin/admissions/{}", id))
            .related(id, "Admission")
            .priority(Priority::High);

        assert_eq!(n.priority, Priority::High);
        assert_eq!(n.related_id, Some(id));
        assert_eq!(n.related_model.as_deref(), Some("Admission"));
        assert!(n.link.unwrap().ends_with(&id.to_string()));
    }

    #[test]
    fn test_default_priority_is_medium() {
        let n = NewNotification::new(NotificationType::Contact, "t", "m");
        assert_eq!(n.priority, Priority::Medium);
    }

    #[test]
    fn test_notification_serializes_type_field() {
        let n = Notification {
            id: NotificationId::new(),
            notification_type: NotificationType::Payment,
            title: "Payment received".to_string(),
            message: "₹1200".to_string(),
            link: None,
            related_id: None,
            related_model: None,
            is_read: false,
            read_at: None,
            priority: Priority::Medium,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["type"], "payment");
        assert_eq!(value["isRead"], false);
    }

    #[test]
    fn test_filter_params_type_key() {
        let params: NotificationFilterParams = serde_json::from_value(serde_json::json!({
            "type": "contact", "isRead": "false"
        }))
        .unwrap();
        assert_eq!(params.notification_type, Some(NotificationType::Contact));
        assert_eq!(params.is_read, Some(false));
    }
}
