/// Notifications and templates
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Delivery channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationType {
    Push,
    Email,
    Sms,
    #[default]
    InApp,
}

/// Lifecycle: pending, then delivered (or failed), then read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Delivered,
    Read,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub content: String,
    pub recipient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    pub status: NotificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateNotification {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub content: String,
    #[validate(length(min = 1, message = "Recipient is required"))]
    pub recipient_id: String,
    pub sender_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Reusable message with `{{variable}}` placeholders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTemplate {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
    pub variables: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NotificationTemplate {
    /// Substitutes every `{{key}}` occurrence; unknown placeholders are left as-is
    pub fn render(&self, variables: &BTreeMap<String, String>) -> String {
        variables
            .iter()
            .fold(self.body.clone(), |body, (key, value)| {
                body.replace(&format!("{{{{{}}}}}", key), value)
            })
    }
}

/// Request to send from a template
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SendTemplate {
    #[validate(length(min = 1, message = "Template is required"))]
    pub template_id: String,
    #[validate(length(min = 1, message = "Recipient is required"))]
    pub recipient_id: String,
    pub variables: BTreeMap<String, String>,
}
