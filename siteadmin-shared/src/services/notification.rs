/// Notification service
///
/// Notifications are scoped to their recipient: reads, marks and deletes
/// only ever touch records whose `recipient_id` matches the caller.
/// Delivery is a per-channel stub that logs and marks the record delivered.
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::seed_time;
use crate::error::{ServiceError, ServiceResult};
use crate::models::notification::{
    CreateNotification, Notification, NotificationStatus, NotificationTemplate, NotificationType,
    SendTemplate,
};

#[derive(Debug, Default)]
struct NotificationStore {
    notifications: Vec<Notification>,
    templates: Vec<NotificationTemplate>,
}

#[derive(Debug, Default)]
pub struct NotificationService {
    store: RwLock<NotificationStore>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        Self {
            store: RwLock::new(NotificationStore {
                notifications: seed_notifications(),
                templates: seed_templates(),
            }),
        }
    }

    /// A user's notifications, newest first
    pub async fn find_by_user(&self, user_id: &str) -> Vec<Notification> {
        let store = self.store.read().await;
        let mut found: Vec<Notification> = store
            .notifications
            .iter()
            .filter(|n| n.recipient_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found
    }

    pub async fn unread_count(&self, user_id: &str) -> usize {
        self.store
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.recipient_id == user_id && n.read_at.is_none())
            .count()
    }

    /// Stores and dispatches a notification
    pub async fn create(&self, input: CreateNotification) -> ServiceResult<Notification> {
        let now = Utc::now();
        let mut notification = Notification {
            id: crate::new_id(),
            notification_type: input.notification_type,
            title: input.title,
            content: input.content,
            recipient_id: input.recipient_id,
            sender_id: input.sender_id,
            status: NotificationStatus::Pending,
            read_at: None,
            sent_at: None,
            metadata: input.metadata,
            created_at: now,
            updated_at: now,
        };
        dispatch(&mut notification, now);

        self.store
            .write()
            .await
            .notifications
            .push(notification.clone());
        Ok(notification)
    }

    /// Marks one of the user's notifications read; `None` if it is not theirs
    pub async fn mark_as_read(&self, id: &str, user_id: &str) -> Option<Notification> {
        let mut store = self.store.write().await;
        let notification = store
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == user_id)?;

        mark_read(notification, Utc::now());
        Some(notification.clone())
    }

    /// Marks every unread notification of the user read, returning how many changed
    pub async fn mark_all_as_read(&self, user_id: &str) -> usize {
        let now = Utc::now();
        let mut store = self.store.write().await;
        store
            .notifications
            .iter_mut()
            .filter(|n| n.recipient_id == user_id && n.read_at.is_none())
            .fold(0, |count, n| {
                mark_read(n, now);
                count + 1
            })
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> bool {
        let mut store = self.store.write().await;
        let before = store.notifications.len();
        store
            .notifications
            .retain(|n| !(n.id == id && n.recipient_id == user_id));
        store.notifications.len() < before
    }

    pub async fn templates(&self) -> Vec<NotificationTemplate> {
        self.store.read().await.templates.clone()
    }

    /// Renders an active template and sends the result
    ///
    /// The title is the template's subject, falling back to its name.
    ///
    /// # Errors
    ///
    /// `NotFound` when the template does not exist or is inactive
    pub async fn send_from_template(
        &self,
        request: SendTemplate,
        sender_id: Option<&str>,
    ) -> ServiceResult<Notification> {
        let template = {
            let store = self.store.read().await;
            store
                .templates
                .iter()
                .find(|t| t.id == request.template_id && t.is_active)
                .cloned()
                .ok_or_else(|| ServiceError::not_found("Notification template", &request.template_id))?
        };

        let content = template.render(&request.variables);
        self.create(CreateNotification {
            notification_type: template.notification_type,
            title: template.subject.unwrap_or(template.name),
            content,
            recipient_id: request.recipient_id,
            sender_id: sender_id.map(str::to_string),
            metadata: Some(serde_json::json!({ "templateId": template.id })),
        })
        .await
    }
}

fn mark_read(notification: &mut Notification, at: DateTime<Utc>) {
    notification.read_at = Some(at);
    notification.status = NotificationStatus::Read;
    notification.updated_at = at;
}

fn dispatch(notification: &mut Notification, at: DateTime<Utc>) {
    let channel = match notification.notification_type {
        NotificationType::Push => "push",
        NotificationType::Email => "email",
        NotificationType::Sms => "sms",
        NotificationType::InApp => "in-app",
    };
    tracing::info!(
        channel,
        recipient = %notification.recipient_id,
        title = %notification.title,
        "Notification dispatched"
    );

    notification.status = NotificationStatus::Delivered;
    notification.sent_at = Some(at);
    notification.updated_at = at;
}

pub fn seed_notifications() -> Vec<Notification> {
    vec![Notification {
        id: "notif-001".to_string(),
        notification_type: NotificationType::InApp,
        title: "Welcome".to_string(),
        content: "Welcome to AI Project.".to_string(),
        recipient_id: "user-002".to_string(),
        sender_id: None,
        status: NotificationStatus::Delivered,
        read_at: None,
        sent_at: Some(seed_time()),
        metadata: None,
        created_at: seed_time(),
        updated_at: seed_time(),
    }]
}

pub fn seed_templates() -> Vec<NotificationTemplate> {
    let template = |id: &str, name: &str, kind, subject: Option<&str>, body: &str, vars: &[&str]| {
        NotificationTemplate {
            id: id.to_string(),
            name: name.to_string(),
            notification_type: kind,
            subject: subject.map(str::to_string),
            body: body.to_string(),
            variables: vars.iter().map(|v| v.to_string()).collect(),
            is_active: true,
            created_at: seed_time(),
            updated_at: seed_time(),
        }
    };

    vec![
        template(
            "tpl-001",
            "Welcome",
            NotificationType::InApp,
            None,
            "Hello {{userName}}, welcome to {{siteName}}!",
            &["userName", "siteName"],
        ),
        template(
            "tpl-002",
            "Password reset",
            NotificationType::Email,
            Some("Reset your password"),
            "Hello {{userName}}, reset your password here: {{resetLink}}",
            &["userName", "resetLink"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn input(recipient: &str, title: &str) -> CreateNotification {
        CreateNotification {
            title: title.to_string(),
            content: "body".to_string(),
            recipient_id: recipient.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_is_delivered() {
        let service = NotificationService::seeded();
        let created = service.create(input("user-001", "Hi")).await.unwrap();

        assert_eq!(created.status, NotificationStatus::Delivered);
        assert!(created.sent_at.is_some());
        assert_eq!(created.notification_type, NotificationType::InApp);
        assert_eq!(service.unread_count("user-001").await, 1);
    }

    #[tokio::test]
    async fn test_read_is_recipient_scoped() {
        let service = NotificationService::seeded();

        assert!(service.mark_as_read("notif-001", "user-001").await.is_none());
        assert_eq!(service.unread_count("user-002").await, 1);

        let read = service.mark_as_read("notif-001", "user-002").await.unwrap();
        assert_eq!(read.status, NotificationStatus::Read);
        assert_eq!(service.unread_count("user-002").await, 0);
    }

    #[tokio::test]
    async fn test_mark_all_as_read() {
        let service = NotificationService::seeded();
        service.create(input("user-002", "One")).await.unwrap();
        service.create(input("user-001", "Other")).await.unwrap();

        assert_eq!(service.mark_all_as_read("user-002").await, 2);
        assert_eq!(service.mark_all_as_read("user-002").await, 0);
        assert_eq!(service.unread_count("user-001").await, 1);
    }

    #[tokio::test]
    async fn test_delete_is_recipient_scoped() {
        let service = NotificationService::seeded();
        assert!(!service.delete("notif-001", "user-001").await);
        assert!(service.delete("notif-001", "user-002").await);
        assert!(service.find_by_user("user-002").await.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_user_newest_first() {
        let service = NotificationService::seeded();
        service.create(input("user-002", "Newer")).await.unwrap();

        let titles: Vec<String> = service
            .find_by_user("user-002")
            .await
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["Newer", "Welcome"]);
    }

    #[tokio::test]
    async fn test_send_from_template() {
        let service = NotificationService::seeded();
        let sent = service
            .send_from_template(
                SendTemplate {
                    template_id: "tpl-002".to_string(),
                    recipient_id: "user-002".to_string(),
                    variables: BTreeMap::from([
                        ("userName".to_string(), "Kim".to_string()),
                        ("resetLink".to_string(), "https://example.com/r".to_string()),
                    ]),
                },
                Some("user-001"),
            )
            .await
            .unwrap();

        assert_eq!(sent.title, "Reset your password");
        assert_eq!(sent.notification_type, NotificationType::Email);
        assert_eq!(
            sent.content,
            "Hello Kim, reset your password here: https://example.com/r"
        );
        assert_eq!(sent.sender_id.as_deref(), Some("user-001"));

        let welcome = service
            .send_from_template(
                SendTemplate {
                    template_id: "tpl-001".to_string(),
                    recipient_id: "user-002".to_string(),
                    variables: BTreeMap::new(),
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(welcome.title, "Welcome");
    }

    #[tokio::test]
    async fn test_send_from_missing_template() {
        let service = NotificationService::seeded();
        let err = service
            .send_from_template(
                SendTemplate {
                    template_id: "tpl-404".to_string(),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
