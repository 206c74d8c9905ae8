/// Settings service
///
/// Every accepted change appends a [`SettingHistory`] entry recording the
/// previous and new value and who made the change.
use chrono::Utc;
use tokio::sync::RwLock;

use super::seed_time;
use crate::error::{ServiceError, ServiceResult};
use crate::models::setting::{Setting, SettingCategory, SettingHistory, SettingType, SiteConfig};

#[derive(Debug, Default)]
struct SettingsStore {
    settings: Vec<Setting>,
    history: Vec<SettingHistory>,
}

impl SettingsStore {
    fn value(&self, key: &str) -> Option<&str> {
        self.settings
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.value.as_str())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Default)]
pub struct SettingsService {
    store: RwLock<SettingsStore>,
}

impl SettingsService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        Self {
            store: RwLock::new(SettingsStore {
                settings: seed_settings(),
                history: Vec::new(),
            }),
        }
    }

    pub async fn find_all(&self) -> Vec<Setting> {
        self.store.read().await.settings.clone()
    }

    pub async fn find_by_category(&self, category: SettingCategory) -> Vec<Setting> {
        self.store
            .read()
            .await
            .settings
            .iter()
            .filter(|s| s.category == category)
            .cloned()
            .collect()
    }

    pub async fn find_by_key(&self, key: &str) -> Option<Setting> {
        self.store
            .read()
            .await
            .settings
            .iter()
            .find(|s| s.key == key)
            .cloned()
    }

    /// Changes a setting's value and records the change
    ///
    /// Returns `Ok(None)` when the key does not exist.
    ///
    /// # Errors
    ///
    /// `Conflict` when the setting is not editable
    pub async fn update(&self, key: &str, value: String, user_id: &str) -> ServiceResult<Option<Setting>> {
        let mut store = self.store.write().await;
        let SettingsStore { settings, history } = &mut *store;

        let Some(setting) = settings.iter_mut().find(|s| s.key == key) else {
            return Ok(None);
        };
        if !setting.is_editable {
            return Err(ServiceError::Conflict(format!(
                "Setting is not editable: {}",
                key
            )));
        }

        let now = Utc::now();
        history.push(SettingHistory {
            id: crate::new_id(),
            setting_id: setting.id.clone(),
            previous_value: std::mem::replace(&mut setting.value, value),
            new_value: setting.value.clone(),
            changed_by: user_id.to_string(),
            changed_at: now,
        });
        setting.updated_at = now;
        setting.updated_by = Some(user_id.to_string());

        tracing::info!(key, user_id, "Setting updated");
        Ok(Some(setting.clone()))
    }

    /// Site configuration with defaults for unset keys
    pub async fn get_site_config(&self) -> SiteConfig {
        let store = self.store.read().await;
        let get = |key: &str, default: &str| store.value(key).unwrap_or(default).to_string();

        SiteConfig {
            site_name: get("site.name", "AI Project"),
            site_description: get("site.description", ""),
            site_logo: get("site.logo", ""),
            favicon: get("site.favicon", ""),
            primary_color: get("site.primaryColor", "#3b82f6"),
            language: get("site.language", "ko"),
            timezone: get("site.timezone", "Asia/Seoul"),
            date_format: get("site.dateFormat", "YYYY-MM-DD"),
            email_from: get("notification.email.from", ""),
            maintenance_mode: get("site.maintenanceMode", "false") == "true",
        }
    }

    /// Change history, newest first, optionally for one key
    ///
    /// An unknown key yields an empty history.
    pub async fn get_history(&self, key: Option<&str>) -> Vec<SettingHistory> {
        let store = self.store.read().await;

        let setting_id = match key {
            Some(key) => match store.settings.iter().find(|s| s.key == key) {
                Some(setting) => Some(setting.id.as_str()),
                None => return Vec::new(),
            },
            None => None,
        };

        let mut entries: Vec<SettingHistory> = store
            .history
            .iter()
            .rev()
            .filter(|h| setting_id.map_or(true, |id| h.setting_id == id))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.changed_at.cmp(&a.changed_at));
        entries
    }
}

pub fn seed_settings() -> Vec<Setting> {
    let setting = |id: &str, key: &str, value: &str, setting_type, category, label: &str| Setting {
        id: id.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        setting_type,
        category,
        label: label.to_string(),
        description: None,
        is_editable: true,
        created_at: seed_time(),
        updated_at: seed_time(),
        updated_by: None,
    };

    let mut name = setting("setting-001", "site.name", "AI Project", SettingType::String, SettingCategory::General, "Site name");
    name.description = Some("Name shown in the header and page titles".to_string());

    let mut maintenance = setting(
        "setting-004",
        "site.maintenanceMode",
        "false",
        SettingType::Boolean,
        SettingCategory::General,
        "Maintenance mode",
    );
    maintenance.description = Some("Restricts access for regular users while enabled".to_string());

    vec![
        name,
        setting(
            "setting-002",
            "site.description",
            "Service platform based application",
            SettingType::String,
            SettingCategory::General,
            "Site description",
        ),
        setting(
            "setting-003",
            "site.primaryColor",
            "#3b82f6",
            SettingType::String,
            SettingCategory::Appearance,
            "Primary color",
        ),
        maintenance,
        setting(
            "setting-005",
            "notification.email.enabled",
            "true",
            SettingType::Boolean,
            SettingCategory::Notification,
            "Email notifications",
        ),
    ]
}
