/// Common code service
///
/// Group codes are unique. Groups and codes are soft-deleted, and the system
/// groups (see [`crate::models::code::SYSTEM_GROUPS`]) can never be deleted.
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::seed_time;
use crate::error::{ServiceError, ServiceResult};
use crate::models::code::{Code, CodeGroup, CreateCode, CreateCodeGroup, UpdateCodeGroup};
use crate::repository::Repository;

#[derive(Debug, Default)]
pub struct CommonCodeService {
    groups: RwLock<Vec<CodeGroup>>,
}

impl CommonCodeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        Self {
            groups: RwLock::new(seed_code_groups()),
        }
    }

    /// Active codes of a group, sorted by `order`; empty for an unknown group
    pub async fn find_codes_by_group(&self, group_code: &str) -> Vec<Code> {
        let groups = self.groups.read().await;
        let Some(group) = groups.iter().find(|g| g.code == group_code) else {
            return Vec::new();
        };

        let mut codes: Vec<Code> = group.codes.iter().filter(|c| c.is_active).cloned().collect();
        codes.sort_by_key(|c| c.order);
        codes
    }

    /// Appends a code to a group
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing group, `Conflict` when the code already
    /// exists in the group
    pub async fn add_code(&self, group_id: &str, input: CreateCode) -> ServiceResult<Code> {
        let mut groups = self.groups.write().await;
        let group = groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| ServiceError::not_found("Code group", group_id))?;

        if group.codes.iter().any(|c| c.code == input.code && c.is_active) {
            return Err(ServiceError::Conflict(format!(
                "Code already exists in group {}: {}",
                group.code, input.code
            )));
        }

        let now = Utc::now();
        let order = input.order.unwrap_or_else(|| {
            i32::try_from(group.codes.len()).map_or(i32::MAX, |n| n.saturating_add(1))
        });
        let code = Code {
            id: crate::new_id(),
            group_id: group_id.to_string(),
            code: input.code,
            name: input.name,
            value: input.value,
            order,
            is_active: true,
            labels: input.labels,
            created_at: now,
            updated_at: now,
        };
        group.codes.push(code.clone());
        group.updated_at = now;

        tracing::info!(group = %group.code, code = %code.code, "Code added");
        Ok(code)
    }

    /// Deactivates one code; `false` if the group or code does not exist
    pub async fn delete_code(&self, group_id: &str, code_id: &str) -> bool {
        let mut groups = self.groups.write().await;
        let Some(code) = groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .and_then(|g| g.codes.iter_mut().find(|c| c.id == code_id))
        else {
            return false;
        };

        code.is_active = false;
        code.updated_at = Utc::now();
        true
    }
}

#[async_trait]
impl Repository<CodeGroup, CreateCodeGroup, UpdateCodeGroup> for CommonCodeService {
    /// Active groups only
    async fn list(&self) -> ServiceResult<Vec<CodeGroup>> {
        Ok(self
            .groups
            .read()
            .await
            .iter()
            .filter(|g| g.is_active)
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> ServiceResult<Option<CodeGroup>> {
        Ok(self.groups.read().await.iter().find(|g| g.id == id).cloned())
    }

    async fn create(&self, input: CreateCodeGroup) -> ServiceResult<CodeGroup> {
        let mut groups = self.groups.write().await;
        if groups.iter().any(|g| g.code == input.code) {
            return Err(ServiceError::Conflict(format!(
                "Code group already exists: {}",
                input.code
            )));
        }

        let now = Utc::now();
        let group = CodeGroup {
            id: crate::new_id(),
            code: input.code,
            name: input.name,
            description: input.description,
            is_active: true,
            codes: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        groups.push(group.clone());

        tracing::info!(group = %group.code, "Code group created");
        Ok(group)
    }

    async fn update(&self, id: &str, input: UpdateCodeGroup) -> ServiceResult<Option<CodeGroup>> {
        let mut groups = self.groups.write().await;
        let Some(group) = groups.iter_mut().find(|g| g.id == id) else {
            return Ok(None);
        };

        if let Some(name) = input.name {
            group.name = name;
        }
        if let Some(description) = input.description {
            group.description = Some(description);
        }
        if let Some(is_active) = input.is_active {
            if !is_active && group.is_system() {
                return Err(system_group(&group.code));
            }
            group.is_active = is_active;
        }
        group.updated_at = Utc::now();

        Ok(Some(group.clone()))
    }

    /// Deactivates a group
    ///
    /// # Errors
    ///
    /// `Conflict` for a system group
    async fn delete(&self, id: &str) -> ServiceResult<bool> {
        let mut groups = self.groups.write().await;
        let Some(group) = groups.iter_mut().find(|g| g.id == id) else {
            return Ok(false);
        };
        if group.is_system() {
            tracing::warn!(group = %group.code, "Refused to delete system code group");
            return Err(system_group(&group.code));
        }

        group.is_active = false;
        group.updated_at = Utc::now();
        tracing::info!(group = %group.code, "Code group deactivated");
        Ok(true)
    }
}

fn system_group(code: &str) -> ServiceError {
    ServiceError::Conflict(format!("System code group cannot be deleted: {}", code))
}

/// Fixture groups `USER_STATUS` and `BOARD_TYPE`
pub fn seed_code_groups() -> Vec<CodeGroup> {
    let group = |id: &str, code: &str, name: &str, entries: &[(&str, &str, &str)]| CodeGroup {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        is_active: true,
        codes: entries
            .iter()
            .zip(1..)
            .map(|(&(code_id, value, label), order)| Code {
                id: code_id.to_string(),
                group_id: id.to_string(),
                code: value.to_string(),
                name: label.to_string(),
                value: Some(value.to_lowercase()),
                order,
                is_active: true,
                labels: Default::default(),
                created_at: seed_time(),
                updated_at: seed_time(),
            })
            .collect(),
        created_at: seed_time(),
        updated_at: seed_time(),
    };

    vec![
        group(
            "group-001",
            "USER_STATUS",
            "User status",
            &[
                ("code-001", "ACTIVE", "Active"),
                ("code-002", "INACTIVE", "Inactive"),
                ("code-003", "LOCKED", "Locked"),
            ],
        ),
        group(
            "group-002",
            "BOARD_TYPE",
            "Board type",
            &[
                ("code-004", "GENERAL", "General"),
                ("code-005", "NOTICE", "Notice"),
                ("code-006", "QNA", "Q&A"),
            ],
        ),
    ]
}
