/// Navigation menu entries
///
/// Menus form a forest (see [`crate::tree`]). Each entry names the roles
/// allowed to see it; the sidebar for a session is the active tree pruned
/// by [`crate::permission::filter_by_role`].
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::permission::HasPermissions;
use crate::tree::TreeNode;

/// Menu node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: String,
    pub name: String,

    /// Route the entry links to
    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Back-reference to the parent; children are owned by the parent node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    pub order: i32,
    pub is_active: bool,

    /// Role names allowed to see this entry
    pub permissions: Vec<String>,

    #[serde(default)]
    pub children: Vec<Menu>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TreeNode for Menu {
    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }
}

impl HasPermissions for Menu {
    fn permissions(&self) -> &[String] {
        &self.permissions
    }
}

/// Input for creating a menu entry
///
/// `order` defaults to one past the current sibling count and
/// `permissions` to `["user", "admin"]`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateMenu {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Path is required"))]
    pub path: String,
    pub icon: Option<String>,
    pub parent_id: Option<String>,
    pub order: Option<i32>,
    pub permissions: Option<Vec<String>>,
}

/// Partial update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateMenu {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Path is required"))]
    pub path: Option<String>,
    pub icon: Option<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
    pub permissions: Option<Vec<String>>,
}

/// One entry of a reorder request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOrder {
    pub id: String,
    pub order: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_name_and_path() {
        let errors = CreateMenu::default().validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("path"));
    }

    #[test]
    fn test_update_checks_only_given_fields() {
        assert!(UpdateMenu::default().validate().is_ok());

        let input = UpdateMenu {
            name: Some(String::new()),
            ..Default::default()
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
        assert!(errors.field_errors().contains_key("name"));
    }
}
