/// Menu service
///
/// Owns the navigation forest. `list` returns the active, order-sorted tree;
/// `find_all_flat` returns every entry; `find_by_role` prunes the active
/// tree to what one role may see.
///
/// Creating under an unknown parent fails instead of storing an unreachable
/// node, and `delete` removes an entry at any depth together with its
/// subtree.
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::seed_time;
use crate::error::{ServiceError, ServiceResult};
use crate::models::menu::{CreateMenu, Menu, MenuOrder, UpdateMenu};
use crate::permission::filter_by_role;
use crate::repository::Repository;
use crate::tree::{Forest, TreeError};

/// Roles a new menu is visible to when none are given
const DEFAULT_PERMISSIONS: &[&str] = &["user", "admin"];

#[derive(Debug, Default)]
pub struct MenuService {
    store: RwLock<Forest<Menu>>,
}

impl MenuService {
    /// Service with an empty forest
    pub fn new() -> Self {
        Self::default()
    }

    /// Service over the given root entries
    pub fn with_menus(roots: Vec<Menu>) -> Self {
        Self {
            store: RwLock::new(Forest::new(roots)),
        }
    }

    /// Service with the fixture sidebar
    pub fn seeded() -> Self {
        Self::with_menus(seed_menus())
    }

    /// Every entry, active or not, in pre-order with children detached
    pub async fn find_all_flat(&self) -> Vec<Menu> {
        self.store.read().await.flatten()
    }

    /// Active tree pruned to entries `role` may see
    pub async fn find_by_role(&self, role: &str) -> Vec<Menu> {
        let tree = self.store.read().await.build_tree();
        filter_by_role(&tree, role)
    }

    /// Sets `order` on each listed entry; unknown ids are skipped
    ///
    /// Returns the number of entries updated.
    pub async fn reorder(&self, orders: &[MenuOrder]) -> usize {
        let mut store = self.store.write().await;
        let now = Utc::now();
        let mut updated = 0;

        for item in orders {
            match store.find_by_id_mut(&item.id) {
                Some(menu) => {
                    menu.order = item.order;
                    menu.updated_at = now;
                    updated += 1;
                }
                None => tracing::debug!(menu_id = %item.id, "Skipping unknown menu in reorder"),
            }
        }

        tracing::info!(requested = orders.len(), updated, "Menus reordered");
        updated
    }
}

#[async_trait]
impl Repository<Menu, CreateMenu, UpdateMenu> for MenuService {
    async fn list(&self) -> ServiceResult<Vec<Menu>> {
        Ok(self.store.read().await.build_tree())
    }

    async fn get(&self, id: &str) -> ServiceResult<Option<Menu>> {
        Ok(self.store.read().await.find_by_id(id).cloned())
    }

    async fn create(&self, input: CreateMenu) -> ServiceResult<Menu> {
        let mut store = self.store.write().await;
        let parent_id = input.parent_id.as_deref();

        let siblings = store
            .child_count(parent_id)
            .ok_or_else(|| parent_missing(parent_id))?;
        let order = input
            .order
            .unwrap_or_else(|| i32::try_from(siblings).map_or(i32::MAX, |n| n.saturating_add(1)));

        let now = Utc::now();
        let menu = Menu {
            id: crate::new_id(),
            name: input.name,
            path: input.path,
            icon: input.icon,
            parent_id: input.parent_id.clone(),
            order,
            is_active: true,
            permissions: input.permissions.unwrap_or_else(|| {
                DEFAULT_PERMISSIONS.iter().map(|r| r.to_string()).collect()
            }),
            children: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        store
            .insert(menu.clone(), parent_id)
            .map_err(|TreeError::ParentNotFound(id)| parent_missing(Some(&id)))?;

        tracing::info!(menu_id = %menu.id, parent_id = ?menu.parent_id, "Menu created");
        Ok(menu)
    }

    async fn update(&self, id: &str, input: UpdateMenu) -> ServiceResult<Option<Menu>> {
        let mut store = self.store.write().await;
        let Some(menu) = store.find_by_id_mut(id) else {
            return Ok(None);
        };

        if let Some(name) = input.name {
            menu.name = name;
        }
        if let Some(path) = input.path {
            menu.path = path;
        }
        if let Some(icon) = input.icon {
            menu.icon = Some(icon);
        }
        if let Some(order) = input.order {
            menu.order = order;
        }
        if let Some(is_active) = input.is_active {
            menu.is_active = is_active;
        }
        if let Some(permissions) = input.permissions {
            menu.permissions = permissions;
        }
        menu.updated_at = Utc::now();

        tracing::info!(menu_id = %id, "Menu updated");
        Ok(Some(menu.clone()))
    }

    async fn delete(&self, id: &str) -> ServiceResult<bool> {
        let removed = self.store.write().await.remove(id);

        if let Some(menu) = &removed {
            tracing::info!(
                menu_id = %id,
                children = menu.children.len(),
                "Menu deleted"
            );
        }
        Ok(removed.is_some())
    }
}

fn parent_missing(parent_id: Option<&str>) -> ServiceError {
    ServiceError::Validation(format!(
        "Parent menu not found: {}",
        parent_id.unwrap_or_default()
    ))
}

/// Fixture sidebar: dashboard, users, boards, and settings with two children
pub fn seed_menus() -> Vec<Menu> {
    let mut settings = fixture("menu-004", "Settings", "/dashboard/settings", "settings", 4, &["admin"]);
    settings.children = vec![
        fixture("menu-004-1", "Menus", "/dashboard/menus", "menu", 1, &["admin"]),
        fixture("menu-004-2", "Common Codes", "/dashboard/codes", "tag", 2, &["admin"]),
    ];
    for child in &mut settings.children {
        child.parent_id = Some(settings.id.clone());
    }

    vec![
        fixture("menu-001", "Dashboard", "/dashboard", "home", 1, &["user", "admin"]),
        fixture("menu-002", "Users", "/dashboard/users", "users", 2, &["admin"]),
        fixture("menu-003", "Boards", "/dashboard/boards", "file-text", 3, &["user", "admin"]),
        settings,
    ]
}

fn fixture(id: &str, name: &str, path: &str, icon: &str, order: i32, roles: &[&str]) -> Menu {
    Menu {
        id: id.to_string(),
        name: name.to_string(),
        path: path.to_string(),
        icon: Some(icon.to_string()),
        parent_id: None,
        order,
        is_active: true,
        permissions: roles.iter().map(|r| r.to_string()).collect(),
        children: Vec::new(),
        created_at: seed_time(),
        updated_at: seed_time(),
    }
}
