/// Category service
///
/// Categories share the forest with menus but are never physically
/// removed: deleting one deactivates it and its whole subtree.
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::seed_time;
use crate::error::{ServiceError, ServiceResult};
use crate::models::category::{Category, CreateCategory, UpdateCategory};
use crate::repository::Repository;
use crate::tree::{Forest, TreeNode};

#[derive(Debug, Default)]
pub struct CategoryService {
    store: RwLock<Forest<Category>>,
}

impl CategoryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        Self {
            store: RwLock::new(Forest::new(seed_categories())),
        }
    }

    /// Every category, active or not, in pre-order with children detached
    pub async fn find_all_flat(&self) -> Vec<Category> {
        self.store.read().await.flatten()
    }
}

#[async_trait]
impl Repository<Category, CreateCategory, UpdateCategory> for CategoryService {
    async fn list(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.store.read().await.build_tree())
    }

    async fn get(&self, id: &str) -> ServiceResult<Option<Category>> {
        Ok(self.store.read().await.find_by_id(id).cloned())
    }

    async fn create(&self, input: CreateCategory) -> ServiceResult<Category> {
        let mut store = self.store.write().await;

        let level = match input.parent_id.as_deref() {
            None => 0,
            Some(parent_id) => {
                let parent = store.find_by_id(parent_id).ok_or_else(|| {
                    ServiceError::Validation(format!("Parent category not found: {}", parent_id))
                })?;
                parent.level + 1
            }
        };

        let now = Utc::now();
        let category = Category {
            id: crate::new_id(),
            name: input.name,
            slug: input.slug,
            description: input.description,
            parent_id: input.parent_id,
            level,
            order: input.order.unwrap_or(0),
            is_active: true,
            children: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        store
            .insert(category.clone(), category.parent_id.as_deref())
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        tracing::info!(category_id = %category.id, level, "Category created");
        Ok(category)
    }

    async fn update(&self, id: &str, input: UpdateCategory) -> ServiceResult<Option<Category>> {
        let mut store = self.store.write().await;
        let Some(category) = store.find_by_id_mut(id) else {
            return Ok(None);
        };

        if let Some(name) = input.name {
            category.name = name;
        }
        if let Some(slug) = input.slug {
            category.slug = slug;
        }
        if let Some(description) = input.description {
            category.description = Some(description);
        }
        if let Some(order) = input.order {
            category.order = order;
        }
        if let Some(is_active) = input.is_active {
            category.set_active(is_active);
        }
        category.updated_at = Utc::now();

        Ok(Some(category.clone()))
    }

    async fn delete(&self, id: &str) -> ServiceResult<bool> {
        let mut store = self.store.write().await;
        if !store.deactivate_subtree(id) {
            return Ok(false);
        }

        if let Some(category) = store.find_by_id_mut(id) {
            category.updated_at = Utc::now();
        }
        tracing::info!(category_id = %id, "Category deactivated with its subtree");
        Ok(true)
    }
}

/// Fixture categories: notice, tech (frontend, backend) and general
pub fn seed_categories() -> Vec<Category> {
    let mut tech = fixture("cat-002", "Tech", "tech", 0, 2);
    tech.description = Some("Technical articles".to_string());
    tech.children = vec![
        fixture("cat-002-1", "Frontend", "frontend", 1, 1),
        fixture("cat-002-2", "Backend", "backend", 1, 2),
    ];
    for child in &mut tech.children {
        child.parent_id = Some(tech.id.clone());
    }

    vec![
        fixture("cat-001", "Notice", "notice", 0, 1),
        tech,
        fixture("cat-003", "General", "general", 0, 3),
    ]
}

fn fixture(id: &str, name: &str, slug: &str, level: u32, order: i32) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        slug: slug.to_string(),
        description: None,
        parent_id: None,
        level,
        order,
        is_active: true,
        children: Vec::new(),
        created_at: seed_time(),
        updated_at: seed_time(),
    }
}
