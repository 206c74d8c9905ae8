//! Repository contract
//!
//! The five operations every storage backend for a module must provide.
//! The in-memory services implement it directly; a database-backed store
//! can replace them behind the same trait.
//!
//! # Example
//!
//! ```no_run
//! use siteadmin_shared::Repository;
//! use siteadmin_shared::models::menu::CreateMenu;
//! use siteadmin_shared::services::menu::MenuService;
//!
//! # async fn example() -> siteadmin_shared::ServiceResult<()> {
//! let menus = MenuService::seeded();
//! let created = menus
//!     .create(CreateMenu {
//!         name: "Reports".to_string(),
//!         path: "/dashboard/reports".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! assert!(menus.get(&created.id).await?.is_some());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::ServiceResult;

/// CRUD contract over entities of type `T`, created from `C` and patched by `U`
#[async_trait]
pub trait Repository<T, C, U>: Send + Sync {
    /// Lists entities in the store's default projection
    async fn list(&self) -> ServiceResult<Vec<T>>;

    /// Fetches one entity, `None` when absent
    async fn get(&self, id: &str) -> ServiceResult<Option<T>>;

    /// Creates an entity and returns it
    async fn create(&self, input: C) -> ServiceResult<T>;

    /// Applies a patch, `None` when the entity does not exist
    async fn update(&self, id: &str, input: U) -> ServiceResult<Option<T>>;

    /// Removes (or deactivates) an entity, `false` when it does not exist
    async fn delete(&self, id: &str) -> ServiceResult<bool>;
}
