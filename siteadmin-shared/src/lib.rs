//! # SiteAdmin Shared Library
//!
//! Domain types, in-memory stores and business logic for the SiteAdmin
//! console. The API server wraps these services in HTTP handlers; nothing in
//! this crate knows about HTTP.
//!
//! ## Module Organization
//!
//! - `models`: Entities and their create/update inputs
//! - `tree`: Generic forest used by menus and categories
//! - `permission`: Role-based pruning of menu trees
//! - `query`: Post filtering, search, ordering and pagination
//! - `auth`: Password hashing, session tokens, login lockout
//! - `repository`: The list/get/create/update/delete contract
//! - `services`: One service per module, each owning its store
//! - `error`: Typed service failures

pub mod auth;
pub mod error;
pub mod models;
pub mod permission;
pub mod query;
pub mod repository;
pub mod services;
pub mod tree;

pub use error::{ServiceError, ServiceResult};
pub use repository::Repository;

/// Current version of the SiteAdmin shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generates an identifier for a newly created record.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_new_id_is_unique() {
        assert_ne!(new_id(), new_id());
    }
}
