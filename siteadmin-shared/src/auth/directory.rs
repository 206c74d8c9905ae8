/// In-memory user accounts
///
/// Stands in for a user table: profiles keyed by lower-cased email, each
/// with an Argon2id password hash. Hashing is slow on purpose, so the seed
/// hashes are computed once per process and shared by every directory.
use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};

use super::password::{hash_password, verify_password, PasswordError};
use crate::models::user::{AuthUser, Permission, Role, UserStatus};

struct Account {
    user: AuthUser,
    password_hash: String,
}

/// Email-keyed account store
pub struct UserDirectory {
    accounts: HashMap<String, Account>,
}

impl std::fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectory")
            .field("accounts", &self.accounts.len())
            .finish()
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory {
    /// Empty directory
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    /// Directory holding the two fixture accounts
    ///
    /// - `admin@example.com` / `admin123`, role `admin`
    /// - `user@example.com` / `user123`, role `user`
    ///
    /// # Errors
    ///
    /// Returns `PasswordError` if the fixture hashes cannot be computed
    pub fn seeded() -> Result<Self, PasswordError> {
        static HASHES: OnceLock<(String, String)> = OnceLock::new();

        let (admin_hash, user_hash) = match HASHES.get() {
            Some(hashes) => hashes.clone(),
            None => {
                let hashes = (hash_password("admin123")?, hash_password("user123")?);
                HASHES.get_or_init(|| hashes).clone()
            }
        };

        let mut directory = Self::new();
        directory.insert(mock_admin(), admin_hash);
        directory.insert(mock_user(), user_hash);
        Ok(directory)
    }

    /// Adds or replaces an account
    pub fn insert(&mut self, user: AuthUser, password_hash: String) {
        self.accounts.insert(
            user.email.to_lowercase(),
            Account {
                user,
                password_hash,
            },
        );
    }

    /// Looks up a profile by email, ignoring case
    pub fn find_by_email(&self, email: &str) -> Option<&AuthUser> {
        self.accounts
            .get(&email.trim().to_lowercase())
            .map(|account| &account.user)
    }

    /// Looks up a profile by id
    pub fn find_by_id(&self, id: &str) -> Option<&AuthUser> {
        self.accounts
            .values()
            .map(|account| &account.user)
            .find(|user| user.id == id)
    }

    /// Returns the profile when `email` exists and `password` matches its hash
    ///
    /// # Errors
    ///
    /// Returns `PasswordError` only for a corrupt stored hash
    pub fn verify(&self, email: &str, password: &str) -> Result<Option<&AuthUser>, PasswordError> {
        let Some(account) = self.accounts.get(&email.trim().to_lowercase()) else {
            return Ok(None);
        };

        if verify_password(password, &account.password_hash)? {
            Ok(Some(&account.user))
        } else {
            Ok(None)
        }
    }

    /// Stamps the last login time on a profile
    pub fn touch_last_login(&mut self, email: &str, at: DateTime<Utc>) -> Option<AuthUser> {
        let account = self.accounts.get_mut(&email.trim().to_lowercase())?;
        account.user.last_login_at = Some(at);
        Some(account.user.clone())
    }
}

fn mock_admin() -> AuthUser {
    AuthUser {
        id: "user-001".to_string(),
        email: "admin@example.com".to_string(),
        name: "Administrator".to_string(),
        role: Role {
            id: "role-001".to_string(),
            name: "admin".to_string(),
            permissions: vec![Permission {
                id: "perm-001".to_string(),
                code: "all".to_string(),
                name: "All permissions".to_string(),
                module: "*".to_string(),
            }],
            description: Some("System administrator".to_string()),
        },
        status: UserStatus::Active,
        last_login_at: None,
    }
}

fn mock_user() -> AuthUser {
    AuthUser {
        id: "user-002".to_string(),
        email: "user@example.com".to_string(),
        name: "Regular User".to_string(),
        role: Role {
            id: "role-002".to_string(),
            name: "user".to_string(),
            permissions: vec![Permission {
                id: "perm-002".to_string(),
                code: "read".to_string(),
                name: "Read permission".to_string(),
                module: "*".to_string(),
            }],
            description: Some("Regular user".to_string()),
        },
        status: UserStatus::Active,
        last_login_at: None,
    }
}
