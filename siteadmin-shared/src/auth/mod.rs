/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 session tokens (access and refresh)
/// - [`context`]: Caller identity handed to services
/// - [`lockout`]: Sliding-window login failure tracking
/// - [`directory`]: In-memory user accounts with password hashes
///
/// # Example
///
/// ```no_run
/// use siteadmin_shared::auth::jwt::{create_token, Claims, TokenType};
/// use siteadmin_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("admin123")?;
/// assert!(verify_password("admin123", &hash)?);
///
/// let claims = Claims::new("user-001", "admin", TokenType::Access);
/// let token = create_token(&claims, "a-development-secret-of-at-least-32-chars")?;
/// # Ok(())
/// # }
/// ```

pub mod context;
pub mod directory;
pub mod jwt;
pub mod lockout;
pub mod password;

pub use context::AuthContext;
