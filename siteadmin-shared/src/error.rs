//! Typed failures returned by every service.
//!
//! The HTTP layer maps each variant to a status and a stable machine code,
//! switching on the variant and never on the message text.

use crate::auth::{jwt::JwtError, password::PasswordError};

/// Result alias used by all services
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Closed set of failure kinds produced by the core
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Ownership or permission violation
    #[error("{0}")]
    Forbidden(String),

    /// Too many recent failed logins for this account
    #[error("Account is locked after too many failed login attempts")]
    AccountLocked {
        /// Seconds until the oldest counted failure leaves the window
        retry_after_secs: i64,
    },

    /// Email or password did not match
    #[error("Invalid email or password ({remaining_attempts} attempts remaining)")]
    InvalidCredentials { remaining_attempts: usize },

    /// Missing, invalid or expired session
    #[error("{0}")]
    Unauthorized(String),

    /// Business rule violation (duplicate slug, protected record, ...)
    #[error("{0}")]
    Conflict(String),

    /// Anything else
    #[error("{0}")]
    Unexpected(String),
}

impl ServiceError {
    /// Shorthand for [`ServiceError::NotFound`]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Unexpected(format!("Password operation failed: {}", err))
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ServiceError::Unexpected(msg),
            JwtError::Expired => ServiceError::Unauthorized("Session expired".to_string()),
            other => ServiceError::Unauthorized(format!("Invalid session: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = ServiceError::not_found("Menu", "menu-404");
        assert_eq!(err.to_string(), "Menu not found: menu-404");

        let err = ServiceError::InvalidCredentials { remaining_attempts: 3 };
        assert!(err.to_string().contains("3 attempts remaining"));
    }

    #[test]
    fn test_expired_jwt_maps_to_unauthorized() {
        let err: ServiceError = JwtError::Expired.into();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }
}
