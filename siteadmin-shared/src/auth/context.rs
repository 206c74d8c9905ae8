use serde::{Deserialize, Serialize};

use super::jwt::Claims;

/// Identity of the caller behind a validated session
///
/// Built from access-token claims by the API's session extractor and passed
/// down to services that gate on ownership or role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user id
    pub user_id: String,

    /// Role name (`admin`, `user`, ...)
    pub role: String,
}

impl AuthContext {
    pub fn new(user_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: role.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenType;

    #[test]
    fn test_from_claims() {
        let ctx = AuthContext::from(Claims::new("user-001", "admin", TokenType::Access));
        assert_eq!(ctx, AuthContext::new("user-001", "admin"));
        assert!(ctx.is_admin());
        assert!(!AuthContext::new("user-002", "user").is_admin());
    }
}
