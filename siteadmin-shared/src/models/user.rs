/// User, role and login models
///
/// `AuthUser` is the profile returned by login and `/auth/me`. It never
/// carries the password hash; that lives in the user directory only.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Locked,
    Pending,
}

/// A single grant inside a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,

    /// Machine code (`all`, `read`, ...)
    pub code: String,

    pub name: String,

    /// Module the grant applies to, `*` for every module
    pub module: String,
}

/// Named role with its permission list
///
/// `name` is what menu and board allow-lists match against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub permissions: Vec<Permission>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Authenticated user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Login request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Successful login result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: AuthUser,
    pub access_token: String,
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Where a login attempt came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// One entry in the per-email login log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAttempt {
    pub email: String,
    pub ip: String,
    pub user_agent: String,
    pub success: bool,
    pub attempted_at: DateTime<Utc>,
}

impl LoginAttempt {
    fn new(email: &str, client: Option<&ClientInfo>, success: bool, at: DateTime<Utc>) -> Self {
        let client = client.cloned().unwrap_or_default();
        Self {
            email: email.to_string(),
            ip: client.ip.unwrap_or_else(|| "0.0.0.0".to_string()),
            user_agent: client.user_agent.unwrap_or_else(|| "unknown".to_string()),
            success,
            attempted_at: at,
        }
    }

    pub fn failed(email: &str, client: Option<&ClientInfo>, at: DateTime<Utc>) -> Self {
        Self::new(email, client, false, at)
    }

    pub fn succeeded(email: &str, client: Option<&ClientInfo>, at: DateTime<Utc>) -> Self {
        Self::new(email, client, true, at)
    }
}
