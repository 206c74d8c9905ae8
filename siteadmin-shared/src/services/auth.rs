/// Authentication service
///
/// Runs the login state machine on top of [`LoginAttemptTracker`]:
///
/// 1. a locked email fails with `AccountLocked` before anything else
/// 2. in bypass mode a known email logs in without a password check
/// 3. otherwise the password is verified; a failure is recorded and either
///    reports the remaining attempts or, once the threshold is hit, locks
/// 4. a success clears the whole attempt log and issues a session
///
/// The lockout check, the credential check and the bookkeeping all run
/// while holding the tracker's lock, so two concurrent attempts for the same
/// email cannot both slip under the threshold.
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::auth::directory::UserDirectory;
use crate::auth::jwt::{self, Claims, TokenType};
use crate::auth::lockout::{LoginAttemptTracker, DEFAULT_MAX_FAILURES, DEFAULT_WINDOW_MINUTES};
use crate::auth::AuthContext;
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{AuthUser, ClientInfo, LoginAttempt, LoginCredentials, LoginResponse};

/// Knobs for [`AuthService`]
#[derive(Debug, Clone)]
pub struct AuthOptions {
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,

    /// Accept any known email without checking the password
    pub bypass: bool,

    /// Recent failures that lock an account
    pub max_failures: usize,

    /// Rolling window failures are counted in
    pub lockout_window: Duration,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            jwt_secret: "siteadmin-development-secret-change-me".to_string(),
            bypass: false,
            max_failures: DEFAULT_MAX_FAILURES,
            lockout_window: Duration::minutes(DEFAULT_WINDOW_MINUTES),
        }
    }
}

#[derive(Debug)]
pub struct AuthService {
    options: AuthOptions,
    users: RwLock<UserDirectory>,
    attempts: Mutex<LoginAttemptTracker>,
}

impl AuthService {
    pub fn new(options: AuthOptions, users: UserDirectory) -> Self {
        let tracker = LoginAttemptTracker::new(options.max_failures, options.lockout_window);
        Self {
            options,
            users: RwLock::new(users),
            attempts: Mutex::new(tracker),
        }
    }

    /// Service over the fixture accounts
    ///
    /// # Errors
    ///
    /// `Unexpected` if the fixture password hashes cannot be computed
    pub fn seeded(options: AuthOptions) -> ServiceResult<Self> {
        Ok(Self::new(options, UserDirectory::seeded()?))
    }

    /// Logs in at the current time
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
        client: Option<&ClientInfo>,
    ) -> ServiceResult<LoginResponse> {
        self.login_at(credentials, client, Utc::now()).await
    }

    /// Logs in as of `now`
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank email or password
    /// - `AccountLocked` when the email has too many recent failures
    /// - `InvalidCredentials` with the attempts left before lockout
    pub async fn login_at(
        &self,
        credentials: &LoginCredentials,
        client: Option<&ClientInfo>,
        now: DateTime<Utc>,
    ) -> ServiceResult<LoginResponse> {
        let normalized = credentials.email.trim().to_lowercase();
        let email = normalized.as_str();
        if email.is_empty() || credentials.password.is_empty() {
            return Err(ServiceError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let mut attempts = self.attempts.lock().await;

        if let Some(retry_after) = attempts.retry_after(email, now) {
            tracing::warn!(email, "Login rejected: account locked");
            return Err(ServiceError::AccountLocked {
                retry_after_secs: retry_after.num_seconds().max(1),
            });
        }

        if self.options.bypass {
            let known = self.users.read().await.find_by_email(email).is_some();
            if known {
                attempts.clear(email);
                tracing::info!(email, "Login accepted in bypass mode");
                return self.complete_login(email, now).await;
            }
        }

        let verified = self
            .users
            .read()
            .await
            .verify(email, &credentials.password)?
            .is_some();

        if !verified {
            attempts.record(LoginAttempt::failed(email, client, now));
            let remaining = attempts.remaining_attempts(email, now);

            if remaining == 0 {
                tracing::warn!(email, "Account locked after repeated login failures");
                let retry_after = attempts
                    .retry_after(email, now)
                    .unwrap_or(self.options.lockout_window);
                return Err(ServiceError::AccountLocked {
                    retry_after_secs: retry_after.num_seconds().max(1),
                });
            }

            tracing::info!(email, remaining, "Login failed");
            return Err(ServiceError::InvalidCredentials {
                remaining_attempts: remaining,
            });
        }

        attempts.clear(email);
        tracing::info!(email, "Login succeeded");
        self.complete_login(email, now).await
    }

    async fn complete_login(&self, email: &str, now: DateTime<Utc>) -> ServiceResult<LoginResponse> {
        let user = self
            .users
            .write()
            .await
            .touch_last_login(email, now)
            .ok_or_else(|| ServiceError::not_found("User", email))?;

        let access = Claims::new(&user.id, &user.role.name, TokenType::Access);
        let refresh = Claims::new(&user.id, &user.role.name, TokenType::Refresh);

        Ok(LoginResponse {
            access_token: jwt::create_token(&access, &self.options.jwt_secret)?,
            refresh_token: jwt::create_token(&refresh, &self.options.jwt_secret)?,
            expires_in: TokenType::Access.lifetime_secs(),
            user,
        })
    }

    /// Ends a session
    ///
    /// Tokens are stateless, so this only records the event; the HTTP layer
    /// clears the cookies.
    pub async fn logout(&self, user_id: &str) {
        tracing::info!(user_id, "User logged out");
    }

    /// Starts a password reset
    ///
    /// Always succeeds so callers cannot tell which emails exist.
    pub async fn request_password_reset(&self, email: &str) {
        let known = self.users.read().await.find_by_email(email).is_some();
        tracing::info!(email, known, "Password reset requested");
    }

    /// Validates an access token and returns its caller identity
    pub fn authenticate(&self, access_token: &str) -> ServiceResult<AuthContext> {
        let claims = jwt::validate_access_token(access_token, &self.options.jwt_secret)?;
        Ok(AuthContext::from(claims))
    }

    /// Profile behind an access token
    ///
    /// # Errors
    ///
    /// `Unauthorized` for a bad token, `NotFound` if the user no longer exists
    pub async fn current_user(&self, access_token: &str) -> ServiceResult<AuthUser> {
        let ctx = self.authenticate(access_token)?;
        self.find_user(&ctx.user_id).await
    }

    pub async fn find_user(&self, user_id: &str) -> ServiceResult<AuthUser> {
        self.users
            .read()
            .await
            .find_by_id(user_id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("User", user_id))
    }

    /// Exchanges a refresh token for a new access token
    pub fn refresh(&self, refresh_token: &str) -> ServiceResult<String> {
        Ok(jwt::refresh_access_token(
            refresh_token,
            &self.options.jwt_secret,
        )?)
    }

    /// Attempt log for an email, oldest first
    pub async fn login_attempts(&self, email: &str) -> Vec<LoginAttempt> {
        self.attempts.lock().await.attempts(email).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn service(bypass: bool) -> AuthService {
        AuthService::seeded(AuthOptions {
            bypass,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_login_issues_session() {
        let auth = service(false);
        let response = auth
            .login(&credentials("admin@example.com", "admin123"), None)
            .await
            .unwrap();

        assert_eq!(response.user.id, "user-001");
        assert_eq!(response.expires_in, 3600);
        assert!(response.user.last_login_at.is_some());

        let ctx = auth.authenticate(&response.access_token).unwrap();
        assert_eq!(ctx, AuthContext::new("user-001", "admin"));
        assert!(auth.authenticate(&response.refresh_token).is_err());

        let user = auth.current_user(&response.access_token).await.unwrap();
        assert_eq!(user.email, "admin@example.com");
    }

    #[tokio::test]
    async fn test_wrong_password_reports_remaining() {
        let auth = service(false);
        let err = auth
            .login(&credentials("user@example.com", "nope"), None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::InvalidCredentials { remaining_attempts: 4 }
        ));
    }

    #[tokio::test]
    async fn test_fifth_failure_locks_and_sixth_is_rejected() {
        let auth = service(false);
        let now = Utc::now();
        let bad = credentials("user@example.com", "nope");

        for expected in (1..=4).rev() {
            let err = auth.login_at(&bad, None, now).await.unwrap_err();
            assert!(matches!(
                err,
                ServiceError::InvalidCredentials { remaining_attempts } if remaining_attempts == expected
            ));
        }

        let err = auth.login_at(&bad, None, now).await.unwrap_err();
        assert!(matches!(err, ServiceError::AccountLocked { .. }));

        // Correct password is still rejected while locked.
        let good = credentials("user@example.com", "user123");
        let err = auth.login_at(&good, None, now).await.unwrap_err();
        match err {
            ServiceError::AccountLocked { retry_after_secs } => {
                assert_eq!(retry_after_secs, 30 * 60)
            }
            other => panic!("expected lockout, got {:?}", other),
        }

        // Once the failures age out the account opens up again.
        let later = now + Duration::minutes(31);
        assert!(auth.login_at(&good, None, later).await.is_ok());
        assert!(auth.login_attempts("user@example.com").await.is_empty());
    }

    #[tokio::test]
    async fn test_success_resets_counter() {
        let auth = service(false);
        let now = Utc::now();
        let bad = credentials("user@example.com", "nope");

        for _ in 0..4 {
            auth.login_at(&bad, None, now).await.unwrap_err();
        }
        auth.login_at(&credentials("user@example.com", "user123"), None, now)
            .await
            .unwrap();

        let err = auth.login_at(&bad, None, now).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidCredentials { remaining_attempts: 4 }
        ));
    }

    #[tokio::test]
    async fn test_unknown_email_counts_failures() {
        let auth = service(true);
        let err = auth
            .login(&credentials("ghost@example.com", "whatever"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidCredentials { .. }));
        assert_eq!(auth.login_attempts("ghost@example.com").await.len(), 1);
    }

    #[tokio::test]
    async fn test_bypass_skips_password_check() {
        let auth = service(true);
        let response = auth
            .login(&credentials("USER@example.com", "anything"), None)
            .await
            .unwrap();
        assert_eq!(response.user.role.name, "user");
    }

    #[tokio::test]
    async fn test_bypass_still_honours_lockout() {
        let auth = service(false);
        let now = Utc::now();
        for _ in 0..5 {
            let _ = auth
                .login_at(&credentials("admin@example.com", "nope"), None, now)
                .await;
        }

        // Same tracker, bypass mode on.
        let bypassing = AuthService {
            options: AuthOptions {
                bypass: true,
                ..auth.options.clone()
            },
            users: RwLock::new(UserDirectory::seeded().unwrap()),
            attempts: Mutex::new(auth.attempts.lock().await.clone()),
        };
        let err = bypassing
            .login_at(&credentials("admin@example.com", "anything"), None, now)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AccountLocked { .. }));
    }

    #[tokio::test]
    async fn test_blank_credentials_are_invalid_input() {
        let auth = service(false);
        let err = auth.login(&credentials(" ", ""), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_refresh() {
        let auth = service(false);
        let response = auth
            .login(&credentials("user@example.com", "user123"), None)
            .await
            .unwrap();

        let access = auth.refresh(&response.refresh_token).unwrap();
        assert_eq!(auth.authenticate(&access).unwrap().user_id, "user-002");
        assert!(auth.refresh(&response.access_token).is_err());
    }

    #[tokio::test]
    async fn test_client_info_is_recorded() {
        let auth = service(false);
        let client = ClientInfo {
            ip: Some("192.0.2.1".to_string()),
            user_agent: Some("tests".to_string()),
        };
        let _ = auth
            .login(&credentials("user@example.com", "nope"), Some(&client))
            .await;

        let attempts = auth.login_attempts("user@example.com").await;
        assert_eq!(attempts[0].ip, "192.0.2.1");
        assert!(!attempts[0].success);
    }
}
