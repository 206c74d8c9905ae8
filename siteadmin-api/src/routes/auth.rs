/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/login` - Login; sets `accessToken` and `refreshToken` cookies
/// - `POST /auth/logout` - Clears both cookies
/// - `GET /auth/me` - Current user profile
/// - `POST /auth/refresh` - New access token from the refresh cookie
/// - `POST /auth/password-reset` - Always succeeds
use crate::{
    app::AppState,
    error::{validate_request, ApiError, ApiResult, AppJson},
    middleware::session::{
        cookie_value, expired_cookie, session_cookie, Session, ACCESS_COOKIE, REFRESH_COOKIE,
    },
    response::ApiResponse,
};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use siteadmin_shared::{
    auth::jwt::TokenType,
    models::user::{AuthUser, ClientInfo, LoginCredentials},
};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Password reset request
#[derive(Debug, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

/// Refresh response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Logs in and sets the session cookies
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "email": "admin@example.com", "password": "admin123" }
/// ```
///
/// # Errors
///
/// - `400 INVALID_INPUT`: Missing email or password
/// - `401 INVALID_CREDENTIALS`: Wrong email or password
/// - `401 ACCOUNT_LOCKED`: Too many recent failures (`Retry-After` is set)
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Response> {
    validate_request(&req)?;

    let client = client_info(&headers);
    let credentials = LoginCredentials {
        email: req.email,
        password: req.password,
    };
    let login = state.auth.login(&credentials, Some(&client)).await?;

    let secure = state.secure_cookies();
    let access = session_cookie(ACCESS_COOKIE, &login.access_token, login.expires_in, secure)?;
    let refresh = session_cookie(
        REFRESH_COOKIE,
        &login.refresh_token,
        TokenType::Refresh.lifetime_secs(),
        secure,
    )?;

    let mut response = ApiResponse::ok(login).into_response();
    response.headers_mut().append(header::SET_COOKIE, access);
    response.headers_mut().append(header::SET_COOKIE, refresh);
    Ok(response)
}

/// Clears the session cookies; succeeds with or without a session
pub async fn logout(State(state): State<AppState>, session: Option<Session>) -> ApiResult<Response> {
    if let Some(Session(ctx)) = session {
        state.auth.logout(&ctx.user_id).await;
    }

    let secure = state.secure_cookies();
    let mut response = ApiResponse::message("Logged out successfully").into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, expired_cookie(ACCESS_COOKIE, secure)?);
    response
        .headers_mut()
        .append(header::SET_COOKIE, expired_cookie(REFRESH_COOKIE, secure)?);
    Ok(response)
}

/// Profile of the session's user
///
/// # Errors
///
/// - `401 UNAUTHORIZED`: No or invalid session
/// - `404 NOT_FOUND`: The user no longer exists
pub async fn me(
    State(state): State<AppState>,
    Session(ctx): Session,
) -> ApiResult<ApiResponse<AuthUser>> {
    let user = state.auth.find_user(&ctx.user_id).await?;
    Ok(ApiResponse::ok(user))
}

/// Issues a new access token from the `refreshToken` cookie
pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let token = cookie_value(&headers, REFRESH_COOKIE)
        .ok_or_else(|| ApiError::Unauthorized("Refresh token missing".to_string()))?;
    let access_token = state.auth.refresh(&token)?;

    let expires_in = TokenType::Access.lifetime_secs();
    let cookie = session_cookie(ACCESS_COOKIE, &access_token, expires_in, state.secure_cookies())?;

    let mut response = ApiResponse::ok(RefreshResponse {
        access_token,
        expires_in,
    })
    .into_response();
    response.headers_mut().append(header::SET_COOKIE, cookie);
    Ok(response)
}

/// Starts a password reset without revealing whether the account exists
pub async fn password_reset(
    State(state): State<AppState>,
    AppJson(req): AppJson<PasswordResetRequest>,
) -> ApiResult<ApiResponse<()>> {
    validate_request(&req)?;
    state.auth.request_password_reset(&req.email).await;

    Ok(ApiResponse::message(
        "If the email is registered, a password reset link has been sent",
    ))
}

/// Client address and user agent for the login log
fn client_info(headers: &HeaderMap) -> ClientInfo {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    ClientInfo {
        ip: header_str("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .or_else(|| header_str("x-real-ip").map(str::to_string)),
        user_agent: header_str("user-agent").map(str::to_string),
    }
}
