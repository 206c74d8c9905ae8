/// Session extraction
///
/// The console keeps its session in two HTTP-only cookies, `accessToken`
/// and `refreshToken`. API clients may send the access token as
/// `Authorization: Bearer <token>` instead; the cookie wins when both are
/// present.
///
/// Handlers that need a caller take [`Session`]; handlers where a caller is
/// optional take `Option<Session>`.
///
/// # Example
///
/// ```no_run
/// use siteadmin_api::middleware::session::Session;
///
/// async fn whoami(Session(ctx): Session) -> String {
///     ctx.user_id
/// }
/// ```
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
};
use cookie::{time::Duration, Cookie, SameSite};
use siteadmin_shared::auth::AuthContext;

use crate::{app::AppState, error::ApiError};

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct Session(pub AuthContext);

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<AuthContext>() {
            return Ok(Session(ctx.clone()));
        }

        let token = access_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;
        let ctx = state.auth.authenticate(&token)?;

        parts.extensions.insert(ctx.clone());
        Ok(Session(ctx))
    }
}

/// Access token from the `accessToken` cookie or a Bearer header
pub fn access_token(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, ACCESS_COOKIE).or_else(|| bearer_token(headers).map(str::to_string))
}

/// Value of the named cookie across all `Cookie` headers
///
/// Quoted values are unwrapped. Malformed pairs are skipped, and an empty
/// value counts as absent.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|value| !value.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` value for an HTTP-only session cookie
///
/// # Errors
///
/// `InternalError` if the value contains characters not allowed in a header
pub fn session_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> Result<HeaderValue, ApiError> {
    let cookie = Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_secs))
        .secure(secure)
        .build();

    HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| ApiError::InternalError(format!("Invalid cookie value: {}", e)))
}

/// `Set-Cookie` value that expires the named cookie
pub fn expired_cookie(name: &str, secure: bool) -> Result<HeaderValue, ApiError> {
    session_cookie(name, "", 0, secure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_cookie_value() {
        let map = headers(&[
            (header::COOKIE, "theme=dark; accessToken=abc.def"),
            (header::COOKIE, "refreshToken=xyz"),
        ]);

        assert_eq!(cookie_value(&map, "accessToken").as_deref(), Some("abc.def"));
        assert_eq!(cookie_value(&map, "refreshToken").as_deref(), Some("xyz"));
        assert_eq!(cookie_value(&map, "missing"), None);
    }

    #[test]
    fn test_quoted_cookie_value_is_unwrapped() {
        let map = headers(&[(header::COOKIE, "theme=dark; accessToken=\"abc.def\"")]);
        assert_eq!(cookie_value(&map, "accessToken").as_deref(), Some("abc.def"));
        assert_eq!(access_token(&map).as_deref(), Some("abc.def"));
    }

    #[test]
    fn test_malformed_pairs_are_skipped() {
        let map = headers(&[(header::COOKIE, "garbage; =nameless; accessToken=tok")]);
        assert_eq!(cookie_value(&map, "accessToken").as_deref(), Some("tok"));
    }

    #[test]
    fn test_cookie_preferred_over_bearer() {
        let map = headers(&[
            (header::AUTHORIZATION, "Bearer from-header"),
            (header::COOKIE, "accessToken=from-cookie"),
        ]);
        assert_eq!(access_token(&map).as_deref(), Some("from-cookie"));

        let map = headers(&[(header::AUTHORIZATION, "Bearer from-header")]);
        assert_eq!(access_token(&map).as_deref(), Some("from-header"));

        let map = headers(&[(header::AUTHORIZATION, "Basic dXNlcg==")]);
        assert_eq!(access_token(&map), None);
    }

    #[test]
    fn test_empty_cookie_is_absent() {
        let map = headers(&[(header::COOKIE, "accessToken=")]);
        assert_eq!(access_token(&map), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(ACCESS_COOKIE, "tok", 3600, false).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("accessToken=tok;"));
        for attribute in ["Path=/", "HttpOnly", "SameSite=Lax", "Max-Age=3600"] {
            assert!(cookie.contains(attribute), "{} in {}", attribute, cookie);
        }
        assert!(!cookie.contains("Secure"));

        let cookie = expired_cookie(REFRESH_COOKIE, true).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("refreshToken=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("; Secure"));
    }
}
