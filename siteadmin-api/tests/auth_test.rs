/// Integration tests for login, session cookies and lockout
mod common;

use axum::http::{header, Method, StatusCode};
use common::{TestContext, ADMIN_EMAIL, ADMIN_PASSWORD, USER_EMAIL};
use serde_json::json;

fn credentials(email: &str, password: &str) -> serde_json::Value {
    json!({ "email": email, "password": password })
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();
    let response = ctx.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "healthy");
    assert_eq!(response.body["data"]["stage"], "poc");
    assert_eq!(
        response.headers.get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
}

#[tokio::test]
async fn test_login_sets_session_cookies() {
    let ctx = TestContext::new();
    let response = ctx
        .post("/auth/login", credentials(ADMIN_EMAIL, ADMIN_PASSWORD), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user"]["email"], ADMIN_EMAIL);
    assert_eq!(response.body["data"]["user"]["role"]["name"], "admin");
    assert_eq!(response.body["data"]["expiresIn"], 3600);

    let cookies = response.set_cookies();
    let access = cookies.iter().find(|c| c.starts_with("accessToken=")).unwrap();
    let refresh = cookies.iter().find(|c| c.starts_with("refreshToken=")).unwrap();
    assert!(access.contains("HttpOnly"));
    assert!(access.contains("Max-Age=3600"));
    assert!(refresh.contains("Max-Age=604800"));
    assert!(!access.contains("Secure"));
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let ctx = TestContext::new();

    let response = ctx
        .post("/auth/login", json!({ "email": ADMIN_EMAIL }), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"]["code"], "INVALID_INPUT");
    assert_eq!(response.body["error"]["details"][0]["field"], "password");

    let response = ctx.post("/auth/login", json!("not an object"), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_me_requires_session() {
    let ctx = TestContext::new();

    let response = ctx.get("/auth/me", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"]["code"], "UNAUTHORIZED");

    let response = ctx.get("/auth/me", Some("accessToken=garbage")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let cookie = ctx.login_user().await;
    let response = ctx.get("/auth/me", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], "user-002");
    assert_eq!(response.body["data"]["email"], USER_EMAIL);
    assert!(response.body["data"]["lastLoginAt"].is_string());

    let quoted = cookie.replacen('=', "=\"", 1) + "\"";
    let response = ctx.get("/auth/me", Some(&quoted)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_password_reports_remaining_attempts() {
    let ctx = TestContext::strict();

    let response = ctx
        .post("/auth/login", credentials(ADMIN_EMAIL, "wrong"), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"]["code"], "INVALID_CREDENTIALS");
    assert!(response.body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("4 attempts remaining"));
}

#[tokio::test]
async fn test_fifth_failure_locks_the_account() {
    let ctx = TestContext::strict();

    for _ in 0..4 {
        let response = ctx
            .post("/auth/login", credentials(ADMIN_EMAIL, "wrong"), None)
            .await;
        assert_eq!(response.body["error"]["code"], "INVALID_CREDENTIALS");
    }

    let response = ctx
        .post("/auth/login", credentials(ADMIN_EMAIL, "wrong"), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"]["code"], "ACCOUNT_LOCKED");
    let retry_after: i64 = response
        .headers
        .get(header::RETRY_AFTER)
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 0 && retry_after <= 30 * 60);

    // The right password does not help while locked
    let response = ctx
        .post("/auth/login", credentials(ADMIN_EMAIL, ADMIN_PASSWORD), None)
        .await;
    assert_eq!(response.body["error"]["code"], "ACCOUNT_LOCKED");

    // Other accounts are unaffected
    ctx.login(USER_EMAIL, common::USER_PASSWORD).await;
}

#[tokio::test]
async fn test_success_resets_failures() {
    let ctx = TestContext::strict();

    for _ in 0..4 {
        ctx.post("/auth/login", credentials(ADMIN_EMAIL, "wrong"), None)
            .await;
    }
    ctx.login_admin().await;

    let response = ctx
        .post("/auth/login", credentials(ADMIN_EMAIL, "wrong"), None)
        .await;
    assert!(response.body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("4 attempts remaining"));
    assert_eq!(ctx.state.auth.login_attempts(ADMIN_EMAIL).await.len(), 1);
}

#[tokio::test]
async fn test_logout_clears_cookies() {
    let ctx = TestContext::new();
    let cookie = ctx.login_admin().await;

    let response = ctx.send(Method::POST, "/auth/logout", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Logged out successfully");

    let cookies = response.set_cookies();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));

    let response = ctx.send(Method::POST, "/auth/logout", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_issues_new_access_cookie() {
    let ctx = TestContext::new();
    let login = ctx
        .post("/auth/login", credentials(ADMIN_EMAIL, ADMIN_PASSWORD), None)
        .await;
    let refresh = login.cookie("refreshToken").unwrap();
    let access = login.cookie("accessToken").unwrap();

    let response = ctx.send(Method::POST, "/auth/refresh", None, Some(&refresh)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["expiresIn"], 3600);

    let new_access = response.cookie("accessToken").unwrap();
    let me = ctx.get("/auth/me", Some(&new_access)).await;
    assert_eq!(me.body["data"]["id"], "user-001");

    // An access token is not accepted as a refresh token
    let swapped = access.replacen("accessToken=", "refreshToken=", 1);
    let response = ctx.send(Method::POST, "/auth/refresh", None, Some(&swapped)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx.send(Method::POST, "/auth/refresh", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_password_reset_never_reveals_accounts() {
    let ctx = TestContext::new();

    let known = ctx
        .post("/auth/password-reset", json!({ "email": ADMIN_EMAIL }), None)
        .await;
    let unknown = ctx
        .post("/auth/password-reset", json!({ "email": "nobody@example.com" }), None)
        .await;

    assert_eq!(known.status, StatusCode::OK);
    assert_eq!(unknown.status, StatusCode::OK);
    assert_eq!(known.body, unknown.body);

    // Malformed addresses get the same answer as unknown ones
    let malformed = ctx
        .post("/auth/password-reset", json!({ "email": "not-an-email" }), None)
        .await;
    assert_eq!(malformed.status, StatusCode::OK);
    assert_eq!(malformed.body, known.body);

    let missing = ctx.post("/auth/password-reset", json!({}), None).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["error"]["details"][0]["field"], "email");

    let empty = ctx
        .post("/auth/password-reset", json!({ "email": "" }), None)
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
}
