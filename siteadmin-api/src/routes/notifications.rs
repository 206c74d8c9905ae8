/// Notification endpoints
///
/// Every route requires a session and only sees the caller's own
/// notifications, except `POST /notifications` and
/// `POST /notifications/send-template` which address another recipient.
use crate::{
    app::AppState,
    error::{validate_request, ApiError, ApiResult, AppJson},
    middleware::session::Session,
    response::{ApiResponse, Created},
};
use axum::extract::{Path, State};
use serde::Serialize;
use siteadmin_shared::models::notification::{
    CreateNotification, Notification, NotificationTemplate, SendTemplate,
};

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: usize,
}

/// The caller's notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Session(ctx): Session,
) -> ApiResponse<Vec<Notification>> {
    ApiResponse::ok(state.notifications.find_by_user(&ctx.user_id).await)
}

pub async fn unread_count(
    State(state): State<AppState>,
    Session(ctx): Session,
) -> ApiResponse<UnreadCount> {
    let count = state.notifications.unread_count(&ctx.user_id).await;
    ApiResponse::ok(UnreadCount { count })
}

/// Sends a notification; the caller is recorded as the sender
pub async fn create_notification(
    State(state): State<AppState>,
    Session(ctx): Session,
    AppJson(mut input): AppJson<CreateNotification>,
) -> ApiResult<Created<Notification>> {
    validate_request(&input)?;
    input.sender_id = Some(ctx.user_id);
    Ok(Created(state.notifications.create(input).await?))
}

pub async fn list_templates(
    State(state): State<AppState>,
    Session(_): Session,
) -> ApiResponse<Vec<NotificationTemplate>> {
    ApiResponse::ok(state.notifications.templates().await)
}

/// Renders a template and sends it
///
/// # Errors
///
/// - `404 NOT_FOUND`: Unknown or inactive template
pub async fn send_template(
    State(state): State<AppState>,
    Session(ctx): Session,
    AppJson(request): AppJson<SendTemplate>,
) -> ApiResult<Created<Notification>> {
    validate_request(&request)?;
    let notification = state
        .notifications
        .send_from_template(request, Some(&ctx.user_id))
        .await?;
    Ok(Created(notification))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Session(ctx): Session,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Notification>> {
    let notification = state
        .notifications
        .mark_as_read(&id, &ctx.user_id)
        .await
        .ok_or_else(|| not_found(&id))?;
    Ok(ApiResponse::ok(notification))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    Session(ctx): Session,
) -> ApiResponse<MarkedRead> {
    let updated = state.notifications.mark_all_as_read(&ctx.user_id).await;
    ApiResponse::ok(MarkedRead { updated })
}

pub async fn delete_notification(
    State(state): State<AppState>,
    Session(ctx): Session,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    if !state.notifications.delete(&id, &ctx.user_id).await {
        return Err(not_found(&id));
    }
    Ok(ApiResponse::message("Notification deleted"))
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Notification not found: {}", id))
}
