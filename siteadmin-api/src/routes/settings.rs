/// Settings endpoints
///
/// - `GET /settings?category=` - All settings, optionally one category
/// - `GET /settings/site-config` - Aggregated site configuration
/// - `GET /settings/history?key=` - Change history, newest first
/// - `GET /settings/:key`
/// - `PUT /settings/:key` with `{ "value": "..." }` (session required)
use crate::{
    app::AppState,
    error::{ApiError, ApiResult, AppJson, AppQuery},
    middleware::session::Session,
    response::ApiResponse,
};
use axum::extract::{Path, State};
use serde::Deserialize;
use siteadmin_shared::models::setting::{
    Setting, SettingCategory, SettingHistory, SiteConfig, UpdateSetting,
};

#[derive(Debug, Default, Deserialize)]
pub struct SettingListParams {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub key: Option<String>,
}

pub async fn list_settings(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SettingListParams>,
) -> ApiResult<ApiResponse<Vec<Setting>>> {
    let settings = match params.category {
        Some(category) => {
            let category = category
                .parse::<SettingCategory>()
                .map_err(ApiError::BadRequest)?;
            state.settings.find_by_category(category).await
        }
        None => state.settings.find_all().await,
    };
    Ok(ApiResponse::ok(settings))
}

pub async fn site_config(State(state): State<AppState>) -> ApiResponse<SiteConfig> {
    ApiResponse::ok(state.settings.get_site_config().await)
}

pub async fn history(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<HistoryParams>,
) -> ApiResponse<Vec<SettingHistory>> {
    ApiResponse::ok(state.settings.get_history(params.key.as_deref()).await)
}

pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<ApiResponse<Setting>> {
    let setting = state
        .settings
        .find_by_key(&key)
        .await
        .ok_or_else(|| not_found(&key))?;
    Ok(ApiResponse::ok(setting))
}

/// # Errors
///
/// - `400 INVALID_INPUT`: No `value` in the body
/// - `404 NOT_FOUND`: Unknown key
/// - `409 CONFLICT`: The setting is not editable
pub async fn update_setting(
    State(state): State<AppState>,
    Session(ctx): Session,
    Path(key): Path<String>,
    AppJson(input): AppJson<UpdateSetting>,
) -> ApiResult<ApiResponse<Setting>> {
    let value = input
        .value
        .ok_or_else(|| ApiError::BadRequest("value is required".to_string()))?;

    let setting = state
        .settings
        .update(&key, value, &ctx.user_id)
        .await?
        .ok_or_else(|| not_found(&key))?;
    Ok(ApiResponse::ok(setting))
}

fn not_found(key: &str) -> ApiError {
    ApiError::NotFound(format!("Setting not found: {}", key))
}
