/// Common code endpoints
///
/// - `GET/POST /code-groups`, `GET/PUT/DELETE /code-groups/:id`
/// - `POST /code-groups/:id/codes`, `DELETE /code-groups/:id/codes/:code_id`
/// - `GET /codes/:group_code` - Active codes of a group, by order
///
/// Deleting `USER_STATUS` or `BOARD_TYPE` fails with `409 CONFLICT`.
use crate::{
    app::AppState,
    error::{validate_request, ApiError, ApiResult, AppJson},
    response::{ApiResponse, Created},
};
use axum::extract::{Path, State};
use siteadmin_shared::{
    models::code::{Code, CodeGroup, CreateCode, CreateCodeGroup, UpdateCodeGroup},
    Repository,
};

pub async fn list_groups(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<CodeGroup>>> {
    Ok(ApiResponse::ok(state.codes.list().await?))
}

pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<CodeGroup>> {
    let group = state.codes.get(&id).await?.ok_or_else(|| not_found(&id))?;
    Ok(ApiResponse::ok(group))
}

pub async fn create_group(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCodeGroup>,
) -> ApiResult<Created<CodeGroup>> {
    validate_request(&input)?;
    Ok(Created(state.codes.create(input).await?))
}

pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateCodeGroup>,
) -> ApiResult<ApiResponse<CodeGroup>> {
    validate_request(&input)?;
    let group = state
        .codes
        .update(&id, input)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(ApiResponse::ok(group))
}

pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    if !state.codes.delete(&id).await? {
        return Err(not_found(&id));
    }
    Ok(ApiResponse::message("Code group deleted"))
}

pub async fn add_code(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    AppJson(input): AppJson<CreateCode>,
) -> ApiResult<Created<Code>> {
    validate_request(&input)?;
    Ok(Created(state.codes.add_code(&group_id, input).await?))
}

pub async fn delete_code(
    State(state): State<AppState>,
    Path((group_id, code_id)): Path<(String, String)>,
) -> ApiResult<ApiResponse<()>> {
    if !state.codes.delete_code(&group_id, &code_id).await {
        return Err(ApiError::NotFound(format!("Code not found: {}", code_id)));
    }
    Ok(ApiResponse::message("Code deleted"))
}

pub async fn codes_by_group(
    State(state): State<AppState>,
    Path(group_code): Path<String>,
) -> ApiResponse<Vec<Code>> {
    ApiResponse::ok(state.codes.find_codes_by_group(&group_code).await)
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Code group not found: {}", id))
}
