/// Board endpoints
///
/// Lists show active boards only. `DELETE /boards/:id` deactivates the
/// board; boards are never removed.
use crate::{
    app::AppState,
    error::{validate_request, ApiError, ApiResult, AppJson},
    response::{ApiResponse, Created},
};
use axum::extract::{Path, State};
use siteadmin_shared::{
    models::board::{Board, CreateBoard, UpdateBoard},
    Repository,
};

pub async fn list_boards(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<Board>>> {
    Ok(ApiResponse::ok(state.boards.list().await?))
}

pub async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Board>> {
    let board = state
        .boards
        .get(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(ApiResponse::ok(board))
}

pub async fn get_board_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<ApiResponse<Board>> {
    let board = state
        .boards
        .find_board_by_slug(&slug)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Board not found: {}", slug)))?;
    Ok(ApiResponse::ok(board))
}

/// # Errors
///
/// - `400 INVALID_INPUT`: Missing name or slug
/// - `409 CONFLICT`: Slug already taken
pub async fn create_board(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateBoard>,
) -> ApiResult<Created<Board>> {
    validate_request(&input)?;
    Ok(Created(state.boards.create(input).await?))
}

pub async fn update_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateBoard>,
) -> ApiResult<ApiResponse<Board>> {
    validate_request(&input)?;
    let board = state
        .boards
        .update(&id, input)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(ApiResponse::ok(board))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    if !state.boards.delete(&id).await? {
        return Err(not_found(&id));
    }
    Ok(ApiResponse::message("Board deactivated"))
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Board not found: {}", id))
}
