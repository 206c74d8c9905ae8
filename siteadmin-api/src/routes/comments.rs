/// Comment endpoints
///
/// - `GET /posts/:id/comments` - Live comments, oldest first
/// - `POST /posts/:id/comments` - Add a comment (session required)
/// - `PUT /comments/:id` - Author-only edit (session required)
/// - `DELETE /comments/:id` - Author-only soft delete (session required)
use crate::{
    app::AppState,
    error::{validate_request, ApiError, ApiResult, AppJson},
    middleware::session::Session,
    response::{ApiResponse, Created},
};
use axum::extract::{Path, State};
use siteadmin_shared::models::board::{Comment, CreateComment, UpdateComment};

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<ApiResponse<Vec<Comment>>> {
    Ok(ApiResponse::ok(state.boards.find_comments(&post_id).await?))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Session(ctx): Session,
    Path(post_id): Path<String>,
    AppJson(input): AppJson<CreateComment>,
) -> ApiResult<Created<Comment>> {
    validate_request(&input)?;
    let comment = state
        .boards
        .create_comment(&post_id, input, &ctx.user_id)
        .await?;
    Ok(Created(comment))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Session(ctx): Session,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateComment>,
) -> ApiResult<ApiResponse<Comment>> {
    validate_request(&input)?;
    let comment = state
        .boards
        .update_comment(&id, input, &ctx.user_id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(ApiResponse::ok(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Session(ctx): Session,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    if !state.boards.delete_comment(&id, &ctx.user_id).await? {
        return Err(not_found(&id));
    }
    Ok(ApiResponse::message("Comment deleted"))
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Comment not found: {}", id))
}
