/// Post endpoints
///
/// # Endpoints
///
/// - `GET /boards/:id/posts?page=&pageSize=&search=` - One page of published posts
/// - `POST /boards/:id/posts` - Create (session required)
/// - `GET /posts/:id` - Read; every call counts a view
/// - `PUT /posts/:id` - Author-only update (session required)
/// - `DELETE /posts/:id` - Author-only delete, removes the comments too
use crate::{
    app::AppState,
    error::{validate_request, ApiError, ApiResult, AppJson, AppQuery},
    middleware::session::Session,
    response::{ApiResponse, Created},
};
use axum::extract::{Path, State};
use serde::Deserialize;
use siteadmin_shared::{
    models::board::{CreatePost, Post, UpdatePost},
    query::PostListParams,
};

/// Listing query string
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
}

impl From<PostListQuery> for PostListParams {
    fn from(query: PostListQuery) -> Self {
        Self {
            page: query.page,
            page_size: query.page_size,
            search: query.search,
        }
    }
}

/// Posts are listed pinned first, then newest first
///
/// The page size defaults to the board's `postsPerPage`; `meta` carries
/// the totals.
pub async fn list_posts(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    AppQuery(query): AppQuery<PostListQuery>,
) -> ApiResult<ApiResponse<Vec<Post>>> {
    let page = state.boards.list_posts(&board_id, query.into()).await?;
    Ok(ApiResponse::paginated(page))
}

/// # Errors
///
/// - `400 INVALID_INPUT`: Blank title or content
/// - `401 UNAUTHORIZED`: No session
/// - `403 FORBIDDEN`: The caller's role may not write to this board
/// - `404 NOT_FOUND`: Missing or inactive board
pub async fn create_post(
    State(state): State<AppState>,
    Session(ctx): Session,
    Path(board_id): Path<String>,
    AppJson(input): AppJson<CreatePost>,
) -> ApiResult<Created<Post>> {
    validate_request(&input)?;
    let post = state
        .boards
        .create_post(&board_id, input, &ctx.user_id, Some(&ctx.role))
        .await?;
    Ok(Created(post))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Post>> {
    let post = state
        .boards
        .find_post_by_id(&id)
        .await
        .ok_or_else(|| not_found(&id))?;
    Ok(ApiResponse::ok(post))
}

pub async fn update_post(
    State(state): State<AppState>,
    Session(ctx): Session,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdatePost>,
) -> ApiResult<ApiResponse<Post>> {
    validate_request(&input)?;
    let post = state
        .boards
        .update_post(&id, input, &ctx.user_id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(ApiResponse::ok(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Session(ctx): Session,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    if !state.boards.delete_post(&id, &ctx.user_id).await? {
        return Err(not_found(&id));
    }
    Ok(ApiResponse::message("Post deleted"))
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Post not found: {}", id))
}
