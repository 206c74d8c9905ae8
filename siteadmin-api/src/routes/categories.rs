/// Category endpoints
///
/// `GET /categories` returns the active tree, `?flat=true` every category
/// (active or not) in pre-order. Deleting deactivates the whole subtree.
use crate::{
    app::AppState,
    error::{validate_request, ApiError, ApiResult, AppJson, AppQuery},
    response::{ApiResponse, Created},
};
use axum::extract::{Path, State};
use serde::Deserialize;
use siteadmin_shared::{
    models::category::{Category, CreateCategory, UpdateCategory},
    Repository,
};

#[derive(Debug, Default, Deserialize)]
pub struct CategoryListParams {
    pub flat: Option<bool>,
}

pub async fn list_categories(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<CategoryListParams>,
) -> ApiResult<ApiResponse<Vec<Category>>> {
    let categories = if params.flat.unwrap_or(false) {
        state.categories.find_all_flat().await
    } else {
        state.categories.list().await?
    };
    Ok(ApiResponse::ok(categories))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Category>> {
    let category = state
        .categories
        .get(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(ApiResponse::ok(category))
}

pub async fn create_category(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCategory>,
) -> ApiResult<Created<Category>> {
    validate_request(&input)?;
    Ok(Created(state.categories.create(input).await?))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateCategory>,
) -> ApiResult<ApiResponse<Category>> {
    validate_request(&input)?;
    let category = state
        .categories
        .update(&id, input)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(ApiResponse::ok(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    if !state.categories.delete(&id).await? {
        return Err(not_found(&id));
    }
    Ok(ApiResponse::message("Category deleted"))
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Category not found: {}", id))
}
