/// Menu endpoints
///
/// `GET /menus` returns the active tree by default. `?role=<name>` returns
/// the tree pruned to that role and `?flat=true` every menu in pre-order;
/// `role` wins when both are given.
use crate::{
    app::AppState,
    error::{validate_request, ApiError, ApiResult, AppJson, AppQuery},
    response::{ApiResponse, Created},
};
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use siteadmin_shared::{
    models::menu::{CreateMenu, Menu, MenuOrder, UpdateMenu},
    Repository,
};

#[derive(Debug, Default, Deserialize)]
pub struct MenuListParams {
    pub flat: Option<bool>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub orders: Vec<MenuOrder>,
}

#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub updated: usize,
}

pub async fn list_menus(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<MenuListParams>,
) -> ApiResult<ApiResponse<Vec<Menu>>> {
    let menus = match (params.role, params.flat) {
        (Some(role), _) => state.menus.find_by_role(&role).await,
        (None, Some(true)) => state.menus.find_all_flat().await,
        (None, _) => state.menus.list().await?,
    };
    Ok(ApiResponse::ok(menus))
}

pub async fn get_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Menu>> {
    let menu = state.menus.get(&id).await?.ok_or_else(|| not_found(&id))?;
    Ok(ApiResponse::ok(menu))
}

pub async fn create_menu(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateMenu>,
) -> ApiResult<Created<Menu>> {
    validate_request(&input)?;
    Ok(Created(state.menus.create(input).await?))
}

pub async fn update_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateMenu>,
) -> ApiResult<ApiResponse<Menu>> {
    validate_request(&input)?;
    let menu = state
        .menus
        .update(&id, input)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(ApiResponse::ok(menu))
}

pub async fn delete_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    if !state.menus.delete(&id).await? {
        return Err(not_found(&id));
    }
    Ok(ApiResponse::message("Menu deleted"))
}

/// `PUT /menus/reorder` with `{ "orders": [{ "id": "...", "order": 1 }] }`
pub async fn reorder_menus(
    State(state): State<AppState>,
    AppJson(req): AppJson<ReorderRequest>,
) -> ApiResult<ApiResponse<ReorderResponse>> {
    let updated = state.menus.reorder(&req.orders).await;
    Ok(ApiResponse::ok(ReorderResponse { updated }))
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Menu not found: {}", id))
}
