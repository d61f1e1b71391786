use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{
    domain::ProductId,
    protocol::{MessageResponse, Product, ProductPage, ProductUpdateRequest, ReviewRequest},
};
use tracing::info;

use super::{parse_id, reject, AdminUser, ApiResult, AuthUser, JsonBody};
use crate::app_state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductQuery {
    keyword: Option<String>,
    page_number: Option<u32>,
}

pub(crate) async fn list(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ProductQuery>,
) -> ApiResult<Json<ProductPage>> {
    server_api::list_products(&state.api, q.keyword.as_deref(), q.page_number)
        .await
        .map(Json)
        .map_err(reject)
}

pub(crate) async fn top(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Product>>> {
    server_api::top_products(&state.api)
        .await
        .map(Json)
        .map_err(reject)
}

pub(crate) async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let product_id = ProductId(parse_id(&id)?);
    server_api::get_product(&state.api, product_id)
        .await
        .map(Json)
        .map_err(reject)
}

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = server_api::create_product(&state.api, &admin)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub(crate) async fn update(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ProductUpdateRequest>,
) -> ApiResult<Json<Product>> {
    let product_id = ProductId(parse_id(&id)?);
    let product = server_api::update_product(&state.api, product_id, &req)
        .await
        .map_err(reject)?;
    info!(admin_id = admin.id.0, product_id = product_id.0, "product updated");
    Ok(Json(product))
}

pub(crate) async fn delete(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let product_id = ProductId(parse_id(&id)?);
    let removed = server_api::delete_product(&state.api, product_id)
        .await
        .map_err(reject)?;
    info!(admin_id = admin.id.0, product_id = product_id.0, "product removed");
    Ok(Json(removed))
}

pub(crate) async fn review(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ReviewRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let product_id = ProductId(parse_id(&id)?);
    let added = server_api::create_review(&state.api, &user, product_id, &req)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(added)))
}
