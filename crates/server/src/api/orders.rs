use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{
    domain::OrderId,
    error::ApiError,
    protocol::{CreateOrderRequest, Order, PaymentResult},
};

use super::{parse_id, reject, AdminUser, ApiResult, AuthUser, JsonBody};
use crate::app_state::AppState;

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    JsonBody(req): JsonBody<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = server_api::add_order_items(&state.api, &user, &req)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub(crate) async fn mine(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<Order>>> {
    server_api::get_my_orders(&state.api, &user)
        .await
        .map(Json)
        .map_err(reject)
}

pub(crate) async fn get_by_id(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    let order_id = OrderId(parse_id(&id)?);
    server_api::get_order_by_id(&state.api, &user, order_id)
        .await
        .map(Json)
        .map_err(reject)
}

/// Marks an order paid. The PayPal capture details are optional so the
/// bodiless `GET` form keeps working alongside `PUT` with a JSON body.
pub(crate) async fn pay(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Order>> {
    let order_id = OrderId(parse_id(&id)?);
    let payment = parse_payment(&body)?;
    server_api::update_order_to_paid(&state.api, &user, order_id, payment.as_ref())
        .await
        .map(Json)
        .map_err(reject)
}

/// Capture body as the PayPal buttons post it, with the payer email nested.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PaymentCapture {
    id: String,
    status: String,
    update_time: String,
    email_address: Option<String>,
    payer: Option<Payer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Payer {
    email_address: Option<String>,
}

/// A capture without an id is treated as no capture at all.
pub(super) fn parse_payment(body: &[u8]) -> ApiResult<Option<PaymentResult>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let capture: PaymentCapture = serde_json::from_slice(body)
        .map_err(|e| reject(ApiError::validation(format!("invalid payment result: {e}"))))?;
    if capture.id.trim().is_empty() {
        return Ok(None);
    }
    let email_address = capture
        .email_address
        .or_else(|| capture.payer.and_then(|payer| payer.email_address))
        .unwrap_or_default();
    Ok(Some(PaymentResult {
        id: capture.id,
        status: capture.status,
        update_time: capture.update_time,
        email_address,
    }))
}

pub(crate) async fn deliver(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    let order_id = OrderId(parse_id(&id)?);
    server_api::update_order_to_delivered(&state.api, order_id)
        .await
        .map(Json)
        .map_err(reject)
}

pub(crate) async fn list_all(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<Json<Vec<Order>>> {
    server_api::get_orders(&state.api)
        .await
        .map(Json)
        .map_err(reject)
}
