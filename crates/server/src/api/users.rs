use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{
    domain::UserId,
    protocol::{
        AdminUpdateUserRequest, LoginRequest, MessageResponse, RegisterRequest,
        UpdateProfileRequest, UserProfile,
    },
};
use tracing::info;

use super::{
    cleared_cookie, parse_id, reject, session_cookie, AdminUser, ApiResult, AuthUser, JsonBody,
};
use crate::app_state::AppState;

pub(crate) async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<(CookieJar, Json<UserProfile>)> {
    let (profile, token) = server_api::authenticate(&state.api, &req.email, &req.password)
        .await
        .map_err(reject)?;
    Ok((jar.add(session_cookie(&state, token)), Json(profile)))
}

pub(crate) async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<UserProfile>)> {
    let (profile, token) = server_api::register_user(&state.api, &req)
        .await
        .map_err(reject)?;
    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(&state, token)),
        Json(profile),
    ))
}

/// Always answers with an expired cookie, whether or not one was sent.
pub(crate) async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.add(cleared_cookie(&state)),
        Json(MessageResponse::new("Logged out successfully")),
    )
}

pub(crate) async fn profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<UserProfile>> {
    server_api::get_user_profile(&state.api, user.id)
        .await
        .map(Json)
        .map_err(reject)
}

pub(crate) async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    server_api::update_user_profile(&state.api, user.id, &req)
        .await
        .map(Json)
        .map_err(reject)
}

pub(crate) async fn list(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<Json<Vec<UserProfile>>> {
    server_api::list_users(&state.api)
        .await
        .map(Json)
        .map_err(reject)
}

pub(crate) async fn get_by_id(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    let user_id = UserId(parse_id(&id)?);
    server_api::get_user_by_id(&state.api, user_id)
        .await
        .map(Json)
        .map_err(reject)
}

pub(crate) async fn update(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<AdminUpdateUserRequest>,
) -> ApiResult<Json<UserProfile>> {
    let user_id = UserId(parse_id(&id)?);
    let updated = server_api::update_user(&state.api, user_id, &req)
        .await
        .map_err(reject)?;
    info!(admin_id = admin.id.0, user_id = user_id.0, "admin updated user");
    Ok(Json(updated))
}

pub(crate) async fn delete(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let user_id = UserId(parse_id(&id)?);
    let removed = server_api::delete_user(&state.api, user_id)
        .await
        .map_err(reject)?;
    info!(admin_id = admin.id.0, user_id = user_id.0, "admin removed user");
    Ok(Json(removed))
}
