use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, FromRequest, FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::{
    extract::cookie::{Cookie, CookieJar, SameSite},
    headers::{authorization::Bearer, Authorization, HeaderMapExt},
};
use serde::de::DeserializeOwned;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{PaypalConfig, UserProfile},
};

use tower_http::limit::RequestBodyLimitLayer;

use crate::app_state::AppState;

mod orders;
mod products;
mod uploads;
mod users;

pub(crate) type Rejection = (StatusCode, Json<ApiError>);
pub(crate) type ApiResult<T> = Result<T, Rejection>;

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn reject(err: ApiError) -> Rejection {
    (status_for(err.code), Json(err))
}

/// Record ids in paths are positive integers. Anything else is reported the
/// same way as an id that does not exist.
pub(crate) fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| reject(ApiError::not_found(server_api::RESOURCE_NOT_FOUND)))
}

/// Session token from the `jwt` cookie, or from an `Authorization: Bearer`
/// header for non-browser clients.
pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = CookieJar::from_headers(headers)
        .get(auth::SESSION_COOKIE)
        .map(|cookie| cookie.value_trimmed().trim().to_string())
        .filter(|token| !token.is_empty());
    if from_cookie.is_some() {
        return from_cookie;
    }

    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().trim().to_string())
        .filter(|token| !token.is_empty())
}

pub(crate) fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((auth::SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Strict)
        .secure(state.secure_cookies)
        .max_age(time::Duration::seconds(state.api.auth.ttl_seconds.max(0)))
        .build()
}

/// Expired, empty session cookie with the same attributes as the live one.
pub(crate) fn cleared_cookie(state: &AppState) -> Cookie<'static> {
    let mut cookie = session_cookie(state, String::new());
    cookie.make_removal();
    cookie
}

/// JSON request body whose parse failures answer with an `ApiError` body.
pub(crate) struct JsonBody<T>(pub(crate) T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| reject(ApiError::validation(e.body_text())))?;
        Ok(JsonBody(value))
    }
}

/// Signed-in user, resolved from the session token.
pub(crate) struct AuthUser(pub(crate) UserProfile);

/// Signed-in user whose account carries the admin flag.
pub(crate) struct AdminUser(pub(crate) UserProfile);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = Rejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers)
            .ok_or_else(|| reject(ApiError::unauthorized("Not authorized, no token")))?;
        server_api::load_session_user(&state.api, &token)
            .await
            .map(AuthUser)
            .map_err(reject)
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = Rejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            tracing::warn!(user_id = user.id.0, "non-admin hit an admin route");
            return Err(reject(ApiError::forbidden("Not authorized as admin")));
        }
        Ok(AdminUser(user))
    }
}

pub(crate) fn routes(state: Arc<AppState>) -> Router {
    // Multipart framing needs headroom over the raw image size.
    let upload_limit = state.max_upload_bytes.saturating_add(64 * 1024);

    Router::new()
        .route("/api/users", post(users::register).get(users::list))
        .route("/api/users/auth", post(users::login))
        .route("/api/users/logout", post(users::logout))
        .route(
            "/api/users/profile",
            get(users::profile).put(users::update_profile),
        )
        .route(
            "/api/users/:id",
            get(users::get_by_id)
                .put(users::update)
                .delete(users::delete),
        )
        .route("/api/products", get(products::list).post(products::create))
        .route("/api/products/top", get(products::top))
        .route(
            "/api/products/:id",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/api/products/:id/reviews", post(products::review))
        .route("/api/orders", post(orders::create).get(orders::list_all))
        .route("/api/orders/", get(orders::list_all))
        .route("/api/orders/myorders", get(orders::mine))
        .route("/api/orders/:id", get(orders::get_by_id))
        .route("/api/orders/:id/pay", get(orders::pay).put(orders::pay))
        .route("/api/orders/:id/deliver", put(orders::deliver))
        .route(
            "/api/upload",
            post(uploads::upload)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(upload_limit)),
        )
        .route("/uploads/:name", get(uploads::serve))
        .route("/api/config/paypal", get(paypal_config))
        .with_state(state)
}

async fn paypal_config(State(state): State<Arc<AppState>>) -> Json<PaypalConfig> {
    Json(PaypalConfig {
        client_id: state.paypal_client_id.clone(),
    })
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
