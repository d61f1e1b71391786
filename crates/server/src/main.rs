use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use auth::AuthConfig;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    routing::get,
    Json, Router,
};
use server_api::ApiContext;
use shared::error::ApiError;
use storage::Storage;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, prepare_database_url, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings()?;
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(database_url = %database_url, error = %error, "failed to initialize storage");
        error
    })?;

    let state = Arc::new(build_state(storage, &settings));
    let app = build_router(state);

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid server_bind '{}'", settings.server_bind))?;
    info!(%addr, production = settings.production, "storefront api listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(storage: Storage, settings: &Settings) -> AppState {
    let mut api = ApiContext::new(
        storage,
        AuthConfig {
            jwt_secret: settings.jwt_secret.clone(),
            ttl_seconds: settings.jwt_ttl_seconds,
        },
    );
    api.page_size = settings.page_size.max(1);
    AppState::new(api, settings)
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .with_state(state.clone())
        .merge(api::routes(state))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
}

async fn healthz(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match state.api.storage.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            error!(error = %e, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::not_found(format!("Not Found - {}", uri.path()))),
    )
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
