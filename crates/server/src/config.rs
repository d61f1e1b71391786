use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: i64,
    /// Marks cookies `Secure` and refuses the development JWT secret.
    pub production: bool,
    pub paypal_client_id: Option<String>,
    pub max_upload_bytes: usize,
    pub page_size: u32,
}

pub const DEV_JWT_SECRET: &str = "devsecret";

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            database_url: "sqlite://./data/storefront.db".into(),
            jwt_secret: DEV_JWT_SECRET.into(),
            jwt_ttl_seconds: auth::DEFAULT_TTL_SECONDS,
            production: false,
            paypal_client_id: None,
            max_upload_bytes: 5 * 1024 * 1024,
            page_size: server_api::DEFAULT_PAGE_SIZE,
        }
    }
}

/// Defaults, then `server.toml`, then `APP__*` variables, then the bare
/// variable names older deployments still set.
pub fn load_settings() -> anyhow::Result<Settings> {
    let layered: Settings = config::Config::builder()
        .add_source(config::File::with_name("server").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to read configuration")?
        .try_deserialize()
        .context("invalid configuration")?;

    let settings = apply_legacy_env(layered, |key| std::env::var(key).ok());
    validate(&settings)?;
    Ok(settings)
}

pub(crate) fn validate(settings: &Settings) -> anyhow::Result<()> {
    if settings.production && settings.jwt_secret == DEV_JWT_SECRET {
        anyhow::bail!("refusing to start in production with the development JWT secret");
    }
    if !(1..=auth::MAX_TTL_SECONDS).contains(&settings.jwt_ttl_seconds) {
        anyhow::bail!(
            "jwt_ttl_seconds must be between 1 and {}, got {}",
            auth::MAX_TTL_SECONDS,
            settings.jwt_ttl_seconds
        );
    }
    Ok(())
}

pub(crate) fn apply_legacy_env<F>(mut settings: Settings, lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT").and_then(|v| v.trim().parse::<u16>().ok()) {
        let host = settings
            .server_bind
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        settings.server_bind = format!("{host}:{port}");
    }
    if let Some(v) = lookup("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = lookup("JWT_SECRET") {
        settings.jwt_secret = v;
    }
    if let Some(v) = lookup("NODE_ENV") {
        settings.production = v.eq_ignore_ascii_case("production");
    }
    if let Some(v) = lookup("PAYPAL_CLIENT_ID") {
        settings.paypal_client_id = Some(v);
    }
    settings
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    ensure_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

pub(crate) fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:") {
        return raw_database_url.to_string();
    }

    let path = if let Some(path) = raw_database_url.strip_prefix("sqlite://") {
        path
    } else if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        path
    } else if raw_database_url.contains("://") {
        return raw_database_url.to_string();
    } else {
        raw_database_url
    };

    let path = path.replace('\\', "/");
    if has_drive_letter(&path) {
        format!("sqlite:{path}")
    } else {
        format!("sqlite://{path}")
    }
}

fn has_drive_letter(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

fn ensure_parent_dir_exists(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
