use auth::{hash_password, mint_token, verify_password, verify_token};
use shared::{
    domain::UserId,
    error::ApiError,
    protocol::{
        AdminUpdateUserRequest, MessageResponse, RegisterRequest, UpdateProfileRequest,
        UserProfile,
    },
};
use storage::{NewUser, StoredUser, UserChanges};
use tracing::{info, warn};

use crate::{internal, ApiContext};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const USER_EXISTS: &str = "User already exists";

/// The email check above races with concurrent writers; the UNIQUE index has
/// the final word.
fn user_write_failed(err: anyhow::Error) -> ApiError {
    if storage::is_unique_violation(&err) {
        return ApiError::validation(USER_EXISTS);
    }
    internal(err)
}

pub(crate) fn to_profile(user: StoredUser) -> UserProfile {
    UserProfile {
        id: user.user_id,
        name: user.name,
        email: user.email,
        is_admin: user.is_admin,
    }
}

fn normalize_email(raw: &str) -> Result<String, ApiError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::validation("Please provide a valid email"));
    }
    Ok(email)
}

fn require_name(raw: &str) -> Result<String, ApiError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    Ok(name.to_string())
}

fn require_password(raw: &str) -> Result<&str, ApiError> {
    if raw.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }
    Ok(raw)
}

fn issue_token(ctx: &ApiContext, user_id: UserId) -> Result<String, ApiError> {
    mint_token(&ctx.auth, user_id)
        .map_err(|e| internal(anyhow::anyhow!("token mint failed: {e}")))
}

fn hash(password: &str) -> Result<String, ApiError> {
    hash_password(password).map_err(|e| internal(anyhow::anyhow!(e)))
}

async fn ensure_email_free(
    ctx: &ApiContext,
    email: &str,
    owner: Option<UserId>,
) -> Result<(), ApiError> {
    let existing = ctx
        .storage
        .find_user_by_email(email)
        .await
        .map_err(internal)?;
    match existing {
        Some(user) if Some(user.user_id) != owner => {
            Err(ApiError::validation(USER_EXISTS))
        }
        _ => Ok(()),
    }
}

async fn load(ctx: &ApiContext, user_id: UserId) -> Result<StoredUser, ApiError> {
    ctx.storage
        .load_user(user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// Checks credentials and returns the profile plus a fresh session token.
pub async fn authenticate(
    ctx: &ApiContext,
    email: &str,
    password: &str,
) -> Result<(UserProfile, String), ApiError> {
    let email = email.trim().to_lowercase();
    let user = ctx
        .storage
        .find_user_by_email(&email)
        .await
        .map_err(internal)?
        .filter(|user| verify_password(password, &user.password_hash))
        .ok_or_else(|| {
            warn!(%email, "rejected login");
            ApiError::unauthorized(INVALID_CREDENTIALS)
        })?;

    let token = issue_token(ctx, user.user_id)?;
    Ok((to_profile(user), token))
}

pub async fn register_user(
    ctx: &ApiContext,
    req: &RegisterRequest,
) -> Result<(UserProfile, String), ApiError> {
    let name = require_name(&req.name)?;
    let email = normalize_email(&req.email)?;
    let password_hash = hash(require_password(&req.password)?)?;
    ensure_email_free(ctx, &email, None).await?;

    let user_id = ctx
        .storage
        .create_user(&NewUser {
            name: &name,
            email: &email,
            password_hash: &password_hash,
            is_admin: false,
        })
        .await
        .map_err(user_write_failed)?;
    info!(user_id = user_id.0, "registered user");

    let token = issue_token(ctx, user_id)?;
    Ok((
        UserProfile {
            id: user_id,
            name,
            email,
            is_admin: false,
        },
        token,
    ))
}

/// Resolves a session token to the user it was issued for.
pub async fn load_session_user(ctx: &ApiContext, token: &str) -> Result<UserProfile, ApiError> {
    let user_id = verify_token(&ctx.auth, token).map_err(|e| {
        warn!(error = %e, "rejected session token");
        ApiError::unauthorized("Not authorized, token failed")
    })?;
    ctx.storage
        .load_user(user_id)
        .await
        .map_err(internal)?
        .map(to_profile)
        .ok_or_else(|| ApiError::unauthorized("Not authorized, token failed"))
}

pub async fn get_user_profile(ctx: &ApiContext, user_id: UserId) -> Result<UserProfile, ApiError> {
    load(ctx, user_id).await.map(to_profile)
}

pub async fn update_user_profile(
    ctx: &ApiContext,
    user_id: UserId,
    req: &UpdateProfileRequest,
) -> Result<UserProfile, ApiError> {
    load(ctx, user_id).await?;

    let name = req.name.as_deref().map(require_name).transpose()?;
    let email = req.email.as_deref().map(normalize_email).transpose()?;
    if let Some(email) = email.as_deref() {
        ensure_email_free(ctx, email, Some(user_id)).await?;
    }
    let password_hash = match req.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => Some(hash(password)?),
        None => None,
    };

    ctx.storage
        .update_user(
            user_id,
            &UserChanges {
                name,
                email,
                password_hash,
                is_admin: None,
            },
        )
        .await
        .map_err(user_write_failed)?;

    get_user_profile(ctx, user_id).await
}

pub async fn list_users(ctx: &ApiContext) -> Result<Vec<UserProfile>, ApiError> {
    let users = ctx.storage.list_users().await.map_err(internal)?;
    Ok(users.into_iter().map(to_profile).collect())
}

pub async fn get_user_by_id(ctx: &ApiContext, user_id: UserId) -> Result<UserProfile, ApiError> {
    get_user_profile(ctx, user_id).await
}

pub async fn update_user(
    ctx: &ApiContext,
    user_id: UserId,
    req: &AdminUpdateUserRequest,
) -> Result<UserProfile, ApiError> {
    load(ctx, user_id).await?;

    let name = req.name.as_deref().map(require_name).transpose()?;
    let email = req.email.as_deref().map(normalize_email).transpose()?;
    if let Some(email) = email.as_deref() {
        ensure_email_free(ctx, email, Some(user_id)).await?;
    }

    ctx.storage
        .update_user(
            user_id,
            &UserChanges {
                name,
                email,
                password_hash: None,
                is_admin: req.is_admin,
            },
        )
        .await
        .map_err(user_write_failed)?;

    get_user_profile(ctx, user_id).await
}

pub async fn delete_user(ctx: &ApiContext, user_id: UserId) -> Result<MessageResponse, ApiError> {
    let user = load(ctx, user_id).await?;
    if user.is_admin {
        return Err(ApiError::validation("Can not delete admin user"));
    }
    ctx.storage.delete_user(user_id).await.map_err(internal)?;
    info!(user_id = user_id.0, "deleted user");
    Ok(MessageResponse::new("User removed"))
}
