use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::UploadResponse,
};
use tracing::info;

use super::{reject, AdminUser, ApiResult};
use crate::app_state::AppState;

const IMAGE_FIELD: &str = "image";
const MAX_FILENAME_BYTES: usize = 255;

/// Accepted image types as `(extension, mime type)`.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
];

fn validation(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    reject(ApiError::validation(message))
}

fn storage_failed(err: anyhow::Error) -> (StatusCode, Json<ApiError>) {
    tracing::error!(error = ?err, "image storage failed");
    reject(ApiError::internal())
}

fn too_large(limit: usize) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::PAYLOAD_TOO_LARGE,
        Json(ApiError::new(
            ErrorCode::Validation,
            format!("image exceeds {limit} bytes"),
        )),
    )
}

/// Returns the lowercase extension and its mime type when the file name and
/// the declared content type agree on an accepted image format.
pub(crate) fn check_image_type(
    file_name: &str,
    content_type: Option<&str>,
) -> Result<(String, &'static str), String> {
    if file_name.len() > MAX_FILENAME_BYTES {
        return Err("filename is too long".into());
    }
    if file_name.contains('/') || file_name.contains('\\') {
        return Err("filename must not contain path separators".into());
    }
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    let Some((_, mime)) = IMAGE_TYPES.iter().find(|(known, _)| *known == ext) else {
        return Err("Images only (jpg, jpeg, png, webp)".into());
    };
    if let Some(declared) = content_type {
        if !declared.eq_ignore_ascii_case(mime) {
            return Err(format!("content type {declared} does not match .{ext}"));
        }
    }
    Ok((ext, *mime))
}

pub(crate) async fn upload(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            too_large(state.max_upload_bytes)
        } else {
            validation(e.body_text())
        }
    })? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| validation("image field must carry a filename"))?
            .to_string();
        let content_type = field.content_type().map(str::to_string);
        let (ext, mime) =
            check_image_type(&file_name, content_type.as_deref()).map_err(validation)?;

        let body = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                too_large(state.max_upload_bytes)
            } else {
                validation(e.body_text())
            }
        })?;
        if body.is_empty() {
            return Err(validation("image body cannot be empty"));
        }
        if body.len() > state.max_upload_bytes {
            return Err(too_large(state.max_upload_bytes));
        }

        let stored_name = format!(
            "image-{}-{}.{ext}",
            Utc::now().timestamp_millis(),
            &uuid::Uuid::new_v4().simple().to_string()[..8]
        );
        state
            .api
            .storage
            .store_image(admin.id, &stored_name, mime, &body)
            .await
            .map_err(storage_failed)?;
        info!(
            admin_id = admin.id.0,
            name = %stored_name,
            size_bytes = body.len(),
            "image uploaded"
        );

        return Ok(Json(UploadResponse {
            message: "Image uploaded successfully".into(),
            image: format!("/uploads/{stored_name}"),
        }));
    }

    Err(validation("No image uploaded"))
}

pub(crate) async fn serve(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let image = state
        .api
        .storage
        .load_image(&name)
        .await
        .map_err(storage_failed)?
        .ok_or_else(|| reject(ApiError::not_found("Image not found")))?;

    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(&image.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=86400"),
    );
    Ok((headers, image.bytes))
}
