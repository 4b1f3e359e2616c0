use axum::{Json, extract::Multipart, extract::State};
use chrono::Utc;

use sphere_core::upload::{UploadKind, sanitize_file_name, validate_upload};
use sphere_core::{DomainError, UploadResponse, Violation};

use crate::presentation::AppState;
use crate::presentation::app_error::{AppError, AppResult};
use crate::presentation::middleware::auth::AuthenticatedUser;

#[utoipa::path(
    post,
    path = "/api/uploads/image",
    tag = "uploads",
    security(("bearer_auth" = [])),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Invalid or missing file", body = sphere_core::ErrorBody),
        (status = 401, description = "Authentication required", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn upload_image(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    store_upload(state, auth, UploadKind::Image, multipart).await
}

#[utoipa::path(
    post,
    path = "/api/uploads/video",
    tag = "uploads",
    security(("bearer_auth" = [])),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video stored", body = UploadResponse),
        (status = 400, description = "Invalid or missing file", body = sphere_core::ErrorBody),
        (status = 401, description = "Authentication required", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn upload_video(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    store_upload(state, auth, UploadKind::Video, multipart).await
}

async fn store_upload(
    state: AppState,
    auth: AuthenticatedUser,
    kind: UploadKind,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let field = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|err| missing_file(err.to_string()))?;
        match field {
            Some(field) if field.name() == Some("file") => break field,
            Some(_) => continue,
            None => return Err(missing_file("multipart field `file` is required".to_string())),
        }
    };

    let filename = field.file_name().unwrap_or(kind.as_str()).to_string();
    let mimetype = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|err| missing_file(err.to_string()))?;

    validate_upload(kind, &mimetype, bytes.len() as u64)?;

    let stored_as = format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        sanitize_file_name(&filename)
    );
    let dir = std::path::Path::new(&state.settings.uploads_dir);
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|err| AppError::Domain(DomainError::Store(err.to_string())))?;
    tokio::fs::write(dir.join(&stored_as), &bytes)
        .await
        .map_err(|err| AppError::Domain(DomainError::Store(err.to_string())))?;

    tracing::info!(
        user_id = %auth.user_id,
        kind = kind.as_str(),
        stored_as = %stored_as,
        size = bytes.len(),
        "upload stored"
    );

    Ok(Json(UploadResponse {
        filename,
        stored_as: stored_as.clone(),
        url: format!("{}/uploads/{stored_as}", state.settings.public_base_url),
        path: format!("/uploads/{stored_as}"),
        size: bytes.len() as u64,
        mimetype,
    }))
}

fn missing_file(detail: String) -> AppError {
    tracing::debug!(detail = %detail, "rejecting malformed upload");
    AppError::Domain(DomainError::Validation(vec![Violation::new(
        "file",
        "is required",
    )]))
}
