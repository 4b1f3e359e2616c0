use axum::{Json, extract::State, http::StatusCode};

use sphere_core::{AuthResponse, Login, MessageResponse, Register};

use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = Register,
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "Validation error", body = sphere_core::ErrorBody),
        (status = 409, description = "Username taken", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(req): Json<Register>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let result = state.auth_service.register(req).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = Login,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Validation error", body = sphere_core::ErrorBody),
        (status = 401, description = "Invalid credentials", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(req): Json<Login>,
) -> AppResult<Json<AuthResponse>> {
    let result = state.auth_service.login(req).await?;
    Ok(Json(result))
}
