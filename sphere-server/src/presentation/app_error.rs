use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use sphere_core::DomainError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub(crate) fn unauthenticated() -> Self {
        Self::Domain(DomainError::Unauthenticated)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = match self {
            AppError::Domain(err) => err,
            AppError::Internal(err) => {
                tracing::error!(error = %err, "unhandled internal error");
                DomainError::Store(err.to_string())
            }
        };

        if err.status() >= 500 {
            tracing::error!(error = %err, "request failed");
        }

        let status = StatusCode::from_u16(err.status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(err.to_body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use sphere_core::DomainError;

    use super::AppError;

    #[test]
    fn non_owner_responds_401() {
        let response = AppError::Domain(DomainError::NotOwner).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_error_responds_500() {
        let response = AppError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
