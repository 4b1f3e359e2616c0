use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single failed validation rule: which field and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: &'static str,
}

impl Violation {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Collects violations so that one failed request reports every broken rule,
/// not just the first.
#[derive(Debug, Default)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(Violation::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.0))
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed: {}", join_violations(.0))]
    Validation(Vec<Violation>),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    #[error("authentication required")]
    Unauthenticated,

    #[error("user not authorized")]
    NotOwner,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(String),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl DomainError {
    /// HTTP status the error maps to on the wire.
    ///
    /// `NotOwner` is deliberately 401, not 403: a valid-but-wrong-owner
    /// mutation answers the same status as a missing identity.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::AlreadyExists(_) => 409,
            Self::Unauthenticated | Self::NotOwner | Self::InvalidCredentials => 401,
            Self::Config(_) | Self::Store(_) => 500,
        }
    }

    /// Stable machine-readable error code carried in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::AlreadyExists(_) => "already_exists",
            Self::Unauthenticated => "unauthenticated",
            Self::NotOwner => "unauthorized",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Config(_) => "config_error",
            Self::Store(_) => "store_error",
        }
    }

    /// Wire body shared by both store realizations. Store and config failures
    /// surface as a generic message, internals stay in the logs.
    pub fn to_body(&self) -> ErrorBody {
        let error = match self {
            Self::Config(_) | Self::Store(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        let violations = match self {
            Self::Validation(violations) => {
                violations.iter().map(Violation::to_string).collect()
            }
            _ => Vec::new(),
        };
        ErrorBody {
            code: self.code().to_string(),
            error,
            violations,
        }
    }
}

/// JSON error response shape, identical for the persistent and the simulated
/// store.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::{DomainError, Violations};

    #[test]
    fn violations_into_result_is_ok_when_empty() {
        let violations = Violations::default();
        assert!(violations.into_result().is_ok());
    }

    #[test]
    fn validation_error_reports_every_violation() {
        let mut violations = Violations::default();
        violations.push("title", "is required");
        violations.push("content", "must be at least 10 characters");

        let err = violations
            .into_result()
            .expect_err("violations must produce an error");
        let body = err.to_body();

        assert_eq!(body.code, "validation_error");
        assert_eq!(body.violations.len(), 2);
        assert!(body.error.contains("title is required"));
        assert!(body.error.contains("content must be at least 10 characters"));
    }

    #[test]
    fn not_owner_maps_to_401_not_403() {
        assert_eq!(DomainError::NotOwner.status(), 401);
        assert_eq!(DomainError::NotOwner.code(), "unauthorized");
    }

    #[test]
    fn store_error_body_hides_internals() {
        let err = DomainError::Store("connection refused at 10.0.0.3".to_string());
        let body = err.to_body();
        assert_eq!(body.error, "internal error");
        assert_eq!(body.code, "store_error");
    }

    #[test]
    fn error_body_round_trips_through_json() {
        let body = DomainError::NotFound("post id: abc".to_string()).to_body();
        let raw = serde_json::to_string(&body).expect("must serialize");
        assert!(!raw.contains("violations"));

        let parsed: super::ErrorBody = serde_json::from_str(&raw).expect("must parse");
        assert_eq!(parsed.code, "not_found");
        assert!(parsed.violations.is_empty());
    }
}
