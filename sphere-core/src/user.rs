use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, Violations};

/// Public view of a user; the password hash never leaves the identity store.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Register {
    pub username: String,
    pub password: String,
}

impl Register {
    pub fn validate(self) -> Result<Self, DomainError> {
        let mut violations = Violations::default();

        let username = self.username.trim().to_string();
        let username_len = username.chars().count();
        if username_len < 3 || username_len > 64 {
            violations.push("username", "must be 3..64 characters");
        }
        if self.password.chars().count() < 6 {
            violations.push("password", "must be at least 6 characters");
        }

        violations.into_result()?;
        Ok(Self {
            username,
            password: self.password,
        })
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

impl Login {
    pub fn validate(self) -> Result<Self, DomainError> {
        let mut violations = Violations::default();

        let username = self.username.trim().to_string();
        if username.is_empty() {
            violations.push("username", "is required");
        }
        if self.password.is_empty() {
            violations.push("password", "is required");
        }

        violations.into_result()?;
        Ok(Self {
            username,
            password: self.password,
        })
    }
}

/// Successful login payload: the opaque token plus the derived identity.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: Author,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Login, Register};
    use crate::error::DomainError;

    #[test]
    fn register_trims_username() {
        let req = Register {
            username: "  alice  ".to_string(),
            password: "secret1".to_string(),
        };
        let validated = req.validate().expect("must validate");
        assert_eq!(validated.username, "alice");
    }

    #[test]
    fn register_collects_every_violation() {
        let req = Register {
            username: "ab".to_string(),
            password: "short".to_string(),
        };
        let err = req.validate().expect_err("must be rejected");
        match err {
            DomainError::Validation(violations) => assert_eq!(violations.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn login_rejects_blank_credentials() {
        let req = Login {
            username: "   ".to_string(),
            password: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
