use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

/// Token payload: identity plus issue/expiry instants. Opaque to every other
/// module — nothing outside this service parses a token.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) user_id: Uuid,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

pub(crate) struct JwtService {
    secret: String,
    ttl_seconds: i64,
}

impl JwtService {
    const DEFAULT_TTL_SECONDS: i64 = 24 * 60 * 60;

    pub(crate) fn new(secret: &str, ttl_seconds: i64) -> Self {
        let ttl_seconds = if ttl_seconds > 0 {
            ttl_seconds
        } else {
            Self::DEFAULT_TTL_SECONDS
        };

        JwtService {
            secret: secret.into(),
            ttl_seconds,
        }
    }

    pub(crate) fn issue(&self, user_id: Uuid) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_seconds)).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(JwtError::Encode)
    }

    /// Pure and side-effect-free: fails only for malformed, tampered or
    /// expired tokens.
    pub(crate) fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 10;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(JwtError::Decode)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::JwtService;

    fn service() -> JwtService {
        JwtService::new("0123456789abcdef0123456789abcdef", 3600)
    }

    #[test]
    fn issue_then_verify_round_trips_identity() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id).expect("token must be issued");
        let claims = service.verify(&token).expect("token must verify");

        assert_eq!(claims.user_id, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verify_rejects_tampered_token() {
        let service = service();
        let token = service.issue(Uuid::new_v4()).expect("token must be issued");

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

        assert!(service.verify(&tampered).is_err());
    }

    #[test]
    fn verify_rejects_token_from_other_secret() {
        let issued_by = JwtService::new("00000000000000000000000000000000", 3600);
        let token = issued_by
            .issue(Uuid::new_v4())
            .expect("token must be issued");

        assert!(service().verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        use chrono::Utc;
        use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

        let now = Utc::now().timestamp();
        let claims = super::Claims {
            user_id: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let expired = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("0123456789abcdef0123456789abcdef".as_bytes()),
        )
        .expect("must encode");

        assert!(service().verify(&expired).is_err());
    }
}
