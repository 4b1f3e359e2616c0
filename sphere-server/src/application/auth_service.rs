use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use sphere_core::{AuthResponse, DomainError, Login, MessageResponse, Register};

use crate::data::user_repository::{NewUser, UserRepository};
use crate::infrastructure::jwt::JwtService;

pub(crate) struct AuthService<R: UserRepository> {
    repo: R,
    jwt: Arc<JwtService>,
}

impl<R: UserRepository> AuthService<R> {
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(repo: R, jwt: Arc<JwtService>) -> Self {
        Self { repo, jwt }
    }

    pub(crate) async fn register(&self, req: Register) -> Result<MessageResponse, DomainError> {
        let req = req.validate()?;

        let password_hash = self.hash_password(&req.password)?;
        let new_user = NewUser {
            id: Uuid::new_v4(),
            username: req.username,
            password_hash,
            created_at: Utc::now(),
        };

        let user = self.repo.create_user(new_user).await?;
        tracing::info!(username = %user.username, "user registered");

        Ok(MessageResponse::new("User registered successfully"))
    }

    pub(crate) async fn login(&self, req: Login) -> Result<AuthResponse, DomainError> {
        let req = req.validate()?;

        let creds = match self.repo.find_by_username(&req.username).await? {
            Some(creds) => creds,
            None => {
                // стремимся к одинаковому времени проверки если user не найден
                match self.verify_password(&req.password, Self::DUMMY_PASSWORD_HASH) {
                    Ok(()) | Err(DomainError::InvalidCredentials) => {}
                    Err(err) => return Err(err),
                }
                return Err(DomainError::InvalidCredentials);
            }
        };

        self.verify_password(&req.password, &creds.password_hash)?;

        let token = self
            .jwt
            .issue(creds.user.id)
            .map_err(|err| DomainError::Store(err.to_string()))?;

        Ok(AuthResponse {
            token,
            user: creds.user,
        })
    }

    pub(crate) fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Store(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    pub(crate) fn verify_password(
        &self,
        raw_password: &str,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Store(err.to_string()))?;
        Self::argon2()?
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .map_err(|err| match err {
                PasswordHashError::Password => DomainError::InvalidCredentials,
                _ => DomainError::Store(err.to_string()),
            })?;

        Ok(())
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Store(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
