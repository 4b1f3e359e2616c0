use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use sphere_core::{Author, DomainError};

use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};

use super::map_db_error;

#[derive(Debug, Clone)]
pub(crate) struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    id: Uuid,
    username: String,
    password_hash: String,
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<Author, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(input.id)
        .bind(&input.username)
        .bind(&input.password_hash)
        .bind(input.created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                DomainError::AlreadyExists(format!("username: {}", input.username))
            } else {
                map_db_error(err)
            }
        })?;

        Ok(Author {
            id: input.id,
            username: input.username,
        })
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let row: Option<CredentialsRow> =
            sqlx::query_as("SELECT id, username, password_hash FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(row.map(|row| UserCredentials {
            user: Author {
                id: row.id,
                username: row.username,
            },
            password_hash: row.password_hash,
        }))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505"))
}
