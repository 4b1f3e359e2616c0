pub(crate) mod comment_repository;
pub(crate) mod post_repository;
pub(crate) mod user_repository;

use sphere_core::DomainError;

pub(crate) fn map_db_error(err: sqlx::Error) -> DomainError {
    DomainError::Store(err.to_string())
}
