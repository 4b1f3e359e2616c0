use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use sphere_core::{Comment, DomainError};

#[derive(Debug, Clone)]
pub(crate) struct NewComment {
    pub(crate) id: Uuid,
    pub(crate) post_id: Uuid,
    pub(crate) author_id: Uuid,
    pub(crate) content: String,
    pub(crate) emoji: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[async_trait]
pub(crate) trait CommentRepository: Send + Sync {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError>;
    async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>, DomainError>;
    /// Comments of one post, newest first, optionally narrowed to an exact
    /// emoji (the `all`/absent normalization happens in the service).
    async fn list_comments(
        &self,
        post_id: Uuid,
        emoji: Option<&str>,
    ) -> Result<Vec<Comment>, DomainError>;
    async fn save_comment(&self, comment: &Comment) -> Result<(), DomainError>;
    async fn delete_comment(&self, id: Uuid) -> Result<bool, DomainError>;
    async fn toggle_like(
        &self,
        id: Uuid,
        user: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Comment>, DomainError>;
}
