use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use sphere_core::{DomainError, Post};

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) id: Uuid,
    pub(crate) author_id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) tags: Vec<String>,
    pub(crate) image_url: Option<String>,
    pub(crate) video_url: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    /// Inserts and returns the post with `author` resolved to its public view.
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    /// Posts ordered by `created_at` descending, optionally one author's only.
    async fn list_posts(&self, author_id: Option<Uuid>) -> Result<Vec<Post>, DomainError>;
    /// Writes back the content fields of an already-loaded post; likes are
    /// only touched through `toggle_like`.
    async fn save_post(&self, post: &Post) -> Result<(), DomainError>;
    async fn delete_post(&self, id: Uuid) -> Result<bool, DomainError>;
    /// Atomic per-document like flip; `None` when the post is absent.
    async fn toggle_like(
        &self,
        id: Uuid,
        user: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, DomainError>;
}
