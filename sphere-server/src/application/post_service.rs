use chrono::Utc;
use uuid::Uuid;

use sphere_core::{CreatePost, DomainError, Post, UpdatePost, require_owner};

use crate::data::post_repository::{NewPost, PostRepository};

pub(crate) struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn create(
        &self,
        actor: Uuid,
        req: CreatePost,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            id: Uuid::new_v4(),
            author_id: actor,
            title: req.title,
            content: req.content,
            tags: req.tags,
            image_url: req.image_url,
            video_url: req.video_url,
            created_at: Utc::now(),
        };

        let post = self.repo.create_post(new_post).await?;
        tracing::info!(post_id = %post.id, "post created");
        Ok(post)
    }

    pub(crate) async fn list(&self) -> Result<Vec<Post>, DomainError> {
        self.repo.list_posts(None).await
    }

    pub(crate) async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DomainError> {
        self.repo.list_posts(Some(author_id)).await
    }

    pub(crate) async fn get(&self, id: Uuid) -> Result<Post, DomainError> {
        self.repo
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post: {id}")))
    }

    pub(crate) async fn update(
        &self,
        actor: Uuid,
        id: Uuid,
        req: UpdatePost,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let mut post = self.get(id).await?;
        require_owner(actor, post.author.id)?;

        req.apply(&mut post, Utc::now());
        self.repo.save_post(&post).await?;
        Ok(post)
    }

    pub(crate) async fn delete(&self, actor: Uuid, id: Uuid) -> Result<(), DomainError> {
        let post = self.get(id).await?;
        require_owner(actor, post.author.id)?;

        if !self.repo.delete_post(id).await? {
            return Err(DomainError::NotFound(format!("post: {id}")));
        }
        tracing::info!(post_id = %id, "post removed");
        Ok(())
    }

    pub(crate) async fn toggle_like(&self, actor: Uuid, id: Uuid) -> Result<Post, DomainError> {
        self.repo
            .toggle_like(id, actor, Utc::now())
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post: {id}")))
    }
}
