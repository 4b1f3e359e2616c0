use chrono::Utc;
use uuid::Uuid;

use sphere_core::comment::EMOJI_FILTER_ALL;
use sphere_core::{
    Comment, CreateComment, DEFAULT_EMOJI, DomainError, UpdateCommentContent, UpdateCommentEmoji,
    require_owner,
};

use crate::data::comment_repository::{CommentRepository, NewComment};

pub(crate) struct CommentService<R: CommentRepository> {
    repo: R,
}

impl<R: CommentRepository> CommentService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn create(
        &self,
        actor: Uuid,
        req: CreateComment,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;

        let new_comment = NewComment {
            id: Uuid::new_v4(),
            post_id: req.post_id,
            author_id: actor,
            content: req.content,
            emoji: req.emoji.unwrap_or_else(|| DEFAULT_EMOJI.to_string()),
            created_at: Utc::now(),
        };

        let comment = self.repo.create_comment(new_comment).await?;
        tracing::info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");
        Ok(comment)
    }

    /// `emoji = "all"` (or no filter at all) lists every comment on the post.
    pub(crate) async fn list(
        &self,
        post_id: Uuid,
        emoji: Option<String>,
    ) -> Result<Vec<Comment>, DomainError> {
        let filter = emoji.filter(|value| value != EMOJI_FILTER_ALL);
        self.repo.list_comments(post_id, filter.as_deref()).await
    }

    pub(crate) async fn get(&self, id: Uuid) -> Result<Comment, DomainError> {
        self.repo
            .get_comment(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment: {id}")))
    }

    pub(crate) async fn update_content(
        &self,
        actor: Uuid,
        id: Uuid,
        req: UpdateCommentContent,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;

        let mut comment = self.get(id).await?;
        require_owner(actor, comment.author.id)?;

        comment.content = req.content;
        comment.updated_at = Utc::now();
        self.repo.save_comment(&comment).await?;
        Ok(comment)
    }

    pub(crate) async fn update_emoji(
        &self,
        actor: Uuid,
        id: Uuid,
        req: UpdateCommentEmoji,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;

        let mut comment = self.get(id).await?;
        require_owner(actor, comment.author.id)?;

        comment.emoji = req.emoji;
        comment.updated_at = Utc::now();
        self.repo.save_comment(&comment).await?;
        Ok(comment)
    }

    pub(crate) async fn delete(&self, actor: Uuid, id: Uuid) -> Result<(), DomainError> {
        let comment = self.get(id).await?;
        require_owner(actor, comment.author.id)?;

        if !self.repo.delete_comment(id).await? {
            return Err(DomainError::NotFound(format!("comment: {id}")));
        }
        tracing::info!(comment_id = %id, "comment removed");
        Ok(())
    }

    pub(crate) async fn toggle_like(&self, actor: Uuid, id: Uuid) -> Result<Comment, DomainError> {
        self.repo
            .toggle_like(id, actor, Utc::now())
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment: {id}")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use sphere_core::like;
    use sphere_core::{
        Author, Comment, CreateComment, DEFAULT_EMOJI, DomainError, UpdateCommentContent,
        UpdateCommentEmoji,
    };

    use super::CommentService;
    use crate::data::comment_repository::{CommentRepository, NewComment};

    #[derive(Clone, Default)]
    struct FakeCommentRepo {
        comments: Arc<Mutex<HashMap<Uuid, Comment>>>,
    }

    impl FakeCommentRepo {
        fn insert(&self, comment: Comment) {
            self.comments
                .lock()
                .expect("comments mutex poisoned")
                .insert(comment.id, comment);
        }

        fn stored(&self, id: Uuid) -> Option<Comment> {
            self.comments
                .lock()
                .expect("comments mutex poisoned")
                .get(&id)
                .cloned()
        }
    }

    #[async_trait]
    impl CommentRepository for FakeCommentRepo {
        async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
            let comment = Comment {
                id: input.id,
                post_id: input.post_id,
                content: input.content,
                author: Author {
                    id: input.author_id,
                    username: "author".to_string(),
                },
                emoji: input.emoji,
                likes: Vec::new(),
                created_at: input.created_at,
                updated_at: input.created_at,
            };
            self.insert(comment.clone());
            Ok(comment)
        }

        async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
            Ok(self.stored(id))
        }

        async fn list_comments(
            &self,
            post_id: Uuid,
            emoji: Option<&str>,
        ) -> Result<Vec<Comment>, DomainError> {
            let mut comments: Vec<Comment> = self
                .comments
                .lock()
                .expect("comments mutex poisoned")
                .values()
                .filter(|comment| comment.post_id == post_id)
                .filter(|comment| emoji.is_none_or(|emoji| comment.emoji == emoji))
                .cloned()
                .collect();
            comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(comments)
        }

        async fn save_comment(&self, comment: &Comment) -> Result<(), DomainError> {
            self.insert(comment.clone());
            Ok(())
        }

        async fn delete_comment(&self, id: Uuid) -> Result<bool, DomainError> {
            Ok(self
                .comments
                .lock()
                .expect("comments mutex poisoned")
                .remove(&id)
                .is_some())
        }

        async fn toggle_like(
            &self,
            id: Uuid,
            user: Uuid,
            now: DateTime<Utc>,
        ) -> Result<Option<Comment>, DomainError> {
            let mut comments = self.comments.lock().expect("comments mutex poisoned");
            let Some(comment) = comments.get_mut(&id) else {
                return Ok(None);
            };
            like::toggle(&mut comment.likes, user, now);
            Ok(Some(comment.clone()))
        }
    }

    fn sample_comment(post_id: Uuid, author_id: Uuid, emoji: &str) -> Comment {
        let now = Utc::now();
        Comment {
            id: Uuid::new_v4(),
            post_id,
            content: "A comment".to_string(),
            author: Author {
                id: author_id,
                username: "author".to_string(),
            },
            emoji: emoji.to_string(),
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_defaults_emoji_when_absent() {
        let repo = FakeCommentRepo::default();
        let service = CommentService::new(repo.clone());

        let comment = service
            .create(
                Uuid::new_v4(),
                CreateComment {
                    content: "Nice post".to_string(),
                    post_id: Uuid::new_v4(),
                    emoji: None,
                },
            )
            .await
            .expect("create must succeed");

        assert_eq!(comment.emoji, DEFAULT_EMOJI);
        assert!(repo.stored(comment.id).is_some());
    }

    #[tokio::test]
    async fn create_keeps_explicit_emoji() {
        let service = CommentService::new(FakeCommentRepo::default());

        let comment = service
            .create(
                Uuid::new_v4(),
                CreateComment {
                    content: "Great".to_string(),
                    post_id: Uuid::new_v4(),
                    emoji: Some("🔥".to_string()),
                },
            )
            .await
            .expect("create must succeed");

        assert_eq!(comment.emoji, "🔥");
    }

    #[tokio::test]
    async fn create_rejects_empty_content() {
        let service = CommentService::new(FakeCommentRepo::default());

        let err = service
            .create(
                Uuid::new_v4(),
                CreateComment {
                    content: "   ".to_string(),
                    post_id: Uuid::new_v4(),
                    emoji: None,
                },
            )
            .await
            .expect_err("create must fail");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn list_filters_by_emoji_and_all_disables_filter() {
        let repo = FakeCommentRepo::default();
        let post_id = Uuid::new_v4();
        repo.insert(sample_comment(post_id, Uuid::new_v4(), "🔥"));
        repo.insert(sample_comment(post_id, Uuid::new_v4(), DEFAULT_EMOJI));
        let service = CommentService::new(repo);

        let fire = service
            .list(post_id, Some("🔥".to_string()))
            .await
            .expect("list must succeed");
        assert_eq!(fire.len(), 1);
        assert_eq!(fire[0].emoji, "🔥");

        let all = service
            .list(post_id, Some("all".to_string()))
            .await
            .expect("list must succeed");
        assert_eq!(all.len(), 2);

        let unfiltered = service.list(post_id, None).await.expect("list must succeed");
        assert_eq!(unfiltered.len(), 2);
    }

    #[tokio::test]
    async fn update_content_by_owner_succeeds() {
        let repo = FakeCommentRepo::default();
        let owner = Uuid::new_v4();
        let comment = sample_comment(Uuid::new_v4(), owner, DEFAULT_EMOJI);
        let id = comment.id;
        repo.insert(comment);
        let service = CommentService::new(repo.clone());

        let updated = service
            .update_content(
                owner,
                id,
                UpdateCommentContent {
                    content: "Edited".to_string(),
                },
            )
            .await
            .expect("update must succeed");

        assert_eq!(updated.content, "Edited");
        assert_eq!(
            repo.stored(id).expect("comment must be stored").content,
            "Edited"
        );
    }

    #[tokio::test]
    async fn update_emoji_by_non_owner_is_rejected() {
        let repo = FakeCommentRepo::default();
        let comment = sample_comment(Uuid::new_v4(), Uuid::new_v4(), DEFAULT_EMOJI);
        let id = comment.id;
        repo.insert(comment);
        let service = CommentService::new(repo);

        let err = service
            .update_emoji(
                Uuid::new_v4(),
                id,
                UpdateCommentEmoji {
                    emoji: "🔥".to_string(),
                },
            )
            .await
            .expect_err("update must fail");
        assert!(matches!(err, DomainError::NotOwner));
    }

    #[tokio::test]
    async fn delete_by_owner_removes_comment() {
        let repo = FakeCommentRepo::default();
        let owner = Uuid::new_v4();
        let comment = sample_comment(Uuid::new_v4(), owner, DEFAULT_EMOJI);
        let id = comment.id;
        repo.insert(comment);
        let service = CommentService::new(repo.clone());

        service.delete(owner, id).await.expect("delete must succeed");
        assert!(repo.stored(id).is_none());
    }

    #[tokio::test]
    async fn toggle_like_is_per_user() {
        let repo = FakeCommentRepo::default();
        let comment = sample_comment(Uuid::new_v4(), Uuid::new_v4(), DEFAULT_EMOJI);
        let id = comment.id;
        repo.insert(comment);
        let service = CommentService::new(repo);

        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        service
            .toggle_like(alice, id)
            .await
            .expect("toggle must succeed");
        let both = service
            .toggle_like(bob, id)
            .await
            .expect("toggle must succeed");
        assert_eq!(both.likes.len(), 2);

        let after = service
            .toggle_like(alice, id)
            .await
            .expect("toggle must succeed");
        assert_eq!(after.likes.len(), 1);
        assert_eq!(after.likes[0].user, bob);
    }

    #[tokio::test]
    async fn toggle_like_on_missing_comment_is_not_found() {
        let service = CommentService::new(FakeCommentRepo::default());

        let err = service
            .toggle_like(Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect_err("toggle must fail");
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
