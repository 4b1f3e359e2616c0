use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sphere_core::like::{self, LikeToggle};
use sphere_core::{Author, Comment, DomainError, Like};

use crate::data::comment_repository::{CommentRepository, NewComment};

use super::map_db_error;

const SELECT_COMMENT: &str = r#"
    SELECT c.id, c.post_id, c.content, c.author_id, u.username AS author_username,
           c.emoji, c.created_at, c.updated_at
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

#[derive(Debug, Clone)]
pub(crate) struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_likes(&self, comment_id: Uuid) -> Result<Vec<Like>, DomainError> {
        let rows: Vec<LikeRow> = sqlx::query_as(
            "SELECT user_id, created_at FROM comment_likes WHERE comment_id = $1 ORDER BY created_at",
        )
        .bind(comment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(LikeRow::into_like).collect())
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    content: String,
    author_id: Uuid,
    author_username: String,
    emoji: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self, likes: Vec<Like>) -> Comment {
        Comment {
            id: self.id,
            post_id: self.post_id,
            content: self.content,
            author: Author {
                id: self.author_id,
                username: self.author_username,
            },
            emoji: self.emoji,
            likes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LikeRow {
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl LikeRow {
    fn into_like(self) -> Like {
        Like {
            user: self.user_id,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GroupedLikeRow {
    comment_id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, content, author_id, emoji, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            "#,
        )
        .bind(input.id)
        .bind(input.post_id)
        .bind(&input.content)
        .bind(input.author_id)
        .bind(&input.emoji)
        .bind(input.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.get_comment(input.id)
            .await?
            .ok_or_else(|| DomainError::Store("created comment vanished".to_string()))
    }

    async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        let row: Option<CommentRow> = sqlx::query_as(&format!("{SELECT_COMMENT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        match row {
            Some(row) => {
                let likes = self.load_likes(row.id).await?;
                Ok(Some(row.into_comment(likes)))
            }
            None => Ok(None),
        }
    }

    async fn list_comments(
        &self,
        post_id: Uuid,
        emoji: Option<&str>,
    ) -> Result<Vec<Comment>, DomainError> {
        let rows: Vec<CommentRow> = sqlx::query_as(&format!(
            r#"
            {SELECT_COMMENT}
            WHERE c.post_id = $1 AND ($2::text IS NULL OR c.emoji = $2)
            ORDER BY c.created_at DESC
            "#
        ))
        .bind(post_id)
        .bind(emoji)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let like_rows: Vec<GroupedLikeRow> = sqlx::query_as(
            r#"
            SELECT comment_id, user_id, created_at
            FROM comment_likes
            WHERE comment_id = ANY($1)
            ORDER BY created_at
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut by_comment: HashMap<Uuid, Vec<Like>> = HashMap::new();
        for row in like_rows {
            by_comment.entry(row.comment_id).or_default().push(Like {
                user: row.user_id,
                created_at: row.created_at,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let likes = by_comment.remove(&row.id).unwrap_or_default();
                row.into_comment(likes)
            })
            .collect())
    }

    async fn save_comment(&self, comment: &Comment) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE comments SET content = $2, emoji = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(comment.id)
        .bind(&comment.content)
        .bind(&comment.emoji)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_like(
        &self,
        id: Uuid,
        user: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Comment>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let locked: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM comments WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_db_error)?;
        if locked.is_none() {
            return Ok(None);
        }

        let rows: Vec<LikeRow> = sqlx::query_as(
            "SELECT user_id, created_at FROM comment_likes WHERE comment_id = $1 ORDER BY created_at",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(map_db_error)?;
        let mut likes: Vec<Like> = rows.into_iter().map(LikeRow::into_like).collect();

        match like::toggle(&mut likes, user, now) {
            LikeToggle::Liked(like) => {
                sqlx::query(
                    "INSERT INTO comment_likes (comment_id, user_id, created_at) VALUES ($1, $2, $3)",
                )
                .bind(id)
                .bind(like.user)
                .bind(like.created_at)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
            LikeToggle::Unliked => {
                sqlx::query("DELETE FROM comment_likes WHERE comment_id = $1 AND user_id = $2")
                    .bind(id)
                    .bind(user)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            }
        }

        tx.commit().await.map_err(map_db_error)?;

        self.get_comment(id).await
    }
}
