use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sphere_core::like::{self, LikeToggle};
use sphere_core::{Author, DomainError, Like, Post};

use crate::data::post_repository::{NewPost, PostRepository};

use super::map_db_error;

const SELECT_POST: &str = r#"
    SELECT p.id, p.title, p.content, p.author_id, u.username AS author_username,
           p.image_url, p.video_url, p.tags, p.created_at, p.updated_at
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

#[derive(Debug, Clone)]
pub(crate) struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_likes(&self, post_id: Uuid) -> Result<Vec<Like>, DomainError> {
        let rows: Vec<LikeRow> = sqlx::query_as(
            "SELECT user_id, created_at FROM post_likes WHERE post_id = $1 ORDER BY created_at",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(LikeRow::into_like).collect())
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    author_id: Uuid,
    author_username: String,
    image_url: Option<String>,
    video_url: Option<String>,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self, likes: Vec<Like>) -> Post {
        Post {
            id: self.id,
            title: self.title,
            content: self.content,
            author: Author {
                id: self.author_id,
                username: self.author_username,
            },
            image_url: self.image_url,
            video_url: self.video_url,
            tags: self.tags,
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
    post_id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, title, content, author_id, image_url, video_url, tags,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            "#,
        )
        .bind(input.id)
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.author_id)
        .bind(&input.image_url)
        .bind(&input.video_url)
        .bind(&input.tags)
        .bind(input.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.get_post(input.id)
            .await?
            .ok_or_else(|| DomainError::Store("created post vanished".to_string()))
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let row: Option<PostRow> = sqlx::query_as(&format!("{SELECT_POST} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        match row {
            Some(row) => {
                let likes = self.load_likes(row.id).await?;
                Ok(Some(row.into_post(likes)))
            }
            None => Ok(None),
        }
    }

    async fn list_posts(&self, author_id: Option<Uuid>) -> Result<Vec<Post>, DomainError> {
        let rows: Vec<PostRow> = match author_id {
            Some(author_id) => {
                sqlx::query_as(&format!(
                    "{SELECT_POST} WHERE p.author_id = $1 ORDER BY p.created_at DESC"
                ))
                .bind(author_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(&format!("{SELECT_POST} ORDER BY p.created_at DESC"))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(map_db_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let like_rows: Vec<GroupedLikeRow> = sqlx::query_as(
            r#"
            SELECT post_id, user_id, created_at
            FROM post_likes
            WHERE post_id = ANY($1)
            ORDER BY created_at
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut by_post: HashMap<Uuid, Vec<Like>> = HashMap::new();
        for row in like_rows {
            by_post.entry(row.post_id).or_default().push(Like {
                user: row.user_id,
                created_at: row.created_at,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let likes = by_post.remove(&row.id).unwrap_or_default();
                row.into_post(likes)
            })
            .collect())
    }

    async fn save_post(&self, post: &Post) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE posts
            SET title = $2, content = $3, image_url = $4, video_url = $5, tags = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.video_url)
        .bind(&post.tags)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
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
    ) -> Result<Option<Post>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row lock serializes concurrent toggles on the same post; the
        // membership decision itself is the shared toggle algorithm.
        let locked: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?;
        if locked.is_none() {
            return Ok(None);
        }

        let rows: Vec<LikeRow> = sqlx::query_as(
            "SELECT user_id, created_at FROM post_likes WHERE post_id = $1 ORDER BY created_at",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(map_db_error)?;
        let mut likes: Vec<Like> = rows.into_iter().map(LikeRow::into_like).collect();

        match like::toggle(&mut likes, user, now) {
            LikeToggle::Liked(like) => {
                sqlx::query(
                    "INSERT INTO post_likes (post_id, user_id, created_at) VALUES ($1, $2, $3)",
                )
                .bind(id)
                .bind(like.user)
                .bind(like.created_at)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
            LikeToggle::Unliked => {
                sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
                    .bind(id)
                    .bind(user)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            }
        }

        tx.commit().await.map_err(map_db_error)?;

        self.get_post(id).await
    }
}
