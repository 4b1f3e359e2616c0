//! Локальное симулированное хранилище: тот же контент-контракт, что и у
//! сервера, но всё состояние живёт в одном JSON-файле на диске. Правила
//! валидации, проверка владельца и коды ошибок совпадают с серверными,
//! поэтому переключение бэкенда не меняет поведение приложения.

mod container;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use sphere_core::comment::emoji_filter_matches;
use sphere_core::upload::{UploadKind, sanitize_file_name, validate_upload};
use sphere_core::{
    AuthResponse, Author, Comment, CreateComment, CreatePost, DomainError, Login, MessageResponse,
    Post, Register, UpdateCommentContent, UpdateCommentEmoji, UpdatePost, UploadResponse,
    Violation, like, require_owner,
};

use crate::error::ClientResult;
use crate::session::Session;
use crate::store::ContentStore;

use container::KeyedContainer;

const USERS_KEY: &str = "users";
const POSTS_KEY: &str = "posts";
const COMMENTS_KEY: &str = "comments";

const TOKEN_PREFIX: &str = "local-";

const IMAGE_PLACEHOLDER: &str = "https://picsum.photos/seed/sphere/800/400";
const VIDEO_PLACEHOLDER: &str =
    "https://sample-videos.com/video321/mp4/720/big_buck_bunny_720p_1mb.mp4";

/// Локальная реализация [`ContentStore`] поверх JSON-файла.
pub struct LocalStore {
    container: KeyedContainer,
}

impl LocalStore {
    /// Открывает хранилище, при первом запуске засевая демо-контент.
    pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let container = KeyedContainer::open(path)?;
        let store = Self { container };
        store.seed_if_empty()?;
        Ok(store)
    }

    /// Возвращает сессию для `username`, создавая пользователя при первом
    /// обращении. Это локальная замена `register`/`login`: идентичность
    /// живёт в том же файле, что и контент.
    pub fn ensure_user(&self, username: &str) -> ClientResult<Session> {
        let username = username.trim().to_string();
        let username_len = username.chars().count();
        if username_len < 3 || username_len > 64 {
            return Err(DomainError::Validation(vec![Violation::new(
                "username",
                "must be 3..64 characters",
            )])
            .into());
        }

        let mut users = self.users()?;
        let user = match users.iter().find(|user| user.username == username) {
            Some(user) => user.clone(),
            None => {
                let user = Author {
                    id: Uuid::new_v4(),
                    username,
                };
                users.push(user.clone());
                self.container.put(USERS_KEY, &users)?;
                user
            }
        };

        Ok(Session {
            token: format!("{TOKEN_PREFIX}{}", user.id),
            user,
        })
    }

    fn seed_if_empty(&self) -> Result<(), DomainError> {
        if self.container.get::<Vec<Post>>(POSTS_KEY)?.is_some() {
            return Ok(());
        }

        let now = Utc::now();
        let demo = Author {
            id: Uuid::new_v4(),
            username: "demo".to_string(),
        };
        let post = Post {
            id: Uuid::new_v4(),
            title: "Welcome to Sphere (local mode)".to_string(),
            content: "This demo post lives in a local file next to your data. \
                      Posts, comments and likes you create here never leave this machine."
                .to_string(),
            author: demo.clone(),
            image_url: None,
            video_url: None,
            tags: vec!["demo".to_string(), "local".to_string()],
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.container.put(USERS_KEY, &vec![demo])?;
        self.container.put(POSTS_KEY, &vec![post])?;
        self.container.put(COMMENTS_KEY, &Vec::<Comment>::new())?;
        tracing::debug!("seeded local store with demo content");
        Ok(())
    }

    fn users(&self) -> Result<Vec<Author>, DomainError> {
        Ok(self.container.get(USERS_KEY)?.unwrap_or_default())
    }

    fn posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.container.get(POSTS_KEY)?.unwrap_or_default())
    }

    fn comments(&self) -> Result<Vec<Comment>, DomainError> {
        Ok(self.container.get(COMMENTS_KEY)?.unwrap_or_default())
    }

    /// Сессия действительна, только если токен указывает на известного
    /// пользователя. Правило то же, что и у сервера: без идентичности ни
    /// одна защищённая операция не выполняется.
    fn authenticate(&self, session: &Session) -> Result<Author, DomainError> {
        let id = session
            .token
            .strip_prefix(TOKEN_PREFIX)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or(DomainError::Unauthenticated)?;

        self.users()?
            .into_iter()
            .find(|user| user.id == id)
            .ok_or(DomainError::Unauthenticated)
    }

    fn find_post(posts: &[Post], id: Uuid) -> Result<usize, DomainError> {
        posts
            .iter()
            .position(|post| post.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("post: {id}")))
    }

    fn find_comment(comments: &[Comment], id: Uuid) -> Result<usize, DomainError> {
        comments
            .iter()
            .position(|comment| comment.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("comment: {id}")))
    }
}

#[async_trait]
impl ContentStore for LocalStore {
    async fn register(&self, _req: Register) -> ClientResult<MessageResponse> {
        // Маршруты аутентификации локальный бэкенд не обслуживает, см.
        // `ensure_user`.
        Err(DomainError::NotFound("route: /api/auth/register".to_string()).into())
    }

    async fn login(&self, _req: Login) -> ClientResult<AuthResponse> {
        Err(DomainError::NotFound("route: /api/auth/login".to_string()).into())
    }

    async fn list_posts(&self, author_id: Option<Uuid>) -> ClientResult<Vec<Post>> {
        let mut posts = self.posts()?;
        if let Some(author_id) = author_id {
            posts.retain(|post| post.author.id == author_id);
        }
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn my_posts(&self, session: &Session) -> ClientResult<Vec<Post>> {
        let user = self.authenticate(session)?;
        self.list_posts(Some(user.id)).await
    }

    async fn get_post(&self, id: Uuid) -> ClientResult<Post> {
        let posts = self.posts()?;
        let index = Self::find_post(&posts, id)?;
        Ok(posts[index].clone())
    }

    async fn create_post(&self, session: &Session, req: CreatePost) -> ClientResult<Post> {
        let user = self.authenticate(session)?;
        let req = req.validate()?;

        let post = req.into_post(Uuid::new_v4(), user, Utc::now());
        let mut posts = self.posts()?;
        posts.push(post.clone());
        self.container.put(POSTS_KEY, &posts)?;
        Ok(post)
    }

    async fn update_post(
        &self,
        session: &Session,
        id: Uuid,
        req: UpdatePost,
    ) -> ClientResult<Post> {
        let user = self.authenticate(session)?;
        let req = req.validate()?;

        let mut posts = self.posts()?;
        let index = Self::find_post(&posts, id)?;
        require_owner(user.id, posts[index].author.id)?;

        req.apply(&mut posts[index], Utc::now());
        let updated = posts[index].clone();
        self.container.put(POSTS_KEY, &posts)?;
        Ok(updated)
    }

    async fn delete_post(&self, session: &Session, id: Uuid) -> ClientResult<MessageResponse> {
        let user = self.authenticate(session)?;

        let mut posts = self.posts()?;
        let index = Self::find_post(&posts, id)?;
        require_owner(user.id, posts[index].author.id)?;

        // Комментарии удалённого поста сохраняются, как и на сервере.
        posts.remove(index);
        self.container.put(POSTS_KEY, &posts)?;
        Ok(MessageResponse::new("Post removed"))
    }

    async fn toggle_post_like(&self, session: &Session, id: Uuid) -> ClientResult<Post> {
        let user = self.authenticate(session)?;

        let mut posts = self.posts()?;
        let index = Self::find_post(&posts, id)?;
        like::toggle(&mut posts[index].likes, user.id, Utc::now());
        let updated = posts[index].clone();
        self.container.put(POSTS_KEY, &posts)?;
        Ok(updated)
    }

    async fn list_comments(
        &self,
        post_id: Uuid,
        emoji: Option<&str>,
    ) -> ClientResult<Vec<Comment>> {
        let mut comments = self.comments()?;
        comments.retain(|comment| {
            comment.post_id == post_id && emoji_filter_matches(emoji, &comment.emoji)
        });
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn create_comment(
        &self,
        session: &Session,
        req: CreateComment,
    ) -> ClientResult<Comment> {
        let user = self.authenticate(session)?;
        let req = req.validate()?;

        let comment = req.into_comment(Uuid::new_v4(), user, Utc::now());
        let mut comments = self.comments()?;
        comments.push(comment.clone());
        self.container.put(COMMENTS_KEY, &comments)?;
        Ok(comment)
    }

    async fn update_comment(
        &self,
        session: &Session,
        id: Uuid,
        req: UpdateCommentContent,
    ) -> ClientResult<Comment> {
        let user = self.authenticate(session)?;
        let req = req.validate()?;

        let mut comments = self.comments()?;
        let index = Self::find_comment(&comments, id)?;
        require_owner(user.id, comments[index].author.id)?;

        comments[index].content = req.content;
        comments[index].updated_at = Utc::now();
        let updated = comments[index].clone();
        self.container.put(COMMENTS_KEY, &comments)?;
        Ok(updated)
    }

    async fn update_comment_emoji(
        &self,
        session: &Session,
        id: Uuid,
        req: UpdateCommentEmoji,
    ) -> ClientResult<Comment> {
        let user = self.authenticate(session)?;
        let req = req.validate()?;

        let mut comments = self.comments()?;
        let index = Self::find_comment(&comments, id)?;
        require_owner(user.id, comments[index].author.id)?;

        comments[index].emoji = req.emoji;
        comments[index].updated_at = Utc::now();
        let updated = comments[index].clone();
        self.container.put(COMMENTS_KEY, &comments)?;
        Ok(updated)
    }

    async fn delete_comment(
        &self,
        session: &Session,
        id: Uuid,
    ) -> ClientResult<MessageResponse> {
        let user = self.authenticate(session)?;

        let mut comments = self.comments()?;
        let index = Self::find_comment(&comments, id)?;
        require_owner(user.id, comments[index].author.id)?;

        comments.remove(index);
        self.container.put(COMMENTS_KEY, &comments)?;
        Ok(MessageResponse::new("Comment removed"))
    }

    async fn toggle_comment_like(&self, session: &Session, id: Uuid) -> ClientResult<Comment> {
        let user = self.authenticate(session)?;

        let mut comments = self.comments()?;
        let index = Self::find_comment(&comments, id)?;
        like::toggle(&mut comments[index].likes, user.id, Utc::now());
        let updated = comments[index].clone();
        self.container.put(COMMENTS_KEY, &comments)?;
        Ok(updated)
    }

    async fn upload(
        &self,
        session: &Session,
        kind: UploadKind,
        filename: &str,
        mimetype: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<UploadResponse> {
        self.authenticate(session)?;
        validate_upload(kind, mimetype, bytes.len() as u64)?;

        // Байты никуда не сохраняются, вместо URL файла отдаётся
        // общедоступный placeholder.
        let stored_as = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(filename)
        );
        let url = match kind {
            UploadKind::Image => IMAGE_PLACEHOLDER,
            UploadKind::Video => VIDEO_PLACEHOLDER,
        };

        Ok(UploadResponse {
            filename: filename.to_string(),
            stored_as: stored_as.clone(),
            url: url.to_string(),
            path: format!("/uploads/{stored_as}"),
            size: bytes.len() as u64,
            mimetype: mimetype.to_string(),
        })
    }
}
