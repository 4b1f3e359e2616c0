use async_trait::async_trait;
use uuid::Uuid;

use sphere_core::upload::UploadKind;
use sphere_core::{
    AuthResponse, Comment, CreateComment, CreatePost, Login, MessageResponse, Post, Register,
    UpdateCommentContent, UpdateCommentEmoji, UpdatePost, UploadResponse,
};

use crate::error::ClientResult;
use crate::session::Session;

/// Контракт контент-хранилища, которому обязаны следовать оба бэкенда:
/// HTTP-сервер и локальное симулированное хранилище. Валидация, проверка
/// владельца и коды ошибок совпадают бит-в-бит.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Регистрирует пользователя. Локальный бэкенд этот маршрут не обслуживает.
    async fn register(&self, req: Register) -> ClientResult<MessageResponse>;

    /// Аутентифицирует пользователя. Локальный бэкенд этот маршрут не
    /// обслуживает.
    async fn login(&self, req: Login) -> ClientResult<AuthResponse>;

    /// Список постов, опционально ограниченный одним автором.
    async fn list_posts(&self, author_id: Option<Uuid>) -> ClientResult<Vec<Post>>;

    /// Посты владельца сессии.
    async fn my_posts(&self, session: &Session) -> ClientResult<Vec<Post>>;

    /// Пост по идентификатору.
    async fn get_post(&self, id: Uuid) -> ClientResult<Post>;

    /// Создаёт пост от имени владельца сессии.
    async fn create_post(&self, session: &Session, req: CreatePost) -> ClientResult<Post>;

    /// Частично обновляет пост. Только владелец.
    async fn update_post(
        &self,
        session: &Session,
        id: Uuid,
        req: UpdatePost,
    ) -> ClientResult<Post>;

    /// Удаляет пост. Только владелец. Комментарии поста остаются.
    async fn delete_post(&self, session: &Session, id: Uuid) -> ClientResult<MessageResponse>;

    /// Переключает лайк владельца сессии на посте.
    async fn toggle_post_like(&self, session: &Session, id: Uuid) -> ClientResult<Post>;

    /// Комментарии поста, опционально отфильтрованные по эмодзи
    /// (`all` — без фильтра).
    async fn list_comments(
        &self,
        post_id: Uuid,
        emoji: Option<&str>,
    ) -> ClientResult<Vec<Comment>>;

    /// Создаёт комментарий от имени владельца сессии.
    async fn create_comment(&self, session: &Session, req: CreateComment)
    -> ClientResult<Comment>;

    /// Обновляет текст комментария. Только владелец.
    async fn update_comment(
        &self,
        session: &Session,
        id: Uuid,
        req: UpdateCommentContent,
    ) -> ClientResult<Comment>;

    /// Меняет эмодзи комментария. Только владелец.
    async fn update_comment_emoji(
        &self,
        session: &Session,
        id: Uuid,
        req: UpdateCommentEmoji,
    ) -> ClientResult<Comment>;

    /// Удаляет комментарий. Только владелец.
    async fn delete_comment(&self, session: &Session, id: Uuid)
    -> ClientResult<MessageResponse>;

    /// Переключает лайк владельца сессии на комментарии.
    async fn toggle_comment_like(&self, session: &Session, id: Uuid) -> ClientResult<Comment>;

    /// Загружает медиафайл и возвращает описание сохранённого файла.
    /// Локальный бэкенд байты не хранит и возвращает placeholder-URL.
    async fn upload(
        &self,
        session: &Session,
        kind: UploadKind,
        filename: &str,
        mimetype: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<UploadResponse>;
}
