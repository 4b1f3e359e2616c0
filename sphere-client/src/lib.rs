//! Клиентская библиотека контент-сервиса Sphere.
//!
//! Предоставляет единый API (`SphereClient`) поверх двух бэкендов:
//! - HTTP (`reqwest`) — REST API `sphere-server`;
//! - локальный — симулированное хранилище в JSON-файле, полностью офлайн.
//!
//! Оба бэкенда реализуют один контракт [`ContentStore`] и ведут себя
//! одинаково: та же валидация, те же проверки владельца, те же коды ошибок.
//! Клиент хранит сессию после `login`/`login_offline` и автоматически
//! использует её в защищённых операциях; при отказе с кодом
//! `unauthenticated` сессия сбрасывается, отказ владельца её не трогает.
#![warn(missing_docs)]

mod error;
mod http_store;
mod local;
mod session;
mod store;

pub use error::{ApiFailure, ClientError, ClientResult};
pub use http_store::HttpStore;
pub use local::LocalStore;
pub use session::Session;
pub use store::ContentStore;

use std::path::PathBuf;

use uuid::Uuid;

use sphere_core::upload::UploadKind;
use sphere_core::{
    AuthResponse, Comment, CreateComment, CreatePost, DomainError, Login, MessageResponse, Post,
    Register, UpdateCommentContent, UpdateCommentEmoji, UpdatePost, UploadResponse,
};

#[derive(Debug, Clone)]
/// Бэкенд, с которым работает `SphereClient`.
pub enum Backend {
    /// REST API сервера, например `http://127.0.0.1:8080`.
    Http(String),
    /// Локальное хранилище: путь к JSON-файлу с данными.
    Local(PathBuf),
}

enum StoreImpl {
    Http(HttpStore),
    Local(LocalStore),
}

/// Унифицированный клиент контент-сервиса поверх HTTP или локального
/// хранилища.
pub struct SphereClient {
    store: StoreImpl,
    session: Option<Session>,
}

impl SphereClient {
    /// Создаёт клиент с выбранным бэкендом. Для локального бэкенда файл
    /// открывается (и засевается демо-контентом) сразу.
    pub fn new(backend: Backend) -> ClientResult<Self> {
        let store = match backend {
            Backend::Http(base_url) => StoreImpl::Http(HttpStore::new(base_url)),
            Backend::Local(path) => StoreImpl::Local(LocalStore::open(path)?),
        };

        Ok(Self {
            store,
            session: None,
        })
    }

    fn content_store(&self) -> &dyn ContentStore {
        match &self.store {
            StoreImpl::Http(store) => store,
            StoreImpl::Local(store) => store,
        }
    }

    /// Текущая сессия, если клиент авторизован.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Восстанавливает ранее сохранённую сессию (например, из файла CLI).
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Сбрасывает сессию.
    pub fn logout(&mut self) {
        self.session = None;
    }

    fn require_session(&self) -> ClientResult<Session> {
        self.session.clone().ok_or(ClientError::MissingSession)
    }

    /// Код `unauthenticated` означает, что бэкенд сессию больше не
    /// принимает. Отказ владельца (`unauthorized`) сессию не трогает:
    /// токен действителен, запрещена только конкретная операция.
    fn drop_session_on_unauthenticated<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(err) = &result
            && err.is_unauthenticated()
        {
            self.session = None;
        }
        result
    }

    /// Регистрирует пользователя. Сессию не создаёт: сервер отвечает только
    /// подтверждением.
    pub async fn register(&self, username: &str, password: &str) -> ClientResult<MessageResponse> {
        self.content_store()
            .register(Register {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await
    }

    /// Выполняет вход и сохраняет полученную сессию в клиенте.
    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<AuthResponse> {
        let result = self
            .content_store()
            .login(Login {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.session = Some(Session {
            token: result.token.clone(),
            user: result.user.clone(),
        });
        Ok(result)
    }

    /// Офлайн-вход для локального бэкенда: создаёт пользователя при первом
    /// обращении и сохраняет сессию в клиенте.
    pub async fn login_offline(&mut self, username: &str) -> ClientResult<Session> {
        let session = match &self.store {
            StoreImpl::Local(store) => store.ensure_user(username)?,
            StoreImpl::Http(_) => {
                return Err(DomainError::NotFound(
                    "offline login is only available with the local backend".to_string(),
                )
                .into());
            }
        };

        self.session = Some(session.clone());
        Ok(session)
    }

    /// Список постов, опционально одного автора.
    pub async fn list_posts(&self, author_id: Option<Uuid>) -> ClientResult<Vec<Post>> {
        self.content_store().list_posts(author_id).await
    }

    /// Посты текущего пользователя.
    pub async fn my_posts(&mut self) -> ClientResult<Vec<Post>> {
        let session = self.require_session()?;
        let result = self.content_store().my_posts(&session).await;
        self.drop_session_on_unauthenticated(result)
    }

    /// Пост по идентификатору.
    pub async fn get_post(&self, id: Uuid) -> ClientResult<Post> {
        self.content_store().get_post(id).await
    }

    /// Создаёт пост от имени текущего пользователя.
    pub async fn create_post(&mut self, req: CreatePost) -> ClientResult<Post> {
        let session = self.require_session()?;
        let result = self.content_store().create_post(&session, req).await;
        self.drop_session_on_unauthenticated(result)
    }

    /// Частично обновляет пост. Только владелец.
    pub async fn update_post(&mut self, id: Uuid, req: UpdatePost) -> ClientResult<Post> {
        let session = self.require_session()?;
        let result = self.content_store().update_post(&session, id, req).await;
        self.drop_session_on_unauthenticated(result)
    }

    /// Удаляет пост. Только владелец.
    pub async fn delete_post(&mut self, id: Uuid) -> ClientResult<MessageResponse> {
        let session = self.require_session()?;
        let result = self.content_store().delete_post(&session, id).await;
        self.drop_session_on_unauthenticated(result)
    }

    /// Переключает лайк текущего пользователя на посте.
    pub async fn toggle_post_like(&mut self, id: Uuid) -> ClientResult<Post> {
        let session = self.require_session()?;
        let result = self.content_store().toggle_post_like(&session, id).await;
        self.drop_session_on_unauthenticated(result)
    }

    /// Комментарии поста, опционально отфильтрованные по эмодзи.
    pub async fn list_comments(
        &self,
        post_id: Uuid,
        emoji: Option<&str>,
    ) -> ClientResult<Vec<Comment>> {
        self.content_store().list_comments(post_id, emoji).await
    }

    /// Создаёт комментарий от имени текущего пользователя.
    pub async fn create_comment(&mut self, req: CreateComment) -> ClientResult<Comment> {
        let session = self.require_session()?;
        let result = self.content_store().create_comment(&session, req).await;
        self.drop_session_on_unauthenticated(result)
    }

    /// Обновляет текст комментария. Только владелец.
    pub async fn update_comment(
        &mut self,
        id: Uuid,
        req: UpdateCommentContent,
    ) -> ClientResult<Comment> {
        let session = self.require_session()?;
        let result = self.content_store().update_comment(&session, id, req).await;
        self.drop_session_on_unauthenticated(result)
    }

    /// Меняет эмодзи комментария. Только владелец.
    pub async fn update_comment_emoji(
        &mut self,
        id: Uuid,
        req: UpdateCommentEmoji,
    ) -> ClientResult<Comment> {
        let session = self.require_session()?;
        let result = self
            .content_store()
            .update_comment_emoji(&session, id, req)
            .await;
        self.drop_session_on_unauthenticated(result)
    }

    /// Удаляет комментарий. Только владелец.
    pub async fn delete_comment(&mut self, id: Uuid) -> ClientResult<MessageResponse> {
        let session = self.require_session()?;
        let result = self.content_store().delete_comment(&session, id).await;
        self.drop_session_on_unauthenticated(result)
    }

    /// Переключает лайк текущего пользователя на комментарии.
    pub async fn toggle_comment_like(&mut self, id: Uuid) -> ClientResult<Comment> {
        let session = self.require_session()?;
        let result = self.content_store().toggle_comment_like(&session, id).await;
        self.drop_session_on_unauthenticated(result)
    }

    /// Загружает медиафайл от имени текущего пользователя.
    pub async fn upload(
        &mut self,
        kind: UploadKind,
        filename: &str,
        mimetype: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<UploadResponse> {
        let session = self.require_session()?;
        let result = self
            .content_store()
            .upload(&session, kind, filename, mimetype, bytes)
            .await;
        self.drop_session_on_unauthenticated(result)
    }
}
