//! Общая доменная модель контент-сервиса.
//!
//! Всё, что обязано вести себя одинаково в обоих хранилищах (серверном и
//! локальном симулированном), живёт здесь: сущности, валидация с нормализацией,
//! алгоритм переключения лайка, проверка владельца и таксономия ошибок вместе
//! с их проводным представлением.

pub mod auth;
pub mod comment;
pub mod error;
pub mod like;
pub mod post;
pub mod upload;
pub mod user;

pub use auth::require_owner;
pub use comment::{Comment, CreateComment, DEFAULT_EMOJI, UpdateCommentContent, UpdateCommentEmoji};
pub use error::{DomainError, ErrorBody, Violation};
pub use like::{Like, LikeToggle, toggle};
pub use post::{CreatePost, Post, UpdatePost};
pub use upload::{UploadKind, UploadResponse};
pub use user::{AuthResponse, Author, Login, MessageResponse, Register};
