use serde::{Deserialize, Serialize};

use sphere_core::Author;

/// Авторизованная сессия: токен и данные пользователя.
///
/// Для HTTP-бэкенда токен — это JWT сервера; локальный бэкенд выдаёт
/// собственный непрозрачный токен.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Bearer-токен для защищённых операций.
    pub token: String,
    /// Пользователь, которому принадлежит сессия.
    pub user: Author,
}
