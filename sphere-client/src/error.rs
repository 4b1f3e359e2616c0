use thiserror::Error;

use sphere_core::{DomainError, ErrorBody};

/// Отказ API: статус и тело ошибки, одинаковые для обоих бэкендов.
#[derive(Debug, Clone)]
pub struct ApiFailure {
    /// HTTP-статус (локальный бэкенд отвечает теми же кодами).
    pub status: u16,
    /// Стабильный машинный код ошибки.
    pub code: String,
    /// Человекочитаемое сообщение.
    pub message: String,
    /// Нарушенные правила валидации, по одному на поле.
    pub violations: Vec<String>,
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, http {})", self.message, self.code, self.status)
    }
}

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `sphere-client`.
pub enum ClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Бэкенд отказал: контрактная ошибка API.
    #[error("api error: {0}")]
    Api(ApiFailure),

    /// Операция требует сессию, а клиент не авторизован.
    #[error("no active session")]
    MissingSession,
}

/// Результат операций `sphere-client`.
pub type ClientResult<T> = Result<T, ClientError>;

/// Локальный бэкенд выражает отказы той же таксономией `DomainError`, что и
/// сервер, поэтому они сворачиваются в тот же `ApiFailure`, который HTTP-бэкенд
/// декодирует из тела ответа.
impl From<DomainError> for ClientError {
    fn from(err: DomainError) -> Self {
        Self::from_body(err.status(), err.to_body())
    }
}

impl ClientError {
    pub(crate) fn from_body(status: u16, body: ErrorBody) -> Self {
        Self::Api(ApiFailure {
            status,
            code: body.code,
            message: body.error,
            violations: body.violations,
        })
    }

    pub(crate) fn from_status(status: u16, fallback: String) -> Self {
        Self::Api(ApiFailure {
            status,
            code: "unknown".to_string(),
            message: fallback,
            violations: Vec::new(),
        })
    }

    /// Отверг ли бэкенд саму сессию (код `unauthenticated`): токен
    /// отсутствует, просрочен или подделан. Отказ владельца
    /// (`unauthorized`) тоже приходит как 401, но сессию не порочит,
    /// поэтому различие идёт по стабильному коду, а не по статусу.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Api(failure) if failure.code == "unauthenticated")
    }

    /// Код ошибки API, если это контрактный отказ.
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::Api(failure) => Some(failure.code.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use sphere_core::DomainError;

    use super::ClientError;

    #[test]
    fn domain_error_keeps_status_and_code() {
        let err = ClientError::from(DomainError::NotOwner);
        assert_eq!(err.api_code(), Some("unauthorized"));
    }

    #[test]
    fn only_unauthenticated_discredits_the_session() {
        assert!(ClientError::from(DomainError::Unauthenticated).is_unauthenticated());
        // Отказ владельца — тоже 401, но сессия остаётся действительной.
        assert!(!ClientError::from(DomainError::NotOwner).is_unauthenticated());
    }

    #[test]
    fn missing_session_is_not_an_api_failure() {
        let err = ClientError::MissingSession;
        assert!(!err.is_unauthenticated());
        assert_eq!(err.api_code(), None);
    }
}
