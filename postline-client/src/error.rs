use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиента CMS.
pub enum CmsError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Источник вернул неуспешный HTTP-статус.
    #[error("cms status {status}: {message}")]
    Status {
        /// HTTP-статус ответа.
        status: reqwest::StatusCode,
        /// Сообщение из тела ответа либо стандартное описание статуса.
        message: String,
    },

    /// Тело ответа не соответствует ожидаемой JSON-структуре.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Запрошенный документ не найден.
    #[error("document not found")]
    NotFound,

    /// Доступ к репозиторию запрещён (нет или истёк access token).
    #[error("unauthorized")]
    Unauthorized,
}

/// Результат операций клиента CMS.
pub type CmsResult<T> = Result<T, CmsError>;

impl CmsError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized
            }
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::Status { status, message }
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}
