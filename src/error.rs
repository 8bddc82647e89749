//! Ошибки виджета бронирования.
//!
//! Каждая ошибка на пути чтения деградирует локально (см. `services::page`),
//! ошибки валидации показываются посетителю и никогда не доходят до сети.

use thiserror::Error;

/// Ошибки загрузки каталога мероприятий.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog responded with status {0}")]
    Status(u16),

    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Результат поиска мероприятия по идентификатору из адресной строки.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("missing event id")]
    MissingEventId,

    #[error("event {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Ошибки обращения к таблице бронирований.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("booking backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("booking backend responded with status {0}")]
    Status(u16),

    #[error("malformed booking backend response: {0}")]
    Malformed(String),

    #[error("failed to encode booking payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Причины, по которым попытка отправки брони не дошла до ответа.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("No event selected.")]
    NoEvent,

    #[error("Please select at least one seat.")]
    NoSeats,

    #[error("Please fill in all details.")]
    MissingDetails,

    #[error("A booking is already being submitted.")]
    InFlight,

    #[error("Network error. Please try again.")]
    Transport(#[source] BackendError),
}

impl SubmitError {
    /// Ошибка валидации: до сети дело не дошло.
    pub fn is_validation(&self) -> bool {
        matches!(self, SubmitError::NoSeats | SubmitError::MissingDetails)
    }
}

/// Некорректная схема зала.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("seat layout needs at least one row")]
    NoRows,

    #[error("seat layout needs at least one seat per row")]
    NoSeats,

    #[error("row label {0:?} must be an ASCII letter")]
    InvalidRow(char),

    #[error("row label {0:?} is used twice")]
    DuplicateRow(char),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    #[error("invalid seat layout: {0}")]
    Layout(#[from] LayoutError),
}
