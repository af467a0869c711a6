use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Failures raised by a storage driver. Every one of them surfaces to callers
/// as [`Error::PersistenceUnavailable`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Connection lock poisoned")]
    Poisoned,
}

/// Field category named by a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Content,
    Tags,
    Folder,
    Color,
    EditorType,
    SharedWith,
    Email,
    Payload,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Content => "content",
            Field::Tags => "tags",
            Field::Folder => "folder",
            Field::Color => "color",
            Field::EditorType => "editorType",
            Field::SharedWith => "sharedWith",
            Field::Email => "email",
            Field::Payload => "payload",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Absent and inaccessible are deliberately the same answer.
    #[error("Note not found")]
    NotFoundOrForbidden,

    #[error("Invalid {field}: {message}")]
    Validation { field: Field, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Query timed out after {0:?}")]
    QueryTimeout(Duration),

    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(#[from] StoreError),
}

impl Error {
    pub fn validation(field: Field, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }

    /// Whether the caller may reasonably try the same request again.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Error::QueryTimeout(_) | Error::PersistenceUnavailable(_))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        Error::PersistenceUnavailable(StoreError::Database(value))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
