use std::time::Duration;
use strum_macros::Display;
use thiserror::Error;

/// A nested object the caller relied on was absent from the remote payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required field `{field}`")]
pub struct MissingFieldError {
    pub field: &'static str,
}

impl MissingFieldError {
    pub fn new(field: &'static str) -> Self {
        Self { field }
    }
}

/// Any failure talking to the commerce API.
#[derive(Debug, Error)]
pub enum RemoteServiceError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("stored procedure failed: {0}")]
    Execute(#[source] sqlx::Error),

    #[error("stored procedure timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    MissingField(#[from] MissingFieldError),

    #[error("invalid procedure name {0:?}")]
    InvalidProcedureName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SyncErrorKind {
    RemoteService,
    Persistence,
    MissingField,
}

/// Everything the sync loop can log and carry on from.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    RemoteService(#[from] RemoteServiceError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    MissingField(#[from] MissingFieldError),
}

impl SyncError {
    pub fn kind(&self) -> SyncErrorKind {
        match self {
            SyncError::RemoteService(_) => SyncErrorKind::RemoteService,
            SyncError::Persistence(PersistenceError::MissingField(_)) | SyncError::MissingField(_) => {
                SyncErrorKind::MissingField
            }
            SyncError::Persistence(_) => SyncErrorKind::Persistence,
        }
    }
}
