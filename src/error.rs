use thiserror::Error;

/// Errors surfaced by the session store.
///
/// Storage writes used to fail silently in the app this crate replaces;
/// every store operation now reports its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("secure storage backend unavailable")]
    Unavailable,
    #[error("storage write failed: {0}")]
    WriteFailed(String),
    #[error("storage read failed: {0}")]
    ReadFailed(String),
}

/// Errors returned by client operations before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("username must be at least {minimum} characters")]
    UsernameTooShort { minimum: usize },
}

/// Errors from the built-in request executor.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unsupported http method: {0}")]
    UnsupportedMethod(String),
}
