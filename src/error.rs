//! Error types shared by the engine, parser and boundary adapters

use thiserror::Error;

/// Backing-store read/write failure
#[derive(Debug, Error)]
pub enum StorageError {
    /// No state has been written yet under this key
    #[error("no timer state stored at {0}")]
    NotFound(String),
    #[error("state store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored timer state is malformed: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode timer state: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Free text or structured body does not match the command shape
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unrecognized command: {0:?}")]
    Unrecognized(String),
    #[error("blind value out of range: {0}")]
    OutOfRange(String),
    #[error("malformed update body: {0}")]
    Body(String),
    #[error("initial state requires interval, small and big")]
    IncompleteInitialState,
}

/// Missing or invalid credential
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing api token")]
    MissingToken,
    #[error("api token not accepted")]
    InvalidToken,
    #[error("missing signature headers")]
    MissingSignature,
    #[error("signature timestamp outside allowed skew")]
    StaleTimestamp,
    #[error("signature did not verify against any configured secret")]
    InvalidSignature,
    #[error("user {0} is not on the allow-list")]
    UserNotAllowed(String),
}

/// Top-level error returned to every boundary
#[derive(Debug, Error)]
pub enum TimerError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub type Result<T, E = TimerError> = std::result::Result<T, E>;
