use thiserror::Error;

/// Service-wide error type for the to-do service.
#[derive(Debug, Error)]
pub enum TodoError {
    /// The request carried an API version tag other than the supported one.
    #[error("invalid api version: {0}")]
    UnsupportedApi(String),

    /// An identifier that does not parse as a 24-hex persistence key.
    #[error("invalid id {0:?}: expected a 24 character hex string")]
    InvalidId(String),

    /// A missing or out-of-range timestamp.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A required message field was absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// No document matched the identifier. Carries the full message.
    #[error("{0}")]
    NotFound(String),

    /// Storage layer error (driver failure, failed write, failed query).
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored document could not be decoded into a `ToDoItem`.
    #[error("Decode error: {0}")]
    Decode(String),
}
