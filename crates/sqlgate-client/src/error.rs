//! Error types for the sqlgate client.
//!
//! Every fallible operation in this crate returns [`ClientError`] via
//! [`Result`]. Statement failures deliberately stay message-carrying: the
//! engine's own error text is the description callers see, with no
//! per-engine error codes layered on top.

use thiserror::Error;

/// Alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Unified error type for all client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    // -- Statement execution ------------------------------------------------
    /// The database engine rejected or failed a statement. The message is
    /// the engine's native error text, passed through verbatim.
    #[error("response error: {message}")]
    Response { message: String },

    // -- Connection lifecycle -----------------------------------------------
    /// Opening the database at the given locator failed.
    #[error("cannot connect to `{locator}`: {message}")]
    Connect { locator: String, message: String },

    /// The connection has been closed; no further batches are accepted.
    #[error("connection is closed")]
    ConnectionClosed,

    // -- Locator handling ---------------------------------------------------
    /// The database URL could not be parsed or uses an unknown scheme.
    #[error("invalid database URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The URL names a backend this build does not ship a driver for.
    #[error("URL scheme `{scheme}` is recognized but not supported by this build")]
    UnsupportedScheme { scheme: String },

    // -- Infrastructure -----------------------------------------------------
    /// A blocking worker task was cancelled or panicked.
    #[error("background task failed: {0}")]
    TaskJoin(String),

    /// A driver broke its own contract. Prefer a typed variant whenever
    /// possible.
    #[error("internal client error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for ClientError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskJoin(err.to_string())
    }
}
