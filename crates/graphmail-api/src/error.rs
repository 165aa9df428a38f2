//! Error types for Graph API operations.

use reqwest::StatusCode;

/// Result type alias for Graph API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when calling the Graph mail API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An operation was invoked before `initialize`. This is a programming
    /// error, not a recoverable runtime condition.
    #[error("Graph client has not been initialized for user auth")]
    NotInitialized,

    /// Non-2xx response from the Graph API, surfaced verbatim.
    #[error("Graph API error ({status}): {body}")]
    Api {
        /// HTTP status code of the response.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },

    /// Authentication failed while obtaining a bearer token.
    #[error("Authentication error: {0}")]
    OAuth(#[from] graphmail_oauth::Error),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
