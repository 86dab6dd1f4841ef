//! Client error types.

/// Errors that can occur when using the VetBuddy client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a status the caller did not accept.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `error` field of the body, or the body text.
        message: String,
    },

    /// Body was not JSON when JSON was required.
    #[error("expected a JSON body, got: {0}")]
    NotJson(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
