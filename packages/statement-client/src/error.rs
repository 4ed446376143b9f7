//! Error types for the statement API client.

use thiserror::Error;

/// Result type for statement client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Statement client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, DNS, reset)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The configured request timeout elapsed
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Non-2xx response from the API
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered 200 but reported that processing failed
    #[error("Service reported failure: {message}")]
    ServiceFailure { message: String },

    /// The response body did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Request payload could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err)
        } else if err.is_decode() {
            ClientError::MalformedResponse(err.to_string())
        } else {
            ClientError::Network(err)
        }
    }
}
