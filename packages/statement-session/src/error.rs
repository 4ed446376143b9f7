//! Typed errors for the session crate.
//!
//! Uses `thiserror` for library errors (not `anyhow`); the CLI adds context
//! at the edge.

use statement_client::ClientError;
use thiserror::Error;

/// Rejected schema edits.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Column name was empty after trimming
    #[error("column name must not be empty")]
    InvalidInput,
}

/// Rejected or failed file selections.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// Candidate is not a PDF; the previous selection is kept
    #[error("unsupported file type '{media_type}': please upload a PDF file")]
    UnsupportedType { media_type: String },

    /// The preview for the new file could not be prepared
    #[error("could not prepare file preview: {0}")]
    Preview(#[source] std::io::Error),
}

/// Coarse failure kinds of an extraction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Service,
    MalformedResponse,
}

/// Failures of the extraction gateway.
///
/// All of them end a submission in the `Failed` phase; the kinds stay
/// distinct for logging.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Transport or connectivity problem (including timeouts)
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The service answered with an error
    #[error("service failure: {0}")]
    ServiceFailure(String),

    /// The service answered without the expected row list
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GatewayError::NetworkFailure(_) => FailureKind::Network,
            GatewayError::ServiceFailure(_) => FailureKind::Service,
            GatewayError::MalformedResponse(_) => FailureKind::MalformedResponse,
        }
    }

    /// Message suitable for showing next to the extract button.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::NetworkFailure(_) => {
                "Could not reach the extraction service. Check your connection and try again."
                    .to_string()
            }
            GatewayError::ServiceFailure(detail) => {
                format!("The extraction service could not process this statement: {}", detail)
            }
            GatewayError::MalformedResponse(_) => {
                "The extraction service returned an unexpected response.".to_string()
            }
        }
    }
}

impl From<ClientError> for GatewayError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(e) => GatewayError::NetworkFailure(e.to_string()),
            ClientError::Timeout(e) => GatewayError::NetworkFailure(e.to_string()),
            ClientError::Api { status, message } => {
                GatewayError::ServiceFailure(format!("HTTP {}: {}", status, message))
            }
            ClientError::ServiceFailure { message } => GatewayError::ServiceFailure(message),
            ClientError::MalformedResponse(detail) => GatewayError::MalformedResponse(detail),
            ClientError::Serialization(e) => {
                GatewayError::MalformedResponse(format!("could not encode request: {}", e))
            }
        }
    }
}

/// CSV export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
