//! Error types for the Onix WAPI client

use thiserror::Error;

/// Errors that can occur when talking to the WAPI or the token endpoint
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection, TLS or HTTP status failure
    #[error("Connection to remote host failed: {message}{}", server_message(.body))]
    Transport {
        /// Underlying cause
        message: String,
        /// Readable error body returned by the server, if any
        body: Option<String>,
    },

    /// Response body was not the expected JSON document
    #[error("Failed to parse json from host: {0}")]
    Parse(String),

    /// Invalid configuration or argument
    #[error("invalid configuration: {0}")]
    Validation(String),
}

fn server_message(body: &Option<String>) -> String {
    body.as_deref()
        .map(|body| format!(" with message: {body}"))
        .unwrap_or_default()
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport {
            message: err.to_string(),
            body: None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Parse(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Validation(format!("invalid URL: {err}"))
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
