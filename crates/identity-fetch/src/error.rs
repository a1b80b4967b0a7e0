//! Error types for the identity-fetch command

use std::fmt;

use identity_fetcher::SendError;

#[derive(Debug)]
pub enum CliError {
    /// HTTP client could not be built
    Client(SendError),
    /// Output could not be serialized
    Json(serde_json::Error),
    /// Configuration error
    Config(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(e) => write!(f, "HTTP client error: {}", e),
            Self::Json(e) => write!(f, "JSON error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl From<SendError> for CliError {
    fn from(e: SendError) -> Self {
        Self::Client(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
