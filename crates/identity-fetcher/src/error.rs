//! Error types for identity providers and the request sender

use std::fmt;

use reqwest::StatusCode;

/// Stage labels attached to provider failures
pub const STAGE_FETCH_IDENTITY: &str = "fetch identity failed";
pub const STAGE_DECODE_IDENTITY: &str = "decode identity failed";
pub const STAGE_FETCH_RECOMMENDATIONS: &str = "fetch recommendations failed";
pub const STAGE_DECODE_RECOMMENDATIONS: &str = "decode recommendations failed";
pub const STAGE_TASK_LOST: &str = "provider task lost";

/// Errors returned by a [`RequestSender`](crate::RequestSender)
#[derive(Debug)]
pub enum SendError {
    /// HTTP request failed before a response arrived
    Http(reqwest::Error),
    /// Upstream answered with a non-success status
    Status(StatusCode, String),
    /// HTTP client could not be constructed
    Client(String),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Status(status, url) => write!(f, "{url} returned status {status}"),
            Self::Client(msg) => write!(f, "HTTP client error: {msg}"),
        }
    }
}

impl std::error::Error for SendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SendError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

/// Failure of a single provider for one address
#[derive(Debug)]
pub enum ProviderError {
    /// The request sender failed
    Transport {
        stage: &'static str,
        source: SendError,
    },
    /// The response did not match the expected shape
    Decode {
        stage: &'static str,
        source: serde_json::Error,
    },
    /// Upstream answered but reported its own failure in the body
    Upstream {
        stage: &'static str,
        message: String,
    },
    /// The co-attendee lookup for one POAP event failed
    Enrichment {
        event_id: u64,
        source: Box<ProviderError>,
    },
    /// The provider task ended without reporting a result
    Lost,
}

impl ProviderError {
    pub(crate) fn transport(stage: &'static str) -> impl FnOnce(SendError) -> Self {
        move |source| Self::Transport { stage, source }
    }

    pub(crate) fn decode(stage: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::Decode { stage, source }
    }

    /// Human readable label of the stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Transport { stage, .. }
            | Self::Decode { stage, .. }
            | Self::Upstream { stage, .. } => *stage,
            Self::Enrichment { source, .. } => source.stage(),
            Self::Lost => STAGE_TASK_LOST,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { stage, source } => write!(f, "{stage}: {source}"),
            Self::Decode { stage, source } => write!(f, "{stage}: {source}"),
            Self::Upstream { stage, message } => write!(f, "{stage}: upstream error: {message}"),
            Self::Enrichment { event_id, source } => {
                write!(f, "enrichment of event {event_id} failed: {source}")
            }
            Self::Lost => write!(f, "{STAGE_TASK_LOST}"),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::Enrichment { source, .. } => Some(source.as_ref()),
            Self::Upstream { .. } | Self::Lost => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_error() -> serde_json::Error {
        serde_json::from_str::<u64>("not json").unwrap_err()
    }

    #[test]
    fn test_status_display() {
        let err = SendError::Status(StatusCode::BAD_GATEWAY, "https://api.example".to_string());
        assert_eq!(
            err.to_string(),
            "https://api.example returned status 502 Bad Gateway"
        );
    }

    #[test]
    fn test_stage_of_transport_and_decode() {
        let err = ProviderError::transport(STAGE_FETCH_IDENTITY)(SendError::Client(
            "boom".to_string(),
        ));
        assert_eq!(err.stage(), STAGE_FETCH_IDENTITY);
        assert!(err.to_string().starts_with("fetch identity failed: "));

        let err = ProviderError::decode(STAGE_DECODE_IDENTITY)(decode_error());
        assert_eq!(err.stage(), STAGE_DECODE_IDENTITY);
    }

    #[test]
    fn test_enrichment_reports_inner_stage() {
        let err = ProviderError::Enrichment {
            event_id: 42,
            source: Box::new(ProviderError::decode(STAGE_DECODE_RECOMMENDATIONS)(
                decode_error(),
            )),
        };
        assert_eq!(err.stage(), STAGE_DECODE_RECOMMENDATIONS);
        assert!(err.to_string().contains("event 42"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_upstream_error_keeps_message() {
        let err = ProviderError::Upstream {
            stage: STAGE_FETCH_RECOMMENDATIONS,
            message: "indexer unavailable".to_string(),
        };
        assert_eq!(err.stage(), STAGE_FETCH_RECOMMENDATIONS);
        assert_eq!(
            err.to_string(),
            "fetch recommendations failed: upstream error: indexer unavailable"
        );
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_lost_display() {
        assert_eq!(ProviderError::Lost.to_string(), "provider task lost");
        assert_eq!(ProviderError::Lost.stage(), STAGE_TASK_LOST);
    }
}
