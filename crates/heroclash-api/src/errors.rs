//! Error taxonomy shared across the client crates.
//!
//! Every failure a view can observe maps onto one of these variants; views
//! render `Display` output into their single message slot. Nothing here is
//! retried automatically, a re-issue is always an explicit caller action.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Shared error message and cause payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(message: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }
}

/// Backend response classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    Authentication,
    AccessDenied,
    NotFound,
    Validation,
    Server,
    Other,
}

/// Non-2xx backend response with metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub info: ErrorInfo,
    pub kind: ApiErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            info: ErrorInfo::new(message),
            kind,
            status_code: None,
            raw: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub info: ErrorInfo,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            info: ErrorInfo::new(message),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionError {
    pub info: ErrorInfo,
}

impl ConnectionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            info: ErrorInfo::new(message),
        }
    }

    pub fn with_cause(message: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            info: ErrorInfo::with_cause(message, cause),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkError {
    pub info: ErrorInfo,
}

impl NetworkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            info: ErrorInfo::new(message),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecodeError {
    pub info: ErrorInfo,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            info: ErrorInfo::new(message),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationError {
    pub info: ErrorInfo,
}

impl ConfigurationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            info: ErrorInfo::new(message),
        }
    }
}

/// Unified client error type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Error)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientError {
    /// No bearer token was present before an authenticated call.
    #[error("Authorization token is missing")]
    MissingCredentials,
    #[error("{0}")]
    Api(ApiError),
    #[error("{0}")]
    Validation(ValidationError),
    #[error("{0}")]
    Connection(ConnectionError),
    #[error("{0}")]
    Network(NetworkError),
    #[error("{0}")]
    Decode(DecodeError),
    #[error("{0}")]
    Configuration(ConfigurationError),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.info.message)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.info.message)
    }
}

impl std::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.info.message)
    }
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.info.message)
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.info.message)
    }
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.info.message)
    }
}

impl ClientError {
    pub fn message(&self) -> &str {
        match self {
            ClientError::MissingCredentials => "Authorization token is missing",
            ClientError::Api(err) => &err.info.message,
            ClientError::Validation(err) => &err.info.message,
            ClientError::Connection(err) => &err.info.message,
            ClientError::Network(err) => &err.info.message,
            ClientError::Decode(err) => &err.info.message,
            ClientError::Configuration(err) => &err.info.message,
        }
    }

    /// True for a 403-class rejection, kept distinguishable from generic
    /// failure so the duel-start flow can show a dedicated message.
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            ClientError::Api(ApiError {
                kind: ApiErrorKind::AccessDenied,
                ..
            })
        )
    }

    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            ClientError::MissingCredentials
                | ClientError::Api(ApiError {
                    kind: ApiErrorKind::Authentication,
                    ..
                })
        )
    }
}

/// Map HTTP status codes to an error kind.
pub fn map_http_status(status: u16) -> ApiErrorKind {
    match status {
        400 | 422 => ApiErrorKind::Validation,
        401 => ApiErrorKind::Authentication,
        403 => ApiErrorKind::AccessDenied,
        404 => ApiErrorKind::NotFound,
        500..=599 => ApiErrorKind::Server,
        _ => ApiErrorKind::Other,
    }
}

/// Build an [`ApiError`] from a non-2xx response body.
///
/// Backend error bodies are usually `{"message": "..."}` but bare strings
/// show up too; fall back to the raw text, then to the status line.
pub fn build_api_error(status: u16, body_text: &str) -> ClientError {
    let raw_json = serde_json::from_str::<Value>(body_text).ok();
    let message = raw_json
        .as_ref()
        .and_then(|json| json.get("message"))
        .and_then(Value::as_str)
        .or_else(|| {
            raw_json
                .as_ref()
                .and_then(|json| json.get("error"))
                .and_then(Value::as_str)
        })
        .map(ToString::to_string)
        .unwrap_or_else(|| {
            let trimmed = body_text.trim();
            if trimmed.is_empty() {
                format!("Request failed with status {status}")
            } else {
                trimmed.to_string()
            }
        });

    ClientError::Api(ApiError {
        info: ErrorInfo::new(message),
        kind: map_http_status(status),
        status_code: Some(status),
        raw: raw_json,
    })
}
