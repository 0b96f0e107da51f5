use std::fmt;

use serde::Serialize;

/// Structured error type for the engine. Replaces stringly-typed errors so
/// tool callers can match on error codes and render appropriate output.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "code", content = "detail")]
pub enum AppError {
    /// Missing or malformed tool argument.
    InvalidInput { message: String },
    /// A name lookup matched nothing, or matched more than one resource.
    /// The message lists the candidates.
    Resolution { message: String },
    /// Network, TLS, or socket failure talking to the bridge.
    Transport { message: String },
    /// The bridge answered with an HTTP error status.
    Http { code: u16, body: String },
    /// The bridge answered 2xx but reported errors in the response envelope.
    Bridge { description: String },
    /// A response body could not be decoded.
    Decode { message: String },
    /// An operation exceeded its deadline.
    Timeout { what: String },
    NotFound { what: String },
    /// A state invariant was violated: sequence-id collision while running,
    /// empty cache name, streamer already active, and the like.
    State { message: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput { message } => write!(f, "{message}"),
            AppError::Resolution { message } => write!(f, "{message}"),
            AppError::Transport { message } => write!(f, "transport error: {message}"),
            AppError::Http { code, body } => write!(f, "HTTP {code}: {body}"),
            AppError::Bridge { description } => write!(f, "API error: {description}"),
            AppError::Decode { message } => write!(f, "decode error: {message}"),
            AppError::Timeout { what } => write!(f, "{what} timed out"),
            AppError::NotFound { what } => write!(f, "{what} not found"),
            AppError::State { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::Timeout {
                what: "bridge request".to_string(),
            }
        } else if e.is_decode() {
            AppError::Decode {
                message: e.to_string(),
            }
        } else {
            AppError::Transport {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Decode {
            message: e.to_string(),
        }
    }
}

/// Allow converting AppError to String for CLI output and HTTP error bodies.
impl From<AppError> for String {
    fn from(e: AppError) -> String {
        e.to_string()
    }
}

impl AppError {
    pub fn input(message: impl Into<String>) -> Self {
        AppError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn state(message: impl Into<String>) -> Self {
        AppError::State {
            message: message.into(),
        }
    }
}
