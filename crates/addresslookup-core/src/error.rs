// crates/addresslookup-core/src/error.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the session, the endpoints and the HTTP collaborator.
///
/// None of these is fatal to a widget instance: every path that produces one
/// leaves the session ready for the next input event.
#[derive(Debug, Error)]
pub enum AutocompleteError {
    /// The lookup was superseded by newer input. Never shown to the user.
    #[error("request cancelled: superseded by newer input")]
    Cancelled,

    /// Non-2xx response or network failure from the remote service.
    #[error("{}", transport_message(.status, .message))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The service answered, but not with something we can use
    /// (e.g. a retrieval returning zero records).
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[cfg(feature = "client")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

fn transport_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Postcoder request error {code} : {message}"),
        None => format!("Postcoder request error : {message}"),
    }
}

pub type Result<T> = std::result::Result<T, AutocompleteError>;

/// Coarse classification of an [`AutocompleteError`], stable enough to hand
/// across the JS boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Cancelled,
    Transport,
    MalformedResponse,
    Config,
    Decode,
}

impl AutocompleteError {
    /// Builds a transport failure from an HTTP status and response body.
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Transport { .. } => ErrorKind::Transport,
            #[cfg(feature = "client")]
            Self::Http(_) => ErrorKind::Transport,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Config(_) | Self::Url(_) => ErrorKind::Config,
            Self::Json(_) => ErrorKind::Decode,
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// A failure as it travels over the diagnostic channel
/// ([`crate::Effect::Report`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&AutocompleteError> for Diagnostic {
    fn from(err: &AutocompleteError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
