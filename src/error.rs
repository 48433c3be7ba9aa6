//! Request-level errors
//!
//! Every failure while serving a media file ends the response with a JSON
//! payload describing it. Only some kinds carry their own status code.

use hyper::StatusCode;
use serde::Serialize;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("file not found: {path}")]
    NotFound { path: String },

    #[error("failed to stat {path}: {message}")]
    StatFailed { path: String, message: String },

    #[error("stream failed for {path}: {source}")]
    StreamFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("range not satisfiable for a file of {total_size} bytes")]
    RangeNotSatisfiable { total_size: u64 },
}

/// Machine-readable error kind, serialized in the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    StatFailed,
    StreamFailed,
    RangeNotSatisfiable,
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    kind: ErrorKind,
    message: &'a str,
}

impl MediaError {
    /// Classify a failed `stat` of `path`
    pub fn from_stat(path: &str, err: &io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_string(),
            }
        } else {
            Self::StatFailed {
                path: path.to_string(),
                message: err.to_string(),
            }
        }
    }

    pub fn stream(path: &str, source: io::Error) -> Self {
        Self::StreamFailed {
            path: path.to_string(),
            source,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::StatFailed { .. } => ErrorKind::StatFailed,
            Self::StreamFailed { .. } => ErrorKind::StreamFailed,
            Self::RangeNotSatisfiable { .. } => ErrorKind::RangeNotSatisfiable,
        }
    }

    /// Status to set before the payload, if any.
    ///
    /// `StatFailed` returns `None`: the response keeps the builder's default
    /// status. `StreamFailed` returns `None` because the 206 head has
    /// already been sent by the time it happens.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Self::RangeNotSatisfiable { .. } => Some(StatusCode::RANGE_NOT_SATISFIABLE),
            Self::StatFailed { .. } | Self::StreamFailed { .. } => None,
        }
    }

    /// JSON body: `{"error":{"kind":"...","message":"..."}}`
    #[must_use]
    pub fn to_payload(&self) -> String {
        let message = self.to_string();
        let payload = ErrorPayload {
            error: ErrorBody {
                kind: self.kind(),
                message: &message,
            },
        };
        serde_json::to_string(&payload)
            .unwrap_or_else(|_| format!("{{\"error\":{{\"message\":{message:?}}}}}"))
    }
}
