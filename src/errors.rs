use std::{io, time::Duration};

use thiserror::Error;

use crate::protocol::{Response, StatusCode};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("bad request: {reason}")]
    BadRequest { reason: String },
    #[error("internal error")]
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest {
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status_line(&self) -> String {
        match self {
            Self::BadRequest { reason } if reason.is_empty() => {
                StatusCode::BadRequest.as_str().to_string()
            }
            Self::BadRequest { reason } => format!("{} {reason}", StatusCode::BadRequest.as_str()),
            Self::Internal { .. } => StatusCode::Error.as_str().to_string(),
        }
    }

    pub fn into_response(self) -> Response {
        if let Self::Internal { message } = &self {
            tracing::error!(error = %message, "request failed with internal error");
        }
        Response::status_only(self.status_line())
    }
}

/// Failures of a single connection's read/write cycle.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("socket i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("client sent nothing within {0:?}")]
    Timeout(Duration),
    #[error("response encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
