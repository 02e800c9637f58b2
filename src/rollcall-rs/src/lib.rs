//! Rollcall Client Library
//!
//! HTTP client for the Rollcall person search API.

mod client;

use std::time::Duration;

pub use client::{Client, ClientBuilder, StatusClass};
pub use rollcall_core::{Person, SearchRequest, SearchResponse};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response from server: {0}")]
    MalformedResponse(String),

    #[error("bad request ({status}): {message}")]
    BadRequest { status: u16, message: String },

    #[error("access token missing or not recognized")]
    Unauthorized,

    #[error("access token rejected")]
    Forbidden,

    #[error("server error ({status})")]
    Internal { status: u16 },

    #[error("unexpected status {status}")]
    UnexpectedStatus { status: u16 },
}

/// Coarse classification for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The server could not be reached or its reply could not be read
    Network,
    BadRequest,
    Unauthorized,
    Forbidden,
    Internal,
    Unexpected,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Timeout(_)
            | ClientError::Network(_)
            | ClientError::MalformedResponse(_) => ErrorKind::Network,
            ClientError::BadRequest { .. } => ErrorKind::BadRequest,
            ClientError::Unauthorized => ErrorKind::Unauthorized,
            ClientError::Forbidden => ErrorKind::Forbidden,
            ClientError::Internal { .. } => ErrorKind::Internal,
            ClientError::UnexpectedStatus { .. } => ErrorKind::Unexpected,
        }
    }

    /// Whether repeating the same call could succeed. The client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Network | ErrorKind::Internal)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
