//! Error types for the Copyleaks client.
//!
//! # Design
//! Every failure surfaces as a distinct `Error` variant so callers can tell
//! "rejected before sending" (`Validation`, `Io`, `Serialization`) apart from
//! "the round trip happened and went wrong" (`Transport`, `Api`, `Protocol`).
//! Nothing here is retried; the client has no retry policy of its own.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the client.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied or configured value failed validation. Raised before
    /// any network I/O.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The file for an upload could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The server answered 2xx but the body was not the JSON we expected.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The request never completed (DNS, TLS, connection reset, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// A typed request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl Error {
    /// HTTP status carried by an `Api` error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// A value rejected by one of the validators in [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid callback URL {0:?}")]
    InvalidUrl(String),

    #[error("invalid callback email {0:?}")]
    InvalidEmail(String),

    #[error("invalid custom fields: {0}")]
    InvalidCustomFields(String),

    #[error("invalid process id {0:?}")]
    InvalidProcessId(String),

    #[error("invalid upload file name {0:?}")]
    InvalidFileName(String),
}
