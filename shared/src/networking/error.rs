use std::{error::Error as StdError, io};

use thiserror::Error;

use crate::address::error::AddressError;

/// Coarse classification of a [`NetworkingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or short binary input.
    Decode,
    /// A value outside its declared domain.
    Validation,
    /// Connection, HTTP or timeout failure.
    Transport,
    /// Bad construction parameters. Never retried.
    Configuration,
}

#[derive(Debug, Error)]
pub enum NetworkingError {
    #[error("Read of {width} bytes at offset {offset} is out of bounds for a {len} byte buffer")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error("Expected {expected} bytes but received {actual}")]
    UnexpectedLength { expected: usize, actual: usize },

    #[error("Colour ID {0} is out of range 0-15")]
    InvalidColour(u8),

    #[error("Too many updated colours provided: {count} exceeds the maximum of {max}")]
    TooManyUpdates { count: u64, max: u64 },

    #[error("Websocket provided non-binary data")]
    NonBinaryFrame,

    #[error("HTTP request failed with status {0}")]
    HttpStatus(u16),

    #[error("Response exceeds the maximum content length of {max} bytes")]
    ContentTooLong { max: usize },

    #[error("Request timed out")]
    Timeout,

    #[error("Connection closed: {0}")]
    Closed(String),

    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl NetworkingError {
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Transport(err.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfBounds { .. } | Self::UnexpectedLength { .. } => ErrorKind::Decode,
            Self::InvalidColour(_) | Self::TooManyUpdates { .. } | Self::NonBinaryFrame => {
                ErrorKind::Validation
            }
            Self::HttpStatus(_)
            | Self::ContentTooLong { .. }
            | Self::Timeout
            | Self::Closed(_)
            | Self::Transport(_) => ErrorKind::Transport,
            Self::Configuration(_) | Self::Address(_) | Self::Io(_) | Self::Json(_) => {
                ErrorKind::Configuration
            }
        }
    }
}
