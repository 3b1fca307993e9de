//! Error taxonomy for every public operation.
//!
//! Each failure lands in exactly one [`ThumbError`] variant and keeps the
//! underlying message, so callers can branch on [`ThumbError::kind`] and
//! still show the original text.

use crate::imaging::BackendError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure category, stable across message wording changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedSource,
    Fetch,
    Filesystem,
    Stream,
    Codec,
    InvalidOptions,
}

#[derive(Error, Debug)]
pub enum ThumbError {
    #[error("unsupported source type: {0}")]
    UnsupportedSource(String),
    #[error("failed to fetch {uri}: {source}")]
    Fetch {
        uri: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("stream error: {0}")]
    Stream(#[source] io::Error),
    #[error("{0}")]
    Codec(String),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl ThumbError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedSource(_) => ErrorKind::UnsupportedSource,
            Self::Fetch { .. } => ErrorKind::Fetch,
            Self::Filesystem { .. } => ErrorKind::Filesystem,
            Self::Stream(_) => ErrorKind::Stream,
            Self::Codec(_) => ErrorKind::Codec,
            Self::InvalidOptions(_) => ErrorKind::InvalidOptions,
        }
    }
}

impl From<BackendError> for ThumbError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Io(e) => Self::Codec(format!("IO error: {e}")),
            BackendError::ProcessingFailed(msg) => Self::Codec(msg),
        }
    }
}
