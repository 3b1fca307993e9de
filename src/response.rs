//! Shapes encoder output into what the caller asked for.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Requested result shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    #[default]
    Buffer,
    Base64,
}

/// A finished thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbOutput {
    Buffer(Vec<u8>),
    Base64(String),
}

impl ThumbOutput {
    /// The encoded image bytes, decoding base64 output if necessary.
    pub fn into_bytes(self) -> Result<Vec<u8>, base64::DecodeError> {
        match self {
            Self::Buffer(bytes) => Ok(bytes),
            Self::Base64(text) => STANDARD.decode(text),
        }
    }

    pub fn as_base64(&self) -> Option<&str> {
        match self {
            Self::Base64(text) => Some(text),
            Self::Buffer(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Buffer(bytes) => Some(bytes),
            Self::Base64(_) => None,
        }
    }
}

pub fn format(bytes: Vec<u8>, response_type: ResponseType) -> ThumbOutput {
    match response_type {
        ResponseType::Buffer => ThumbOutput::Buffer(bytes),
        ResponseType::Base64 => ThumbOutput::Base64(STANDARD.encode(bytes)),
    }
}
