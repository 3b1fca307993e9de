//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the codec boundary: header-only probing
//! (from bytes or from a path), thumbnail resize + encode, and compositing.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Everything is statically linked into the binary.

use super::params::{BlendMode, ThumbnailParams};
use image::ImageFormat;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// An encoded image produced by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Probing must only read header metadata. `thumbnail` and `composite` do
/// the full decode → transform → encode cycle and are CPU bound; callers
/// run them off the async scheduler.
pub trait ImageBackend: Send + Sync {
    /// Read intrinsic dimensions from encoded bytes.
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;

    /// Read intrinsic dimensions from a file on disk.
    fn identify_path(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Whether probing `path` directly is more reliable than probing its bytes.
    fn prefers_path_probe(&self, _path: &Path) -> bool {
        false
    }

    /// Decode, resize (never enlarging) and re-encode.
    fn thumbnail(
        &self,
        bytes: &[u8],
        params: &ThumbnailParams,
    ) -> Result<EncodedImage, BackendError>;

    /// Composite `overlay` centred on `base` and encode the result.
    fn composite(
        &self,
        base: &[u8],
        overlay: &[u8],
        mode: BlendMode,
    ) -> Result<EncodedImage, BackendError>;
}
