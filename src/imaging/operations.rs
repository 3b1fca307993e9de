//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take the caller's request, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, EncodedImage, ImageBackend};
use super::calculations::{merge_dimensions, scale_by_percentage};
use super::params::{BlendMode, PngOptions, ThumbnailParams};
use std::path::Path;
use tracing::debug;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Where intrinsic dimensions are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe<'a> {
    Bytes(&'a [u8]),
    Path(&'a Path),
}

impl<'a> Probe<'a> {
    /// Probe `path` when the backend trusts it more than `bytes`, else `bytes`.
    pub fn choose(backend: &impl ImageBackend, bytes: &'a [u8], path: Option<&'a Path>) -> Self {
        match path {
            Some(path) if backend.prefers_path_probe(path) => Probe::Path(path),
            _ => Probe::Bytes(bytes),
        }
    }
}

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, probe: Probe<'_>) -> Result<Dimensions> {
    match probe {
        Probe::Bytes(bytes) => backend.identify(bytes),
        Probe::Path(path) => backend.identify_path(path),
    }
}

/// Resolve the final thumbnail size.
///
/// 1. Both sides requested: used as-is, the image is never probed.
/// 2. One side requested: the other is the image's own size on that axis.
/// 3. Neither: `percentage` of the intrinsic size, per axis.
pub fn resolve_dimensions(
    backend: &impl ImageBackend,
    probe: Probe<'_>,
    percentage: f64,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<Dimensions> {
    if let (Some(width), Some(height)) = (width, height) {
        return Ok(Dimensions { width, height });
    }

    let original = get_dimensions(backend, probe)?;
    let original = (original.width, original.height);
    debug!(
        probe = probe_label(&probe),
        width = original.0,
        height = original.1,
        "probed intrinsic size"
    );

    let resolved = if width.is_some() || height.is_some() {
        merge_dimensions(original, width, height)
    } else {
        scale_by_percentage(original, percentage)
    };
    Ok(resolved.into())
}

fn probe_label(probe: &Probe<'_>) -> &'static str {
    match probe {
        Probe::Bytes(_) => "bytes",
        Probe::Path(_) => "path",
    }
}

/// Plan a thumbnail operation without executing it.
pub fn plan_thumbnail(dims: Dimensions, png: PngOptions) -> ThumbnailParams {
    ThumbnailParams {
        width: dims.width,
        height: dims.height,
        png,
    }
}

/// Create a thumbnail from encoded bytes.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    bytes: &[u8],
    dims: Dimensions,
    png: PngOptions,
) -> Result<EncodedImage> {
    backend.thumbnail(bytes, &plan_thumbnail(dims, png))
}

/// Composite `overlay` onto `base` with `mode`.
pub fn blend_images(
    backend: &impl ImageBackend,
    base: &[u8],
    overlay: &[u8],
    mode: BlendMode,
) -> Result<EncodedImage> {
    backend.composite(base, overlay, mode)
}
