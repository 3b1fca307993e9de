//! Image processing, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions`, `image::image_dimensions` |
//! | **Thumbnail** | `resize_exact` (Lanczos3, never enlarging) + PNG/JPEG/… encoders |
//! | **Blend** | per-pixel Porter-Duff and separable blend modes |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod blend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, EncodedImage, ImageBackend};
pub use calculations::{clamp_to_original, merge_dimensions, scale_by_percentage};
pub use operations::{Probe, blend_images, create_thumbnail, get_dimensions, resolve_dimensions};
pub use params::{BlendMode, PngOptions, ThumbnailParams};
pub use rust_backend::RustBackend;
