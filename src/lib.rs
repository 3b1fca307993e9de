//! # image-thumb
//!
//! Turns an image from almost anywhere (base64 text, an HTTP(S) URI, a file
//! path, a byte buffer or an async byte stream) into a resized thumbnail,
//! returned as raw bytes or base64 text. A second operation composites one
//! image onto another with a named blend mode.
//!
//! ```no_run
//! # async fn demo() -> Result<(), image_thumb::ThumbError> {
//! use image_thumb::{ThumbOptions, thumb};
//!
//! // 10% of the original size (the default), same format as the input
//! let small = thumb("photos/dawn.jpg", &ThumbOptions::default()).await?;
//!
//! // 320 px wide; the height stays the original's
//! let wide = thumb("photos/dawn.jpg", &ThumbOptions::default().with_width(320)).await?;
//! # let _ = (small, wide);
//! # Ok(())
//! # }
//! ```
//!
//! # Pipeline
//!
//! ```text
//! ImageSource ──load──▶ bytes ──resolve──▶ (w, h) ──thumbnail──▶ encoded ──format──▶ ThumbOutput
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | The five source variants, classification, and loading to bytes |
//! | [`imaging`] | Dimension math, the codec backend trait, resize/encode/composite |
//! | [`options`] | [`ThumbOptions`] with defaults, JSON parsing and validation |
//! | [`response`] | Raw bytes vs. base64 output |
//! | [`error`] | [`ThumbError`] and its [`ErrorKind`] categories |
//! | [`thumbnailer`] | [`Thumbnailer`] plus the [`thumb`] / [`blend`] shortcuts |
//!
//! # Dimension Rules
//!
//! - width **and** height given: used exactly; the image is not probed.
//! - only one given: the other side is the image's own size on that axis,
//!   not an aspect-preserving value.
//! - neither: `percentage` (default 10) of each intrinsic side, rounded.
//!
//! Whatever is resolved, the resize never enlarges either axis beyond the
//! source.
//!
//! # Output Format
//!
//! With the default `pngOptions` (`force: false`) the thumbnail keeps the
//! input's format when it can be written back (PNG, JPEG, GIF, BMP, TIFF,
//! WebP); otherwise, or with `force: true`, it is PNG.

pub mod error;
pub mod imaging;
pub mod options;
pub mod response;
pub mod source;
pub mod thumbnailer;

pub use error::{ErrorKind, ThumbError};
pub use imaging::{BlendMode, PngOptions};
pub use options::ThumbOptions;
pub use response::{ResponseType, ThumbOutput};
pub use source::ImageSource;
pub use thumbnailer::{Thumbnailer, blend, thumb};
