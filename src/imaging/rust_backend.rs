//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Probe (bytes) | `image::ImageReader::into_dimensions` (header only) |
//! | Probe (path) | `image::image_dimensions` |
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image` crate (pure Rust decoders) |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → PNG | `image::codecs::png::PngEncoder` with mapped compression/filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality 80) |
//! | Composite | [`blend`](super::blend) per-pixel operators |

use super::backend::{BackendError, Dimensions, EncodedImage, ImageBackend};
use super::blend;
use super::calculations::clamp_to_original;
use super::params::{BlendMode, PngOptions, ThumbnailParams};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Quality used when a JPEG input is re-encoded as JPEG.
const JPEG_QUALITY: u8 = 80;

/// Formats this backend can write back out when `force` is off.
const PASSTHROUGH_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::WebP,
];

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, BackendError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(BackendError::Io)
}

/// Decode encoded bytes, remembering the container format they came in.
fn decode(bytes: &[u8]) -> Result<(DynamicImage, Option<ImageFormat>), BackendError> {
    let reader = reader(bytes)?;
    let format = reader.format();
    let img = reader
        .decode()
        .map_err(|e| BackendError::ProcessingFailed(format!("Failed to decode image: {e}")))?;
    Ok((img, format))
}

/// Pick the output container: PNG when forced or when the input can't be written back.
fn output_format(input: Option<ImageFormat>, png: &PngOptions) -> ImageFormat {
    match input {
        Some(format) if !png.force && PASSTHROUGH_FORMATS.contains(&format) => format,
        _ => ImageFormat::Png,
    }
}

/// Map a 0–9 zlib level onto the encoder's presets.
fn compression_type(level: u8) -> CompressionType {
    match level {
        0..=3 => CompressionType::Fast,
        4..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// Float images have no PNG/JPEG representation; narrow them to 8-bit.
fn encodable(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            DynamicImage::ImageRgba8(img.to_rgba8())
        }
        other => other,
    }
}

fn encode(img: DynamicImage, format: ImageFormat, png: &PngOptions) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    match format {
        ImageFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut buf,
                compression_type(png.compression_level),
                if png.adaptive_filtering {
                    PngFilterType::Adaptive
                } else {
                    PngFilterType::NoFilter
                },
            );
            encodable(img)
                .write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {e}")))?;
        }
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
            rgb.write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))?;
        }
        other => {
            encodable(img)
                .write_to(&mut Cursor::new(&mut buf), other)
                .map_err(|e| {
                    BackendError::ProcessingFailed(format!("{other:?} encode failed: {e}"))
                })?;
        }
    }
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = reader(bytes)?.into_dimensions().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {e}"))
        })?;
        Ok(Dimensions { width, height })
    }

    fn identify_path(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to read dimensions of {}: {e}",
                path.display()
            ))
        })?;
        Ok(Dimensions { width, height })
    }

    /// TIFF-family files are probed through the file, not the loaded bytes.
    fn prefers_path_probe(&self, path: &Path) -> bool {
        matches!(ImageFormat::from_path(path), Ok(ImageFormat::Tiff))
    }

    fn thumbnail(
        &self,
        bytes: &[u8],
        params: &ThumbnailParams,
    ) -> Result<EncodedImage, BackendError> {
        let (img, input_format) = decode(bytes)?;

        let original = (img.width(), img.height());
        let (width, height) = clamp_to_original((params.width, params.height), original);
        let resized = if (width, height) == original {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };

        let format = output_format(input_format, &params.png);
        let bytes = encode(resized, format, &params.png)?;
        Ok(EncodedImage {
            bytes,
            format,
            width,
            height,
        })
    }

    fn composite(
        &self,
        base: &[u8],
        overlay: &[u8],
        mode: BlendMode,
    ) -> Result<EncodedImage, BackendError> {
        let mut canvas = decode(base)?.0.to_rgba8();
        let overlay = decode(overlay)?.0.to_rgba8();

        if overlay.width() > canvas.width() || overlay.height() > canvas.height() {
            return Err(BackendError::ProcessingFailed(format!(
                "Overlay {}x{} must not exceed base image {}x{}",
                overlay.width(),
                overlay.height(),
                canvas.width(),
                canvas.height()
            )));
        }

        // Centred, matching the default gravity of most compositors
        let x = (canvas.width() - overlay.width()) / 2;
        let y = (canvas.height() - overlay.height()) / 2;
        blend::composite(&mut canvas, &overlay, x, y, mode);

        let (width, height) = canvas.dimensions();
        let bytes = encode(
            DynamicImage::ImageRgba8(canvas),
            ImageFormat::Png,
            &PngOptions::forced(),
        )?;
        Ok(EncodedImage {
            bytes,
            format: ImageFormat::Png,
            width,
            height,
        })
    }
}
