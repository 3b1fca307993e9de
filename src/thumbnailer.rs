//! Public entry points: [`Thumbnailer::thumb`] and [`Thumbnailer::blend`].
//!
//! A `Thumbnailer` owns nothing mutable. It holds an HTTP client for URI
//! sources and a stateless backend, so concurrent calls are independent.
//! The CPU-bound codec work runs on tokio's blocking pool.

use crate::error::ThumbError;
use crate::imaging::operations::{Probe, blend_images, create_thumbnail, resolve_dimensions};
use crate::imaging::{BlendMode, ImageBackend, RustBackend};
use crate::options::ThumbOptions;
use crate::response::{self, ThumbOutput};
use crate::source::{ImageSource, load};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct Thumbnailer<B = RustBackend> {
    client: reqwest::Client,
    backend: Arc<B>,
}

impl Thumbnailer<RustBackend> {
    pub fn new() -> Self {
        Self::with_backend(RustBackend::new())
    }
}

impl Default for Thumbnailer<RustBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> Clone for Thumbnailer<B> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: ImageBackend + 'static> Thumbnailer<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            client: reqwest::Client::new(),
            backend: Arc::new(backend),
        }
    }

    /// Use `client` for URI sources (proxies, timeouts, TLS roots).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Load `source`, resize it per `options` and return it in the requested shape.
    pub async fn thumb(
        &self,
        source: impl Into<ImageSource>,
        options: &ThumbOptions,
    ) -> Result<ThumbOutput, ThumbError> {
        self.thumb_source(source.into(), options)
            .await
            .inspect_err(|e| warn!(kind = ?e.kind(), error = %e, "thumbnail failed"))
    }

    /// Like [`thumb`](Self::thumb), for a loosely typed source value.
    pub async fn thumb_value(
        &self,
        value: serde_json::Value,
        options: &ThumbOptions,
    ) -> Result<ThumbOutput, ThumbError> {
        let source = ImageSource::from_value(value)
            .inspect_err(|e| warn!(kind = ?e.kind(), error = %e, "thumbnail failed"))?;
        self.thumb(source, options).await
    }

    #[instrument(skip_all, fields(source = source.kind()))]
    async fn thumb_source(
        &self,
        source: ImageSource,
        options: &ThumbOptions,
    ) -> Result<ThumbOutput, ThumbError> {
        options.validate()?;

        let loaded = load(source, &self.client).await?;

        let backend = Arc::clone(&self.backend);
        let (percentage, width, height, png) = (
            options.percentage,
            options.width,
            options.height,
            options.png_options,
        );
        let encoded = tokio::task::spawn_blocking(move || {
            let backend = backend.as_ref();
            let probe = Probe::choose(backend, &loaded.bytes, loaded.path.as_deref());
            let dims = resolve_dimensions(backend, probe, percentage, width, height)?;
            debug!(width = dims.width, height = dims.height, "resolved dimensions");
            create_thumbnail(backend, &loaded.bytes, dims, png)
        })
        .await
        .map_err(|e| ThumbError::Codec(format!("thumbnail task failed: {e}")))??;

        info!(
            format = ?encoded.format,
            width = encoded.width,
            height = encoded.height,
            bytes = encoded.bytes.len(),
            "thumbnail created"
        );
        Ok(response::format(encoded.bytes, options.response_type))
    }

    /// Composite `overlay` centred on `base` using `mode`; returns PNG bytes.
    #[instrument(skip_all, fields(mode = %mode))]
    pub async fn blend(
        &self,
        base: impl Into<Vec<u8>>,
        overlay: impl Into<Vec<u8>>,
        mode: BlendMode,
    ) -> Result<Vec<u8>, ThumbError> {
        let (base, overlay) = (base.into(), overlay.into());
        let backend = Arc::clone(&self.backend);
        let encoded = tokio::task::spawn_blocking(move || {
            blend_images(backend.as_ref(), &base, &overlay, mode)
        })
        .await
        .map_err(|e| ThumbError::Codec(format!("blend task failed: {e}")))?
        .map_err(ThumbError::from)
        .inspect_err(|e| warn!(kind = ?e.kind(), error = %e, "blend failed"))?;

        debug!(bytes = encoded.bytes.len(), "blend complete");
        Ok(encoded.bytes)
    }
}

/// Thumbnail `source` with a fresh [`Thumbnailer`].
pub async fn thumb(
    source: impl Into<ImageSource>,
    options: &ThumbOptions,
) -> Result<ThumbOutput, ThumbError> {
    Thumbnailer::new().thumb(source, options).await
}

/// Blend two encoded images with a fresh [`Thumbnailer`].
pub async fn blend(
    base: impl Into<Vec<u8>>,
    overlay: impl Into<Vec<u8>>,
    mode: BlendMode,
) -> Result<Vec<u8>, ThumbError> {
    Thumbnailer::new().blend(base, overlay, mode).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::response::ResponseType;

    #[tokio::test]
    async fn thumb_resolves_then_encodes() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 400,
            height: 200,
        }]);
        let thumbnailer = Thumbnailer::with_backend(backend);

        let out = thumbnailer
            .thumb(vec![1u8, 2, 3], &ThumbOptions::default().with_percentage(25.0))
            .await
            .unwrap();
        assert_eq!(out, ThumbOutput::Buffer(b"thumb".to_vec()));

        assert_eq!(
            thumbnailer.backend.get_operations(),
            vec![
                RecordedOp::Identify(3),
                RecordedOp::Thumbnail {
                    width: 100,
                    height: 50,
                    force: false,
                },
            ]
        );
    }

    #[tokio::test]
    async fn thumb_base64_response() {
        let thumbnailer = Thumbnailer::with_backend(MockBackend::new());
        let options = ThumbOptions::default()
            .with_width(4)
            .with_height(4)
            .with_response_type(ResponseType::Base64);

        let out = thumbnailer.thumb(vec![0u8], &options).await.unwrap();
        assert_eq!(out, ThumbOutput::Base64("dGh1bWI=".into()));
    }

    #[tokio::test]
    async fn thumb_probe_failure_is_codec_error() {
        let thumbnailer = Thumbnailer::with_backend(MockBackend::new());

        let err = thumbnailer
            .thumb(vec![0u8], &ThumbOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Codec);
    }

    #[tokio::test]
    async fn thumb_rejects_invalid_options_before_loading() {
        let thumbnailer = Thumbnailer::with_backend(MockBackend::new());
        let mut options = ThumbOptions::default();
        options.png_options.compression_level = 42;

        let err = thumbnailer
            .thumb("/does/not/matter.png", &options)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOptions);
        assert!(thumbnailer.backend.get_operations().is_empty());
    }

    #[tokio::test]
    async fn thumb_value_rejects_unsupported_type() {
        let thumbnailer = Thumbnailer::with_backend(MockBackend::new());

        let err = thumbnailer
            .thumb_value(serde_json::json!(3.5), &ThumbOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedSource);
    }

    #[tokio::test]
    async fn blend_delegates_to_backend() {
        let thumbnailer = Thumbnailer::with_backend(MockBackend::new());

        let out = thumbnailer
            .blend(vec![1u8], vec![2u8], BlendMode::Darken)
            .await
            .unwrap();
        assert_eq!(out, b"blend");
        assert_eq!(
            thumbnailer.backend.get_operations(),
            vec![RecordedOp::Composite {
                mode: BlendMode::Darken
            }]
        );
    }
}
