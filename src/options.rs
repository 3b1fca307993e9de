//! Thumbnail options.
//!
//! The record mirrors the option names callers already use, so it can be
//! built in code or parsed from JSON:
//!
//! ```json
//! {
//!   "percentage": 10,          // used only when neither width nor height is set
//!   "width": 320,              // optional
//!   "height": 240,             // optional
//!   "responseType": "buffer",  // or "base64"
//!   "pngOptions": { "force": false, "compressionLevel": 6, "adaptiveFiltering": false }
//! }
//! ```
//!
//! Every key is optional. Unknown top-level keys are rejected to catch typos
//! early; `pngOptions` is an encoder pass-through and ignores keys it does
//! not know.

use crate::error::ThumbError;
use crate::imaging::PngOptions;
use crate::response::ResponseType;
use serde::{Deserialize, Serialize};

/// Share of the original size used when no explicit width or height is given.
pub const DEFAULT_PERCENTAGE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ThumbOptions {
    /// Percentage of the intrinsic size, applied per axis.
    pub percentage: f64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub response_type: ResponseType,
    pub png_options: PngOptions,
}

impl Default for ThumbOptions {
    fn default() -> Self {
        Self {
            percentage: DEFAULT_PERCENTAGE,
            width: None,
            height: None,
            response_type: ResponseType::default(),
            png_options: PngOptions::default(),
        }
    }
}

impl ThumbOptions {
    /// Parse options from JSON, apply defaults and validate.
    pub fn from_json(json: &str) -> Result<Self, ThumbError> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| ThumbError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Validate values the encoder cannot accept.
    ///
    /// Percentage, width and height are deliberately left alone: odd values
    /// flow through to the resize step.
    pub fn validate(&self) -> Result<(), ThumbError> {
        if self.png_options.compression_level > 9 {
            return Err(ThumbError::InvalidOptions(
                "pngOptions.compressionLevel must be 0-9".into(),
            ));
        }
        Ok(())
    }

    pub fn with_percentage(mut self, percentage: f64) -> Self {
        self.percentage = percentage;
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn with_png_options(mut self, png_options: PngOptions) -> Self {
        self.png_options = png_options;
        self
    }
}
