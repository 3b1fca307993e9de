//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which resolves sizes and formats) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`PngOptions`]: Encoder settings forwarded verbatim from the caller.
//! - [`ThumbnailParams`]: Target dimensions plus encoder settings for one thumbnail.
//! - [`BlendMode`]: Compositing operator for [`blend`](crate::blend).

use crate::error::ThumbError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// PNG encoder settings.
///
/// `force = false` (the default) keeps the input's container format whenever
/// the backend can write it; only undecodable-for-output inputs fall back to
/// PNG. Unknown keys are accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PngOptions {
    /// Always emit PNG, even when the input was another format.
    pub force: bool,
    /// zlib effort, 0 (fastest) to 9 (smallest).
    pub compression_level: u8,
    /// Pick a row filter per scanline instead of none.
    pub adaptive_filtering: bool,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            force: false,
            compression_level: 6,
            adaptive_filtering: false,
        }
    }
}

impl PngOptions {
    /// Options that always produce PNG output.
    pub fn forced() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }
}

/// Parameters for a thumbnail operation (resize + re-encode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailParams {
    /// Resolved target dimensions; the backend still refuses to enlarge.
    pub width: u32,
    pub height: u32,
    pub png: PngOptions,
}

/// How an overlay is composited onto a base image.
///
/// Porter-Duff operators plus the separable blend modes. Names follow the
/// usual kebab-case spelling (`dest-over`, `colour-dodge`); American
/// spellings are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    Clear,
    Source,
    Over,
    In,
    Out,
    Atop,
    Dest,
    DestOver,
    DestIn,
    DestOut,
    DestAtop,
    Xor,
    Add,
    Saturate,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColourDodge,
    ColourBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}

impl BlendMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Source => "source",
            Self::Over => "over",
            Self::In => "in",
            Self::Out => "out",
            Self::Atop => "atop",
            Self::Dest => "dest",
            Self::DestOver => "dest-over",
            Self::DestIn => "dest-in",
            Self::DestOut => "dest-out",
            Self::DestAtop => "dest-atop",
            Self::Xor => "xor",
            Self::Add => "add",
            Self::Saturate => "saturate",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColourDodge => "colour-dodge",
            Self::ColourBurn => "colour-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlendMode {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s {
            "clear" => Self::Clear,
            "source" => Self::Source,
            "over" => Self::Over,
            "in" => Self::In,
            "out" => Self::Out,
            "atop" => Self::Atop,
            "dest" => Self::Dest,
            "dest-over" => Self::DestOver,
            "dest-in" => Self::DestIn,
            "dest-out" => Self::DestOut,
            "dest-atop" => Self::DestAtop,
            "xor" => Self::Xor,
            "add" => Self::Add,
            "saturate" => Self::Saturate,
            "multiply" => Self::Multiply,
            "screen" => Self::Screen,
            "overlay" => Self::Overlay,
            "darken" => Self::Darken,
            "lighten" => Self::Lighten,
            "colour-dodge" | "color-dodge" => Self::ColourDodge,
            "colour-burn" | "color-burn" => Self::ColourBurn,
            "hard-light" => Self::HardLight,
            "soft-light" => Self::SoftLight,
            "difference" => Self::Difference,
            "exclusion" => Self::Exclusion,
            other => {
                return Err(ThumbError::InvalidOptions(format!(
                    "unsupported blend mode: {other}"
                )));
            }
        };
        Ok(mode)
    }
}
