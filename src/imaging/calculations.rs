//! Pure calculation functions for thumbnail dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Scale both axes of `original` by `percentage` percent.
///
/// Each axis is rounded independently, half away from zero. Results that
/// would be negative (or NaN) saturate to 0.
///
/// # Examples
/// ```
/// # use image_thumb::imaging::scale_by_percentage;
/// assert_eq!(scale_by_percentage((200, 100), 50.0), (100, 50));
/// assert_eq!(scale_by_percentage((1000, 1000), 10.0), (100, 100));
/// ```
pub fn scale_by_percentage(original: (u32, u32), percentage: f64) -> (u32, u32) {
    let factor = percentage / 100.0;
    let scale = |value: u32| (value as f64 * factor).round() as u32;
    (scale(original.0), scale(original.1))
}

/// Fill in whichever requested side is missing from `original`.
///
/// The missing side is copied as-is, not scaled to preserve the aspect ratio:
/// asking for width 50 on a 200x100 image yields 50x100.
pub fn merge_dimensions(
    original: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
) -> (u32, u32) {
    (width.unwrap_or(original.0), height.unwrap_or(original.1))
}

/// Bound each axis of `target` by the same axis of `original` (never enlarge).
pub fn clamp_to_original(target: (u32, u32), original: (u32, u32)) -> (u32, u32) {
    (target.0.min(original.0), target.1.min(original.1))
}
