//! Per-pixel compositing for [`BlendMode`].
//!
//! Colours are handled as straight (non-premultiplied) RGBA in `0.0..=1.0`.
//! Porter-Duff operators use the `(Fa, Fb)` coefficient table; separable
//! blend modes mix `B(Cb, Cs)` into the source and then composite with
//! source-over, as in the W3C compositing model.

use super::params::BlendMode;
use image::{Rgba, RgbaImage};

/// Composite `overlay` onto `base` with its top-left corner at `(x, y)`.
///
/// Every base pixel is visited: outside the overlay rectangle the source is
/// fully transparent, which matters for operators such as `in` or `clear`.
pub fn composite(base: &mut RgbaImage, overlay: &RgbaImage, x: u32, y: u32, mode: BlendMode) {
    let transparent = Rgba([0, 0, 0, 0]);
    for (px, py, dst) in base.enumerate_pixels_mut() {
        let inside = px >= x
            && py >= y
            && px - x < overlay.width()
            && py - y < overlay.height();
        let src = if inside {
            *overlay.get_pixel(px - x, py - y)
        } else {
            transparent
        };
        *dst = blend_pixel(src, *dst, mode);
    }
}

/// Blend a single source pixel over a destination pixel.
pub fn blend_pixel(src: Rgba<u8>, dst: Rgba<u8>, mode: BlendMode) -> Rgba<u8> {
    let (cs, a_s) = unpack(src);
    let (cb, a_b) = unpack(dst);

    match mode {
        BlendMode::Add => {
            let alpha = (a_s + a_b).min(1.0);
            let premult = std::array::from_fn(|i| (a_s * cs[i] + a_b * cb[i]).min(1.0));
            pack_premultiplied(premult, alpha)
        }
        BlendMode::Saturate => {
            let alpha = (a_s + a_b).min(1.0);
            let fa = if a_s > 0.0 {
                ((1.0 - a_b) / a_s).min(1.0)
            } else {
                0.0
            };
            let premult = std::array::from_fn(|i| a_s * fa * cs[i] + a_b * cb[i]);
            pack_premultiplied(premult, alpha)
        }
        _ => match porter_duff(mode, a_s, a_b) {
            Some((fa, fb)) => {
                let alpha = a_s * fa + a_b * fb;
                let premult = std::array::from_fn(|i| a_s * fa * cs[i] + a_b * fb * cb[i]);
                pack_premultiplied(premult, alpha)
            }
            None => {
                let alpha = a_s + a_b * (1.0 - a_s);
                let premult = std::array::from_fn(|i| {
                    let mixed = (1.0 - a_b) * cs[i] + a_b * separable(mode, cb[i], cs[i]);
                    a_s * mixed + a_b * cb[i] * (1.0 - a_s)
                });
                pack_premultiplied(premult, alpha)
            }
        },
    }
}

/// `(Fa, Fb)` for Porter-Duff operators, `None` for separable blend modes.
fn porter_duff(mode: BlendMode, a_s: f32, a_b: f32) -> Option<(f32, f32)> {
    let coefficients = match mode {
        BlendMode::Clear => (0.0, 0.0),
        BlendMode::Source => (1.0, 0.0),
        BlendMode::Over => (1.0, 1.0 - a_s),
        BlendMode::In => (a_b, 0.0),
        BlendMode::Out => (1.0 - a_b, 0.0),
        BlendMode::Atop => (a_b, 1.0 - a_s),
        BlendMode::Dest => (0.0, 1.0),
        BlendMode::DestOver => (1.0 - a_b, 1.0),
        BlendMode::DestIn => (0.0, a_s),
        BlendMode::DestOut => (0.0, 1.0 - a_s),
        BlendMode::DestAtop => (1.0 - a_b, a_s),
        BlendMode::Xor => (1.0 - a_b, 1.0 - a_s),
        _ => return None,
    };
    Some(coefficients)
}

/// Separable blend function `B(Cb, Cs)`.
fn separable(mode: BlendMode, cb: f32, cs: f32) -> f32 {
    match mode {
        BlendMode::Multiply => cb * cs,
        BlendMode::Screen => screen(cb, cs),
        BlendMode::Overlay => hard_light(cs, cb),
        BlendMode::Darken => cb.min(cs),
        BlendMode::Lighten => cb.max(cs),
        BlendMode::ColourDodge => {
            if cb == 0.0 {
                0.0
            } else if cs >= 1.0 {
                1.0
            } else {
                (cb / (1.0 - cs)).min(1.0)
            }
        }
        BlendMode::ColourBurn => {
            if cb >= 1.0 {
                1.0
            } else if cs == 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - cb) / cs).min(1.0)
            }
        }
        BlendMode::HardLight => hard_light(cb, cs),
        BlendMode::SoftLight => soft_light(cb, cs),
        BlendMode::Difference => (cb - cs).abs(),
        BlendMode::Exclusion => cb + cs - 2.0 * cb * cs,
        // Porter-Duff operators never reach here.
        _ => cs,
    }
}

fn screen(cb: f32, cs: f32) -> f32 {
    cb + cs - cb * cs
}

fn hard_light(cb: f32, cs: f32) -> f32 {
    if cs <= 0.5 {
        cb * 2.0 * cs
    } else {
        screen(cb, 2.0 * cs - 1.0)
    }
}

fn soft_light(cb: f32, cs: f32) -> f32 {
    if cs <= 0.5 {
        cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
    } else {
        let d = if cb <= 0.25 {
            ((16.0 * cb - 12.0) * cb + 4.0) * cb
        } else {
            cb.sqrt()
        };
        cb + (2.0 * cs - 1.0) * (d - cb)
    }
}

fn unpack(px: Rgba<u8>) -> ([f32; 3], f32) {
    let [r, g, b, a] = px.0;
    (
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0],
        a as f32 / 255.0,
    )
}

fn pack_premultiplied(premult: [f32; 3], alpha: f32) -> Rgba<u8> {
    if alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([
        to_u8(premult[0] / alpha),
        to_u8(premult[1] / alpha),
        to_u8(premult[2] / alpha),
        to_u8(alpha),
    ])
}
