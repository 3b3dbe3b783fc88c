//! Packed-color helpers and color-space conversions.
//!
//! The canvas layer stores true-color pixels as packed `u32` values in
//! `0xRRGGBBAA` order; everything above it works with [`image::Rgba`]
//! directly. HSV conversions exist for the ramp generator, which builds
//! shading palettes by rotating hue and spreading value.

use image::Rgba;

/// Fully transparent black, the degraded value for missing palette data.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Pack RGBA channels into a `0xRRGGBBAA` value.
#[must_use]
pub const fn pack(color: Rgba<u8>) -> u32 {
    let Rgba([r, g, b, a]) = color;
    ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32)
}

/// Unpack a `0xRRGGBBAA` value into RGBA channels.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn unpack(packed: u32) -> Rgba<u8> {
    Rgba([
        (packed >> 24) as u8,
        (packed >> 16) as u8,
        (packed >> 8) as u8,
        packed as u8,
    ])
}

/// Euclidean distance between two colors in RGB space (alpha ignored).
///
/// Ranges from 0 to `255 * sqrt(3)` ≈ 441.67.
#[must_use]
pub fn rgb_distance(a: Rgba<u8>, b: Rgba<u8>) -> f64 {
    let dr = f64::from(a.0[0]) - f64::from(b.0[0]);
    let dg = f64::from(a.0[1]) - f64::from(b.0[1]);
    let db = f64::from(a.0[2]) - f64::from(b.0[2]);
    db.mul_add(db, dr.mul_add(dr, dg * dg)).sqrt()
}

/// Linear interpolation between two colors, per channel including alpha.
///
/// `t` is clamped to `[0, 1]`; `t = 0` returns `a` exactly and `t = 1`
/// returns `b` exactly.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn lerp(a: Rgba<u8>, b: Rgba<u8>, t: f64) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let mix = |from: u8, to: u8| -> u8 {
        f64::from(from)
            .mul_add(1.0 - t, f64::from(to) * t)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgba([
        mix(a.0[0], b.0[0]),
        mix(a.0[1], b.0[1]),
        mix(a.0[2], b.0[2]),
        mix(a.0[3], b.0[3]),
    ])
}

/// BT.601 luma of a color, for writing shaded output to grayscale
/// canvases.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn luma(color: Rgba<u8>) -> u8 {
    let y = 0.114f64.mul_add(
        f64::from(color.0[2]),
        0.299f64.mul_add(f64::from(color.0[0]), 0.587 * f64::from(color.0[1])),
    );
    y.round().clamp(0.0, 255.0) as u8
}

/// Convert RGB to HSV: hue in degrees `[0, 360)`, saturation and value
/// in `[0, 1]`. Alpha is not part of the conversion.
#[must_use]
pub fn rgb_to_hsv(color: Rgba<u8>) -> (f64, f64, f64) {
    let r = f64::from(color.0[0]) / 255.0;
    let g = f64::from(color.0[1]) / 255.0;
    let b = f64::from(color.0[2]) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta <= f64::EPSILON {
        0.0
    } else if (max - r).abs() <= f64::EPSILON {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if (max - g).abs() <= f64::EPSILON {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let saturation = if max <= f64::EPSILON { 0.0 } else { delta / max };
    (hue.rem_euclid(360.0), saturation, max)
}

/// Convert HSV back to an opaque RGB color.
///
/// Hue is taken modulo 360; saturation and value are clamped to `[0, 1]`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgba<u8> {
    let h = hue.rem_euclid(360.0);
    let s = saturation.clamp(0.0, 1.0);
    let v = value.clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = v - c;

    let (r1, g1, b1) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |f: f64| -> u8 { ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8 };
    Rgba([channel(r1), channel(g1), channel(b1), 255])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_round_trip() {
        let c = Rgba([0x12, 0x34, 0x56, 0x78]);
        assert_eq!(pack(c), 0x1234_5678);
        assert_eq!(unpack(pack(c)), c);
    }

    #[test]
    fn rgb_distance_ignores_alpha() {
        let a = Rgba([10, 20, 30, 0]);
        let b = Rgba([10, 20, 30, 255]);
        assert!(rgb_distance(a, b).abs() < f64::EPSILON);
    }

    #[test]
    fn rgb_distance_black_to_white() {
        let d = rgb_distance(Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 255]));
        assert!((d - 255.0 * 3.0f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        let a = Rgba([10, 200, 30, 255]);
        let b = Rgba([240, 5, 90, 128]);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
    }

    #[test]
    fn lerp_midpoint_averages_channels() {
        let mid = lerp(Rgba([0, 0, 0, 0]), Rgba([100, 200, 50, 255]), 0.5);
        assert_eq!(mid, Rgba([50, 100, 25, 128]));
    }

    #[test]
    fn lerp_clamps_t() {
        let a = Rgba([1, 2, 3, 4]);
        let b = Rgba([5, 6, 7, 8]);
        assert_eq!(lerp(a, b, -2.0), a);
        assert_eq!(lerp(a, b, 3.0), b);
    }

    #[test]
    fn luma_of_white_is_255() {
        assert_eq!(luma(Rgba([255, 255, 255, 255])), 255);
        assert_eq!(luma(Rgba([0, 0, 0, 255])), 0);
    }

    #[test]
    fn hsv_round_trip_primaries() {
        for c in [
            Rgba([255, 0, 0, 255]),
            Rgba([0, 255, 0, 255]),
            Rgba([0, 0, 255, 255]),
            Rgba([255, 255, 0, 255]),
            Rgba([128, 64, 32, 255]),
        ] {
            let (h, s, v) = rgb_to_hsv(c);
            let back = hsv_to_rgb(h, s, v);
            for i in 0..3 {
                assert!(
                    (i32::from(back.0[i]) - i32::from(c.0[i])).abs() <= 1,
                    "channel {i} drifted: {c:?} -> {back:?}"
                );
            }
        }
    }

    #[test]
    fn gray_has_zero_saturation() {
        let (_, s, v) = rgb_to_hsv(Rgba([128, 128, 128, 255]));
        assert!(s.abs() < f64::EPSILON);
        assert!((v - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn hsv_hue_wraps() {
        assert_eq!(hsv_to_rgb(360.0, 1.0, 1.0), hsv_to_rgb(0.0, 1.0, 1.0));
        assert_eq!(hsv_to_rgb(-60.0, 1.0, 1.0), hsv_to_rgb(300.0, 1.0, 1.0));
    }
}
