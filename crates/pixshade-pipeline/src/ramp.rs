//! Color-ramp generation: derive a shading palette from one base color.
//!
//! A sibling of the shading pipeline — it shares the color vocabulary
//! but never touches region data. Given a base color it produces a 5–9
//! step ramp using HSV harmony rules: shadows darken, gain a little
//! saturation, and rotate toward cool hues; highlights lighten, lose
//! saturation, and rotate toward warm hues. The result can pre-fill a
//! [`ShadeConfig`]'s named colors via [`apply_ramp`].

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::color;
use crate::config::{ShadeConfig, rgba_serde};
use crate::shade::Material;

/// Smallest ramp worth generating (one color per five-band slot).
pub const MIN_RAMP_LEN: usize = 5;

/// Largest supported ramp.
pub const MAX_RAMP_LEN: usize = 9;

/// Hue swing in degrees at `harmony == 1`.
const MAX_HUE_SWING: f64 = 48.0;

/// Hue bias in degrees at `temperature == ±1`.
const MAX_TEMPERATURE_BIAS: f64 = 20.0;

/// Floor for ramp values, keeping the deepest shadow legible.
const VALUE_FLOOR: f64 = 0.05;

/// How far a glossy ramp's top step leans toward pure white.
const GLOSSY_TOP_BLEND: f64 = 0.3;

/// Overall character of the generated ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RampStyle {
    /// Gentle value spread with restrained hue shifts.
    #[default]
    Soft,
    /// Wider value spread and stronger saturation contrast.
    Vivid,
}

/// Inputs to [`generate_ramp`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampOptions {
    /// The color the middle of the ramp should (approximately) match.
    #[serde(with = "rgba_serde")]
    pub base: Rgba<u8>,
    /// Requested ramp length; clamped to
    /// [`MIN_RAMP_LEN`]..=[`MAX_RAMP_LEN`].
    pub count: usize,
    /// Light angle in degrees. Present for parity with the shading
    /// config so a host can derive both from the same UI state; the
    /// ramp itself is angle-independent.
    pub light_angle: f64,
    /// Glossy ramps compress their bright half and end on a hotter top
    /// step.
    pub material: Material,
    /// Value/saturation spread character.
    pub style: RampStyle,
    /// Hue-swing scale in `[0, 1]`: 0 keeps every step on the base hue.
    pub harmony: f64,
    /// Warm/cool bias in `[-1, 1]`: positive rotates the whole ramp
    /// toward warm hues, negative toward cool.
    pub temperature: f64,
}

impl Default for RampOptions {
    fn default() -> Self {
        Self {
            base: Rgba([140, 140, 150, 255]),
            count: MIN_RAMP_LEN,
            light_angle: ShadeConfig::DEFAULT_LIGHT_ANGLE,
            material: Material::Matte,
            style: RampStyle::default(),
            harmony: 0.5,
            temperature: 0.0,
        }
    }
}

/// Generate a shading ramp, darkest first.
///
/// The middle entry reproduces the base color (exactly up to HSV
/// round-off) when `temperature` is 0. Values increase monotonically
/// along the ramp.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn generate_ramp(options: &RampOptions) -> Vec<Rgba<u8>> {
    let count = options.count.clamp(MIN_RAMP_LEN, MAX_RAMP_LEN);
    let (hue, saturation, value) = color::rgb_to_hsv(options.base);

    let (value_span, sat_span) = match options.style {
        RampStyle::Soft => (0.32, 0.12),
        RampStyle::Vivid => (0.45, 0.22),
    };
    let swing = options.harmony.clamp(0.0, 1.0) * MAX_HUE_SWING;
    let bias = options.temperature.clamp(-1.0, 1.0) * MAX_TEMPERATURE_BIAS;

    let mut ramp = Vec::with_capacity(count);
    for i in 0..count {
        // t runs -1 (deepest shadow) .. +1 (brightest highlight).
        let t = (i as f64) / ((count - 1) as f64) * 2.0 - 1.0;
        // Glossy surfaces hold their mid tones dark and jump late.
        let shaped = if options.material == Material::Glossy && t > 0.0 {
            t * t
        } else {
            t
        };

        let step_hue = shaped.mul_add(-swing, hue) + bias;
        let step_sat = shaped.mul_add(-sat_span, saturation);
        let step_value = shaped.mul_add(value_span, value).clamp(VALUE_FLOOR, 1.0);
        ramp.push(color::hsv_to_rgb(step_hue, step_sat, step_value));
    }

    if options.material == Material::Glossy
        && let Some(top) = ramp.last_mut()
    {
        *top = color::lerp(*top, Rgba([255, 255, 255, 255]), GLOSSY_TOP_BLEND);
    }
    ramp
}

/// Copy a generated ramp into a config's five shade colors.
///
/// Shadow and highlight take the ramp ends, base the middle entry, and
/// the mid tones the midpoints of each half. Ramps shorter than
/// [`MIN_RAMP_LEN`] are ignored. The specular color is left untouched.
pub fn apply_ramp(config: &mut ShadeConfig, ramp: &[Rgba<u8>]) {
    if ramp.len() < MIN_RAMP_LEN {
        return;
    }
    let last = ramp.len() - 1;
    let mid = ramp.len() / 2;
    let fallback = config.colors.base;
    let pick = |index: usize| ramp.get(index).copied().unwrap_or(fallback);
    config.colors.shadow = pick(0);
    config.colors.mid_shadow = pick(mid / 2);
    config.colors.base = pick(mid);
    config.colors.mid_highlight = pick(mid.midpoint(last));
    config.colors.highlight = pick(last);
}
