//! Shading configuration consumed read-only by the pipeline.
//!
//! [`ShadeConfig`] is a value snapshot: the host UI edits one, the
//! pipeline borrows it for the duration of a run and never mutates it.
//! Defaults are exposed as `DEFAULT_*` associated constants so CLI
//! argument defaults and UI reset buttons stay in sync with
//! [`ShadeConfig::default`].

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::fill::FillMode;
use crate::normal::NormalMethod;
use crate::shade::{Material, ShadingMode};
use crate::types::Vec2;

/// Serde support for [`image::Rgba<u8>`] as a plain `[r, g, b, a]`
/// array (the `image` crate does not implement serde traits).
pub(crate) mod rgba_serde {
    use image::Rgba;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(color: &Rgba<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        color.0.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgba<u8>, D::Error> {
        <[u8; 4]>::deserialize(deserializer).map(Rgba)
    }
}

/// The named colors of a shading run.
///
/// Three-band mode uses shadow/base/highlight; five-band mode adds the
/// two mid tones; gradient mode interpolates through
/// shadow↔base↔highlight. The specular color only appears on glossy
/// material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadeColors {
    /// Darkest band.
    #[serde(with = "rgba_serde")]
    pub shadow: Rgba<u8>,
    /// Between shadow and base (five-band mode only).
    #[serde(with = "rgba_serde")]
    pub mid_shadow: Rgba<u8>,
    /// The resting color of the lit surface.
    #[serde(with = "rgba_serde")]
    pub base: Rgba<u8>,
    /// Between base and highlight (five-band mode only).
    #[serde(with = "rgba_serde")]
    pub mid_highlight: Rgba<u8>,
    /// Brightest band; also the rim-light blend target.
    #[serde(with = "rgba_serde")]
    pub highlight: Rgba<u8>,
    /// Glossy hot-spot color.
    #[serde(with = "rgba_serde")]
    pub specular: Rgba<u8>,
}

impl Default for ShadeColors {
    /// A neutral slate ramp, usable before any palette is picked.
    fn default() -> Self {
        Self {
            shadow: Rgba([60, 60, 70, 255]),
            mid_shadow: Rgba([100, 100, 112, 255]),
            base: Rgba([140, 140, 150, 255]),
            mid_highlight: Rgba([190, 190, 198, 255]),
            highlight: Rgba([235, 235, 240, 255]),
            specular: Rgba([255, 255, 255, 255]),
        }
    }
}

/// Configuration snapshot for one shading run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadeConfig {
    /// Light direction in degrees, counter-clockwise from +x in screen
    /// space (90 lights from straight above). Wraps modulo 360.
    pub light_angle: f64,

    /// Ambient floor in `[0, 1]`; the intensity a fully shadowed face
    /// still receives.
    pub ambient: f64,

    /// How intensity maps to colors.
    pub mode: ShadingMode,

    /// Normal-estimation strategy.
    pub normal_method: NormalMethod,

    /// Matte or glossy surface.
    pub material: Material,

    /// Which pixels a click selects.
    pub fill_mode: FillMode,

    /// Color tolerance for [`FillMode::SameColor`], 0–255.
    pub tolerance: u8,

    /// The shade ramp and specular color.
    pub colors: ShadeColors,

    /// Back-lit glow on edge pixels facing away from the light.
    pub rim_light: bool,

    /// Rim strength scale; the blend itself still caps at one half.
    pub rim_intensity: f64,

    /// Specular exponent (higher = tighter hot spot). Glossy only.
    pub specular_shininess: f64,

    /// Specular weights at or below this threshold produce no highlight.
    pub specular_threshold: f64,

    /// Keep a strip along the shadow-side silhouette at the base color.
    pub reflected_light: bool,

    /// Width of that strip in pixels (auto-shrunk to 1 on small
    /// regions).
    pub reflected_width: u32,

    /// Additionally nudge the strip's edge pixels toward the highlight.
    pub reflected_edge_boost: bool,
}

impl ShadeConfig {
    /// Default light angle: upper-left, the pixel-art convention.
    pub const DEFAULT_LIGHT_ANGLE: f64 = 135.0;

    /// Default ambient floor.
    pub const DEFAULT_AMBIENT: f64 = 0.2;

    /// Default fill tolerance (exact color match).
    pub const DEFAULT_TOLERANCE: u8 = 0;

    /// Default rim strength.
    pub const DEFAULT_RIM_INTENSITY: f64 = 0.5;

    /// Default specular exponent.
    pub const DEFAULT_SPECULAR_SHININESS: f64 = 8.0;

    /// Default specular threshold.
    pub const DEFAULT_SPECULAR_THRESHOLD: f64 = 0.5;

    /// Default reflected-light strip width in pixels.
    pub const DEFAULT_REFLECTED_WIDTH: u32 = 2;

    /// Unit vector pointing from the surface toward the light.
    #[must_use]
    pub fn light_direction(&self) -> Vec2 {
        Vec2::from_angle_deg(self.light_angle)
    }
}

impl Default for ShadeConfig {
    fn default() -> Self {
        Self {
            light_angle: Self::DEFAULT_LIGHT_ANGLE,
            ambient: Self::DEFAULT_AMBIENT,
            mode: ShadingMode::default(),
            normal_method: NormalMethod::default(),
            material: Material::default(),
            fill_mode: FillMode::default(),
            tolerance: Self::DEFAULT_TOLERANCE,
            colors: ShadeColors::default(),
            rim_light: false,
            rim_intensity: Self::DEFAULT_RIM_INTENSITY,
            specular_shininess: Self::DEFAULT_SPECULAR_SHININESS,
            specular_threshold: Self::DEFAULT_SPECULAR_THRESHOLD,
            reflected_light: true,
            reflected_width: Self::DEFAULT_REFLECTED_WIDTH,
            reflected_edge_boost: false,
        }
    }
}
