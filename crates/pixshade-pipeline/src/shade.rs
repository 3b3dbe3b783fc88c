//! Per-pixel lighting: diffuse banding, specular, rim light, and the
//! reflected-light rim rule.
//!
//! The shader is a pure function from (normal, pixel site, config) to a
//! color, applied in a fixed order: diffuse intensity → band/gradient
//! color (or the reflected-light override) → specular → rim light.
//! Specular and rim are corrections layered on top of the diffuse
//! decision, not alternatives to it — reordering them changes the look.

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::color;
use crate::config::ShadeConfig;
use crate::types::Vec2;

/// How diffuse intensity maps to output colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadingMode {
    /// Three bands: shadow, base, highlight.
    #[default]
    ThreeShade,
    /// Five equal-width bands through the full shade ramp.
    FiveShade,
    /// Continuous per-channel interpolation shadow↔base↔highlight.
    Gradient,
}

/// Surface material, controlling whether specular highlights appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Material {
    /// Diffuse only.
    #[default]
    Matte,
    /// Diffuse plus a specular highlight toward the viewer.
    Glossy,
}

/// Where a pixel sits within its region, as far as shading cares.
#[derive(Debug, Clone, Copy)]
pub struct PixelSite {
    /// Whether the pixel lies on the region boundary.
    pub is_edge: bool,
    /// Distance-to-edge of the pixel (0 on the boundary).
    pub distance_to_edge: f64,
    /// The region's largest distance-to-edge value.
    pub max_distance: f64,
}

/// Diffuse intensity below which a pixel counts as "in shadow" for the
/// reflected-light rule.
const SHADOW_CUTOFF: f64 = 0.4;

/// Three-band thresholds.
const THREE_SHADE_SHADOW: f64 = 0.33;
const THREE_SHADE_BASE: f64 = 0.66;

/// Rim light starts once the surface faces this far away from the light.
const RIM_ONSET: f64 = -0.3;

/// Rim light never blends more than halfway toward the highlight.
const RIM_MAX: f64 = 0.5;

/// Specular never blends more than this far toward the specular color.
const SPECULAR_MAX_BLEND: f64 = 0.8;

/// Regions with `max_distance` below this get a 1px reflected strip
/// regardless of the configured width.
const SMALL_REGION_CUTOFF: f64 = 5.0;

/// Blend factor for the optional highlight nudge on reflected-strip
/// edge pixels.
const EDGE_BOOST_BLEND: f64 = 0.25;

/// Orthographic view direction: the viewer hovers directly above.
const VIEW: Vec2 = Vec2::UP;

/// Lambertian diffuse term with an ambient floor.
///
/// Monotonically non-decreasing in `normal · light`, and always within
/// `[ambient, 1]` — a fully shadowed face never goes pure black.
#[must_use]
pub fn diffuse_intensity(normal: Vec2, light: Vec2, ambient: f64) -> f64 {
    let lit = normal.dot(light).max(0.0);
    (1.0 - ambient).mul_add(lit, ambient).clamp(0.0, 1.0)
}

/// Per-pixel shader bound to one configuration snapshot.
///
/// Holds the precomputed light direction; everything else is read from
/// the borrowed config.
#[derive(Debug, Clone, Copy)]
pub struct Shader<'a> {
    config: &'a ShadeConfig,
    light: Vec2,
}

impl<'a> Shader<'a> {
    /// Bind a configuration, resolving its light angle to a direction.
    #[must_use]
    pub fn new(config: &'a ShadeConfig) -> Self {
        Self {
            config,
            light: config.light_direction(),
        }
    }

    /// The unit vector pointing from the surface toward the light.
    #[must_use]
    pub const fn light(&self) -> Vec2 {
        self.light
    }

    /// Diffuse intensity of a normal under this shader's light.
    #[must_use]
    pub fn intensity(&self, normal: Vec2) -> f64 {
        diffuse_intensity(normal, self.light, self.config.ambient)
    }

    /// Final color for one pixel.
    #[must_use]
    pub fn shade(&self, normal: Vec2, site: PixelSite) -> Rgba<u8> {
        let n_dot_l = normal.dot(self.light);
        let intensity = self.intensity(normal);
        let colors = &self.config.colors;

        let mut shaded = if self.in_reflected_strip(intensity, site) {
            // Pixel-art rule: a cast shadow must never touch the
            // silhouette's rim. Force the strip back to base.
            if site.is_edge && self.config.reflected_edge_boost {
                color::lerp(colors.base, colors.highlight, EDGE_BOOST_BLEND)
            } else {
                colors.base
            }
        } else {
            self.banded_color(intensity)
        };

        if self.config.material == Material::Glossy {
            shaded = self.apply_specular(shaded, normal, n_dot_l);
        }
        if self.config.rim_light && site.is_edge {
            shaded = self.apply_rim(shaded, n_dot_l);
        }
        shaded
    }

    fn in_reflected_strip(&self, intensity: f64, site: PixelSite) -> bool {
        if !self.config.reflected_light || intensity >= SHADOW_CUTOFF {
            return false;
        }
        let width = if site.max_distance < SMALL_REGION_CUTOFF {
            1.0
        } else {
            f64::from(self.config.reflected_width)
        };
        site.distance_to_edge < width
    }

    fn banded_color(&self, intensity: f64) -> Rgba<u8> {
        let c = &self.config.colors;
        match self.config.mode {
            ShadingMode::ThreeShade => {
                if intensity < THREE_SHADE_SHADOW {
                    c.shadow
                } else if intensity < THREE_SHADE_BASE {
                    c.base
                } else {
                    c.highlight
                }
            }
            ShadingMode::FiveShade => {
                if intensity < 0.2 {
                    c.shadow
                } else if intensity < 0.4 {
                    c.mid_shadow
                } else if intensity < 0.6 {
                    c.base
                } else if intensity < 0.8 {
                    c.mid_highlight
                } else {
                    c.highlight
                }
            }
            ShadingMode::Gradient => {
                // Each half remaps to [0, 1] before interpolating, so
                // intensity 0.5 is the base color exactly.
                if intensity < 0.5 {
                    color::lerp(c.shadow, c.base, intensity / 0.5)
                } else {
                    color::lerp(c.base, c.highlight, (intensity - 0.5) / 0.5)
                }
            }
        }
    }

    /// Blend toward the specular color where the mirror reflection of
    /// the light lines up with the view direction.
    fn apply_specular(&self, shaded: Rgba<u8>, normal: Vec2, n_dot_l: f64) -> Rgba<u8> {
        let reflection = normal.scale(2.0 * n_dot_l).sub(self.light);
        let weight = reflection
            .dot(VIEW)
            .max(0.0)
            .powf(self.config.specular_shininess);
        let threshold = self.config.specular_threshold;
        if threshold >= 1.0 || weight <= threshold {
            return shaded;
        }
        let blend = (weight - threshold) / (1.0 - threshold) * SPECULAR_MAX_BLEND;
        color::lerp(shaded, self.config.colors.specular, blend)
    }

    /// Back-lit silhouette glow on edge pixels facing away from the
    /// light.
    fn apply_rim(&self, shaded: Rgba<u8>, n_dot_l: f64) -> Rgba<u8> {
        if n_dot_l >= RIM_ONSET {
            return shaded;
        }
        let strength = ((n_dot_l - RIM_ONSET).abs() / 0.7 * self.config.rim_intensity)
            .clamp(0.0, RIM_MAX);
        color::lerp(shaded, self.config.colors.highlight, strength)
    }
}
