//! pixshade-pipeline: Pure auto-shading pipeline for pixel art (sans-IO).
//!
//! Turns a single click inside a drawn shape into per-pixel lighting:
//! region detection -> geometric analysis -> surface-normal estimation ->
//! shading under a configurable virtual light.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! pixel buffers through the [`Canvas`] trait and returns structured
//! data. File loading, saving, and argument handling live in the CLI
//! crate.
//!
//! # Pipeline steps
//!
//! 1. Flood-fill region detection under a [`FillMode`] policy
//! 2. Region analysis: bounds, centroid, edge pixels, distance transform
//! 3. Normal estimation under a [`NormalMethod`] strategy
//! 4. Per-pixel shading: diffuse bands, specular, rim, reflected light
//!
//! The stateful [`AutoShader`] caches the analyzed region between calls
//! so interactive previews don't re-run detection; the [`shade_at`]
//! function is the one-shot equivalent for batch callers.

pub mod canvas;
pub mod color;
pub mod config;
pub mod diagnostics;
pub mod fill;
pub mod normal;
pub mod pipeline;
pub mod ramp;
pub mod region;
pub mod shade;
pub mod types;

pub use canvas::{
    Canvas, ColorResolver, GrayCanvas, IndexedCanvas, Palette, PixelFormat, RgbaCanvas, write_rgba,
};
pub use config::{ShadeColors, ShadeConfig};
pub use diagnostics::{ShadeDiagnostics, StageReport};
pub use fill::FillMode;
pub use normal::{NormalEstimator, NormalMethod};
pub use pipeline::{AutoShader, PreviewMap};
pub use ramp::{RampOptions, RampStyle, apply_ramp, generate_ramp};
pub use region::Region;
pub use shade::{Material, PixelSite, Shader, ShadingMode, diffuse_intensity};
pub use types::{Bounds, PixelPoint, ShadeError, Vec2};

/// Run the full shading pipeline once and write the result back into
/// the canvas.
///
/// This is the batch-oriented twin of [`AutoShader::apply`]: no state
/// survives the call, and "nothing to shade" surfaces as a typed error
/// instead of `false`.
///
/// # Errors
///
/// Returns [`ShadeError::StartOutOfBounds`] if `start` is outside the
/// canvas, and [`ShadeError::NoRegion`] if detection selects no pixels
/// (e.g. a bounded-area click in open space).
pub fn shade_at<C: Canvas>(
    canvas: &mut C,
    start: PixelPoint,
    palette: Option<&Palette>,
    config: &ShadeConfig,
) -> Result<ShadeDiagnostics, ShadeError> {
    if !canvas.contains(start) {
        return Err(ShadeError::StartOutOfBounds {
            x: start.x,
            y: start.y,
        });
    }
    let mut shader = AutoShader::new(config.clone());
    shader
        .apply_with_diagnostics(canvas, start, palette)
        .ok_or(ShadeError::NoRegion)
}
