//! The auto-shading driver: detect → analyze → estimate → shade.
//!
//! [`AutoShader`] owns the per-click state: the analyzed [`Region`] and
//! the normal estimator with its edge-normal cache. Both are invalidated
//! wholesale on every new [`analyze`](AutoShader::analyze) and on
//! [`reset`](AutoShader::reset) — there is no hidden cross-call state
//! beyond these two fields, so previews are repeatable and one instance
//! per document is the whole concurrency story.

use std::collections::HashMap;
use std::time::Instant;

use image::Rgba;

use crate::canvas::{self, Canvas, Palette};
use crate::config::ShadeConfig;
use crate::diagnostics::{ShadeDiagnostics, StageReport};
use crate::fill;
use crate::normal::NormalEstimator;
use crate::region::Region;
use crate::shade::{PixelSite, Shader};
use crate::types::PixelPoint;

/// Point → color map produced by preview runs.
pub type PreviewMap = HashMap<PixelPoint, Rgba<u8>>;

/// Stateful shading driver for one document.
///
/// Not meant to be shared: a host with several open documents gives
/// each its own instance.
#[derive(Debug, Clone, Default)]
pub struct AutoShader {
    config: ShadeConfig,
    region: Region,
    estimator: NormalEstimator,
}

impl AutoShader {
    /// Create a driver with the given configuration.
    #[must_use]
    pub fn new(config: ShadeConfig) -> Self {
        Self {
            estimator: NormalEstimator::new(config.normal_method),
            config,
            region: Region::default(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ShadeConfig {
        &self.config
    }

    /// Replace the configuration.
    ///
    /// The analyzed region survives (the shape under the click did not
    /// change), but cached normals are dropped since the method or
    /// light may have.
    pub fn set_config(&mut self, config: ShadeConfig) {
        self.estimator = NormalEstimator::new(config.normal_method);
        self.config = config;
    }

    /// The region analyzed by the last successful
    /// [`analyze`](Self::analyze); empty before then.
    #[must_use]
    pub const fn region(&self) -> &Region {
        &self.region
    }

    /// Detect and analyze the region under `start`.
    ///
    /// Returns `false` — with the cached region cleared — when detection
    /// selects nothing (off-canvas click, open space in bounded mode).
    pub fn analyze<C: Canvas>(
        &mut self,
        canvas: &C,
        start: PixelPoint,
        palette: Option<&Palette>,
    ) -> bool {
        let pixels = fill::detect_region(
            canvas,
            start,
            self.config.fill_mode,
            self.config.tolerance,
            palette,
        );
        self.estimator.invalidate();
        if pixels.is_empty() {
            self.region = Region::default();
            return false;
        }
        self.region = Region::analyze(pixels);
        true
    }

    /// Analyze the region under `start` and write shaded colors back
    /// into the canvas.
    ///
    /// Returns `false` (and writes nothing) when detection selects
    /// nothing.
    pub fn apply<C: Canvas>(
        &mut self,
        canvas: &mut C,
        start: PixelPoint,
        palette: Option<&Palette>,
    ) -> bool {
        if !self.analyze(canvas, start, palette) {
            return false;
        }
        self.write_shaded(canvas, palette);
        true
    }

    /// [`apply`](Self::apply) with per-stage timing and counts.
    ///
    /// Returns `None` when detection selects nothing.
    pub fn apply_with_diagnostics<C: Canvas>(
        &mut self,
        canvas: &mut C,
        start: PixelPoint,
        palette: Option<&Palette>,
    ) -> Option<ShadeDiagnostics> {
        let run_start = Instant::now();

        let detect_start = Instant::now();
        let pixels = fill::detect_region(
            canvas,
            start,
            self.config.fill_mode,
            self.config.tolerance,
            palette,
        );
        let detect = StageReport {
            duration: detect_start.elapsed(),
            items: pixels.len(),
        };
        self.estimator.invalidate();
        if pixels.is_empty() {
            self.region = Region::default();
            return None;
        }

        let analyze_start = Instant::now();
        self.region = Region::analyze(pixels);
        let analyze = StageReport {
            duration: analyze_start.elapsed(),
            items: self.region.edge_pixels().len(),
        };

        let shade_start = Instant::now();
        let shaded = self.write_shaded(canvas, palette);
        let shade = StageReport {
            duration: shade_start.elapsed(),
            items: shaded,
        };

        Some(ShadeDiagnostics {
            detect,
            analyze,
            shade,
            max_distance: self.region.max_distance(),
            total: run_start.elapsed(),
        })
    }

    /// Shaded colors for the cached region, without touching any canvas.
    ///
    /// Repeatable: two consecutive calls on an unchanged region and
    /// config yield identical maps. Empty when nothing is analyzed.
    pub fn preview(&mut self) -> PreviewMap {
        self.shaded_pixels().into_iter().collect()
    }

    /// Drop the cached region and normals.
    pub fn reset(&mut self) {
        self.region = Region::default();
        self.estimator.invalidate();
    }

    /// Shade every cached region pixel, in region order.
    fn shaded_pixels(&mut self) -> Vec<(PixelPoint, Rgba<u8>)> {
        let shader = Shader::new(&self.config);
        let region = &self.region;
        let estimator = &mut self.estimator;
        region
            .pixels()
            .iter()
            .map(|&point| {
                let normal = estimator.normal_at(region, point);
                let site = PixelSite {
                    is_edge: region.is_edge(point),
                    distance_to_edge: region.distance_or_zero(point),
                    max_distance: region.max_distance(),
                };
                (point, shader.shade(normal, site))
            })
            .collect()
    }

    /// Shade the cached region into the canvas; returns the pixel count.
    #[allow(clippy::cast_sign_loss)]
    fn write_shaded<C: Canvas>(&mut self, canvas: &mut C, palette: Option<&Palette>) -> usize {
        let shaded = self.shaded_pixels();
        let count = shaded.len();
        for (point, color) in shaded {
            // Region pixels were detected inside the canvas, so the
            // casts cannot wrap.
            canvas::write_rgba(canvas, palette, point.x as u32, point.y as u32, color);
        }
        count
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::canvas::RgbaCanvas;
    use crate::fill::FillMode;
    use crate::normal::NormalMethod;
    use image::{Rgba, RgbaImage};

    const RED: Rgba<u8> = Rgba([200, 40, 40, 255]);

    /// 9x9 transparent canvas with a 5x5 red square at (2,2)..(6,6).
    fn square_canvas() -> RgbaCanvas {
        RgbaCanvas::new(RgbaImage::from_fn(9, 9, |x, y| {
            if (2..7).contains(&x) && (2..7).contains(&y) {
                RED
            } else {
                Rgba([0, 0, 0, 0])
            }
        }))
    }

    #[test]
    fn apply_shades_the_clicked_square_only() {
        let mut canvas = square_canvas();
        let mut shader = AutoShader::new(ShadeConfig::default());
        assert!(shader.apply(&mut canvas, PixelPoint::new(4, 4), None));
        assert_eq!(shader.region().len(), 25);

        // Background stays untouched and transparent.
        assert_eq!(canvas.pixel(0, 0), 0);
        // Every region pixel now carries one of the configured colors.
        let image = canvas.image();
        for y in 2..7 {
            for x in 2..7 {
                assert_eq!(image.get_pixel(x, y).0[3], 255);
                assert_ne!(*image.get_pixel(x, y), RED, "pixel ({x},{y}) left unshaded");
            }
        }
    }

    #[test]
    fn apply_on_empty_space_is_a_no_op() {
        let mut canvas = square_canvas();
        let before = canvas.image().clone();
        let config = ShadeConfig {
            fill_mode: FillMode::BoundedArea,
            ..ShadeConfig::default()
        };
        let mut shader = AutoShader::new(config);
        assert!(!shader.apply(&mut canvas, PixelPoint::new(0, 0), None));
        assert!(shader.region().is_empty());
        assert_eq!(canvas.image().as_raw(), before.as_raw());
    }

    #[test]
    fn preview_is_deterministic() {
        let canvas = square_canvas();
        let mut shader = AutoShader::new(ShadeConfig::default());
        assert!(shader.analyze(&canvas, PixelPoint::new(4, 4), None));
        let first = shader.preview();
        let second = shader.preview();
        assert_eq!(first, second);
        assert_eq!(first.len(), 25);
    }

    #[test]
    fn preview_covers_exactly_the_region() {
        let canvas = square_canvas();
        let mut shader = AutoShader::new(ShadeConfig::default());
        assert!(shader.analyze(&canvas, PixelPoint::new(4, 4), None));
        let preview = shader.preview();
        for point in shader.region().pixels() {
            assert!(preview.contains_key(point));
        }
        assert!(!preview.contains_key(&PixelPoint::new(0, 0)));
    }

    #[test]
    fn preview_before_analyze_is_empty() {
        let mut shader = AutoShader::new(ShadeConfig::default());
        assert!(shader.preview().is_empty());
    }

    #[test]
    fn diagnostics_report_region_counts() {
        let mut canvas = square_canvas();
        let mut shader = AutoShader::new(ShadeConfig::default());
        let diagnostics = shader
            .apply_with_diagnostics(&mut canvas, PixelPoint::new(4, 4), None)
            .unwrap();
        assert_eq!(diagnostics.detect.items, 25);
        assert_eq!(diagnostics.analyze.items, 16);
        assert_eq!(diagnostics.shade.items, 25);
        assert!((diagnostics.max_distance - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn diagnostics_are_none_when_nothing_is_detected() {
        let mut canvas = square_canvas();
        let config = ShadeConfig {
            fill_mode: FillMode::BoundedArea,
            ..ShadeConfig::default()
        };
        let mut shader = AutoShader::new(config);
        assert!(
            shader
                .apply_with_diagnostics(&mut canvas, PixelPoint::new(0, 0), None)
                .is_none()
        );
    }

    #[test]
    fn set_config_keeps_the_region_but_reshades() {
        let canvas = square_canvas();
        let mut shader = AutoShader::new(ShadeConfig::default());
        assert!(shader.analyze(&canvas, PixelPoint::new(4, 4), None));
        let before = shader.preview();

        shader.set_config(ShadeConfig {
            normal_method: NormalMethod::Radial,
            light_angle: 315.0,
            ..ShadeConfig::default()
        });
        assert_eq!(shader.region().len(), 25);
        let after = shader.preview();
        assert_ne!(before, after, "flipping the light should change shading");
    }

    #[test]
    fn reset_clears_the_cached_region() {
        let canvas = square_canvas();
        let mut shader = AutoShader::new(ShadeConfig::default());
        assert!(shader.analyze(&canvas, PixelPoint::new(4, 4), None));
        shader.reset();
        assert!(shader.region().is_empty());
        assert!(shader.preview().is_empty());
    }
}
