//! Surface-normal estimation over a flat region.
//!
//! Shading treats the detected silhouette as the footprint of a rounded
//! 3-D bump. Each strategy approximates the bump's outward-facing
//! normal at a pixel as a unit [`Vec2`]; the strategies trade smoothness
//! against fidelity to the silhouette:
//!
//! - [`Radial`](NormalMethod::Radial) — away from the centroid; cheap,
//!   perfect for blobs, poor for concave shapes.
//! - [`Gradient`](NormalMethod::Gradient) — central differences of the
//!   distance-to-edge field.
//! - [`Sobel`](NormalMethod::Sobel) — the same field through a 3×3
//!   Sobel kernel, smoothing out single-pixel staircase noise.
//! - [`Contour`](NormalMethod::Contour) — tangent-derived normals along
//!   the boundary, gradient normals inside.
//!
//! Every strategy returns a well-defined unit vector for every input:
//! degenerate cases (no interior, zero gradient, isolated pixels) fall
//! back to Radial, and a pixel sitting exactly on the centroid falls
//! back to the constant "up" vector.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::region::Region;
use crate::types::{PixelPoint, Vec2};

/// Selects the normal-estimation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NormalMethod {
    /// Straight out from the region centroid.
    Radial,
    /// Central differences of the distance-to-edge field.
    Gradient,
    /// Sobel-filtered distance field; smoother than raw differences.
    #[default]
    Sobel,
    /// Boundary tangents on edge pixels, gradient inside.
    Contour,
}

/// Normal estimator with a per-region cache of contour edge normals.
///
/// Edge normals depend only on the region's boundary, so the Contour
/// strategy computes them once per region and reuses them for every
/// query. The cache is an explicit field — owned by whoever owns the
/// estimator and cleared via [`invalidate`](Self::invalidate) whenever
/// the region changes.
#[derive(Debug, Clone, Default)]
pub struct NormalEstimator {
    method: NormalMethod,
    edge_normals: Option<HashMap<PixelPoint, Vec2>>,
}

impl NormalEstimator {
    /// Create an estimator for the given strategy.
    #[must_use]
    pub const fn new(method: NormalMethod) -> Self {
        Self {
            method,
            edge_normals: None,
        }
    }

    /// The selected strategy.
    #[must_use]
    pub const fn method(&self) -> NormalMethod {
        self.method
    }

    /// Drop the cached edge normals. Must be called when the region this
    /// estimator is queried against changes.
    pub fn invalidate(&mut self) {
        self.edge_normals = None;
    }

    /// Estimated unit normal at `point`.
    ///
    /// `point` is expected to be a region pixel; for other points the
    /// strategies still return a unit vector (the fallback chain never
    /// divides by zero), so callers need not pre-filter.
    #[must_use]
    pub fn normal_at(&mut self, region: &Region, point: PixelPoint) -> Vec2 {
        match self.method {
            NormalMethod::Radial => radial(region, point),
            NormalMethod::Gradient => gradient(region, point),
            NormalMethod::Sobel => sobel(region, point),
            NormalMethod::Contour => self.contour(region, point),
        }
    }

    fn contour(&mut self, region: &Region, point: PixelPoint) -> Vec2 {
        if region.is_edge(point) {
            let cache = self
                .edge_normals
                .get_or_insert_with(|| edge_normal_map(region));
            return cache
                .get(&point)
                .copied()
                .unwrap_or_else(|| radial(region, point));
        }
        // Interior pixels use the distance gradient rather than the
        // nearest edge normal, which would tile the interior with
        // Voronoi-cell discontinuities.
        gradient(region, point)
    }
}

/// Outward direction from the region centroid, or "up" when the pixel
/// sits exactly on it.
fn radial(region: &Region, point: PixelPoint) -> Vec2 {
    Vec2::new(
        f64::from(point.x) - region.center_x(),
        f64::from(point.y) - region.center_y(),
    )
    .normalized()
}

/// Central differences of the distance field.
///
/// Samples clamp to 0 outside the region, so the gradient of a boundary
/// pixel points out of the shape. Falls back to Radial when the region
/// has no interior (`max_distance == 0`) or the local gradient vanishes.
fn gradient(region: &Region, point: PixelPoint) -> Vec2 {
    if region.max_distance() == 0.0 {
        return radial(region, point);
    }
    let PixelPoint { x, y } = point;
    let s = |px: i32, py: i32| region.distance_or_zero(PixelPoint::new(px, py));
    let gx = s(x - 1, y) - s(x + 1, y);
    let gy = s(x, y - 1) - s(x, y + 1);
    if gx == 0.0 && gy == 0.0 {
        return radial(region, point);
    }
    Vec2::new(gx, gy).normalized()
}

/// 3×3 Sobel kernel over the clamped distance field; same fallbacks as
/// [`gradient`].
fn sobel(region: &Region, point: PixelPoint) -> Vec2 {
    if region.max_distance() == 0.0 {
        return radial(region, point);
    }
    let PixelPoint { x, y } = point;
    let s = |px: i32, py: i32| region.distance_or_zero(PixelPoint::new(px, py));
    let gx = 2.0f64.mul_add(s(x - 1, y), s(x - 1, y - 1) + s(x - 1, y + 1))
        - 2.0f64.mul_add(s(x + 1, y), s(x + 1, y - 1) + s(x + 1, y + 1));
    let gy = 2.0f64.mul_add(s(x, y - 1), s(x - 1, y - 1) + s(x + 1, y - 1))
        - 2.0f64.mul_add(s(x, y + 1), s(x - 1, y + 1) + s(x + 1, y + 1));
    if gx == 0.0 && gy == 0.0 {
        return radial(region, point);
    }
    Vec2::new(gx, gy).normalized()
}

/// Compute the contour normal for every edge pixel of the region.
fn edge_normal_map(region: &Region) -> HashMap<PixelPoint, Vec2> {
    region
        .edge_pixels()
        .iter()
        .map(|&p| (p, edge_normal(region, p)))
        .collect()
}

/// Tangent-derived normal of a single edge pixel.
///
/// The tangent is taken from neighboring edge pixels (8-connected so
/// diagonal contour steps still count as adjacency), rotated 90°, and
/// oriented away from the centroid.
fn edge_normal(region: &Region, point: PixelPoint) -> Vec2 {
    let neighbors: Vec<PixelPoint> = point
        .neighbors8()
        .into_iter()
        .filter(|n| region.is_edge(*n))
        .collect();

    let tangent = match neighbors.as_slice() {
        [] => return radial(region, point),
        [only] => Vec2::new(
            f64::from(point.x - only.x),
            f64::from(point.y - only.y),
        ),
        many => {
            // Average the pairwise spans along the local contour run.
            let mut sum = Vec2::new(0.0, 0.0);
            for (i, a) in many.iter().enumerate() {
                for b in &many[i + 1..] {
                    sum = sum.add(Vec2::new(f64::from(b.x - a.x), f64::from(b.y - a.y)));
                }
            }
            sum
        }
    };

    if tangent.length() == 0.0 {
        return radial(region, point);
    }

    let candidate = tangent.perpendicular().normalized();
    let to_center = Vec2::new(
        region.center_x() - f64::from(point.x),
        region.center_y() - f64::from(point.y),
    );
    // A candidate leaning toward the centroid is the inward normal.
    if candidate.dot(to_center) > 0.0 {
        candidate.flipped()
    } else {
        candidate
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const METHODS: [NormalMethod; 4] = [
        NormalMethod::Radial,
        NormalMethod::Gradient,
        NormalMethod::Sobel,
        NormalMethod::Contour,
    ];

    fn filled_square(size: i32) -> Region {
        let mut pixels = Vec::new();
        for y in 0..size {
            for x in 0..size {
                pixels.push(PixelPoint::new(x, y));
            }
        }
        Region::analyze(pixels)
    }

    #[test]
    fn every_method_returns_unit_vectors() {
        let region = filled_square(7);
        for method in METHODS {
            let mut estimator = NormalEstimator::new(method);
            for p in region.pixels() {
                let n = estimator.normal_at(&region, *p);
                assert!(
                    (n.length() - 1.0).abs() < 1e-6,
                    "{method:?} returned non-unit normal {n:?} at {p:?}"
                );
            }
        }
    }

    #[test]
    fn single_pixel_region_never_degenerates() {
        let region = Region::analyze(vec![PixelPoint::new(5, 5)]);
        for method in METHODS {
            let mut estimator = NormalEstimator::new(method);
            let n = estimator.normal_at(&region, PixelPoint::new(5, 5));
            assert!(
                (n.length() - 1.0).abs() < 1e-6,
                "{method:?} degenerated on a 1px region"
            );
            // Pixel == centroid, so the whole fallback chain lands on "up".
            assert_eq!(n, Vec2::UP);
        }
    }

    #[test]
    fn radial_points_away_from_centroid() {
        let region = filled_square(5);
        let mut estimator = NormalEstimator::new(NormalMethod::Radial);
        let n = estimator.normal_at(&region, PixelPoint::new(4, 2));
        assert!(n.x > 0.9, "expected rightward normal, got {n:?}");
    }

    #[test]
    fn gradient_on_left_boundary_points_left() {
        let region = filled_square(5);
        let mut estimator = NormalEstimator::new(NormalMethod::Gradient);
        let n = estimator.normal_at(&region, PixelPoint::new(0, 2));
        assert!(n.x < 0.0, "expected outward (leftward) normal, got {n:?}");
    }

    #[test]
    fn gradient_falls_back_to_radial_at_flat_center() {
        // The center of an odd square has symmetric distance samples, so
        // the central difference vanishes; radial then hits the centroid
        // and the chain bottoms out at "up".
        let region = filled_square(5);
        let mut estimator = NormalEstimator::new(NormalMethod::Gradient);
        assert_eq!(estimator.normal_at(&region, PixelPoint::new(2, 2)), Vec2::UP);
    }

    #[test]
    fn line_region_uses_radial_for_gradient_methods() {
        // A 1px line has max_distance == 0: no usable distance field.
        let pixels: Vec<PixelPoint> = (0..6).map(|x| PixelPoint::new(x, 3)).collect();
        let region = Region::analyze(pixels);
        let mut gradient = NormalEstimator::new(NormalMethod::Gradient);
        let mut radial = NormalEstimator::new(NormalMethod::Radial);
        for p in region.pixels() {
            assert_eq!(
                gradient.normal_at(&region, *p),
                radial.normal_at(&region, *p)
            );
        }
    }

    #[test]
    fn contour_edge_normals_point_outward_on_a_square() {
        let region = filled_square(7);
        let mut estimator = NormalEstimator::new(NormalMethod::Contour);
        for p in region.edge_pixels() {
            let n = estimator.normal_at(&region, *p);
            let outward = Vec2::new(
                f64::from(p.x) - region.center_x(),
                f64::from(p.y) - region.center_y(),
            );
            assert!(
                n.dot(outward) >= 0.0,
                "edge normal {n:?} at {p:?} leans inward"
            );
        }
    }

    #[test]
    fn contour_cache_is_consistent_across_queries() {
        let region = filled_square(6);
        let mut estimator = NormalEstimator::new(NormalMethod::Contour);
        let p = region.edge_pixels()[1];
        let first = estimator.normal_at(&region, p);
        let second = estimator.normal_at(&region, p);
        assert_eq!(first, second);
    }

    #[test]
    fn invalidate_clears_the_cache_for_a_new_region() {
        let small = filled_square(4);
        let large = filled_square(9);
        let mut estimator = NormalEstimator::new(NormalMethod::Contour);
        let p = PixelPoint::new(0, 0);
        let from_small = estimator.normal_at(&small, p);
        estimator.invalidate();
        let from_large = estimator.normal_at(&large, p);
        // Same corner pixel, different region geometry: the cache must
        // not leak the old region's normals. Both are diagonal here, so
        // compare against fresh estimators instead of each other.
        let mut fresh = NormalEstimator::new(NormalMethod::Contour);
        assert_eq!(from_large, fresh.normal_at(&large, p));
        let mut fresh_small = NormalEstimator::new(NormalMethod::Contour);
        assert_eq!(from_small, fresh_small.normal_at(&small, p));
    }

    #[test]
    fn interior_contour_normals_match_gradient() {
        let region = filled_square(7);
        let mut contour = NormalEstimator::new(NormalMethod::Contour);
        let mut gradient = NormalEstimator::new(NormalMethod::Gradient);
        for p in region.pixels() {
            if !region.is_edge(*p) {
                assert_eq!(
                    contour.normal_at(&region, *p),
                    gradient.normal_at(&region, *p)
                );
            }
        }
    }
}
