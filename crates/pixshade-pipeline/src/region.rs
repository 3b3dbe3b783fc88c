//! Region geometry: bounds, centroid, edge classification, and the
//! distance-to-edge transform.
//!
//! [`Region::analyze`] turns the flat pixel list produced by
//! [`detect_region`](crate::fill::detect_region) into the enriched value
//! the normal estimator and shader consume. The distance transform is a
//! multi-source BFS seeded from every edge pixel at distance 0, so the
//! distance of an interior pixel is its graph distance (in 4-connected
//! steps, constrained to the region) to the nearest edge pixel — not the
//! free Euclidean distance.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::types::{Bounds, PixelPoint};

/// A detected region with its derived geometric data.
///
/// Immutable once built; the orchestrator discards it wholesale when a
/// new click is analyzed.
///
/// Invariants upheld by construction:
/// - every edge pixel is a region pixel;
/// - the distance map covers exactly the region pixels;
/// - a pixel's distance is 0 iff it is an edge pixel;
/// - `max_distance` equals the largest mapped distance (0 when the
///   region is empty or entirely edge, e.g. a 1px-wide outline).
#[derive(Debug, Clone, Default)]
pub struct Region {
    pixels: Vec<PixelPoint>,
    pixel_set: HashSet<PixelPoint>,
    edge_pixels: Vec<PixelPoint>,
    edge_set: HashSet<PixelPoint>,
    distance: HashMap<PixelPoint, f64>,
    bounds: Bounds,
    center_x: f64,
    center_y: f64,
    max_distance: f64,
}

impl Region {
    /// Analyze a flat pixel list.
    ///
    /// The input order (BFS discovery order from detection) is preserved
    /// in [`pixels`](Self::pixels) so downstream iteration is
    /// reproducible. An empty input yields the empty region.
    #[must_use]
    pub fn analyze(pixels: Vec<PixelPoint>) -> Self {
        if pixels.is_empty() {
            return Self::default();
        }

        // Bounds and centroid in one linear pass.
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        for p in &pixels {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
            sum_x += f64::from(p.x);
            sum_y += f64::from(p.y);
        }
        #[allow(clippy::cast_precision_loss)]
        let count = pixels.len() as f64;

        let pixel_set: HashSet<PixelPoint> = pixels.iter().copied().collect();

        // A pixel is an edge pixel when any 4-neighbor is missing from
        // the set — whether that neighbor is another color, transparent,
        // or off-canvas makes no difference here.
        let mut edge_pixels = Vec::new();
        let mut edge_set = HashSet::new();
        for p in &pixels {
            if p.neighbors4().iter().any(|n| !pixel_set.contains(n)) {
                edge_pixels.push(*p);
                edge_set.insert(*p);
            }
        }

        // Multi-source BFS: all edge pixels start at 0, interior pixels
        // get parent distance + 1.
        let mut distance: HashMap<PixelPoint, f64> = HashMap::with_capacity(pixels.len());
        let mut queue: VecDeque<PixelPoint> = VecDeque::with_capacity(edge_pixels.len());
        let mut max_distance = 0.0f64;
        for p in &edge_pixels {
            distance.insert(*p, 0.0);
            queue.push_back(*p);
        }
        while let Some(point) = queue.pop_front() {
            let next = distance.get(&point).copied().unwrap_or(0.0) + 1.0;
            for neighbor in point.neighbors4() {
                if pixel_set.contains(&neighbor) && !distance.contains_key(&neighbor) {
                    distance.insert(neighbor, next);
                    max_distance = max_distance.max(next);
                    queue.push_back(neighbor);
                }
            }
        }

        Self {
            pixels,
            pixel_set,
            edge_pixels,
            edge_set,
            distance,
            bounds: Bounds {
                min_x,
                min_y,
                max_x,
                max_y,
            },
            center_x: sum_x / count,
            center_y: sum_y / count,
            max_distance,
        }
    }

    /// All region pixels in stable discovery order.
    #[must_use]
    pub fn pixels(&self) -> &[PixelPoint] {
        &self.pixels
    }

    /// Number of pixels in the region.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Whether the region has no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// O(1) membership test.
    #[must_use]
    pub fn contains(&self, point: PixelPoint) -> bool {
        self.pixel_set.contains(&point)
    }

    /// The boundary pixels, in the order they appear in
    /// [`pixels`](Self::pixels).
    #[must_use]
    pub fn edge_pixels(&self) -> &[PixelPoint] {
        &self.edge_pixels
    }

    /// Whether `point` is a boundary pixel of the region.
    #[must_use]
    pub fn is_edge(&self, point: PixelPoint) -> bool {
        self.edge_set.contains(&point)
    }

    /// Graph distance from a region pixel to the nearest edge pixel.
    ///
    /// `None` for points outside the region.
    #[must_use]
    pub fn distance_to_edge(&self, point: PixelPoint) -> Option<f64> {
        self.distance.get(&point).copied()
    }

    /// Distance sample clamped to 0 outside the region.
    ///
    /// This is the sampling rule the gradient-based normal estimators
    /// rely on: beyond the boundary the distance field reads as 0, so
    /// boundary pixels naturally get an outward-pointing gradient.
    #[must_use]
    pub fn distance_or_zero(&self, point: PixelPoint) -> f64 {
        self.distance.get(&point).copied().unwrap_or(0.0)
    }

    /// Minimal axis-aligned rectangle containing the region.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Centroid x (mean of pixel x coordinates).
    ///
    /// The centroid is a center of mass — for concave or ring-shaped
    /// regions it may land outside the region itself.
    #[must_use]
    pub const fn center_x(&self) -> f64 {
        self.center_x
    }

    /// Centroid y (mean of pixel y coordinates).
    #[must_use]
    pub const fn center_y(&self) -> f64 {
        self.center_y
    }

    /// Largest value in the distance map; 0 when every pixel is an edge
    /// pixel (the "no true interior" signal for the normal estimators).
    #[must_use]
    pub const fn max_distance(&self) -> f64 {
        self.max_distance
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled_rect(x0: i32, y0: i32, w: i32, h: i32) -> Vec<PixelPoint> {
        let mut pixels = Vec::new();
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                pixels.push(PixelPoint::new(x, y));
            }
        }
        pixels
    }

    #[test]
    fn empty_input_yields_empty_region() {
        let region = Region::analyze(Vec::new());
        assert!(region.is_empty());
        assert_eq!(region.edge_pixels().len(), 0);
        assert!(region.max_distance().abs() < f64::EPSILON);
    }

    #[test]
    fn five_by_five_square_geometry() {
        let region = Region::analyze(filled_rect(0, 0, 5, 5));
        assert_eq!(region.len(), 25);
        assert_eq!(region.edge_pixels().len(), 16);
        assert_eq!(region.distance_to_edge(PixelPoint::new(2, 2)), Some(2.0));
        assert!((region.max_distance() - 2.0).abs() < f64::EPSILON);
        assert!((region.center_x() - 2.0).abs() < f64::EPSILON);
        assert!((region.center_y() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn edge_pixels_are_exactly_those_with_a_missing_neighbor() {
        let region = Region::analyze(filled_rect(3, 3, 4, 3));
        for p in region.pixels() {
            let has_missing = p.neighbors4().iter().any(|n| !region.contains(*n));
            assert_eq!(region.is_edge(*p), has_missing, "misclassified {p:?}");
        }
    }

    #[test]
    fn distance_zero_iff_edge() {
        let region = Region::analyze(filled_rect(0, 0, 7, 6));
        for p in region.pixels() {
            let d = region.distance_to_edge(*p).unwrap();
            assert_eq!(d == 0.0, region.is_edge(*p), "distance/edge mismatch at {p:?}");
        }
    }

    #[test]
    fn max_distance_matches_map_maximum() {
        let region = Region::analyze(filled_rect(0, 0, 9, 9));
        let observed = region
            .pixels()
            .iter()
            .map(|p| region.distance_to_edge(*p).unwrap())
            .fold(0.0f64, f64::max);
        assert!((region.max_distance() - observed).abs() < f64::EPSILON);
    }

    #[test]
    fn one_pixel_wide_line_is_all_edge() {
        let pixels: Vec<PixelPoint> = (0..8).map(|x| PixelPoint::new(x, 0)).collect();
        let region = Region::analyze(pixels);
        assert_eq!(region.edge_pixels().len(), region.len());
        assert!(region.max_distance().abs() < f64::EPSILON);
    }

    #[test]
    fn single_pixel_is_an_edge_pixel_at_distance_zero() {
        let region = Region::analyze(vec![PixelPoint::new(4, 4)]);
        assert_eq!(region.len(), 1);
        assert!(region.is_edge(PixelPoint::new(4, 4)));
        assert_eq!(region.distance_to_edge(PixelPoint::new(4, 4)), Some(0.0));
        assert_eq!(region.bounds().width(), 1);
    }

    #[test]
    fn ring_centroid_lands_in_the_hole() {
        // 5x5 outline with hollow center: centroid is the hole's middle,
        // which is not itself a region pixel.
        let mut pixels = Vec::new();
        for y in 0..5 {
            for x in 0..5 {
                if x == 0 || x == 4 || y == 0 || y == 4 {
                    pixels.push(PixelPoint::new(x, y));
                }
            }
        }
        let region = Region::analyze(pixels);
        assert!((region.center_x() - 2.0).abs() < f64::EPSILON);
        assert!((region.center_y() - 2.0).abs() < f64::EPSILON);
        assert!(!region.contains(PixelPoint::new(2, 2)));
        // The 1px-thick ring has no interior.
        assert!(region.max_distance().abs() < f64::EPSILON);
    }

    #[test]
    fn distance_respects_region_connectivity() {
        // Two 3x3 blocks joined by a 1px bridge: the bridge is edge, so
        // every pixel stays within distance 1 of an edge.
        let mut pixels = filled_rect(0, 0, 3, 3);
        pixels.push(PixelPoint::new(3, 1));
        pixels.extend(filled_rect(4, 0, 3, 3));
        let region = Region::analyze(pixels);
        assert!(region.is_edge(PixelPoint::new(3, 1)));
        assert!((region.max_distance() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pixel_order_is_preserved() {
        let pixels = vec![
            PixelPoint::new(2, 2),
            PixelPoint::new(1, 2),
            PixelPoint::new(2, 1),
        ];
        let region = Region::analyze(pixels.clone());
        assert_eq!(region.pixels(), pixels.as_slice());
    }
}
