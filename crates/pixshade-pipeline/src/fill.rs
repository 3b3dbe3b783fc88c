//! Click-to-region detection: flood fills with tolerance and enclosure
//! rules.
//!
//! Given a canvas and a clicked start point, [`detect_region`] returns
//! the pixels of "the shape" under the click. Which pixels qualify is a
//! per-click policy, selected by [`FillMode`]:
//!
//! - [`SameColor`](FillMode::SameColor) — classic flood fill over pixels
//!   matching the clicked color within a tolerance.
//! - [`NonTransparent`](FillMode::NonTransparent) — flood fill over all
//!   connected opaque pixels regardless of color.
//! - [`BoundedArea`](FillMode::BoundedArea) — topological enclosure
//!   fill: clicking a hole selects the hole plus its rim; clicking an
//!   outline selects the outline plus everything it encloses.
//!
//! All traversal is 4-connected BFS with an explicit queue and visited
//! set, matching the connectivity used by the region analysis stage.
//! Degenerate inputs (out-of-range start, zero-sized canvas) return an
//! empty vector — a click on nothing selects nothing.

use std::collections::{HashSet, VecDeque};

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, ColorResolver, Palette};
use crate::color;
use crate::types::PixelPoint;

/// Policy controlling which pixels a click selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillMode {
    /// Pixels whose color matches the clicked pixel within the
    /// configured tolerance.
    SameColor,

    /// All connected non-transparent pixels, ignoring color and
    /// tolerance. Clicking a transparent pixel falls back to
    /// [`BoundedArea`](Self::BoundedArea), reading the click as "select
    /// the hole I'm pointing at".
    #[default]
    NonTransparent,

    /// The connected opaque shell plus every transparent pocket it
    /// encloses. A transparent region that leaks to the canvas edge is
    /// unbounded and selects nothing.
    BoundedArea,
}

/// Detect the region of pixels selected by a click at `start`.
///
/// `tolerance` only affects [`FillMode::SameColor`]: 0 demands exact RGB
/// equality, larger values accept colors within
/// `tolerance * sqrt(3)` Euclidean RGB distance (scaling a 0–255 knob to
/// the 0–441 RGB diagonal). `palette` is required to resolve colors on
/// indexed canvases; without it every index reads as transparent.
///
/// The returned pixel order is the BFS discovery order — not
/// semantically meaningful, but stable, so downstream passes are
/// reproducible.
#[must_use]
pub fn detect_region<C: Canvas>(
    canvas: &C,
    start: PixelPoint,
    mode: FillMode,
    tolerance: u8,
    palette: Option<&Palette>,
) -> Vec<PixelPoint> {
    if canvas.width() == 0 || canvas.height() == 0 || !canvas.contains(start) {
        return Vec::new();
    }
    let resolver = ColorResolver::new(canvas, palette);
    match mode {
        FillMode::SameColor => same_color_fill(canvas, &resolver, start, tolerance),
        FillMode::NonTransparent => non_transparent_fill(canvas, &resolver, start),
        FillMode::BoundedArea => bounded_area_fill(canvas, &resolver, start),
    }
}

#[allow(clippy::cast_sign_loss)]
fn rgba_at<C: Canvas>(resolver: &ColorResolver<'_, C>, point: PixelPoint) -> Rgba<u8> {
    resolver.rgba(point.x as u32, point.y as u32)
}

/// Whether `candidate` matches the clicked `target` color.
///
/// Transparent pixels only ever match transparent targets; tolerance
/// does not bridge the alpha-zero boundary.
fn color_matches(target: Rgba<u8>, candidate: Rgba<u8>, tolerance: u8) -> bool {
    let target_clear = target.0[3] == 0;
    let candidate_clear = candidate.0[3] == 0;
    if target_clear || candidate_clear {
        return target_clear && candidate_clear;
    }
    if tolerance == 0 {
        target.0[0] == candidate.0[0]
            && target.0[1] == candidate.0[1]
            && target.0[2] == candidate.0[2]
    } else {
        color::rgb_distance(target, candidate) <= f64::from(tolerance) * 3.0f64.sqrt()
    }
}

/// BFS from `start` over pixels for which `admit` holds.
///
/// `start` itself is assumed admitted. Returns pixels in discovery
/// order.
fn flood<C, F>(canvas: &C, start: PixelPoint, mut admit: F) -> Vec<PixelPoint>
where
    C: Canvas,
    F: FnMut(PixelPoint) -> bool,
{
    let mut region = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(point) = queue.pop_front() {
        region.push(point);
        for neighbor in point.neighbors4() {
            if !canvas.contains(neighbor) || !visited.insert(neighbor) {
                continue;
            }
            if admit(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    region
}

fn same_color_fill<C: Canvas>(
    canvas: &C,
    resolver: &ColorResolver<'_, C>,
    start: PixelPoint,
    tolerance: u8,
) -> Vec<PixelPoint> {
    let target = rgba_at(resolver, start);
    flood(canvas, start, |p| {
        color_matches(target, rgba_at(resolver, p), tolerance)
    })
}

fn non_transparent_fill<C: Canvas>(
    canvas: &C,
    resolver: &ColorResolver<'_, C>,
    start: PixelPoint,
) -> Vec<PixelPoint> {
    if rgba_at(resolver, start).0[3] == 0 {
        // Clicking empty space is read as "select the hole".
        return bounded_area_fill(canvas, resolver, start);
    }
    flood(canvas, start, |p| rgba_at(resolver, p).0[3] > 0)
}

/// Result of flooding a transparent pocket from one seed.
struct Pocket {
    /// Whether the pocket never touched the canvas border.
    enclosed: bool,
    /// Transparent pixels of the pocket, in discovery order.
    interior: Vec<PixelPoint>,
    /// Opaque pixels adjacent to the pocket, in discovery order.
    boundary: Vec<PixelPoint>,
}

/// Flood a transparent pocket and classify it as enclosed or leaking.
///
/// The canvas border is an open exit: any step that would leave the
/// image marks the pocket as unbounded. The flood still completes so the
/// caller gets the full set of visited transparent pixels either way.
fn flood_pocket<C: Canvas>(
    canvas: &C,
    resolver: &ColorResolver<'_, C>,
    start: PixelPoint,
) -> Pocket {
    let mut interior = Vec::new();
    let mut boundary = Vec::new();
    let mut boundary_seen = HashSet::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    let mut enclosed = true;
    visited.insert(start);
    queue.push_back(start);

    while let Some(point) = queue.pop_front() {
        interior.push(point);
        for neighbor in point.neighbors4() {
            if !canvas.contains(neighbor) {
                enclosed = false;
            } else if rgba_at(resolver, neighbor).0[3] == 0 {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            } else if boundary_seen.insert(neighbor) {
                boundary.push(neighbor);
            }
        }
    }

    Pocket {
        enclosed,
        interior,
        boundary,
    }
}

fn bounded_area_fill<C: Canvas>(
    canvas: &C,
    resolver: &ColorResolver<'_, C>,
    start: PixelPoint,
) -> Vec<PixelPoint> {
    if rgba_at(resolver, start).0[3] == 0 {
        // Transparent click: the hole itself plus its rim, or nothing if
        // the "hole" leaks off-canvas.
        let pocket = flood_pocket(canvas, resolver, start);
        if !pocket.enclosed {
            return Vec::new();
        }
        let mut region = pocket.interior;
        region.extend(pocket.boundary);
        return region;
    }

    // Opaque click: collect the connected opaque shell first, then probe
    // every adjacent transparent pocket for enclosure.
    let shell = flood(canvas, start, |p| rgba_at(resolver, p).0[3] > 0);
    let mut region = shell.clone();
    let mut classified: HashSet<PixelPoint> = HashSet::new();

    for point in &shell {
        for neighbor in point.neighbors4() {
            if !canvas.contains(neighbor)
                || rgba_at(resolver, neighbor).0[3] > 0
                || classified.contains(&neighbor)
            {
                continue;
            }
            let pocket = flood_pocket(canvas, resolver, neighbor);
            classified.extend(pocket.interior.iter().copied());
            if pocket.enclosed {
                region.extend(pocket.interior);
            }
        }
    }
    region
}
