//! Shared geometric types for the auto-shading pipeline.

use serde::{Deserialize, Serialize};

/// An integer pixel coordinate in image space.
///
/// Equality and hashing are structural (by coordinate pair), so pixel
/// sets and per-pixel maps key directly on the point with no bespoke
/// hash combining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Horizontal position (pixels from the left edge).
    pub x: i32,
    /// Vertical position (pixels from the top edge).
    pub y: i32,
}

impl PixelPoint {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four axis-aligned neighbors: left, right, up, down.
    ///
    /// Region connectivity is 4-connected everywhere in the pipeline;
    /// this is the canonical neighbor order for all BFS traversals.
    #[must_use]
    pub const fn neighbors4(self) -> [Self; 4] {
        [
            Self::new(self.x - 1, self.y),
            Self::new(self.x + 1, self.y),
            Self::new(self.x, self.y - 1),
            Self::new(self.x, self.y + 1),
        ]
    }

    /// The eight surrounding neighbors, row-major from the top-left.
    ///
    /// Used only where diagonal adjacency matters (contour tangents).
    #[must_use]
    pub const fn neighbors8(self) -> [Self; 8] {
        [
            Self::new(self.x - 1, self.y - 1),
            Self::new(self.x, self.y - 1),
            Self::new(self.x + 1, self.y - 1),
            Self::new(self.x - 1, self.y),
            Self::new(self.x + 1, self.y),
            Self::new(self.x - 1, self.y + 1),
            Self::new(self.x, self.y + 1),
            Self::new(self.x + 1, self.y + 1),
        ]
    }
}

/// A 2D direction or offset with `f64` components.
///
/// Used for surface normals and the light direction. Normals are always
/// unit length: [`normalized`](Self::normalized) never divides by zero —
/// the zero vector normalizes to [`UP`](Self::UP) by convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component (screen space: positive points down).
    pub y: f64,
}

impl Vec2 {
    /// The "points up" unit vector `(0, -1)` in screen coordinates.
    ///
    /// Fallback direction for degenerate inputs (zero-length gradients,
    /// a pixel coinciding exactly with the region centroid).
    pub const UP: Self = Self { x: 0.0, y: -1.0 };

    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `degrees` counter-clockwise from the +x axis in
    /// screen space, so 90° points straight up: `(0, -1)`.
    #[must_use]
    pub fn from_angle_deg(degrees: f64) -> Self {
        let rad = degrees.to_radians();
        Self::new(rad.cos(), -rad.sin())
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    /// This vector scaled to unit length, or [`UP`](Self::UP) if it has
    /// no direction to preserve.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::UP
        }
    }

    /// Rotate 90° counter-clockwise in screen space.
    ///
    /// Turns a contour tangent into one of its two normal candidates;
    /// the caller picks the outward one.
    #[must_use]
    pub const fn perpendicular(self) -> Self {
        Self::new(self.y, -self.x)
    }

    /// Component-wise sum.
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise difference.
    #[must_use]
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Scale both components.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Flip both components.
    #[must_use]
    pub fn flipped(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Minimal axis-aligned rectangle containing a set of pixels.
///
/// Inclusive on all four sides: a single pixel has `min == max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Leftmost pixel x.
    pub min_x: i32,
    /// Topmost pixel y.
    pub min_y: i32,
    /// Rightmost pixel x (inclusive).
    pub max_x: i32,
    /// Bottommost pixel y (inclusive).
    pub max_y: i32,
}

impl Bounds {
    /// Width in pixels (inclusive bounds, so a single pixel is 1 wide).
    #[must_use]
    pub const fn width(self) -> i32 {
        self.max_x - self.min_x + 1
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(self) -> i32 {
        self.max_y - self.min_y + 1
    }
}

/// Errors from the one-shot shading entry points.
///
/// The interactive [`AutoShader`](crate::pipeline::AutoShader) surface
/// never returns these — a click that selects nothing simply reports
/// `false` so the host editor degrades to "nothing to shade". The
/// functional entry points surface the same outcomes as typed errors for
/// callers (like the CLI) that want a message instead of a bool.
#[derive(Debug, thiserror::Error)]
pub enum ShadeError {
    /// The click point is outside the canvas.
    #[error("start point ({x}, {y}) is outside the canvas")]
    StartOutOfBounds {
        /// Clicked x coordinate.
        x: i32,
        /// Clicked y coordinate.
        y: i32,
    },

    /// Region detection selected no pixels.
    #[error("no region found at the start point")]
    NoRegion,
}
