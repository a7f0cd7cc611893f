//! Shared geometry types.
//!
//! All coordinates are absolute machine positions in millimeters.

use serde::{Deserialize, Serialize};

/// A 3-D machine position in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point, including the Z component.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Axis-aligned X/Y extents of the printed geometry.
///
/// Invariant: `min_x <= max_x` and `min_y <= max_y`. Built by folding
/// extrusion move coordinates with [`BoundingBox::include`]; when a
/// stream contains no extrusion moves the caller substitutes
/// [`BoundingBox::fallback`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a bounding box from explicit extents.
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// A degenerate box covering a single coordinate.
    pub fn from_point(x: f64, y: f64) -> Self {
        Self::new(x, x, y, y)
    }

    /// Default extents used when a stream yields no printed geometry.
    pub fn fallback() -> Self {
        Self::new(0.0, 100.0, 0.0, 100.0)
    }

    /// Grow the box to cover the given coordinate.
    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// Midpoint of the box, `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Width of the box along X.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Depth of the box along Y.
    pub fn depth(&self) -> f64 {
        self.max_y - self.min_y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::fallback()
    }
}
