//! Logical/device unit mapping.
//!
//! Stored layout uses resolution-independent logical units; snapping and
//! rendering operate in pixel-accurate device units. `MapMode` converts
//! between the two spaces for a diagram.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Coordinate mapping between logical (persisted) and device (on-screen)
/// units.
///
/// The mapping is a uniform scale around the origin. Scale factors must be
/// finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum MapMode {
    /// One logical unit equals one device unit.
    #[default]
    Identity,
    /// One logical unit equals this many device units.
    Scaled(f64),
}

impl MapMode {
    /// Device units per logical unit.
    pub fn scale(&self) -> f64 {
        match self {
            MapMode::Identity => 1.0,
            MapMode::Scaled(scale) => *scale,
        }
    }

    /// Convert a logical value to device units.
    pub fn logical_to_device(&self, value: f64) -> f64 {
        value * self.scale()
    }

    /// Convert a device value to logical units.
    pub fn device_to_logical(&self, value: f64) -> f64 {
        value / self.scale()
    }

    /// Convert a logical point to device units.
    pub fn point_to_device(&self, point: Point) -> Point {
        let s = self.scale();
        Point::new(point.x * s, point.y * s)
    }

    /// Convert a device point to logical units.
    pub fn point_to_logical(&self, point: Point) -> Point {
        let s = self.scale();
        Point::new(point.x / s, point.y / s)
    }

    /// Convert a logical translation to device units.
    pub fn vec_to_device(&self, vec: Vec2) -> Vec2 {
        vec * self.scale()
    }

    /// Convert a device translation to logical units.
    pub fn vec_to_logical(&self, vec: Vec2) -> Vec2 {
        vec / self.scale()
    }

    /// Convert a logical rectangle to device units.
    pub fn rect_to_device(&self, rect: Rect) -> Rect {
        let s = self.scale();
        Rect::new(rect.x0 * s, rect.y0 * s, rect.x1 * s, rect.y1 * s)
    }

    /// Convert a device rectangle to logical units.
    pub fn rect_to_logical(&self, rect: Rect) -> Rect {
        let s = self.scale();
        Rect::new(rect.x0 / s, rect.y0 / s, rect.x1 / s, rect.y1 / s)
    }
}
