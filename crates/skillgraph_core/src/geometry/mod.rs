//! Node geometry, floating edge anchors, and region outlines.
//!
//! # Responsibility
//! - Map node shapes to bounding boxes.
//! - Compute boundary anchor points for edges between node boxes.
//! - Build smoothed enclosing outlines around node groups.
//!
//! # Invariants
//! - All functions are pure; identical input yields identical output.
//! - No function returns NaN or infinite coordinates for finite input.

pub mod anchor;
pub mod dimensions;
pub mod hull;
pub mod outline;

use crate::model::node::Position;
use dimensions::Dimensions;
use serde::{Deserialize, Serialize};

/// Point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Axis-aligned box occupied by one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    /// Top-left corner.
    pub origin: Position,
    pub dimensions: Dimensions,
}

impl NodeBox {
    pub fn new(origin: Position, dimensions: Dimensions) -> Self {
        Self { origin, dimensions }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.dimensions.width / 2.0,
            self.origin.y + self.dimensions.height / 2.0,
        )
    }

    pub fn left(&self) -> f64 {
        self.origin.x
    }

    pub fn right(&self) -> f64 {
        self.origin.x + self.dimensions.width
    }

    pub fn top(&self) -> f64 {
        self.origin.y
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + self.dimensions.height
    }
}
