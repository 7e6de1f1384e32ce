//! Floating edge anchor resolution.
//!
//! # Responsibility
//! - Find where the line between two node centers leaves each node box.
//! - Classify which side of the box each anchor sits on.
//!
//! # Invariants
//! - Anchors lie on the node box perimeter along the center-to-center line.
//! - Coincident centers resolve to a fixed vertical fallback, never NaN.

use crate::geometry::{NodeBox, Point};
use serde::{Deserialize, Serialize};

const COINCIDENT_EPSILON: f64 = 1e-9;
const SIDE_TOLERANCE: f64 = 1.0;

/// Box side a connector handle renders from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Anchor coordinates for one edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeAnchors {
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
    pub source_side: Side,
    pub target_side: Side,
}

impl EdgeAnchors {
    pub fn source_point(&self) -> Point {
        Point::new(self.sx, self.sy)
    }

    pub fn target_point(&self) -> Point {
        Point::new(self.tx, self.ty)
    }
}

/// Computes both anchor points and their sides for `source -> target`.
pub fn edge_anchors(source: &NodeBox, target: &NodeBox) -> EdgeAnchors {
    let source_center = source.center();
    let target_center = target.center();

    let (source_point, target_point) = if coincident(source_center, target_center) {
        (
            boundary_point(source, source_center.add(Point::new(0.0, 1.0))),
            boundary_point(target, target_center.add(Point::new(0.0, -1.0))),
        )
    } else {
        (
            boundary_point(source, target_center),
            boundary_point(target, source_center),
        )
    };

    EdgeAnchors {
        sx: source_point.x,
        sy: source_point.y,
        tx: target_point.x,
        ty: target_point.y,
        source_side: classify_side(source, source_point),
        target_side: classify_side(target, target_point),
    }
}

/// Point where the ray from `node`'s center toward `toward` crosses the box.
///
/// Uses the closed form over the rotated (`xx`, `yy`) basis: with
/// `a = 1 / (|xx| + |yy|)` the local offset `(w*a*(xx+yy), h*a*(yy-xx))`
/// is the center delta scaled so its larger normalized component equals 1.
pub fn boundary_point(node: &NodeBox, toward: Point) -> Point {
    let center = node.center();
    let w = node.dimensions.width / 2.0;
    let h = node.dimensions.height / 2.0;
    if w <= 0.0 || h <= 0.0 {
        return center;
    }

    let delta = toward.sub(center);
    if delta.length() < COINCIDENT_EPSILON {
        return Point::new(center.x, center.y + h);
    }

    let xx = delta.x / (2.0 * w) - delta.y / (2.0 * h);
    let yy = delta.x / (2.0 * w) + delta.y / (2.0 * h);
    let a = 1.0 / (xx.abs() + yy.abs());
    let xx3 = a * xx;
    let yy3 = a * yy;

    Point::new(w * (xx3 + yy3) + center.x, h * (-xx3 + yy3) + center.y)
}

/// Classifies the side of `node` that `point` sits on.
///
/// Coordinates are rounded to whole pixels and compared with a 1px
/// tolerance in the order left, right, top, bottom; anything else is `Top`.
pub fn classify_side(node: &NodeBox, point: Point) -> Side {
    let nx = node.left().round();
    let ny = node.top().round();
    let px = point.x.round();
    let py = point.y.round();

    if px <= nx + SIDE_TOLERANCE {
        return Side::Left;
    }
    if px >= nx + node.dimensions.width - SIDE_TOLERANCE {
        return Side::Right;
    }
    if py <= ny + SIDE_TOLERANCE {
        return Side::Top;
    }
    if py >= ny + node.dimensions.height - SIDE_TOLERANCE {
        return Side::Bottom;
    }
    Side::Top
}

fn coincident(a: Point, b: Point) -> bool {
    a.sub(b).length() < COINCIDENT_EPSILON
}

#[cfg(test)]
mod tests {
    use super::{boundary_point, classify_side, Side};
    use crate::geometry::dimensions::Dimensions;
    use crate::geometry::{NodeBox, Point};
    use crate::model::node::Position;

    fn square() -> NodeBox {
        NodeBox::new(Position::new(0.0, 0.0), Dimensions::new(80.0, 80.0))
    }

    #[test]
    fn horizontal_ray_exits_right_edge_midpoint() {
        let point = boundary_point(&square(), Point::new(500.0, 40.0));
        assert!((point.x - 80.0).abs() < 1e-9);
        assert!((point.y - 40.0).abs() < 1e-9);
        assert_eq!(classify_side(&square(), point), Side::Right);
    }

    #[test]
    fn diagonal_ray_hits_corner() {
        let point = boundary_point(&square(), Point::new(-100.0, -100.0));
        assert!(point.x.abs() < 1e-9);
        assert!(point.y.abs() < 1e-9);
        // Corners resolve left before top.
        assert_eq!(classify_side(&square(), point), Side::Left);
    }

    #[test]
    fn interior_point_defaults_to_top() {
        assert_eq!(classify_side(&square(), Point::new(40.0, 40.0)), Side::Top);
    }
}
