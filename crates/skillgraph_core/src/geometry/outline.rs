//! Region outline ("blob") around a node and its connected group.
//!
//! # Responsibility
//! - Sample padded node ellipses and connecting corridors into a point cloud.
//! - Hull the cloud and smooth it into a closed cubic Bezier path.
//!
//! # Invariants
//! - Output depends only on node boxes and config, never on input order of
//!   equal points or on hidden state.
//! - A group with no connected nodes has no outline.
//! - A degenerate hull falls back to a padded rounded rectangle.

use crate::config::OutlineConfig;
use crate::geometry::hull::convex_hull;
use crate::geometry::{NodeBox, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt::Write as _;

const ELLIPSE_SAMPLES: usize = 8;
const TUBE_SEGMENT_LENGTH: f64 = 100.0;
const MIN_TUBE_SEGMENTS: usize = 2;
/// Cubic control distance for a quarter circle of radius 1.
const ARC_KAPPA: f64 = 0.552_284_749_831;

/// One drawing command of a closed outline path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { to: Point },
    CubicTo { c1: Point, c2: Point, to: Point },
    Close,
}

/// Closed outline path with the polygon it was smoothed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlinePath {
    /// Pre-smoothing polygon: the convex hull, or rectangle corners on fallback.
    pub hull: Vec<Point>,
    pub commands: Vec<PathCommand>,
    /// Whether the rounded-rectangle fallback was used.
    pub is_fallback: bool,
}

impl OutlinePath {
    /// Renders SVG path data (`M x,y C ... Z`).
    pub fn to_svg_path(&self) -> String {
        let mut out = String::new();
        for command in &self.commands {
            if !out.is_empty() {
                out.push(' ');
            }
            // Writing into a String never fails.
            let _ = match command {
                PathCommand::MoveTo { to } => write!(out, "M {:.2},{:.2}", to.x, to.y),
                PathCommand::CubicTo { c1, c2, to } => write!(
                    out,
                    "C {:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
                    c1.x, c1.y, c2.x, c2.y, to.x, to.y
                ),
                PathCommand::Close => write!(out, "Z"),
            };
        }
        out
    }
}

/// Builds the outline enclosing `source`, every node in `connected`, and
/// the corridors joining each connected node to `source`.
///
/// Returns `None` when `connected` is empty.
pub fn build_outline(
    source: &NodeBox,
    connected: &[NodeBox],
    config: &OutlineConfig,
) -> Option<OutlinePath> {
    if connected.is_empty() {
        return None;
    }

    let points = sample_outline_points(source, connected, config);
    let members = std::iter::once(*source)
        .chain(connected.iter().copied())
        .collect::<Vec<_>>();
    Some(outline_from_points(&points, &members, config))
}

/// Point cloud for [`build_outline`]: padded ellipses plus corridor samples.
pub fn sample_outline_points(
    source: &NodeBox,
    connected: &[NodeBox],
    config: &OutlineConfig,
) -> Vec<Point> {
    let mut points = Vec::with_capacity((connected.len() + 1) * ELLIPSE_SAMPLES);
    push_ellipse_samples(&mut points, source, config.node_padding);

    let source_center = source.center();
    for node in connected {
        push_ellipse_samples(&mut points, node, config.node_padding);
        push_tube_samples(&mut points, node.center(), source_center, config.tube_padding);
    }
    points
}

/// Hulls `points` and smooths the result, falling back to a rounded
/// rectangle around `members` when the hull is degenerate.
pub fn outline_from_points(
    points: &[Point],
    members: &[NodeBox],
    config: &OutlineConfig,
) -> OutlinePath {
    let hull = convex_hull(points);
    if hull.len() < 3 {
        return rounded_rect_outline(members, config.node_padding);
    }

    let commands = smooth_closed(&hull, config.tension);
    OutlinePath {
        hull,
        commands,
        is_fallback: false,
    }
}

fn push_ellipse_samples(points: &mut Vec<Point>, node: &NodeBox, padding: f64) {
    let center = node.center();
    let rx = node.dimensions.width / 2.0 + padding;
    let ry = node.dimensions.height / 2.0 + padding;
    for index in 0..ELLIPSE_SAMPLES {
        let angle = index as f64 * 2.0 * PI / ELLIPSE_SAMPLES as f64;
        points.push(Point::new(
            center.x + rx * angle.cos(),
            center.y + ry * angle.sin(),
        ));
    }
}

fn push_tube_samples(points: &mut Vec<Point>, from: Point, to: Point, padding: f64) {
    let delta = to.sub(from);
    let length = delta.length();
    if length <= f64::EPSILON {
        return;
    }

    let normal = Point::new(-delta.y / length, delta.x / length).scale(padding);
    let segments = ((length / TUBE_SEGMENT_LENGTH).floor() as usize).max(MIN_TUBE_SEGMENTS);
    for step in 0..=segments {
        let along = from.add(delta.scale(step as f64 / segments as f64));
        points.push(along.add(normal));
        points.push(along.sub(normal));
    }
}

/// Closed Catmull-Rom spline through `hull`, as cubic Bezier segments.
///
/// Control points sit at `tension / 2` of the neighbor chord from each end.
fn smooth_closed(hull: &[Point], tension: f64) -> Vec<PathCommand> {
    let n = hull.len();
    let factor = tension / 2.0;
    let mut commands = Vec::with_capacity(n + 2);
    commands.push(PathCommand::MoveTo { to: hull[0] });

    for index in 0..n {
        let p0 = hull[(index + n - 1) % n];
        let p1 = hull[index];
        let p2 = hull[(index + 1) % n];
        let p3 = hull[(index + 2) % n];

        commands.push(PathCommand::CubicTo {
            c1: p1.add(p2.sub(p0).scale(factor)),
            c2: p2.sub(p3.sub(p1).scale(factor)),
            to: p2,
        });
    }

    commands.push(PathCommand::Close);
    commands
}

fn rounded_rect_outline(members: &[NodeBox], padding: f64) -> OutlinePath {
    let (mut left, mut top) = (f64::INFINITY, f64::INFINITY);
    let (mut right, mut bottom) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for node in members {
        left = left.min(node.left());
        top = top.min(node.top());
        right = right.max(node.right());
        bottom = bottom.max(node.bottom());
    }
    if !(left.is_finite() && top.is_finite() && right.is_finite() && bottom.is_finite()) {
        (left, top, right, bottom) = (0.0, 0.0, 0.0, 0.0);
    }

    let (left, top) = (left - padding, top - padding);
    let (right, bottom) = (right + padding, bottom + padding);
    let radius = padding
        .min((right - left) / 2.0)
        .min((bottom - top) / 2.0)
        .max(0.0);
    let k = radius * (1.0 - ARC_KAPPA);

    let start = Point::new(left + radius, top);
    let mut commands = vec![PathCommand::MoveTo { to: start }];

    push_line(&mut commands, start, Point::new(right - radius, top));
    push_corner(
        &mut commands,
        Point::new(right - k, top),
        Point::new(right, top + k),
        Point::new(right, top + radius),
    );
    push_line(
        &mut commands,
        Point::new(right, top + radius),
        Point::new(right, bottom - radius),
    );
    push_corner(
        &mut commands,
        Point::new(right, bottom - k),
        Point::new(right - k, bottom),
        Point::new(right - radius, bottom),
    );
    push_line(
        &mut commands,
        Point::new(right - radius, bottom),
        Point::new(left + radius, bottom),
    );
    push_corner(
        &mut commands,
        Point::new(left + k, bottom),
        Point::new(left, bottom - k),
        Point::new(left, bottom - radius),
    );
    push_line(
        &mut commands,
        Point::new(left, bottom - radius),
        Point::new(left, top + radius),
    );
    push_corner(
        &mut commands,
        Point::new(left, top + k),
        Point::new(left + k, top),
        start,
    );
    commands.push(PathCommand::Close);

    OutlinePath {
        hull: vec![
            Point::new(left, top),
            Point::new(right, top),
            Point::new(right, bottom),
            Point::new(left, bottom),
        ],
        commands,
        is_fallback: true,
    }
}

/// Straight segment expressed as a cubic so the path stays all-cubic.
fn push_line(commands: &mut Vec<PathCommand>, from: Point, to: Point) {
    let delta = to.sub(from);
    commands.push(PathCommand::CubicTo {
        c1: from.add(delta.scale(1.0 / 3.0)),
        c2: from.add(delta.scale(2.0 / 3.0)),
        to,
    });
}

fn push_corner(commands: &mut Vec<PathCommand>, c1: Point, c2: Point, to: Point) {
    commands.push(PathCommand::CubicTo { c1, c2, to });
}
