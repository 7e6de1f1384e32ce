//! Convex hull over sampled outline points.

use crate::geometry::Point;
use std::cmp::Ordering;

const CONTAINMENT_EPSILON: f64 = 1e-6;

/// Computes the convex hull with a Graham scan.
///
/// The pivot is the point with the lowest `y` (leftmost on ties); the rest
/// are swept in increasing polar angle around it, nearer points first on
/// equal angles, keeping only strict left turns. Collinear and duplicate
/// points are dropped. Non-finite points are ignored.
///
/// Returns the hull counter-clockwise in y-up terms (clockwise on a y-down
/// canvas), starting at the pivot. Fewer than 3 points means the input was
/// degenerate.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let finite: Vec<Point> = points
        .iter()
        .copied()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();

    let Some(pivot) = finite.iter().copied().min_by(|a, b| {
        a.y.total_cmp(&b.y).then_with(|| a.x.total_cmp(&b.x))
    }) else {
        return Vec::new();
    };

    let mut rest: Vec<Point> = finite.into_iter().filter(|p| *p != pivot).collect();
    rest.sort_by(|a, b| compare_polar(pivot, *a, *b));

    let mut stack: Vec<Point> = Vec::with_capacity(rest.len() + 1);
    stack.push(pivot);
    for point in rest {
        while stack.len() >= 2 && turns_right_or_straight(&stack, point) {
            stack.pop();
        }
        stack.push(point);
    }

    // Drop points collinear with the closing edge back to the pivot.
    while stack.len() >= 3 && turns_right_or_straight(&stack, pivot) {
        stack.pop();
    }

    stack
}

/// Returns whether `point` lies on or inside a hull from [`convex_hull`].
pub fn hull_contains(hull: &[Point], point: Point) -> bool {
    if hull.len() < 3 {
        return false;
    }
    let scale = hull
        .iter()
        .map(|p| p.x.abs().max(p.y.abs()))
        .fold(1.0_f64, f64::max);
    let tolerance = CONTAINMENT_EPSILON * scale * scale;

    hull.iter().enumerate().all(|(index, &start)| {
        let end = hull[(index + 1) % hull.len()];
        cross(start, end, point) >= -tolerance
    })
}

/// Z component of `(b - a) x (c - a)`; positive for a left turn.
pub(crate) fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn turns_right_or_straight(stack: &[Point], next: Point) -> bool {
    cross(stack[stack.len() - 2], stack[stack.len() - 1], next) <= 0.0
}

fn compare_polar(pivot: Point, a: Point, b: Point) -> Ordering {
    let angle_a = (a.y - pivot.y).atan2(a.x - pivot.x);
    let angle_b = (b.y - pivot.y).atan2(b.x - pivot.x);
    angle_a.total_cmp(&angle_b).then_with(|| {
        let dist_a = a.sub(pivot).length();
        let dist_b = b.sub(pivot).length();
        dist_a
            .total_cmp(&dist_b)
            .then_with(|| a.x.total_cmp(&b.x))
            .then_with(|| a.y.total_cmp(&b.y))
    })
}
