use skillgraph_core::{edge_anchors, Dimensions, NodeBox, Point, Position, Side};

const TOLERANCE: f64 = 1e-9;

fn node(x: f64, y: f64, width: f64, height: f64) -> NodeBox {
    NodeBox::new(Position::new(x, y), Dimensions::new(width, height))
}

/// Largest normalized component of `point - center`; 1.0 on the box boundary.
fn normalized_extent(node: &NodeBox, point: Point) -> f64 {
    let center = node.center();
    let w = node.dimensions.width / 2.0;
    let h = node.dimensions.height / 2.0;
    ((point.x - center.x) / w)
        .abs()
        .max(((point.y - center.y) / h).abs())
}

fn assert_on_boundary_toward(node: &NodeBox, anchor: Point, toward: Point) {
    let center = node.center();
    assert!(
        (normalized_extent(node, anchor) - 1.0).abs() < TOLERANCE,
        "{anchor:?} not on boundary of {node:?}"
    );

    let to_anchor = anchor.sub(center);
    let to_other = toward.sub(center);
    let cross = to_anchor.x * to_other.y - to_anchor.y * to_other.x;
    let dot = to_anchor.x * to_other.x + to_anchor.y * to_other.y;
    assert!(cross.abs() < 1e-6, "{anchor:?} off the center line");
    assert!(dot > 0.0, "{anchor:?} points away from {toward:?}");
}

#[test]
fn anchors_lie_on_each_boundary_along_center_line() {
    let skill = node(0.0, 0.0, 104.0, 104.0);
    let others = [
        node(300.0, 20.0, 80.0, 80.0),
        node(-250.0, 400.0, 180.0, 100.0),
        node(10.0, -500.0, 200.0, 80.0),
        node(-90.0, -60.0, 60.0, 60.0),
        node(37.5, 211.25, 100.0, 100.0),
    ];

    for other in &others {
        let anchors = edge_anchors(&skill, other);
        assert_on_boundary_toward(&skill, anchors.source_point(), other.center());
        assert_on_boundary_toward(other, anchors.target_point(), skill.center());
    }
}

#[test]
fn sides_follow_relative_placement() {
    let source = node(0.0, 0.0, 80.0, 80.0);

    let right = edge_anchors(&source, &node(400.0, 0.0, 80.0, 80.0));
    assert_eq!(right.source_side, Side::Right);
    assert_eq!(right.target_side, Side::Left);

    let below = edge_anchors(&source, &node(0.0, 400.0, 80.0, 80.0));
    assert_eq!(below.source_side, Side::Bottom);
    assert_eq!(below.target_side, Side::Top);
    assert_eq!((below.sx, below.sy), (40.0, 80.0));
    assert_eq!((below.tx, below.ty), (40.0, 400.0));
}

#[test]
fn coincident_centers_use_vertical_fallback() {
    let source = node(100.0, 100.0, 80.0, 80.0);
    let target = node(90.0, 90.0, 100.0, 100.0);

    let anchors = edge_anchors(&source, &target);
    for value in [anchors.sx, anchors.sy, anchors.tx, anchors.ty] {
        assert!(value.is_finite());
    }
    assert_eq!((anchors.sx, anchors.sy), (140.0, 180.0));
    assert_eq!((anchors.tx, anchors.ty), (140.0, 90.0));
    assert_eq!(anchors.source_side, Side::Bottom);
    assert_eq!(anchors.target_side, Side::Top);
}

#[test]
fn anchors_are_stable_across_calls() {
    let a = node(12.25, -40.5, 104.0, 104.0);
    let b = node(-310.75, 220.0, 180.0, 100.0);
    assert_eq!(edge_anchors(&a, &b), edge_anchors(&a, &b));
}
