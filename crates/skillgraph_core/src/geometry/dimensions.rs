//! Fixed bounding-box lookup per node shape.

use crate::model::node::{NodeKind, NodeShape};
use serde::{Deserialize, Serialize};

/// Width and height of a node box in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

pub const SKILL_DIMENSIONS: Dimensions = Dimensions::new(104.0, 104.0);
pub const STAGE_DIMENSIONS: Dimensions = Dimensions::new(80.0, 80.0);
pub const TICKET_CARD_DIMENSIONS: Dimensions = Dimensions::new(180.0, 100.0);
pub const TICKET_COMPACT_DIMENSIONS: Dimensions = Dimensions::new(60.0, 60.0);
pub const OBJECTIVE_DIMENSIONS: Dimensions = Dimensions::new(200.0, 80.0);
/// Used for kind labels that do not parse into a known shape.
pub const DEFAULT_DIMENSIONS: Dimensions = Dimensions::new(100.0, 100.0);

pub fn dimensions(shape: NodeShape) -> Dimensions {
    match shape {
        NodeShape::Skill => SKILL_DIMENSIONS,
        NodeShape::Stage => STAGE_DIMENSIONS,
        NodeShape::TicketCard => TICKET_CARD_DIMENSIONS,
        NodeShape::TicketCompact => TICKET_COMPACT_DIMENSIONS,
        NodeShape::Objective => OBJECTIVE_DIMENSIONS,
    }
}

/// Resolves dimensions from a persisted kind label.
///
/// Tickets resolve to the card layout. Unknown labels resolve to
/// [`DEFAULT_DIMENSIONS`] instead of failing.
pub fn dimensions_for_label(label: &str) -> Dimensions {
    match NodeKind::parse(label.trim()) {
        Some(NodeKind::Skill) => dimensions(NodeShape::Skill),
        Some(NodeKind::Stage) => dimensions(NodeShape::Stage),
        Some(NodeKind::Ticket) => dimensions(NodeShape::TicketCard),
        Some(NodeKind::Objective) => dimensions(NodeShape::Objective),
        None => DEFAULT_DIMENSIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::{dimensions, dimensions_for_label, Dimensions, DEFAULT_DIMENSIONS};
    use crate::model::node::NodeShape;

    #[test]
    fn lookup_table_matches_node_shapes() {
        assert_eq!(dimensions(NodeShape::Skill), Dimensions::new(104.0, 104.0));
        assert_eq!(dimensions(NodeShape::Stage), Dimensions::new(80.0, 80.0));
        assert_eq!(dimensions(NodeShape::TicketCard), Dimensions::new(180.0, 100.0));
        assert_eq!(dimensions(NodeShape::TicketCompact), Dimensions::new(60.0, 60.0));
        assert_eq!(dimensions(NodeShape::Objective), Dimensions::new(200.0, 80.0));
    }

    #[test]
    fn unknown_labels_fall_back_to_default() {
        assert_eq!(dimensions_for_label("calendar_event"), DEFAULT_DIMENSIONS);
        assert_eq!(dimensions_for_label(" stage "), Dimensions::new(80.0, 80.0));
    }
}
