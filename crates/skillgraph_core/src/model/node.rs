//! Graph node identity, kind, and position types.
//!
//! # Invariants
//! - `NodeKind` is the closed set persisted alongside positions.
//! - `NodeShape` refines a kind with its render context; every shape maps
//!   to exactly one kind.
//! - `Position` is the top-left corner of the node box in canvas units.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Canvas position of a node's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Persisted node kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Skill,
    Stage,
    Ticket,
    Objective,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::Stage => "stage",
            Self::Ticket => "ticket",
            Self::Objective => "objective",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "skill" => Some(Self::Skill),
            "stage" => Some(Self::Stage),
            "ticket" => Some(Self::Ticket),
            "objective" => Some(Self::Objective),
            _ => None,
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render shape of a node: its kind plus context-dependent sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    Skill,
    Stage,
    /// Full ticket card, used on objective and ticket boards.
    TicketCard,
    /// Ticket chip attached to a skill stage.
    TicketCompact,
    Objective,
}

impl NodeShape {
    pub fn kind(self) -> NodeKind {
        match self {
            Self::Skill => NodeKind::Skill,
            Self::Stage => NodeKind::Stage,
            Self::TicketCard | Self::TicketCompact => NodeKind::Ticket,
            Self::Objective => NodeKind::Objective,
        }
    }
}

/// Stable graph node identifier, formatted as `<kind>:<record uuid>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Builds the canonical id for a record-backed node.
    pub fn for_record(kind: NodeKind, record_id: Uuid) -> Self {
        Self(format!("{}:{record_id}", kind.as_str()))
    }

    /// Wraps an id produced elsewhere (e.g. read back from storage).
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Kind prefix of a canonical id, if it has one.
    pub fn kind(&self) -> Option<NodeKind> {
        let (prefix, _) = self.0.split_once(':')?;
        NodeKind::parse(prefix)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::from_raw(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeId, NodeKind, NodeShape};
    use uuid::Uuid;

    #[test]
    fn node_id_embeds_kind_prefix() {
        let record = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
        let id = NodeId::for_record(NodeKind::Stage, record);
        assert_eq!(id.as_str(), "stage:11111111-2222-4333-8444-555555555555");
        assert_eq!(id.kind(), Some(NodeKind::Stage));
        assert_eq!(NodeId::from_raw("free-form").kind(), None);
    }

    #[test]
    fn ticket_shapes_share_ticket_kind() {
        assert_eq!(NodeShape::TicketCard.kind(), NodeKind::Ticket);
        assert_eq!(NodeShape::TicketCompact.kind(), NodeKind::Ticket);
        assert_eq!(NodeKind::parse("objective"), Some(NodeKind::Objective));
        assert_eq!(NodeKind::parse("calendar"), None);
    }
}
