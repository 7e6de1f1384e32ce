//! Persistence collaborator contract for position writes.

use crate::model::node::{NodeId, NodeKind, Position};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure reported by a position sink for one write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistError {
    message: String,
}

impl PersistError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "position persist failed: {}", self.message)
    }
}

impl Error for PersistError {}

/// Receives coalesced position writes from the queue.
///
/// Implementations own their own timeouts; the queue never imposes one.
pub trait PositionSink {
    fn persist(
        &mut self,
        node_id: &NodeId,
        kind: NodeKind,
        position: Position,
    ) -> Result<(), PersistError>;
}

impl<F> PositionSink for F
where
    F: FnMut(&NodeId, NodeKind, Position) -> Result<(), PersistError>,
{
    fn persist(
        &mut self,
        node_id: &NodeId,
        kind: NodeKind,
        position: Position,
    ) -> Result<(), PersistError> {
        self(node_id, kind, position)
    }
}
