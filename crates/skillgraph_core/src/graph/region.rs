//! Transitive neighborhood used for region outlines.

use crate::graph::builder::{GraphNode, SkillGraph};
use crate::model::node::{NodeId, NodeKind};
use std::collections::BTreeSet;

/// Nodes grouped with `source` in its region outline, sorted by id.
///
/// - Skill: its stage nodes, plus tickets linked to those stage nodes.
/// - Objective: its linked tickets.
/// - Any other kind, or an unknown id: empty.
pub fn region_members<'a>(graph: &'a SkillGraph, source: &NodeId) -> Vec<&'a GraphNode> {
    let Some(source_node) = graph.node(source) else {
        return Vec::new();
    };

    let mut members = BTreeSet::new();
    match source_node.kind() {
        NodeKind::Skill => {
            let stages = graph
                .outgoing(source)
                .map(|edge| &edge.target)
                .filter(|id| id.kind() == Some(NodeKind::Stage))
                .collect::<Vec<_>>();
            for stage_id in stages {
                members.insert(stage_id.clone());
                for edge in graph.incoming(stage_id) {
                    if edge.source.kind() == Some(NodeKind::Ticket) {
                        members.insert(edge.source.clone());
                    }
                }
            }
        }
        NodeKind::Objective => {
            for edge in graph.incoming(source) {
                members.insert(edge.source.clone());
            }
        }
        NodeKind::Stage | NodeKind::Ticket => {}
    }

    members.iter().filter_map(|id| graph.node(id)).collect()
}
