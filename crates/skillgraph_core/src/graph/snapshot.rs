//! Render snapshot: nodes, anchored edges, and region outlines.

use crate::config::{EngineConfig, OutlineConfig};
use crate::geometry::anchor::{edge_anchors, EdgeAnchors};
use crate::geometry::outline::{build_outline, OutlinePath};
use crate::graph::builder::{build_graph, GraphNode, SkillGraph};
use crate::graph::region::region_members;
use crate::model::node::{NodeId, NodeKind, Position};
use crate::model::records::GraphRecords;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Edge with resolved floating anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeGeometry {
    pub source: NodeId,
    pub target: NodeId,
    pub anchors: EdgeAnchors,
}

/// Outline grouping one skill or objective with its region members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionOutline {
    pub source: NodeId,
    pub members: Vec<NodeId>,
    pub outline: OutlinePath,
}

/// Everything the rendering collaborator needs for one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<EdgeGeometry>,
    pub outlines: Vec<RegionOutline>,
}

/// Resolves edge anchors and outlines for an already built graph.
///
/// Edges whose endpoints are missing from `graph` are skipped. Skills and
/// objectives without region members get no outline.
pub fn render_snapshot(graph: &SkillGraph, outline: &OutlineConfig) -> GraphSnapshot {
    let edges = graph
        .edges()
        .iter()
        .filter_map(|edge| {
            let source = graph.node(&edge.source)?;
            let target = graph.node(&edge.target)?;
            Some(EdgeGeometry {
                source: edge.source.clone(),
                target: edge.target.clone(),
                anchors: edge_anchors(&source.node_box(), &target.node_box()),
            })
        })
        .collect();

    let outlines = graph
        .nodes()
        .iter()
        .filter(|node| matches!(node.kind(), NodeKind::Skill | NodeKind::Objective))
        .filter_map(|node| {
            let members = region_members(graph, &node.id);
            let boxes = members.iter().map(|m| m.node_box()).collect::<Vec<_>>();
            let path = build_outline(&node.node_box(), &boxes, outline)?;
            Some(RegionOutline {
                source: node.id.clone(),
                members: members.iter().map(|m| m.id.clone()).collect(),
                outline: path,
            })
        })
        .collect();

    GraphSnapshot {
        nodes: graph.nodes().to_vec(),
        edges,
        outlines,
    }
}

/// Full pipeline: build the graph from records, then render it.
pub fn compute_snapshot<R: Rng + ?Sized>(
    records: &GraphRecords,
    stored: &BTreeMap<NodeId, Position>,
    config: &EngineConfig,
    rng: &mut R,
) -> GraphSnapshot {
    let graph = build_graph(records, stored, &config.layout, rng);
    render_snapshot(&graph, &config.outline)
}
