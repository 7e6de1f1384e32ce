//! Pure recomputation of graph nodes and edges from records.
//!
//! # Responsibility
//! - Project skills, stage nodes, objectives, and tickets into graph nodes.
//! - Derive edges from link relationships on every pass.
//! - Attach recomputed progress to nodes.
//!
//! # Invariants
//! - Output depends only on inputs; the injected RNG is consulted solely for
//!   nodes with neither a stored nor a record position.
//! - Dangling links produce no edge and no error.
//! - `SkillGraph` node lookup goes through an id index kept in step with
//!   its node list; the first node wins if an id repeats.

use crate::config::LayoutConfig;
use crate::geometry::dimensions::dimensions;
use crate::geometry::NodeBox;
use crate::model::node::{NodeId, NodeKind, NodeShape, Position};
use crate::model::records::{GraphRecords, Skill};
use crate::model::stage::Stage;
use crate::scoring::progress::{
    objective_progress, overall_skill_progress, stage_node_progress, stage_progress,
    StageProgress,
};
use crate::scoring::rubric::Progress;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

/// One node of the progression graph with its recomputed progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub record_id: Uuid,
    pub shape: NodeShape,
    pub label: String,
    pub position: Position,
    /// `None` for tickets, which carry no rubric of their own.
    pub progress: Option<Progress>,
    /// Present on skill nodes only.
    pub stage_progress: Option<StageProgress>,
    /// Present on stage nodes only.
    pub stage: Option<Stage>,
}

impl GraphNode {
    pub fn kind(&self) -> NodeKind {
        self.shape.kind()
    }

    pub fn node_box(&self) -> NodeBox {
        NodeBox::new(self.position, dimensions(self.shape))
    }
}

/// Directed link between two graph nodes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
}

/// Fresh node/edge list for one render pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "GraphParts", into = "GraphParts")]
pub struct SkillGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index: BTreeMap<NodeId, usize>,
}

/// Wire form of [`SkillGraph`]; the index is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct GraphParts {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl From<GraphParts> for SkillGraph {
    fn from(value: GraphParts) -> Self {
        Self::new(value.nodes, value.edges)
    }
}

impl From<SkillGraph> for GraphParts {
    fn from(value: SkillGraph) -> Self {
        Self {
            nodes: value.nodes,
            edges: value.edges,
        }
    }
}

impl SkillGraph {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let mut index = BTreeMap::new();
        for (position, node) in nodes.iter().enumerate() {
            index.entry(node.id.clone()).or_insert(position);
        }
        Self {
            nodes,
            edges,
            index,
        }
    }

    /// Nodes in build order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.index.get(id).and_then(|&position| self.nodes.get(position))
    }

    /// Edges whose target is `id`.
    pub fn incoming<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |edge| &edge.target == id)
    }

    /// Edges whose source is `id`.
    pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |edge| &edge.source == id)
    }
}

/// Builds the graph for `records`.
///
/// Node positions resolve in order: `stored` (positions already persisted
/// by the write queue), then the record's own position, then a uniform
/// random point inside the layout fallback area drawn from `rng`.
///
/// Nodes are emitted as skills, stage nodes, objectives, then tickets, each
/// in record order.
pub fn build_graph<R: Rng + ?Sized>(
    records: &GraphRecords,
    stored: &BTreeMap<NodeId, Position>,
    layout: &LayoutConfig,
    rng: &mut R,
) -> SkillGraph {
    let mut placer = Placer {
        stored,
        layout,
        rng,
        random_placements: 0,
    };
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    let skills_by_id: HashMap<Uuid, &Skill> = records
        .skills
        .iter()
        .map(|skill| (skill.skill_id, skill))
        .collect();

    for skill in &records.skills {
        let id = NodeId::for_record(NodeKind::Skill, skill.skill_id);
        let per_stage = stage_progress(skill, records);
        nodes.push(GraphNode {
            position: placer.place(&id, skill.position),
            id,
            record_id: skill.skill_id,
            shape: NodeShape::Skill,
            label: skill.name.clone(),
            progress: Some(overall_skill_progress(&per_stage)),
            stage_progress: Some(per_stage),
            stage: None,
        });
    }

    let mut stage_node_ids = HashSet::new();
    for stage_node in &records.stage_nodes {
        let id = NodeId::for_record(NodeKind::Stage, stage_node.stage_node_id);
        let owner = skills_by_id.get(&stage_node.skill_id);
        let progress = owner
            .and_then(|skill| skill.rubric(stage_node.stage))
            .map(|rubric| stage_node_progress(stage_node.stage_node_id, rubric, records))
            .unwrap_or(0);

        if owner.is_some() {
            edges.push(GraphEdge {
                source: NodeId::for_record(NodeKind::Skill, stage_node.skill_id),
                target: id.clone(),
            });
        }
        stage_node_ids.insert(stage_node.stage_node_id);
        nodes.push(GraphNode {
            position: placer.place(&id, stage_node.position),
            id,
            record_id: stage_node.stage_node_id,
            shape: NodeShape::Stage,
            label: stage_node.stage.as_str().to_string(),
            progress: Some(progress),
            stage_progress: None,
            stage: Some(stage_node.stage),
        });
    }

    let ticket_ids: HashSet<Uuid> = records
        .work_items
        .iter()
        .map(|item| item.ticket_id)
        .collect();
    for objective in &records.objectives {
        let id = NodeId::for_record(NodeKind::Objective, objective.objective_id);
        let mut linked_seen = HashSet::new();
        for ticket_id in &objective.linked_ticket_ids {
            if ticket_ids.contains(ticket_id) && linked_seen.insert(*ticket_id) {
                edges.push(GraphEdge {
                    source: NodeId::for_record(NodeKind::Ticket, *ticket_id),
                    target: id.clone(),
                });
            }
        }
        nodes.push(GraphNode {
            position: placer.place(&id, objective.position),
            id,
            record_id: objective.objective_id,
            shape: NodeShape::Objective,
            label: objective.title.clone(),
            progress: Some(objective_progress(objective, &records.work_items)),
            stage_progress: None,
            stage: None,
        });
    }

    for item in &records.work_items {
        let id = NodeId::for_record(NodeKind::Ticket, item.ticket_id);
        let linked_stage = item
            .stage_node_id
            .filter(|stage_node_id| stage_node_ids.contains(stage_node_id));
        let shape = match linked_stage {
            Some(stage_node_id) => {
                edges.push(GraphEdge {
                    source: id.clone(),
                    target: NodeId::for_record(NodeKind::Stage, stage_node_id),
                });
                NodeShape::TicketCompact
            }
            None => NodeShape::TicketCard,
        };
        nodes.push(GraphNode {
            position: placer.place(&id, item.position),
            id,
            record_id: item.ticket_id,
            shape,
            label: item.title.clone(),
            progress: None,
            stage_progress: None,
            stage: None,
        });
    }

    debug!(
        "event=graph_build module=graph status=ok nodes={} edges={} random_placements={}",
        nodes.len(),
        edges.len(),
        placer.random_placements
    );

    SkillGraph::new(nodes, edges)
}

struct Placer<'a, R: Rng + ?Sized> {
    stored: &'a BTreeMap<NodeId, Position>,
    layout: &'a LayoutConfig,
    rng: &'a mut R,
    random_placements: usize,
}

impl<R: Rng + ?Sized> Placer<'_, R> {
    fn place(&mut self, id: &NodeId, record_position: Option<Position>) -> Position {
        if let Some(position) = self.stored.get(id).filter(|p| p.is_finite()) {
            return *position;
        }
        if let Some(position) = record_position.filter(Position::is_finite) {
            return position;
        }

        self.random_placements += 1;
        let x: f64 = self.rng.gen();
        let y: f64 = self.rng.gen();
        Position::new(
            x * self.layout.fallback_width.max(0.0),
            y * self.layout.fallback_height.max(0.0),
        )
    }
}
