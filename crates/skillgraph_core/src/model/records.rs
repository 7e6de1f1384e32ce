//! Backing records handed in by the surrounding application.
//!
//! # Responsibility
//! - Mirror the skill/objective/stage/ticket shapes fetched by the app.
//! - Carry persisted positions when the layout layer already has them.
//!
//! # Invariants
//! - A work item links to at most one stage node via `stage_node_id`.
//! - `Skill::rubrics` holds at most one rubric per stage.
//! - Progress is never stored here; it is recomputed per render pass.

use crate::model::node::Position;
use crate::model::rubric::{CriterionScore, Rubric};
use crate::model::stage::Stage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub type SkillId = Uuid;
pub type StageNodeId = Uuid;
pub type TicketId = Uuid;
pub type ObjectiveId = Uuid;

/// Unit of work (ticket) carrying criterion score contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub ticket_id: TicketId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub criterion_scores: Vec<CriterionScore>,
    /// Stage node this ticket contributes to, if any.
    #[serde(default)]
    pub stage_node_id: Option<StageNodeId>,
    #[serde(default)]
    pub position: Option<Position>,
}

impl WorkItem {
    pub fn new(ticket_id: TicketId, title: impl Into<String>) -> Self {
        Self {
            ticket_id,
            title: title.into(),
            criterion_scores: Vec::new(),
            stage_node_id: None,
            position: None,
        }
    }

    pub fn with_score(mut self, criterion_id: impl Into<String>, score: impl Into<f64>) -> Self {
        self.criterion_scores
            .push(CriterionScore::new(criterion_id, score));
        self
    }

    pub fn linked_to_stage(mut self, stage_node_id: StageNodeId) -> Self {
        self.stage_node_id = Some(stage_node_id);
        self
    }
}

/// Skill with one rubric per stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub skill_id: SkillId,
    #[serde(default)]
    pub name: String,
    pub current_stage: Stage,
    #[serde(default)]
    pub rubrics: BTreeMap<Stage, Rubric>,
    #[serde(default)]
    pub position: Option<Position>,
}

impl Skill {
    pub fn new(skill_id: SkillId, name: impl Into<String>, current_stage: Stage) -> Self {
        Self {
            skill_id,
            name: name.into(),
            current_stage,
            rubrics: BTreeMap::new(),
            position: None,
        }
    }

    pub fn with_rubric(mut self, stage: Stage, rubric: Rubric) -> Self {
        self.rubrics.insert(stage, rubric);
        self
    }

    /// Rubric for `stage`; stages without one score against an empty rubric.
    pub fn rubric(&self, stage: Stage) -> Option<&Rubric> {
        self.rubrics.get(&stage)
    }
}

/// Graph node representing one stage of one skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageNodeRecord {
    pub stage_node_id: StageNodeId,
    pub skill_id: SkillId,
    pub stage: Stage,
    #[serde(default)]
    pub position: Option<Position>,
}

impl StageNodeRecord {
    pub fn new(stage_node_id: StageNodeId, skill_id: SkillId, stage: Stage) -> Self {
        Self {
            stage_node_id,
            skill_id,
            stage,
            position: None,
        }
    }
}

/// Single-stage goal scored by one rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub objective_id: ObjectiveId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub rubric: Rubric,
    #[serde(default)]
    pub linked_ticket_ids: Vec<TicketId>,
    /// Set by the application's achievement policy, never by this engine.
    #[serde(default)]
    pub is_achieved: bool,
    #[serde(default)]
    pub position: Option<Position>,
}

impl Objective {
    pub fn new(objective_id: ObjectiveId, title: impl Into<String>, rubric: Rubric) -> Self {
        Self {
            objective_id,
            title: title.into(),
            rubric,
            linked_ticket_ids: Vec::new(),
            is_achieved: false,
            position: None,
        }
    }

    pub fn with_linked_ticket(mut self, ticket_id: TicketId) -> Self {
        self.linked_ticket_ids.push(ticket_id);
        self
    }
}

/// Full record set for one recomputation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphRecords {
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub stage_nodes: Vec<StageNodeRecord>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub work_items: Vec<WorkItem>,
}

impl GraphRecords {
    /// Ids of work items linked to one stage node, in record order.
    pub fn tickets_for_stage(&self, stage_node_id: StageNodeId) -> Vec<TicketId> {
        self.work_items
            .iter()
            .filter(|item| item.stage_node_id == Some(stage_node_id))
            .map(|item| item.ticket_id)
            .collect()
    }

    /// Stage nodes owned by one skill, in record order.
    pub fn stage_nodes_for_skill(&self, skill_id: SkillId) -> Vec<&StageNodeRecord> {
        self.stage_nodes
            .iter()
            .filter(|node| node.skill_id == skill_id)
            .collect()
    }
}
