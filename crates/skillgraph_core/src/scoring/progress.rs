//! Stage, skill, and objective progress derivation.

use crate::model::records::{GraphRecords, Objective, Skill, StageNodeId, TicketId, WorkItem};
use crate::model::rubric::Rubric;
use crate::model::stage::Stage;
use crate::scoring::aggregate::aggregate;
use crate::scoring::rubric::{compute_progress_from_scores, Progress};
use std::collections::BTreeMap;

/// Per-stage progress, always keyed by all five canonical stages.
pub type StageProgress = BTreeMap<Stage, Progress>;

/// Recomputes `stage_progress` for one skill.
///
/// Tickets linked to any stage node of `skill` for a given stage count toward
/// that stage. Stages without a rubric or without linked tickets score 0.
pub fn stage_progress(skill: &Skill, records: &GraphRecords) -> StageProgress {
    let empty = Rubric::empty();
    let stage_nodes = records.stage_nodes_for_skill(skill.skill_id);

    Stage::ALL
        .iter()
        .map(|&stage| {
            let linked = stage_nodes
                .iter()
                .filter(|node| node.stage == stage)
                .flat_map(|node| records.tickets_for_stage(node.stage_node_id))
                .collect::<Vec<_>>();
            let rubric = skill.rubric(stage).unwrap_or(&empty);
            (stage, progress_for(&linked, &records.work_items, rubric))
        })
        .collect()
}

/// Progress of a single stage node against its skill's stage rubric.
pub fn stage_node_progress(
    stage_node_id: StageNodeId,
    rubric: &Rubric,
    records: &GraphRecords,
) -> Progress {
    let linked = records.tickets_for_stage(stage_node_id);
    progress_for(&linked, &records.work_items, rubric)
}

/// Mean of all five stage values, reached or not.
pub fn overall_skill_progress(stage_progress: &StageProgress) -> Progress {
    let total: u64 = Stage::ALL
        .iter()
        .map(|stage| u64::from(stage_progress.get(stage).copied().unwrap_or(0)))
        .sum();
    (total as f64 / Stage::ALL.len() as f64).round() as Progress
}

/// Progress of one objective from its linked ticket set.
pub fn objective_progress(objective: &Objective, work_items: &[WorkItem]) -> Progress {
    progress_for(&objective.linked_ticket_ids, work_items, &objective.rubric)
}

fn progress_for(linked: &[TicketId], work_items: &[WorkItem], rubric: &Rubric) -> Progress {
    if rubric.is_empty() {
        return 0;
    }
    let merged = aggregate(linked, work_items);
    compute_progress_from_scores(&merged, rubric.criteria())
}
