//! Weighted rubric scoring.

use crate::model::rubric::{Criterion, CriterionScore};
use std::collections::BTreeMap;

/// Progress value; nominally 0..=100 but not clamped above.
pub type Progress = u32;

/// Computes `round(100 * sum(achieved) / sum(weight))`.
///
/// Criteria never touched by `scores` count as 0. An empty rubric (or one
/// whose weights sum to 0) yields 0. Scores above a criterion's weight are
/// kept as-is; clamping is a caller policy.
pub fn compute_progress(scores: &BTreeMap<String, f64>, criteria: &[Criterion]) -> Progress {
    let total_weight: f64 = criteria.iter().map(|c| c.weight).sum();
    if total_weight <= 0.0 {
        return 0;
    }

    let achieved: f64 = criteria
        .iter()
        .map(|c| scores.get(&c.criterion_id).copied().unwrap_or(0.0))
        .sum();

    // Saturating cast: negative or NaN ratios land on 0.
    let ratio = 100.0 * achieved / total_weight;
    ratio.round() as Progress
}

/// Convenience over [`compute_progress`] for aggregator output.
pub fn compute_progress_from_scores(scores: &[CriterionScore], criteria: &[Criterion]) -> Progress {
    let by_id = scores
        .iter()
        .map(|entry| (entry.criterion_id.clone(), entry.score))
        .collect::<BTreeMap<_, _>>();
    compute_progress(&by_id, criteria)
}
