//! Merges criterion contributions from linked work items.

use crate::model::records::{TicketId, WorkItem};
use crate::model::rubric::CriterionScore;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    total: f64,
    count: u32,
}

/// Averages per-criterion scores across the linked work items.
///
/// - Ids that resolve to no work item are skipped (deleted or not loaded).
/// - A ticket id listed more than once contributes once.
/// - Each distinct criterion yields `round(total / count)`, an unweighted
///   mean across contributions.
/// - Output is sorted by `criterion_id` ascending.
pub fn aggregate(linked_ids: &[TicketId], all_work_items: &[WorkItem]) -> Vec<CriterionScore> {
    let by_id: HashMap<TicketId, &WorkItem> = all_work_items
        .iter()
        .map(|item| (item.ticket_id, item))
        .collect();
    let unique_ids: BTreeSet<TicketId> = linked_ids.iter().copied().collect();

    let mut accumulated: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for ticket_id in unique_ids {
        let Some(item) = by_id.get(&ticket_id) else {
            continue;
        };
        for contribution in &item.criterion_scores {
            let entry = accumulated
                .entry(contribution.criterion_id.as_str())
                .or_default();
            entry.total += contribution.score;
            entry.count += 1;
        }
    }

    accumulated
        .into_iter()
        .map(|(criterion_id, acc)| {
            let mean = acc.total / f64::from(acc.count);
            CriterionScore::new(criterion_id, mean.round())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::aggregate;
    use crate::model::records::WorkItem;
    use uuid::Uuid;

    #[test]
    fn duplicate_links_count_once() {
        let a = WorkItem::new(Uuid::new_v4(), "a").with_score("c", 80);
        let b = WorkItem::new(Uuid::new_v4(), "b").with_score("c", 40);
        let linked = vec![a.ticket_id, a.ticket_id, b.ticket_id];

        let merged = aggregate(&linked, &[a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].score, 60.0);
    }

    #[test]
    fn mean_rounds_to_nearest() {
        let a = WorkItem::new(Uuid::new_v4(), "a").with_score("c", 1);
        let b = WorkItem::new(Uuid::new_v4(), "b").with_score("c", 2);
        let merged = aggregate(&[a.ticket_id, b.ticket_id], &[a, b]);
        // 1.5 rounds away from zero
        assert_eq!(merged[0].score, 2.0);
    }
}
