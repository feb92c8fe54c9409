//! Topological sequencer with dynamic urgency ordering.
//!
//! Kahn's algorithm over the prerequisite DAG, re-sorting the ready queue
//! on every pop so that due and weak topics surface first without ever
//! violating dependency order. Only in-degree-zero nodes are candidates,
//! so the urgency comparator cannot break topological validity.

use crate::mastery::{is_due, mastery_rank};
use crate::{SequencingInput, TopicId};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Produce the learning order for the given nodes.
///
/// The ready queue is ordered by, in priority:
/// 1. due flag descending (due topics first)
/// 2. mastery rank ascending (unstarted/weak before mastered)
/// 3. position in `base_order` ascending (stable fallback)
///
/// Total function: if the graph cannot fully drain (a cycle), the input
/// node order is returned unchanged. Callers always get a renderable
/// order, never an error.
pub fn sequence(input: &SequencingInput, now: DateTime<Utc>) -> Vec<TopicId> {
    let node_set: HashSet<&TopicId> = input.nodes.iter().collect();

    let base_index: HashMap<&TopicId, usize> = input
        .base_order
        .iter()
        .enumerate()
        .map(|(i, id)| (id, i))
        .collect();

    let mut indegree: HashMap<&TopicId, usize> =
        input.nodes.iter().map(|id| (id, 0)).collect();
    let mut next: HashMap<&TopicId, Vec<&TopicId>> =
        input.nodes.iter().map(|id| (id, Vec::new())).collect();

    for edge in &input.edges {
        if !node_set.contains(&edge.from) || !node_set.contains(&edge.to) {
            continue;
        }
        // Resolve to the canonical references keyed in the maps
        let from = *node_set.get(&edge.from).unwrap_or(&&edge.from);
        let to = *node_set.get(&edge.to).unwrap_or(&&edge.to);
        next.entry(from).or_default().push(to);
        *indegree.entry(to).or_insert(0) += 1;
    }

    let mut queue: Vec<&TopicId> = input
        .nodes
        .iter()
        .filter(|id| indegree.get(id).copied().unwrap_or(0) == 0)
        .collect();

    let urgency = |id: &TopicId| {
        let record = input.mastery.get(id);
        (
            !is_due(record, now), // false sorts first → due wins
            mastery_rank(record),
            base_index.get(id).copied().unwrap_or(0),
        )
    };

    let mut ordered: Vec<TopicId> = Vec::with_capacity(input.nodes.len());
    while !queue.is_empty() {
        // Re-rank on every pop: mastery of newly unlocked nodes matters now
        queue.sort_by_key(|id| urgency(id));
        let id = queue.remove(0);
        ordered.push(id.clone());

        if let Some(dependents) = next.get(id) {
            for &to in dependents {
                let d = indegree.entry(to).or_insert(0);
                *d = d.saturating_sub(1);
                if *d == 0 {
                    queue.push(to);
                }
            }
        }
    }

    if ordered.len() != input.nodes.len() {
        tracing::warn!(
            "Prerequisite graph did not drain ({} of {} nodes ordered); \
             falling back to base order",
            ordered.len(),
            input.nodes.len()
        );
        return input.nodes.clone();
    }

    ordered
}
