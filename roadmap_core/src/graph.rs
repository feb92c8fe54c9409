//! Prerequisite graph and lock evaluation.
//!
//! Builds adjacency maps from the prerequisite edge list and decides
//! whether a topic is navigable. Locking is advisory gating for the
//! presentation layer; it never affects the sequencer's validity.

use crate::mastery::mastery_rank;
use crate::{MasteryRank, MasteryRecord, PrerequisiteEdge, TopicId};
use std::collections::{HashMap, HashSet};

/// Adjacency view of the prerequisite DAG, restricted to a known node set.
///
/// Edges referencing ids outside the node set are dropped, not reported:
/// curriculum data routinely carries edges into topics a course does not
/// include.
#[derive(Clone, Debug, Default)]
pub struct PrereqGraph {
    prereqs_of: HashMap<TopicId, Vec<TopicId>>,
    dependents_of: HashMap<TopicId, Vec<TopicId>>,
}

impl PrereqGraph {
    /// Build the graph from an edge list, keeping only edges whose both
    /// endpoints are in `nodes`. Duplicate edges collapse to one.
    pub fn build(nodes: &[TopicId], edges: &[PrerequisiteEdge]) -> Self {
        let node_set: HashSet<&TopicId> = nodes.iter().collect();
        let mut graph = PrereqGraph::default();

        for edge in edges {
            if !node_set.contains(&edge.from) || !node_set.contains(&edge.to) {
                continue;
            }
            let prereqs = graph.prereqs_of.entry(edge.to.clone()).or_default();
            if !prereqs.contains(&edge.from) {
                prereqs.push(edge.from.clone());
            }
            let dependents = graph.dependents_of.entry(edge.from.clone()).or_default();
            if !dependents.contains(&edge.to) {
                dependents.push(edge.to.clone());
            }
        }

        graph
    }

    /// Prerequisites of a topic (empty slice if none)
    pub fn prereqs_of(&self, topic_id: &str) -> &[TopicId] {
        self.prereqs_of
            .get(topic_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Topics that depend on this one (empty slice if none)
    pub fn dependents_of(&self, topic_id: &str) -> &[TopicId] {
        self.dependents_of
            .get(topic_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a topic is locked: it has prerequisites and any of them is
    /// unstarted or weak. Topics with no prerequisites are never locked.
    pub fn is_locked(
        &self,
        topic_id: &str,
        progress: &HashMap<TopicId, MasteryRecord>,
    ) -> bool {
        self.prereqs_of(topic_id)
            .iter()
            .any(|pid| mastery_rank(progress.get(pid)) <= MasteryRank::Weak)
    }

    /// All locked topics under the given progress map
    pub fn locked_set(&self, progress: &HashMap<TopicId, MasteryRecord>) -> HashSet<TopicId> {
        self.prereqs_of
            .keys()
            .filter(|id| self.is_locked(id, progress))
            .cloned()
            .collect()
    }
}
