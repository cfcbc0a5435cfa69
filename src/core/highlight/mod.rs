//! Traversed-path inference for process diagrams.
//!
//! The engine's activity log records which nodes fired and when, never which
//! sequence flow was taken. Edges are recovered by looking at what started
//! right after each activity: every node in the first cluster of activities
//! sharing a start instant is a candidate target of the current node's
//! outgoing flows. Forks show up as such clusters because the engine starts
//! all parallel branches in the same instant.
//!
//! "Same instant" is approximate. Engine timestamps jitter by a few
//! milliseconds between activities started by one gateway, so start times are
//! compared in buckets of [`InstantTolerance`] (one second by default). True
//! fork detection would need gateway metadata from the engine.

mod graph;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use crate::core::history::types::ActivityRecord;

pub use graph::ProcessGraph;

/// Bucket width used to decide whether two activities started together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstantTolerance {
    millis: i64,
}

impl InstantTolerance {
    pub const WHOLE_SECOND: InstantTolerance = InstantTolerance { millis: 1000 };

    /// Zero is treated as one millisecond.
    pub fn from_millis(millis: u64) -> Self {
        Self {
            millis: millis.clamp(1, i64::MAX as u64) as i64,
        }
    }

    pub fn as_millis(&self) -> i64 {
        self.millis
    }

    fn bucket(&self, at: &DateTime<Utc>) -> i64 {
        at.timestamp_millis().div_euclid(self.millis)
    }

    pub fn same_instant(&self, a: &DateTime<Utc>, b: &DateTime<Utc>) -> bool {
        self.bucket(a) == self.bucket(b)
    }
}

impl Default for InstantTolerance {
    fn default() -> Self {
        Self::WHOLE_SECOND
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightResult {
    pub highlighted_node_ids: BTreeSet<String>,
    pub highlighted_edge_ids: BTreeSet<String>,
}

/// Compute the nodes and edges exercised by the activity log.
///
/// `log` must be in the order the engine recorded the activity instances.
pub fn highlight_path(
    log: &[ActivityRecord],
    graph: &ProcessGraph,
    tolerance: InstantTolerance,
) -> HighlightResult {
    let highlighted_node_ids = log.iter().map(|a| a.activity_id.clone()).collect();
    let mut highlighted_edge_ids = BTreeSet::new();

    for i in 0..log.len().saturating_sub(1) {
        let current = &log[i];
        let Some(node) = graph.node(&current.activity_id) else {
            debug!(
                "Activity {} is not part of the process graph, skipping its edges",
                current.activity_id
            );
            continue;
        };

        let Some(successor) = primary_successor(log, i, tolerance) else {
            continue;
        };
        let cluster = same_instant_cluster(log, successor, tolerance);

        for edge in &node.outgoing {
            if cluster.contains(edge.target.as_str()) {
                highlighted_edge_ids.insert(edge.edge_id.clone());
            }
        }
    }

    HighlightResult {
        highlighted_node_ids,
        highlighted_edge_ids,
    }
}

/// Index of the first real successor of `log[current]`.
///
/// A user task that starts in the same instant as the user task before it is
/// not a hop from that task; such runs are absorbed.
fn primary_successor(
    log: &[ActivityRecord],
    current: usize,
    tolerance: InstantTolerance,
) -> Option<usize> {
    let mut previous = &log[current];
    for (k, candidate) in log.iter().enumerate().skip(current + 1) {
        let absorbed = previous.kind.is_user_task()
            && candidate.kind.is_user_task()
            && tolerance.same_instant(&previous.start_time, &candidate.start_time);
        if !absorbed {
            return Some(k);
        }
        previous = candidate;
    }
    None
}

/// Activity ids of the maximal run starting at `start` that shares its instant.
fn same_instant_cluster(
    log: &[ActivityRecord],
    start: usize,
    tolerance: InstantTolerance,
) -> HashSet<&str> {
    let anchor = &log[start].start_time;
    log[start..]
        .iter()
        .take_while(|a| tolerance.same_instant(anchor, &a.start_time))
        .map(|a| a.activity_id.as_str())
        .collect()
}

#[cfg(test)]
mod tests;
