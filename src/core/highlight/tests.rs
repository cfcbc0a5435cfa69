use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{InstantTolerance, ProcessGraph, highlight_path};
use crate::core::history::types::{ActivityKind, ActivityRecord};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn at(id: &str, kind: ActivityKind, secs: i64) -> ActivityRecord {
    at_millis(id, kind, secs * 1000)
}

fn at_millis(id: &str, kind: ActivityKind, millis: i64) -> ActivityRecord {
    ActivityRecord {
        activity_id: id.to_string(),
        activity_name: None,
        kind,
        start_time: base() + Duration::milliseconds(millis),
        end_time: None,
        duration_ms: None,
        assignee: None,
    }
}

fn other() -> ActivityKind {
    ActivityKind::Other("serviceTask".to_string())
}

fn edge_ids(result: &super::HighlightResult) -> Vec<&str> {
    result
        .highlighted_edge_ids
        .iter()
        .map(String::as_str)
        .collect()
}

#[test]
fn fork_cluster_highlights_every_parallel_branch() {
    let log = vec![
        at("A", other(), 10),
        at("B", other(), 20),
        at("C", ActivityKind::UserTask, 20),
        at("D", ActivityKind::UserTask, 20),
        at("E", other(), 30),
    ];
    let mut graph = ProcessGraph::new();
    graph.add_edge("A-B", "A", "B");
    graph.add_edge("A-C", "A", "C");
    graph.add_edge("A-D", "A", "D");
    graph.add_edge("A-E", "A", "E");

    let result = highlight_path(&log, &graph, InstantTolerance::default());

    assert_eq!(edge_ids(&result), vec!["A-B", "A-C", "A-D"]);
    assert!(!result.highlighted_edge_ids.contains("A-E"));
}

#[test]
fn sequential_log_highlights_consecutive_pairs_only() {
    let log = vec![
        at("start", ActivityKind::StartEvent, 0),
        at("fill", ActivityKind::UserTask, 5),
        at("check", other(), 9),
        at("end", ActivityKind::EndEvent, 12),
    ];
    let mut graph = ProcessGraph::new();
    graph.add_edge("f1", "start", "fill");
    graph.add_edge("f2", "fill", "check");
    graph.add_edge("f3", "check", "end");
    graph.add_edge("f4", "check", "fill");
    graph.add_edge("f5", "start", "end");

    let result = highlight_path(&log, &graph, InstantTolerance::default());

    assert_eq!(edge_ids(&result), vec!["f1", "f2", "f3"]);
}

#[test]
fn repeated_node_is_highlighted_once() {
    let log = vec![
        at("start", ActivityKind::StartEvent, 0),
        at("review", ActivityKind::UserTask, 2),
        at("decide", other(), 4),
        at("review", ActivityKind::UserTask, 6),
        at("decide", other(), 8),
        at("end", ActivityKind::EndEvent, 9),
    ];
    let mut graph = ProcessGraph::new();
    graph.add_edge("f1", "start", "review");
    graph.add_edge("f2", "review", "decide");
    graph.add_edge("back", "decide", "review");
    graph.add_edge("done", "decide", "end");

    let result = highlight_path(&log, &graph, InstantTolerance::default());

    assert_eq!(result.highlighted_node_ids.len(), 4);
    assert!(result.highlighted_node_ids.contains("review"));
    assert_eq!(edge_ids(&result), vec!["back", "done", "f1", "f2"]);
}

#[test]
fn same_instant_user_tasks_form_one_successor_position() {
    // B and C are both user tasks started together; from B the next real hop
    // is D, not C.
    let log = vec![
        at("B", ActivityKind::UserTask, 10),
        at("C", ActivityKind::UserTask, 10),
        at("D", other(), 20),
    ];
    let mut graph = ProcessGraph::new();
    graph.add_edge("B-C", "B", "C");
    graph.add_edge("B-D", "B", "D");
    graph.add_edge("C-D", "C", "D");

    let result = highlight_path(&log, &graph, InstantTolerance::default());

    assert!(result.highlighted_edge_ids.contains("B-D"));
    assert!(!result.highlighted_edge_ids.contains("B-C"));
    assert!(result.highlighted_edge_ids.contains("C-D"));
}

#[test]
fn user_task_followed_by_same_instant_non_task_is_a_real_hop() {
    let log = vec![
        at("approve", ActivityKind::UserTask, 10),
        at("notify", other(), 10),
    ];
    let mut graph = ProcessGraph::new();
    graph.add_edge("f1", "approve", "notify");

    let result = highlight_path(&log, &graph, InstantTolerance::default());

    assert_eq!(edge_ids(&result), vec!["f1"]);
}

#[test]
fn sub_second_jitter_is_absorbed_by_default_tolerance() {
    let log = vec![
        at_millis("fork", other(), 1_000),
        at_millis("left", other(), 3_010),
        at_millis("right", other(), 3_870),
    ];
    let mut graph = ProcessGraph::new();
    graph.add_edge("to-left", "fork", "left");
    graph.add_edge("to-right", "fork", "right");

    let result = highlight_path(&log, &graph, InstantTolerance::default());
    assert_eq!(edge_ids(&result), vec!["to-left", "to-right"]);

    let strict = highlight_path(&log, &graph, InstantTolerance::from_millis(1));
    assert_eq!(edge_ids(&strict), vec!["to-left"]);
}

#[test]
fn wider_tolerance_clusters_activities_seconds_apart() {
    let log = vec![
        at("fork", other(), 0),
        at("left", other(), 21),
        at("right", other(), 24),
    ];
    let mut graph = ProcessGraph::new();
    graph.add_edge("to-left", "fork", "left");
    graph.add_edge("to-right", "fork", "right");

    let one_second = highlight_path(&log, &graph, InstantTolerance::default());
    assert_eq!(edge_ids(&one_second), vec!["to-left"]);

    let ten_seconds = highlight_path(&log, &graph, InstantTolerance::from_millis(10_000));
    assert_eq!(edge_ids(&ten_seconds), vec!["to-left", "to-right"]);
}

#[test]
fn activities_missing_from_graph_still_count_as_nodes() {
    let log = vec![
        at("start", ActivityKind::StartEvent, 0),
        at("ghost", other(), 1),
        at("end", ActivityKind::EndEvent, 2),
    ];
    let mut graph = ProcessGraph::new();
    graph.add_edge("f1", "start", "ghost");

    let result = highlight_path(&log, &graph, InstantTolerance::default());

    assert!(result.highlighted_node_ids.contains("ghost"));
    assert!(result.highlighted_node_ids.contains("end"));
    assert_eq!(edge_ids(&result), vec!["f1"]);
}

#[test]
fn last_activity_never_contributes_edges() {
    let log = vec![
        at("A", other(), 0),
        at("B", ActivityKind::UserTask, 1),
        at("C", ActivityKind::UserTask, 1),
    ];
    let mut graph = ProcessGraph::new();
    graph.add_edge("A-B", "A", "B");
    graph.add_edge("B-C", "B", "C");
    graph.add_edge("C-A", "C", "A");

    let result = highlight_path(&log, &graph, InstantTolerance::default());

    // B's only candidate successor C is absorbed, and C is last.
    assert_eq!(edge_ids(&result), vec!["A-B"]);
}

#[test]
fn empty_and_single_entry_logs() {
    let graph = ProcessGraph::new();
    let empty = highlight_path(&[], &graph, InstantTolerance::default());
    assert!(empty.highlighted_node_ids.is_empty());
    assert!(empty.highlighted_edge_ids.is_empty());

    let single = highlight_path(
        &[at("start", ActivityKind::StartEvent, 0)],
        &graph,
        InstantTolerance::default(),
    );
    assert_eq!(single.highlighted_node_ids.len(), 1);
    assert!(single.highlighted_edge_ids.is_empty());
}

#[test]
fn zero_tolerance_is_clamped() {
    assert_eq!(InstantTolerance::from_millis(0).as_millis(), 1);
    assert_eq!(InstantTolerance::default().as_millis(), 1000);
}
