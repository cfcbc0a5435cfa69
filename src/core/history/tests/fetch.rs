use std::sync::Arc;
use std::time::Duration;

use super::fixtures::{FakeSource, INSTANCE, Leaf, leave_request};
use crate::core::config::LabelConfig;
use crate::core::history::{FetchPolicy, HistoryError, fetch_branches};

fn policy(timeout_ms: u64) -> FetchPolicy {
    FetchPolicy {
        timeout: Duration::from_millis(timeout_ms),
        comment_kind: "comment".to_string(),
    }
}

#[tokio::test]
async fn both_branches_are_populated() {
    let source = Arc::new(leave_request());

    let branches = fetch_branches(source, INSTANCE, &policy(1000), &LabelConfig::default())
        .await
        .unwrap();

    assert_eq!(branches.activity.len(), 2);
    assert_eq!(branches.task.len(), 2);
    assert_eq!(branches.task[0].comments, vec!["Family trip"]);
    assert_eq!(
        branches.task[1].comments,
        vec!["Enjoy the break", "Cover arranged"]
    );
    assert_eq!(branches.task[1].status_label.as_deref(), Some("approved"));
}

#[tokio::test]
async fn comments_are_requested_for_every_task_id() {
    let source = leave_request();
    let requests = source.comment_requests.clone();

    fetch_branches(
        Arc::new(source),
        INSTANCE,
        &policy(1000),
        &LabelConfig::default(),
    )
    .await
    .unwrap();

    let seen = requests.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], vec!["t-1".to_string(), "t-2".to_string()]);
}

#[tokio::test]
async fn comments_are_skipped_without_tasks() {
    let mut source = leave_request();
    source.tasks.clear();
    let requests = source.comment_requests.clone();

    let branches = fetch_branches(
        Arc::new(source),
        INSTANCE,
        &policy(1000),
        &LabelConfig::default(),
    )
    .await
    .unwrap();

    assert!(branches.task.is_empty());
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_comment_fetch_degrades_to_no_comments() {
    let source = leave_request().failing(Leaf::Comments);

    let branches = fetch_branches(
        Arc::new(source),
        INSTANCE,
        &policy(1000),
        &LabelConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(branches.task.len(), 2);
    assert!(branches.task.iter().all(|e| e.comments.is_empty()));
    assert_eq!(branches.task[0].status_label.as_deref(), Some("submitted"));
    assert_eq!(branches.activity.len(), 2);
}

#[tokio::test]
async fn failed_status_fetch_leaves_labels_unset() {
    let source = leave_request().failing(Leaf::Statuses);

    let branches = fetch_branches(
        Arc::new(source),
        INSTANCE,
        &policy(1000),
        &LabelConfig::default(),
    )
    .await
    .unwrap();

    assert!(branches.task.iter().all(|e| e.status_label.is_none()));
    assert_eq!(branches.task[1].comments.len(), 2);
}

#[tokio::test]
async fn failed_activity_log_empties_only_that_branch() {
    let source = leave_request().failing(Leaf::Activities);

    let branches = fetch_branches(
        Arc::new(source),
        INSTANCE,
        &policy(1000),
        &LabelConfig::default(),
    )
    .await
    .unwrap();

    assert!(branches.activity.is_empty());
    assert_eq!(branches.task.len(), 2);
}

#[tokio::test]
async fn slow_task_log_times_out_to_empty() {
    let source = leave_request().slow(Leaf::Tasks);

    let branches = fetch_branches(
        Arc::new(source),
        INSTANCE,
        &policy(50),
        &LabelConfig::default(),
    )
    .await
    .unwrap();

    assert!(branches.task.is_empty());
    assert_eq!(branches.activity.len(), 2);
}

#[tokio::test]
async fn panicking_branch_is_a_composition_error() {
    let source = leave_request().panicking(Leaf::Activities);

    let err = fetch_branches(
        Arc::new(source),
        INSTANCE,
        &policy(1000),
        &LabelConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, HistoryError::Composition(_)));
    assert!(err.to_string().contains("activity branch"));
}

#[tokio::test]
async fn empty_source_yields_empty_branches() {
    let branches = fetch_branches(
        Arc::new(FakeSource::default()),
        INSTANCE,
        &policy(1000),
        &LabelConfig::default(),
    )
    .await
    .unwrap();

    assert!(branches.activity.is_empty());
    assert!(branches.task.is_empty());
}
