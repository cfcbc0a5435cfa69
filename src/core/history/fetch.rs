//! Concurrent retrieval of everything a history timeline is built from.
//!
//! Two branches run as separate tasks and are joined at the end:
//! - activity branch: the activity log, reduced to process start/end entries
//! - task branch: task log, task statuses and comments; statuses are fetched
//!   alongside the task log, comments only once the task ids are known
//!
//! Leaf fetches degrade: an error or timeout is logged and the leaf yields an
//! empty result. A branch that cannot be joined fails the whole request.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::HistoryError;
use super::source::HistorySource;
use super::timeline;
use super::types::HistoryEntry;
use crate::core::config::LabelConfig;

#[derive(Debug, Clone)]
pub struct FetchPolicy {
    pub timeout: Duration,
    pub comment_kind: String,
}

/// Output of [`fetch_branches`]; each side is sorted by start time.
#[derive(Debug, Clone, Default)]
pub struct HistoryBranches {
    pub activity: Vec<HistoryEntry>,
    pub task: Vec<HistoryEntry>,
}

pub async fn fetch_branches(
    source: Arc<dyn HistorySource>,
    instance_id: &str,
    policy: &FetchPolicy,
    labels: &LabelConfig,
) -> Result<HistoryBranches, HistoryError> {
    let activity_handle = {
        let source = source.clone();
        let instance_id = instance_id.to_string();
        let labels = labels.clone();
        let timeout = policy.timeout;
        tokio::spawn(async move {
            let activities = leaf(
                "activity log",
                &instance_id,
                timeout,
                source.activity_log(&instance_id),
            )
            .await;
            timeline::activity_entries(&instance_id, &activities, &labels)
        })
    };

    let task_handle = {
        let instance_id = instance_id.to_string();
        let policy = policy.clone();
        tokio::spawn(async move { task_branch(source, instance_id, policy).await })
    };

    let (activity, task) = tokio::join!(activity_handle, task_handle);
    let activity = activity.map_err(|e| {
        HistoryError::Composition(format!("activity branch did not complete: {}", e))
    })?;
    let task = task
        .map_err(|e| HistoryError::Composition(format!("task branch did not complete: {}", e)))?;

    debug!(
        "Fetched history for {}: {} activity entries, {} task entries",
        instance_id,
        activity.len(),
        task.len()
    );
    Ok(HistoryBranches { activity, task })
}

async fn task_branch(
    source: Arc<dyn HistorySource>,
    instance_id: String,
    policy: FetchPolicy,
) -> Vec<HistoryEntry> {
    let statuses = leaf(
        "task statuses",
        &instance_id,
        policy.timeout,
        source.task_statuses(&instance_id),
    );

    let tasks_with_comments = async {
        let tasks = leaf(
            "task log",
            &instance_id,
            policy.timeout,
            source.task_log(&instance_id),
        )
        .await;
        if tasks.is_empty() {
            return (tasks, Vec::new());
        }
        let task_ids: Vec<String> = tasks.iter().map(|t| t.task_id.clone()).collect();
        let comments = leaf(
            "comments",
            &instance_id,
            policy.timeout,
            source.comments(&task_ids, &policy.comment_kind),
        )
        .await;
        (tasks, comments)
    };

    let (statuses, (tasks, comments)) = tokio::join!(statuses, tasks_with_comments);
    timeline::task_entries(&instance_id, &tasks, &statuses, &comments)
}

/// Await one fetch under `timeout`; failures become an empty result.
async fn leaf<T, F>(branch: &'static str, instance_id: &str, timeout: Duration, fetch: F) -> Vec<T>
where
    F: Future<Output = anyhow::Result<Vec<T>>>,
{
    let reason = match tokio::time::timeout(timeout, fetch).await {
        Ok(Ok(rows)) => return rows,
        Ok(Err(e)) => e.to_string(),
        Err(_) => format!("timed out after {}ms", timeout.as_millis()),
    };
    let err = HistoryError::LeafFetch { branch, reason };
    warn!(
        "{} (process instance {}), continuing with an empty result",
        err, instance_id
    );
    Vec::new()
}
