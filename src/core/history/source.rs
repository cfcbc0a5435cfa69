use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;

use super::types::{ActivityRecord, CommentEntry, ProcessInstance, TaskRecord, TaskStatus};
use crate::core::highlight::ProcessGraph;

/// Read access to the historic records an engine keeps for a process instance.
///
/// Implementations must be `Send + Sync + 'static` so fetches can run on
/// spawned tasks.
#[async_trait]
pub trait HistorySource: Send + Sync + 'static {
    /// Look up a process instance. `Ok(None)` means it does not exist.
    async fn find_instance(&self, instance_id: &str) -> Result<Option<ProcessInstance>>;

    /// Activity instances, ascending by activity-instance id.
    async fn activity_log(&self, instance_id: &str) -> Result<Vec<ActivityRecord>>;

    /// Task instances, ascending by task id.
    async fn task_log(&self, instance_id: &str) -> Result<Vec<TaskRecord>>;

    async fn task_statuses(&self, instance_id: &str) -> Result<Vec<TaskStatus>>;

    /// Comments of the given `kind` attached to any of `task_ids`.
    async fn comments(&self, task_ids: &[String], kind: &str) -> Result<Vec<CommentEntry>>;

    /// Task instances assigned to `assignee` across all process instances,
    /// ascending by task id.
    async fn tasks_by_assignee(&self, assignee: &str) -> Result<Vec<TaskRecord>>;

    async fn task_by_id(&self, task_id: &str) -> Result<Option<TaskRecord>>;
}

/// Process model and live execution state.
#[async_trait]
pub trait ModelSource: Send + Sync + 'static {
    /// `Ok(None)` means the definition does not exist.
    async fn process_graph(&self, definition_id: &str) -> Result<Option<ProcessGraph>>;

    /// Activity ids where still-running executions of the instance currently sit.
    async fn live_node_ids(&self, instance_id: &str) -> Result<BTreeSet<String>>;
}
