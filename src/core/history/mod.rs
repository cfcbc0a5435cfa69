pub mod error;
mod fetch;
pub mod source;
pub mod timeline;
pub mod types;

use bytes::Bytes;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::config::{HistoryConfig, LabelConfig};
use crate::core::diagram::{DiagramRenderer, DiagramRequest, DiagramStyle, RenderedDiagram};
use crate::core::highlight::{InstantTolerance, highlight_path};

pub use error::HistoryError;
pub use fetch::{FetchPolicy, fetch_branches};
pub use source::{HistorySource, ModelSource};
pub use types::{HistoryEntry, ProcessInstance, TaskRecord};

/// Read-only history and diagram queries for process instances.
pub struct HistoryService {
    history: Arc<dyn HistorySource>,
    models: Arc<dyn ModelSource>,
    renderer: Arc<dyn DiagramRenderer>,
    policy: FetchPolicy,
    labels: LabelConfig,
    tolerance: InstantTolerance,
    style: DiagramStyle,
}

impl HistoryService {
    pub fn new(
        history: Arc<dyn HistorySource>,
        models: Arc<dyn ModelSource>,
        renderer: Arc<dyn DiagramRenderer>,
        config: &HistoryConfig,
    ) -> Self {
        Self {
            history,
            models,
            renderer,
            policy: FetchPolicy {
                timeout: config.fetch_timeout(),
                comment_kind: config.fetch.comment_kind.clone(),
            },
            labels: config.labels.clone(),
            tolerance: config.tolerance(),
            style: config.diagram.clone(),
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.renderer.content_type()
    }

    async fn require_instance(&self, instance_id: &str) -> Result<ProcessInstance, HistoryError> {
        if instance_id.trim().is_empty() {
            warn!("Empty process instance id requested");
            return Err(HistoryError::instance_not_found(instance_id));
        }
        let found = tokio::time::timeout(
            self.policy.timeout,
            self.history.find_instance(instance_id),
        )
        .await
        .map_err(|_| {
            HistoryError::Composition(format!(
                "instance lookup for {} timed out",
                instance_id
            ))
        })?
        .map_err(|e| {
            HistoryError::Composition(format!("instance lookup for {} failed: {}", instance_id, e))
        })?;
        found.ok_or_else(|| HistoryError::instance_not_found(instance_id))
    }

    /// Time-ordered history: process start/end entries merged with task entries.
    pub async fn get_process_history(
        &self,
        instance_id: &str,
    ) -> Result<Vec<HistoryEntry>, HistoryError> {
        self.require_instance(instance_id).await?;
        let branches =
            fetch_branches(self.history.clone(), instance_id, &self.policy, &self.labels).await?;
        let merged = timeline::merge_timelines(branches.activity, branches.task);
        info!(
            "Built history for process instance {} ({} entries)",
            instance_id,
            merged.len()
        );
        Ok(merged)
    }

    /// Diagram of the instance's process with the traversed path highlighted.
    pub async fn get_process_diagram(
        &self,
        instance_id: &str,
    ) -> Result<RenderedDiagram, HistoryError> {
        let instance = self.require_instance(instance_id).await?;
        let timeout = self.policy.timeout;

        let (graph, activities, live) = tokio::join!(
            tokio::time::timeout(timeout, self.models.process_graph(&instance.definition_id)),
            tokio::time::timeout(timeout, self.history.activity_log(instance_id)),
            tokio::time::timeout(timeout, self.models.live_node_ids(instance_id)),
        );

        let graph = match graph {
            Ok(Ok(Some(graph))) => graph,
            Ok(Ok(None)) => return Err(HistoryError::definition_not_found(&instance.definition_id)),
            Ok(Err(e)) => {
                return Err(HistoryError::Composition(format!(
                    "process graph {} could not be loaded: {}",
                    instance.definition_id, e
                )));
            }
            Err(_) => {
                return Err(HistoryError::Composition(format!(
                    "process graph {} timed out",
                    instance.definition_id
                )));
            }
        };
        let activities = match activities {
            Ok(Ok(rows)) => rows,
            Ok(Err(e)) => {
                return Err(HistoryError::Composition(format!(
                    "activity log for {} could not be loaded: {}",
                    instance_id, e
                )));
            }
            Err(_) => {
                return Err(HistoryError::Composition(format!(
                    "activity log for {} timed out",
                    instance_id
                )));
            }
        };
        let live_node_ids = match live {
            Ok(Ok(ids)) => ids,
            Ok(Err(e)) => {
                warn!(
                    "Live executions of {} unavailable ({}), rendering without current position",
                    instance_id, e
                );
                BTreeSet::new()
            }
            Err(_) => {
                warn!(
                    "Live executions of {} timed out, rendering without current position",
                    instance_id
                );
                BTreeSet::new()
            }
        };

        if graph.is_empty() {
            warn!(
                "Process graph {} has no nodes, nothing to highlight",
                instance.definition_id
            );
        }
        let highlight = highlight_path(&activities, &graph, self.tolerance);
        let request = DiagramRequest {
            graph: &graph,
            highlight: &highlight,
            live_node_ids: &live_node_ids,
            style: &self.style,
        };

        let mut buf = Vec::new();
        self.renderer
            .render(&request, &mut buf)
            .map_err(|e| HistoryError::Render(e.to_string()))?;

        info!(
            "Rendered diagram for process instance {} ({} nodes, {} flows highlighted)",
            instance_id,
            highlight.highlighted_node_ids.len(),
            highlight.highlighted_edge_ids.len()
        );
        Ok(RenderedDiagram {
            content_type: self.renderer.content_type(),
            bytes: Bytes::from(buf),
        })
    }

    /// Historic tasks assigned to `assignee`, across all process instances.
    ///
    /// A blank assignee matches nothing. Store failures and timeouts are
    /// `Composition` errors.
    pub async fn tasks_by_assignee(&self, assignee: &str) -> Result<Vec<TaskRecord>, HistoryError> {
        let assignee = assignee.trim();
        if assignee.is_empty() {
            warn!("Empty assignee requested");
            return Ok(Vec::new());
        }
        let tasks = tokio::time::timeout(self.policy.timeout, self.history.tasks_by_assignee(assignee))
            .await
            .map_err(|_| {
                HistoryError::Composition(format!("task lookup for assignee {} timed out", assignee))
            })?
            .map_err(|e| {
                HistoryError::Composition(format!(
                    "task lookup for assignee {} failed: {}",
                    assignee, e
                ))
            })?;
        info!("Found {} tasks assigned to {}", tasks.len(), assignee);
        Ok(tasks)
    }

    /// A single historic task.
    pub async fn task_by_id(&self, task_id: &str) -> Result<TaskRecord, HistoryError> {
        if task_id.trim().is_empty() {
            warn!("Empty task id requested");
            return Err(HistoryError::task_not_found(task_id));
        }
        let found = tokio::time::timeout(self.policy.timeout, self.history.task_by_id(task_id))
            .await
            .map_err(|_| HistoryError::Composition(format!("task lookup for {} timed out", task_id)))?
            .map_err(|e| {
                HistoryError::Composition(format!("task lookup for {} failed: {}", task_id, e))
            })?;
        found.ok_or_else(|| HistoryError::task_not_found(task_id))
    }
}

#[cfg(test)]
mod tests;
