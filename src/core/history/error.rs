/// Failures surfaced by the history service.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// One of the independent leaf fetches failed. Absorbed by the fetch
    /// orchestrator; never returned from the service.
    #[error("{branch} fetch failed: {reason}")]
    LeafFetch {
        branch: &'static str,
        reason: String,
    },

    /// The join or merge step could not complete.
    #[error("history composition failed: {0}")]
    Composition(String),

    /// The process instance, its definition graph or a task does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Diagram generation or output failed.
    #[error("diagram generation failed: {0}")]
    Render(String),
}

impl HistoryError {
    pub fn instance_not_found(instance_id: &str) -> Self {
        HistoryError::NotFound(format!("process instance {}", instance_id))
    }

    pub fn definition_not_found(definition_id: &str) -> Self {
        HistoryError::NotFound(format!("process definition {}", definition_id))
    }

    pub fn task_not_found(task_id: &str) -> Self {
        HistoryError::NotFound(format!("task {}", task_id))
    }
}
