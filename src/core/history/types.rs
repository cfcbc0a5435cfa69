use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of node an activity instance executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    StartEvent,
    EndEvent,
    UserTask,
    Other(String),
}

impl ActivityKind {
    /// Parse the engine's activity type string (`startEvent`, `userTask`, ...).
    pub fn from_engine_type(value: &str) -> Self {
        match value {
            "startEvent" => ActivityKind::StartEvent,
            "endEvent" => ActivityKind::EndEvent,
            "userTask" => ActivityKind::UserTask,
            other => ActivityKind::Other(other.to_string()),
        }
    }

    pub fn as_engine_type(&self) -> &str {
        match self {
            ActivityKind::StartEvent => "startEvent",
            ActivityKind::EndEvent => "endEvent",
            ActivityKind::UserTask => "userTask",
            ActivityKind::Other(value) => value,
        }
    }

    pub fn is_user_task(&self) -> bool {
        matches!(self, ActivityKind::UserTask)
    }
}

/// One execution of a node in the process graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub activity_id: String,
    pub activity_name: Option<String>,
    pub kind: ActivityKind,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub assignee: Option<String>,
}

/// A human work-item execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: String,
    pub task_definition_key: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub assignee: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Status label recorded against a task definition key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub task_definition_key: String,
    pub status_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentEntry {
    pub task_id: String,
    pub message: String,
}

/// Which fetch branch produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    Activity,
    Task,
}

/// One row of the display history for a process instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub process_instance_id: String,
    pub task_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub assignee: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status_label: Option<String>,
    pub comments: Vec<String>,
    pub origin: EntryOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInstance {
    pub instance_id: String,
    pub definition_id: String,
}
