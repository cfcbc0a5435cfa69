use super::types::{
    ActivityKind, ActivityRecord, CommentEntry, EntryOrigin, HistoryEntry, TaskRecord, TaskStatus,
};
use crate::core::config::LabelConfig;

/// Synthetic process-start / process-end entries from the activity log.
///
/// Only start and end events produce entries; every other activity kind is
/// represented by the task branch or not at all.
pub fn activity_entries(
    instance_id: &str,
    activities: &[ActivityRecord],
    labels: &LabelConfig,
) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = activities
        .iter()
        .filter_map(|activity| {
            let (task_name, status) = match &activity.kind {
                ActivityKind::StartEvent => (&labels.start_task_name, &labels.start_status),
                ActivityKind::EndEvent => (&labels.end_task_name, &labels.end_status),
                ActivityKind::UserTask | ActivityKind::Other(_) => return None,
            };
            Some(HistoryEntry {
                process_instance_id: instance_id.to_string(),
                task_name: task_name.clone(),
                start_time: activity.start_time,
                end_time: activity.end_time,
                duration_ms: activity.duration_ms,
                assignee: activity.assignee.clone(),
                due_date: None,
                status_label: Some(status.clone()),
                comments: Vec::new(),
                origin: EntryOrigin::Activity,
            })
        })
        .collect();
    sort_by_start(&mut entries);
    entries
}

/// One entry per task, joined with its status (by definition key, first
/// match wins) and its comments (by task id, in fetch order).
pub fn task_entries(
    instance_id: &str,
    tasks: &[TaskRecord],
    statuses: &[TaskStatus],
    comments: &[CommentEntry],
) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = tasks
        .iter()
        .map(|task| {
            let status_label = statuses
                .iter()
                .find(|s| s.task_definition_key == task.task_definition_key)
                .map(|s| s.status_label.clone());
            let comments = comments
                .iter()
                .filter(|c| c.task_id == task.task_id)
                .map(|c| c.message.clone())
                .collect();
            HistoryEntry {
                process_instance_id: instance_id.to_string(),
                task_name: task.name.clone(),
                start_time: task.start_time,
                end_time: task.end_time,
                duration_ms: task.duration_ms,
                assignee: task.assignee.clone(),
                due_date: task.due_date,
                status_label,
                comments,
                origin: EntryOrigin::Task,
            }
        })
        .collect();
    sort_by_start(&mut entries);
    entries
}

/// Combine both branches into one timeline ordered by start time.
///
/// Activity entries are placed first and the sort is stable, so on equal
/// start times they stay ahead of task entries. Nothing is deduplicated.
pub fn merge_timelines(
    mut activity: Vec<HistoryEntry>,
    task: Vec<HistoryEntry>,
) -> Vec<HistoryEntry> {
    activity.extend(task);
    sort_by_start(&mut activity);
    activity
}

fn sort_by_start(entries: &mut [HistoryEntry]) {
    entries.sort_by_key(|e| e.start_time);
}
