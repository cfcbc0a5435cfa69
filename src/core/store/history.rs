use anyhow::Result;
use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row, params, params_from_iter};

use super::SqliteHistoryStore;
use crate::core::history::source::HistorySource;
use crate::core::history::types::{
    ActivityKind, ActivityRecord, CommentEntry, ProcessInstance, TaskRecord, TaskStatus,
};

/// Task ids bound per comment query. SQLite caps host parameters per
/// statement (32766 in the bundled build), so long task logs are split.
pub(super) const COMMENT_BATCH: usize = 500;

const TASK_COLUMNS: &str =
    "task_id, task_definition_key, name, start_time, end_time, duration_ms, assignee, due_date";

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<TaskRecord> {
    Ok(TaskRecord {
        task_id: row.get(0)?,
        task_definition_key: row.get(1)?,
        name: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        duration_ms: row.get(5)?,
        assignee: row.get(6)?,
        due_date: row.get(7)?,
    })
}

#[async_trait]
impl HistorySource for SqliteHistoryStore {
    async fn find_instance(&self, instance_id: &str) -> Result<Option<ProcessInstance>> {
        let instance_id = instance_id.to_string();
        self.with_db(move |db| {
            let found = db
                .query_row(
                    "SELECT instance_id, definition_id FROM process_instances WHERE instance_id = ?1",
                    params![instance_id],
                    |row| {
                        Ok(ProcessInstance {
                            instance_id: row.get(0)?,
                            definition_id: row.get(1)?,
                        })
                    },
                )
                .optional()?;
            Ok(found)
        })
        .await
    }

    async fn activity_log(&self, instance_id: &str) -> Result<Vec<ActivityRecord>> {
        let instance_id = instance_id.to_string();
        self.with_db(move |db| {
            let mut stmt = db.prepare(
                "SELECT activity_id, activity_name, activity_type, start_time, end_time, duration_ms, assignee
                 FROM activity_instances WHERE instance_id = ?1 ORDER BY id ASC",
            )?;

            let rows = stmt.query_map(params![instance_id], |row| {
                let kind: String = row.get(2)?;
                Ok(ActivityRecord {
                    activity_id: row.get(0)?,
                    activity_name: row.get(1)?,
                    kind: ActivityKind::from_engine_type(&kind),
                    start_time: row.get(3)?,
                    end_time: row.get(4)?,
                    duration_ms: row.get(5)?,
                    assignee: row.get(6)?,
                })
            })?;

            let mut results = Vec::new();
            for row in rows {
                results.push(row?);
            }
            Ok(results)
        })
        .await
    }

    async fn task_log(&self, instance_id: &str) -> Result<Vec<TaskRecord>> {
        let instance_id = instance_id.to_string();
        self.with_db(move |db| {
            let sql = format!(
                "SELECT {} FROM task_instances WHERE instance_id = ?1 ORDER BY task_id ASC",
                TASK_COLUMNS
            );
            let mut stmt = db.prepare(&sql)?;
            let rows = stmt.query_map(params![instance_id], task_from_row)?;

            let mut results = Vec::new();
            for row in rows {
                results.push(row?);
            }
            Ok(results)
        })
        .await
    }

    async fn task_statuses(&self, instance_id: &str) -> Result<Vec<TaskStatus>> {
        let instance_id = instance_id.to_string();
        self.with_db(move |db| {
            let mut stmt = db.prepare(
                "SELECT task_definition_key, status_label FROM task_statuses
                 WHERE instance_id = ?1 ORDER BY id ASC",
            )?;

            let rows = stmt.query_map(params![instance_id], |row| {
                Ok(TaskStatus {
                    task_definition_key: row.get(0)?,
                    status_label: row.get(1)?,
                })
            })?;

            let mut results = Vec::new();
            for row in rows {
                results.push(row?);
            }
            Ok(results)
        })
        .await
    }

    async fn comments(&self, task_ids: &[String], kind: &str) -> Result<Vec<CommentEntry>> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }
        let task_ids = task_ids.to_vec();
        let kind = kind.to_string();
        self.with_db(move |db| {
            let mut found: Vec<(i64, CommentEntry)> = Vec::new();
            for batch in task_ids.chunks(COMMENT_BATCH) {
                // ?1 is the kind; task ids follow from ?2.
                let placeholders = (0..batch.len())
                    .map(|i| format!("?{}", i + 2))
                    .collect::<Vec<_>>()
                    .join(", ");
                let sql = format!(
                    "SELECT id, task_id, message FROM comments
                     WHERE kind = ?1 AND task_id IN ({})",
                    placeholders
                );

                let mut stmt = db.prepare(&sql)?;
                let values =
                    std::iter::once(kind.as_str()).chain(batch.iter().map(String::as_str));
                let rows = stmt.query_map(params_from_iter(values), |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        CommentEntry {
                            task_id: row.get(1)?,
                            message: row.get(2)?,
                        },
                    ))
                })?;
                for row in rows {
                    found.push(row?);
                }
            }

            found.sort_by_key(|(id, _)| *id);
            Ok(found.into_iter().map(|(_, comment)| comment).collect())
        })
        .await
    }

    async fn tasks_by_assignee(&self, assignee: &str) -> Result<Vec<TaskRecord>> {
        let assignee = assignee.to_string();
        self.with_db(move |db| {
            let sql = format!(
                "SELECT {} FROM task_instances WHERE assignee = ?1 ORDER BY task_id ASC",
                TASK_COLUMNS
            );
            let mut stmt = db.prepare(&sql)?;
            let rows = stmt.query_map(params![assignee], task_from_row)?;

            let mut results = Vec::new();
            for row in rows {
                results.push(row?);
            }
            Ok(results)
        })
        .await
    }

    async fn task_by_id(&self, task_id: &str) -> Result<Option<TaskRecord>> {
        let task_id = task_id.to_string();
        self.with_db(move |db| {
            let sql = format!("SELECT {} FROM task_instances WHERE task_id = ?1", TASK_COLUMNS);
            let found = db
                .query_row(&sql, params![task_id], task_from_row)
                .optional()?;
            Ok(found)
        })
        .await
    }
}
