//! SQLite-backed history and model store.
//!
//! The layout mirrors the history tables a workflow engine keeps: one row per
//! process instance, activity instance, task instance, status annotation and
//! comment, plus the definition graph and the live executions. The store only
//! reads; rows are written by whatever exports the engine's history.

mod history;
mod model;

use anyhow::Result;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS process_instances (
        instance_id TEXT PRIMARY KEY,
        definition_id TEXT NOT NULL,
        start_time TEXT,
        end_time TEXT
    )",
    "CREATE TABLE IF NOT EXISTS activity_instances (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        instance_id TEXT NOT NULL,
        activity_id TEXT NOT NULL,
        activity_name TEXT,
        activity_type TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT,
        duration_ms INTEGER,
        assignee TEXT
    )",
    "CREATE TABLE IF NOT EXISTS task_instances (
        task_id TEXT PRIMARY KEY,
        instance_id TEXT NOT NULL,
        task_definition_key TEXT NOT NULL,
        name TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT,
        duration_ms INTEGER,
        assignee TEXT,
        due_date TEXT
    )",
    "CREATE TABLE IF NOT EXISTS task_statuses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        instance_id TEXT NOT NULL,
        task_definition_key TEXT NOT NULL,
        status_label TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        task_id TEXT NOT NULL,
        kind TEXT NOT NULL DEFAULT 'comment',
        message TEXT NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS process_definitions (
        definition_id TEXT PRIMARY KEY,
        name TEXT
    )",
    "CREATE TABLE IF NOT EXISTS process_nodes (
        definition_id TEXT NOT NULL,
        node_id TEXT NOT NULL,
        name TEXT,
        PRIMARY KEY (definition_id, node_id)
    )",
    "CREATE TABLE IF NOT EXISTS process_edges (
        definition_id TEXT NOT NULL,
        edge_id TEXT NOT NULL,
        source_id TEXT NOT NULL,
        target_id TEXT NOT NULL,
        position INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (definition_id, edge_id)
    )",
    "CREATE TABLE IF NOT EXISTS executions (
        execution_id TEXT PRIMARY KEY,
        instance_id TEXT NOT NULL,
        activity_id TEXT,
        is_active INTEGER NOT NULL DEFAULT 1
    )",
    "CREATE INDEX IF NOT EXISTS idx_activity_instances_instance ON activity_instances(instance_id, id)",
    "CREATE INDEX IF NOT EXISTS idx_task_instances_instance ON task_instances(instance_id)",
    "CREATE INDEX IF NOT EXISTS idx_task_statuses_instance ON task_statuses(instance_id, id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_task ON comments(task_id, id)",
    "CREATE INDEX IF NOT EXISTS idx_executions_instance ON executions(instance_id)",
];

pub struct SqliteHistoryStore {
    db: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl SqliteHistoryStore {
    /// Open (creating if needed) the database at `path` and ensure the schema.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await?;
        }

        let db = Connection::open(&path)?;
        for statement in SCHEMA {
            db.execute(statement, [])?;
        }
        info!("Opened history store at {}", path.display());

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `query` against the connection on the blocking pool.
    ///
    /// The caller's future stays cancellable while the query runs, so a
    /// leaf timeout returns on time even when SQLite is slow. A cancelled
    /// query still finishes in the background and holds the connection
    /// until it does.
    async fn with_db<T, F>(&self, query: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let db = self.db.clone().lock_owned().await;
        tokio::task::spawn_blocking(move || query(&db)).await?
    }
}
