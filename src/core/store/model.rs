use anyhow::Result;
use async_trait::async_trait;
use rusqlite::{OptionalExtension, params};
use std::collections::BTreeSet;
use tracing::debug;

use super::SqliteHistoryStore;
use crate::core::highlight::ProcessGraph;
use crate::core::history::source::ModelSource;

#[async_trait]
impl ModelSource for SqliteHistoryStore {
    async fn process_graph(&self, definition_id: &str) -> Result<Option<ProcessGraph>> {
        let definition_id = definition_id.to_string();
        self.with_db(move |db| {
            let known: Option<String> = db
                .query_row(
                    "SELECT definition_id FROM process_definitions WHERE definition_id = ?1",
                    params![definition_id],
                    |row| row.get(0),
                )
                .optional()?;
            if known.is_none() {
                return Ok(None);
            }

            let mut graph = ProcessGraph::new();

            let mut stmt = db.prepare(
                "SELECT node_id, name FROM process_nodes WHERE definition_id = ?1 ORDER BY rowid ASC",
            )?;
            let nodes = stmt.query_map(params![definition_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
            })?;
            for node in nodes {
                let (id, name) = node?;
                graph.add_node(id, name);
            }

            let mut stmt = db.prepare(
                "SELECT edge_id, source_id, target_id FROM process_edges
                 WHERE definition_id = ?1 ORDER BY position ASC, rowid ASC",
            )?;
            let edges = stmt.query_map(params![definition_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?;
            for edge in edges {
                let (edge_id, source, target) = edge?;
                graph.add_edge(edge_id, source, target);
            }

            debug!(
                "Loaded process graph {} ({} nodes, {} flows)",
                definition_id,
                graph.nodes().count(),
                graph.edges().count()
            );
            Ok(Some(graph))
        })
        .await
    }

    async fn live_node_ids(&self, instance_id: &str) -> Result<BTreeSet<String>> {
        let instance_id = instance_id.to_string();
        self.with_db(move |db| {
            let mut stmt = db.prepare(
                "SELECT DISTINCT activity_id FROM executions
                 WHERE instance_id = ?1 AND is_active = 1 AND activity_id IS NOT NULL",
            )?;
            let rows = stmt.query_map(params![instance_id], |row| row.get::<_, String>(0))?;

            let mut results = BTreeSet::new();
            for row in rows {
                results.insert(row?);
            }
            Ok(results)
        })
        .await
    }
}
