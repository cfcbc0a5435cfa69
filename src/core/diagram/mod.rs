mod dot;

use anyhow::Result;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Write;

use crate::core::highlight::{HighlightResult, ProcessGraph};

pub use dot::DotRenderer;

/// Colours and font used when drawing a highlighted diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramStyle {
    pub font: String,
    /// Completed path (highlighted nodes and edges).
    pub completed_color: String,
    /// Nodes where live executions currently sit.
    pub current_color: String,
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            font: "Helvetica".to_string(),
            completed_color: "#2f855a".to_string(),
            current_color: "#c53030".to_string(),
        }
    }
}

/// Everything a renderer needs to draw one instance's diagram.
pub struct DiagramRequest<'a> {
    pub graph: &'a ProcessGraph,
    pub highlight: &'a HighlightResult,
    pub live_node_ids: &'a BTreeSet<String>,
    pub style: &'a DiagramStyle,
}

#[derive(Debug, Clone)]
pub struct RenderedDiagram {
    pub content_type: &'static str,
    pub bytes: Bytes,
}

/// Turns a graph plus highlighted ids into diagram bytes. The bundled
/// renderer is [`DotRenderer`], which writes Graphviz DOT source.
pub trait DiagramRenderer: Send + Sync + 'static {
    /// MIME type of what `render` writes, e.g. `text/vnd.graphviz` for DOT.
    fn content_type(&self) -> &'static str;

    fn render(&self, request: &DiagramRequest<'_>, out: &mut dyn Write) -> Result<()>;
}
