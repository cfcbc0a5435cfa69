use anyhow::Result;
use std::io::Write;

use super::{DiagramRenderer, DiagramRequest};

const IDLE_COLOR: &str = "#a0aec0";

/// Renders the process as Graphviz DOT text. Completed nodes and flows are
/// drawn in the completed colour; live positions are filled with the current
/// colour.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotRenderer;

impl DiagramRenderer for DotRenderer {
    fn content_type(&self) -> &'static str {
        "text/vnd.graphviz"
    }

    fn render(&self, request: &DiagramRequest<'_>, out: &mut dyn Write) -> Result<()> {
        let style = request.style;
        let font = escape_dot(&style.font);

        writeln!(out, "digraph process {{")?;
        writeln!(out, "  rankdir=LR;")?;
        writeln!(out, "  node [fontname=\"{}\", fontsize=10, shape=box, style=rounded];", font)?;
        writeln!(out, "  edge [fontname=\"{}\", fontsize=8];", font)?;
        writeln!(out)?;

        for node in request.graph.nodes() {
            let label = escape_dot(node.name.as_deref().unwrap_or(&node.id));
            let id = escape_dot(&node.id);
            if request.live_node_ids.contains(&node.id) {
                writeln!(
                    out,
                    "  \"{}\" [label=\"{}\" color=\"{}\" style=\"rounded,filled,bold\" fillcolor=\"{}\"];",
                    id,
                    label,
                    escape_dot(&style.current_color),
                    escape_dot(&style.current_color),
                )?;
            } else if request.highlight.highlighted_node_ids.contains(&node.id) {
                writeln!(
                    out,
                    "  \"{}\" [label=\"{}\" color=\"{}\" style=\"rounded,bold\"];",
                    id,
                    label,
                    escape_dot(&style.completed_color),
                )?;
            } else {
                writeln!(
                    out,
                    "  \"{}\" [label=\"{}\" color=\"{}\"];",
                    id, label, IDLE_COLOR
                )?;
            }
        }

        writeln!(out)?;

        for (source, edge) in request.graph.edges() {
            let (color, width) = if request
                .highlight
                .highlighted_edge_ids
                .contains(&edge.edge_id)
            {
                (escape_dot(&style.completed_color), 2)
            } else {
                (IDLE_COLOR.to_string(), 1)
            };
            writeln!(
                out,
                "  \"{}\" -> \"{}\" [id=\"{}\" color=\"{}\" penwidth={}];",
                escape_dot(source),
                escape_dot(&edge.target),
                escape_dot(&edge.edge_id),
                color,
                width,
            )?;
        }

        writeln!(out, "}}")?;
        Ok(())
    }
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagram::DiagramStyle;
    use crate::core::highlight::{HighlightResult, ProcessGraph};
    use std::collections::BTreeSet;

    fn render(graph: &ProcessGraph, highlight: &HighlightResult, live: &[&str]) -> String {
        let live: BTreeSet<String> = live.iter().map(|s| s.to_string()).collect();
        let style = DiagramStyle::default();
        let request = DiagramRequest {
            graph,
            highlight,
            live_node_ids: &live,
            style: &style,
        };
        let mut buf = Vec::new();
        DotRenderer.render(&request, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn sample() -> (ProcessGraph, HighlightResult) {
        let mut graph = ProcessGraph::new();
        graph.add_node("start", Some("Start".to_string()));
        graph.add_node("review", Some("Review \"draft\"".to_string()));
        graph.add_edge("f1", "start", "review");
        graph.add_edge("f2", "review", "end");
        let highlight = HighlightResult {
            highlighted_node_ids: ["start", "review"].iter().map(|s| s.to_string()).collect(),
            highlighted_edge_ids: ["f1"].iter().map(|s| s.to_string()).collect(),
        };
        (graph, highlight)
    }

    #[test]
    fn renders_highlighted_edges_in_completed_color() {
        let (graph, highlight) = sample();
        let dot = render(&graph, &highlight, &[]);
        assert!(dot.starts_with("digraph process {"));
        assert!(dot.contains("\"start\" -> \"review\" [id=\"f1\" color=\"#2f855a\" penwidth=2];"));
        assert!(dot.contains("\"review\" -> \"end\" [id=\"f2\" color=\"#a0aec0\" penwidth=1];"));
    }

    #[test]
    fn live_nodes_take_the_current_color() {
        let (graph, highlight) = sample();
        let dot = render(&graph, &highlight, &["review"]);
        assert!(dot.contains("fillcolor=\"#c53030\""));
        assert!(dot.contains("\"start\" [label=\"Start\" color=\"#2f855a\""));
    }

    #[test]
    fn labels_are_escaped() {
        let (graph, highlight) = sample();
        let dot = render(&graph, &highlight, &[]);
        assert!(dot.contains("Review \\\"draft\\\""));
    }

    #[test]
    fn content_type_is_graphviz() {
        assert_eq!(DotRenderer.content_type(), "text/vnd.graphviz");
    }
}
