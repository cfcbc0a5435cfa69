use std::collections::HashMap;

/// A directed sequence flow leaving a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceEdge {
    pub edge_id: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNode {
    pub id: String,
    pub name: Option<String>,
    pub outgoing: Vec<SequenceEdge>,
}

/// Nodes keyed by activity id, each with its outgoing edges in definition order.
/// Node iteration follows insertion order so rendered output is stable.
#[derive(Debug, Clone, Default)]
pub struct ProcessGraph {
    nodes: Vec<FlowNode>,
    index: HashMap<String, usize>,
}

impl ProcessGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, or set the name of an existing one.
    pub fn add_node(&mut self, id: impl Into<String>, name: Option<String>) {
        let id = id.into();
        if let Some(&pos) = self.index.get(&id) {
            if name.is_some() {
                self.nodes[pos].name = name;
            }
            return;
        }
        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(FlowNode {
            id,
            name,
            outgoing: Vec::new(),
        });
    }

    /// Append an outgoing edge to `source`. Unknown endpoints are added as
    /// unnamed nodes.
    pub fn add_edge(
        &mut self,
        edge_id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) {
        let source = source.into();
        let target = target.into();
        self.add_node(source.clone(), None);
        self.add_node(target.clone(), None);
        if let Some(&pos) = self.index.get(&source) {
            self.nodes[pos].outgoing.push(SequenceEdge {
                edge_id: edge_id.into(),
                target,
            });
        }
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes.iter()
    }

    /// All edges as `(source_id, edge)`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &SequenceEdge)> {
        self.nodes
            .iter()
            .flat_map(|n| n.outgoing.iter().map(move |e| (n.id.as_str(), e)))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_creates_missing_endpoints() {
        let mut graph = ProcessGraph::new();
        graph.add_edge("f1", "start", "review");
        assert!(graph.node("start").is_some());
        assert!(graph.node("review").is_some());
        assert_eq!(graph.node("start").unwrap().outgoing[0].target, "review");
    }

    #[test]
    fn add_node_keeps_position_and_updates_name() {
        let mut graph = ProcessGraph::new();
        graph.add_node("a", None);
        graph.add_node("b", None);
        graph.add_node("a", Some("Approve".to_string()));
        let ids: Vec<_> = graph.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(graph.node("a").unwrap().name.as_deref(), Some("Approve"));
    }

    #[test]
    fn edges_follow_definition_order() {
        let mut graph = ProcessGraph::new();
        graph.add_edge("f2", "gw", "y");
        graph.add_edge("f1", "gw", "x");
        let ids: Vec<_> = graph.edges().map(|(_, e)| e.edge_id.as_str()).collect();
        assert_eq!(ids, vec!["f2", "f1"]);
    }
}
