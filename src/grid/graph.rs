//! Edge-list export for external graph viewers.
//!
//! The crate does not lay out or draw graphs. It hands viewers a list of
//! connections with 1-based node numbers and a source/load category for each
//! node and edge, plus a Graphviz DOT rendering of the same data.

use serde::Serialize;

use super::connection::ConnectionMatrix;
use super::types::{ConnectionId, GridSize, NodeId, NodeKind};

/// A grid element as seen by a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// 1-based node number
    pub node: usize,
    /// Element role
    pub kind: NodeKind,
}

/// A connection as seen by a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    /// Connection id
    pub connection: ConnectionId,
    /// 1-based number of the node current flows out of
    pub source: usize,
    /// 1-based number of the node current flows into
    pub target: usize,
    /// Role of the `source` node
    pub kind: NodeKind,
}

/// Edge list and node categories of a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphExport {
    /// Every node `1..=tot_ele`, isolated ones included
    pub nodes: Vec<GraphNode>,
    /// One edge per connection id, in id order
    pub edges: Vec<GraphEdge>,
}

impl GraphExport {
    /// Build the export from a connection matrix.
    ///
    /// Ids without a `+id` cell are skipped.
    pub fn from_matrix(cm: &ConnectionMatrix, size: GridSize, num_connections: u32) -> Self {
        let nodes = (0..size.tot_ele())
            .map(|i| GraphNode {
                node: NodeId(i).number(),
                kind: size.kind(NodeId(i)),
            })
            .collect();

        let edges = (1..=num_connections)
            .map(ConnectionId)
            .filter_map(|id| {
                cm.find(id).map(|(from, to)| GraphEdge {
                    connection: id,
                    source: from.number(),
                    target: to.number(),
                    kind: size.kind(from),
                })
            })
            .collect();

        Self { nodes, edges }
    }

    /// `(source, target)` pairs in connection id order.
    pub fn edge_list(&self) -> Vec<(usize, usize)> {
        self.edges.iter().map(|e| (e.source, e.target)).collect()
    }

    /// Render as an undirected Graphviz graph.
    ///
    /// Sources are filled red, loads light blue; edge labels carry the
    /// connection id.
    pub fn to_dot(&self) -> String {
        let mut buffer = String::new();
        buffer.push_str("graph grid {\n");
        buffer.push_str("  node [style=filled];\n");
        for node in &self.nodes {
            let color = match node.kind {
                NodeKind::Source => "red",
                NodeKind::Load => "lightblue",
            };
            buffer.push_str(&format!(
                "  n{} [label=\"{}\", fillcolor={}];\n",
                node.node, node.node, color
            ));
        }
        for edge in &self.edges {
            let color = match edge.kind {
                NodeKind::Source => "red",
                NodeKind::Load => "blue",
            };
            buffer.push_str(&format!(
                "  n{} -- n{} [label=\"{}\", color={}];\n",
                edge.source, edge.target, edge.connection, color
            ));
        }
        buffer.push('}');
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export() -> GraphExport {
        let cm = ConnectionMatrix::from_rows(vec![
            vec![0, 3, 1],
            vec![-3, 0, 2],
            vec![-1, -2, 0],
        ])
        .unwrap();
        GraphExport::from_matrix(&cm, GridSize::new(2, 1), 3)
    }

    #[test]
    fn test_edges_in_id_order() {
        let graph = export();
        assert_eq!(graph.edge_list(), vec![(1, 3), (2, 3), (1, 2)]);
        assert!(graph.edges.iter().all(|e| e.kind == NodeKind::Source));
    }

    #[test]
    fn test_node_categories() {
        let graph = export();
        let kinds: Vec<NodeKind> = graph.nodes.iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NodeKind::Source, NodeKind::Source, NodeKind::Load]);
    }

    #[test]
    fn test_load_to_load_edge_is_load_category() {
        let cm = ConnectionMatrix::from_rows(vec![
            vec![0, 1, 0],
            vec![-1, 0, 2],
            vec![0, -2, 0],
        ])
        .unwrap();
        let graph = GraphExport::from_matrix(&cm, GridSize::new(1, 2), 2);
        assert_eq!(graph.edges[1].kind, NodeKind::Load);
        assert_eq!(graph.edges[1].source, 2);
    }

    #[test]
    fn test_dot_rendering() {
        let dot = export().to_dot();
        assert!(dot.starts_with("graph grid {"));
        assert!(dot.contains("n1 [label=\"1\", fillcolor=red];"));
        assert!(dot.contains("n3 [label=\"3\", fillcolor=lightblue];"));
        assert!(dot.contains("n1 -- n2 [label=\"W3\", color=red];"));
        assert!(dot.ends_with('}'));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(export()).unwrap();
        assert_eq!(json["edges"][0]["connection"], 1);
        assert_eq!(json["edges"][0]["kind"], "source");
        assert_eq!(json["nodes"][2]["kind"], "load");
    }
}
