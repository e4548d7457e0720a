//! Undirected multi-labeled graph over tables.
//!
//! Edges carry a set of relationship labels (foreign key column names).
//! [`Graph::compress`] materialises the transitive closure of each label as
//! extra direct edges, and [`Graph::find_path`] answers shortest-path queries
//! over all labels.

mod edge;
mod node;
mod traverse;

pub use edge::Edge;
pub use node::{Node, NodeKey};

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Edge {edge} references node {key}, which is not in the graph")]
    DanglingEndpoint { edge: usize, key: NodeKey },
}

/// Nodes and edges in insertion order.
///
/// Edges are not checked against the node list: an edge may reference a node
/// that was never added. Use [`Graph::validate`] to detect that.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Rc<Node>>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(nodes: Vec<Rc<Node>>) -> Self {
        Self {
            nodes,
            edges: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: Rc<Node>) {
        self.nodes.push(node);
    }

    /// Append an edge unless an identical one (same endpoint instances, same
    /// label set) is already present. Edges without labels are dropped.
    ///
    /// Returns whether the edge was appended.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if edge.labels().is_empty() {
            log::debug!("dropping unlabeled edge {} <--> {}", edge.left(), edge.right());
            return false;
        }
        if self.edges.iter().any(|e| e.is_duplicate_of(&edge)) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn nodes(&self) -> &[Rc<Node>] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// First node with the given key.
    pub fn node(&self, key: NodeKey) -> Option<&Rc<Node>> {
        self.nodes.iter().find(|n| n.key == key)
    }

    /// Distinct labels across all edges, in first-seen order.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for label in self.edges.iter().flat_map(Edge::labels) {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
        labels
    }

    /// Check that every edge endpoint is one of the graph's nodes.
    pub fn validate(&self) -> Result<(), GraphError> {
        for (idx, edge) in self.edges.iter().enumerate() {
            for endpoint in [edge.left(), edge.right()] {
                if !self.nodes.iter().any(|n| Rc::ptr_eq(n, endpoint)) {
                    return Err(GraphError::DanglingEndpoint {
                        edge: idx,
                        key: endpoint.key,
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, edge) in self.edges.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", edge)?;
        }
        Ok(())
    }
}
