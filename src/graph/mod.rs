//! Vault link graph: the read-only input to the mapping engine.
//!
//! The host application owns the real vault. This module only defines the
//! node model, the [`GraphSource`] contract the engine reads through, and an
//! in-memory [`StaticGraph`] used by the player and by tests.

pub mod node;

use std::collections::{HashMap, HashSet, VecDeque};

pub use node::{GraphNode, NodeType};

/// Anything that can hand the engine a stable node set for one mapping pass
pub trait GraphSource {
    /// All nodes, in extraction order
    fn nodes(&self) -> &[GraphNode];

    /// Look up a node by id
    fn node(&self, id: &str) -> Option<&GraphNode>;
}

/// In-memory graph with an id index and undirected adjacency
#[derive(Debug, Clone, Default)]
pub struct StaticGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<usize>>,
}

impl StaticGraph {
    /// Build a graph, rejecting duplicate ids.
    ///
    /// Connections pointing at ids outside the node set are ignored for
    /// traversal but kept on the nodes themselves (they still count as
    /// connections when mapping).
    pub fn new(nodes: Vec<GraphNode>) -> Result<Self, GraphError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), i).is_some() {
                return Err(GraphError::DuplicateId(node.id.clone()));
            }
        }

        let mut adjacency = vec![Vec::new(); nodes.len()];
        let mut dangling = 0usize;
        for (i, node) in nodes.iter().enumerate() {
            for target in &node.connections {
                match index.get(target) {
                    Some(&j) if j != i => {
                        adjacency[i].push(j);
                        adjacency[j].push(i);
                    }
                    Some(_) => {}
                    None => dangling += 1,
                }
            }
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        if dangling > 0 {
            tracing::debug!(dangling, "ignoring connections to unknown nodes");
        }

        Ok(Self {
            nodes,
            index,
            adjacency,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Breadth-first rings around `center`, up to `max_depth` hops.
    ///
    /// Returns `(node, depth)` pairs ordered by depth; nodes in the same ring
    /// keep discovery order. The center itself is depth 0.
    pub fn neighborhood(
        &self,
        center: &str,
        max_depth: usize,
    ) -> Result<Vec<(&GraphNode, usize)>, GraphError> {
        let &start = self
            .index
            .get(center)
            .ok_or_else(|| GraphError::UnknownNode(center.to_string()))?;

        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);
        let mut ring = Vec::new();

        while let Some((i, depth)) = queue.pop_front() {
            ring.push((&self.nodes[i], depth));
            if depth == max_depth {
                continue;
            }
            for &j in &self.adjacency[i] {
                if seen.insert(j) {
                    queue.push_back((j, depth + 1));
                }
            }
        }

        Ok(ring)
    }
}

impl GraphSource for StaticGraph {
    fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }
}

impl GraphSource for [GraphNode] {
    fn nodes(&self) -> &[GraphNode] {
        self
    }

    fn node(&self, id: &str) -> Option<&GraphNode> {
        self.iter().find(|n| n.id == id)
    }
}

/// Errors that can occur when building or traversing a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two nodes share the same id
    DuplicateId(String),
    /// Requested node is not part of the graph
    UnknownNode(String),
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::DuplicateId(id) => write!(f, "Duplicate node id: {:?}", id),
            GraphError::UnknownNode(id) => write!(f, "Unknown node: {:?}", id),
        }
    }
}

impl std::error::Error for GraphError {}
