//! The element graph engine.
//!
//! Holds the ordered element collection, an id index, and a petgraph
//! adjacency over edge endpoints used by the neighborhood expansion.

use indexmap::{IndexMap, IndexSet};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use super::types::{Element, ElementId, ElementKind, Subgraph};
use crate::error::{LsifError, Result};

/// The element collection of one dump plus lookup indexes.
///
/// Elements are kept exactly as read: same order, duplicates included.
pub struct ElementGraph {
    /// All elements in input order.
    elements: Vec<Element>,
    /// Index: id -> position of the first element carrying that id.
    index: HashMap<ElementId, usize>,
    /// Endpoint adjacency. Nodes are ids referenced by edges (present in
    /// the input or not), edge weights are element positions.
    graph: DiGraph<ElementId, usize>,
    /// Index: id -> node in `graph`.
    node_index: HashMap<ElementId, NodeIndex>,
}

impl ElementGraph {
    /// Index an element collection.
    pub fn new(elements: Vec<Element>) -> Self {
        let mut graph = Self {
            elements: Vec::new(),
            index: HashMap::with_capacity(elements.len()),
            graph: DiGraph::new(),
            node_index: HashMap::new(),
        };

        for (position, element) in elements.iter().enumerate() {
            graph.index.entry(element.id().clone()).or_insert(position);

            // Edges without both endpoints cannot be traversed.
            if let (Some(out_v), Some(in_v)) = (element.out_v(), element.in_v()) {
                let from = graph.node_for(out_v);
                let to = graph.node_for(in_v);
                graph.graph.add_edge(from, to, position);
            }
        }

        graph.elements = elements;
        debug!(
            elements = graph.elements.len(),
            nodes = graph.graph.node_count(),
            edges = graph.graph.edge_count(),
            "indexed element graph"
        );
        graph
    }

    fn node_for(&mut self, id: &ElementId) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.node_index.insert(id.clone(), idx);
        idx
    }

    // ─── Lookup ─────────────────────────────────────────────────

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The first element with this id.
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.index.get(id).map(|&position| &self.elements[position])
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            total: self.elements.len(),
            ..GraphStats::default()
        };
        for element in &self.elements {
            match element.kind() {
                ElementKind::Vertex => stats.vertex_count += 1,
                ElementKind::Edge { .. } => stats.edge_count += 1,
                ElementKind::Unknown(_) => stats.unknown_count += 1,
            }
        }
        stats
    }

    // ─── Neighborhood Expansion ─────────────────────────────────

    /// Turn seed ids into the initial frontier.
    ///
    /// An edge id stands for its two endpoints. Ids that name no element
    /// are kept as they are; they simply match no edge unless some edge
    /// points at them.
    pub fn resolve_seeds(&self, seeds: &[ElementId]) -> IndexSet<ElementId> {
        let mut frontier = IndexSet::with_capacity(seeds.len());
        for seed in seeds {
            match self.get(seed) {
                Some(element) if element.is_edge() => {
                    frontier.extend(element.out_v().cloned());
                    frontier.extend(element.in_v().cloned());
                }
                Some(_) => {
                    frontier.insert(seed.clone());
                }
                None => {
                    warn!(id = %seed, "seed id not found in input");
                    frontier.insert(seed.clone());
                }
            }
        }
        frontier
    }

    /// Collect every edge within `distance` undirected hops of `seeds`,
    /// together with the vertices at both ends of those edges.
    ///
    /// Each round takes every edge with an endpoint in the frontier; the
    /// endpoints of those edges form the next frontier. Edges found in one
    /// round are ordered by their position in the input, so the result is
    /// the same as a linear scan per round. `distance == 0` yields an empty
    /// subgraph.
    ///
    /// Fails if a collected edge points at an id absent from the input.
    pub fn expand(&self, seeds: &[ElementId], distance: usize) -> Result<Subgraph<'_>> {
        let mut frontier = self.resolve_seeds(seeds);
        let mut edges: IndexMap<ElementId, &Element> = IndexMap::new();

        for round in 0..distance {
            let nodes: HashSet<NodeIndex> = frontier
                .iter()
                .filter_map(|id| self.node_index.get(id).copied())
                .collect();

            let mut hits: Vec<usize> = nodes
                .iter()
                .flat_map(|&node| {
                    self.graph
                        .edges_directed(node, Direction::Outgoing)
                        .chain(self.graph.edges_directed(node, Direction::Incoming))
                        .map(|edge| *edge.weight())
                })
                .collect();
            hits.sort_unstable();
            hits.dedup();

            let mut next = IndexSet::with_capacity(hits.len() * 2);
            for position in hits {
                let edge = &self.elements[position];
                next.extend(edge.in_v().cloned());
                next.extend(edge.out_v().cloned());
                edges.insert(edge.id().clone(), edge);
            }

            debug!(
                round = round + 1,
                frontier = frontier.len(),
                edges = edges.len(),
                "expansion round"
            );
            frontier = next;
        }

        let mut vertices: IndexMap<ElementId, &Element> = IndexMap::new();
        for edge in edges.values() {
            for endpoint in [edge.out_v(), edge.in_v()].into_iter().flatten() {
                if vertices.contains_key(endpoint) {
                    continue;
                }
                let vertex = self.get(endpoint).ok_or_else(|| LsifError::MissingVertex {
                    edge: edge.id().clone(),
                    vertex: endpoint.clone(),
                })?;
                vertices.insert(endpoint.clone(), vertex);
            }
        }

        Ok(Subgraph { edges, vertices })
    }
}

impl Default for ElementGraph {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<Element>> for ElementGraph {
    fn from(elements: Vec<Element>) -> Self {
        Self::new(elements)
    }
}

/// Element counts by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub unknown_count: usize,
    pub total: usize,
}
