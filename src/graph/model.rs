//! Graph - resolved node and edge sets.
//!
//! Building a [`Graph`] validates the input once: ids must be unique and every
//! link must resolve. After that nothing about the graph can fail.

use std::collections::HashMap;
use std::f64::consts::PI;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::{Directed, Direction};

use super::data::GraphData;
use super::edge::Edge;
use super::node::{Node, NodeId};
use crate::error::{LayoutError, LayoutResult};
use crate::force::require_finite;

/// Radius of the first spiral ring used for initial placement.
const INITIAL_RADIUS: f64 = 10.0;

/// Resolved graph owned by a simulation.
///
/// This struct manages:
/// - Graph topology via petgraph (node weight = slot, edge weight = edge index)
/// - The dense node list carrying physical state
/// - The resolved edge list
/// - The id → slot map for O(1) lookup
#[derive(Debug, Clone)]
pub struct Graph {
    topology: StableGraph<usize, usize, Directed>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    id_to_slot: HashMap<NodeId, usize>,
}

impl Graph {
    /// Resolve input data into a graph.
    ///
    /// Nodes with no starting position (and no pin) are placed on a
    /// phyllotaxis spiral around `origin`, which spreads them evenly without
    /// any randomness. Non-finite coordinates are rejected.
    pub fn from_data(data: &GraphData, origin: (f64, f64)) -> LayoutResult<Self> {
        let node_count = data.nodes.len();
        let mut topology = StableGraph::with_capacity(node_count, data.links.len());
        let mut nodes = Vec::with_capacity(node_count);
        let mut id_to_slot = HashMap::with_capacity(node_count);

        for (slot, input) in data.nodes.iter().enumerate() {
            if id_to_slot.insert(input.id.clone(), slot).is_some() {
                return Err(LayoutError::DuplicateNode(input.id.clone()));
            }
            let coordinates = [
                ("x", input.x),
                ("y", input.y),
                ("fx", input.fx),
                ("fy", input.fy),
            ];
            for (parameter, value) in coordinates {
                if let Some(value) = value {
                    require_finite(parameter, value)?;
                }
            }
            topology.add_node(slot);

            let (sx, sy) = spiral_position(slot, origin);
            let x = input.fx.or(input.x).unwrap_or(sx);
            let y = input.fy.or(input.y).unwrap_or(sy);

            let mut node = Node::new(input.id.clone(), slot, x, y);
            node.fx = input.fx;
            node.fy = input.fy;
            nodes.push(node);
        }

        let mut edges = Vec::with_capacity(data.links.len());
        for (index, link) in data.links.iter().enumerate() {
            let resolve = |id: &NodeId| {
                id_to_slot
                    .get(id)
                    .copied()
                    .ok_or_else(|| LayoutError::DanglingReference {
                        edge: index,
                        missing: id.clone(),
                    })
            };
            let source = resolve(&link.source)?;
            let target = resolve(&link.target)?;

            topology.add_edge(NodeIndex::new(source), NodeIndex::new(target), index);
            edges.push(Edge::new(index, source, target));
        }

        Ok(Self {
            topology,
            nodes,
            edges,
            id_to_slot,
        })
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// All nodes in slot order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Slot index for an id.
    pub fn slot_of(&self, id: &NodeId) -> LayoutResult<usize> {
        self.id_to_slot
            .get(id)
            .copied()
            .ok_or_else(|| LayoutError::UnknownNode(id.clone()))
    }

    /// Look up a node by id.
    pub fn node(&self, id: &NodeId) -> LayoutResult<&Node> {
        self.slot_of(id).map(|slot| &self.nodes[slot])
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> LayoutResult<&mut Node> {
        let slot = self.slot_of(id)?;
        Ok(&mut self.nodes[slot])
    }

    // =========================================================================
    // Edges
    // =========================================================================

    /// All edges in input order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edge endpoints at a node, ignoring direction.
    ///
    /// A self-loop counts twice.
    pub fn degree(&self, slot: usize) -> usize {
        let index = NodeIndex::new(slot);
        self.topology.edges_directed(index, Direction::Outgoing).count()
            + self.topology.edges_directed(index, Direction::Incoming).count()
    }

    /// Degrees of every node in slot order.
    pub fn degrees(&self) -> Vec<usize> {
        (0..self.nodes.len()).map(|slot| self.degree(slot)).collect()
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Centroid of all node positions, or None if the graph is empty.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.nodes.is_empty() {
            return None;
        }
        let (sx, sy) = self
            .nodes
            .iter()
            .fold((0.0, 0.0), |(sx, sy), n| (sx + n.x, sy + n.y));
        let n = self.nodes.len() as f64;
        Some((sx / n, sy / n))
    }

    /// Bounding box of all nodes as (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for node in &self.nodes {
            min_x = min_x.min(node.x);
            max_x = max_x.max(node.x);
            min_y = min_y.min(node.y);
            max_y = max_y.max(node.y);
        }

        Some((min_x, min_y, max_x, max_y))
    }
}

/// Position of the `i`-th node on a phyllotaxis (sunflower) spiral.
fn spiral_position(i: usize, (cx, cy): (f64, f64)) -> (f64, f64) {
    let golden_angle = PI * (3.0 - 5.0f64.sqrt());
    let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
    let angle = i as f64 * golden_angle;
    (cx + radius * angle.cos(), cy + radius * angle.sin())
}
