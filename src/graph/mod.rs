//! Graph data structures.
//!
//! The node and edge sets are fixed when a graph is built from [`GraphData`].
//! Topology lives in petgraph's StableGraph (degrees, neighbours) while the
//! physical node state is kept in a dense `Vec<Node>` indexed by slot so the
//! forces can sweep it without indirection.

mod data;
mod edge;
mod model;
mod node;

pub use data::{GraphData, GraphLink, GraphNode};
pub use edge::Edge;
pub use model::Graph;
pub use node::{Node, NodeId};
