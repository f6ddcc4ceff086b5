//! Node type and related structures.
//!
//! Nodes are the vertices in the graph. Each node has:
//! - A stable unique identifier (integer or string, never changes)
//! - A dense slot index into the owning graph's node list
//! - Position (x, y) and velocity (vx, vy) for the force simulation
//! - An optional pinned position (fx, fy) that overrides integration

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable node identifier as it appears in the input data.
///
/// Deserializes from either a JSON number or a JSON string, matching the
/// `{ nodes: [{ id }], links: [{ source, target }] }` schema used by other
/// graph tools.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    /// Numeric identifier.
    Index(u64),
    /// String identifier.
    Name(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Index(i) => write!(f, "{i}"),
            NodeId::Name(name) => write!(f, "\"{name}\""),
        }
    }
}

impl From<u64> for NodeId {
    #[inline]
    fn from(id: u64) -> Self {
        Self::Index(id)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self::Index(id as u64)
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for NodeId {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// A simulated node.
///
/// Forces only ever write `vx`/`vy`; positions change during integration.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Stable identifier from the input data.
    pub id: NodeId,
    /// Slot in the owning graph's node list.
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Pinned x coordinate. When set, `x` is forced to it every step.
    pub fx: Option<f64>,
    /// Pinned y coordinate. When set, `y` is forced to it every step.
    pub fy: Option<f64>,
}

impl Node {
    /// Create a resting node at the given position.
    pub fn new(id: NodeId, index: usize, x: f64, y: f64) -> Self {
        Self {
            id,
            index,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            fx: None,
            fy: None,
        }
    }

    /// Check if either coordinate is pinned.
    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.fx.is_some() || self.fy.is_some()
    }

    #[inline]
    pub(crate) fn pin(&mut self, x: f64, y: f64) {
        self.fx = Some(x);
        self.fy = Some(y);
    }

    #[inline]
    pub(crate) fn unpin(&mut self) {
        self.fx = None;
        self.fy = None;
    }
}
