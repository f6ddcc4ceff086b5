//! Edge type.
//!
//! Edges are resolved once at construction: they hold the slot indices of
//! their endpoints, so consumers index straight into the node list.

/// A resolved edge between two nodes.
///
/// Edges carry no physical state of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Position of this edge in the input link list.
    pub index: usize,
    /// Slot index of the source node.
    pub source: usize,
    /// Slot index of the target node.
    pub target: usize,
}

impl Edge {
    /// Create a new resolved edge.
    #[inline]
    pub fn new(index: usize, source: usize, target: usize) -> Self {
        Self {
            index,
            source,
            target,
        }
    }

    /// Check if both endpoints are the same node.
    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
