//! R-tree based spatial index using the rstar crate.
//!
//! Provides O(log n) spatial queries for:
//! - Nearest neighbor (optionally bounded by a radius)
//! - Point-in-radius

use rstar::{AABB, PointDistance, RTree, RTreeObject};

/// A point in the spatial index tagged with its node slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePoint {
    /// Slot index of the node.
    pub slot: usize,
    pub x: f64,
    pub y: f64,
}

impl RTreeObject for NodePoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for NodePoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index for graph nodes.
///
/// Positions change every simulation step, so the index is bulk loaded from
/// scratch whenever it is needed rather than updated incrementally.
pub struct SpatialIndex {
    tree: RTree<NodePoint>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Build an index from `(slot, x, y)` triples.
    pub fn from_points(points: impl IntoIterator<Item = (usize, f64, f64)>) -> Self {
        let mut index = Self::new();
        index.rebuild(points);
        index
    }

    /// Replace the contents of the index.
    ///
    /// Points with non-finite coordinates are skipped.
    pub fn rebuild(&mut self, points: impl IntoIterator<Item = (usize, f64, f64)>) {
        let node_points: Vec<_> = points
            .into_iter()
            .filter(|&(_, x, y)| x.is_finite() && y.is_finite())
            .map(|(slot, x, y)| NodePoint { slot, x, y })
            .collect();

        self.tree = RTree::bulk_load(node_points);
    }

    /// Find the nearest node to a point.
    pub fn nearest(&self, x: f64, y: f64) -> Option<usize> {
        self.tree.nearest_neighbor(&[x, y]).map(|point| point.slot)
    }

    /// Find the nearest node within a maximum distance.
    pub fn nearest_within(&self, x: f64, y: f64, max_distance: f64) -> Option<usize> {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&[x, y])
            .filter(|point| point.distance_2(&[x, y]) <= max_distance_sq)
            .map(|point| point.slot)
    }

    /// Find all nodes within a radius of a point, in ascending slot order.
    pub fn in_radius(&self, x: f64, y: f64, radius: f64) -> Vec<usize> {
        let radius_sq = radius * radius;
        let mut slots: Vec<usize> = self
            .tree
            .locate_within_distance([x, y], radius_sq)
            .map(|point| point.slot)
            .collect();
        slots.sort_unstable();
        slots
    }

    /// Clear all nodes from the index.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    /// Get the number of nodes in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
