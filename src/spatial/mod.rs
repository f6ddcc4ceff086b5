//! Spatial indexing over node positions.
//!
//! This module provides an R-tree based index used for collision candidate
//! lookup and for hit testing nodes under the pointer.

mod rtree;

pub use rtree::SpatialIndex;
