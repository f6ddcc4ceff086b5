//! Node drag gesture.
//!
//! A drag pins the grabbed node under the pointer and holds alpha up so the
//! rest of the layout responds. Releasing unpins the node and lets the
//! simulation settle.

use log::debug;

use super::ViewTransform;
use crate::error::LayoutResult;
use crate::graph::NodeId;
use crate::simulation::Simulation;

/// Alpha target held while a node is dragged.
pub const DRAG_ALPHA_TARGET: f64 = 0.7;

/// Tracks an in-progress node drag.
#[derive(Debug, Clone)]
pub struct DragController {
    /// Pointer distance (graph units) within which a node can be grabbed.
    hit_radius: f64,
    dragged: Option<NodeId>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(20.0)
    }
}

impl DragController {
    pub fn new(hit_radius: f64) -> Self {
        Self {
            hit_radius,
            dragged: None,
        }
    }

    /// Node currently being dragged.
    pub fn dragged(&self) -> Option<&NodeId> {
        self.dragged.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.dragged.is_some()
    }

    /// Grab the node under the screen point `(sx, sy)`.
    ///
    /// The node is pinned where it currently is and the simulation is
    /// reheated. Returns false when no node is under the pointer, in which
    /// case the host should pan instead.
    pub fn start(
        &mut self,
        sim: &mut Simulation,
        view: &ViewTransform,
        sx: f64,
        sy: f64,
    ) -> LayoutResult<bool> {
        let (gx, gy) = view.screen_to_graph(sx, sy);
        let Some(node) = sim.find(gx, gy, Some(self.hit_radius)) else {
            return Ok(false);
        };
        let (id, x, y) = (node.id.clone(), node.x, node.y);

        sim.reheat(DRAG_ALPHA_TARGET)?;
        sim.pin(&id, x, y)?;
        debug!("drag: grabbed node {id}");
        self.dragged = Some(id);
        Ok(true)
    }

    /// Move the dragged node to the screen point `(sx, sy)`.
    pub fn drag(
        &mut self,
        sim: &mut Simulation,
        view: &ViewTransform,
        sx: f64,
        sy: f64,
    ) -> LayoutResult<()> {
        let Some(id) = &self.dragged else {
            return Ok(());
        };
        let (gx, gy) = view.screen_to_graph(sx, sy);
        sim.pin(id, gx, gy)
    }

    /// Release the dragged node.
    pub fn end(&mut self, sim: &mut Simulation) -> LayoutResult<()> {
        let Some(id) = self.dragged.take() else {
            return Ok(());
        };
        sim.cool();
        sim.unpin(&id)?;
        debug!("drag: released node {id}");
        Ok(())
    }
}
