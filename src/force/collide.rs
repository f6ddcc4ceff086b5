//! Collision force.
//!
//! Treats each node as a disk of `radius` and pushes overlapping pairs apart
//! along the line between their centres. Overlap is measured on predicted
//! positions (`x + vx`), so the correction anticipates this step's motion.
//! `strength` is the fraction of the overlap resolved per pass; several
//! relaxation passes run per step to keep dense clusters stable.
//!
//! Candidate pairs come from an R-tree over the predicted positions instead
//! of testing every pair.

use serde::{Deserialize, Serialize};

use super::{Force, Jitter, require_iterations, require_range};
use crate::error::{LayoutError, LayoutResult};
use crate::graph::Node;
use crate::spatial::SpatialIndex;

/// Configuration for the collision force.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollideConfig {
    /// Disk radius of every node (default: 20).
    pub radius: f64,
    /// Fraction of overlap resolved per pass, in [0, 1] (default: 0.7).
    pub strength: f64,
    /// Relaxation passes per step (default: 3).
    pub iterations: usize,
}

impl Default for CollideConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            strength: 0.7,
            iterations: 3,
        }
    }
}

impl CollideConfig {
    pub fn validate(&self) -> LayoutResult<()> {
        check_radius(self.radius)?;
        require_range("strength", self.strength, 0.0, 1.0)?;
        require_iterations("iterations", self.iterations as f64)?;
        Ok(())
    }
}

fn check_radius(value: f64) -> LayoutResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::invalid("radius", value))
    }
}

/// Disk collision force.
pub struct CollideForce {
    config: CollideConfig,
    index: SpatialIndex,
}

impl CollideForce {
    pub const NAME: &'static str = "collide";

    pub fn new(config: CollideConfig) -> Self {
        Self {
            config,
            index: SpatialIndex::new(),
        }
    }

    /// One relaxation pass over all overlapping pairs.
    fn relax(&mut self, nodes: &mut [Node], jitter: &mut Jitter) {
        let radius = self.config.radius;
        let contact = 2.0 * radius;
        let contact2 = contact * contact;

        self.index.rebuild(
            nodes
                .iter()
                .map(|node| (node.index, node.x + node.vx, node.y + node.vy)),
        );

        for i in 0..nodes.len() {
            let (px, py) = (nodes[i].x + nodes[i].vx, nodes[i].y + nodes[i].vy);

            for j in self.index.in_radius(px, py, contact) {
                if j <= i {
                    continue;
                }

                // Re-read both predictions: earlier pairs in this pass may
                // have changed either velocity.
                let xi = nodes[i].x + nodes[i].vx;
                let yi = nodes[i].y + nodes[i].vy;
                let mut dx = xi - (nodes[j].x + nodes[j].vx);
                let mut dy = yi - (nodes[j].y + nodes[j].vy);
                let mut l = dx * dx + dy * dy;
                if l >= contact2 {
                    continue;
                }

                if dx == 0.0 {
                    dx = jitter.jiggle();
                    l += dx * dx;
                }
                if dy == 0.0 {
                    dy = jitter.jiggle();
                    l += dy * dy;
                }

                let distance = l.sqrt();
                let scale = (contact - distance) / distance * self.config.strength;
                dx *= scale;
                dy *= scale;

                // Equal radii, so each side takes half the correction.
                nodes[i].vx += dx * 0.5;
                nodes[i].vy += dy * 0.5;
                nodes[j].vx -= dx * 0.5;
                nodes[j].vy -= dy * 0.5;
            }
        }
    }
}

impl Force for CollideForce {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&mut self, nodes: &mut [Node], _alpha: f64, jitter: &mut Jitter) {
        if nodes.len() < 2 {
            return;
        }
        for _ in 0..self.config.iterations {
            self.relax(nodes, jitter);
        }
    }

    fn parameter(&self, name: &str) -> LayoutResult<f64> {
        match name {
            "radius" => Ok(self.config.radius),
            "strength" => Ok(self.config.strength),
            "iterations" => Ok(self.config.iterations as f64),
            _ => Err(LayoutError::unknown_parameter(Self::NAME, name)),
        }
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> LayoutResult<()> {
        match name {
            "radius" => self.config.radius = check_radius(value)?,
            "strength" => self.config.strength = require_range(name, value, 0.0, 1.0)?,
            "iterations" => self.config.iterations = require_iterations(name, value)?,
            _ => return Err(LayoutError::unknown_parameter(Self::NAME, name)),
        }
        Ok(())
    }
}
