//! Many-body (charge) force.
//!
//! Every node pushes on every other node. For a pair at offset `d` the
//! velocity change is `d * strength * alpha / |d|²`, so the magnitude falls
//! off as `strength * alpha / |d|`. Negative strength repels.
//!
//! A zero offset on either axis (coincident or axis-aligned pairs) is replaced
//! by a tiny seeded jiggle so the push always has a direction.
//!
//! This is the exact O(n²) sum. For the graph sizes this crate targets (tens
//! to low hundreds of nodes) it is fast enough and has no approximation error.

use serde::{Deserialize, Serialize};

use super::{Force, Jitter, require_finite};
use crate::error::{LayoutError, LayoutResult};
use crate::graph::Node;

/// Configuration for the many-body force.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManyBodyConfig {
    /// Charge per node (default: -30). Negative repels, positive attracts.
    pub strength: f64,
    /// Distances below this are clamped, limiting the force between very
    /// close nodes (default: 1).
    pub distance_min: f64,
    /// Pairs farther apart than this do not interact (default: infinity).
    pub distance_max: f64,
}

impl Default for ManyBodyConfig {
    fn default() -> Self {
        Self {
            strength: -30.0,
            distance_min: 1.0,
            distance_max: f64::INFINITY,
        }
    }
}

impl ManyBodyConfig {
    pub fn validate(&self) -> LayoutResult<()> {
        require_finite("strength", self.strength)?;
        check_distance_min(self.distance_min)?;
        check_distance_max(self.distance_max)?;
        Ok(())
    }
}

fn check_distance_min(value: f64) -> LayoutResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::invalid("distance_min", value))
    }
}

fn check_distance_max(value: f64) -> LayoutResult<f64> {
    // Infinity is the "no cut-off" default.
    if value > 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::invalid("distance_max", value))
    }
}

/// All-pairs charge force.
#[derive(Debug, Clone)]
pub struct ManyBodyForce {
    config: ManyBodyConfig,
}

impl ManyBodyForce {
    pub const NAME: &'static str = "charge";

    pub fn new(config: ManyBodyConfig) -> Self {
        Self { config }
    }
}

impl Force for ManyBodyForce {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&mut self, nodes: &mut [Node], alpha: f64, jitter: &mut Jitter) {
        let n = nodes.len();
        if n < 2 {
            return;
        }

        let distance_min2 = self.config.distance_min * self.config.distance_min;
        let distance_max2 = self.config.distance_max * self.config.distance_max;
        let weight = self.config.strength * alpha;

        // Positions are read-only during this force, so snapshot them and
        // accumulate into velocities in one sweep.
        let positions: Vec<(f64, f64)> = nodes.iter().map(|node| (node.x, node.y)).collect();

        for (i, node) in nodes.iter_mut().enumerate() {
            let (xi, yi) = positions[i];
            for (j, &(xj, yj)) in positions.iter().enumerate() {
                if i == j {
                    continue;
                }

                let mut dx = xj - xi;
                let mut dy = yj - yi;
                let mut l = dx * dx + dy * dy;
                if l >= distance_max2 {
                    continue;
                }

                // Zero offset on an axis: jiggle it.
                if dx == 0.0 {
                    dx = jitter.jiggle();
                    l += dx * dx;
                }
                if dy == 0.0 {
                    dy = jitter.jiggle();
                    l += dy * dy;
                }
                if l < distance_min2 {
                    l = (distance_min2 * l).sqrt();
                }

                node.vx += dx * weight / l;
                node.vy += dy * weight / l;
            }
        }
    }

    fn parameter(&self, name: &str) -> LayoutResult<f64> {
        match name {
            "strength" => Ok(self.config.strength),
            "distance_min" => Ok(self.config.distance_min),
            "distance_max" => Ok(self.config.distance_max),
            _ => Err(LayoutError::unknown_parameter(Self::NAME, name)),
        }
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> LayoutResult<()> {
        match name {
            "strength" => self.config.strength = require_finite(name, value)?,
            "distance_min" => self.config.distance_min = check_distance_min(value)?,
            "distance_max" => self.config.distance_max = check_distance_max(value)?,
            _ => return Err(LayoutError::unknown_parameter(Self::NAME, name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;

    fn pair(ax: f64, bx: f64) -> Vec<Node> {
        vec![
            Node::new(NodeId::Index(0), 0, ax, 0.0),
            Node::new(NodeId::Index(1), 1, bx, 0.0),
        ]
    }

    #[test]
    fn test_negative_strength_repels() {
        let mut nodes = pair(0.0, 10.0);
        let mut force = ManyBodyForce::new(ManyBodyConfig::default());
        force.apply(&mut nodes, 1.0, &mut Jitter::default());

        // -30 * 1 * 10 / 100
        assert!((nodes[0].vx - -3.0).abs() < 1e-12);
        assert!((nodes[1].vx - 3.0).abs() < 1e-12);
        // dy == 0 takes a jiggle, so vy is tiny rather than zero.
        assert!(nodes[0].vy.abs() < 1e-9);
    }

    #[test]
    fn test_positive_strength_attracts() {
        let mut nodes = pair(0.0, 10.0);
        let mut force = ManyBodyForce::new(ManyBodyConfig {
            strength: 30.0,
            ..ManyBodyConfig::default()
        });
        force.apply(&mut nodes, 1.0, &mut Jitter::default());

        assert!(nodes[0].vx > 0.0);
        assert!(nodes[1].vx < 0.0);
    }

    #[test]
    fn test_scales_with_alpha() {
        let mut hot = pair(0.0, 10.0);
        let mut cool = pair(0.0, 10.0);
        let mut force = ManyBodyForce::new(ManyBodyConfig::default());
        force.apply(&mut hot, 1.0, &mut Jitter::default());
        force.apply(&mut cool, 0.25, &mut Jitter::default());

        assert!((hot[1].vx * 0.25 - cool[1].vx).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_nodes_get_finite_push() {
        let mut nodes = pair(5.0, 5.0);
        let mut force = ManyBodyForce::new(ManyBodyConfig::default());
        force.apply(&mut nodes, 1.0, &mut Jitter::new(3));

        for node in &nodes {
            assert!(node.vx.is_finite() && node.vy.is_finite());
        }
        assert!(nodes[0].vx != 0.0 || nodes[0].vy != 0.0);
    }

    #[test]
    fn test_distance_max_cuts_off() {
        let mut nodes = pair(0.0, 100.0);
        let mut force = ManyBodyForce::new(ManyBodyConfig {
            distance_max: 50.0,
            ..ManyBodyConfig::default()
        });
        force.apply(&mut nodes, 1.0, &mut Jitter::default());

        assert_eq!(nodes[0].vx, 0.0);
        assert_eq!(nodes[1].vx, 0.0);
    }

    #[test]
    fn test_pinned_node_still_pushes() {
        let mut nodes = pair(0.0, 10.0);
        nodes[0].pin(0.0, 0.0);
        let mut force = ManyBodyForce::new(ManyBodyConfig::default());
        force.apply(&mut nodes, 1.0, &mut Jitter::default());

        assert!(nodes[1].vx > 0.0);
    }

    #[test]
    fn test_parameters() {
        let mut force = ManyBodyForce::new(ManyBodyConfig::default());
        force.set_parameter("distance_max", f64::INFINITY).unwrap();
        assert!(force.set_parameter("distance_min", -1.0).is_err());
        assert!(force.set_parameter("distance_max", 0.0).is_err());
        force.set_parameter("strength", -80.0).unwrap();
        assert_eq!(force.parameter("strength").unwrap(), -80.0);
    }
}
