//! Centering force.
//!
//! Nudges every node's velocity by the same amount, proportional to the
//! offset between the centroid and the target point. The whole layout
//! translates toward the target; relative positions are untouched.

use serde::{Deserialize, Serialize};

use super::{Force, Jitter, require_finite, require_range};
use crate::error::{LayoutError, LayoutResult};
use crate::graph::Node;

/// Configuration for the centering force.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterConfig {
    /// Fraction of the centroid offset added to velocity each step (default: 0.1).
    pub strength: f64,
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self { strength: 0.1 }
    }
}

impl CenterConfig {
    pub fn validate(&self) -> LayoutResult<()> {
        require_range("strength", self.strength, 0.0, 1.0)?;
        Ok(())
    }
}

/// Pulls the centroid of the node set toward `(x, y)`.
#[derive(Debug, Clone)]
pub struct CenterForce {
    x: f64,
    y: f64,
    config: CenterConfig,
}

impl CenterForce {
    pub const NAME: &'static str = "center";

    pub fn new(x: f64, y: f64, config: CenterConfig) -> Self {
        Self { x, y, config }
    }

    /// Target point.
    pub fn target(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl Force for CenterForce {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&mut self, nodes: &mut [Node], _alpha: f64, _jitter: &mut Jitter) {
        if nodes.is_empty() {
            return;
        }

        let n = nodes.len() as f64;
        let (sx, sy) = nodes
            .iter()
            .fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
        let dvx = (self.x - sx / n) * self.config.strength;
        let dvy = (self.y - sy / n) * self.config.strength;

        for node in nodes {
            node.vx += dvx;
            node.vy += dvy;
        }
    }

    fn parameter(&self, name: &str) -> LayoutResult<f64> {
        match name {
            "x" => Ok(self.x),
            "y" => Ok(self.y),
            "strength" => Ok(self.config.strength),
            _ => Err(LayoutError::unknown_parameter(Self::NAME, name)),
        }
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> LayoutResult<()> {
        match name {
            "x" => self.x = require_finite(name, value)?,
            "y" => self.y = require_finite(name, value)?,
            "strength" => self.config.strength = require_range(name, value, 0.0, 1.0)?,
            _ => return Err(LayoutError::unknown_parameter(Self::NAME, name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;

    fn nodes(points: &[(f64, f64)]) -> Vec<Node> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Node::new(NodeId::Index(i as u64), i, x, y))
            .collect()
    }

    #[test]
    fn test_uniform_nudge_toward_target() {
        let mut nodes = nodes(&[(0.0, 0.0), (20.0, 0.0), (10.0, 30.0)]);
        let mut force = CenterForce::new(110.0, 60.0, CenterConfig { strength: 0.5 });
        force.apply(&mut nodes, 1.0, &mut Jitter::default());

        // centroid (10, 10), offset (100, 50), half of it
        for node in &nodes {
            assert_eq!((node.vx, node.vy), (50.0, 25.0));
        }
    }

    #[test]
    fn test_centered_layout_unchanged() {
        let mut nodes = nodes(&[(-5.0, 0.0), (5.0, 0.0)]);
        let mut force = CenterForce::new(0.0, 0.0, CenterConfig::default());
        force.apply(&mut nodes, 1.0, &mut Jitter::default());

        assert!(nodes.iter().all(|n| n.vx == 0.0 && n.vy == 0.0));
    }

    #[test]
    fn test_empty_is_noop() {
        let mut force = CenterForce::new(1.0, 1.0, CenterConfig::default());
        force.apply(&mut [], 1.0, &mut Jitter::default());
    }

    #[test]
    fn test_parameters() {
        let mut force = CenterForce::new(0.0, 0.0, CenterConfig::default());
        force.set_parameter("x", 400.0).unwrap();
        force.set_parameter("y", 300.0).unwrap();
        assert_eq!(force.target(), (400.0, 300.0));
        assert!(force.set_parameter("strength", -1.0).is_err());
        assert!(force.parameter("radius").is_err());
    }
}
