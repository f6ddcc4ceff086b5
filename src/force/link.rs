//! Link (spring) force.
//!
//! Each edge pulls or pushes its endpoints toward a target separation. By
//! default the spring strength of an edge is `1 / min(deg(source), deg(target))`
//! and the correction is split between the endpoints in proportion to the
//! *other* endpoint's share of the total degree, so hubs barely move while
//! leaves do most of the travelling.

use serde::{Deserialize, Serialize};

use super::{Force, Jitter, require_iterations};
use crate::error::{LayoutError, LayoutResult};
use crate::graph::{Edge, Graph, Node};

/// Configuration for the link force.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Target separation of linked nodes (default: 80).
    pub distance: f64,
    /// Fixed strength for every edge. `None` uses the inverse-degree default.
    pub strength: Option<f64>,
    /// Passes per step (default: 1).
    pub iterations: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            distance: 80.0,
            strength: None,
            iterations: 1,
        }
    }
}

impl LinkConfig {
    pub fn validate(&self) -> LayoutResult<()> {
        check_non_negative("distance", self.distance)?;
        if let Some(strength) = self.strength {
            check_non_negative("strength", strength)?;
        }
        require_iterations("iterations", self.iterations as f64)?;
        Ok(())
    }
}

fn check_non_negative(parameter: &str, value: f64) -> LayoutResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::invalid(parameter, value))
    }
}

/// Per-edge values derived from the graph at initialization.
#[derive(Debug, Clone, Copy)]
struct Spring {
    edge: Edge,
    strength: f64,
    /// Share of the correction taken by the target.
    bias: f64,
}

/// Spring force along every edge.
#[derive(Debug, Clone)]
pub struct LinkForce {
    config: LinkConfig,
    springs: Vec<Spring>,
}

impl LinkForce {
    pub const NAME: &'static str = "link";

    pub fn new(config: LinkConfig) -> Self {
        Self {
            config,
            springs: Vec::new(),
        }
    }

    /// Strength of the edge at `index` in the input link list.
    pub fn edge_strength(&self, index: usize) -> Option<f64> {
        self.springs.get(index).map(|s| s.strength)
    }

    fn spring(&self, edge: &Edge, degrees: &[usize]) -> Spring {
        let ds = degrees[edge.source] as f64;
        let dt = degrees[edge.target] as f64;
        Spring {
            edge: *edge,
            strength: self.config.strength.unwrap_or(1.0 / ds.min(dt)),
            bias: ds / (ds + dt),
        }
    }
}

impl Force for LinkForce {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn initialize(&mut self, graph: &Graph) {
        let degrees = graph.degrees();
        self.springs = graph
            .edges()
            .iter()
            .map(|edge| self.spring(edge, &degrees))
            .collect();
    }

    fn apply(&mut self, nodes: &mut [Node], alpha: f64, jitter: &mut Jitter) {
        let distance = self.config.distance;

        for _ in 0..self.config.iterations {
            for spring in &self.springs {
                // A self-loop has no separation to correct.
                if spring.edge.is_self_loop() {
                    continue;
                }
                let Edge { source, target, .. } = spring.edge;
                let (s, t) = (&nodes[source], &nodes[target]);

                let mut dx = t.x + t.vx - s.x - s.vx;
                let mut dy = t.y + t.vy - s.y - s.vy;
                if dx == 0.0 {
                    dx = jitter.jiggle();
                }
                if dy == 0.0 {
                    dy = jitter.jiggle();
                }

                let l = (dx * dx + dy * dy).sqrt();
                let scale = (l - distance) / l * alpha * spring.strength;
                dx *= scale;
                dy *= scale;

                let t = &mut nodes[target];
                t.vx -= dx * spring.bias;
                t.vy -= dy * spring.bias;

                let s = &mut nodes[source];
                s.vx += dx * (1.0 - spring.bias);
                s.vy += dy * (1.0 - spring.bias);
            }
        }
    }

    fn parameter(&self, name: &str) -> LayoutResult<f64> {
        match name {
            "distance" => Ok(self.config.distance),
            // NaN reports "inverse-degree default".
            "strength" => Ok(self.config.strength.unwrap_or(f64::NAN)),
            "iterations" => Ok(self.config.iterations as f64),
            _ => Err(LayoutError::unknown_parameter(Self::NAME, name)),
        }
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> LayoutResult<()> {
        match name {
            "distance" => self.config.distance = check_non_negative(name, value)?,
            // NaN restores the inverse-degree default.
            "strength" if value.is_nan() => self.config.strength = None,
            "strength" => self.config.strength = Some(check_non_negative(name, value)?),
            "iterations" => self.config.iterations = require_iterations(name, value)?,
            _ => return Err(LayoutError::unknown_parameter(Self::NAME, name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphData, GraphNode, GraphLink};

    fn line(ax: f64, bx: f64) -> Graph {
        let data = GraphData {
            nodes: vec![GraphNode::new(0u64).at(ax, 0.0), GraphNode::new(1u64).at(bx, 0.0)],
            links: vec![GraphLink::new(0u64, 1u64)],
        };
        Graph::from_data(&data, (0.0, 0.0)).unwrap()
    }

    #[test]
    fn test_inverse_degree_strength() {
        // Star: 0 is a hub with three leaves, plus 1-2 linked.
        let data = GraphData::from_pairs(4, &[(0, 1), (0, 2), (0, 3), (1, 2)]);
        let graph = Graph::from_data(&data, (0.0, 0.0)).unwrap();
        let mut force = LinkForce::new(LinkConfig::default());
        force.initialize(&graph);

        // deg: 0 -> 3, 1 -> 2, 2 -> 2, 3 -> 1
        assert_eq!(force.edge_strength(0), Some(0.5));
        assert_eq!(force.edge_strength(2), Some(1.0));
        assert_eq!(force.edge_strength(3), Some(0.5));
        assert_eq!(force.edge_strength(4), None);
    }

    #[test]
    fn test_stretched_edge_pulls_together() {
        let graph = line(0.0, 200.0);
        let mut nodes = graph.nodes().to_vec();
        let mut force = LinkForce::new(LinkConfig::default());
        force.initialize(&graph);
        force.apply(&mut nodes, 1.0, &mut Jitter::default());

        // Error of 120 split evenly between equal-degree endpoints.
        assert!((nodes[0].vx - 60.0).abs() < 1e-9);
        assert!((nodes[1].vx + 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_compressed_edge_pushes_apart() {
        let graph = line(0.0, 20.0);
        let mut nodes = graph.nodes().to_vec();
        let mut force = LinkForce::new(LinkConfig::default());
        force.initialize(&graph);
        force.apply(&mut nodes, 0.5, &mut Jitter::default());

        assert!(nodes[0].vx < 0.0);
        assert!(nodes[1].vx > 0.0);
    }

    #[test]
    fn test_hub_moves_less_than_leaf() {
        let data = GraphData {
            nodes: vec![
                GraphNode::new(0u64).at(0.0, 0.0),
                GraphNode::new(1u64).at(300.0, 0.0),
                GraphNode::new(2u64).at(-300.0, 1.0),
                GraphNode::new(3u64).at(0.0, 300.0),
            ],
            links: vec![
                GraphLink::new(0u64, 1u64),
                GraphLink::new(0u64, 2u64),
                GraphLink::new(0u64, 3u64),
            ],
        };
        let graph = Graph::from_data(&data, (0.0, 0.0)).unwrap();
        let mut nodes = graph.nodes().to_vec();
        let mut force = LinkForce::new(LinkConfig {
            iterations: 1,
            ..LinkConfig::default()
        });
        force.initialize(&graph);
        force.apply(&mut nodes, 1.0, &mut Jitter::default());

        let speed = |n: &Node| (n.vx * n.vx + n.vy * n.vy).sqrt();
        assert!(speed(&nodes[1]) > speed(&nodes[0]));
    }

    #[test]
    fn test_unlinked_node_untouched() {
        let data = GraphData::from_pairs(3, &[(0, 1)]);
        let graph = Graph::from_data(&data, (0.0, 0.0)).unwrap();
        let mut nodes = graph.nodes().to_vec();
        let mut force = LinkForce::new(LinkConfig::default());
        force.initialize(&graph);
        force.apply(&mut nodes, 1.0, &mut Jitter::default());

        assert_eq!((nodes[2].vx, nodes[2].vy), (0.0, 0.0));
    }

    #[test]
    fn test_self_loop_ignored() {
        let data = GraphData::from_pairs(1, &[(0, 0)]);
        let graph = Graph::from_data(&data, (0.0, 0.0)).unwrap();
        let mut nodes = graph.nodes().to_vec();
        let mut force = LinkForce::new(LinkConfig::default());
        force.initialize(&graph);
        force.apply(&mut nodes, 1.0, &mut Jitter::default());

        assert_eq!((nodes[0].vx, nodes[0].vy), (0.0, 0.0));
    }

    #[test]
    fn test_strength_override_and_reset() {
        let graph = line(0.0, 100.0);
        let mut force = LinkForce::new(LinkConfig::default());

        force.set_parameter("strength", 0.25).unwrap();
        force.initialize(&graph);
        assert_eq!(force.edge_strength(0), Some(0.25));

        force.set_parameter("strength", f64::NAN).unwrap();
        force.initialize(&graph);
        assert_eq!(force.edge_strength(0), Some(1.0));
        assert!(force.parameter("strength").unwrap().is_nan());

        assert!(force.set_parameter("distance", -5.0).is_err());
    }
}
