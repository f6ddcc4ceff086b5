//! Graph input records.
//!
//! The schema is the minimal `{ nodes: [{ id }], links: [{ source, target }] }`
//! shape shared by most web graph tools. Nodes may optionally carry a
//! starting position and a starting pin.

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// A node in the input data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique identifier. Links reference nodes by this value.
    pub id: NodeId,
    /// Starting x position. Nodes without one are placed on a spiral.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Starting y position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Pinned x position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx: Option<f64>,
    /// Pinned y position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fy: Option<f64>,
}

impl GraphNode {
    /// A node with no starting position.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            x: None,
            y: None,
            fx: None,
            fy: None,
        }
    }

    /// Set the starting position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Start pinned at the given position.
    pub fn pinned(mut self, fx: f64, fy: f64) -> Self {
        self.fx = Some(fx);
        self.fy = Some(fy);
        self
    }
}

/// A link between two nodes, by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    /// Source node ID.
    pub source: NodeId,
    /// Target node ID.
    pub target: NodeId,
}

impl GraphLink {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

impl GraphData {
    /// Build from bare numeric ids and `(source, target)` pairs.
    pub fn from_pairs(node_count: u64, links: &[(u64, u64)]) -> Self {
        Self {
            nodes: (0..node_count).map(GraphNode::new).collect(),
            links: links
                .iter()
                .map(|&(source, target)| GraphLink::new(source, target))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_schema() {
        let json = r#"{
            "nodes": [{ "id": 0 }, { "id": "hub", "x": 4.0, "y": -2.0 }],
            "links": [{ "source": 0, "target": "hub" }]
        }"#;
        let data: GraphData = serde_json::from_str(json).unwrap();

        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.nodes[0], GraphNode::new(0u64));
        assert_eq!(data.nodes[1], GraphNode::new("hub").at(4.0, -2.0));
        assert_eq!(data.links, vec![GraphLink::new(0u64, "hub")]);
    }

    #[test]
    fn test_missing_links_defaults_to_empty() {
        let data: GraphData = serde_json::from_str(r#"{ "nodes": [{ "id": 1 }] }"#).unwrap();
        assert!(data.links.is_empty());
    }

    #[test]
    fn test_from_pairs() {
        let data = GraphData::from_pairs(12, &[(0, 5), (0, 4), (0, 3)]);
        assert_eq!(data.nodes.len(), 12);
        assert_eq!(data.links[2], GraphLink::new(0u64, 3u64));
    }
}
