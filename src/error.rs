//! Error types for graph construction and simulation control.
//!
//! All fatal conditions are detected when a [`Simulation`](crate::simulation::Simulation)
//! is constructed. Stepping never fails; the remaining variants are
//! recoverable errors reported by control calls (pin, reheat, live tuning).

use thiserror::Error;

use crate::graph::NodeId;

/// Root error type for graph construction and simulation control.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// An edge names a node that is not in the node set.
    #[error("edge {edge} references missing node {missing}")]
    DanglingReference { edge: usize, missing: NodeId },

    /// Two input nodes share the same identifier.
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    /// A control call named a node that is not in the node set.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// No force is registered under this name.
    #[error("unknown force \"{0}\"")]
    UnknownForce(String),

    /// The force exists but has no parameter with this name.
    #[error("force \"{force}\" has no parameter \"{parameter}\"")]
    UnknownParameter { force: String, parameter: String },

    /// The value is non-finite or outside the parameter's domain.
    #[error("invalid value {value} for \"{parameter}\"")]
    InvalidParameter { parameter: String, value: f64 },
}

/// Convenience alias used throughout the crate.
pub type LayoutResult<T> = Result<T, LayoutError>;

impl LayoutError {
    pub(crate) fn invalid(parameter: &str, value: f64) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            value,
        }
    }

    pub(crate) fn unknown_parameter(force: &str, parameter: &str) -> Self {
        Self::UnknownParameter {
            force: force.to_string(),
            parameter: parameter.to_string(),
        }
    }
}
