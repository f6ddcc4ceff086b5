//! Forces and the force registry.
//!
//! A force reads node positions and adds to node velocities. It never writes
//! positions; the simulation integrates velocities after every registered
//! force has run. Forces run in a fixed order so a seeded run is
//! reproducible:
//!
//! 1. `center` - pull the centroid toward a target point
//! 2. `charge` - all-pairs repulsion (or attraction)
//! 3. `collide` - push overlapping disks apart
//! 4. `link` - springs along edges

pub mod center;
pub mod collide;
mod jitter;
pub mod link;
pub mod many_body;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};
use crate::graph::{Graph, Node};

pub use center::{CenterConfig, CenterForce};
pub use collide::{CollideConfig, CollideForce};
pub use jitter::Jitter;
pub use link::{LinkConfig, LinkForce};
pub use many_body::{ManyBodyConfig, ManyBodyForce};

/// A force applied once per simulation step.
pub trait Force {
    /// Registry name, e.g. `"charge"`.
    fn name(&self) -> &str;

    /// Refresh any state derived from the graph (edges, degrees).
    ///
    /// Called when the force is registered and after every parameter change.
    fn initialize(&mut self, _graph: &Graph) {}

    /// Add this force's contribution to `vx`/`vy` of every node.
    fn apply(&mut self, nodes: &mut [Node], alpha: f64, jitter: &mut Jitter);

    /// Read a parameter by name.
    fn parameter(&self, name: &str) -> LayoutResult<f64>;

    /// Change a parameter by name.
    fn set_parameter(&mut self, name: &str, value: f64) -> LayoutResult<()>;
}

/// Which built-in forces to register and how to tune them.
///
/// `None` leaves a force out. The defaults reproduce the classic small-graph
/// tuning: charge -30, collision radius 20 at strength 0.7, link distance 80.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    pub center: Option<CenterConfig>,
    pub charge: Option<ManyBodyConfig>,
    pub collide: Option<CollideConfig>,
    pub link: Option<LinkConfig>,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            center: Some(CenterConfig::default()),
            charge: Some(ManyBodyConfig::default()),
            collide: Some(CollideConfig::default()),
            link: Some(LinkConfig::default()),
        }
    }
}

impl ForceConfig {
    /// No forces at all.
    pub fn none() -> Self {
        Self {
            center: None,
            charge: None,
            collide: None,
            link: None,
        }
    }

    pub fn with_center(mut self, config: CenterConfig) -> Self {
        self.center = Some(config);
        self
    }

    pub fn with_charge(mut self, config: ManyBodyConfig) -> Self {
        self.charge = Some(config);
        self
    }

    pub fn with_collide(mut self, config: CollideConfig) -> Self {
        self.collide = Some(config);
        self
    }

    pub fn with_link(mut self, config: LinkConfig) -> Self {
        self.link = Some(config);
        self
    }

    /// Check every enabled force's parameters.
    pub fn validate(&self) -> LayoutResult<()> {
        if let Some(c) = &self.center {
            c.validate()?;
        }
        if let Some(c) = &self.charge {
            c.validate()?;
        }
        if let Some(c) = &self.collide {
            c.validate()?;
        }
        if let Some(c) = &self.link {
            c.validate()?;
        }
        Ok(())
    }
}

/// Ordered, named collection of forces.
#[derive(Default)]
pub struct ForceRegistry {
    forces: Vec<Box<dyn Force>>,
}

impl ForceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { forces: Vec::new() }
    }

    /// Build the built-in forces described by `config`, in canonical order.
    pub fn from_config(
        config: &ForceConfig,
        center: (f64, f64),
        graph: &Graph,
    ) -> LayoutResult<Self> {
        config.validate()?;

        let mut registry = Self::new();
        if let Some(c) = &config.center {
            registry.register(Box::new(CenterForce::new(center.0, center.1, c.clone())), graph);
        }
        if let Some(c) = &config.charge {
            registry.register(Box::new(ManyBodyForce::new(c.clone())), graph);
        }
        if let Some(c) = &config.collide {
            registry.register(Box::new(CollideForce::new(c.clone())), graph);
        }
        if let Some(c) = &config.link {
            registry.register(Box::new(LinkForce::new(c.clone())), graph);
        }
        Ok(registry)
    }

    /// Add a force, replacing any force with the same name in place.
    ///
    /// New names are appended, so they run after the built-ins.
    pub fn register(&mut self, mut force: Box<dyn Force>, graph: &Graph) {
        force.initialize(graph);
        match self.position(force.name()) {
            Some(i) => self.forces[i] = force,
            None => self.forces.push(force),
        }
    }

    /// Remove a force by name. Returns true if it was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(i) => {
                self.forces.remove(i);
                true
            }
            None => false,
        }
    }

    /// Registered names in application order.
    pub fn names(&self) -> Vec<&str> {
        self.forces.iter().map(|f| f.name()).collect()
    }

    /// Number of registered forces.
    pub fn len(&self) -> usize {
        self.forces.len()
    }

    /// Check if no forces are registered.
    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Read a force parameter.
    pub fn parameter(&self, force: &str, parameter: &str) -> LayoutResult<f64> {
        let i = self
            .position(force)
            .ok_or_else(|| LayoutError::UnknownForce(force.to_string()))?;
        self.forces[i].parameter(parameter)
    }

    /// Change a force parameter and re-derive the force's cached state.
    pub fn set_parameter(
        &mut self,
        force: &str,
        parameter: &str,
        value: f64,
        graph: &Graph,
    ) -> LayoutResult<()> {
        let i = self
            .position(force)
            .ok_or_else(|| LayoutError::UnknownForce(force.to_string()))?;
        self.forces[i].set_parameter(parameter, value)?;
        self.forces[i].initialize(graph);
        Ok(())
    }

    /// Run every force once, in order.
    pub fn apply_all(&mut self, nodes: &mut [Node], alpha: f64, jitter: &mut Jitter) {
        for force in &mut self.forces {
            force.apply(nodes, alpha, jitter);
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.forces.iter().position(|f| f.name() == name)
    }
}

// =========================================================================
// Parameter validation
// =========================================================================

pub(crate) fn require_finite(parameter: &str, value: f64) -> LayoutResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LayoutError::invalid(parameter, value))
    }
}

pub(crate) fn require_range(parameter: &str, value: f64, min: f64, max: f64) -> LayoutResult<f64> {
    if value >= min && value <= max {
        Ok(value)
    } else {
        Err(LayoutError::invalid(parameter, value))
    }
}

/// Upper bound on relaxation passes per step.
pub const MAX_ITERATIONS: usize = 100;

pub(crate) fn require_iterations(parameter: &str, value: f64) -> LayoutResult<usize> {
    if value >= 1.0 && value <= MAX_ITERATIONS as f64 && value.fract() == 0.0 {
        Ok(value as usize)
    } else {
        Err(LayoutError::invalid(parameter, value))
    }
}
