//! Simulation - the step integrator and alpha state machine.
//!
//! Each [`Simulation::step`]:
//! 1. runs every registered force, accumulating into node velocities
//! 2. integrates: free coordinates decay their velocity and move by it,
//!    pinned coordinates snap to the pin and drop their velocity
//! 3. moves alpha toward `alpha_target` by `alpha_decay`
//! 4. notifies step observers with a read-only view of the result
//!
//! Phases:
//! - `Active`: alpha is above `alpha_min`, or a reheat target keeps it there
//! - `Settling`: a reheat from rest was released with `cool()`, alpha decays
//! - `Cold`: alpha has reached `alpha_min`; positions have converged
//!
//! `Cold` is not terminal. Stepping still works, and `reheat` returns to
//! `Active` at any time. `cool()` goes back to the phase held before the
//! reheat, so a reheat/cool pair during the initial decay leaves it `Active`.

use log::{debug, info, warn};

use super::config::SimulationConfig;
use crate::error::{LayoutError, LayoutResult};
use crate::force::{Force, ForceConfig, ForceRegistry, Jitter, require_finite, require_range};
use crate::graph::{Edge, Graph, GraphData, Node, NodeId};
use crate::spatial::SpatialIndex;

/// Simulation state-machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Alpha has decayed to `alpha_min`.
    Cold,
    /// Alpha is above `alpha_min` or being held up by a reheat target.
    Active,
    /// A reheat from rest was released and alpha is decaying.
    Settling,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Cold => "cold",
            Phase::Active => "active",
            Phase::Settling => "settling",
        }
    }
}

/// Read-only view of the simulation after a step.
///
/// Borrows the live node and edge lists; nothing is copied.
#[derive(Debug, Clone, Copy)]
pub struct StepResult<'a> {
    pub nodes: &'a [Node],
    pub edges: &'a [Edge],
    pub alpha: f64,
    pub phase: Phase,
}

impl<'a> StepResult<'a> {
    /// Endpoint coordinates of every edge, in edge order.
    pub fn segments(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + 'a {
        let (nodes, edges) = (self.nodes, self.edges);
        edges.iter().map(move |edge| {
            let (s, t) = (&nodes[edge.source], &nodes[edge.target]);
            ((s.x, s.y), (t.x, t.y))
        })
    }
}

/// Handle returned by [`Simulation::on_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

impl ObserverId {
    /// Numeric handle, e.g. for handing to JavaScript.
    pub fn handle(self) -> u32 {
        self.0
    }

    pub fn from_handle(handle: u32) -> Self {
        Self(handle)
    }
}

type StepObserver = Box<dyn FnMut(&StepResult<'_>)>;

/// A force-directed layout simulation.
pub struct Simulation {
    graph: Graph,
    forces: ForceRegistry,
    config: SimulationConfig,
    alpha: f64,
    alpha_target: f64,
    phase: Phase,
    /// Phase before the outstanding reheat, restored by `cool()`.
    reheated_from: Option<Phase>,
    jitter: Jitter,
    observers: Vec<(ObserverId, StepObserver)>,
    next_observer: u32,
    steps: u64,
}

impl Simulation {
    /// Build a simulation with default alpha and integration settings.
    ///
    /// Fails if an edge references a missing node, a node id repeats, or a
    /// force parameter is out of range. No simulation exists on failure.
    pub fn new(
        data: &GraphData,
        forces: ForceConfig,
        center_x: f64,
        center_y: f64,
    ) -> LayoutResult<Self> {
        Self::with_config(data, forces, center_x, center_y, SimulationConfig::default())
    }

    /// Build a simulation with explicit alpha and integration settings.
    pub fn with_config(
        data: &GraphData,
        forces: ForceConfig,
        center_x: f64,
        center_y: f64,
        config: SimulationConfig,
    ) -> LayoutResult<Self> {
        config.validate()?;
        require_finite("center_x", center_x)?;
        require_finite("center_y", center_y)?;

        let graph = Graph::from_data(data, (center_x, center_y))?;
        let forces = ForceRegistry::from_config(&forces, (center_x, center_y), &graph)?;

        debug!(
            "simulation: {} nodes, {} edges, forces {:?}",
            graph.node_count(),
            graph.edge_count(),
            forces.names()
        );

        let phase = if config.alpha > config.alpha_min || config.alpha_target > config.alpha_min {
            Phase::Active
        } else {
            Phase::Cold
        };

        Ok(Self {
            graph,
            forces,
            alpha: config.alpha,
            alpha_target: config.alpha_target,
            phase,
            reheated_from: None,
            jitter: Jitter::new(config.seed),
            observers: Vec::new(),
            next_observer: 0,
            steps: 0,
            config,
        })
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Advance the simulation by one step.
    pub fn step(&mut self) -> StepResult<'_> {
        self.forces
            .apply_all(self.graph.nodes_mut(), self.alpha, &mut self.jitter);

        let velocity_decay = self.config.velocity_decay;
        for node in self.graph.nodes_mut() {
            integrate(node, velocity_decay);
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        self.steps += 1;
        if self.phase != Phase::Cold && self.is_below_alpha_min() {
            info!("simulation: settled after {} steps", self.steps);
            self.phase = Phase::Cold;
        }

        let view = StepResult {
            nodes: self.graph.nodes(),
            edges: self.graph.edges(),
            alpha: self.alpha,
            phase: self.phase,
        };
        for (_, observer) in &mut self.observers {
            observer(&view);
        }
        view
    }

    /// Advance by `steps` steps and return the final view.
    pub fn run(&mut self, steps: usize) -> StepResult<'_> {
        for _ in 1..steps {
            self.step();
        }
        if steps == 0 {
            return self.view();
        }
        self.step()
    }

    /// Current state without stepping.
    pub fn view(&self) -> StepResult<'_> {
        StepResult {
            nodes: self.graph.nodes(),
            edges: self.graph.edges(),
            alpha: self.alpha,
            phase: self.phase,
        }
    }

    /// Register a callback invoked after every completed step.
    ///
    /// Observers run in registration order and see post-integration state.
    pub fn on_step(&mut self, observer: impl FnMut(&StepResult<'_>) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Unregister a step callback. Returns true if it was registered.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    // =========================================================================
    // Alpha schedule
    // =========================================================================

    /// Raise the alpha target, typically when a drag starts.
    ///
    /// Alpha itself is not changed; it climbs toward the target over the
    /// following steps.
    pub fn reheat(&mut self, target: f64) -> LayoutResult<()> {
        if !(target > 0.0 && target <= 1.0) {
            return Err(LayoutError::invalid("alpha_target", target));
        }
        self.alpha_target = target;
        self.reheated_from.get_or_insert(self.phase);
        if self.phase != Phase::Active {
            info!("simulation: reheated to target {target}");
        }
        self.phase = Phase::Active;
        Ok(())
    }

    /// Release the alpha target, typically when a drag ends.
    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
        let resumed = match self.reheated_from.take() {
            Some(Phase::Active) => Phase::Active,
            Some(_) => Phase::Settling,
            None => self.phase,
        };
        self.phase = if self.alpha <= self.config.alpha_min {
            Phase::Cold
        } else {
            resumed
        };
    }

    /// Set alpha directly.
    pub fn set_alpha(&mut self, alpha: f64) -> LayoutResult<()> {
        self.alpha = require_range("alpha", alpha, 0.0, 1.0)?;
        self.phase = if self.is_below_alpha_min() {
            Phase::Cold
        } else {
            Phase::Active
        };
        Ok(())
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn alpha_min(&self) -> f64 {
        self.config.alpha_min
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Hint for renderers: nothing will visibly move until the next reheat
    /// or pin.
    pub fn is_settled(&self) -> bool {
        self.phase == Phase::Cold
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn is_below_alpha_min(&self) -> bool {
        self.alpha <= self.config.alpha_min && self.alpha_target <= self.config.alpha_min
    }

    // =========================================================================
    // Pinning
    // =========================================================================

    /// Fix a node at `(x, y)`. Takes effect at the next step.
    pub fn pin(&mut self, id: &NodeId, x: f64, y: f64) -> LayoutResult<()> {
        let node = self.graph.node_mut(id).inspect_err(|e| warn!("pin: {e}"))?;
        let x = require_finite("x", x)?;
        let y = require_finite("y", y)?;
        node.pin(x, y);
        Ok(())
    }

    /// Release a pinned node. Unpinning a free node is a no-op.
    pub fn unpin(&mut self, id: &NodeId) -> LayoutResult<()> {
        let node = self.graph.node_mut(id).inspect_err(|e| warn!("unpin: {e}"))?;
        node.unpin();
        Ok(())
    }

    // =========================================================================
    // Forces
    // =========================================================================

    /// Tune a force while the simulation runs.
    pub fn set_force_parameter(&mut self, force: &str, parameter: &str, value: f64) -> LayoutResult<()> {
        self.forces
            .set_parameter(force, parameter, value, &self.graph)?;
        debug!("simulation: {force}.{parameter} = {value}");
        Ok(())
    }

    /// Read a force parameter.
    pub fn force_parameter(&self, force: &str, parameter: &str) -> LayoutResult<f64> {
        self.forces.parameter(force, parameter)
    }

    /// Move the centering target.
    pub fn set_center(&mut self, x: f64, y: f64) -> LayoutResult<()> {
        self.set_force_parameter("center", "x", x)?;
        self.set_force_parameter("center", "y", y)
    }

    /// Register a custom force, or replace a force with the same name.
    pub fn add_force(&mut self, force: Box<dyn Force>) {
        self.forces.register(force, &self.graph);
    }

    /// Remove a force by name. Returns true if it was registered.
    pub fn remove_force(&mut self, name: &str) -> bool {
        self.forces.remove(name)
    }

    /// Registered force names in application order.
    pub fn force_names(&self) -> Vec<&str> {
        self.forces.names()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn nodes(&self) -> &[Node] {
        self.graph.nodes()
    }

    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &NodeId) -> LayoutResult<&Node> {
        self.graph.node(id)
    }

    /// Find the node closest to `(x, y)`, optionally only within `radius`.
    pub fn find(&self, x: f64, y: f64, radius: Option<f64>) -> Option<&Node> {
        let index = SpatialIndex::from_points(self.graph.nodes().iter().map(|n| (n.index, n.x, n.y)));
        let slot = match radius {
            Some(r) => index.nearest_within(x, y, r),
            None => index.nearest(x, y),
        }?;
        self.graph.nodes().get(slot)
    }
}

/// Move one node by its velocity, honouring pins per axis.
fn integrate(node: &mut Node, velocity_decay: f64) {
    match node.fx {
        Some(fx) => {
            node.x = fx;
            node.vx = 0.0;
        }
        None => {
            node.vx *= velocity_decay;
            node.x += node.vx;
        }
    }
    match node.fy {
        Some(fy) => {
            node.y = fy;
            node.vy = 0.0;
        }
        None => {
            node.vy *= velocity_decay;
            node.y += node.vy;
        }
    }
}
