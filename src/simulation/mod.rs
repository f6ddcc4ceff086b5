//! Force simulation engine.
//!
//! A [`Simulation`] owns the graph, the force registry and the alpha
//! ("temperature") schedule. Callers drive it one synchronous [`step`] at a
//! time, usually once per animation frame, and may pin, unpin, reheat or cool
//! it between steps.
//!
//! [`step`]: Simulation::step

mod config;
mod engine;

pub use config::SimulationConfig;
pub use engine::{ObserverId, Phase, Simulation, StepResult};
