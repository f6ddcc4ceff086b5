//! Simulation tuning.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};
use crate::force::require_range;

/// Alpha decay that takes alpha from 1 to `alpha_min` (0.001) in 300 steps.
fn default_alpha_decay() -> f64 {
    1.0 - 0.001f64.powf(1.0 / 300.0)
}

/// Configuration for the alpha schedule and integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Starting alpha (default: 1.0).
    pub alpha: f64,
    /// Below this the simulation counts as settled (default: 0.001).
    pub alpha_min: f64,
    /// Fraction of the gap to `alpha_target` closed each step (default: ~0.0228).
    pub alpha_decay: f64,
    /// Value alpha decays toward (default: 0).
    pub alpha_target: f64,
    /// Velocity multiplier applied before integrating (default: 0.6).
    /// Lower values damp motion harder.
    pub velocity_decay: f64,
    /// Seed for the jitter source used on coincident nodes (default: 1).
    pub seed: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            alpha_min: 0.001,
            alpha_decay: default_alpha_decay(),
            alpha_target: 0.0,
            velocity_decay: 0.6,
            seed: 1,
        }
    }
}

impl SimulationConfig {
    /// Config with a specific jitter seed.
    pub fn seeded(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> LayoutResult<()> {
        require_range("alpha", self.alpha, 0.0, 1.0)?;
        require_range("alpha_min", self.alpha_min, 0.0, 1.0)?;
        require_range("alpha_target", self.alpha_target, 0.0, 1.0)?;
        require_range("velocity_decay", self.velocity_decay, 0.0, 1.0)?;
        // Zero decay would freeze alpha forever.
        if !(self.alpha_decay > 0.0 && self.alpha_decay <= 1.0) {
            return Err(LayoutError::invalid("alpha_decay", self.alpha_decay));
        }
        Ok(())
    }
}
