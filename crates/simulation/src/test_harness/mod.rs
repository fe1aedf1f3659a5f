//! # TestGreenhouse: headless season harness
//!
//! Wraps a [`Simulator`] with a fluent builder so integration tests and
//! benches can set up a greenhouse, run days and assert on engine state
//! without repeating the plumbing.

mod assertions;
mod queries;

use crate::config::ModelConfig;
use crate::weather::CropManagement;
use crate::Simulator;

/// Reference climate: 23 °C day, 17 °C night, 70 % RH, 1000 μmol PAR, 750 ppm.
pub const REFERENCE_DAY: (f64, f64, f64, f64, f64) = (23.0, 17.0, 70.0, 1000.0, 750.0);

/// A greenhouse season under test.
///
/// Build it with `new()` and the `with_*` methods, then call `run_days()` or
/// `run_reference_days()` to advance and query/assert the resulting state.
pub struct TestGreenhouse {
    sim: Simulator,
}

impl Default for TestGreenhouse {
    fn default() -> Self {
        Self::new()
    }
}

impl TestGreenhouse {
    /// Default model parameters and default crop management.
    pub fn new() -> Self {
        Self {
            sim: Simulator::default(),
        }
    }

    /// Replace the model parameters. Engines restart from the new config.
    pub fn with_config(mut self, config: ModelConfig) -> Self {
        let management = self.sim.management().clone();
        self.sim = Simulator::with_management(config, management);
        self
    }

    /// Replace the irrigation and fertigation settings for later days.
    pub fn with_management(mut self, management: CropManagement) -> Self {
        self.sim.world_mut().insert_resource(management);
        self
    }

    /// Raise the gray mold base risk so saturated, cool days cross the
    /// high-risk threshold from the first day.
    pub fn with_gray_mold_base_risk(self, base: f64) -> Self {
        let mut config = self.sim.config().clone();
        config.pest.gray_mold_risk_base = base;
        self.with_config(config)
    }

    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    pub fn simulator_mut(&mut self) -> &mut Simulator {
        &mut self.sim
    }
}
