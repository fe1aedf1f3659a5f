//! Running days and reading engine state for `TestGreenhouse`.

use bevy::prelude::*;

use crate::growth::GrowthModel;
use crate::invariant_checks::InvariantViolations;
use crate::pest_disease::PestDiseaseModel;
use crate::results::DailyResult;
use crate::soil::WaterFertilizerModel;
use crate::weather::WeatherRecord;

use super::{TestGreenhouse, REFERENCE_DAY};

impl TestGreenhouse {
    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Append `records` to the current run, one day each.
    ///
    /// Panics on an incomplete record; use the simulator directly to test
    /// error paths.
    pub fn run_days(&mut self, records: &[WeatherRecord]) -> &mut Self {
        for (i, record) in records.iter().enumerate() {
            if let Err(e) = self.sim.step(record) {
                panic!("day {} failed: {e}", i + 1);
            }
        }
        self
    }

    /// Append `n` identical days.
    pub fn run_constant_days(
        &mut self,
        n: usize,
        day_temp: f64,
        night_temp: f64,
        humidity: f64,
        par: f64,
        co2: f64,
    ) -> &mut Self {
        let records = vec![WeatherRecord::new(day_temp, night_temp, humidity, par, co2); n];
        self.run_days(&records)
    }

    /// Append `n` days of the reference climate.
    pub fn run_reference_days(&mut self, n: usize) -> &mut Self {
        let (day, night, humidity, par, co2) = REFERENCE_DAY;
        self.run_constant_days(n, day, night, humidity, par, co2)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn growth(&self) -> &GrowthModel {
        self.sim.growth()
    }

    pub fn soil(&self) -> &WaterFertilizerModel {
        self.sim.soil()
    }

    pub fn pests(&self) -> &PestDiseaseModel {
        self.sim.pests()
    }

    pub fn results(&self) -> &[DailyResult] {
        self.sim.results()
    }

    /// Result for 1-based `day`. Panics if that day has not been simulated.
    pub fn day(&self, day: u32) -> &DailyResult {
        match self.results().iter().find(|r| r.day == day) {
            Some(r) => r,
            None => panic!("day {day} not simulated ({} days so far)", self.results().len()),
        }
    }

    pub fn violations(&self) -> &InvariantViolations {
        self.sim.invariant_violations()
    }

    /// Any resource in the simulator's world.
    pub fn resource<T: Resource>(&self) -> &T {
        self.sim.world().resource::<T>()
    }
}
