//! Deterministic daily ordering via a dedicated schedule and `SystemSet` phases.
//!
//! One simulated day is one run of the [`SimulationDay`] schedule. The schedule
//! uses the single-threaded executor and its phases are chained, so every
//! engine sees the finished output of the engines before it.
//!
//! ```text
//! Growth  →  WaterFertilizer  →  PestDisease  →  PostSim
//! ```
//!
//! * **Growth** – thermal time, stage, LAI, dry matter, fruit set.
//! * **WaterFertilizer** – root uptake, soil water, EC, potassium. Reads the
//!   canopy written by `Growth` on the same day.
//! * **PestDisease** – gray mold risk, whitefly population, alerts. Reads the
//!   same-day canopy.
//! * **PostSim** – assembly of the daily result record and invariant checks.
//!   These only *read* engine state.

use bevy::ecs::schedule::ScheduleLabel;
use bevy::prelude::*;

/// Schedule run exactly once per simulated day by the simulator.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationDay;

/// Ordered phases of the [`SimulationDay`] schedule.
///
/// Configured as a chain in `SimulationPlugin`. Feature plugins place their
/// systems with `.in_set(SimulationSet::X)`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Growth,
    WaterFertilizer,
    PestDisease,
    /// Read-only aggregation: result records, invariant checks.
    PostSim,
}
