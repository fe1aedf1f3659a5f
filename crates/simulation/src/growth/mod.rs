//! Crop growth and development: thermal time, phenology, canopy expansion,
//! photosynthesis, dry matter partitioning and fruit set.

mod helpers;
mod systems;
mod tests;
pub mod types;

pub use helpers::{
    allocation_ratios, co2_factor, daily_thermal_time, fruit_set_rate, leaf_area_index,
    light_interception, maintenance_respiration, net_assimilation,
    photosynthesis_temperature_factor, stage_for_thermal_time,
};
pub use systems::{advance_growth, GrowthPlugin};
pub use types::{
    AllocationRatios, CanopyState, DryMatterPools, GrowthModel, GrowthRecord, StageTransition,
};
