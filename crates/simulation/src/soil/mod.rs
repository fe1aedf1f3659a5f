//! Root-zone water and nutrient dynamics: water uptake, soil water balance,
//! salinity (EC), potassium uptake and fertigation advice.

mod helpers;
mod systems;
pub mod types;

pub use helpers::{
    ec_balance, k_stage_demand, management_suggestions, potassium_uptake, root_uptake_efficiency,
    root_water_uptake, soil_water_balance, uptake_light_factor, uptake_salinity_factor,
    uptake_temperature_factor, uptake_water_factor,
};
pub use systems::{advance_water_fertilizer, WaterFertilizerPlugin};
pub use types::{
    ManagementSuggestion, SuggestionKind, SuggestionPriority, WaterFertilizerModel,
    WaterFertilizerRecord,
};
