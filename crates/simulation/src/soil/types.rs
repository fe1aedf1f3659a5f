use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::SeasonState;
use crate::growth::CanopyState;
use crate::weather::CropManagement;

use super::helpers::{
    ec_balance, management_suggestions, potassium_uptake, root_uptake_efficiency,
    root_water_uptake, soil_water_balance,
};

// =============================================================================
// Constants
// =============================================================================

/// Depth of the soil water bucket at field capacity (mm).
pub(crate) const BUCKET_DEPTH_MM: f64 = 100.0;

/// Potential root water uptake per unit LAI (mm/d).
pub(crate) const UPTAKE_PER_LAI_MM: f64 = 2.0;

/// EC added per irrigation event, as a fraction of the solution EC.
pub(crate) const FERTIGATION_EC_FRACTION: f64 = 0.1;

/// Fraction of soil EC removed per mm of water taken up.
pub(crate) const EC_UPTAKE_LOSS_RATE: f64 = 0.02;

/// Daily leaching/decay fraction of soil EC.
pub(crate) const EC_DECAY_RATE: f64 = 0.05;

/// Physical bounds of the simulated soil EC (mS/cm).
pub(crate) const EC_FLOOR: f64 = 0.5;
pub(crate) const EC_CEILING: f64 = 3.5;

/// Daily potassium uptake may exceed the configured peak by this factor.
pub(crate) const K_PEAK_MULTIPLIER: f64 = 1.5;

/// Root efficiency below which a root-health suggestion is raised.
pub(crate) const ROOT_EFFICIENCY_WARNING: f64 = 0.7;

// =============================================================================
// Suggestions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Fertilizer,
    Irrigation,
    RootHealth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionPriority {
    Medium,
    High,
}

/// A fertigation or irrigation adjustment derived from the soil state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagementSuggestion {
    pub kind: SuggestionKind,
    pub priority: SuggestionPriority,
    /// The soil value that triggered the suggestion.
    pub trigger_value: f64,
    pub message: String,
    pub actions: Vec<String>,
}

// =============================================================================
// Records
// =============================================================================

/// One day of root-zone water and nutrient dynamics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterFertilizerRecord {
    pub soil_ec: f64,
    pub soil_water_content: f64,
    /// Water taken up by the roots today (mm).
    pub water_uptake: f64,
    pub daily_k_uptake: f64,
    pub accumulated_k_uptake: f64,
    pub root_water_uptake_efficiency: f64,
    pub suggestions: Vec<ManagementSuggestion>,
}

// =============================================================================
// Resource
// =============================================================================

/// Root-zone state: salinity, moisture and cumulative potassium uptake.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterFertilizerModel {
    /// mS/cm, within `[0.5, 3.5]`.
    pub soil_ec: f64,
    /// Fraction of field capacity, within `[0, 1]`.
    pub soil_water_content: f64,
    pub accumulated_k_uptake: f64,
    pub daily_k_uptake: f64,
    pub root_water_uptake_efficiency: f64,
    pub history: Vec<WaterFertilizerRecord>,
}

impl WaterFertilizerModel {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            soil_ec: config.water.ec_opt,
            soil_water_content: config.water.initial_swc,
            accumulated_k_uptake: 0.0,
            daily_k_uptake: 0.0,
            root_water_uptake_efficiency: config.water.root_water_uptake_base,
            history: Vec::new(),
        }
    }

    pub fn reset(&mut self, config: &ModelConfig) {
        *self = Self::new(config);
    }

    /// Advance the root zone by one day.
    ///
    /// Uptake is driven by the soil state at the start of the day; potassium
    /// uptake sees the soil after today's irrigation and EC update.
    pub fn daily_update(
        &mut self,
        config: &ModelConfig,
        management: &CropManagement,
        canopy: CanopyState,
        day_temp: f64,
        par: f64,
    ) -> WaterFertilizerRecord {
        // 1. Root water uptake from yesterday's soil
        let water_uptake = root_water_uptake(
            config,
            canopy.leaf_area_index,
            self.soil_water_content,
            self.soil_ec,
            day_temp,
            par,
        );
        self.root_water_uptake_efficiency =
            root_uptake_efficiency(config, self.soil_water_content, self.soil_ec);

        // 2. Soil water balance
        let irrigation_mm = management.irrigation_frequency as f64 * management.irrigation_amount;
        self.soil_water_content =
            soil_water_balance(self.soil_water_content, irrigation_mm, water_uptake);

        // 3. Salinity
        self.soil_ec = ec_balance(
            self.soil_ec,
            management.fertilizer_ec,
            management.irrigation_frequency,
            water_uptake,
        );

        // 4. Potassium
        self.daily_k_uptake =
            potassium_uptake(config, self.soil_ec, self.soil_water_content, canopy.stage);
        self.accumulated_k_uptake += self.daily_k_uptake;

        // 5. Advice on the resulting state
        let suggestions = management_suggestions(
            config,
            self.soil_ec,
            self.soil_water_content,
            self.root_water_uptake_efficiency,
        );

        let record = WaterFertilizerRecord {
            soil_ec: self.soil_ec,
            soil_water_content: self.soil_water_content,
            water_uptake,
            daily_k_uptake: self.daily_k_uptake,
            accumulated_k_uptake: self.accumulated_k_uptake,
            root_water_uptake_efficiency: self.root_water_uptake_efficiency,
            suggestions,
        };
        self.history.push(record.clone());
        record
    }

    /// Suggestions for the current soil state without advancing the model.
    pub fn current_suggestions(&self, config: &ModelConfig) -> Vec<ManagementSuggestion> {
        management_suggestions(
            config,
            self.soil_ec,
            self.soil_water_content,
            self.root_water_uptake_efficiency,
        )
    }
}

impl SeasonState for WaterFertilizerModel {
    const NAME: &'static str = "water_fertilizer";

    fn initial(config: &ModelConfig) -> Self {
        Self::new(config)
    }
}

impl FromWorld for WaterFertilizerModel {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource::<ModelConfig>().cloned().unwrap_or_default();
        Self::new(&config)
    }
}
