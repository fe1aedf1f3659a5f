use bevy::prelude::*;

use crate::config::ModelConfig;
use crate::growth::GrowthModel;
use crate::RegisterSeasonState;
use crate::weather::{CropManagement, DailyWeather};

use super::types::{SuggestionPriority, WaterFertilizerModel};

// =============================================================================
// System
// =============================================================================

/// System: irrigate, update salinity and potassium uptake for the day.
///
/// Runs after growth so uptake follows today's canopy.
pub fn advance_water_fertilizer(
    config: Res<ModelConfig>,
    weather: Res<DailyWeather>,
    management: Res<CropManagement>,
    growth: Res<GrowthModel>,
    mut soil: ResMut<WaterFertilizerModel>,
) {
    let record = soil.daily_update(
        &config,
        &management,
        growth.canopy(),
        weather.day_temp,
        weather.par,
    );

    for suggestion in record
        .suggestions
        .iter()
        .filter(|s| s.priority == SuggestionPriority::High)
    {
        debug!("Day {} ({}): {}", growth.day, weather.date, suggestion.message);
    }
}

// =============================================================================
// Plugin
// =============================================================================

pub struct WaterFertilizerPlugin;

impl Plugin for WaterFertilizerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CropManagement>()
            .init_resource::<WaterFertilizerModel>()
            .register_season_state::<WaterFertilizerModel>()
            .add_systems(
                crate::SimulationDay,
                advance_water_fertilizer.in_set(crate::SimulationSet::WaterFertilizer),
            );
    }
}
