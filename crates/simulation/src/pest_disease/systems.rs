use bevy::prelude::*;

use crate::config::ModelConfig;
use crate::growth::GrowthModel;
use crate::RegisterSeasonState;
use crate::weather::DailyWeather;

use super::types::{AlertLevel, PestDiseaseModel};

// =============================================================================
// System
// =============================================================================

/// System: update gray mold risk and whitefly population, raise alerts.
///
/// Last engine of the day; reads today's canopy from the growth engine.
pub fn advance_pest_disease(
    config: Res<ModelConfig>,
    weather: Res<DailyWeather>,
    growth: Res<GrowthModel>,
    mut pests: ResMut<PestDiseaseModel>,
) {
    let record = pests.daily_update(
        &config,
        weather.humidity,
        weather.day_temp,
        weather.night_temp,
        growth.leaf_area_index,
    );

    for alert in &record.alerts {
        match alert.level {
            AlertLevel::High => warn!("Day {} ({}): {}", growth.day, weather.date, alert.message),
            AlertLevel::Warning => {
                info!("Day {} ({}): {}", growth.day, weather.date, alert.message)
            }
        }
    }
}

// =============================================================================
// Plugin
// =============================================================================

pub struct PestDiseasePlugin;

impl Plugin for PestDiseasePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PestDiseaseModel>()
            .register_season_state::<PestDiseaseModel>()
            .add_systems(
                crate::SimulationDay,
                advance_pest_disease.in_set(crate::SimulationSet::PestDisease),
            );
    }
}
