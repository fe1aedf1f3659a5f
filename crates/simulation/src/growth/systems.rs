use bevy::prelude::*;

use crate::config::ModelConfig;
use crate::RegisterSeasonState;
use crate::weather::DailyWeather;

use super::types::GrowthModel;

// =============================================================================
// System
// =============================================================================

/// System: advance thermal time, stage, canopy and dry matter by one day.
///
/// First engine of the day. The soil and pest engines read the canopy this
/// system leaves behind.
pub fn advance_growth(
    config: Res<ModelConfig>,
    weather: Res<DailyWeather>,
    mut growth: ResMut<GrowthModel>,
) {
    let record = growth.daily_update(
        &config,
        weather.day_temp,
        weather.night_temp,
        weather.par,
        weather.co2,
    );

    if let Some(transition) = record.stage_transition {
        info!(
            "Day {} ({}): stage {} -> {} at {:.1} °C·day",
            transition.day,
            weather.date,
            transition.from,
            transition.to,
            transition.cumulative_thermal_time
        );
    }
}

// =============================================================================
// Plugin
// =============================================================================

pub struct GrowthPlugin;

impl Plugin for GrowthPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GrowthModel>()
            .register_season_state::<GrowthModel>()
            .add_systems(
                crate::SimulationDay,
                advance_growth.in_set(crate::SimulationSet::Growth),
            );
    }
}
