//! Per-day result records assembled after all three engines have run.

use bevy::prelude::*;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::growth::{GrowthModel, GrowthRecord, StageTransition};
use crate::pest_disease::{PestAlert, PestDiseaseModel, PestDiseaseRecord};
use crate::soil::{ManagementSuggestion, WaterFertilizerModel, WaterFertilizerRecord};
use crate::stage::GrowthStage;
use crate::weather::DailyWeather;
use crate::{RegisterSeasonState, SeasonState};

// ---------------------------------------------------------------------------
// Daily result
// ---------------------------------------------------------------------------

/// Everything the season produced on one day, in one flat record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyResult {
    pub date: NaiveDate,
    pub day: u32,
    pub stage: GrowthStage,
    pub daily_thermal_time: f64,
    pub cumulative_thermal_time: f64,
    pub leaf_area_index: f64,
    pub leaf_dry_matter: f64,
    pub stem_dry_matter: f64,
    pub fruit_dry_matter: f64,
    pub root_dry_matter: f64,
    pub total_dry_matter: f64,
    pub daily_dry_matter: f64,
    pub fruit_set_rate: f64,
    pub soil_ec: f64,
    pub soil_water_content: f64,
    pub water_uptake: f64,
    pub daily_k_uptake: f64,
    pub accumulated_k_uptake: f64,
    pub root_water_uptake_efficiency: f64,
    pub gray_mold_risk: f64,
    pub whitefly_population: f64,
    pub whitefly_generation: u32,
    pub days_high_risk: u32,
    pub stage_transition: Option<StageTransition>,
    pub alerts: Vec<PestAlert>,
    pub suggestions: Vec<ManagementSuggestion>,
}

impl DailyResult {
    pub fn assemble(
        weather: &DailyWeather,
        growth: &GrowthRecord,
        soil: &WaterFertilizerRecord,
        pests: &PestDiseaseRecord,
    ) -> Self {
        Self {
            date: weather.date,
            day: growth.day,
            stage: growth.stage,
            daily_thermal_time: growth.daily_thermal_time,
            cumulative_thermal_time: growth.cumulative_thermal_time,
            leaf_area_index: growth.leaf_area_index,
            leaf_dry_matter: growth.pools.leaf,
            stem_dry_matter: growth.pools.stem,
            fruit_dry_matter: growth.pools.fruit,
            root_dry_matter: growth.pools.root,
            total_dry_matter: growth.total_dry_matter,
            daily_dry_matter: growth.daily_dry_matter,
            fruit_set_rate: growth.fruit_set_rate,
            soil_ec: soil.soil_ec,
            soil_water_content: soil.soil_water_content,
            water_uptake: soil.water_uptake,
            daily_k_uptake: soil.daily_k_uptake,
            accumulated_k_uptake: soil.accumulated_k_uptake,
            root_water_uptake_efficiency: soil.root_water_uptake_efficiency,
            gray_mold_risk: pests.gray_mold_risk,
            whitefly_population: pests.whitefly_population,
            whitefly_generation: pests.whitefly_generation,
            days_high_risk: pests.days_high_risk,
            stage_transition: growth.stage_transition,
            alerts: pests.alerts.clone(),
            suggestions: soil.suggestions.clone(),
        }
    }
}

/// Soil suggestions and pest alerts raised on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAdvice {
    pub day: u32,
    pub date: NaiveDate,
    pub suggestions: Vec<ManagementSuggestion>,
    pub alerts: Vec<PestAlert>,
}

impl DayAdvice {
    pub fn len(&self) -> usize {
        self.suggestions.len() + self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty() && self.alerts.is_empty()
    }
}

impl From<&DailyResult> for DayAdvice {
    fn from(result: &DailyResult) -> Self {
        Self {
            day: result.day,
            date: result.date,
            suggestions: result.suggestions.clone(),
            alerts: result.alerts.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

/// Ordered daily results of the current run. One entry per simulated day.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    pub days: Vec<DailyResult>,
}

impl SimulationResults {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Result for day `day` (1-based days since planting).
    pub fn day(&self, day: u32) -> Option<&DailyResult> {
        self.days.iter().find(|r| r.day == day)
    }

    /// Suggestions and alerts raised on `day`.
    pub fn advice(&self, day: u32) -> Option<DayAdvice> {
        self.day(day).map(DayAdvice::from)
    }

    /// Every day of the run that raised at least one suggestion or alert.
    pub fn all_advice(&self) -> Vec<DayAdvice> {
        self.days
            .iter()
            .filter(|r| !r.suggestions.is_empty() || !r.alerts.is_empty())
            .map(DayAdvice::from)
            .collect()
    }

    pub fn total_alerts(&self) -> usize {
        self.days.iter().map(|r| r.alerts.len()).sum()
    }
}

impl SeasonState for SimulationResults {
    const NAME: &'static str = "simulation_results";

    fn initial(_config: &crate::config::ModelConfig) -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// System: merge the day's engine records into one [`DailyResult`].
pub fn record_daily_result(
    weather: Res<DailyWeather>,
    growth: Res<GrowthModel>,
    soil: Res<WaterFertilizerModel>,
    pests: Res<PestDiseaseModel>,
    mut results: ResMut<SimulationResults>,
) {
    let (Some(g), Some(s), Some(p)) = (
        growth.history.last(),
        soil.history.last(),
        pests.history.last(),
    ) else {
        warn!("Daily result skipped: an engine produced no record");
        return;
    };
    results.days.push(DailyResult::assemble(&weather, g, s, p));
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct ResultsPlugin;

impl Plugin for ResultsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationResults>()
            .register_season_state::<SimulationResults>()
            .add_systems(
                crate::SimulationDay,
                record_daily_result.in_set(crate::SimulationSet::PostSim),
            );
    }
}
