//! Season summary over the daily result sequence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::results::DailyResult;
use crate::stage::GrowthStage;

/// Final, peak and mean value of one daily quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub final_value: f64,
    pub max: f64,
    pub mean: f64,
}

impl MetricStats {
    fn over(results: &[DailyResult], value: impl Fn(&DailyResult) -> f64) -> Self {
        let values: Vec<f64> = results.iter().map(value).collect();
        let final_value = values.last().copied().unwrap_or(0.0);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        Self {
            final_value,
            max: if max.is_finite() { max } else { final_value },
            mean,
        }
    }
}

/// How one growth stage played out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSummary {
    pub stage: GrowthStage,
    pub start_day: u32,
    pub end_day: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: u32,
    pub mean_leaf_area_index: f64,
    pub mean_total_dry_matter: f64,
}

/// Aggregate view of a completed (or partial) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub total_days: usize,
    pub final_stage: GrowthStage,
    pub cumulative_thermal_time: MetricStats,
    pub leaf_area_index: MetricStats,
    pub total_dry_matter: MetricStats,
    pub fruit_dry_matter: MetricStats,
    pub soil_ec: MetricStats,
    pub soil_water_content: MetricStats,
    pub gray_mold_risk: MetricStats,
    pub whitefly_population: MetricStats,
    /// Potassium taken up over the whole run (g/plant).
    pub total_k_uptake: f64,
    /// Stages reached, in season order.
    pub stages: Vec<StageSummary>,
    pub total_alerts: usize,
}

impl SimulationSummary {
    /// Summarize `results`. Fails with `NoResults` on an empty sequence.
    pub fn from_results(results: &[DailyResult]) -> Result<Self, SimulationError> {
        let last = results.last().ok_or(SimulationError::NoResults)?;

        let stages = GrowthStage::ALL
            .iter()
            .filter_map(|&stage| stage_summary(results, stage))
            .collect();

        Ok(Self {
            total_days: results.len(),
            final_stage: last.stage,
            cumulative_thermal_time: MetricStats::over(results, |r| r.cumulative_thermal_time),
            leaf_area_index: MetricStats::over(results, |r| r.leaf_area_index),
            total_dry_matter: MetricStats::over(results, |r| r.total_dry_matter),
            fruit_dry_matter: MetricStats::over(results, |r| r.fruit_dry_matter),
            soil_ec: MetricStats::over(results, |r| r.soil_ec),
            soil_water_content: MetricStats::over(results, |r| r.soil_water_content),
            gray_mold_risk: MetricStats::over(results, |r| r.gray_mold_risk),
            whitefly_population: MetricStats::over(results, |r| r.whitefly_population),
            total_k_uptake: last.accumulated_k_uptake,
            stages,
            total_alerts: results.iter().map(|r| r.alerts.len()).sum(),
        })
    }
}

fn stage_summary(results: &[DailyResult], stage: GrowthStage) -> Option<StageSummary> {
    let days: Vec<&DailyResult> = results.iter().filter(|r| r.stage == stage).collect();
    let first = days.iter().min_by_key(|r| r.day)?;
    let last = days.iter().max_by_key(|r| r.day)?;
    let n = days.len() as f64;
    Some(StageSummary {
        stage,
        start_day: first.day,
        end_day: last.day,
        start_date: first.date,
        end_date: last.date,
        duration_days: last.day.saturating_sub(first.day) + 1,
        mean_leaf_area_index: days.iter().map(|r| r.leaf_area_index).sum::<f64>() / n,
        mean_total_dry_matter: days.iter().map(|r| r.total_dry_matter).sum::<f64>() / n,
    })
}
