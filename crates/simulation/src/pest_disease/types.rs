use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::SeasonState;

use super::helpers::{
    gray_mold_alert, gray_mold_risk, risk_level_for_gray_mold, risk_level_for_whitefly,
    whitefly_alert, whitefly_step,
};

// =============================================================================
// Constants
// =============================================================================

/// Gray mold risk at or above which a warning alert is raised.
pub const GRAY_MOLD_WARNING_RISK: f64 = 50.0;

/// Gray mold risk at or above which a day counts as high risk.
pub const GRAY_MOLD_HIGH_RISK: f64 = 70.0;

/// Whitefly count at or above which a warning alert is raised.
pub const WHITEFLY_WARNING_POPULATION: f64 = 50.0;

/// Whitefly count at or above which a high alert is raised.
pub const WHITEFLY_HIGH_POPULATION: f64 = 200.0;

/// Risk multiplier added per consecutive prior high-risk day.
pub(crate) const CONSECUTIVE_RISK_STEP: f64 = 0.1;

/// Daily whitefly mortality fraction.
pub(crate) const WHITEFLY_DAILY_MORTALITY: f64 = 0.05;

/// Days averaged by the risk summary.
pub(crate) const RISK_SUMMARY_WINDOW: usize = 7;

// =============================================================================
// Alerts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PestKind {
    GrayMold,
    Whitefly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Warning,
    High,
}

/// A pest or disease alert raised on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PestAlert {
    pub kind: PestKind,
    pub level: AlertLevel,
    /// Risk index (gray mold) or population (whitefly) that crossed the threshold.
    pub trigger_value: f64,
    /// Whitefly generation at the time of the alert.
    pub generation: Option<u32>,
    pub message: String,
    pub actions: Vec<String>,
}

/// Qualitative risk band used by [`RiskSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Recent pest/disease pressure at a glance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub gray_mold_level: RiskLevel,
    /// Mean gray mold risk over the last seven simulated days.
    pub gray_mold_recent_mean: f64,
    pub whitefly_level: RiskLevel,
    pub whitefly_population: f64,
    pub total_alerts: usize,
}

// =============================================================================
// Records
// =============================================================================

/// One day of pest and disease pressure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PestDiseaseRecord {
    pub gray_mold_risk: f64,
    pub whitefly_population: f64,
    pub whitefly_generation: u32,
    pub days_since_infestation: f64,
    /// Consecutive high-risk days preceding today, as used in today's risk.
    pub days_high_risk: u32,
    pub alerts: Vec<PestAlert>,
}

// =============================================================================
// Resource
// =============================================================================

/// Gray mold risk and whitefly population dynamics.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PestDiseaseModel {
    /// Risk index in `[0, 100]`.
    pub gray_mold_risk: f64,
    pub whitefly_population: f64,
    pub whitefly_generation: u32,
    /// Days into the current whitefly generation, always below the cycle
    /// length. Keeps the fractional part left by a non-integer cycle.
    pub days_since_infestation: f64,
    /// Length of the current run of days with risk at or above the high threshold.
    pub consecutive_high_risk_days: u32,
    pub history: Vec<PestDiseaseRecord>,
    pub alert_log: Vec<PestAlert>,
}

impl PestDiseaseModel {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            gray_mold_risk: 0.0,
            whitefly_population: config.pest.whitefly_base_population,
            whitefly_generation: 1,
            days_since_infestation: 0.0,
            consecutive_high_risk_days: 0,
            history: Vec::new(),
            alert_log: Vec::new(),
        }
    }

    pub fn reset(&mut self, config: &ModelConfig) {
        *self = Self::new(config);
    }

    /// Advance gray mold risk and the whitefly population by one day.
    pub fn daily_update(
        &mut self,
        config: &ModelConfig,
        humidity: f64,
        day_temp: f64,
        night_temp: f64,
        lai: f64,
    ) -> PestDiseaseRecord {
        let avg_temp = (day_temp + night_temp) / 2.0;

        // 1. Gray mold, amplified by the run of high-risk days before today
        let days_high_risk = self.consecutive_high_risk_days;
        self.gray_mold_risk = gray_mold_risk(config, humidity, avg_temp, lai, days_high_risk);
        if self.gray_mold_risk >= GRAY_MOLD_HIGH_RISK {
            self.consecutive_high_risk_days += 1;
        } else {
            self.consecutive_high_risk_days = 0;
        }

        // 2. Whitefly population and generation bookkeeping
        let step = whitefly_step(
            config,
            self.whitefly_population,
            avg_temp,
            self.days_since_infestation,
            1,
        );
        self.whitefly_population = step.population;
        self.whitefly_generation += step.generations_completed;
        self.days_since_infestation = step.days_since_infestation;

        // 3. Alerts
        let alerts: Vec<PestAlert> = [
            gray_mold_alert(self.gray_mold_risk),
            whitefly_alert(self.whitefly_population, self.whitefly_generation),
        ]
        .into_iter()
        .flatten()
        .collect();
        self.alert_log.extend(alerts.iter().cloned());

        let record = PestDiseaseRecord {
            gray_mold_risk: self.gray_mold_risk,
            whitefly_population: self.whitefly_population,
            whitefly_generation: self.whitefly_generation,
            days_since_infestation: self.days_since_infestation,
            days_high_risk,
            alerts,
        };
        self.history.push(record.clone());
        record
    }

    /// Alerts of one kind from the log, oldest first.
    pub fn alerts_of_kind(&self, kind: PestKind) -> Vec<&PestAlert> {
        self.alert_log.iter().filter(|a| a.kind == kind).collect()
    }

    /// Recent pressure summary. Empty history reads as low risk.
    pub fn risk_summary(&self) -> RiskSummary {
        let recent: Vec<f64> = self
            .history
            .iter()
            .rev()
            .take(RISK_SUMMARY_WINDOW)
            .map(|r| r.gray_mold_risk)
            .collect();
        let recent_mean = if recent.is_empty() {
            0.0
        } else {
            recent.iter().sum::<f64>() / recent.len() as f64
        };
        let whitefly_level = if self.history.is_empty() {
            RiskLevel::Low
        } else {
            risk_level_for_whitefly(self.whitefly_population)
        };
        RiskSummary {
            gray_mold_level: risk_level_for_gray_mold(recent_mean),
            gray_mold_recent_mean: recent_mean,
            whitefly_level,
            whitefly_population: self.whitefly_population,
            total_alerts: self.alert_log.len(),
        }
    }
}

impl SeasonState for PestDiseaseModel {
    const NAME: &'static str = "pest_disease";

    fn initial(config: &ModelConfig) -> Self {
        Self::new(config)
    }
}

impl FromWorld for PestDiseaseModel {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource::<ModelConfig>().cloned().unwrap_or_default();
        Self::new(&config)
    }
}
