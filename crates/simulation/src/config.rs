//! Biophysical model parameters.
//!
//! All constants that drive the growth, soil and pest/disease engines live in
//! a single [`ModelConfig`] resource, grouped by subsystem. The resource is
//! built once before a run and only ever read by systems. It is serde
//! (de)serializable and every group is `#[serde(default)]`, so a JSON document
//! can override any subset of fields.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::stage::GrowthStage;

// ---------------------------------------------------------------------------
// Thermal time parameters
// ---------------------------------------------------------------------------

/// Temperatures in °C, thermal-time requirements in °C·day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalParams {
    pub base_temp: f64,
    pub opt_day_temp: f64,
    pub opt_night_temp: f64,
    pub min_night_temp: f64,
    pub max_night_temp: f64,
    pub gdd_correction_seedling: f64,
    pub gdd_correction_flowering: f64,
    pub gdd_correction_fruiting: f64,
    pub gdd_correction_harvest: f64,
    pub gdd_seedling: f64,
    pub gdd_flowering: f64,
    pub gdd_fruiting: f64,
    /// Thermal time from planting to the start of harvest maturity.
    pub gdd_total: f64,
}

impl Default for ThermalParams {
    fn default() -> Self {
        Self {
            base_temp: 10.0,
            opt_day_temp: 23.0,
            opt_night_temp: 17.0,
            min_night_temp: 14.0,
            max_night_temp: 19.0,
            gdd_correction_seedling: 0.92,
            gdd_correction_flowering: 0.92,
            gdd_correction_fruiting: 0.95,
            gdd_correction_harvest: 0.98,
            gdd_seedling: 350.0,
            gdd_flowering: 450.0,
            gdd_fruiting: 800.0,
            gdd_total: 1600.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Photosynthesis parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotosynthesisParams {
    /// Quantum efficiency (mol CO2 per mol photons).
    pub quantum_efficiency: f64,
    /// Dark respiration rate (μmol·m⁻²·s⁻¹).
    pub dark_respiration: f64,
    pub co2_opt: f64,
    pub co2_base: f64,
    pub co2_max: f64,
    pub par_saturation: f64,
    pub par_compensation: f64,
    pub light_extinction_coeff: f64,
    pub co2_compensation: f64,
    /// Half-saturation constant of the CO2 response (ppm).
    pub co2_km: f64,
    pub pn_max_co2: f64,
    /// Leaf maintenance respiration at 20 °C (g·m⁻²·h⁻¹).
    pub leaf_respiration_base: f64,
}

impl Default for PhotosynthesisParams {
    fn default() -> Self {
        Self {
            quantum_efficiency: 0.037,
            dark_respiration: 0.023,
            co2_opt: 750.0,
            co2_base: 400.0,
            co2_max: 800.0,
            par_saturation: 1200.0,
            par_compensation: 50.0,
            light_extinction_coeff: 0.55,
            co2_compensation: 50.0,
            co2_km: 300.0,
            pn_max_co2: 2.2,
            leaf_respiration_base: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Water and fertilizer parameters
// ---------------------------------------------------------------------------

/// EC in mS/cm, soil water content as a fraction of field capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterParams {
    pub ec_min: f64,
    pub ec_max: f64,
    pub ec_opt: f64,
    /// Maximum potassium uptake (g/plant/week).
    pub k_uptake_vmax: f64,
    pub k_uptake_km: f64,
    /// Peak daily potassium uptake (g/plant/day).
    pub k_uptake_peak: f64,
    pub swc_opt_min: f64,
    pub swc_opt_max: f64,
    pub swc_min: f64,
    pub swc_max: f64,
    pub root_water_uptake_base: f64,
    pub root_water_uptake_ec_penalty: f64,
    /// Soil water content at the start of the season.
    pub initial_swc: f64,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            ec_min: 1.8,
            ec_max: 2.3,
            ec_opt: 2.15,
            k_uptake_vmax: 7.5,
            k_uptake_km: 2.0,
            k_uptake_peak: 1.0,
            swc_opt_min: 0.65,
            swc_opt_max: 0.70,
            swc_min: 0.50,
            swc_max: 0.75,
            root_water_uptake_base: 0.85,
            root_water_uptake_ec_penalty: 0.20,
            initial_swc: 0.65,
        }
    }
}

// ---------------------------------------------------------------------------
// Pest and disease parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PestParams {
    /// Relative humidity (%) above which gray mold spores thrive.
    pub gray_mold_humidity_threshold: f64,
    pub gray_mold_temp_min: f64,
    pub gray_mold_temp_max: f64,
    pub gray_mold_risk_base: f64,
    pub gray_mold_risk_growth_rate: f64,
    pub whitefly_temp_opt_min: f64,
    pub whitefly_temp_opt_max: f64,
    /// Days per whitefly generation.
    pub whitefly_generation_cycle: f64,
    pub whitefly_base_population: f64,
}

impl Default for PestParams {
    fn default() -> Self {
        Self {
            gray_mold_humidity_threshold: 80.0,
            gray_mold_temp_min: 14.0,
            gray_mold_temp_max: 18.0,
            gray_mold_risk_base: 0.1,
            gray_mold_risk_growth_rate: 0.15,
            whitefly_temp_opt_min: 20.0,
            whitefly_temp_opt_max: 25.0,
            whitefly_generation_cycle: 12.0,
            whitefly_base_population: 10.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Canopy and yield parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthParams {
    pub lai_max: f64,
    pub lai_initial: f64,
    /// Exponential LAI growth rate during the seedling stage (per day).
    pub lai_growth_rate: f64,
    /// Ground area occupied by one plant (m²).
    pub area_per_plant: f64,
    pub dm_ratio_leaf: f64,
    pub dm_ratio_stem: f64,
    pub dm_ratio_fruit: f64,
    pub dm_ratio_root: f64,
    pub fruit_set_rate_opt: f64,
    pub fruit_set_rate_min: f64,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            lai_max: 4.5,
            lai_initial: 0.1,
            lai_growth_rate: 0.08,
            area_per_plant: 0.5,
            dm_ratio_leaf: 0.25,
            dm_ratio_stem: 0.15,
            dm_ratio_fruit: 0.50,
            dm_ratio_root: 0.10,
            fruit_set_rate_opt: 0.82,
            fruit_set_rate_min: 0.50,
        }
    }
}

// ---------------------------------------------------------------------------
// Stage table
// ---------------------------------------------------------------------------

/// One row of the derived growth-stage table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageDefinition {
    pub stage: GrowthStage,
    pub display_name: &'static str,
    /// Nominal stage length in days under typical conditions.
    pub duration_days: u32,
    pub gdd_required: f64,
    pub gdd_correction: f64,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A configuration rule that the current parameter set breaks.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigViolation {
    NegativeBaseTemperature(f64),
    EcRangeInverted { min: f64, max: f64 },
    SoilWaterOptimumInverted { min: f64, max: f64 },
    GrayMoldBandDegenerate { min: f64, max: f64 },
    StageRequirementsExceedTotal { sum: f64, total: f64 },
}

impl std::fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigViolation::NegativeBaseTemperature(t) => {
                write!(f, "base temperature {t} must be non-negative")
            }
            ConfigViolation::EcRangeInverted { min, max } => {
                write!(f, "EC minimum {min} must be below EC maximum {max}")
            }
            ConfigViolation::SoilWaterOptimumInverted { min, max } => write!(
                f,
                "optimal soil water minimum {min} must be below optimal maximum {max}"
            ),
            ConfigViolation::GrayMoldBandDegenerate { min, max } => write!(
                f,
                "gray mold temperature band [{min}, {max}] must be non-degenerate"
            ),
            ConfigViolation::StageRequirementsExceedTotal { sum, total } => write!(
                f,
                "stage thermal-time requirements ({sum}) exceed the season total ({total})"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// ModelConfig resource
// ---------------------------------------------------------------------------

/// Every tunable constant of the crop model.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub thermal: ThermalParams,
    pub photosynthesis: PhotosynthesisParams,
    pub water: WaterParams,
    pub pest: PestParams,
    pub growth: GrowthParams,
}

impl ModelConfig {
    /// Parse a (possibly partial) JSON parameter document.
    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| SimulationError::Config(e.to_string()))
    }

    /// Thermal-time correction applied while the crop is in `stage`.
    pub fn gdd_correction(&self, stage: GrowthStage) -> f64 {
        let t = &self.thermal;
        match stage {
            GrowthStage::Seedling => t.gdd_correction_seedling,
            GrowthStage::Flowering => t.gdd_correction_flowering,
            GrowthStage::Fruiting => t.gdd_correction_fruiting,
            GrowthStage::Harvest => t.gdd_correction_harvest,
        }
    }

    /// Thermal time needed to complete `stage`. Harvest takes the remainder of
    /// the season total, so the four requirements always sum to `gdd_total`.
    pub fn gdd_required(&self, stage: GrowthStage) -> f64 {
        let t = &self.thermal;
        match stage {
            GrowthStage::Seedling => t.gdd_seedling,
            GrowthStage::Flowering => t.gdd_flowering,
            GrowthStage::Fruiting => t.gdd_fruiting,
            GrowthStage::Harvest => t.gdd_total - t.gdd_seedling - t.gdd_flowering - t.gdd_fruiting,
        }
    }

    /// Cumulative thermal time at which `stage` ends.
    pub fn stage_end_gdd(&self, stage: GrowthStage) -> f64 {
        let t = &self.thermal;
        match stage {
            GrowthStage::Seedling => t.gdd_seedling,
            GrowthStage::Flowering => t.gdd_seedling + t.gdd_flowering,
            GrowthStage::Fruiting => t.gdd_seedling + t.gdd_flowering + t.gdd_fruiting,
            GrowthStage::Harvest => t.gdd_total,
        }
    }

    /// The derived stage table in season order.
    pub fn stage_definitions(&self) -> [StageDefinition; 4] {
        GrowthStage::ALL.map(|stage| {
            let (display_name, duration_days) = match stage {
                GrowthStage::Seedling => ("Seedling", 30),
                GrowthStage::Flowering => ("Flowering", 20),
                GrowthStage::Fruiting => ("Fruiting", 60),
                GrowthStage::Harvest => ("Harvest", 30),
            };
            StageDefinition {
                stage,
                display_name,
                duration_days,
                gdd_required: self.gdd_required(stage),
                gdd_correction: self.gdd_correction(stage),
            }
        })
    }

    /// Check the parameter set for internal consistency.
    ///
    /// Advisory only: engines run with whatever they are given.
    pub fn validate(&self) -> Vec<ConfigViolation> {
        let mut violations = Vec::new();
        let t = &self.thermal;
        let w = &self.water;
        let p = &self.pest;

        if t.base_temp < 0.0 {
            violations.push(ConfigViolation::NegativeBaseTemperature(t.base_temp));
        }
        if w.ec_min >= w.ec_max {
            violations.push(ConfigViolation::EcRangeInverted {
                min: w.ec_min,
                max: w.ec_max,
            });
        }
        if w.swc_opt_min >= w.swc_opt_max {
            violations.push(ConfigViolation::SoilWaterOptimumInverted {
                min: w.swc_opt_min,
                max: w.swc_opt_max,
            });
        }
        if p.gray_mold_temp_min >= p.gray_mold_temp_max {
            violations.push(ConfigViolation::GrayMoldBandDegenerate {
                min: p.gray_mold_temp_min,
                max: p.gray_mold_temp_max,
            });
        }
        let staged = t.gdd_seedling + t.gdd_flowering + t.gdd_fruiting;
        if staged > t.gdd_total {
            violations.push(ConfigViolation::StageRequirementsExceedTotal {
                sum: staged,
                total: t.gdd_total,
            });
        }
        violations
    }
}
