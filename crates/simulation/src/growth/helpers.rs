use crate::config::ModelConfig;
use crate::stage::GrowthStage;

use super::types::{
    AllocationRatios, CO2_TO_DRY_MATTER, FLOWERING_LAI_CAP, FLOWERING_LAI_STEEPNESS,
    FRUITING_LAI_STEEPNESS, HARVEST_LAI_FLOOR, HARVEST_LAI_FRACTION, PHOTOPERIOD_HOURS,
    PHOTOSYNTHESIS_HEAT_THRESHOLD, RESPIRATION_Q10, RESPIRATION_REF_TEMP, SEEDLING_LAI_CAP,
};

// =============================================================================
// Thermal time and phenology
// =============================================================================

/// Growing degree days accrued in one day (°C·day).
///
/// Zero when the mean of day and night temperature is at or below the base
/// temperature; otherwise the excess scaled by the stage's correction factor.
pub fn daily_thermal_time(
    config: &ModelConfig,
    day_temp: f64,
    night_temp: f64,
    stage: GrowthStage,
) -> f64 {
    let avg = (day_temp + night_temp) / 2.0;
    let base = config.thermal.base_temp;
    if avg <= base {
        return 0.0;
    }
    ((avg - base) * config.gdd_correction(stage)).max(0.0)
}

/// Stage implied by cumulative thermal time alone.
pub fn stage_for_thermal_time(config: &ModelConfig, cumulative: f64) -> GrowthStage {
    if cumulative < config.stage_end_gdd(GrowthStage::Seedling) {
        GrowthStage::Seedling
    } else if cumulative < config.stage_end_gdd(GrowthStage::Flowering) {
        GrowthStage::Flowering
    } else if cumulative < config.stage_end_gdd(GrowthStage::Fruiting) {
        GrowthStage::Fruiting
    } else {
        GrowthStage::Harvest
    }
}

// =============================================================================
// Canopy
// =============================================================================

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Leaf area index for the given stage, days since planting and thermal time.
///
/// Exponential expansion as a seedling, logistic curves centred on the
/// thermal-time midpoint of flowering and fruiting, a plateau at harvest.
pub fn leaf_area_index(
    config: &ModelConfig,
    stage: GrowthStage,
    day: u32,
    cumulative: f64,
) -> f64 {
    let g = &config.growth;
    let lai = match stage {
        GrowthStage::Seedling => {
            (g.lai_initial * (g.lai_growth_rate * day as f64).exp()).min(SEEDLING_LAI_CAP)
        }
        GrowthStage::Flowering => {
            let midpoint =
                config.stage_end_gdd(GrowthStage::Seedling) + config.thermal.gdd_flowering / 2.0;
            let span = FLOWERING_LAI_CAP - SEEDLING_LAI_CAP;
            (SEEDLING_LAI_CAP
                + span * logistic(FLOWERING_LAI_STEEPNESS * (cumulative - midpoint)))
            .clamp(SEEDLING_LAI_CAP, FLOWERING_LAI_CAP)
        }
        GrowthStage::Fruiting => {
            let midpoint =
                config.stage_end_gdd(GrowthStage::Flowering) + config.thermal.gdd_fruiting / 2.0;
            (g.lai_max * logistic(FRUITING_LAI_STEEPNESS * (cumulative - midpoint)))
                .clamp(FLOWERING_LAI_CAP, g.lai_max.max(FLOWERING_LAI_CAP))
        }
        GrowthStage::Harvest => HARVEST_LAI_FLOOR.max(HARVEST_LAI_FRACTION * g.lai_max),
    };
    lai.clamp(g.lai_initial, g.lai_max.max(g.lai_initial))
}

// =============================================================================
// Photosynthesis
// =============================================================================

/// Fraction of incident light intercepted by the canopy (Beer–Lambert).
pub fn light_interception(config: &ModelConfig, lai: f64) -> f64 {
    1.0 - (-config.photosynthesis.light_extinction_coeff * lai.max(0.0)).exp()
}

/// Relative photosynthetic capacity at the given day temperature.
pub fn photosynthesis_temperature_factor(config: &ModelConfig, day_temp: f64) -> f64 {
    let base = config.thermal.base_temp;
    let opt = config.thermal.opt_day_temp;
    if day_temp < base {
        0.1
    } else if day_temp <= opt {
        0.3 + 0.7 * (day_temp - base) / (opt - base)
    } else if day_temp <= PHOTOSYNTHESIS_HEAT_THRESHOLD {
        1.0 - 0.02 * (day_temp - opt)
    } else {
        (1.0 - 0.05 * (day_temp - PHOTOSYNTHESIS_HEAT_THRESHOLD)).max(0.3)
    }
}

/// Rectangular-hyperbola CO2 response, normalised to [0, 1).
pub fn co2_factor(config: &ModelConfig, co2: f64) -> f64 {
    let p = &config.photosynthesis;
    let excess = (co2 - p.co2_compensation).max(0.0);
    let denominator = p.co2_km + excess;
    if denominator <= 0.0 {
        return 0.0;
    }
    excess / denominator
}

/// Daily maintenance respiration (g DM·m⁻²·d⁻¹), Q10 scaled from 20 °C.
pub fn maintenance_respiration(config: &ModelConfig, day_temp: f64) -> f64 {
    config.photosynthesis.leaf_respiration_base
        * 24.0
        * RESPIRATION_Q10.powf((day_temp - RESPIRATION_REF_TEMP) / 10.0)
}

/// Net dry matter produced by one plant in a day (g/plant/d, never negative).
pub fn net_assimilation(
    config: &ModelConfig,
    lai: f64,
    par: f64,
    day_temp: f64,
    co2: f64,
) -> f64 {
    let intercepted = par.max(0.0) * light_interception(config, lai);
    // μmol·m⁻²·s⁻¹ over the photoperiod to mol·m⁻²·d⁻¹
    let daily_dose = intercepted * 3600.0 * PHOTOPERIOD_HOURS / 1e6;
    let gross = config.photosynthesis.quantum_efficiency
        * daily_dose
        * photosynthesis_temperature_factor(config, day_temp)
        * co2_factor(config, co2)
        * CO2_TO_DRY_MATTER;
    let net_per_area = (gross - maintenance_respiration(config, day_temp)).max(0.0);
    net_per_area * config.growth.area_per_plant
}

// =============================================================================
// Partitioning and fruit set
// =============================================================================

/// Organ allocation for the stage. Fruiting uses the configured ratios.
pub fn allocation_ratios(config: &ModelConfig, stage: GrowthStage) -> AllocationRatios {
    match stage {
        GrowthStage::Seedling => AllocationRatios {
            leaf: 0.40,
            stem: 0.30,
            root: 0.30,
            fruit: 0.0,
        },
        GrowthStage::Flowering => AllocationRatios {
            leaf: 0.35,
            stem: 0.25,
            root: 0.20,
            fruit: 0.20,
        },
        GrowthStage::Fruiting => AllocationRatios {
            leaf: config.growth.dm_ratio_leaf,
            stem: config.growth.dm_ratio_stem,
            root: config.growth.dm_ratio_root,
            fruit: config.growth.dm_ratio_fruit,
        },
        GrowthStage::Harvest => AllocationRatios {
            leaf: 0.20,
            stem: 0.10,
            root: 0.05,
            fruit: 0.65,
        },
    }
}

/// Day-temperature effect on pollination and fruit set.
fn fruit_set_day_factor(config: &ModelConfig, day_temp: f64) -> f64 {
    let opt = config.thermal.opt_day_temp;
    if day_temp < 18.0 {
        0.5 + 0.3 * (day_temp - 15.0) / 3.0
    } else if day_temp <= opt {
        0.8 + 0.2 * (day_temp - 18.0) / 5.0
    } else if day_temp <= 28.0 {
        1.0 - 0.3 * (day_temp - opt) / 5.0
    } else {
        (0.7 - 0.4 * (day_temp - 28.0) / 5.0).max(0.3)
    }
}

/// Night-temperature effect on fruit set; the more sensitive of the two.
fn fruit_set_night_factor(config: &ModelConfig, night_temp: f64) -> f64 {
    let opt = config.thermal.opt_night_temp;
    if night_temp < 14.0 {
        0.4 + 0.2 * (night_temp - 12.0) / 2.0
    } else if night_temp <= opt {
        0.6 + 0.4 * (night_temp - 14.0) / 3.0
    } else if night_temp <= 19.0 {
        1.0 - 0.2 * (night_temp - opt) / 2.0
    } else {
        (0.8 - 0.5 * (night_temp - 19.0) / 5.0).max(0.3)
    }
}

/// Fraction of flowers that set fruit, in `[fruit_set_rate_min, 1.0]`.
pub fn fruit_set_rate(config: &ModelConfig, day_temp: f64, night_temp: f64) -> f64 {
    let g = &config.growth;
    let rate = g.fruit_set_rate_opt
        * fruit_set_day_factor(config, day_temp)
        * fruit_set_night_factor(config, night_temp);
    rate.clamp(g.fruit_set_rate_min, 1.0_f64.max(g.fruit_set_rate_min))
}
