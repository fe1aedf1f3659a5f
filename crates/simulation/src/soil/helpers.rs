use crate::config::ModelConfig;
use crate::stage::GrowthStage;

use super::types::{
    ManagementSuggestion, SuggestionKind, SuggestionPriority, BUCKET_DEPTH_MM, EC_CEILING,
    EC_DECAY_RATE, EC_FLOOR, EC_UPTAKE_LOSS_RATE, FERTIGATION_EC_FRACTION, K_PEAK_MULTIPLIER,
    ROOT_EFFICIENCY_WARNING, UPTAKE_PER_LAI_MM,
};

// =============================================================================
// Root water uptake
// =============================================================================

/// Moisture limitation of water uptake, 1.0 inside the optimal band.
pub fn uptake_water_factor(config: &ModelConfig, swc: f64) -> f64 {
    let w = &config.water;
    if swc < w.swc_min {
        0.3
    } else if swc < w.swc_opt_min {
        0.5 + 0.5 * (swc - w.swc_min) / (w.swc_opt_min - w.swc_min)
    } else if swc <= w.swc_opt_max {
        1.0
    } else if swc <= w.swc_max {
        1.0 - 0.3 * (swc - w.swc_opt_max) / (w.swc_max - w.swc_opt_max)
    } else {
        0.4
    }
}

/// Osmotic penalty on water uptake once EC exceeds the upper limit.
pub fn uptake_salinity_factor(config: &ModelConfig, ec: f64) -> f64 {
    let w = &config.water;
    if ec <= w.ec_max {
        1.0
    } else {
        (1.0 - w.root_water_uptake_ec_penalty * (ec - w.ec_max)).max(0.5)
    }
}

pub fn uptake_temperature_factor(config: &ModelConfig, day_temp: f64) -> f64 {
    let t = &config.thermal;
    if day_temp < t.base_temp {
        0.3
    } else if day_temp <= t.opt_day_temp {
        0.5 + 0.5 * (day_temp - t.base_temp) / (t.opt_day_temp - t.base_temp)
    } else {
        1.0
    }
}

/// Transpiration demand from light, saturating at the PAR saturation point.
pub fn uptake_light_factor(config: &ModelConfig, par: f64) -> f64 {
    let p = &config.photosynthesis;
    if par < p.par_compensation {
        0.5
    } else {
        (par / p.par_saturation).min(1.0)
    }
}

/// Daily root water uptake (mm/d).
pub fn root_water_uptake(
    config: &ModelConfig,
    lai: f64,
    swc: f64,
    ec: f64,
    day_temp: f64,
    par: f64,
) -> f64 {
    let uptake = UPTAKE_PER_LAI_MM
        * lai
        * uptake_water_factor(config, swc)
        * uptake_salinity_factor(config, ec)
        * uptake_temperature_factor(config, day_temp)
        * uptake_light_factor(config, par);
    uptake.max(0.0)
}

/// Root uptake efficiency under the given moisture and salinity.
pub fn root_uptake_efficiency(config: &ModelConfig, swc: f64, ec: f64) -> f64 {
    config.water.root_water_uptake_base
        * uptake_salinity_factor(config, ec)
        * uptake_water_factor(config, swc)
}

// =============================================================================
// Water and salt balance
// =============================================================================

/// Single-bucket water balance. Evaporation from the substrate is not modeled.
pub fn soil_water_balance(swc: f64, irrigation_mm: f64, uptake_mm: f64) -> f64 {
    let stored = swc * BUCKET_DEPTH_MM + irrigation_mm - uptake_mm;
    (stored / BUCKET_DEPTH_MM).clamp(0.0, 1.0)
}

/// One day of soil EC change from fertigation, uptake and leaching.
pub fn ec_balance(ec: f64, fertilizer_ec: f64, irrigation_frequency: u32, uptake_mm: f64) -> f64 {
    let input = fertilizer_ec * irrigation_frequency as f64 * FERTIGATION_EC_FRACTION;
    let uptake_loss = ec * uptake_mm * EC_UPTAKE_LOSS_RATE;
    let decay = ec * EC_DECAY_RATE;
    (ec + input - uptake_loss - decay).clamp(EC_FLOOR, EC_CEILING)
}

// =============================================================================
// Potassium
// =============================================================================

fn k_salinity_factor(config: &ModelConfig, ec: f64) -> f64 {
    let w = &config.water;
    if ec < w.ec_min {
        0.7
    } else if ec <= w.ec_max {
        1.0
    } else {
        (1.0 - (ec - w.ec_max)).max(0.5)
    }
}

fn k_water_factor(config: &ModelConfig, swc: f64) -> f64 {
    let w = &config.water;
    if swc < w.swc_min {
        0.5
    } else if swc < w.swc_opt_min {
        0.7 + 0.3 * (swc - w.swc_min) / (w.swc_opt_min - w.swc_min)
    } else if swc <= w.swc_opt_max {
        1.0
    } else if swc <= w.swc_max {
        1.0 - 0.2 * (swc - w.swc_opt_max) / (w.swc_max - w.swc_opt_max)
    } else {
        0.6
    }
}

/// Potassium demand relative to fruiting, which peaks above 1.
pub fn k_stage_demand(stage: GrowthStage) -> f64 {
    match stage {
        GrowthStage::Seedling => 0.6,
        GrowthStage::Flowering => 0.8,
        GrowthStage::Fruiting => 1.2,
        GrowthStage::Harvest => 1.0,
    }
}

/// Daily potassium uptake (g/plant/d), Michaelis–Menten in soil EC.
pub fn potassium_uptake(config: &ModelConfig, ec: f64, swc: f64, stage: GrowthStage) -> f64 {
    let w = &config.water;
    let v_max = w.k_uptake_vmax / 7.0;
    let substrate = ec.max(0.1);
    let base = v_max * substrate / (w.k_uptake_km + substrate);
    let uptake =
        base * k_salinity_factor(config, ec) * k_water_factor(config, swc) * k_stage_demand(stage);
    uptake.clamp(0.0, (K_PEAK_MULTIPLIER * w.k_uptake_peak).max(0.0))
}

// =============================================================================
// Suggestions
// =============================================================================

/// Advice for the given root-zone state. Pure; nothing is mutated.
pub fn management_suggestions(
    config: &ModelConfig,
    ec: f64,
    swc: f64,
    efficiency: f64,
) -> Vec<ManagementSuggestion> {
    let w = &config.water;
    let mut suggestions = Vec::new();

    if ec < w.ec_min {
        suggestions.push(ManagementSuggestion {
            kind: SuggestionKind::Fertilizer,
            priority: SuggestionPriority::High,
            trigger_value: ec,
            message: format!("Soil EC is low ({ec:.2} mS/cm); increase fertilizer input"),
            actions: vec![format!("Raise EC to {:.2} mS/cm", w.ec_opt)],
        });
    } else if ec > w.ec_max {
        suggestions.push(ManagementSuggestion {
            kind: SuggestionKind::Fertilizer,
            priority: SuggestionPriority::High,
            trigger_value: ec,
            message: format!("Soil EC is high ({ec:.2} mS/cm); root uptake may suffer"),
            actions: vec!["Reduce salt input and irrigate to dilute".to_string()],
        });
    }

    if swc < w.swc_opt_min {
        suggestions.push(ManagementSuggestion {
            kind: SuggestionKind::Irrigation,
            priority: SuggestionPriority::Medium,
            trigger_value: swc,
            message: format!("Soil water content is low ({:.1}% FC)", swc * 100.0),
            actions: vec!["Increase irrigation frequency or amount".to_string()],
        });
    } else if swc > w.swc_opt_max {
        suggestions.push(ManagementSuggestion {
            kind: SuggestionKind::Irrigation,
            priority: SuggestionPriority::Medium,
            trigger_value: swc,
            message: format!("Soil water content is high ({:.1}% FC)", swc * 100.0),
            actions: vec!["Reduce irrigation and check drainage".to_string()],
        });
    }

    if efficiency < ROOT_EFFICIENCY_WARNING {
        suggestions.push(ManagementSuggestion {
            kind: SuggestionKind::RootHealth,
            priority: SuggestionPriority::Medium,
            trigger_value: efficiency,
            message: "Root water uptake efficiency is low; nutrient uptake may suffer"
                .to_string(),
            actions: vec!["Inspect root health and adjust EC and soil moisture".to_string()],
        });
    }

    suggestions
}
