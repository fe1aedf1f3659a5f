use crate::config::ModelConfig;

use super::types::{
    AlertLevel, PestAlert, PestKind, RiskLevel, CONSECUTIVE_RISK_STEP, GRAY_MOLD_HIGH_RISK,
    GRAY_MOLD_WARNING_RISK, WHITEFLY_DAILY_MORTALITY, WHITEFLY_HIGH_POPULATION,
    WHITEFLY_WARNING_POPULATION,
};

// =============================================================================
// Gray mold (Botrytis cinerea)
// =============================================================================

/// Humidity response; rises steeply above the saturation threshold.
pub fn gray_mold_humidity_factor(config: &ModelConfig, humidity: f64) -> f64 {
    let threshold = config.pest.gray_mold_humidity_threshold;
    if humidity >= threshold {
        1.0 + (humidity - threshold) / 20.0 * 2.0
    } else if threshold > 0.0 {
        (humidity / threshold).max(0.1)
    } else {
        0.1
    }
}

/// Temperature response on the daily mean; optimal inside the gray mold band.
pub fn gray_mold_temperature_factor(config: &ModelConfig, avg_temp: f64) -> f64 {
    let p = &config.pest;
    if avg_temp < p.gray_mold_temp_min {
        0.5
    } else if avg_temp <= p.gray_mold_temp_max {
        1.0
    } else {
        (1.0 - (avg_temp - p.gray_mold_temp_max) / 10.0).max(0.3)
    }
}

/// Dense canopies hold humid air; the factor grows once LAI exceeds 3.
pub fn gray_mold_canopy_factor(lai: f64) -> f64 {
    if lai > 3.0 {
        1.0 + (lai - 3.0) / 2.0 * 0.3
    } else {
        1.0
    }
}

/// Daily gray mold risk index in `[0, 100]`.
///
/// `days_high_risk` is the number of consecutive days immediately before
/// today whose risk reached the high threshold.
pub fn gray_mold_risk(
    config: &ModelConfig,
    humidity: f64,
    avg_temp: f64,
    lai: f64,
    days_high_risk: u32,
) -> f64 {
    let base = config.pest.gray_mold_risk_base * 100.0;
    let cumulative = 1.0 + CONSECUTIVE_RISK_STEP * days_high_risk as f64;
    let risk = base
        * gray_mold_humidity_factor(config, humidity)
        * gray_mold_temperature_factor(config, avg_temp)
        * gray_mold_canopy_factor(lai)
        * cumulative;
    risk.clamp(0.0, 100.0)
}

// =============================================================================
// Whitefly (Bemisia tabaci)
// =============================================================================

/// Relative reproduction on the daily mean temperature.
pub fn whitefly_reproduction_rate(config: &ModelConfig, avg_temp: f64) -> f64 {
    let p = &config.pest;
    if avg_temp < p.whitefly_temp_opt_min {
        0.3
    } else if avg_temp <= p.whitefly_temp_opt_max {
        1.0
    } else if avg_temp <= 30.0 {
        1.0 - (avg_temp - p.whitefly_temp_opt_max) / 10.0
    } else {
        0.2
    }
}

/// Outcome of advancing the whitefly population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhiteflyStep {
    pub population: f64,
    pub generations_completed: u32,
    pub days_since_infestation: f64,
}

/// Advance the whitefly population by `days`.
///
/// `pop · r · (2^(days/cycle))^(1/cycle) · (1 - mortality)^days`, floored at
/// zero. Generation bookkeeping runs whatever the population does.
pub fn whitefly_step(
    config: &ModelConfig,
    population: f64,
    avg_temp: f64,
    days_since_infestation: f64,
    days: u32,
) -> WhiteflyStep {
    let cycle = config.pest.whitefly_generation_cycle;
    let days_f = days as f64;
    let reproduction = whitefly_reproduction_rate(config, avg_temp);
    let generation_factor = 2.0_f64.powf(days_f / cycle);
    let survival = (1.0 - WHITEFLY_DAILY_MORTALITY).powf(days_f);
    let next = population * reproduction * generation_factor.powf(1.0 / cycle) * survival;

    // Fractional days carry over so a non-integer cycle keeps its phase.
    let mut elapsed = days_since_infestation + days_f;
    let mut generations_completed = 0;
    if cycle > 0.0 && elapsed >= cycle {
        generations_completed = (elapsed / cycle).floor() as u32;
        elapsed %= cycle;
    }

    WhiteflyStep {
        population: next.max(0.0),
        generations_completed,
        days_since_infestation: elapsed,
    }
}

// =============================================================================
// Alerts and risk bands
// =============================================================================

/// Alert for today's gray mold risk, if any.
pub fn gray_mold_alert(risk: f64) -> Option<PestAlert> {
    if risk < GRAY_MOLD_WARNING_RISK {
        return None;
    }
    let alert = if risk < GRAY_MOLD_HIGH_RISK {
        PestAlert {
            kind: PestKind::GrayMold,
            level: AlertLevel::Warning,
            trigger_value: risk,
            generation: None,
            message: format!("Gray mold risk is elevated (risk index {risk:.1})"),
            actions: vec![
                "Increase ventilation to lower humidity".to_string(),
                "Limit irrigation to avoid condensation on leaves".to_string(),
                "Raise temperature to 18-20 °C".to_string(),
                "Inspect plants and remove diseased leaves".to_string(),
            ],
        }
    } else {
        PestAlert {
            kind: PestKind::GrayMold,
            level: AlertLevel::High,
            trigger_value: risk,
            generation: None,
            message: format!("Gray mold risk is high (risk index {risk:.1}); act now"),
            actions: vec![
                "Ventilate immediately and run exhaust fans".to_string(),
                "Reduce or pause irrigation".to_string(),
                "Raise temperature to 20-22 °C".to_string(),
                "Apply a preventive fungicide such as chlorothalonil".to_string(),
                "Remove infected leaves and fruit and destroy them off site".to_string(),
                "Thin leaves to lower canopy density".to_string(),
            ],
        }
    };
    Some(alert)
}

/// Alert for the current whitefly population, if any.
pub fn whitefly_alert(population: f64, generation: u32) -> Option<PestAlert> {
    if population < WHITEFLY_WARNING_POPULATION {
        return None;
    }
    let alert = if population < WHITEFLY_HIGH_POPULATION {
        PestAlert {
            kind: PestKind::Whitefly,
            level: AlertLevel::Warning,
            trigger_value: population,
            generation: Some(generation),
            message: format!(
                "Whitefly population is rising ({population:.0} insects, generation {generation})"
            ),
            actions: vec![
                "Hang yellow sticky traps for monitoring".to_string(),
                "Increase ventilation and lower temperature".to_string(),
                "Release Encarsia formosa parasitoids".to_string(),
                "Check leaf undersides regularly".to_string(),
            ],
        }
    } else {
        PestAlert {
            kind: PestKind::Whitefly,
            level: AlertLevel::High,
            trigger_value: population,
            generation: Some(generation),
            message: format!(
                "Whitefly outbreak ({population:.0} insects, generation {generation})"
            ),
            actions: vec![
                "Apply an insecticide such as imidacloprid or thiamethoxam".to_string(),
                "Combine with yellow traps and insect netting".to_string(),
                "Release natural enemies such as Encarsia formosa or ladybirds".to_string(),
                "Clear weeds inside the greenhouse to remove hosts".to_string(),
                "Rotate products with different modes of action".to_string(),
            ],
        }
    };
    Some(alert)
}

pub fn risk_level_for_gray_mold(risk: f64) -> RiskLevel {
    if risk < GRAY_MOLD_WARNING_RISK {
        RiskLevel::Low
    } else if risk < GRAY_MOLD_HIGH_RISK {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

pub fn risk_level_for_whitefly(population: f64) -> RiskLevel {
    if population < WHITEFLY_WARNING_POPULATION {
        RiskLevel::Low
    } else if population < WHITEFLY_HIGH_POPULATION {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}
