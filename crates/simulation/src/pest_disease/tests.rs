#[cfg(test)]
mod tests {
    use crate::config::ModelConfig;
    use crate::pest_disease::helpers::{
        gray_mold_alert, gray_mold_canopy_factor, gray_mold_humidity_factor, gray_mold_risk,
        gray_mold_temperature_factor, whitefly_alert, whitefly_reproduction_rate, whitefly_step,
    };
    use crate::pest_disease::types::{
        AlertLevel, PestDiseaseModel, PestKind, RiskLevel, GRAY_MOLD_HIGH_RISK,
    };

    fn config() -> ModelConfig {
        ModelConfig::default()
    }

    /// Configuration under which humid days saturate the risk index.
    fn aggressive_config() -> ModelConfig {
        let mut c = ModelConfig::default();
        c.pest.gray_mold_risk_base = 0.5;
        c
    }

    // -------------------------------------------------------------------------
    // Gray mold risk
    // -------------------------------------------------------------------------

    #[test]
    fn test_humidity_factor() {
        let c = config();
        assert!((gray_mold_humidity_factor(&c, 90.0) - 2.0).abs() < 1e-9);
        assert!((gray_mold_humidity_factor(&c, 80.0) - 1.0).abs() < 1e-9);
        assert!((gray_mold_humidity_factor(&c, 40.0) - 0.5).abs() < 1e-9);
        assert!((gray_mold_humidity_factor(&c, 4.0) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_factor() {
        let c = config();
        assert!((gray_mold_temperature_factor(&c, 12.0) - 0.5).abs() < 1e-9);
        assert!((gray_mold_temperature_factor(&c, 16.0) - 1.0).abs() < 1e-9);
        assert!((gray_mold_temperature_factor(&c, 20.0) - 0.8).abs() < 1e-9);
        assert!((gray_mold_temperature_factor(&c, 40.0) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_canopy_factor() {
        assert_eq!(gray_mold_canopy_factor(2.0), 1.0);
        assert!((gray_mold_canopy_factor(4.0) - 1.15).abs() < 1e-9);
    }

    #[test]
    fn test_gray_mold_risk_combines_factors() {
        let c = config();
        let risk = gray_mold_risk(&c, 90.0, 16.0, 4.0, 0);
        assert!((risk - 23.0).abs() < 1e-9, "Expected 23.0, got {}", risk);
        let risk = gray_mold_risk(&c, 90.0, 16.0, 4.0, 2);
        assert!((risk - 27.6).abs() < 1e-9, "Expected 27.6, got {}", risk);
    }

    #[test]
    fn test_gray_mold_risk_clamped() {
        let risk = gray_mold_risk(&config(), 200.0, 16.0, 4.0, 5);
        assert_eq!(risk, 100.0);
    }

    // -------------------------------------------------------------------------
    // Whitefly
    // -------------------------------------------------------------------------

    #[test]
    fn test_whitefly_reproduction_bands() {
        let c = config();
        assert!((whitefly_reproduction_rate(&c, 15.0) - 0.3).abs() < 1e-9);
        assert!((whitefly_reproduction_rate(&c, 22.0) - 1.0).abs() < 1e-9);
        assert!((whitefly_reproduction_rate(&c, 27.5) - 0.75).abs() < 1e-9);
        assert!((whitefly_reproduction_rate(&c, 35.0) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_whitefly_step_population() {
        let step = whitefly_step(&config(), 10.0, 20.0, 0.0, 1);
        let expected = 10.0 * 2.0_f64.powf(1.0 / 12.0).powf(1.0 / 12.0) * 0.95;
        assert!(
            (step.population - expected).abs() < 1e-9,
            "Expected {}, got {}",
            expected,
            step.population
        );
        assert_eq!(step.generations_completed, 0);
        assert_eq!(step.days_since_infestation, 1.0);
    }

    #[test]
    fn test_whitefly_generation_rollover() {
        let step = whitefly_step(&config(), 10.0, 20.0, 11.0, 1);
        assert_eq!(step.generations_completed, 1);
        assert_eq!(step.days_since_infestation, 0.0);
    }

    #[test]
    fn test_whitefly_fractional_cycle_keeps_remainder() {
        let mut c = config();
        c.pest.whitefly_generation_cycle = 12.5;
        let step = whitefly_step(&c, 10.0, 20.0, 12.0, 1);
        assert_eq!(step.generations_completed, 1);
        assert!((step.days_since_infestation - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_whitefly_bookkeeping_without_population() {
        let step = whitefly_step(&config(), 0.0, 20.0, 11.0, 1);
        assert_eq!(step.population, 0.0);
        assert_eq!(step.generations_completed, 1);
    }

    // -------------------------------------------------------------------------
    // Alert thresholds
    // -------------------------------------------------------------------------

    #[test]
    fn test_gray_mold_alert_thresholds() {
        assert!(gray_mold_alert(49.9).is_none());
        let warning = gray_mold_alert(50.0).expect("warning at 50");
        assert_eq!(warning.level, AlertLevel::Warning);
        assert_eq!(warning.actions.len(), 4);
        assert_eq!(gray_mold_alert(69.9).map(|a| a.level), Some(AlertLevel::Warning));
        let high = gray_mold_alert(70.0).expect("high at 70");
        assert_eq!(high.level, AlertLevel::High);
        assert_eq!(high.kind, PestKind::GrayMold);
        assert_eq!(high.actions.len(), 6);
        assert!(high.generation.is_none());
    }

    #[test]
    fn test_whitefly_alert_thresholds() {
        assert!(whitefly_alert(49.9, 1).is_none());
        let warning = whitefly_alert(50.0, 2).expect("warning at 50");
        assert_eq!(warning.level, AlertLevel::Warning);
        assert_eq!(warning.generation, Some(2));
        assert!(warning.message.contains("generation 2"), "got {}", warning.message);
        assert_eq!(whitefly_alert(199.9, 2).map(|a| a.level), Some(AlertLevel::Warning));
        let high = whitefly_alert(200.0, 3).expect("high at 200");
        assert_eq!(high.level, AlertLevel::High);
        assert_eq!(high.actions.len(), 5);
    }

    // -------------------------------------------------------------------------
    // Engine
    // -------------------------------------------------------------------------

    #[test]
    fn test_new_model_initial_state() {
        let model = PestDiseaseModel::new(&config());
        assert_eq!(model.gray_mold_risk, 0.0);
        assert!((model.whitefly_population - 10.0).abs() < 1e-12);
        assert_eq!(model.whitefly_generation, 1);
        assert_eq!(model.days_since_infestation, 0.0);
    }

    #[test]
    fn test_generation_advances_every_cycle() {
        let c = config();
        let mut model = PestDiseaseModel::new(&c);
        for _ in 0..11 {
            model.daily_update(&c, 70.0, 23.0, 17.0, 1.0);
        }
        assert_eq!(model.whitefly_generation, 1);
        assert_eq!(model.days_since_infestation, 11.0);
        model.daily_update(&c, 70.0, 23.0, 17.0, 1.0);
        assert_eq!(model.whitefly_generation, 2);
        assert_eq!(model.days_since_infestation, 0.0);
        for _ in 0..24 {
            model.daily_update(&c, 70.0, 23.0, 17.0, 1.0);
        }
        assert_eq!(model.whitefly_generation, 4);
    }

    #[test]
    fn test_generation_rollover_with_fractional_cycle() {
        let mut c = config();
        c.pest.whitefly_generation_cycle = 12.5;
        let mut model = PestDiseaseModel::new(&c);
        let mut rollovers = Vec::new();
        for day in 1..=40 {
            let before = model.whitefly_generation;
            let record = model.daily_update(&c, 70.0, 23.0, 17.0, 1.0);
            if record.whitefly_generation > before {
                rollovers.push(day);
            }
            assert!(record.days_since_infestation < 12.5);
        }
        assert_eq!(rollovers, vec![13, 25, 38]);
        assert_eq!(model.whitefly_generation, 4);
        assert!((model.days_since_infestation - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_consecutive_high_risk_counter() {
        let c = aggressive_config();
        let mut model = PestDiseaseModel::new(&c);
        let day1 = model.daily_update(&c, 90.0, 18.0, 14.0, 4.0);
        assert_eq!(day1.days_high_risk, 0);
        assert!(day1.gray_mold_risk >= GRAY_MOLD_HIGH_RISK);
        let day2 = model.daily_update(&c, 90.0, 18.0, 14.0, 4.0);
        assert_eq!(day2.days_high_risk, 1);
        let day3 = model.daily_update(&c, 10.0, 18.0, 14.0, 4.0);
        assert_eq!(day3.days_high_risk, 2);
        assert!(day3.gray_mold_risk < GRAY_MOLD_HIGH_RISK);
        let day4 = model.daily_update(&c, 90.0, 18.0, 14.0, 4.0);
        assert_eq!(day4.days_high_risk, 0);
    }

    #[test]
    fn test_running_counter_matches_history_scan() {
        let c = aggressive_config();
        let mut model = PestDiseaseModel::new(&c);
        let humidity = [90.0, 95.0, 85.0, 20.0, 92.0, 60.0, 88.0, 91.0, 93.0, 10.0, 99.0];
        for h in humidity {
            let expected = model
                .history
                .iter()
                .rev()
                .take_while(|r| r.gray_mold_risk >= GRAY_MOLD_HIGH_RISK)
                .count() as u32;
            let record = model.daily_update(&c, h, 18.0, 14.0, 3.5);
            assert_eq!(record.days_high_risk, expected, "humidity {h}");
        }
    }

    #[test]
    fn test_alert_log_accumulates() {
        let c = config();
        let mut model = PestDiseaseModel::new(&c);
        model.whitefly_population = 500.0;
        let record = model.daily_update(&c, 70.0, 23.0, 17.0, 2.0);
        assert_eq!(record.alerts.len(), 1);
        assert_eq!(record.alerts[0].kind, PestKind::Whitefly);
        assert_eq!(record.alerts[0].level, AlertLevel::High);
        model.daily_update(&c, 70.0, 23.0, 17.0, 2.0);
        assert_eq!(model.alert_log.len(), 2);
        assert_eq!(model.alerts_of_kind(PestKind::Whitefly).len(), 2);
        assert!(model.alerts_of_kind(PestKind::GrayMold).is_empty());
    }

    #[test]
    fn test_risk_summary_empty_history() {
        let summary = PestDiseaseModel::new(&config()).risk_summary();
        assert_eq!(summary.gray_mold_level, RiskLevel::Low);
        assert_eq!(summary.whitefly_level, RiskLevel::Low);
        assert_eq!(summary.total_alerts, 0);
    }

    #[test]
    fn test_risk_summary_uses_last_week() {
        let c = aggressive_config();
        let mut model = PestDiseaseModel::new(&c);
        for _ in 0..5 {
            model.daily_update(&c, 10.0, 23.0, 17.0, 1.0);
        }
        for _ in 0..7 {
            model.daily_update(&c, 95.0, 18.0, 14.0, 4.0);
        }
        let summary = model.risk_summary();
        assert_eq!(summary.gray_mold_level, RiskLevel::High);
        assert!((summary.gray_mold_recent_mean - 100.0).abs() < 1e-9);
        assert_eq!(summary.total_alerts, 7);
    }

    #[test]
    fn test_reset_matches_fresh_model() {
        let c = aggressive_config();
        let mut model = PestDiseaseModel::new(&c);
        for _ in 0..20 {
            model.daily_update(&c, 95.0, 18.0, 14.0, 4.0);
        }
        model.reset(&c);
        assert_eq!(model, PestDiseaseModel::new(&c));
    }
}
