#[cfg(test)]
mod tests {
    use crate::config::ModelConfig;
    use crate::growth::helpers::{
        allocation_ratios, co2_factor, daily_thermal_time, fruit_set_rate, leaf_area_index,
        light_interception, maintenance_respiration, net_assimilation,
        photosynthesis_temperature_factor, stage_for_thermal_time,
    };
    use crate::growth::types::{DryMatterPools, GrowthModel};
    use crate::stage::GrowthStage;

    fn config() -> ModelConfig {
        ModelConfig::default()
    }

    /// Run `days` of the reference greenhouse climate.
    fn run_reference(model: &mut GrowthModel, config: &ModelConfig, days: u32) {
        for _ in 0..days {
            model.daily_update(config, 23.0, 17.0, 1000.0, 750.0);
        }
    }

    // -------------------------------------------------------------------------
    // Thermal time
    // -------------------------------------------------------------------------

    #[test]
    fn test_thermal_time_reference_day() {
        let gdd = daily_thermal_time(&config(), 23.0, 17.0, GrowthStage::Seedling);
        assert!((gdd - 9.2).abs() < 1e-9, "Expected 9.2, got {}", gdd);
    }

    #[test]
    fn test_thermal_time_uses_stage_correction() {
        let gdd = daily_thermal_time(&config(), 23.0, 17.0, GrowthStage::Fruiting);
        assert!((gdd - 9.5).abs() < 1e-9, "Expected 9.5, got {}", gdd);
        let gdd = daily_thermal_time(&config(), 23.0, 17.0, GrowthStage::Harvest);
        assert!((gdd - 9.8).abs() < 1e-9, "Expected 9.8, got {}", gdd);
    }

    #[test]
    fn test_thermal_time_zero_at_base() {
        assert_eq!(daily_thermal_time(&config(), 12.0, 8.0, GrowthStage::Seedling), 0.0);
        assert_eq!(daily_thermal_time(&config(), 10.0, 10.0, GrowthStage::Flowering), 0.0);
    }

    #[test]
    fn test_thermal_time_zero_below_base() {
        assert_eq!(daily_thermal_time(&config(), 4.0, -2.0, GrowthStage::Seedling), 0.0);
    }

    #[test]
    fn test_stage_thresholds() {
        let c = config();
        assert_eq!(stage_for_thermal_time(&c, 0.0), GrowthStage::Seedling);
        assert_eq!(stage_for_thermal_time(&c, 349.9), GrowthStage::Seedling);
        assert_eq!(stage_for_thermal_time(&c, 350.0), GrowthStage::Flowering);
        assert_eq!(stage_for_thermal_time(&c, 799.9), GrowthStage::Flowering);
        assert_eq!(stage_for_thermal_time(&c, 800.0), GrowthStage::Fruiting);
        assert_eq!(stage_for_thermal_time(&c, 1599.9), GrowthStage::Fruiting);
        assert_eq!(stage_for_thermal_time(&c, 1600.0), GrowthStage::Harvest);
        assert_eq!(stage_for_thermal_time(&c, 5000.0), GrowthStage::Harvest);
    }

    // -------------------------------------------------------------------------
    // Leaf area index
    // -------------------------------------------------------------------------

    #[test]
    fn test_seedling_lai_exponential() {
        let lai = leaf_area_index(&config(), GrowthStage::Seedling, 10, 92.0);
        let expected = 0.1 * (0.8_f64).exp();
        assert!((lai - expected).abs() < 1e-9, "Expected {}, got {}", expected, lai);
    }

    #[test]
    fn test_seedling_lai_capped() {
        let lai = leaf_area_index(&config(), GrowthStage::Seedling, 50, 340.0);
        assert!((lai - 1.5).abs() < 1e-9, "Expected 1.5, got {}", lai);
    }

    #[test]
    fn test_flowering_lai_midpoint() {
        let lai = leaf_area_index(&config(), GrowthStage::Flowering, 60, 575.0);
        assert!((lai - 2.25).abs() < 1e-9, "Expected 2.25, got {}", lai);
    }

    #[test]
    fn test_fruiting_lai_floor_and_plateau() {
        let c = config();
        let at_midpoint = leaf_area_index(&c, GrowthStage::Fruiting, 100, 1200.0);
        assert!((at_midpoint - 3.0).abs() < 1e-9, "Expected floor 3.0, got {}", at_midpoint);
        let late = leaf_area_index(&c, GrowthStage::Fruiting, 160, 2000.0);
        assert!(late > 4.4 && late <= 4.5, "Expected near LAI max, got {}", late);
    }

    #[test]
    fn test_harvest_lai_plateau() {
        let lai = leaf_area_index(&config(), GrowthStage::Harvest, 180, 1700.0);
        assert!((lai - 4.275).abs() < 1e-9, "Expected 4.275, got {}", lai);
    }

    // -------------------------------------------------------------------------
    // Photosynthesis
    // -------------------------------------------------------------------------

    #[test]
    fn test_light_interception_bounds() {
        let c = config();
        assert_eq!(light_interception(&c, 0.0), 0.0);
        assert_eq!(light_interception(&c, -1.0), 0.0);
        let full = light_interception(&c, 4.5);
        assert!(full > 0.9 && full < 1.0, "got {}", full);
    }

    #[test]
    fn test_photosynthesis_temperature_factor_curve() {
        let c = config();
        assert!((photosynthesis_temperature_factor(&c, 5.0) - 0.1).abs() < 1e-9);
        assert!((photosynthesis_temperature_factor(&c, 10.0) - 0.3).abs() < 1e-9);
        assert!((photosynthesis_temperature_factor(&c, 23.0) - 1.0).abs() < 1e-9);
        assert!((photosynthesis_temperature_factor(&c, 30.0) - 0.86).abs() < 1e-9);
        assert!((photosynthesis_temperature_factor(&c, 40.0) - 0.5).abs() < 1e-9);
        assert!((photosynthesis_temperature_factor(&c, 50.0) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_co2_factor_half_saturation() {
        let c = config();
        assert!((co2_factor(&c, 350.0) - 0.5).abs() < 1e-9);
        assert_eq!(co2_factor(&c, 20.0), 0.0);
        assert!((co2_factor(&c, 750.0) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_respiration_doubles_per_ten_degrees() {
        let c = config();
        assert!((maintenance_respiration(&c, 20.0) - 12.0).abs() < 1e-9);
        assert!((maintenance_respiration(&c, 30.0) - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_net_assimilation_zero_for_small_canopy() {
        let net = net_assimilation(&config(), 0.1, 1000.0, 23.0, 750.0);
        assert_eq!(net, 0.0);
    }

    #[test]
    fn test_net_assimilation_full_canopy() {
        let net = net_assimilation(&config(), 4.5, 1000.0, 23.0, 750.0);
        assert!(net > 7.9 && net < 8.1, "Expected ~7.98 g/plant/d, got {}", net);
    }

    #[test]
    fn test_net_assimilation_dark_is_zero() {
        assert_eq!(net_assimilation(&config(), 4.5, 0.0, 23.0, 750.0), 0.0);
        assert_eq!(net_assimilation(&config(), 4.5, -50.0, 23.0, 750.0), 0.0);
    }

    // -------------------------------------------------------------------------
    // Partitioning and fruit set
    // -------------------------------------------------------------------------

    #[test]
    fn test_allocation_sums_to_one() {
        let c = config();
        for stage in GrowthStage::ALL {
            let r = allocation_ratios(&c, stage);
            let sum = r.leaf + r.stem + r.root + r.fruit;
            assert!((sum - 1.0).abs() < 1e-9, "{stage}: ratios sum to {}", sum);
        }
        assert_eq!(allocation_ratios(&c, GrowthStage::Seedling).fruit, 0.0);
    }

    #[test]
    fn test_pools_ignore_negative_allocation() {
        let mut pools = DryMatterPools::default();
        pools.allocate(-3.0, allocation_ratios(&config(), GrowthStage::Fruiting));
        assert_eq!(pools, DryMatterPools::default());
    }

    #[test]
    fn test_fruit_set_optimum() {
        let rate = fruit_set_rate(&config(), 23.0, 17.0);
        assert!((rate - 0.82).abs() < 1e-9, "Expected 0.82, got {}", rate);
    }

    #[test]
    fn test_fruit_set_floor_in_cold_and_heat() {
        let c = config();
        assert!((fruit_set_rate(&c, 5.0, 5.0) - 0.5).abs() < 1e-9);
        assert!((fruit_set_rate(&c, 35.0, 25.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_fruit_set_night_bands_ignore_night_limits() {
        let base = config();
        let mut shifted = config();
        shifted.thermal.min_night_temp = 10.0;
        shifted.thermal.max_night_temp = 24.0;
        for night in [13.0, 15.5, 18.0, 20.0] {
            let expected = fruit_set_rate(&base, 23.0, night);
            let got = fruit_set_rate(&shifted, 23.0, night);
            assert!((got - expected).abs() < 1e-12, "night {night}: {got} vs {expected}");
        }
        // 14-17 °C band: 0.6 + 0.4 * 1.5 / 3
        assert!((fruit_set_rate(&shifted, 23.0, 15.5) - 0.82 * 0.8).abs() < 1e-9);
    }

    // -------------------------------------------------------------------------
    // Engine
    // -------------------------------------------------------------------------

    #[test]
    fn test_new_model_initial_state() {
        let model = GrowthModel::new(&config());
        assert_eq!(model.day, 0);
        assert_eq!(model.stage, GrowthStage::Seedling);
        assert!((model.leaf_area_index - 0.1).abs() < 1e-12);
        assert_eq!(model.total_dry_matter, 0.0);
        assert!(model.history.is_empty());
    }

    #[test]
    fn test_first_day_update() {
        let c = config();
        let mut model = GrowthModel::new(&c);
        let record = model.daily_update(&c, 23.0, 17.0, 1000.0, 750.0);
        assert_eq!(record.day, 1);
        assert_eq!(record.stage, GrowthStage::Seedling);
        assert!((record.cumulative_thermal_time - 9.2).abs() < 1e-9);
        assert_eq!(record.fruit_set_rate, 0.0);
        assert!(record.stage_transition.is_none());
        assert_eq!(model.history.len(), 1);
    }

    #[test]
    fn test_flowering_starts_on_first_crossing_day() {
        let c = config();
        let mut model = GrowthModel::new(&c);
        run_reference(&mut model, &c, 38);
        assert_eq!(model.stage, GrowthStage::Seedling);
        let record = model.daily_update(&c, 23.0, 17.0, 1000.0, 750.0);
        assert_eq!(record.stage, GrowthStage::Flowering);
        let transition = record.stage_transition.expect("transition on day 39");
        assert_eq!(transition.day, 39);
        assert_eq!(transition.from, GrowthStage::Seedling);
        assert!(record.fruit_set_rate >= 0.5);
    }

    #[test]
    fn test_transition_day_uses_previous_stage_correction() {
        let c = config();
        let mut model = GrowthModel::new(&c);
        run_reference(&mut model, &c, 87);
        assert_eq!(model.stage, GrowthStage::Fruiting);
        // Day 87 accrued with the flowering factor; day 88 with fruiting.
        let day_87 = &model.history[86];
        assert!((day_87.daily_thermal_time - 9.2).abs() < 1e-9);
        let day_88 = model.daily_update(&c, 23.0, 17.0, 1000.0, 750.0);
        assert!((day_88.daily_thermal_time - 9.5).abs() < 1e-9);
    }

    #[test]
    fn test_stage_never_regresses_and_dry_matter_conserved() {
        let c = config();
        let mut model = GrowthModel::new(&c);
        run_reference(&mut model, &c, 80);
        // A cold snap adds no thermal time and must not move the stage back.
        for _ in 0..10 {
            model.daily_update(&c, 8.0, 4.0, 300.0, 400.0);
        }
        let mut previous = model.history[0].clone();
        for record in &model.history[1..] {
            assert!(record.stage >= previous.stage);
            assert!(record.cumulative_thermal_time >= previous.cumulative_thermal_time);
            assert!(record.pools.leaf >= previous.pools.leaf);
            assert!(record.pools.fruit >= previous.pools.fruit);
            assert!((record.total_dry_matter - record.pools.total()).abs() < 1e-9);
            previous = record.clone();
        }
    }

    #[test]
    fn test_reset_matches_fresh_model() {
        let c = config();
        let mut model = GrowthModel::new(&c);
        run_reference(&mut model, &c, 60);
        model.reset(&c);
        assert_eq!(model, GrowthModel::new(&c));
    }

    #[test]
    fn test_stage_durations() {
        let c = config();
        let mut model = GrowthModel::new(&c);
        run_reference(&mut model, &c, 100);
        let durations = model.stage_durations();
        assert_eq!(durations[0], (GrowthStage::Seedling, 38));
        assert_eq!(durations[1], (GrowthStage::Flowering, 48));
        assert_eq!(durations[2], (GrowthStage::Fruiting, 14));
        assert_eq!(durations[3], (GrowthStage::Harvest, 0));
    }
}
