//! Same-day coupling between the engines: soil and pest engines consume the
//! canopy the growth engine produced earlier that day.

use crate::config::ModelConfig;
use crate::growth::GrowthModel;
use crate::pest_disease::gray_mold_risk;
use crate::soil::{potassium_uptake, root_water_uptake};
use crate::stage::GrowthStage;
use crate::test_harness::TestGreenhouse;

#[test]
fn test_first_day_uptake_uses_todays_canopy() {
    let config = ModelConfig::default();
    let mut growth = GrowthModel::new(&config);
    let today = growth.daily_update(&config, 23.0, 17.0, 1000.0, 750.0);
    assert!(today.leaf_area_index > config.growth.lai_initial);

    let mut greenhouse = TestGreenhouse::new();
    greenhouse.run_reference_days(1);
    let day1 = greenhouse.day(1);

    let expected = root_water_uptake(
        &config,
        today.leaf_area_index,
        config.water.initial_swc,
        config.water.ec_opt,
        23.0,
        1000.0,
    );
    assert!((day1.leaf_area_index - today.leaf_area_index).abs() < 1e-12);
    assert!(
        (day1.water_uptake - expected).abs() < 1e-12,
        "uptake {} vs {expected}",
        day1.water_uptake
    );
}

#[test]
fn test_uptake_uses_start_of_day_soil() {
    let config = ModelConfig::default();
    let mut greenhouse = TestGreenhouse::new();
    greenhouse.run_reference_days(100);
    let yesterday = greenhouse.day(99);
    let today = greenhouse.day(100);

    let expected = root_water_uptake(
        &config,
        today.leaf_area_index,
        yesterday.soil_water_content,
        yesterday.soil_ec,
        23.0,
        1000.0,
    );
    assert!((today.water_uptake - expected).abs() < 1e-12);
}

#[test]
fn test_gray_mold_sees_todays_leaf_area() {
    let config = ModelConfig::default();
    let mut greenhouse = TestGreenhouse::new();
    greenhouse.run_reference_days(150);
    let yesterday = greenhouse.day(149);
    let today = greenhouse.day(150);
    // Late fruiting: the canopy is still expanding past LAI 3.
    assert!(today.leaf_area_index > yesterday.leaf_area_index);
    assert!(yesterday.leaf_area_index > 3.0);

    let expected = gray_mold_risk(&config, 70.0, 20.0, today.leaf_area_index, 0);
    assert!((today.gray_mold_risk - expected).abs() < 1e-12);
}

#[test]
fn test_potassium_follows_todays_stage() {
    let config = ModelConfig::default();
    let mut greenhouse = TestGreenhouse::new();
    greenhouse.run_reference_days(39);
    let day39 = greenhouse.day(39);
    assert_eq!(day39.stage, GrowthStage::Flowering);

    let expected = potassium_uptake(
        &config,
        day39.soil_ec,
        day39.soil_water_content,
        GrowthStage::Flowering,
    );
    assert!((day39.daily_k_uptake - expected).abs() < 1e-12);
}

#[test]
fn test_engine_histories_stay_aligned() {
    let mut greenhouse = TestGreenhouse::new();
    greenhouse.run_reference_days(25);
    assert_eq!(greenhouse.growth().history.len(), 25);
    assert_eq!(greenhouse.soil().history.len(), 25);
    assert_eq!(greenhouse.pests().history.len(), 25);
    assert_eq!(greenhouse.results().len(), 25);
    for (i, r) in greenhouse.results().iter().enumerate() {
        assert_eq!(r.day as usize, i + 1);
        assert_eq!(r.soil_ec, greenhouse.soil().history[i].soil_ec);
        assert_eq!(r.gray_mold_risk, greenhouse.pests().history[i].gray_mold_risk);
    }
}
