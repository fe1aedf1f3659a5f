//! Assertion helpers for `TestGreenhouse` integration tests.

use crate::stage::GrowthStage;

use super::TestGreenhouse;

const EPSILON: f64 = 1e-9;

impl TestGreenhouse {
    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    /// Assert the crop is currently in `stage`.
    pub fn assert_stage(&self, stage: GrowthStage) {
        let growth = self.growth();
        assert_eq!(
            growth.stage, stage,
            "Expected {stage} on day {}, found {} at {:.1} °C·d",
            growth.day, growth.stage, growth.cumulative_thermal_time
        );
    }

    /// Assert that the crop entered `stage` on `day`.
    pub fn assert_transition_on(&self, stage: GrowthStage, day: u32) {
        let transition = self.growth().transitions.iter().find(|t| t.to == stage);
        match transition {
            Some(t) => assert_eq!(
                t.day, day,
                "Expected {stage} on day {day}, entered on day {} at {:.1} °C·d",
                t.day, t.cumulative_thermal_time
            ),
            None => panic!("{stage} never reached in {} days", self.growth().day),
        }
    }

    /// Assert every recorded day keeps total dry matter equal to the pool sum
    /// and never loses dry matter.
    pub fn assert_pools_conserved(&self) {
        let mut previous = 0.0;
        for r in self.results() {
            let pools =
                r.leaf_dry_matter + r.stem_dry_matter + r.fruit_dry_matter + r.root_dry_matter;
            assert!(
                (r.total_dry_matter - pools).abs() < EPSILON,
                "Day {}: total {} != pool sum {pools}",
                r.day,
                r.total_dry_matter
            );
            assert!(
                r.total_dry_matter >= previous - EPSILON,
                "Day {}: dry matter fell from {previous} to {}",
                r.day,
                r.total_dry_matter
            );
            previous = r.total_dry_matter;
        }
    }

    /// Assert every recorded day stays inside the documented state ranges and
    /// no invariant violation was counted.
    pub fn assert_ranges_hold(&self) {
        let lai_min = self.simulator().config().growth.lai_initial;
        let lai_max = self.simulator().config().growth.lai_max;
        for r in self.results() {
            assert!(
                (lai_min - EPSILON..=lai_max + EPSILON).contains(&r.leaf_area_index),
                "Day {}: LAI {} out of range",
                r.day,
                r.leaf_area_index
            );
            assert!(
                (0.5..=3.5).contains(&r.soil_ec),
                "Day {}: EC {} out of range",
                r.day,
                r.soil_ec
            );
            assert!(
                (0.0..=1.0).contains(&r.soil_water_content),
                "Day {}: SWC {} out of range",
                r.day,
                r.soil_water_content
            );
            assert!(
                (0.0..=100.0).contains(&r.gray_mold_risk),
                "Day {}: gray mold risk {} out of range",
                r.day,
                r.gray_mold_risk
            );
            assert!(
                r.whitefly_population >= 0.0,
                "Day {}: negative whitefly population",
                r.day
            );
        }
        let violations = self.violations();
        assert_eq!(violations.total(), 0, "Invariant violations: {violations:?}");
    }

    /// Assert cumulative thermal time never decreases and stages never regress.
    pub fn assert_monotonic_development(&self) {
        for pair in self.results().windows(2) {
            assert!(
                pair[1].cumulative_thermal_time >= pair[0].cumulative_thermal_time,
                "Thermal time fell on day {}",
                pair[1].day
            );
            assert!(
                pair[1].stage >= pair[0].stage,
                "Stage regressed on day {}",
                pair[1].day
            );
        }
    }
}
