//! Synthetic greenhouse climate for runs without a weather file.
//!
//! Seeded with `ChaCha8Rng` so the same seed always yields the same season.

use std::f64::consts::PI;

use chrono::{Days, NaiveDate};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tomato_sim::weather::WeatherRecord;

/// Standard normal sample via Box–Muller.
fn standard_normal(rng: &mut ChaCha8Rng) -> f64 {
    // 1 - u keeps the logarithm argument in (0, 1].
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn normal(rng: &mut ChaCha8Rng, mean: f64, std_dev: f64) -> f64 {
    mean + std_dev * standard_normal(rng)
}

/// `days` of dated weather starting at `start`.
///
/// Temperatures follow a 30-day cycle, humidity a 7-day cycle. CO2
/// enrichment is on for roughly seven days in ten.
pub fn synthetic_season(days: usize, start: NaiveDate, seed: u64) -> Vec<WeatherRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..days)
        .map(|i| {
            let month = (2.0 * PI * i as f64 / 30.0).sin();
            let week = (2.0 * PI * i as f64 / 7.0).sin();

            let day_temp = 21.5 + 3.5 * month + normal(&mut rng, 0.0, 1.5);
            let night_temp = 16.0 + 2.0 * month + normal(&mut rng, 0.0, 1.0);
            let humidity = (72.5 + 12.5 * week + normal(&mut rng, 0.0, 5.0)).clamp(50.0, 95.0);
            let par = (1000.0 + 200.0 * month + normal(&mut rng, 0.0, 100.0)).clamp(500.0, 1500.0);
            let enriched = if rng.gen_bool(0.7) { 750.0 } else { 400.0 };
            let co2 = (enriched + normal(&mut rng, 0.0, 20.0)).clamp(380.0, 800.0);

            let record = WeatherRecord::new(day_temp, night_temp, humidity, par, co2);
            match start.checked_add_days(Days::new(i as u64)) {
                Some(date) => record.with_date(date),
                None => record,
            }
        })
        .collect()
}
