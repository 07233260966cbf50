use super::{DailyValues, ForecastTable, Forecaster};
use crate::error::{MaizeOpsError, Result};
use crate::models::ForecastDay;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp, Normal};
use std::f64::consts::PI;

const DAYS_PER_YEAR: u32 = 365;

// Highland climate: cool dry winter, warm spring, wet summer with a
// mid-summer dry spell.
const MEAN_TEMPERATURE: f64 = 20.0;
const TEMPERATURE_AMPLITUDE: f64 = 5.0;
const WARMEST_DAY: f64 = 135.0;
const TEMPERATURE_NOISE: f64 = 1.5;

const WET_SEASON: (u32, u32) = (152, 280);
const DRY_SPELL: (u32, u32) = (200, 215);
const WET_RAIN_CHANCE: f64 = 0.6;
const DRY_SPELL_RAIN_CHANCE: f64 = 0.3;
const DRY_SEASON_RAIN_CHANCE: f64 = 0.08;
const WET_MEAN_RAINFALL: f64 = 10.0;
const DRY_MEAN_RAINFALL: f64 = 4.0;
const MAX_RAINFALL: f64 = 80.0;

/// Seeded seasonal forecast; the same seed always yields the same year.
pub struct SyntheticForecaster {
    table: ForecastTable,
}

impl SyntheticForecaster {
    pub fn new(seed: u64, horizon_days: u32) -> Result<Self> {
        if horizon_days == 0 {
            return Err(MaizeOpsError::Config(
                "synthetic forecast horizon must be at least one day".into(),
            ));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let temperature_noise = Normal::new(0.0, TEMPERATURE_NOISE)
            .map_err(|e| MaizeOpsError::Config(format!("temperature noise: {}", e)))?;
        let wet_rain = Exp::new(1.0 / WET_MEAN_RAINFALL)
            .map_err(|e| MaizeOpsError::Config(format!("wet season rainfall: {}", e)))?;
        let dry_rain = Exp::new(1.0 / DRY_MEAN_RAINFALL)
            .map_err(|e| MaizeOpsError::Config(format!("dry season rainfall: {}", e)))?;

        let days = (1..=horizon_days)
            .map(|day| {
                let day_of_year = (day - 1) % DAYS_PER_YEAR + 1;

                let seasonal = TEMPERATURE_AMPLITUDE
                    * (2.0 * PI * (day_of_year as f64 - WARMEST_DAY) / DAYS_PER_YEAR as f64).cos();
                let temperature = MEAN_TEMPERATURE + seasonal + temperature_noise.sample(&mut rng);

                let (chance, amount) = if in_range(day_of_year, DRY_SPELL) {
                    (DRY_SPELL_RAIN_CHANCE, &wet_rain)
                } else if in_range(day_of_year, WET_SEASON) {
                    (WET_RAIN_CHANCE, &wet_rain)
                } else {
                    (DRY_SEASON_RAIN_CHANCE, &dry_rain)
                };
                let rainfall = if rng.gen_bool(chance) {
                    amount.sample(&mut rng).min(MAX_RAINFALL)
                } else {
                    0.0
                };

                DailyValues {
                    temperature,
                    rainfall,
                }
            })
            .collect();

        tracing::debug!(seed, horizon_days, "Generated synthetic forecast");

        Ok(Self {
            table: ForecastTable::new(days),
        })
    }
}

fn in_range(day: u32, (first, last): (u32, u32)) -> bool {
    day >= first && day <= last
}

impl Forecaster for SyntheticForecaster {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn horizon(&self) -> u32 {
        self.table.horizon()
    }

    fn window(&self, start_day: u32, length: usize) -> Result<Vec<ForecastDay>> {
        self.table.window(start_day, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_forecast() {
        let a = SyntheticForecaster::new(7, 365).unwrap();
        let b = SyntheticForecaster::new(7, 365).unwrap();
        assert_eq!(a.window(1, 365).unwrap(), b.window(1, 365).unwrap());
    }

    #[test]
    fn different_seeds_differ() {
        let a = SyntheticForecaster::new(1, 365).unwrap();
        let b = SyntheticForecaster::new(2, 365).unwrap();
        assert_ne!(a.window(1, 365).unwrap(), b.window(1, 365).unwrap());
    }

    #[test]
    fn records_are_well_formed() {
        let forecaster = SyntheticForecaster::new(42, 365).unwrap();
        let year = forecaster.window(1, 365).unwrap();
        assert_eq!(year.len(), 365);
        assert!(year.iter().all(|d| d.is_valid()));
        assert!(year.iter().all(|d| d.rainfall <= MAX_RAINFALL));
    }

    #[test]
    fn summer_is_wetter_than_winter() {
        let forecaster = SyntheticForecaster::new(42, 365).unwrap();
        let winter: f64 = forecaster.window(1, 60).unwrap().iter().map(|d| d.rainfall).sum();
        let summer: f64 = forecaster.window(160, 60).unwrap().iter().map(|d| d.rainfall).sum();
        assert!(summer > winter, "summer {} vs winter {}", summer, winter);
    }

    #[test]
    fn zero_horizon_is_rejected() {
        assert!(SyntheticForecaster::new(42, 0).is_err());
    }
}
