use super::Forecaster;
use crate::error::{MaizeOpsError, Result};
use crate::models::ForecastDay;

/// Deterministic forecaster computing each day from its absolute day of year
pub struct FnForecaster {
    horizon: u32,
    day_fn: Box<dyn Fn(u32) -> (f64, f64) + Send + Sync>,
}

impl FnForecaster {
    pub fn new(horizon: u32, day_fn: impl Fn(u32) -> (f64, f64) + Send + Sync + 'static) -> Self {
        Self {
            horizon,
            day_fn: Box::new(day_fn),
        }
    }

    /// Same weather every day
    pub fn constant(horizon: u32, temperature: f64, rainfall: f64) -> Self {
        Self::new(horizon, move |_| (temperature, rainfall))
    }
}

impl Forecaster for FnForecaster {
    fn name(&self) -> &str {
        "mock"
    }

    fn horizon(&self) -> u32 {
        self.horizon
    }

    fn window(&self, start_day: u32, length: usize) -> Result<Vec<ForecastDay>> {
        if start_day == 0 || start_day > self.horizon {
            return Err(MaizeOpsError::DataUnavailable(format!(
                "mock has no day {}",
                start_day
            )));
        }
        let last = (start_day as u64 + length as u64 - 1).min(self.horizon as u64) as u32;
        Ok((start_day..=last)
            .map(|day| {
                let (temperature, rainfall) = (self.day_fn)(day);
                ForecastDay::new(day - start_day, temperature, rainfall)
            })
            .collect())
    }
}

/// Forecaster that never has data
pub struct EmptyForecaster;

impl Forecaster for EmptyForecaster {
    fn name(&self) -> &str {
        "empty"
    }

    fn horizon(&self) -> u32 {
        0
    }

    fn window(&self, _start_day: u32, _length: usize) -> Result<Vec<ForecastDay>> {
        Ok(Vec::new())
    }
}
