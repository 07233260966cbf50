pub mod file;
pub mod synthetic;

#[cfg(test)]
pub(crate) mod mock;

pub use file::FileForecaster;
pub use synthetic::SyntheticForecaster;

use crate::error::{MaizeOpsError, Result};
use crate::models::ForecastDay;

/// Source of daily weather predictions.
pub trait Forecaster: Send + Sync {
    /// Human-readable name
    fn name(&self) -> &str;

    /// Number of forecast days available, counted from day 1
    fn horizon(&self) -> u32;

    /// Up to `length` consecutive days starting at 1-based `start_day`.
    ///
    /// A window that runs past the horizon comes back short; callers decide
    /// whether a short window is usable.
    fn window(&self, start_day: u32, length: usize) -> Result<Vec<ForecastDay>>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyValues {
    pub temperature: f64,
    pub rainfall: f64,
}

/// Day-of-year indexed forecast backing the table-driven forecasters
#[derive(Debug, Clone, Default)]
pub struct ForecastTable {
    days: Vec<DailyValues>,
}

impl ForecastTable {
    pub fn new(days: Vec<DailyValues>) -> Self {
        Self { days }
    }

    pub fn horizon(&self) -> u32 {
        self.days.len() as u32
    }

    pub fn window(&self, start_day: u32, length: usize) -> Result<Vec<ForecastDay>> {
        if start_day == 0 || start_day > self.horizon() {
            return Err(MaizeOpsError::DataUnavailable(format!(
                "no forecast for day {} (horizon {} days)",
                start_day,
                self.horizon()
            )));
        }

        let start = (start_day - 1) as usize;
        let end = start.saturating_add(length).min(self.days.len());

        Ok(self.days[start..end]
            .iter()
            .enumerate()
            .map(|(offset, v)| ForecastDay::new(offset as u32, v.temperature, v.rainfall))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(len: usize) -> ForecastTable {
        ForecastTable::new(
            (0..len)
                .map(|i| DailyValues {
                    temperature: i as f64,
                    rainfall: 1.0,
                })
                .collect(),
        )
    }

    #[test]
    fn window_offsets_restart_at_zero() {
        let window = table(10).window(4, 3).unwrap();
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].day_offset, 0);
        assert_eq!(window[0].temperature, 3.0);
        assert_eq!(window[2].day_offset, 2);
        assert_eq!(window[2].temperature, 5.0);
    }

    #[test]
    fn window_past_horizon_is_short() {
        let window = table(10).window(8, 5).unwrap();
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn window_outside_table_is_unavailable() {
        assert!(matches!(
            table(10).window(0, 5),
            Err(MaizeOpsError::DataUnavailable(_))
        ));
        assert!(table(10).window(11, 5).is_err());
        assert!(ForecastTable::default().window(1, 5).is_err());
    }
}
