use crate::error::{MaizeOpsError, Result};
use serde::{Deserialize, Serialize};

/// Predicted weather for one day of a cultivation cycle.
///
/// `day_offset` counts from the first day of the requested window, so the
/// first record of every window has offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub day_offset: u32,
    pub temperature: f64, // °C
    pub rainfall: f64,    // mm
}

impl ForecastDay {
    pub fn new(day_offset: u32, temperature: f64, rainfall: f64) -> Self {
        Self {
            day_offset,
            temperature,
            rainfall,
        }
    }

    /// Reject records the evaluator cannot score.
    pub fn validate(&self) -> Result<()> {
        if !self.temperature.is_finite() {
            return Err(MaizeOpsError::InvalidRecord {
                day_offset: self.day_offset,
                reason: format!("temperature is {}", self.temperature),
            });
        }
        if !self.rainfall.is_finite() {
            return Err(MaizeOpsError::InvalidRecord {
                day_offset: self.day_offset,
                reason: format!("rainfall is {}", self.rainfall),
            });
        }
        if self.rainfall < 0.0 {
            return Err(MaizeOpsError::InvalidRecord {
                day_offset: self.day_offset,
                reason: format!("negative rainfall {:.1}mm", self.rainfall),
            });
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Summary of the weather inside one forecast window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub days: usize,
    pub valid_days: usize,
    pub mean_temperature: Option<f64>,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub total_rainfall: f64,
    pub rainy_days: usize,
    /// Longest run of consecutive dry days
    pub longest_dry_spell: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_record_is_valid() {
        assert!(ForecastDay::new(0, 22.5, 8.0).is_valid());
        assert!(ForecastDay::new(3, -2.0, 0.0).is_valid());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(!ForecastDay::new(0, f64::NAN, 8.0).is_valid());
        assert!(!ForecastDay::new(0, 22.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn negative_rainfall_is_rejected() {
        match ForecastDay::new(7, 22.0, -1.0).validate() {
            Err(MaizeOpsError::InvalidRecord { day_offset, .. }) => assert_eq!(day_offset, 7),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }
}
