use crate::models::{ForecastDay, WindowSummary};

/// Rain below this is a dry day (mm)
pub const RAINY_DAY_THRESHOLD_MM: f64 = 1.0;

/// Average temperature over the valid days of a window
pub fn mean_temperature(days: &[ForecastDay]) -> Option<f64> {
    let temps: Vec<f64> = days
        .iter()
        .filter(|d| d.is_valid())
        .map(|d| d.temperature)
        .collect();

    if temps.is_empty() {
        None
    } else {
        Some(temps.iter().sum::<f64>() / temps.len() as f64)
    }
}

/// Total rainfall over the valid days of a window
pub fn total_rainfall(days: &[ForecastDay]) -> f64 {
    days.iter()
        .filter(|d| d.is_valid())
        .map(|d| d.rainfall)
        .sum()
}

/// Count days with at least `threshold_mm` of rain
pub fn rainy_days(days: &[ForecastDay], threshold_mm: f64) -> usize {
    days.iter()
        .filter(|d| d.is_valid() && d.rainfall >= threshold_mm)
        .count()
}

/// Longest run of consecutive dry days
pub fn longest_dry_spell(days: &[ForecastDay], threshold_mm: f64) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for day in days.iter().filter(|d| d.is_valid()) {
        if day.rainfall < threshold_mm {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

pub fn summarize_window(days: &[ForecastDay]) -> WindowSummary {
    let valid: Vec<&ForecastDay> = days.iter().filter(|d| d.is_valid()).collect();

    let min_temperature = valid
        .iter()
        .map(|d| d.temperature)
        .min_by(|a, b| a.total_cmp(b));
    let max_temperature = valid
        .iter()
        .map(|d| d.temperature)
        .max_by(|a, b| a.total_cmp(b));

    WindowSummary {
        days: days.len(),
        valid_days: valid.len(),
        mean_temperature: mean_temperature(days),
        min_temperature,
        max_temperature,
        total_rainfall: total_rainfall(days),
        rainy_days: rainy_days(days, RAINY_DAY_THRESHOLD_MM),
        longest_dry_spell: longest_dry_spell(days, RAINY_DAY_THRESHOLD_MM),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn window() -> Vec<ForecastDay> {
        vec![
            ForecastDay::new(0, 20.0, 0.0),
            ForecastDay::new(1, 22.0, 12.0),
            ForecastDay::new(2, f64::NAN, 5.0),
            ForecastDay::new(3, 24.0, 0.5),
            ForecastDay::new(4, 26.0, 0.0),
            ForecastDay::new(5, 18.0, 3.0),
        ]
    }

    #[test]
    fn mean_skips_invalid_days() {
        assert_relative_eq!(mean_temperature(&window()).unwrap(), 22.0);
        assert!(mean_temperature(&[]).is_none());
    }

    #[test]
    fn rainfall_totals() {
        assert_relative_eq!(total_rainfall(&window()), 15.5);
        assert_eq!(rainy_days(&window(), RAINY_DAY_THRESHOLD_MM), 2);
    }

    #[test]
    fn dry_spell_counts_consecutive_days() {
        assert_eq!(longest_dry_spell(&window(), RAINY_DAY_THRESHOLD_MM), 2);
        assert_eq!(longest_dry_spell(&[], RAINY_DAY_THRESHOLD_MM), 0);
    }

    #[test]
    fn summary_collects_extremes() {
        let summary = summarize_window(&window());
        assert_eq!(summary.days, 6);
        assert_eq!(summary.valid_days, 5);
        assert_eq!(summary.min_temperature, Some(18.0));
        assert_eq!(summary.max_temperature, Some(26.0));
        assert_eq!(summary.rainy_days, 2);
        assert_eq!(summary.longest_dry_spell, 2);
    }
}
