use super::{DailyValues, ForecastTable, Forecaster};
use crate::error::{MaizeOpsError, Result};
use crate::models::ForecastDay;
use serde::Deserialize;
use std::path::Path;

/// Latest day a forecast file may describe (ten years of days)
pub const MAX_FORECAST_DAY: u32 = 3660;

/// One record of a forecast file; missing values stay missing
#[derive(Debug, Deserialize)]
struct RawForecastDay {
    day: u32,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    rainfall: Option<f64>,
}

/// Daily forecast read from a JSON file:
///
/// ```json
/// [{ "day": 1, "temperature": 14.8, "rainfall": 0.0 }, ...]
/// ```
///
/// `day` is the 1-based day of year. Gaps and missing values load as
/// malformed days, which the fitness aggregation skips.
pub struct FileForecaster {
    table: ForecastTable,
}

impl FileForecaster {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MaizeOpsError::DataUnavailable(format!(
                "Failed to read forecast file {}: {}",
                path.display(),
                e
            ))
        })?;

        let forecaster = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            days = forecaster.table.horizon(),
            "Loaded forecast file"
        );
        Ok(forecaster)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let records: Vec<RawForecastDay> = serde_json::from_str(content)?;
        Ok(Self {
            table: build_table(records)?,
        })
    }
}

fn build_table(records: Vec<RawForecastDay>) -> Result<ForecastTable> {
    if records.is_empty() {
        return Err(MaizeOpsError::DataUnavailable(
            "forecast file has no records".into(),
        ));
    }
    if let Some(bad) = records.iter().find(|r| r.day == 0) {
        return Err(MaizeOpsError::InvalidRecord {
            day_offset: bad.day,
            reason: "days are numbered from 1".into(),
        });
    }
    // Checked before the table is sized from the largest day
    if let Some(bad) = records.iter().find(|r| r.day > MAX_FORECAST_DAY) {
        return Err(MaizeOpsError::InvalidRecord {
            day_offset: bad.day,
            reason: format!("days beyond {} are not supported", MAX_FORECAST_DAY),
        });
    }

    let last_day = records.iter().map(|r| r.day).max().unwrap_or(0) as usize;
    let missing = DailyValues {
        temperature: f64::NAN,
        rainfall: f64::NAN,
    };
    let mut days = vec![missing; last_day];
    let mut seen = vec![false; last_day];

    for record in records {
        let index = (record.day - 1) as usize;
        if seen[index] {
            tracing::warn!(day = record.day, "Duplicate forecast day, keeping the later record");
        }
        seen[index] = true;
        days[index] = DailyValues {
            temperature: record.temperature.unwrap_or(f64::NAN),
            rainfall: record.rainfall.unwrap_or(f64::NAN),
        };
    }

    let gaps = seen.iter().filter(|s| !**s).count();
    if gaps > 0 {
        tracing::warn!(gaps, "Forecast file has missing days");
    }

    Ok(ForecastTable::new(days))
}

impl Forecaster for FileForecaster {
    fn name(&self) -> &str {
        "file"
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
    fn parses_daily_records() {
        let json = r#"[
            {"day": 1, "temperature": 14.5, "rainfall": 0.0},
            {"day": 2, "temperature": 15.0, "rainfall": 2.5},
            {"day": 3, "temperature": 16.0, "rainfall": 8.0}
        ]"#;
        let forecaster = FileForecaster::from_json(json).unwrap();
        assert_eq!(forecaster.horizon(), 3);

        let window = forecaster.window(2, 2).unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].rainfall, 2.5);
        assert_eq!(window[1].temperature, 16.0);
    }

    #[test]
    fn missing_values_become_invalid_days() {
        let json = r#"[
            {"day": 1, "temperature": 14.5, "rainfall": 0.0},
            {"day": 2, "temperature": null, "rainfall": 2.5},
            {"day": 4, "temperature": 16.0, "rainfall": 8.0}
        ]"#;
        let forecaster = FileForecaster::from_json(json).unwrap();
        assert_eq!(forecaster.horizon(), 4);

        let window = forecaster.window(1, 4).unwrap();
        assert!(window[0].is_valid());
        assert!(!window[1].is_valid());
        assert!(!window[2].is_valid(), "day 3 was never provided");
        assert!(window[3].is_valid());
    }

    #[test]
    fn empty_file_is_unavailable() {
        assert!(matches!(
            FileForecaster::from_json("[]"),
            Err(MaizeOpsError::DataUnavailable(_))
        ));
    }

    #[test]
    fn day_zero_is_rejected() {
        let json = r#"[{"day": 0, "temperature": 14.5, "rainfall": 0.0}]"#;
        assert!(FileForecaster::from_json(json).is_err());
    }

    #[test]
    fn far_future_day_is_rejected_before_allocating() {
        let json = r#"[{"day": 4000000000, "temperature": 20.0, "rainfall": 10.0}]"#;
        assert!(matches!(
            FileForecaster::from_json(json),
            Err(MaizeOpsError::InvalidRecord {
                day_offset: 4_000_000_000,
                ..
            })
        ));

        let json = format!(
            r#"[{{"day": {}, "temperature": 20.0, "rainfall": 10.0}}]"#,
            MAX_FORECAST_DAY
        );
        let forecaster = FileForecaster::from_json(&json).unwrap();
        assert_eq!(forecaster.horizon(), MAX_FORECAST_DAY);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            FileForecaster::from_json("{not json"),
            Err(MaizeOpsError::Json(_))
        ));
    }

    #[test]
    fn load_reads_from_disk() {
        let path = std::env::temp_dir()
            .join(format!("maizeops-forecast-{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"day": 1, "temperature": 20.0, "rainfall": 10.0}]"#).unwrap();

        let forecaster = FileForecaster::load(&path).unwrap();
        assert_eq!(forecaster.horizon(), 1);

        std::fs::remove_file(&path).ok();
        assert!(FileForecaster::load(&path).is_err());
    }
}
