use super::forecast::WindowSummary;
use super::suitability::SuitabilityCategory;
use crate::error::{MaizeOpsError, Result};
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Turn a 1-based day of year into a calendar date.
pub fn day_of_year_to_date(year: i32, day: i64) -> Result<NaiveDate> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| MaizeOpsError::Config(format!("invalid base year {}", year)))?;
    if day < 1 {
        return Err(MaizeOpsError::Config(format!(
            "day of year must be at least 1, got {}",
            day
        )));
    }
    jan_first
        .checked_add_days(Days::new((day - 1) as u64))
        .ok_or_else(|| MaizeOpsError::Config(format!("day {} overflows year {}", day, year)))
}

/// Best-found optimum compared against an exhaustive scan of the domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanValidation {
    pub scanned_best_day: i64,
    pub scanned_best_fitness: f64,
    pub gap: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SowingRecommendation {
    pub best_day: i64,
    pub best_fitness: f64,
    pub cycle_length: usize,
    pub sowing_date: NaiveDate,
    pub harvest_date: NaiveDate,
    pub mean_daily_score: f64,
    pub category: SuitabilityCategory,
    pub strategy: String,
    pub history: Vec<f64>,
    pub window: Option<WindowSummary>,
    pub validation: Option<ScanValidation>,
    pub created_at: DateTime<Utc>,
}

impl SowingRecommendation {
    pub fn new(
        best_day: i64,
        best_fitness: f64,
        cycle_length: usize,
        base_year: i32,
        strategy: impl Into<String>,
    ) -> Result<Self> {
        let sowing_date = day_of_year_to_date(base_year, best_day)?;
        let harvest_date = sowing_date
            .checked_add_days(Days::new(cycle_length as u64))
            .ok_or_else(|| MaizeOpsError::Config("harvest date out of range".into()))?;

        // Un-normalized sums are only comparable for equal cycle lengths;
        // the mean is reported for reading, never for ranking.
        let mean_daily_score = if cycle_length > 0 {
            best_fitness / cycle_length as f64
        } else {
            0.0
        };

        Ok(Self {
            best_day,
            best_fitness,
            cycle_length,
            sowing_date,
            harvest_date,
            mean_daily_score,
            category: SuitabilityCategory::from_score(mean_daily_score),
            strategy: strategy.into(),
            history: Vec::new(),
            window: None,
            validation: None,
            created_at: Utc::now(),
        })
    }

    pub fn with_history(mut self, history: Vec<f64>) -> Self {
        self.history = history;
        self
    }

    pub fn with_window(mut self, window: WindowSummary) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_validation(mut self, scanned_best_day: i64, scanned_best_fitness: f64) -> Self {
        self.validation = Some(ScanValidation {
            scanned_best_day,
            scanned_best_fitness,
            gap: scanned_best_fitness - self.best_fitness,
        });
        self
    }

    pub fn sowing_label(&self) -> String {
        format!(
            "{} {}, {}",
            month_name(self.sowing_date.month()),
            self.sowing_date.day(),
            self.sowing_date.year()
        )
    }

    pub fn harvest_label(&self) -> String {
        format!(
            "{} {}, {}",
            month_name(self.harvest_date.month()),
            self.harvest_date.day(),
            self.harvest_date.year()
        )
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "?",
    }
}
