use crate::error::{MaizeOpsError, Result};
use serde::{Deserialize, Serialize};

/// Inclusive range of candidate start days (day of year, 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDomain {
    start: i64,
    end: i64,
}

impl DayDomain {
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start < 1 {
            return Err(MaizeOpsError::Config(format!(
                "domain start must be at least day 1, got {}",
                start
            )));
        }
        if start > end {
            return Err(MaizeOpsError::Config(format!(
                "domain [{}, {}] is empty or inverted",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn contains(&self, day: i64) -> bool {
        day >= self.start && day <= self.end
    }

    /// Number of whole days in the domain
    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn days(&self) -> impl Iterator<Item = i64> {
        self.start..=self.end
    }

    pub fn span(&self) -> f64 {
        (self.end - self.start) as f64
    }

    /// Clamp a continuous position into the domain, then round to a whole day.
    pub fn snap(&self, position: f64) -> i64 {
        if position.is_nan() {
            return self.start;
        }
        let clamped = position.clamp(self.start as f64, self.end as f64);
        (clamped.round() as i64).clamp(self.start, self.end)
    }
}

impl Default for DayDomain {
    fn default() -> Self {
        Self { start: 1, end: 240 }
    }
}

impl std::fmt::Display for DayDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_domain_fits_a_120_day_cycle_in_a_year() {
        let domain = DayDomain::default();
        assert_eq!(domain.start(), 1);
        assert_eq!(domain.end(), 240);
        assert_eq!(domain.len(), 240);
    }

    #[test]
    fn inverted_domain_is_rejected() {
        assert!(DayDomain::new(10, 5).is_err());
        assert!(DayDomain::new(0, 5).is_err());
        assert!(DayDomain::new(7, 7).is_ok());
    }

    #[test]
    fn contains_is_inclusive() {
        let domain = DayDomain::default();
        assert!(domain.contains(1));
        assert!(domain.contains(240));
        assert!(!domain.contains(0));
        assert!(!domain.contains(241));
    }

    #[test]
    fn snap_rounds_and_clamps() {
        let domain = DayDomain::default();
        assert_eq!(domain.snap(45.4), 45);
        assert_eq!(domain.snap(45.5), 46);
        assert_eq!(domain.snap(-12.0), 1);
        assert_eq!(domain.snap(999.0), 240);
        assert_eq!(domain.snap(f64::NAN), 1);
    }
}
