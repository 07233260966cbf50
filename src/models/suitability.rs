use serde::{Deserialize, Serialize};

/// Sowing-fitness band for a crisp 0-100 suitability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SuitabilityCategory {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SuitabilityCategory {
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            SuitabilityCategory::Excellent
        } else if score >= 50.0 {
            SuitabilityCategory::Good
        } else if score >= 30.0 {
            SuitabilityCategory::Fair
        } else {
            SuitabilityCategory::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SuitabilityCategory::Poor => "Poor",
            SuitabilityCategory::Fair => "Fair",
            SuitabilityCategory::Good => "Good",
            SuitabilityCategory::Excellent => "Excellent",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            SuitabilityCategory::Excellent => "Sow",
            SuitabilityCategory::Good => "Sow and monitor",
            SuitabilityCategory::Fair => "Wait if possible",
            SuitabilityCategory::Poor => "Do not sow",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            SuitabilityCategory::Excellent => "●",
            SuitabilityCategory::Good => "◕",
            SuitabilityCategory::Fair => "◑",
            SuitabilityCategory::Poor => "○",
        }
    }
}

impl std::fmt::Display for SuitabilityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scored weather inputs for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub temperature: f64,
    pub rainfall: f64,
    pub score: f64,
    pub category: SuitabilityCategory,
    pub advice: String,
}

impl Assessment {
    pub fn new(temperature: f64, rainfall: f64, score: f64) -> Self {
        let category = SuitabilityCategory::from_score(score);
        Self {
            temperature,
            rainfall,
            score,
            category,
            advice: category.advice().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_thresholds() {
        assert_eq!(SuitabilityCategory::from_score(100.0), SuitabilityCategory::Excellent);
        assert_eq!(SuitabilityCategory::from_score(70.0), SuitabilityCategory::Excellent);
        assert_eq!(SuitabilityCategory::from_score(69.99), SuitabilityCategory::Good);
        assert_eq!(SuitabilityCategory::from_score(50.0), SuitabilityCategory::Good);
        assert_eq!(SuitabilityCategory::from_score(30.0), SuitabilityCategory::Fair);
        assert_eq!(SuitabilityCategory::from_score(29.9), SuitabilityCategory::Poor);
        assert_eq!(SuitabilityCategory::from_score(0.0), SuitabilityCategory::Poor);
    }

    #[test]
    fn categories_are_ordered() {
        assert!(SuitabilityCategory::Excellent > SuitabilityCategory::Good);
        assert!(SuitabilityCategory::Fair > SuitabilityCategory::Poor);
    }

    #[test]
    fn assessment_carries_advice() {
        let assessment = Assessment::new(25.0, 12.0, 86.0);
        assert_eq!(assessment.category, SuitabilityCategory::Excellent);
        assert_eq!(assessment.advice, "Sow");
    }
}
