//! Fuzzy model for maize sowing suitability.
//!
//! Temperature and rainfall each carry three terms; the nine rules map
//! every pairing onto a low / medium / high suitability band:
//!
//! | rainfall \ temp | low    | optimal | high   |
//! |-----------------|--------|---------|--------|
//! | scarce          | low    | medium  | low    |
//! | adequate        | medium | high    | medium |
//! | excessive       | low    | medium  | low    |

use super::engine::FuzzyEngine;
use super::membership::MembershipFunction;
use super::rule_base::Rule;
use super::variable::{FuzzyVariable, Universe};
use crate::error::Result;

pub const TEMPERATURE: &str = "temperature";
pub const RAINFALL: &str = "rainfall";
pub const SUITABILITY: &str = "suitability";

/// Daily mean temperature, 5-45°C
pub fn temperature_variable() -> FuzzyVariable {
    FuzzyVariable::new(TEMPERATURE, Universe::new(5.0, 45.0, 0.5))
        .with_term("low", MembershipFunction::trapezoid(5.0, 5.0, 12.0, 18.0))
        .with_term("optimal", MembershipFunction::triangle(18.0, 25.0, 32.0))
        .with_term("high", MembershipFunction::trapezoid(32.0, 35.0, 45.0, 45.0))
}

/// Daily rainfall, 0-45mm
pub fn rainfall_variable() -> FuzzyVariable {
    FuzzyVariable::new(RAINFALL, Universe::new(0.0, 45.0, 0.5))
        .with_term("scarce", MembershipFunction::trapezoid(0.0, 0.0, 3.0, 7.0))
        .with_term("adequate", MembershipFunction::triangle(5.0, 12.0, 25.0))
        .with_term(
            "excessive",
            MembershipFunction::trapezoid(20.0, 28.0, 45.0, 45.0),
        )
}

/// Sowing suitability score, 0-100
pub fn suitability_variable() -> FuzzyVariable {
    FuzzyVariable::new(SUITABILITY, Universe::new(0.0, 100.0, 1.0))
        .with_term("low", MembershipFunction::trapezoid(0.0, 0.0, 15.0, 35.0))
        .with_term("medium", MembershipFunction::triangle(25.0, 50.0, 75.0))
        .with_term(
            "high",
            MembershipFunction::trapezoid(65.0, 85.0, 100.0, 100.0),
        )
}

pub fn sowing_rules() -> Vec<Rule> {
    vec![
        // Dry soil: only a good temperature rescues germination
        Rule::new("low", "scarce", "low"),
        Rule::new("optimal", "scarce", "medium"),
        Rule::new("high", "scarce", "low"),
        Rule::new("low", "adequate", "medium"),
        Rule::new("optimal", "adequate", "high"),
        Rule::new("high", "adequate", "medium"),
        // Waterlogging: seed rot under cold or heat
        Rule::new("low", "excessive", "low"),
        Rule::new("optimal", "excessive", "medium"),
        Rule::new("high", "excessive", "low"),
    ]
}

impl FuzzyEngine {
    /// Engine for the maize sowing model.
    pub fn maize_sowing() -> Result<Self> {
        FuzzyEngine::new(
            temperature_variable(),
            rainfall_variable(),
            suitability_variable(),
            &sowing_rules(),
        )
    }
}
