use super::variable::FuzzyVariable;
use crate::error::{MaizeOpsError, Result};
use serde::{Deserialize, Serialize};

/// IF temperature IS `temperature` AND rainfall IS `rainfall`
/// THEN suitability IS `suitability`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub temperature: String,
    pub rainfall: String,
    pub suitability: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Rule {
    pub fn new(
        temperature: impl Into<String>,
        rainfall: impl Into<String>,
        suitability: impl Into<String>,
    ) -> Self {
        Self {
            temperature: temperature.into(),
            rainfall: rainfall.into(),
            suitability: suitability.into(),
            weight: default_weight(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn label(&self) -> String {
        format!(
            "{} temperature + {} rainfall -> {} suitability",
            self.temperature, self.rainfall, self.suitability
        )
    }
}

/// Rule with term names resolved to indices
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompiledRule {
    pub temperature: usize,
    pub rainfall: usize,
    pub consequent: usize,
    pub weight: f64,
}

/// Validated rule base covering every temperature × rainfall combination
/// exactly once.
#[derive(Debug, Clone)]
pub struct RuleBase {
    rules: Vec<Rule>,
    compiled: Vec<CompiledRule>,
}

impl RuleBase {
    pub fn compile(
        rules: &[Rule],
        temperature: &FuzzyVariable,
        rainfall: &FuzzyVariable,
        suitability: &FuzzyVariable,
    ) -> Result<Self> {
        let resolve = |variable: &FuzzyVariable, term: &str| {
            variable.term_index(term).ok_or_else(|| {
                MaizeOpsError::IncompleteRuleBase(format!(
                    "unknown {} term '{}'",
                    variable.name, term
                ))
            })
        };

        let rows = temperature.terms.len();
        let cols = rainfall.terms.len();
        let mut covered = vec![false; rows * cols];
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            let t = resolve(temperature, &rule.temperature)?;
            let r = resolve(rainfall, &rule.rainfall)?;
            let consequent = resolve(suitability, &rule.suitability)?;

            if !(rule.weight.is_finite() && (0.0..=1.0).contains(&rule.weight)) {
                return Err(MaizeOpsError::IncompleteRuleBase(format!(
                    "rule '{}' has weight {} outside [0, 1]",
                    rule.label(),
                    rule.weight
                )));
            }

            let slot = &mut covered[t * cols + r];
            if *slot {
                return Err(MaizeOpsError::IncompleteRuleBase(format!(
                    "more than one rule for {} temperature + {} rainfall",
                    rule.temperature, rule.rainfall
                )));
            }
            *slot = true;

            compiled.push(CompiledRule {
                temperature: t,
                rainfall: r,
                consequent,
                weight: rule.weight,
            });
        }

        let missing: Vec<String> = covered
            .iter()
            .enumerate()
            .filter(|(_, seen)| !**seen)
            .map(|(i, _)| {
                format!(
                    "{} temperature + {} rainfall",
                    temperature.terms[i / cols].name,
                    rainfall.terms[i % cols].name
                )
            })
            .collect();
        if !missing.is_empty() {
            return Err(MaizeOpsError::IncompleteRuleBase(format!(
                "no rule for {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            rules: rules.to_vec(),
            compiled,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub(crate) fn compiled(&self) -> &[CompiledRule] {
        &self.compiled
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
