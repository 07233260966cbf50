use super::membership::MembershipFunction;
use crate::error::{MaizeOpsError, Result};
use serde::{Deserialize, Serialize};

/// Ordered range of discourse sampled at a fixed step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Universe {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Sample points from `min` to `max` inclusive.
    pub fn points(&self) -> Vec<f64> {
        let count = ((self.max - self.min) / self.step).round() as usize;
        (0..=count)
            .map(|i| self.min + i as f64 * self.step)
            .collect()
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if !(self.min.is_finite() && self.max.is_finite() && self.step.is_finite()) {
            return Err("universe bounds must be finite".into());
        }
        if self.min >= self.max {
            return Err(format!(
                "universe [{}, {}] is empty or inverted",
                self.min, self.max
            ));
        }
        if self.step <= 0.0 {
            return Err(format!("universe step {} must be positive", self.step));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub function: MembershipFunction,
}

/// A named universe partitioned into linguistic terms.
///
/// Terms may overlap; a point outside the universe belongs to no term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyVariable {
    pub name: String,
    pub universe: Universe,
    pub terms: Vec<Term>,
}

impl FuzzyVariable {
    pub fn new(name: impl Into<String>, universe: Universe) -> Self {
        Self {
            name: name.into(),
            universe,
            terms: Vec::new(),
        }
    }

    pub fn with_term(mut self, name: impl Into<String>, function: MembershipFunction) -> Self {
        self.terms.push(Term {
            name: name.into(),
            function,
        });
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.universe
            .validate()
            .map_err(|reason| MaizeOpsError::InvalidMembership {
                variable: self.name.clone(),
                term: "<universe>".into(),
                reason,
            })?;

        if self.terms.is_empty() {
            return Err(MaizeOpsError::InvalidMembership {
                variable: self.name.clone(),
                term: "<none>".into(),
                reason: "variable has no terms".into(),
            });
        }

        for (i, term) in self.terms.iter().enumerate() {
            term.function
                .validate()
                .map_err(|reason| MaizeOpsError::InvalidMembership {
                    variable: self.name.clone(),
                    term: term.name.clone(),
                    reason,
                })?;
            if self.terms[..i].iter().any(|t| t.name == term.name) {
                return Err(MaizeOpsError::InvalidMembership {
                    variable: self.name.clone(),
                    term: term.name.clone(),
                    reason: "duplicate term name".into(),
                });
            }
        }
        Ok(())
    }

    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == name)
    }

    pub fn term_names(&self) -> Vec<&str> {
        self.terms.iter().map(|t| t.name.as_str()).collect()
    }

    /// Membership degree of `x` in every term, in term order.
    pub fn fuzzify(&self, x: f64) -> Vec<f64> {
        if !self.universe.contains(x) {
            return vec![0.0; self.terms.len()];
        }
        self.terms.iter().map(|t| t.function.degree(x)).collect()
    }
}
