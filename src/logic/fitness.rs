use super::fuzzy::FuzzyEngine;
use super::optimizer::Candidate;
use super::PENALTY;
use crate::datasources::Forecaster;
use crate::error::{MaizeOpsError, Result};
use crate::models::{DayDomain, ForecastDay};
use rayon::prelude::*;
use serde::Serialize;

/// Per-day breakdown of one candidate cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleEvaluation {
    pub start_day: i64,
    pub cycle_length: usize,
    pub total: f64,
    pub daily_scores: Vec<Option<f64>>,
    pub skipped: usize,
}

impl CycleEvaluation {
    pub fn scored_days(&self) -> usize {
        self.daily_scores.len() - self.skipped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScanPoint {
    pub day: i64,
    pub fitness: f64,
}

/// Fitness of every start day in the domain
#[derive(Debug, Clone, Serialize)]
pub struct DomainScan {
    pub cycle_length: usize,
    pub points: Vec<ScanPoint>,
    pub best: Candidate,
}

impl DomainScan {
    pub fn penalized_days(&self) -> usize {
        self.points.iter().filter(|p| p.fitness <= PENALTY).count()
    }
}

/// Scores a cultivation cycle by summing daily suitability over the
/// forecast window that starts on the candidate day.
///
/// Out-of-domain days and missing or short windows score [`PENALTY`];
/// malformed days inside a window are skipped.
pub struct CycleFitness<'a> {
    engine: &'a FuzzyEngine,
    forecaster: &'a dyn Forecaster,
    domain: DayDomain,
}

impl<'a> CycleFitness<'a> {
    pub fn new(engine: &'a FuzzyEngine, forecaster: &'a dyn Forecaster, domain: DayDomain) -> Self {
        Self {
            engine,
            forecaster,
            domain,
        }
    }

    pub fn domain(&self) -> DayDomain {
        self.domain
    }

    pub fn window(&self, candidate_day: i64, cycle_length: usize) -> Result<Vec<ForecastDay>> {
        if !self.domain.contains(candidate_day) {
            return Err(MaizeOpsError::OutOfDomain {
                day: candidate_day,
                start: self.domain.start(),
                end: self.domain.end(),
            });
        }

        let window = self.forecaster.window(candidate_day as u32, cycle_length)?;
        if window.is_empty() || window.len() < cycle_length {
            return Err(MaizeOpsError::DataUnavailable(format!(
                "{} forecast has {} of {} days from day {}",
                self.forecaster.name(),
                window.len(),
                cycle_length,
                candidate_day
            )));
        }
        Ok(window)
    }

    pub fn evaluate_cycle(
        &self,
        candidate_day: i64,
        cycle_length: usize,
    ) -> Result<CycleEvaluation> {
        let window = self.window(candidate_day, cycle_length)?;

        let mut total = 0.0;
        let mut skipped = 0;
        let daily_scores = window
            .iter()
            .map(|day| {
                let score = day
                    .validate()
                    .and_then(|_| self.engine.evaluate(day.temperature, day.rainfall));
                match score {
                    Ok(score) => {
                        total += score;
                        Some(score)
                    }
                    Err(e) => {
                        tracing::warn!(
                            start_day = candidate_day,
                            day_offset = day.day_offset,
                            "Skipping forecast day: {}",
                            e
                        );
                        skipped += 1;
                        None
                    }
                }
            })
            .collect();

        Ok(CycleEvaluation {
            start_day: candidate_day,
            cycle_length,
            total,
            daily_scores,
            skipped,
        })
    }

    /// Cumulative suitability of the cycle, or [`PENALTY`].
    ///
    /// The sum is not normalized: cycles of different lengths are not
    /// comparable.
    pub fn cycle_fitness(&self, candidate_day: i64, cycle_length: usize) -> f64 {
        match self.evaluate_cycle(candidate_day, cycle_length) {
            Ok(cycle) => cycle.total,
            Err(e @ MaizeOpsError::OutOfDomain { .. }) => {
                tracing::trace!("Penalizing candidate: {}", e);
                PENALTY
            }
            Err(e) => {
                tracing::warn!(start_day = candidate_day, "Penalizing candidate: {}", e);
                PENALTY
            }
        }
    }

    /// Brute-force fitness of every day in the domain.
    pub fn scan_domain(&self, cycle_length: usize, parallel: bool) -> DomainScan {
        let days: Vec<i64> = self.domain.days().collect();
        let score = |&day: &i64| ScanPoint {
            day,
            fitness: self.cycle_fitness(day, cycle_length),
        };
        let points: Vec<ScanPoint> = if parallel {
            days.par_iter().map(score).collect()
        } else {
            days.iter().map(score).collect()
        };

        // Earliest day wins ties
        let best = points.iter().fold(
            Candidate {
                day: self.domain.start(),
                fitness: f64::NEG_INFINITY,
            },
            |best, p| {
                if p.fitness > best.fitness {
                    Candidate {
                        day: p.day,
                        fitness: p.fitness,
                    }
                } else {
                    best
                }
            },
        );

        DomainScan {
            cycle_length,
            points,
            best,
        }
    }
}
