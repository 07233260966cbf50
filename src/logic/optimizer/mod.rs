pub mod genetic;
pub mod swarm;

pub use genetic::{GeneticParams, GeneticStrategy};
pub use swarm::{SwarmParams, SwarmStrategy};

use super::PENALTY;
use crate::error::{MaizeOpsError, Result};
use crate::models::DayDomain;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A start day together with its fitness
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub day: i64,
    pub fitness: f64,
}

/// A population-based search strategy.
///
/// The driver owns evaluation, elitism, and history; a strategy only decides
/// which days to try next. `evaluated` is always in the order the strategy
/// proposed its population.
pub trait SearchStrategy: Send {
    fn name(&self) -> &'static str;

    /// First population. Resets any state left from a previous run.
    fn initial_population(
        &mut self,
        domain: &DayDomain,
        size: usize,
        rng: &mut ChaCha8Rng,
    ) -> Vec<i64>;

    /// Next population given the scored current one and the best seen so far.
    /// Must hold as many days as the initial population.
    fn propose_next_population(
        &mut self,
        evaluated: &[Candidate],
        best: Candidate,
        domain: &DayDomain,
        rng: &mut ChaCha8Rng,
    ) -> Vec<i64>;
}

/// `size` days drawn uniformly from the domain
pub fn uniform_population(domain: &DayDomain, size: usize, rng: &mut ChaCha8Rng) -> Vec<i64> {
    (0..size)
        .map(|_| rng.gen_range(domain.start()..=domain.end()))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSettings {
    pub domain: DayDomain,
    pub population_size: usize,
    pub generations: usize,
    pub seed: u64,
    pub parallel: bool,
}

impl OptimizerSettings {
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(MaizeOpsError::Config(format!(
                "population size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.generations < 1 {
            return Err(MaizeOpsError::Config(
                "at least one generation is required".into(),
            ));
        }
        if self.domain.is_empty() {
            return Err(MaizeOpsError::Config(format!(
                "domain {} is empty",
                self.domain
            )));
        }
        Ok(())
    }
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            domain: DayDomain::default(),
            population_size: 20,
            generations: 50,
            seed: 42,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub strategy: String,
    pub best_day: i64,
    pub best_fitness: f64,
    /// Best fitness seen by the end of each generation
    pub history: Vec<f64>,
    pub evaluations: usize,
}

impl OptimizationResult {
    /// True when no candidate escaped the penalty.
    pub fn is_degenerate(&self) -> bool {
        self.best_fitness <= PENALTY
    }
}

pub struct Optimizer {
    settings: OptimizerSettings,
}

impl Optimizer {
    pub fn new(settings: OptimizerSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &OptimizerSettings {
        &self.settings
    }

    /// Search the domain for the day maximizing `fitness_fn`.
    ///
    /// A fitness call that fails or returns NaN scores [`PENALTY`] and the
    /// search goes on.
    pub fn optimize<F>(
        &self,
        strategy: &mut dyn SearchStrategy,
        fitness_fn: F,
    ) -> OptimizationResult
    where
        F: Fn(i64) -> Result<f64> + Sync,
    {
        let settings = &self.settings;
        let domain = settings.domain;
        let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);

        tracing::info!(
            strategy = strategy.name(),
            population = settings.population_size,
            generations = settings.generations,
            seed = settings.seed,
            "Starting search over days {}",
            domain
        );

        let score = |&day: &i64| {
            let fitness = match fitness_fn(day) {
                Ok(fitness) if !fitness.is_nan() => fitness,
                Ok(_) => {
                    tracing::warn!(day, "Fitness is NaN, penalizing");
                    PENALTY
                }
                Err(e) => {
                    tracing::warn!(day, "Fitness evaluation failed, penalizing: {}", e);
                    PENALTY
                }
            };
            Candidate { day, fitness }
        };

        let mut population: Vec<i64> = strategy
            .initial_population(&domain, settings.population_size, &mut rng)
            .into_iter()
            .map(|day| domain.snap(day as f64))
            .collect();
        debug_assert_eq!(
            population.len(),
            settings.population_size,
            "{} returned a wrong-sized initial population",
            strategy.name()
        );

        let mut best: Option<Candidate> = None;
        let mut history = Vec::with_capacity(settings.generations);
        let mut evaluations = 0;

        for generation in 0..settings.generations {
            let evaluated: Vec<Candidate> = if settings.parallel {
                population.par_iter().map(score).collect()
            } else {
                population.iter().map(score).collect()
            };
            evaluations += evaluated.len();

            // Strictly better only, so ties keep the earlier find
            for candidate in &evaluated {
                if best.map_or(true, |b| candidate.fitness > b.fitness) {
                    best = Some(*candidate);
                }
            }
            let Some(current_best) = best else {
                break;
            };
            history.push(current_best.fitness);

            tracing::debug!(
                generation,
                best_day = current_best.day,
                best_fitness = current_best.fitness,
                "Generation complete"
            );

            if generation + 1 < settings.generations {
                population = strategy
                    .propose_next_population(&evaluated, current_best, &domain, &mut rng)
                    .into_iter()
                    .map(|day| domain.snap(day as f64))
                    .collect();
                debug_assert_eq!(
                    population.len(),
                    settings.population_size,
                    "{} proposed a wrong-sized population",
                    strategy.name()
                );
            }
        }

        let best = best.unwrap_or(Candidate {
            day: domain.start(),
            fitness: PENALTY,
        });

        tracing::info!(
            strategy = strategy.name(),
            best_day = best.day,
            best_fitness = best.fitness,
            evaluations,
            "Search finished"
        );

        OptimizationResult {
            strategy: strategy.name().to_string(),
            best_day: best.day,
            best_fitness: best.fitness,
            history,
            evaluations,
        }
    }
}
