use super::{uniform_population, Candidate, SearchStrategy};
use crate::error::{MaizeOpsError, Result};
use crate::models::DayDomain;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Blend crossover spread beyond the parents (BLX-alpha)
const BLEND_ALPHA: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticParams {
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    /// Standard deviation of the Gaussian mutation, in days
    pub mutation_sigma: f64,
    pub tournament_size: usize,
    /// Best candidates copied unchanged into the next generation, at least 1
    pub elite_count: usize,
}

impl GeneticParams {
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(MaizeOpsError::Config(format!(
                    "genetic {} must be within [0, 1], got {}",
                    name, rate
                )));
            }
        }
        if !(self.mutation_sigma.is_finite() && self.mutation_sigma > 0.0) {
            return Err(MaizeOpsError::Config(format!(
                "genetic mutation_sigma must be positive, got {}",
                self.mutation_sigma
            )));
        }
        if self.tournament_size == 0 {
            return Err(MaizeOpsError::Config(
                "genetic tournament_size must be at least 1".into(),
            ));
        }
        // The best day found so far is always carried over
        if self.elite_count == 0 {
            return Err(MaizeOpsError::Config(
                "genetic elite_count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            crossover_rate: 0.9,
            mutation_rate: 0.2,
            mutation_sigma: 10.0,
            tournament_size: 3,
            elite_count: 1,
        }
    }
}

/// Real-coded genetic algorithm over start days: tournament selection,
/// blend crossover, Gaussian mutation, and elitism.
pub struct GeneticStrategy {
    params: GeneticParams,
    mutation: Normal<f64>,
}

impl GeneticStrategy {
    pub fn new(params: GeneticParams) -> Result<Self> {
        params.validate()?;
        let mutation = Normal::new(0.0, params.mutation_sigma)
            .map_err(|e| MaizeOpsError::Config(format!("genetic mutation: {}", e)))?;
        Ok(Self { params, mutation })
    }

    fn tournament(&self, evaluated: &[Candidate], rng: &mut ChaCha8Rng) -> Candidate {
        let mut winner = evaluated[rng.gen_range(0..evaluated.len())];
        for _ in 1..self.params.tournament_size {
            let challenger = evaluated[rng.gen_range(0..evaluated.len())];
            if challenger.fitness > winner.fitness {
                winner = challenger;
            }
        }
        winner
    }

    fn crossover(&self, a: i64, b: i64, rng: &mut ChaCha8Rng) -> f64 {
        let (low, high) = (a.min(b) as f64, a.max(b) as f64);
        let spread = (high - low) * BLEND_ALPHA;
        if spread == 0.0 {
            return low;
        }
        rng.gen_range(low - spread..=high + spread)
    }
}

impl SearchStrategy for GeneticStrategy {
    fn name(&self) -> &'static str {
        "genetic"
    }

    fn initial_population(
        &mut self,
        domain: &DayDomain,
        size: usize,
        rng: &mut ChaCha8Rng,
    ) -> Vec<i64> {
        uniform_population(domain, size, rng)
    }

    fn propose_next_population(
        &mut self,
        evaluated: &[Candidate],
        best: Candidate,
        domain: &DayDomain,
        rng: &mut ChaCha8Rng,
    ) -> Vec<i64> {
        let size = evaluated.len();
        if size == 0 {
            return Vec::new();
        }

        let mut ranked = evaluated.to_vec();
        ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        // The best-ever day always survives, even if this generation lost it
        let mut next = Vec::with_capacity(size);
        next.push(best.day);
        next.extend(
            ranked
                .iter()
                .filter(|c| c.day != best.day)
                .take(self.params.elite_count.saturating_sub(1))
                .map(|c| c.day),
        );
        next.truncate(size);

        while next.len() < size {
            let first = self.tournament(evaluated, rng);
            let second = self.tournament(evaluated, rng);

            let mut child = if rng.gen_bool(self.params.crossover_rate) {
                self.crossover(first.day, second.day, rng)
            } else {
                first.day as f64
            };
            if rng.gen_bool(self.params.mutation_rate) {
                child += self.mutation.sample(rng);
            }
            next.push(domain.snap(child));
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn evaluated() -> Vec<Candidate> {
        [(10, 5.0), (50, 40.0), (120, 90.0), (200, 10.0)]
            .into_iter()
            .map(|(day, fitness)| Candidate { day, fitness })
            .collect()
    }

    #[test]
    fn defaults_are_valid() {
        assert!(GeneticStrategy::new(GeneticParams::default()).is_ok());
    }

    #[test]
    fn invalid_rates_are_rejected() {
        let params = GeneticParams {
            mutation_rate: 1.5,
            ..GeneticParams::default()
        };
        assert!(GeneticStrategy::new(params).is_err());

        let params = GeneticParams {
            mutation_sigma: 0.0,
            ..GeneticParams::default()
        };
        assert!(GeneticStrategy::new(params).is_err());

        let params = GeneticParams {
            tournament_size: 0,
            ..GeneticParams::default()
        };
        assert!(GeneticStrategy::new(params).is_err());
    }

    #[test]
    fn zero_elites_is_rejected() {
        let params = GeneticParams {
            elite_count: 0,
            ..GeneticParams::default()
        };
        assert!(matches!(
            GeneticStrategy::new(params),
            Err(MaizeOpsError::Config(_))
        ));
    }

    #[test]
    fn next_population_keeps_size_and_elite() {
        let mut strategy = GeneticStrategy::new(GeneticParams {
            elite_count: 2,
            ..GeneticParams::default()
        })
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let best = Candidate {
            day: 130,
            fitness: 95.0,
        };

        let next =
            strategy.propose_next_population(&evaluated(), best, &DayDomain::default(), &mut rng);
        assert_eq!(next.len(), 4);
        assert_eq!(next[0], 130, "best-ever day is carried over");
        assert_eq!(next[1], 120, "generation's best is the second elite");
        assert!(next.iter().all(|d| DayDomain::default().contains(*d)));
    }

    #[test]
    fn tournament_of_whole_population_picks_the_fittest() {
        let strategy = GeneticStrategy::new(GeneticParams {
            tournament_size: 64,
            ..GeneticParams::default()
        })
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(strategy.tournament(&evaluated(), &mut rng).day, 120);
    }

    #[test]
    fn crossover_of_identical_parents_is_identity() {
        let strategy = GeneticStrategy::new(GeneticParams::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(strategy.crossover(77, 77, &mut rng), 77.0);

        let child = strategy.crossover(100, 140, &mut rng);
        assert!((80.0..=160.0).contains(&child));
    }
}
