use super::{Candidate, SearchStrategy};
use crate::error::{MaizeOpsError, Result};
use crate::models::DayDomain;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmParams {
    pub inertia: f64,
    /// Pull towards each particle's own best day
    pub cognitive: f64,
    /// Pull towards the swarm's best day
    pub social: f64,
    /// Velocity cap as a fraction of the domain span
    pub max_velocity_fraction: f64,
}

impl SwarmParams {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("inertia", self.inertia),
            ("cognitive", self.cognitive),
            ("social", self.social),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MaizeOpsError::Config(format!(
                    "swarm {} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !(self.max_velocity_fraction > 0.0 && self.max_velocity_fraction <= 1.0) {
            return Err(MaizeOpsError::Config(format!(
                "swarm max_velocity_fraction must be within (0, 1], got {}",
                self.max_velocity_fraction
            )));
        }
        Ok(())
    }
}

impl Default for SwarmParams {
    fn default() -> Self {
        Self {
            inertia: 0.4,
            cognitive: 2.05,
            social: 2.05,
            max_velocity_fraction: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Particle {
    position: f64,
    velocity: f64,
    best_position: f64,
    best_fitness: f64,
}

/// Particle swarm over start days. Particles move on the real line and are
/// snapped to whole days for evaluation.
pub struct SwarmStrategy {
    params: SwarmParams,
    particles: Vec<Particle>,
}

impl SwarmStrategy {
    pub fn new(params: SwarmParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            particles: Vec::new(),
        })
    }

    fn max_velocity(&self, domain: &DayDomain) -> f64 {
        (domain.span() * self.params.max_velocity_fraction).max(1.0)
    }
}

impl SearchStrategy for SwarmStrategy {
    fn name(&self) -> &'static str {
        "swarm"
    }

    fn initial_population(
        &mut self,
        domain: &DayDomain,
        size: usize,
        rng: &mut ChaCha8Rng,
    ) -> Vec<i64> {
        let (low, high) = (domain.start() as f64, domain.end() as f64);
        let vmax = self.max_velocity(domain);

        self.particles = (0..size)
            .map(|_| {
                let position = rng.gen_range(low..=high);
                Particle {
                    position,
                    velocity: rng.gen_range(-vmax..=vmax),
                    best_position: position,
                    best_fitness: f64::NEG_INFINITY,
                }
            })
            .collect();

        self.particles
            .iter()
            .map(|p| domain.snap(p.position))
            .collect()
    }

    fn propose_next_population(
        &mut self,
        evaluated: &[Candidate],
        best: Candidate,
        domain: &DayDomain,
        rng: &mut ChaCha8Rng,
    ) -> Vec<i64> {
        let (low, high) = (domain.start() as f64, domain.end() as f64);
        let vmax = self.max_velocity(domain);
        let global_best = best.day as f64;
        let SwarmParams {
            inertia,
            cognitive,
            social,
            ..
        } = self.params;

        for (particle, candidate) in self.particles.iter_mut().zip(evaluated) {
            if candidate.fitness > particle.best_fitness {
                particle.best_fitness = candidate.fitness;
                particle.best_position = candidate.day as f64;
            }

            let r1: f64 = rng.gen();
            let r2: f64 = rng.gen();
            let velocity = inertia * particle.velocity
                + cognitive * r1 * (particle.best_position - particle.position)
                + social * r2 * (global_best - particle.position);

            particle.velocity = velocity.clamp(-vmax, vmax);
            particle.position = (particle.position + particle.velocity).clamp(low, high);
        }

        self.particles
            .iter()
            .map(|p| domain.snap(p.position))
            .collect()
    }
}
