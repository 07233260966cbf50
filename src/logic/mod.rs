pub mod calculations;
pub mod fitness;
pub mod fuzzy;
pub mod optimizer;

pub use fitness::{CycleEvaluation, CycleFitness, DomainScan};
pub use fuzzy::FuzzyEngine;
pub use optimizer::{Optimizer, OptimizerSettings, OptimizationResult, SearchStrategy};

/// Fitness assigned to infeasible candidates: out-of-domain days and
/// windows without enough forecast data.
pub const PENALTY: f64 = -999_999.0;
