use super::rule_base::{Rule, RuleBase};
use super::variable::{FuzzyVariable, Universe};
use crate::error::{MaizeOpsError, Result};
use crate::models::{Assessment, ForecastDay};
use serde::Serialize;

/// Working state of one Mamdani inference.
///
/// Created per call and owned by the caller, so a single engine can be
/// shared across threads without locking.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceSession {
    pub temperature: f64,
    pub rainfall: f64,
    pub temperature_degrees: Vec<f64>,
    pub rainfall_degrees: Vec<f64>,
    pub firing_strengths: Vec<f64>,
    pub aggregated: Vec<f64>,
    pub score: f64,
}

impl InferenceSession {
    pub fn fired_rules(&self) -> usize {
        self.firing_strengths.iter().filter(|s| **s > 0.0).count()
    }

    /// True when no rule fired and the score is the zero fallback.
    pub fn is_degenerate(&self) -> bool {
        self.aggregated.iter().all(|mu| *mu <= 0.0)
    }
}

/// Two-input Mamdani engine: min for AND and clipping, max for aggregation,
/// centroid defuzzification.
#[derive(Debug, Clone)]
pub struct FuzzyEngine {
    temperature: FuzzyVariable,
    rainfall: FuzzyVariable,
    suitability: FuzzyVariable,
    rule_base: RuleBase,
    output_points: Vec<f64>,
    output_curves: Vec<Vec<f64>>,
}

impl FuzzyEngine {
    pub fn new(
        temperature: FuzzyVariable,
        rainfall: FuzzyVariable,
        suitability: FuzzyVariable,
        rules: &[Rule],
    ) -> Result<Self> {
        temperature.validate()?;
        rainfall.validate()?;
        suitability.validate()?;

        let rule_base = RuleBase::compile(rules, &temperature, &rainfall, &suitability)?;

        let output_points = suitability.universe.points();
        let output_curves = suitability
            .terms
            .iter()
            .map(|term| {
                output_points
                    .iter()
                    .map(|&x| term.function.degree(x))
                    .collect()
            })
            .collect();

        tracing::debug!(
            rules = rule_base.len(),
            output_samples = output_points.len(),
            "Fuzzy engine ready"
        );

        Ok(Self {
            temperature,
            rainfall,
            suitability,
            rule_base,
            output_points,
            output_curves,
        })
    }

    pub fn temperature(&self) -> &FuzzyVariable {
        &self.temperature
    }

    pub fn rainfall(&self) -> &FuzzyVariable {
        &self.rainfall
    }

    pub fn suitability(&self) -> &FuzzyVariable {
        &self.suitability
    }

    pub fn rule_base(&self) -> &RuleBase {
        &self.rule_base
    }

    /// Run the full inference and keep every intermediate result.
    pub fn infer(&self, temperature: f64, rainfall: f64) -> Result<InferenceSession> {
        ensure_finite(&self.temperature.name, temperature)?;
        ensure_finite(&self.rainfall.name, rainfall)?;

        let temperature_degrees = self.temperature.fuzzify(temperature);
        let rainfall_degrees = self.rainfall.fuzzify(rainfall);

        let compiled = self.rule_base.compiled();
        let firing_strengths: Vec<f64> = compiled
            .iter()
            .map(|rule| {
                temperature_degrees[rule.temperature].min(rainfall_degrees[rule.rainfall])
                    * rule.weight
            })
            .collect();

        let mut aggregated = vec![0.0; self.output_points.len()];
        for (rule, &strength) in compiled.iter().zip(&firing_strengths) {
            if strength <= 0.0 {
                continue;
            }
            let curve = &self.output_curves[rule.consequent];
            for (mu, &degree) in aggregated.iter_mut().zip(curve) {
                *mu = f64::max(*mu, strength.min(degree));
            }
        }

        let score = centroid(&self.output_points, &aggregated, &self.suitability.universe);

        Ok(InferenceSession {
            temperature,
            rainfall,
            temperature_degrees,
            rainfall_degrees,
            firing_strengths,
            aggregated,
            score,
        })
    }

    /// Crisp suitability score in [0, 100].
    ///
    /// Inputs outside the universes are accepted and fire no rules through
    /// the out-of-range variable. Non-finite inputs are rejected.
    pub fn evaluate(&self, temperature: f64, rainfall: f64) -> Result<f64> {
        Ok(self.infer(temperature, rainfall)?.score)
    }

    /// Like [`evaluate`](Self::evaluate), but inputs outside the universes are
    /// an [`MaizeOpsError::OutOfRange`] error.
    pub fn evaluate_strict(&self, temperature: f64, rainfall: f64) -> Result<f64> {
        ensure_in_universe(&self.temperature, temperature)?;
        ensure_in_universe(&self.rainfall, rainfall)?;
        self.evaluate(temperature, rainfall)
    }

    pub fn assess(&self, temperature: f64, rainfall: f64) -> Result<Assessment> {
        let score = self.evaluate(temperature, rainfall)?;
        Ok(Assessment::new(temperature, rainfall, score))
    }

    /// Assess a run of forecast days; a malformed day yields an error in its
    /// own slot without affecting the others.
    pub fn evaluate_days(&self, days: &[ForecastDay]) -> Vec<Result<Assessment>> {
        days.iter()
            .map(|day| {
                day.validate()?;
                self.assess(day.temperature, day.rainfall)
            })
            .collect()
    }
}

fn ensure_finite(variable: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MaizeOpsError::NonFiniteInput {
            variable: variable.to_string(),
            value,
        })
    }
}

fn ensure_in_universe(variable: &FuzzyVariable, value: f64) -> Result<()> {
    ensure_finite(&variable.name, value)?;
    if variable.universe.contains(value) {
        Ok(())
    } else {
        Err(MaizeOpsError::OutOfRange {
            variable: variable.name.clone(),
            value,
            min: variable.universe.min,
            max: variable.universe.max,
        })
    }
}

/// Center of gravity of a sampled curve; 0.0 when the curve has no area.
pub(crate) fn centroid(points: &[f64], memberships: &[f64], universe: &Universe) -> f64 {
    let (weighted, area) = points
        .iter()
        .zip(memberships)
        .fold((0.0, 0.0), |(weighted, area), (&x, &mu)| {
            (weighted + x * mu, area + mu)
        });

    if area <= f64::EPSILON {
        return 0.0;
    }
    (weighted / area).clamp(universe.min, universe.max)
}

#[cfg(test)]
mod tests {
    use super::super::maize;
    use super::*;
    use crate::models::SuitabilityCategory;
    use approx::assert_relative_eq;

    fn engine() -> FuzzyEngine {
        FuzzyEngine::maize_sowing().expect("maize model is well formed")
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FuzzyEngine>();
    }

    #[test]
    fn ideal_conditions_score_high() {
        let score = engine().evaluate(25.0, 12.0).unwrap();
        assert!(score >= 70.0, "ideal score was {}", score);
        // Only the optimal+adequate rule fires, at full strength
        assert_relative_eq!(score, 87.098_039_215_686_27, epsilon = 1e-9);
    }

    #[test]
    fn hot_and_dry_scores_low() {
        let score = engine().evaluate(40.0, 1.0).unwrap();
        assert!(score < 35.0, "adverse score was {}", score);
        assert_relative_eq!(score, 12.901_960_784_313_726, epsilon = 1e-9);
    }

    #[test]
    fn single_medium_rule_centres_on_fifty() {
        // optimal + scarce, and low + adequate, both map to the symmetric medium term
        assert_relative_eq!(engine().evaluate(25.0, 0.0).unwrap(), 50.0, epsilon = 1e-9);
        assert_relative_eq!(engine().evaluate(8.0, 12.0).unwrap(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn score_stays_within_output_universe() {
        let engine = engine();
        let mut temperature = 5.0;
        while temperature <= 45.0 {
            let mut rainfall = 0.0;
            while rainfall <= 45.0 {
                let score = engine.evaluate(temperature, rainfall).unwrap();
                assert!(
                    (0.0..=100.0).contains(&score),
                    "score {} at ({}, {})",
                    score,
                    temperature,
                    rainfall
                );
                rainfall += 0.5;
            }
            temperature += 0.5;
        }
    }

    #[test]
    fn zero_activation_falls_back_to_zero() {
        // 32°C is the shared zero point of optimal and high
        let session = engine().infer(32.0, 12.0).unwrap();
        assert!(session.is_degenerate());
        assert_eq!(session.fired_rules(), 0);
        assert_eq!(session.score, 0.0);

        // 18°C is the shared zero point of low and optimal
        assert_eq!(engine().evaluate(18.0, 12.0).unwrap(), 0.0);
    }

    #[test]
    fn out_of_universe_input_degrades_to_zero() {
        assert_eq!(engine().evaluate(50.0, 12.0).unwrap(), 0.0);
        assert_eq!(engine().evaluate(25.0, -3.0).unwrap(), 0.0);
    }

    #[test]
    fn strict_evaluation_rejects_out_of_universe() {
        match engine().evaluate_strict(50.0, 12.0) {
            Err(MaizeOpsError::OutOfRange { variable, max, .. }) => {
                assert_eq!(variable, maize::TEMPERATURE);
                assert_eq!(max, 45.0);
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
        assert!(engine().evaluate_strict(25.0, 12.0).is_ok());
    }

    #[test]
    fn non_finite_input_is_an_error() {
        assert!(matches!(
            engine().evaluate(f64::NAN, 12.0),
            Err(MaizeOpsError::NonFiniteInput { .. })
        ));
        assert!(engine().evaluate(25.0, f64::INFINITY).is_err());
    }

    #[test]
    fn session_exposes_fuzzified_inputs() {
        let session = engine().infer(21.5, 6.0).unwrap();
        assert_eq!(session.temperature_degrees.len(), 3);
        assert_relative_eq!(session.temperature_degrees[1], 0.5);
        assert_relative_eq!(session.rainfall_degrees[0], 0.25);
        assert_relative_eq!(session.rainfall_degrees[1], 1.0 / 7.0);
        // optimal+scarce (medium) fires at min(0.5, 0.25)
        assert_relative_eq!(session.firing_strengths[1], 0.25);
        assert_eq!(session.aggregated.len(), 101);
    }

    #[test]
    fn rule_weight_scales_firing_strength() {
        let mut rules = maize::sowing_rules();
        rules[4] = rules[4].clone().with_weight(0.5);
        let engine = FuzzyEngine::new(
            maize::temperature_variable(),
            maize::rainfall_variable(),
            maize::suitability_variable(),
            &rules,
        )
        .unwrap();

        let session = engine.infer(25.0, 12.0).unwrap();
        assert_relative_eq!(session.firing_strengths[4], 0.5);
        assert!(session.aggregated.iter().all(|mu| *mu <= 0.5));
    }

    #[test]
    fn assessment_categorizes_score() {
        let engine = engine();
        assert_eq!(
            engine.assess(25.0, 12.0).unwrap().category,
            SuitabilityCategory::Excellent
        );
        assert_eq!(
            engine.assess(40.0, 1.0).unwrap().category,
            SuitabilityCategory::Poor
        );
    }

    #[test]
    fn batch_evaluation_isolates_bad_days() {
        let days = [
            ForecastDay::new(0, 25.0, 12.0),
            ForecastDay::new(1, f64::NAN, 12.0),
            ForecastDay::new(2, 40.0, 1.0),
        ];
        let results = engine().evaluate_days(&days);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(MaizeOpsError::InvalidRecord { day_offset: 1, .. })
        ));
        assert!(results[2].is_ok());
    }

    #[test]
    fn malformed_definitions_fail_at_construction() {
        let broken = maize::temperature_variable().with_term(
            "scorching",
            crate::logic::fuzzy::MembershipFunction::triangle(45.0, 40.0, 50.0),
        );
        let result = FuzzyEngine::new(
            broken,
            maize::rainfall_variable(),
            maize::suitability_variable(),
            &maize::sowing_rules(),
        );
        assert!(matches!(
            result,
            Err(MaizeOpsError::InvalidMembership { .. })
        ));
    }

    #[test]
    fn centroid_of_empty_curve_is_zero() {
        let universe = Universe::new(0.0, 10.0, 1.0);
        let points = universe.points();
        assert_eq!(centroid(&points, &vec![0.0; points.len()], &universe), 0.0);
    }
}
