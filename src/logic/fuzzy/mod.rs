pub mod engine;
pub mod maize;
pub mod membership;
pub mod rule_base;
pub mod variable;

pub use engine::{FuzzyEngine, InferenceSession};
pub use membership::MembershipFunction;
pub use rule_base::{Rule, RuleBase};
pub use variable::{FuzzyVariable, Term, Universe};
