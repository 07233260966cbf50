use serde::{Deserialize, Serialize};

/// Piecewise-linear membership curve.
///
/// - `Triangle { a, b, c }`: 0 outside [a, c], rises to 1 at `b`, falls back
///   to 0 at `c`. `a == b` or `b == c` gives a vertical edge.
/// - `Trapezoid { a, b, c, d }`: 0 outside [a, d], 1 on [b, c], linear ramps
///   on [a, b] and [c, d].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum MembershipFunction {
    Triangle { a: f64, b: f64, c: f64 },
    Trapezoid { a: f64, b: f64, c: f64, d: f64 },
}

impl MembershipFunction {
    pub fn triangle(a: f64, b: f64, c: f64) -> Self {
        MembershipFunction::Triangle { a, b, c }
    }

    pub fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> Self {
        MembershipFunction::Trapezoid { a, b, c, d }
    }

    pub fn breakpoints(&self) -> Vec<f64> {
        match *self {
            MembershipFunction::Triangle { a, b, c } => vec![a, b, c],
            MembershipFunction::Trapezoid { a, b, c, d } => vec![a, b, c, d],
        }
    }

    /// Breakpoints must be finite and non-decreasing.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let points = self.breakpoints();
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(format!("breakpoint {} is not finite", bad));
        }
        if points.windows(2).any(|w| w[0] > w[1]) {
            return Err(format!("breakpoints {:?} are not non-decreasing", points));
        }
        Ok(())
    }

    /// Membership degree of `x`, always within [0, 1].
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            MembershipFunction::Triangle { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            MembershipFunction::Trapezoid { a, b, c, d } => {
                if x < a || x > d {
                    0.0
                } else if x >= b && x <= c {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
        }
    }
}
