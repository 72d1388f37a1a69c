//! Bisection.

use super::{Bracket, Evaluator, Solver1D, SolverSettings};
use ql_core::{errors::Result, Real};

/// Interval halving.  Slow but immune to badly scaled objectives.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bisection {
    settings: SolverSettings,
}

impl Bisection {
    /// Create a solver with the given budget and bounds.
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }
}

impl Solver1D for Bisection {
    fn name(&self) -> &'static str {
        "Bisection"
    }

    fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    fn solve_impl<F>(&self, f: &mut Evaluator<F>, accuracy: Real, bracket: Bracket) -> Result<Real>
    where
        F: FnMut(Real) -> Result<Real>,
    {
        // orient so that f(lo) < 0 < f(hi)
        let (mut lo, mut hi) = if bracket.f_min < 0.0 {
            (bracket.x_min, bracket.x_max)
        } else {
            (bracket.x_max, bracket.x_min)
        };
        loop {
            let mid = 0.5 * (lo + hi);
            let f_mid = f.call(mid)?;
            if f_mid == 0.0 || 0.5 * (hi - lo).abs() < accuracy {
                return Ok(mid);
            }
            if f_mid < 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }
    }
}
