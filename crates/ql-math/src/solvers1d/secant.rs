//! Secant method.

use super::{Bracket, Evaluator, Solver1D, SolverSettings};
use ql_core::{
    errors::{Error, Result},
    Real,
};

/// Secant iteration started from the bracket ends.
///
/// Iterates are clamped to the bracket, so a wild step cannot leave the
/// domain the bracket search established.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secant {
    settings: SolverSettings,
}

impl Secant {
    /// Create a solver with the given budget and bounds.
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }
}

impl Solver1D for Secant {
    fn name(&self) -> &'static str {
        "Secant"
    }

    fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    fn solve_impl<F>(&self, f: &mut Evaluator<F>, accuracy: Real, bracket: Bracket) -> Result<Real>
    where
        F: FnMut(Real) -> Result<Real>,
    {
        let (lo, hi) = (bracket.x_min, bracket.x_max);
        // start from the end with the smaller residual
        let (mut x0, mut f0, mut x1, mut f1) = if bracket.f_min.abs() < bracket.f_max.abs() {
            (bracket.x_max, bracket.f_max, bracket.x_min, bracket.f_min)
        } else {
            (bracket.x_min, bracket.f_min, bracket.x_max, bracket.f_max)
        };
        loop {
            if f1 == f0 {
                return Err(Error::Convergence(format!(
                    "secant stagnates at x = {x1}: equal objective values {f1:e}"
                )));
            }
            let dx = (x0 - x1) * f1 / (f1 - f0);
            x0 = x1;
            f0 = f1;
            x1 = (x1 + dx).clamp(lo, hi);
            f1 = f.call(x1)?;
            if dx.abs() < accuracy || f1 == 0.0 {
                return Ok(x1);
            }
        }
    }
}
