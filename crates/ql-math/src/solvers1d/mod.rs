//! 1D root-finding solvers.
//!
//! Every solver implements [`Solver1D`]: the provided [`Solver1D::solve`]
//! searches outward from a guess for a sign change, and
//! [`Solver1D::solve_bracketed`] starts from an explicit bracket.  Both keep
//! every evaluation inside the optional domain bounds and fail with
//! [`Error::Convergence`] on a flat objective, a bracket that never crosses
//! zero, or an exhausted evaluation budget.
//!
//! Objectives are fallible (`FnMut(Real) -> Result<Real>`): an error from the
//! objective aborts the search and is returned unchanged.

use ql_core::{
    errors::{Error, Result},
    Real,
};

mod bisection;
mod brent;
mod secant;

pub use bisection::Bisection;
pub use brent::Brent;
pub use secant::Secant;

/// Default cap on objective evaluations per solve.
pub const DEFAULT_MAX_EVALUATIONS: usize = 100;

const GROWTH_FACTOR: Real = 1.6;

/// Evaluation budget and domain bounds shared by all solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    /// Maximum number of objective evaluations, bracket search included.
    pub max_evaluations: usize,
    /// Values below this are never passed to the objective.
    pub lower_bound: Option<Real>,
    /// Values above this are never passed to the objective.
    pub upper_bound: Option<Real>,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
            lower_bound: None,
            upper_bound: None,
        }
    }
}

impl SolverSettings {
    fn enforce_bounds(&self, x: Real) -> Real {
        let x = self.lower_bound.map_or(x, |lo| x.max(lo));
        self.upper_bound.map_or(x, |hi| x.min(hi))
    }
}

/// A sign-changing interval `[x_min, x_max]` with the objective at its ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Lower end.
    pub x_min: Real,
    /// Objective at `x_min`.
    pub f_min: Real,
    /// Upper end.
    pub x_max: Real,
    /// Objective at `x_max`.
    pub f_max: Real,
    /// Starting point inside the bracket.
    pub guess: Real,
}

/// Counts evaluations against the budget and rejects non-finite values.
pub struct Evaluator<F> {
    f: F,
    count: usize,
    max: usize,
}

impl<F> Evaluator<F>
where
    F: FnMut(Real) -> Result<Real>,
{
    fn new(f: F, max: usize) -> Self {
        Self { f, count: 0, max }
    }

    /// Evaluate the objective, failing once the budget is spent.
    pub fn call(&mut self, x: Real) -> Result<Real> {
        if self.count >= self.max {
            return Err(Error::Convergence(format!(
                "maximum number of function evaluations ({}) exceeded",
                self.max
            )));
        }
        self.count += 1;
        let fx = (self.f)(x)?;
        if !fx.is_finite() {
            return Err(Error::Convergence(format!("objective is not finite at x = {x}")));
        }
        Ok(fx)
    }

    /// Evaluations so far.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Outcome of a successful solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// The root.
    pub root: Real,
    /// Objective evaluations spent, bracket search included.
    pub evaluations: usize,
}

/// A one-dimensional root finder.
pub trait Solver1D: std::fmt::Debug + Send + Sync {
    /// Solver name for diagnostics.
    fn name(&self) -> &'static str;

    /// Budget and bounds.
    fn settings(&self) -> &SolverSettings;

    /// Refine a verified bracket until the root is known to `accuracy`.
    fn solve_impl<F>(&self, f: &mut Evaluator<F>, accuracy: Real, bracket: Bracket) -> Result<Real>
    where
        F: FnMut(Real) -> Result<Real>;

    /// Find a root starting from `guess`, expanding by `step` until the
    /// objective changes sign.
    fn solve<F>(&self, f: F, accuracy: Real, guess: Real, step: Real) -> Result<Solution>
    where
        F: FnMut(Real) -> Result<Real>,
    {
        let settings = *self.settings();
        check_accuracy(accuracy)?;
        let mut f = Evaluator::new(f, settings.max_evaluations);

        let root = settings.enforce_bounds(guess);
        let f_root = f.call(root)?;
        if f_root == 0.0 {
            return Ok(Solution { root, evaluations: f.count() });
        }

        let (mut x_min, mut f_min, mut x_max, mut f_max) = if f_root > 0.0 {
            let x = settings.enforce_bounds(root - step);
            (x, f.call(x)?, root, f_root)
        } else {
            let x = settings.enforce_bounds(root + step);
            (root, f_root, x, f.call(x)?)
        };

        let mut flipflop = -1;
        loop {
            if f_min * f_max <= 0.0 {
                if f_min == 0.0 {
                    return Ok(Solution { root: x_min, evaluations: f.count() });
                }
                if f_max == 0.0 {
                    return Ok(Solution { root: x_max, evaluations: f.count() });
                }
                let bracket = Bracket {
                    x_min,
                    f_min,
                    x_max,
                    f_max,
                    guess: 0.5 * (x_min + x_max),
                };
                let root = self.solve_impl(&mut f, accuracy, bracket)?;
                return Ok(Solution { root, evaluations: f.count() });
            }

            let at_lower = settings.lower_bound.is_some_and(|lo| x_min <= lo);
            let at_upper = settings.upper_bound.is_some_and(|hi| x_max >= hi);
            if at_lower && at_upper {
                return Err(no_root_within(x_min, f_min, x_max, f_max));
            }

            let expand_lower = if at_lower {
                false
            } else if at_upper {
                true
            } else if f_min.abs() != f_max.abs() {
                f_min.abs() < f_max.abs()
            } else {
                flipflop == -1
            };
            if expand_lower {
                x_min = settings.enforce_bounds(x_min + GROWTH_FACTOR * (x_min - x_max));
                f_min = f.call(x_min)?;
            } else {
                x_max = settings.enforce_bounds(x_max + GROWTH_FACTOR * (x_max - x_min));
                f_max = f.call(x_max)?;
            }
            flipflop = -flipflop;
        }
    }

    /// Find a root in `[x_min, x_max]`, starting from `guess`.
    fn solve_bracketed<F>(
        &self,
        f: F,
        accuracy: Real,
        guess: Real,
        x_min: Real,
        x_max: Real,
    ) -> Result<Solution>
    where
        F: FnMut(Real) -> Result<Real>,
    {
        let settings = *self.settings();
        check_accuracy(accuracy)?;
        if !(x_min < x_max) {
            return Err(Error::InvalidArgument(format!(
                "invalid range: x_min ({x_min}) >= x_max ({x_max})"
            )));
        }
        let x_min = settings.enforce_bounds(x_min);
        let x_max = settings.enforce_bounds(x_max);
        let mut f = Evaluator::new(f, settings.max_evaluations);

        let f_min = f.call(x_min)?;
        if f_min == 0.0 {
            return Ok(Solution { root: x_min, evaluations: f.count() });
        }
        let f_max = f.call(x_max)?;
        if f_max == 0.0 {
            return Ok(Solution { root: x_max, evaluations: f.count() });
        }
        if f_min * f_max > 0.0 {
            return Err(no_root_within(x_min, f_min, x_max, f_max));
        }
        let guess = if guess > x_min && guess < x_max {
            guess
        } else {
            0.5 * (x_min + x_max)
        };
        let bracket = Bracket {
            x_min,
            f_min,
            x_max,
            f_max,
            guess,
        };
        let root = self.solve_impl(&mut f, accuracy, bracket)?;
        Ok(Solution { root, evaluations: f.count() })
    }
}

fn check_accuracy(accuracy: Real) -> Result<()> {
    if accuracy > 0.0 && accuracy.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!("accuracy ({accuracy}) must be positive")))
    }
}

/// The error for a search interval whose ends have the same sign.  A
/// constant objective is reported as stagnation.
fn no_root_within(x_min: Real, f_min: Real, x_max: Real, f_max: Real) -> Error {
    let scale = f_min.abs().max(f_max.abs()).max(1.0);
    if (f_max - f_min).abs() <= 1e-14 * scale {
        Error::Convergence(format!(
            "objective stagnates at {f_min:e} over [{x_min}, {x_max}]: insensitive to the variable"
        ))
    } else {
        Error::Convergence(format!(
            "root not bracketed: f({x_min}) = {f_min:e}, f({x_max}) = {f_max:e}"
        ))
    }
}

/// The available solvers, selectable at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverKind {
    /// [`Brent`].
    #[default]
    Brent,
    /// [`Bisection`].
    Bisection,
    /// [`Secant`].
    Secant,
}

impl SolverKind {
    /// Run [`Solver1D::solve_bracketed`] with the selected solver.
    pub fn solve_bracketed<F>(
        self,
        settings: SolverSettings,
        f: F,
        accuracy: Real,
        guess: Real,
        x_min: Real,
        x_max: Real,
    ) -> Result<Solution>
    where
        F: FnMut(Real) -> Result<Real>,
    {
        match self {
            SolverKind::Brent => {
                Brent::new(settings).solve_bracketed(f, accuracy, guess, x_min, x_max)
            }
            SolverKind::Bisection => {
                Bisection::new(settings).solve_bracketed(f, accuracy, guess, x_min, x_max)
            }
            SolverKind::Secant => {
                Secant::new(settings).solve_bracketed(f, accuracy, guess, x_min, x_max)
            }
        }
    }

    /// Run [`Solver1D::solve`] with the selected solver.
    pub fn solve<F>(
        self,
        settings: SolverSettings,
        f: F,
        accuracy: Real,
        guess: Real,
        step: Real,
    ) -> Result<Solution>
    where
        F: FnMut(Real) -> Result<Real>,
    {
        match self {
            SolverKind::Brent => Brent::new(settings).solve(f, accuracy, guess, step),
            SolverKind::Bisection => Bisection::new(settings).solve(f, accuracy, guess, step),
            SolverKind::Secant => Secant::new(settings).solve(f, accuracy, guess, step),
        }
    }
}

impl std::fmt::Display for SolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SolverKind::Brent => "Brent",
            SolverKind::Bisection => "Bisection",
            SolverKind::Secant => "Secant",
        };
        f.write_str(name)
    }
}
