//! Brent's method.

use super::{Bracket, Evaluator, Solver1D, SolverSettings};
use ql_core::{errors::Result, Real};

/// Brent's method: inverse quadratic interpolation and secant steps,
/// falling back to bisection whenever they would leave the bracket.
#[derive(Debug, Clone, Copy, Default)]
pub struct Brent {
    settings: SolverSettings,
}

impl Brent {
    /// Create a solver with the given budget and bounds.
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }
}

impl Solver1D for Brent {
    fn name(&self) -> &'static str {
        "Brent"
    }

    fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    fn solve_impl<F>(&self, f: &mut Evaluator<F>, accuracy: Real, bracket: Bracket) -> Result<Real>
    where
        F: FnMut(Real) -> Result<Real>,
    {
        let mut b = bracket.guess;
        let mut fb = f.call(b)?;
        // the guess sits on one side of the root; a and c start on the other
        let (mut a, mut fa) = if fb * bracket.f_min < 0.0 {
            (bracket.x_min, bracket.f_min)
        } else {
            (bracket.x_max, bracket.f_max)
        };
        let (mut c, mut fc) = (a, fa);
        let mut d = b - c;
        let mut e = d;

        loop {
            if fb == 0.0 {
                return Ok(b);
            }
            if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }
            let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * accuracy;
            let xm = 0.5 * (c - b);
            if xm.abs() <= tol {
                return Ok(b);
            }
            if e.abs() >= tol && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (p, q) = if a == c {
                    (2.0 * xm * s, 1.0 - s)
                } else {
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                        (q - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };
                let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };
                if 2.0 * p < (3.0 * xm * q - (tol * q).abs()).min((e * q).abs()) {
                    e = d;
                    d = p / q;
                } else {
                    d = xm;
                    e = d;
                }
            } else {
                d = xm;
                e = d;
            }
            a = b;
            fa = fb;
            b += if d.abs() > tol { d } else { tol.copysign(xm) };
            fb = f.call(b)?;
        }
    }
}
