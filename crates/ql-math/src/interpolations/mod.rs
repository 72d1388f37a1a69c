//! 1D interpolation trait and the local schemes used by curve nodes.
//!
//! Every scheme here is local: the value on `[x[i], x[i+1]]` depends only on
//! the two surrounding nodes, so changing node `k` never moves the
//! interpolant before `x[k-1]`.  Outside `[x_min, x_max]` each scheme
//! continues its first or last segment.

use ql_core::{ensure, errors::Result, Real};

mod flat;

pub use flat::{BackwardFlatInterpolation, ForwardFlatInterpolation};

/// A 1D interpolation function `f: R → R` defined by a set of known points.
pub trait Interpolation1D: std::fmt::Debug + Send + Sync {
    /// Evaluate the interpolation at `x`.
    fn operator(&self, x: Real) -> Real;

    /// First derivative at `x`.  Step schemes return zero.
    fn derivative(&self, x: Real) -> Real;

    /// Integral of the interpolant from `x_min` to `x`.
    fn primitive(&self, x: Real) -> Real;

    /// Return the lower bound of the interpolation domain.
    fn x_min(&self) -> Real;

    /// Return the upper bound of the interpolation domain.
    fn x_max(&self) -> Real;

    /// Return `true` if `x` is within the interpolation range.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

/// Check node abscissas and ordinates shared by every scheme.
pub(crate) fn check_nodes(xs: &[Real], ys: &[Real]) -> Result<()> {
    ensure!(xs.len() >= 2, "need at least 2 points for interpolation, got {}", xs.len());
    ensure!(
        xs.len() == ys.len(),
        "xs and ys must have the same length ({} vs {})",
        xs.len(),
        ys.len()
    );
    ensure!(
        xs.windows(2).all(|w| w[0] < w[1]),
        "interpolation abscissas must be strictly increasing"
    );
    ensure!(
        xs.iter().chain(ys).all(|v| v.is_finite()),
        "interpolation nodes must be finite"
    );
    Ok(())
}

/// Index `i` of the segment `[xs[i], xs[i+1]]` used for `x`, clamped to the
/// first and last segments.
pub(crate) fn locate(xs: &[Real], x: Real) -> usize {
    let n = xs.len();
    xs.partition_point(|&xi| xi <= x).saturating_sub(1).min(n - 2)
}

// ── Linear ────────────────────────────────────────────────────────────────────

/// Linear interpolation.
///
/// `f(x) = y[i] + (y[i+1] - y[i]) * (x - x[i]) / (x[i+1] - x[i])`
#[derive(Debug, Clone)]
pub struct LinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
    // integral from xs[0] to xs[i]
    primitive: Vec<Real>,
}

impl LinearInterpolation {
    /// Construct a linear interpolation from sorted `xs` and corresponding `ys`.
    ///
    /// # Errors
    /// Fewer than 2 points, mismatched lengths, unsorted or non-finite nodes.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        let mut primitive = Vec::with_capacity(xs.len());
        primitive.push(0.0);
        for i in 1..xs.len() {
            let area = 0.5 * (ys[i - 1] + ys[i]) * (xs[i] - xs[i - 1]);
            primitive.push(primitive[i - 1] + area);
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            primitive,
        })
    }

    fn slope(&self, i: usize) -> Real {
        (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl Interpolation1D for LinearInterpolation {
    fn operator(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        self.ys[i] + (x - self.xs[i]) * self.slope(i)
    }

    fn derivative(&self, x: Real) -> Real {
        self.slope(locate(&self.xs, x))
    }

    fn primitive(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.primitive[i] + dx * (self.ys[i] + 0.5 * dx * self.slope(i))
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}

// ── Log-linear ────────────────────────────────────────────────────────────────

/// Log-linear interpolation.
///
/// Interpolates `log(y)` linearly and exponentiates the result.  Used for
/// discount factors, where it yields piecewise-constant forward rates.
#[derive(Debug, Clone)]
pub struct LogLinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
    log_ys: Vec<Real>,
    primitive: Vec<Real>,
}

impl LogLinearInterpolation {
    /// Construct a log-linear interpolation.
    ///
    /// All `ys` values must be strictly positive.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        ensure!(
            ys.iter().all(|&y| y > 0.0),
            "all y values must be positive for log-linear interpolation"
        );
        let log_ys: Vec<Real> = ys.iter().map(|y| y.ln()).collect();
        let mut this = Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            log_ys,
            primitive: vec![0.0; xs.len()],
        };
        for i in 1..xs.len() {
            this.primitive[i] =
                this.primitive[i - 1] + this.segment_integral(i - 1, xs[i] - xs[i - 1]);
        }
        Ok(this)
    }

    fn log_slope(&self, i: usize) -> Real {
        (self.log_ys[i + 1] - self.log_ys[i]) / (self.xs[i + 1] - self.xs[i])
    }

    /// Integral of `y[i] * exp(b * s)` for `s` in `[0, dx]`.
    fn segment_integral(&self, i: usize, dx: Real) -> Real {
        let b = self.log_slope(i);
        if (b * dx).abs() < 1e-12 {
            self.ys[i] * dx * (1.0 + 0.5 * b * dx)
        } else {
            self.ys[i] * (b * dx).exp_m1() / b
        }
    }
}

impl Interpolation1D for LogLinearInterpolation {
    fn operator(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        (self.log_ys[i] + (x - self.xs[i]) * self.log_slope(i)).exp()
    }

    fn derivative(&self, x: Real) -> Real {
        self.operator(x) * self.log_slope(locate(&self.xs, x))
    }

    fn primitive(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        self.primitive[i] + self.segment_integral(i, x - self.xs[i])
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}
