//! Step-function interpolations.

use super::{check_nodes, Interpolation1D};
use ql_core::{errors::Result, Real};

/// Backward-flat interpolation: on `(x[i], x[i+1]]` the value is `y[i+1]`.
///
/// Used for instantaneous forwards, where node `i+1` holds the forward rate
/// in force up to its own date.
#[derive(Debug, Clone)]
pub struct BackwardFlatInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
    primitive: Vec<Real>,
}

impl BackwardFlatInterpolation {
    /// Construct from sorted `xs` and corresponding `ys`.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        let mut primitive = vec![0.0; xs.len()];
        for i in 1..xs.len() {
            primitive[i] = primitive[i - 1] + ys[i] * (xs[i] - xs[i - 1]);
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            primitive,
        })
    }

    /// Index of the node whose value applies at `x`.
    fn node(&self, x: Real) -> usize {
        let n = self.xs.len();
        if x <= self.xs[0] {
            0
        } else {
            self.xs.partition_point(|&xi| xi < x).min(n - 1)
        }
    }
}

impl Interpolation1D for BackwardFlatInterpolation {
    fn operator(&self, x: Real) -> Real {
        self.ys[self.node(x)]
    }

    fn derivative(&self, _x: Real) -> Real {
        0.0
    }

    fn primitive(&self, x: Real) -> Real {
        let j = self.node(x);
        if j == 0 {
            return self.ys[0] * (x - self.xs[0]);
        }
        self.primitive[j - 1] + self.ys[j] * (x - self.xs[j - 1])
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}

/// Forward-flat interpolation: on `[x[i], x[i+1])` the value is `y[i]`.
#[derive(Debug, Clone)]
pub struct ForwardFlatInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
    primitive: Vec<Real>,
}

impl ForwardFlatInterpolation {
    /// Construct from sorted `xs` and corresponding `ys`.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        let mut primitive = vec![0.0; xs.len()];
        for i in 1..xs.len() {
            primitive[i] = primitive[i - 1] + ys[i - 1] * (xs[i] - xs[i - 1]);
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            primitive,
        })
    }

    fn node(&self, x: Real) -> usize {
        self.xs.partition_point(|&xi| xi <= x).saturating_sub(1)
    }
}

impl Interpolation1D for ForwardFlatInterpolation {
    fn operator(&self, x: Real) -> Real {
        self.ys[self.node(x)]
    }

    fn derivative(&self, _x: Real) -> Real {
        0.0
    }

    fn primitive(&self, x: Real) -> Real {
        let i = self.node(x);
        self.primitive[i] + self.ys[i] * (x - self.xs[i])
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const XS: [f64; 3] = [0.0, 1.0, 2.0];
    const YS: [f64; 3] = [1.0, 2.0, 3.0];

    #[test]
    fn backward_flat() {
        let interp = BackwardFlatInterpolation::new(&XS, &YS).unwrap();
        assert_eq!(interp.operator(0.0), 1.0);
        assert_eq!(interp.operator(0.5), 2.0);
        assert_eq!(interp.operator(1.0), 2.0);
        assert_eq!(interp.operator(1.5), 3.0);
        assert_eq!(interp.operator(5.0), 3.0);
        assert_abs_diff_eq!(interp.primitive(1.5), 2.0 + 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(interp.primitive(3.0), 2.0 + 6.0, epsilon = 1e-12);
    }

    #[test]
    fn forward_flat() {
        let interp = ForwardFlatInterpolation::new(&XS, &YS).unwrap();
        assert_eq!(interp.operator(0.5), 1.0);
        assert_eq!(interp.operator(1.0), 2.0);
        assert_eq!(interp.operator(1.5), 2.0);
        assert_eq!(interp.operator(2.0), 3.0);
        assert_abs_diff_eq!(interp.primitive(1.5), 1.0 + 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(interp.primitive(2.5), 3.0 + 1.5, epsilon = 1e-12);
        assert_eq!(interp.derivative(0.3), 0.0);
    }
}
