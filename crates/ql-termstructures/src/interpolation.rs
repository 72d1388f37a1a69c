//! Interpolation builders.
//!
//! Curves rebuild their interpolation every time a node moves, so they hold
//! a builder rather than an interpolation.  Every scheme offered here is
//! local, which keeps the bootstrap one-pass: moving node `k` never changes
//! the curve before node `k - 1`.

use ql_core::{errors::Result, Real};
use ql_math::Interpolation1D;

/// Factory for an interpolation over a set of nodes.
pub trait InterpolationBuilder: std::fmt::Debug + Send + Sync {
    /// Build an interpolation from the given x and y values.
    fn build(&self, xs: &[Real], ys: &[Real]) -> Result<Box<dyn Interpolation1D>>;
}

/// Linear interpolation builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl InterpolationBuilder for Linear {
    fn build(&self, xs: &[Real], ys: &[Real]) -> Result<Box<dyn Interpolation1D>> {
        Ok(Box::new(ql_math::LinearInterpolation::new(xs, ys)?))
    }
}

/// Log-linear interpolation builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLinear;

impl InterpolationBuilder for LogLinear {
    fn build(&self, xs: &[Real], ys: &[Real]) -> Result<Box<dyn Interpolation1D>> {
        Ok(Box::new(ql_math::LogLinearInterpolation::new(xs, ys)?))
    }
}

/// Backward-flat interpolation builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackwardFlat;

impl InterpolationBuilder for BackwardFlat {
    fn build(&self, xs: &[Real], ys: &[Real]) -> Result<Box<dyn Interpolation1D>> {
        Ok(Box::new(ql_math::BackwardFlatInterpolation::new(xs, ys)?))
    }
}

/// Forward-flat interpolation builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardFlat;

impl InterpolationBuilder for ForwardFlat {
    fn build(&self, xs: &[Real], ys: &[Real]) -> Result<Box<dyn Interpolation1D>> {
        Ok(Box::new(ql_math::ForwardFlatInterpolation::new(xs, ys)?))
    }
}
