//! # ql-math
//!
//! Numerical building blocks for curve bootstrapping: local 1D
//! interpolations with derivatives and integrals, bounded 1D root finders,
//! and floating-point comparison helpers.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Floating-point comparison utilities.
pub mod comparison;

/// 1D interpolation schemes.
pub mod interpolations;

/// 1D root-finding solvers.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use comparison::{close, close_enough, within_tolerance};
pub use interpolations::{
    BackwardFlatInterpolation, ForwardFlatInterpolation, Interpolation1D, LinearInterpolation,
    LogLinearInterpolation,
};
pub use solvers1d::{Bisection, Brent, Secant, Solution, Solver1D, SolverKind, SolverSettings};
