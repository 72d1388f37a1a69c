//! # ql-termstructures
//!
//! Yield and inflation term structures, and the iterative bootstrapper that
//! builds piecewise curves from market helpers.
//!
//! A piecewise curve owns a sorted set of helpers, each pinning one node at
//! its pillar date.  Nodes are solved left to right with a bracketed 1-D
//! root finder; each helper sees only the partial curve up to its own
//! pillar.  Curves observe their helpers' quotes and rebuild when a quote
//! moves.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `TermStructure`: base trait and extrapolation policy.
pub mod term_structure;

/// `YieldTermStructure`: discount factors, zero rates and forwards.
pub mod yield_term_structure;

/// `FlatForward`: constant forward-rate yield curve.
pub mod flat_forward;

/// Inflation term structures, observation conventions and flat curves.
pub mod inflation_term_structure;

/// Interpolation schemes selectable at run time.
pub mod interpolation;

/// `InterpolatedCurve`: the node container behind piecewise curves.
pub mod interpolated_curve;

/// Per-family node semantics: guesses, bounds and extrapolation.
pub mod bootstrap_traits;

/// The calibrating-helper contract.
pub mod bootstrap_helper;

/// The iterative bootstrapper, its configuration and the curve report.
pub mod bootstrap;

/// Deposit, FRA, futures and par-swap helpers.
pub mod rate_helpers;

/// Zero-coupon and year-on-year inflation swap helpers.
pub mod inflation_helpers;

/// `PiecewiseYieldCurve` and its aliases.
pub mod piecewise_yield_curve;

/// `PiecewiseInflationCurve` and its aliases.
pub mod piecewise_inflation_curve;

/// `CurveContext`: evaluation date and named curves.
pub mod context;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use bootstrap::{
    BootstrapConfig, BootstrapReport, CurveCache, CurveState, NodeReport, PiecewiseCurve,
    RebuildPolicy,
};
pub use bootstrap_helper::{CalibratingHelper, RateHelper, YoYInflationHelper, ZeroInflationHelper};
pub use bootstrap_traits::{
    BootstrapTraits, Discount, ForwardRate, YieldTraits, YoYInflation, ZeroInflation, ZeroYield,
};
pub use context::CurveContext;
pub use flat_forward::FlatForward;
pub use inflation_helpers::{YearOnYearInflationSwapHelper, ZeroCouponInflationSwapHelper};
pub use inflation_term_structure::{
    FlatYoYInflationCurve, FlatZeroInflationCurve, InflationConventions, InflationTermStructure,
    YoYInflationTermStructure, ZeroInflationTermStructure,
};
pub use interpolated_curve::InterpolatedCurve;
pub use interpolation::{BackwardFlat, ForwardFlat, InterpolationBuilder, Linear, LogLinear};
pub use piecewise_inflation_curve::{
    InflationCurveView, InflationTraits, PiecewiseInflationCurve, PiecewiseYoYInflation,
    PiecewiseZeroInflation,
};
pub use piecewise_yield_curve::{
    PiecewiseConstantForwards, PiecewiseForwardRate, PiecewiseYieldCurve, PiecewiseZeroYield,
};
pub use rate_helpers::{DepositRateHelper, FraRateHelper, FuturesRateHelper, SwapRateHelper};
pub use term_structure::{Extrapolation, TermStructure};
pub use yield_term_structure::YieldTermStructure;
