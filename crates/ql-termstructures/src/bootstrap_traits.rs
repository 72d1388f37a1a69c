//! Bootstrap traits: what a curve node means and how to search for it.
//!
//! Each curve family fixes the state variable stored in its nodes, the
//! initial guess for a new node, the domain the solver may explore, and the
//! continuation past the last node.  The bounds keep every candidate value
//! economically valid, so helpers never see a negative discount factor or a
//! non-positive index level.
//!
//! | traits | node value | bounds for node `i` |
//! |--------|-----------|---------------------|
//! | [`Discount`] | discount factor | `P[i-1]·exp(∓Δt)` |
//! | [`ZeroYield`] | continuous zero rate | `[-1, 1]` |
//! | [`ForwardRate`] | instantaneous forward | `[-1, 1]` |
//! | [`ZeroInflation`] | index level | `I[i-1]·2^(∓Δt)` |
//! | [`YoYInflation`] | year-on-year rate | `[-0.5, 0.5]` |

use crate::interpolated_curve::InterpolatedCurve;
use ql_core::errors::Result;
use ql_core::{DiscountFactor, Real, Time};
use ql_math::Interpolation1D;

/// Rate used to roll the previous node forward for an initial guess.
const AVERAGE_RATE: Real = 0.05;

/// Bound on zero and forward rates.
const MAX_RATE: Real = 1.0;

/// Bound on year-on-year inflation rates.
const MAX_YOY_RATE: Real = 0.5;

/// Per-family node semantics used by the bootstrapper.
pub trait BootstrapTraits: std::fmt::Debug + Send + Sync + 'static {
    /// Family name for diagnostics.
    const NAME: &'static str;

    /// Starting point for node `i`, given the nodes solved so far.
    fn guess(i: usize, times: &[Time], data: &[Real]) -> Real;

    /// Smallest value node `i` may take.
    fn min_value_after(i: usize, times: &[Time], data: &[Real]) -> Real;

    /// Largest value node `i` may take.
    fn max_value_after(i: usize, times: &[Time], data: &[Real]) -> Real;

    /// Store a candidate for node `i`.
    fn update_guess(data: &mut [Real], value: Real, i: usize) {
        data[i] = value;
    }

    /// Value at `t` past the interpolation's last node.
    fn extrapolate(interpolation: &dyn Interpolation1D, t: Time) -> Real;
}

/// Curve families whose nodes determine discount factors.
pub trait YieldTraits: BootstrapTraits + Sized {
    /// Seed value at the reference date.
    fn initial_value() -> Real;

    /// Discount factor at `t`, continuing past the last node.
    fn discount(curve: &InterpolatedCurve<Self>, t: Time) -> Result<DiscountFactor>;
}

fn step(i: usize, times: &[Time]) -> Time {
    times[i] - times[i - 1]
}

// ── Discount ──────────────────────────────────────────────────────────────────

/// Nodes are discount factors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discount;

impl BootstrapTraits for Discount {
    const NAME: &'static str = "discount";

    fn guess(i: usize, times: &[Time], data: &[Real]) -> Real {
        data[i - 1] * (-AVERAGE_RATE * step(i, times)).exp()
    }

    fn min_value_after(i: usize, times: &[Time], data: &[Real]) -> Real {
        data[i - 1] * (-MAX_RATE * step(i, times)).exp()
    }

    fn max_value_after(i: usize, times: &[Time], data: &[Real]) -> Real {
        data[i - 1] * (MAX_RATE * step(i, times)).exp()
    }

    fn extrapolate(interpolation: &dyn Interpolation1D, t: Time) -> Real {
        let t_max = interpolation.x_max();
        let df = interpolation.operator(t_max);
        let forward = -interpolation.derivative(t_max) / df;
        df * (-forward * (t - t_max)).exp()
    }
}

impl YieldTraits for Discount {
    fn initial_value() -> Real {
        1.0
    }

    fn discount(curve: &InterpolatedCurve<Self>, t: Time) -> Result<DiscountFactor> {
        curve.value(t)
    }
}

// ── ZeroYield ─────────────────────────────────────────────────────────────────

/// Nodes are continuously-compounded zero rates.  The reference-date node
/// has no meaning of its own and follows the first pillar.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroYield;

impl BootstrapTraits for ZeroYield {
    const NAME: &'static str = "zero yield";

    fn guess(i: usize, _times: &[Time], data: &[Real]) -> Real {
        if i == 1 {
            AVERAGE_RATE
        } else {
            data[i - 1]
        }
    }

    fn min_value_after(_i: usize, _times: &[Time], _data: &[Real]) -> Real {
        -MAX_RATE
    }

    fn max_value_after(_i: usize, _times: &[Time], _data: &[Real]) -> Real {
        MAX_RATE
    }

    fn update_guess(data: &mut [Real], value: Real, i: usize) {
        data[i] = value;
        if i == 1 {
            data[0] = value;
        }
    }

    fn extrapolate(interpolation: &dyn Interpolation1D, t: Time) -> Real {
        // r(t)·t grows at the instantaneous forward of the last node
        let t_max = interpolation.x_max();
        let zero = interpolation.operator(t_max);
        let forward = zero + t_max * interpolation.derivative(t_max);
        (zero * t_max + forward * (t - t_max)) / t
    }
}

impl YieldTraits for ZeroYield {
    fn initial_value() -> Real {
        AVERAGE_RATE
    }

    fn discount(curve: &InterpolatedCurve<Self>, t: Time) -> Result<DiscountFactor> {
        if t == 0.0 {
            return Ok(1.0);
        }
        Ok((-curve.value(t)? * t).exp())
    }
}

// ── ForwardRate ───────────────────────────────────────────────────────────────

/// Nodes are instantaneous forward rates; discount factors integrate them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardRate;

impl BootstrapTraits for ForwardRate {
    const NAME: &'static str = "forward rate";

    fn guess(i: usize, times: &[Time], data: &[Real]) -> Real {
        ZeroYield::guess(i, times, data)
    }

    fn min_value_after(_i: usize, _times: &[Time], _data: &[Real]) -> Real {
        -MAX_RATE
    }

    fn max_value_after(_i: usize, _times: &[Time], _data: &[Real]) -> Real {
        MAX_RATE
    }

    fn update_guess(data: &mut [Real], value: Real, i: usize) {
        ZeroYield::update_guess(data, value, i);
    }

    fn extrapolate(interpolation: &dyn Interpolation1D, _t: Time) -> Real {
        interpolation.operator(interpolation.x_max())
    }
}

impl YieldTraits for ForwardRate {
    fn initial_value() -> Real {
        AVERAGE_RATE
    }

    fn discount(curve: &InterpolatedCurve<Self>, t: Time) -> Result<DiscountFactor> {
        if t == 0.0 {
            return Ok(1.0);
        }
        let interpolation = curve.interpolation()?;
        let t_max = interpolation.x_max();
        let integral = if t <= t_max {
            interpolation.primitive(t)
        } else {
            interpolation.primitive(t_max) + interpolation.operator(t_max) * (t - t_max)
        };
        Ok((-integral).exp())
    }
}

// ── ZeroInflation ─────────────────────────────────────────────────────────────

/// Nodes are price-index levels; the seed is the base fixing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroInflation;

/// Rate used to roll an index level forward for an initial guess.
const AVERAGE_INFLATION: Real = 0.02;

impl BootstrapTraits for ZeroInflation {
    const NAME: &'static str = "zero inflation";

    fn guess(i: usize, times: &[Time], data: &[Real]) -> Real {
        data[i - 1] * (AVERAGE_INFLATION * step(i, times)).exp()
    }

    fn min_value_after(i: usize, times: &[Time], data: &[Real]) -> Real {
        data[i - 1] * (-std::f64::consts::LN_2 * step(i, times)).exp()
    }

    fn max_value_after(i: usize, times: &[Time], data: &[Real]) -> Real {
        data[i - 1] * (std::f64::consts::LN_2 * step(i, times)).exp()
    }

    fn extrapolate(interpolation: &dyn Interpolation1D, t: Time) -> Real {
        let t_max = interpolation.x_max();
        let level = interpolation.operator(t_max);
        let growth = interpolation.derivative(t_max) / level;
        level * (growth * (t - t_max)).exp()
    }
}

// ── YoYInflation ──────────────────────────────────────────────────────────────

/// Nodes are year-on-year inflation rates; the seed is the base YoY fixing.
#[derive(Debug, Clone, Copy, Default)]
pub struct YoYInflation;

impl BootstrapTraits for YoYInflation {
    const NAME: &'static str = "year-on-year inflation";

    fn guess(i: usize, _times: &[Time], data: &[Real]) -> Real {
        data[i - 1]
    }

    fn min_value_after(_i: usize, _times: &[Time], _data: &[Real]) -> Real {
        -MAX_YOY_RATE
    }

    fn max_value_after(_i: usize, _times: &[Time], _data: &[Real]) -> Real {
        MAX_YOY_RATE
    }

    fn extrapolate(interpolation: &dyn Interpolation1D, _t: Time) -> Real {
        interpolation.operator(interpolation.x_max())
    }
}
