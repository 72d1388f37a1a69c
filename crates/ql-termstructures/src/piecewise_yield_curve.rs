//! `PiecewiseYieldCurve`: a yield curve bootstrapped from rate helpers.
//!
//! The curve solves one node per helper, in pillar order, so that each
//! helper reprices to its market quote.  What a node holds (discount
//! factor, zero rate, instantaneous forward) is fixed by the
//! [`YieldTraits`] parameter; the interpolation between nodes is chosen at
//! run time.
//!
//! Curves are handed out as `Arc`s: the curve observes its helpers' quotes
//! and rebuilds after any of them moves, lazily or eagerly per
//! [`RebuildPolicy`](crate::bootstrap::RebuildPolicy).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ql_core::Handle;
//! use ql_quotes::{Quote, SimpleQuote};
//! use ql_termstructures::{
//!     BootstrapConfig, DepositRateHelper, PiecewiseConstantForwards, RateHelper,
//!     YieldTermStructure,
//! };
//! use ql_time::{Actual360, Date};
//!
//! let today = Date::from_ymd(2025, 1, 2).unwrap();
//! let quote = |r: f64| Handle::from_arc(Arc::new(SimpleQuote::new(r)) as Arc<dyn Quote>);
//! let deposit = |rate: f64, (y, m, d): (u16, u8, u8)| -> Arc<dyn RateHelper> {
//!     let maturity = Date::from_ymd(y, m, d).unwrap();
//!     Arc::new(DepositRateHelper::new(quote(rate), today, maturity, Actual360).unwrap())
//! };
//! let helpers = vec![deposit(0.04, (2025, 4, 2)), deposit(0.045, (2025, 7, 2))];
//! let config = BootstrapConfig::default();
//! let curve = PiecewiseConstantForwards::constant_forwards(today, helpers, Actual360, config)
//!     .unwrap();
//! assert!(curve.discount(Date::from_ymd(2025, 6, 1).unwrap()).unwrap() < 1.0);
//! ```

use crate::bootstrap::{
    invalidate, iterative_bootstrap, BootstrapConfig, CurveCache, PiecewiseCurve, Pillar,
};
use crate::bootstrap_helper::{market_quotes, register_with_quotes, sort_helpers, RateHelper};
use crate::bootstrap_traits::{BootstrapTraits, Discount, ForwardRate, YieldTraits, ZeroYield};
use crate::interpolated_curve::InterpolatedCurve;
use crate::interpolation::{InterpolationBuilder, LogLinear};
use crate::term_structure::{Extrapolation, TermStructure};
use crate::yield_term_structure::YieldTermStructure;
use ql_core::errors::{Error, Result};
use ql_core::patterns::{LazyObject, LazyState, Observer};
use ql_core::{DiscountFactor, Real, Time};
use ql_time::{Date, DayCounter};
use std::sync::{Arc, Weak};

/// Discount-factor nodes with log-linear interpolation: piecewise constant
/// instantaneous forwards.  Build with
/// [`constant_forwards`](PiecewiseYieldCurve::constant_forwards).
pub type PiecewiseConstantForwards = PiecewiseYieldCurve<Discount>;

/// Zero-rate nodes.
pub type PiecewiseZeroYield = PiecewiseYieldCurve<ZeroYield>;

/// Instantaneous-forward nodes.
pub type PiecewiseForwardRate = PiecewiseYieldCurve<ForwardRate>;

/// A yield curve bootstrapped from rate helpers.
#[derive(Debug)]
pub struct PiecewiseYieldCurve<T: YieldTraits> {
    reference_date: Date,
    day_counter: Arc<dyn DayCounter>,
    builder: Arc<dyn InterpolationBuilder>,
    helpers: Vec<Arc<dyn RateHelper>>,
    config: BootstrapConfig,
    cache: CurveCache<T>,
    lazy: LazyState,
}

impl<T: YieldTraits> PiecewiseYieldCurve<T> {
    /// Bootstrap a yield curve from rate helpers.
    ///
    /// The helpers are sorted by pillar date.  The returned curve has
    /// already been bootstrapped once and observes every helper's quote.
    ///
    /// # Errors
    /// [`Error::Ordering`] for colliding pillars or a pillar not after
    /// `reference_date`; [`Error::InvalidQuote`], [`Error::Evaluation`] or
    /// [`Error::Bootstrap`] when the first bootstrap fails.
    pub fn new(
        reference_date: Date,
        mut helpers: Vec<Arc<dyn RateHelper>>,
        day_counter: impl DayCounter + 'static,
        builder: impl InterpolationBuilder + 'static,
        config: BootstrapConfig,
    ) -> Result<Arc<Self>> {
        sort_helpers(&mut helpers, reference_date)?;
        let curve = Arc::new(Self {
            reference_date,
            day_counter: Arc::new(day_counter),
            builder: Arc::new(builder),
            helpers,
            config,
            cache: CurveCache::new(),
            lazy: LazyState::new(),
        });
        let observer: Weak<Self> = Arc::downgrade(&curve);
        let observer: Weak<dyn Observer> = observer;
        register_with_quotes(&curve.helpers, &observer);
        curve.calculate()?;
        Ok(curve)
    }

    /// The helpers, sorted by pillar date.
    pub fn helpers(&self) -> &[Arc<dyn RateHelper>] {
        &self.helpers
    }

    /// The bootstrap settings.
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// The first node date, i.e. the reference date.
    pub fn base_date(&self) -> Date {
        self.reference_date
    }

    /// Curve value at `date` in the node variable (discount factor, zero
    /// rate or forward, per `T`).
    ///
    /// # Errors
    /// [`Error::Extrapolation`] outside the node range when extrapolation is
    /// disallowed.
    pub fn value_at(&self, date: Date) -> Result<Real> {
        self.check_range(date)?;
        let t = self.time_from_reference(date);
        self.calculate()?;
        self.cache.read(|curve, _| curve.value_at(t, self.config.extrapolation))
    }

    fn bootstrap(&self) -> Result<()> {
        let quotes = market_quotes(&self.helpers)?;
        let pillars: Vec<Pillar> = self
            .helpers
            .iter()
            .zip(quotes)
            .map(|(helper, quote)| {
                let date = helper.pillar_date();
                Pillar {
                    date,
                    time: self.day_counter.year_fraction(self.reference_date, date),
                    quote,
                }
            })
            .collect();
        let mut curve = InterpolatedCurve::<T>::new(
            self.reference_date,
            T::initial_value(),
            self.builder.clone(),
        );
        let report = iterative_bootstrap(&mut curve, &pillars, &self.config, |k, nodes| {
            let view = YieldCurveView {
                nodes,
                reference_date: self.reference_date,
                day_counter: &self.day_counter,
            };
            self.helpers[k].implied_quote(&view)
        })?;
        self.cache.store(curve, report);
        Ok(())
    }
}

impl PiecewiseYieldCurve<Discount> {
    /// Log-linear discount factors: the curve with piecewise constant
    /// instantaneous forwards.
    pub fn constant_forwards(
        reference_date: Date,
        helpers: Vec<Arc<dyn RateHelper>>,
        day_counter: impl DayCounter + 'static,
        config: BootstrapConfig,
    ) -> Result<Arc<Self>> {
        Self::new(reference_date, helpers, day_counter, LogLinear, config)
    }
}

impl<T: YieldTraits> LazyObject for PiecewiseYieldCurve<T> {
    fn perform_calculations(&self) -> Result<()> {
        self.cache.clear();
        self.bootstrap()
    }

    fn lazy_state(&self) -> &LazyState {
        &self.lazy
    }
}

impl<T: YieldTraits> PiecewiseCurve for PiecewiseYieldCurve<T> {
    type Traits = T;

    fn cache(&self) -> &CurveCache<T> {
        &self.cache
    }
}

impl<T: YieldTraits> Observer for PiecewiseYieldCurve<T> {
    fn update(&self) {
        invalidate(self, self.config.rebuild, T::NAME);
    }
}

impl<T: YieldTraits> TermStructure for PiecewiseYieldCurve<T> {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_counter(&self) -> Arc<dyn DayCounter> {
        self.day_counter.clone()
    }

    fn max_date(&self) -> Date {
        self.helpers
            .last()
            .map_or(self.reference_date, |helper| helper.pillar_date())
    }

    fn extrapolation(&self) -> Extrapolation {
        self.config.extrapolation
    }
}

impl<T: YieldTraits> YieldTermStructure for PiecewiseYieldCurve<T> {
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor> {
        self.calculate()?;
        self.cache.read(|curve, _| T::discount(curve, t))
    }
}

// ── Truncated view ────────────────────────────────────────────────────────────

/// The curve as seen by the helper being solved: nodes up to and including
/// its own pillar, and nothing past it.
#[derive(Debug)]
struct YieldCurveView<'a, T> {
    nodes: &'a InterpolatedCurve<T>,
    reference_date: Date,
    day_counter: &'a Arc<dyn DayCounter>,
}

impl<T: YieldTraits> TermStructure for YieldCurveView<'_, T> {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_counter(&self) -> Arc<dyn DayCounter> {
        self.day_counter.clone()
    }

    fn max_date(&self) -> Date {
        self.nodes.max_date()
    }

    fn check_range(&self, date: Date) -> Result<()> {
        if date < self.reference_date || date > self.max_date() {
            return Err(Error::Evaluation(format!(
                "{date} is outside the partial curve [{}, {}]",
                self.reference_date,
                self.max_date()
            )));
        }
        Ok(())
    }

    fn check_range_time(&self, t: Time) -> Result<()> {
        let max = self.nodes.max_time();
        if t < 0.0 || (t > max && !ql_math::close_enough(t, max, 1000)) {
            return Err(Error::Evaluation(format!(
                "time {t} is outside the partial curve [0, {max}]"
            )));
        }
        Ok(())
    }
}

impl<T: YieldTraits> YieldTermStructure for YieldCurveView<'_, T> {
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor> {
        T::discount(self.nodes, t)
    }
}
