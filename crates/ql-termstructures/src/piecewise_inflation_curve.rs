//! Piecewise inflation curves bootstrapped from inflation swap helpers.
//!
//! The first node sits at the base date (the observation date of the
//! reference date) and holds the last published fixing: the index level
//! for [`PiecewiseZeroInflation`], the year-on-year rate for
//! [`PiecewiseYoYInflation`].  Each further node is solved at a helper's
//! observation pillar.

use crate::bootstrap::{
    invalidate, iterative_bootstrap, BootstrapConfig, CurveCache, PiecewiseCurve, Pillar,
};
use crate::bootstrap_helper::{
    market_quotes, register_with_quotes, sort_helpers, CalibratingHelper, YoYInflationHelper,
    ZeroInflationHelper,
};
use crate::bootstrap_traits::{BootstrapTraits, YoYInflation, ZeroInflation};
use crate::inflation_term_structure::{
    check_observation_range, InflationConventions, InflationTermStructure,
    YoYInflationTermStructure, ZeroInflationTermStructure,
};
use crate::interpolated_curve::InterpolatedCurve;
use crate::interpolation::InterpolationBuilder;
use crate::term_structure::{Extrapolation, TermStructure};
use ql_core::errors::{Error, Result};
use ql_core::patterns::{LazyObject, LazyState, Observer};
use ql_core::{Rate, Real, Time};
use ql_indexes::{Index, YoYInflationIndex, ZeroInflationIndex};
use ql_time::{Date, DayCounter};
use std::sync::{Arc, Weak};

/// Index-level nodes calibrated to zero-coupon inflation swaps.
pub type PiecewiseZeroInflation = PiecewiseInflationCurve<ZeroInflation>;

/// Year-on-year rate nodes calibrated to YoY inflation swaps.
pub type PiecewiseYoYInflation = PiecewiseInflationCurve<YoYInflation>;

/// Ties an inflation node family to its helpers and index.
pub trait InflationTraits: BootstrapTraits + Sized {
    /// Helpers calibrating this family.
    type Helper: CalibratingHelper + ?Sized;

    /// Index supplying the seed fixing.
    type Index: Index;

    /// Published fixing for the seed node at `base_date`.
    fn base_fixing(index: &Self::Index, base_date: Date) -> Result<Option<Real>>;

    /// The helper's quote implied by a partial curve.
    fn implied_quote(helper: &Self::Helper, view: &InflationCurveView<'_, Self>) -> Result<Real>;
}

impl InflationTraits for ZeroInflation {
    type Helper = dyn ZeroInflationHelper;
    type Index = ZeroInflationIndex;

    fn base_fixing(index: &ZeroInflationIndex, base_date: Date) -> Result<Option<Real>> {
        index.past_fixing(base_date)
    }

    fn implied_quote(helper: &Self::Helper, view: &InflationCurveView<'_, Self>) -> Result<Real> {
        helper.implied_quote(view)
    }
}

impl InflationTraits for YoYInflation {
    type Helper = dyn YoYInflationHelper;
    type Index = YoYInflationIndex;

    fn base_fixing(index: &YoYInflationIndex, base_date: Date) -> Result<Option<Real>> {
        index.past_fixing(base_date)
    }

    fn implied_quote(helper: &Self::Helper, view: &InflationCurveView<'_, Self>) -> Result<Real> {
        helper.implied_quote(view)
    }
}

/// An inflation curve bootstrapped from inflation swap helpers.
#[derive(Debug)]
pub struct PiecewiseInflationCurve<T: InflationTraits> {
    reference_date: Date,
    base_date: Date,
    conventions: InflationConventions,
    day_counter: Arc<dyn DayCounter>,
    builder: Arc<dyn InterpolationBuilder>,
    index: Arc<T::Index>,
    helpers: Vec<Arc<T::Helper>>,
    config: BootstrapConfig,
    cache: CurveCache<T>,
    lazy: LazyState,
}

impl<T: InflationTraits> PiecewiseInflationCurve<T> {
    /// Bootstrap an inflation curve.
    ///
    /// The seed is `index`'s published fixing at the base date; helpers are
    /// sorted by observation pillar.
    ///
    /// # Errors
    /// [`Error::Ordering`] for colliding pillars or a pillar not after the
    /// base date; [`Error::Evaluation`] when the base fixing is missing;
    /// [`Error::InvalidQuote`] or [`Error::Bootstrap`] when the first
    /// bootstrap fails.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reference_date: Date,
        conventions: InflationConventions,
        index: Arc<T::Index>,
        mut helpers: Vec<Arc<T::Helper>>,
        day_counter: impl DayCounter + 'static,
        builder: impl InterpolationBuilder + 'static,
        config: BootstrapConfig,
    ) -> Result<Arc<Self>> {
        let base_date = conventions.observation_date(reference_date)?;
        sort_helpers(&mut helpers, base_date)?;
        let curve = Arc::new(Self {
            reference_date,
            base_date,
            conventions,
            day_counter: Arc::new(day_counter),
            builder: Arc::new(builder),
            index,
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
    pub fn helpers(&self) -> &[Arc<T::Helper>] {
        &self.helpers
    }

    /// The index providing the seed fixing.
    pub fn index(&self) -> &Arc<T::Index> {
        &self.index
    }

    /// The bootstrap settings.
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Curve value at an observation date in the node variable.
    ///
    /// # Errors
    /// [`Error::Extrapolation`] before the base date, or past the last
    /// pillar when extrapolation is disallowed.
    pub fn value_at(&self, date: Date) -> Result<Real> {
        self.check_range(date)?;
        let t = self.time_from_base(date);
        self.calculate()?;
        self.cache.read(|curve, _| curve.value_at(t, self.config.extrapolation))
    }

    fn bootstrap(&self) -> Result<()> {
        let seed = T::base_fixing(&self.index, self.base_date)?.ok_or_else(|| {
            Error::Evaluation(format!(
                "no {} fixing published for the base date {}",
                self.index.name(),
                self.base_date
            ))
        })?;
        let quotes = market_quotes(&self.helpers)?;
        let pillars: Vec<Pillar> = self
            .helpers
            .iter()
            .zip(quotes)
            .map(|(helper, quote)| {
                let date = helper.pillar_date();
                Pillar {
                    date,
                    time: self.day_counter.year_fraction(self.base_date, date),
                    quote,
                }
            })
            .collect();
        let mut curve = InterpolatedCurve::<T>::new(self.base_date, seed, self.builder.clone());
        let report = iterative_bootstrap(&mut curve, &pillars, &self.config, |k, nodes| {
            let view = InflationCurveView {
                nodes,
                reference_date: self.reference_date,
                base_date: self.base_date,
                conventions: &self.conventions,
                day_counter: &self.day_counter,
            };
            T::implied_quote(&self.helpers[k], &view)
        })?;
        self.cache.store(curve, report);
        Ok(())
    }

    fn node_value(&self, t: Time) -> Result<Real> {
        self.calculate()?;
        self.cache.read(|curve, _| curve.value(t))
    }
}

impl<T: InflationTraits> LazyObject for PiecewiseInflationCurve<T> {
    fn perform_calculations(&self) -> Result<()> {
        self.cache.clear();
        self.bootstrap()
    }

    fn lazy_state(&self) -> &LazyState {
        &self.lazy
    }
}

impl<T: InflationTraits> PiecewiseCurve for PiecewiseInflationCurve<T> {
    type Traits = T;

    fn cache(&self) -> &CurveCache<T> {
        &self.cache
    }
}

impl<T: InflationTraits> Observer for PiecewiseInflationCurve<T> {
    fn update(&self) {
        invalidate(self, self.config.rebuild, T::NAME);
    }
}

impl<T: InflationTraits> TermStructure for PiecewiseInflationCurve<T> {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_counter(&self) -> Arc<dyn DayCounter> {
        self.day_counter.clone()
    }

    fn max_date(&self) -> Date {
        self.helpers
            .last()
            .map_or(self.base_date, |helper| helper.pillar_date())
    }

    fn extrapolation(&self) -> Extrapolation {
        self.config.extrapolation
    }

    fn check_range(&self, date: Date) -> Result<()> {
        check_observation_range(self.base_date, self.max_date(), self.extrapolation(), date)
    }
}

impl<T: InflationTraits> InflationTermStructure for PiecewiseInflationCurve<T> {
    fn conventions(&self) -> &InflationConventions {
        &self.conventions
    }

    fn base_date(&self) -> Date {
        self.base_date
    }
}

impl ZeroInflationTermStructure for PiecewiseInflationCurve<ZeroInflation> {
    fn index_level_impl(&self, t: Time) -> Result<Real> {
        self.node_value(t)
    }
}

impl YoYInflationTermStructure for PiecewiseInflationCurve<YoYInflation> {
    fn yoy_rate_impl(&self, t: Time) -> Result<Rate> {
        self.node_value(t)
    }
}

// ── Truncated view ────────────────────────────────────────────────────────────

/// The partial inflation curve lent to the helper being solved.
///
/// Covers observation dates from the base date to the helper's pillar and
/// refuses anything outside with [`Error::Evaluation`].
#[derive(Debug)]
pub struct InflationCurveView<'a, T> {
    nodes: &'a InterpolatedCurve<T>,
    reference_date: Date,
    base_date: Date,
    conventions: &'a InflationConventions,
    day_counter: &'a Arc<dyn DayCounter>,
}

impl<T: BootstrapTraits> TermStructure for InflationCurveView<'_, T> {
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
        if date < self.base_date || date > self.max_date() {
            return Err(Error::Evaluation(format!(
                "{date} is outside the partial inflation curve [{}, {}]",
                self.base_date,
                self.max_date()
            )));
        }
        Ok(())
    }
}

impl<T: BootstrapTraits> InflationTermStructure for InflationCurveView<'_, T> {
    fn conventions(&self) -> &InflationConventions {
        self.conventions
    }

    fn base_date(&self) -> Date {
        self.base_date
    }
}

impl ZeroInflationTermStructure for InflationCurveView<'_, ZeroInflation> {
    fn index_level_impl(&self, t: Time) -> Result<Real> {
        self.nodes.value(t)
    }
}

impl YoYInflationTermStructure for InflationCurveView<'_, YoYInflation> {
    fn yoy_rate_impl(&self, t: Time) -> Result<Rate> {
        self.nodes.value(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::CurveState;
    use crate::flat_forward::FlatForward;
    use crate::inflation_helpers::{YearOnYearInflationSwapHelper, ZeroCouponInflationSwapHelper};
    use crate::interpolation::{Linear, LogLinear};
    use crate::yield_term_structure::YieldTermStructure;
    use approx::assert_abs_diff_eq;
    use ql_core::{Handle, RelinkableHandle};
    use ql_indexes::uk_rpi;
    use ql_quotes::{Quote, SimpleQuote};
    use ql_time::{
        Actual365Fixed, BusinessDayConvention, Frequency, NullCalendar, Period, Thirty360, TimeUnit,
    };

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn conventions() -> InflationConventions {
        InflationConventions::new(Period::new(3, TimeUnit::Months), Frequency::Monthly, false)
    }

    fn rpi_with_base_fixing() -> Arc<ZeroInflationIndex> {
        let rpi = uk_rpi();
        rpi.add_fixing(date(2023, 3, 1), 360.0).unwrap();
        rpi.add_fixing(date(2022, 3, 1), 320.0).unwrap();
        Arc::new(rpi)
    }

    fn zc_helper(
        quote: &Arc<SimpleQuote>,
        maturity: Date,
        index: &Arc<ZeroInflationIndex>,
    ) -> Arc<dyn ZeroInflationHelper> {
        let handle = Handle::from_arc(quote.clone() as Arc<dyn Quote>);
        Arc::new(
            ZeroCouponInflationSwapHelper::new(
                handle,
                conventions(),
                date(2023, 6, 1),
                maturity,
                index.clone(),
                Thirty360,
            )
            .unwrap(),
        )
    }

    #[test]
    fn zero_inflation_curve_reprices_swaps() {
        let index = rpi_with_base_fixing();
        let q2 = Arc::new(SimpleQuote::new(0.03));
        let q5 = Arc::new(SimpleQuote::new(0.028));
        let helpers = vec![
            zc_helper(&q5, date(2028, 6, 1), &index),
            zc_helper(&q2, date(2025, 6, 1), &index),
        ];
        let curve = PiecewiseZeroInflation::new(
            date(2023, 6, 1),
            conventions(),
            index.clone(),
            helpers,
            Thirty360,
            Linear,
            BootstrapConfig::default(),
        )
        .unwrap();

        assert_eq!(curve.base_date(), date(2023, 3, 1));
        assert_eq!(
            curve.dates().unwrap(),
            vec![date(2023, 3, 1), date(2025, 3, 1), date(2028, 3, 1)]
        );
        assert_eq!(curve.state(), CurveState::Built);
        assert_abs_diff_eq!(curve.index_level(date(2023, 3, 1)).unwrap(), 360.0, epsilon = 1e-12);
        let ratio = curve.index_ratio(date(2025, 3, 1)).unwrap();
        assert_abs_diff_eq!(ratio, 1.03_f64.powi(2), epsilon = 1e-8);
        assert_abs_diff_eq!(curve.zero_rate(date(2028, 3, 1)).unwrap(), 0.028, epsilon = 1e-8);
        assert!(matches!(curve.index_level(date(2029, 1, 1)), Err(Error::Extrapolation(_))));

        q2.set_value(0.035);
        assert_eq!(curve.state(), CurveState::UnderConstruction);
        let ratio = curve.index_ratio(date(2025, 3, 1)).unwrap();
        assert_abs_diff_eq!(ratio, 1.035_f64.powi(2), epsilon = 1e-8);
    }

    #[test]
    fn missing_base_fixing_is_reported() {
        let index = Arc::new(uk_rpi());
        let quote = Arc::new(SimpleQuote::new(0.03));
        let result = PiecewiseZeroInflation::new(
            date(2023, 6, 1),
            conventions(),
            index.clone(),
            vec![zc_helper(&quote, date(2025, 6, 1), &index)],
            Thirty360,
            LogLinear,
            BootstrapConfig::default(),
        );
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Evaluation(_)));
        assert!(err.to_string().contains("UKRPI"), "{err}");
    }

    #[test]
    fn yoy_curve_reprices_swaps() {
        let rpi = rpi_with_base_fixing();
        let index = Arc::new(YoYInflationIndex::ratio((*rpi).clone()));
        let start = date(2023, 6, 1);
        let nominal = RelinkableHandle::<dyn YieldTermStructure>::null();
        nominal.link_to(Arc::new(FlatForward::continuous(start, 0.04, Actual365Fixed)));

        let helper = |rate: Real, years: i32| -> Arc<dyn YoYInflationHelper> {
            Arc::new(
                YearOnYearInflationSwapHelper::new(
                    Handle::from_arc(Arc::new(SimpleQuote::new(rate)) as Arc<dyn Quote>),
                    conventions(),
                    start,
                    start.advance(years, TimeUnit::Years).unwrap(),
                    &NullCalendar,
                    BusinessDayConvention::Unadjusted,
                    Actual365Fixed,
                    index.clone(),
                    nominal.clone(),
                )
                .unwrap(),
            )
        };
        let helpers = vec![helper(0.03, 1), helper(0.029, 2), helper(0.0285, 3)];
        let curve = PiecewiseYoYInflation::new(
            start,
            conventions(),
            index.clone(),
            helpers,
            Actual365Fixed,
            Linear,
            BootstrapConfig::default(),
        )
        .unwrap();

        // seed is I(2023-03) / I(2022-03) - 1
        assert_abs_diff_eq!(curve.data().unwrap()[0], 0.125, epsilon = 1e-12);
        for helper in curve.helpers() {
            let implied = helper.implied_quote(&*curve).unwrap();
            assert_abs_diff_eq!(implied, helper.quote().unwrap(), epsilon = 1e-8);
        }
        assert_abs_diff_eq!(curve.yoy_rate(date(2024, 3, 1)).unwrap(), 0.03, epsilon = 1e-8);
        assert!(curve.report().unwrap().max_residual() < 1e-8);
    }

    #[test]
    fn view_refuses_observations_past_the_pivot() {
        let mut nodes =
            InterpolatedCurve::<ZeroInflation>::new(date(2023, 3, 1), 360.0, Arc::new(Linear));
        nodes.add_node(date(2025, 3, 1), 2.0, 380.0).unwrap();
        let conventions = conventions();
        let dc: Arc<dyn DayCounter> = Arc::new(Thirty360);
        let view = InflationCurveView {
            nodes: &nodes,
            reference_date: date(2023, 6, 1),
            base_date: date(2023, 3, 1),
            conventions: &conventions,
            day_counter: &dc,
        };
        assert_abs_diff_eq!(view.index_level(date(2025, 3, 1)).unwrap(), 380.0, epsilon = 1e-12);
        assert!(matches!(view.index_level(date(2025, 4, 1)), Err(Error::Evaluation(_))));
        assert!(matches!(view.index_level(date(2023, 2, 1)), Err(Error::Evaluation(_))));
    }
}
