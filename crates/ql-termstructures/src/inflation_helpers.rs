//! Inflation swap helpers.
//!
//! Both helpers are quoted as fixed rates and constrain the curve at the
//! observation date of their last payment, not at the payment itself.
//! Index observations already published are read from the index's
//! fixings; only later observations are forecast off the curve.

use crate::bootstrap_helper::{CalibratingHelper, YoYInflationHelper, ZeroInflationHelper};
use crate::inflation_term_structure::{
    InflationConventions, YoYInflationTermStructure, ZeroInflationTermStructure,
};
use crate::yield_term_structure::YieldTermStructure;
use ql_core::errors::{Error, Result};
use ql_core::{Handle, RelinkableHandle, Real, Time};
use ql_indexes::{Index, YoYInflationIndex, ZeroInflationIndex};
use ql_quotes::Quote;
use ql_time::{
    BusinessDayConvention, Calendar, Date, DateGeneration, DayCounter, Period, ScheduleBuilder,
    TimeUnit,
};
use std::sync::Arc;

// ── ZeroCouponInflationSwapHelper ─────────────────────────────────────────────

/// A zero-coupon inflation swap quoted as its fixed rate `K`.
///
/// At maturity the swap exchanges `(1 + K)^T - 1` against
/// `I(end) / I(base) - 1`, with `T` the year fraction between the two
/// observation dates, so the implied quote is `(I(end) / I(base))^(1/T) - 1`.
#[derive(Debug)]
pub struct ZeroCouponInflationSwapHelper {
    quote: Handle<dyn Quote>,
    conventions: InflationConventions,
    maturity: Date,
    base_date: Date,
    observation_date: Date,
    accrual: Time,
    index: Arc<ZeroInflationIndex>,
}

impl ZeroCouponInflationSwapHelper {
    /// Create a helper for a swap starting on `start_date` and paying on
    /// `maturity`.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if the observation window is empty.
    pub fn new(
        quote: Handle<dyn Quote>,
        conventions: InflationConventions,
        start_date: Date,
        maturity: Date,
        index: Arc<ZeroInflationIndex>,
        day_counter: impl DayCounter,
    ) -> Result<Self> {
        let base_date = conventions.observation_date(start_date)?;
        let observation_date = conventions.observation_date(maturity)?;
        let accrual = day_counter.year_fraction(base_date, observation_date);
        if !(accrual > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "{} swap maturing {maturity} observes {observation_date}, \
                 not after its base {base_date}",
                index.name()
            )));
        }
        Ok(Self {
            quote,
            conventions,
            maturity,
            base_date,
            observation_date,
            accrual,
            index,
        })
    }

    /// Create a helper maturing `tenor` after `start_date`, adjusted on
    /// `calendar`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_tenor(
        quote: Handle<dyn Quote>,
        conventions: InflationConventions,
        start_date: Date,
        tenor: Period,
        calendar: &dyn Calendar,
        convention: BusinessDayConvention,
        index: Arc<ZeroInflationIndex>,
        day_counter: impl DayCounter,
    ) -> Result<Self> {
        let maturity = calendar.advance(start_date, tenor, convention, false)?;
        Self::new(quote, conventions, start_date, maturity, index, day_counter)
    }

    /// Payment date.
    pub fn maturity_date(&self) -> Date {
        self.maturity
    }

    /// Observation date of the base index level.
    pub fn base_date(&self) -> Date {
        self.base_date
    }

    /// Observation conventions.
    pub fn conventions(&self) -> &InflationConventions {
        &self.conventions
    }

    fn index_level(&self, curve: &dyn ZeroInflationTermStructure, date: Date) -> Result<Real> {
        match self.index.past_fixing(date)? {
            Some(fixing) => Ok(fixing),
            None => curve.index_level(date),
        }
    }
}

impl CalibratingHelper for ZeroCouponInflationSwapHelper {
    fn pillar_date(&self) -> Date {
        self.observation_date
    }

    fn quote_handle(&self) -> &Handle<dyn Quote> {
        &self.quote
    }
}

impl ZeroInflationHelper for ZeroCouponInflationSwapHelper {
    fn implied_quote(&self, curve: &dyn ZeroInflationTermStructure) -> Result<Real> {
        let base = self.index_level(curve, self.base_date)?;
        let end = self.index_level(curve, self.observation_date)?;
        Ok((end / base).powf(1.0 / self.accrual) - 1.0)
    }
}

// ── YearOnYearInflationSwapHelper ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct YoYCoupon {
    payment: Date,
    observation: Date,
    accrual: Real,
}

/// A year-on-year inflation swap quoted as its fixed rate.
///
/// Each annual coupon pays the year-on-year rate observed at its lagged
/// payment date against the fixed rate, so the par rate is the
/// annuity-weighted average of the forecast YoY rates.  Discounting uses a
/// nominal curve that must be linked before the curve is built.
#[derive(Debug)]
pub struct YearOnYearInflationSwapHelper {
    quote: Handle<dyn Quote>,
    conventions: InflationConventions,
    coupons: Vec<YoYCoupon>,
    index: Arc<YoYInflationIndex>,
    nominal: RelinkableHandle<dyn YieldTermStructure>,
}

impl YearOnYearInflationSwapHelper {
    /// Create a helper with annual coupons from `start_date` to `maturity`.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if the schedule has no coupons or a coupon
    /// has an empty accrual period.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        quote: Handle<dyn Quote>,
        conventions: InflationConventions,
        start_date: Date,
        maturity: Date,
        calendar: &dyn Calendar,
        convention: BusinessDayConvention,
        day_counter: impl DayCounter,
        index: Arc<YoYInflationIndex>,
        nominal: RelinkableHandle<dyn YieldTermStructure>,
    ) -> Result<Self> {
        let annual = Period::new(1, TimeUnit::Years);
        let schedule = ScheduleBuilder::new(start_date, maturity, annual, calendar)
            .with_convention(convention)
            .with_termination_convention(convention)
            .with_rule(DateGeneration::Forward)
            .build()?;
        let coupons = schedule
            .periods()
            .map(|(start, end)| {
                let accrual = day_counter.year_fraction(start, end);
                if !(accrual > 0.0) {
                    return Err(Error::InvalidArgument(format!(
                        "empty YoY coupon from {start} to {end}"
                    )));
                }
                Ok(YoYCoupon {
                    payment: end,
                    observation: conventions.observation_date(end)?,
                    accrual,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if coupons.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "YoY swap from {start_date} to {maturity} has no coupons"
            )));
        }
        Ok(Self {
            quote,
            conventions,
            coupons,
            index,
            nominal,
        })
    }

    /// Coupon payment dates.
    pub fn payment_dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.coupons.iter().map(|c| c.payment)
    }

    /// Observation conventions.
    pub fn conventions(&self) -> &InflationConventions {
        &self.conventions
    }

    fn yoy_rate(&self, curve: &dyn YoYInflationTermStructure, date: Date) -> Result<Real> {
        match self.index.past_fixing(date)? {
            Some(fixing) => Ok(fixing),
            None => curve.yoy_rate(date),
        }
    }
}

impl CalibratingHelper for YearOnYearInflationSwapHelper {
    fn pillar_date(&self) -> Date {
        self.coupons
            .last()
            .map_or(Date::MIN, |coupon| coupon.observation)
    }

    fn quote_handle(&self) -> &Handle<dyn Quote> {
        &self.quote
    }
}

impl YoYInflationHelper for YearOnYearInflationSwapHelper {
    fn implied_quote(&self, curve: &dyn YoYInflationTermStructure) -> Result<Real> {
        let nominal = self.nominal.handle();
        let nominal = nominal.get().ok_or_else(|| {
            Error::Evaluation(format!("no nominal curve linked for {}", self.index.name()))
        })?;
        let mut floating = 0.0;
        let mut annuity = 0.0;
        for coupon in &self.coupons {
            let weight = coupon.accrual * nominal.discount(coupon.payment)?;
            floating += weight * self.yoy_rate(curve, coupon.observation)?;
            annuity += weight;
        }
        Ok(floating / annuity)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
