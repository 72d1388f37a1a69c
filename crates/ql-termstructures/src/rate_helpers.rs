//! Rate helpers for yield-curve bootstrapping.
//!
//! A *rate helper* pairs a market quote (deposit rate, FRA rate, futures
//! price, par swap rate) with the conventions needed to reprice it off a
//! discount curve.  Each helper constrains the curve at its *pillar date*,
//! the last date its valuation reads.
//!
//! Helpers hold their quote through a [`Handle`], so the caller can move the
//! quote after the curve is built and the curve rebuilds.

use crate::bootstrap_helper::{CalibratingHelper, RateHelper};
use crate::yield_term_structure::YieldTermStructure;
use ql_core::errors::{Error, Result};
use ql_core::{Handle, Real};
use ql_quotes::Quote;
use ql_time::{
    BusinessDayConvention, Calendar, Date, DateGeneration, DayCounter, Frequency, Period, Schedule,
    ScheduleBuilder, TimeUnit,
};
use std::sync::Arc;

/// Simple forward rate over `[start, end]` implied by `curve`.
fn simple_forward(
    curve: &dyn YieldTermStructure,
    start: Date,
    end: Date,
    accrual: Real,
) -> Result<Real> {
    let df_start = curve.discount(start)?;
    let df_end = curve.discount(end)?;
    Ok((df_start / df_end - 1.0) / accrual)
}

fn accrual_period(day_counter: &dyn DayCounter, start: Date, end: Date) -> Result<Real> {
    let tau = day_counter.year_fraction(start, end);
    if tau > 0.0 {
        Ok(tau)
    } else {
        Err(Error::InvalidArgument(format!(
            "empty accrual period from {start} to {end} under {}",
            day_counter.name()
        )))
    }
}

// ── DepositRateHelper ─────────────────────────────────────────────────────────

/// A deposit (money-market) rate helper.
///
/// The implied quote is the simple rate over `[settlement, maturity]`.
#[derive(Debug)]
pub struct DepositRateHelper {
    quote: Handle<dyn Quote>,
    settlement_date: Date,
    maturity_date: Date,
    accrual: Real,
    day_counter: Arc<dyn DayCounter>,
}

impl DepositRateHelper {
    /// Create a deposit rate helper from explicit settlement and maturity dates.
    pub fn new(
        quote: Handle<dyn Quote>,
        settlement_date: Date,
        maturity_date: Date,
        day_counter: impl DayCounter + 'static,
    ) -> Result<Self> {
        let accrual = accrual_period(&day_counter, settlement_date, maturity_date)?;
        Ok(Self {
            quote,
            settlement_date,
            maturity_date,
            accrual,
            day_counter: Arc::new(day_counter),
        })
    }

    /// Create a deposit rate helper from a tenor and conventions.
    ///
    /// `fixing_days` business days after the reference date gives the
    /// settlement date; advancing by `tenor` gives the maturity.
    #[allow(clippy::too_many_arguments)]
    pub fn from_tenor(
        quote: Handle<dyn Quote>,
        tenor: Period,
        fixing_days: u32,
        calendar: &dyn Calendar,
        convention: BusinessDayConvention,
        end_of_month: bool,
        day_counter: impl DayCounter + 'static,
        reference_date: Date,
    ) -> Result<Self> {
        let settlement = calendar.advance_business_days(reference_date, fixing_days as i32)?;
        let maturity = calendar.advance(settlement, tenor, convention, end_of_month)?;
        Self::new(quote, settlement, maturity, day_counter)
    }

    /// The settlement date of the deposit.
    pub fn settlement_date(&self) -> Date {
        self.settlement_date
    }

    /// The maturity date of the deposit.
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }

    /// The deposit's day counter.
    pub fn day_counter(&self) -> &dyn DayCounter {
        self.day_counter.as_ref()
    }
}

impl CalibratingHelper for DepositRateHelper {
    fn pillar_date(&self) -> Date {
        self.maturity_date
    }

    fn quote_handle(&self) -> &Handle<dyn Quote> {
        &self.quote
    }
}

impl RateHelper for DepositRateHelper {
    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Result<Real> {
        simple_forward(curve, self.settlement_date, self.maturity_date, self.accrual)
    }
}

// ── FraRateHelper ─────────────────────────────────────────────────────────────

/// A forward-rate-agreement (FRA) rate helper.
///
/// The implied quote is the simple forward rate between the FRA's value
/// date and maturity.
#[derive(Debug)]
pub struct FraRateHelper {
    quote: Handle<dyn Quote>,
    value_date: Date,
    maturity_date: Date,
    accrual: Real,
}

impl FraRateHelper {
    /// Create a FRA rate helper from explicit value and maturity dates.
    pub fn new(
        quote: Handle<dyn Quote>,
        value_date: Date,
        maturity_date: Date,
        day_counter: impl DayCounter + 'static,
    ) -> Result<Self> {
        let accrual = accrual_period(&day_counter, value_date, maturity_date)?;
        Ok(Self {
            quote,
            value_date,
            maturity_date,
            accrual,
        })
    }

    /// Create a FRA rate helper from month offsets.
    ///
    /// `months_to_start` and `months_to_end` are counted from the settlement
    /// date (`fixing_days` business days after the reference date).
    #[allow(clippy::too_many_arguments)]
    pub fn from_months(
        quote: Handle<dyn Quote>,
        months_to_start: u32,
        months_to_end: u32,
        fixing_days: u32,
        calendar: &dyn Calendar,
        convention: BusinessDayConvention,
        day_counter: impl DayCounter + 'static,
        reference_date: Date,
    ) -> Result<Self> {
        if months_to_end <= months_to_start {
            return Err(Error::InvalidArgument(format!(
                "FRA {months_to_start}x{months_to_end} ends before it starts"
            )));
        }
        let settlement = calendar.advance_business_days(reference_date, fixing_days as i32)?;
        let start = Period::new(months_to_start as i32, TimeUnit::Months);
        let end = Period::new(months_to_end as i32, TimeUnit::Months);
        let value_date = calendar.advance(settlement, start, convention, false)?;
        let maturity_date = calendar.advance(settlement, end, convention, false)?;
        Self::new(quote, value_date, maturity_date, day_counter)
    }

    /// The FRA value (start) date.
    pub fn value_date(&self) -> Date {
        self.value_date
    }

    /// The FRA maturity (end) date.
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }
}

impl CalibratingHelper for FraRateHelper {
    fn pillar_date(&self) -> Date {
        self.maturity_date
    }

    fn quote_handle(&self) -> &Handle<dyn Quote> {
        &self.quote
    }
}

impl RateHelper for FraRateHelper {
    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Result<Real> {
        simple_forward(curve, self.value_date, self.maturity_date, self.accrual)
    }
}

// ── FuturesRateHelper ─────────────────────────────────────────────────────────

/// An interest-rate-futures helper (Euribor, SOFR 3M, ...).
///
/// Quoted as a price, `100 * (1 - rate)`.  The futures rate exceeds the
/// forward rate by the convexity adjustment, so the implied price is
/// `100 * (1 - forward - convexity)`.
#[derive(Debug)]
pub struct FuturesRateHelper {
    quote: Handle<dyn Quote>,
    value_date: Date,
    maturity_date: Date,
    accrual: Real,
    convexity_adjustment: Real,
}

impl FuturesRateHelper {
    /// Create a futures helper over an explicit accrual period.
    pub fn new(
        price: Handle<dyn Quote>,
        value_date: Date,
        maturity_date: Date,
        day_counter: impl DayCounter + 'static,
        convexity_adjustment: Real,
    ) -> Result<Self> {
        let accrual = accrual_period(&day_counter, value_date, maturity_date)?;
        Ok(Self {
            quote: price,
            value_date,
            maturity_date,
            accrual,
            convexity_adjustment,
        })
    }

    /// Create a futures helper whose contract runs `length_months` from
    /// `value_date`.
    pub fn from_months(
        price: Handle<dyn Quote>,
        value_date: Date,
        length_months: u32,
        calendar: &dyn Calendar,
        convention: BusinessDayConvention,
        day_counter: impl DayCounter + 'static,
        convexity_adjustment: Real,
    ) -> Result<Self> {
        let length = Period::new(length_months as i32, TimeUnit::Months);
        let maturity_date = calendar.advance(value_date, length, convention, false)?;
        Self::new(price, value_date, maturity_date, day_counter, convexity_adjustment)
    }

    /// The convexity adjustment.
    pub fn convexity_adjustment(&self) -> Real {
        self.convexity_adjustment
    }

    /// Start of the underlying deposit.
    pub fn value_date(&self) -> Date {
        self.value_date
    }
}

impl CalibratingHelper for FuturesRateHelper {
    fn pillar_date(&self) -> Date {
        self.maturity_date
    }

    fn quote_handle(&self) -> &Handle<dyn Quote> {
        &self.quote
    }
}

impl RateHelper for FuturesRateHelper {
    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Result<Real> {
        let forward = simple_forward(curve, self.value_date, self.maturity_date, self.accrual)?;
        Ok(100.0 * (1.0 - forward - self.convexity_adjustment))
    }
}

// ── SwapRateHelper ────────────────────────────────────────────────────────────

/// A par-swap rate helper.
///
/// The implied quote is the par rate of a swap whose floating leg is worth
/// par on the same curve: `(P(start) - P(end)) / annuity`, the annuity
/// summing accrual times discount over the fixed-leg schedule.
#[derive(Debug)]
pub struct SwapRateHelper {
    quote: Handle<dyn Quote>,
    start_date: Date,
    end_date: Date,
    /// `(payment date, accrual)` per fixed coupon.
    fixed_coupons: Vec<(Date, Real)>,
}

impl SwapRateHelper {
    /// Create a swap-rate helper from an already-built fixed-leg schedule.
    pub fn new(
        quote: Handle<dyn Quote>,
        fixed_schedule: &Schedule,
        fixed_day_counter: impl DayCounter + 'static,
    ) -> Result<Self> {
        let (Some(start_date), Some(end_date)) =
            (fixed_schedule.start_date(), fixed_schedule.end_date())
        else {
            return Err(Error::InvalidArgument("empty fixed-leg schedule".into()));
        };
        let fixed_coupons = fixed_schedule
            .periods()
            .map(|(start, end)| Ok((end, accrual_period(&fixed_day_counter, start, end)?)))
            .collect::<Result<Vec<_>>>()?;
        if fixed_coupons.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "fixed-leg schedule from {start_date} to {end_date} has no coupons"
            )));
        }
        Ok(Self {
            quote,
            start_date,
            end_date,
            fixed_coupons,
        })
    }

    /// Create a swap-rate helper from conventions.
    ///
    /// The swap starts `fixing_days` business days after the reference date
    /// and pays fixed coupons at `fixed_frequency` until `swap_tenor` later.
    #[allow(clippy::too_many_arguments)]
    pub fn from_conventions(
        quote: Handle<dyn Quote>,
        swap_tenor: Period,
        calendar: &dyn Calendar,
        fixed_frequency: Frequency,
        fixed_convention: BusinessDayConvention,
        fixed_day_counter: impl DayCounter + 'static,
        reference_date: Date,
        fixing_days: u32,
    ) -> Result<Self> {
        let settlement = calendar.advance_business_days(reference_date, fixing_days as i32)?;
        let maturity = calendar.advance(settlement, swap_tenor, fixed_convention, false)?;
        let tenor = Period::from_frequency(fixed_frequency)?;
        let fixed_schedule = ScheduleBuilder::new(settlement, maturity, tenor, calendar)
            .with_convention(fixed_convention)
            .with_termination_convention(fixed_convention)
            .with_rule(DateGeneration::Forward)
            .build()?;
        Self::new(quote, &fixed_schedule, fixed_day_counter)
    }

    /// Start of the swap.
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Fixed coupon payment dates.
    pub fn payment_dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.fixed_coupons.iter().map(|&(d, _)| d)
    }
}

impl CalibratingHelper for SwapRateHelper {
    fn pillar_date(&self) -> Date {
        self.end_date
    }

    fn quote_handle(&self) -> &Handle<dyn Quote> {
        &self.quote
    }
}

impl RateHelper for SwapRateHelper {
    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Result<Real> {
        let mut annuity = 0.0;
        for &(date, accrual) in &self.fixed_coupons {
            annuity += accrual * curve.discount(date)?;
        }
        Ok((curve.discount(self.start_date)? - curve.discount(self.end_date)?) / annuity)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat_forward::FlatForward;
    use approx::assert_abs_diff_eq;
    use ql_quotes::SimpleQuote;
    use ql_time::{Actual360, NullCalendar, Target, Thirty360};

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn quote(value: Real) -> Handle<dyn Quote> {
        Handle::from_arc(Arc::new(SimpleQuote::new(value)) as Arc<dyn Quote>)
    }

    #[test]
    fn deposit_helper_implied_rate_on_flat_curve() {
        let ref_date = date(2025, 1, 2);
        let mat = date(2025, 4, 2);
        let curve = FlatForward::continuous(ref_date, 0.05, Actual360);

        let helper = DepositRateHelper::new(quote(0.0), ref_date, mat, Actual360).unwrap();
        let implied = helper.implied_quote(&curve).unwrap();

        let tau = Actual360.year_fraction(ref_date, mat);
        let expected = ((0.05 * tau).exp() - 1.0) / tau;
        assert_abs_diff_eq!(implied, expected, epsilon = 1e-12);
        assert_eq!(helper.pillar_date(), mat);
    }

    #[test]
    fn deposit_helper_from_tenor_rolls_dates() {
        // Friday 2025-01-03 + 2 business days = Tuesday 2025-01-07
        let helper = DepositRateHelper::from_tenor(
            quote(0.04),
            Period::new(3, TimeUnit::Months),
            2,
            &Target,
            BusinessDayConvention::ModifiedFollowing,
            false,
            Actual360,
            date(2025, 1, 3),
        )
        .unwrap();
        assert_eq!(helper.settlement_date(), date(2025, 1, 7));
        assert_eq!(helper.maturity_date(), date(2025, 4, 7));
        assert_eq!(helper.quote().unwrap(), 0.04);
    }

    #[test]
    fn empty_deposit_is_rejected() {
        let d = date(2025, 1, 2);
        assert!(matches!(
            DepositRateHelper::new(quote(0.04), d, d, Actual360),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn fra_helper_implied_rate_on_flat_curve() {
        let ref_date = date(2025, 1, 2);
        let curve = FlatForward::continuous(ref_date, 0.03, Actual360);
        let helper = FraRateHelper::from_months(
            quote(0.0),
            3,
            6,
            0,
            &NullCalendar,
            BusinessDayConvention::Following,
            Actual360,
            ref_date,
        )
        .unwrap();
        assert_eq!(helper.value_date(), date(2025, 4, 2));
        assert_eq!(helper.maturity_date(), date(2025, 7, 2));

        let tau = Actual360.year_fraction(helper.value_date(), helper.maturity_date());
        let expected = ((0.03 * tau).exp() - 1.0) / tau;
        assert_abs_diff_eq!(helper.implied_quote(&curve).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn futures_price_includes_convexity() {
        let value = date(2025, 3, 19);
        let curve = FlatForward::continuous(date(2025, 1, 2), 0.04, Actual360);
        let helper = FuturesRateHelper::from_months(
            quote(96.0),
            value,
            3,
            &Target,
            BusinessDayConvention::ModifiedFollowing,
            Actual360,
            0.001,
        )
        .unwrap();
        assert_eq!(helper.pillar_date(), date(2025, 6, 19));
        let tau = Actual360.year_fraction(value, helper.pillar_date());
        let forward = ((0.04 * tau).exp() - 1.0) / tau;
        assert_abs_diff_eq!(
            helper.implied_quote(&curve).unwrap(),
            100.0 * (1.0 - forward - 0.001),
            epsilon = 1e-10
        );
    }

    #[test]
    fn swap_helper_par_rate_on_flat_curve() {
        let ref_date = date(2025, 1, 2);
        let helper = SwapRateHelper::from_conventions(
            quote(0.04),
            Period::new(5, TimeUnit::Years),
            &NullCalendar,
            Frequency::Annual,
            BusinessDayConvention::Unadjusted,
            Thirty360,
            ref_date,
            0,
        )
        .unwrap();
        assert_eq!(helper.pillar_date(), date(2030, 1, 2));
        assert_eq!(helper.payment_dates().count(), 5);

        // annual 30/360 coupons on an annually compounded flat curve price at par
        let curve = FlatForward::new(
            ref_date,
            0.04,
            Thirty360,
            ql_core::Compounding::Compounded,
            Frequency::Annual,
        )
        .unwrap();
        assert_abs_diff_eq!(helper.implied_quote(&curve).unwrap(), 0.04, epsilon = 1e-12);
    }

    #[test]
    fn unset_quote_is_invalid() {
        let helper = DepositRateHelper::new(
            Handle::from_arc(Arc::new(SimpleQuote::empty()) as Arc<dyn Quote>),
            date(2025, 1, 2),
            date(2025, 2, 3),
            Actual360,
        )
        .unwrap();
        assert!(matches!(helper.quote(), Err(Error::InvalidQuote(_))));
        let empty =
            DepositRateHelper::new(Handle::null(), date(2025, 1, 2), date(2025, 2, 3), Actual360)
                .unwrap();
        assert!(matches!(empty.quote(), Err(Error::InvalidQuote(_))));
    }
}
