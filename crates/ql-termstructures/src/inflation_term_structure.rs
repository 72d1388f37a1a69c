//! Inflation term structures.
//!
//! Inflation curves are quoted on *observation* dates: a contract paying on
//! date `d` observes the index at `d - lag`, snapped to the start of its
//! inflation period when the index is not interpolated.  Curve time runs
//! from the **base date**, the observation date of the reference date, so
//! the first node sits at `t = 0` with the last published fixing.
//!
//! * [`ZeroInflationTermStructure`]: index levels, ratios and zero rates.
//! * [`YoYInflationTermStructure`]: year-on-year rates.
//! * [`FlatZeroInflationCurve`], [`FlatYoYInflationCurve`]: constant-rate
//!   curves for forecasting and tests.

use crate::term_structure::{Extrapolation, TermStructure};
use ql_core::errors::{Error, Result};
use ql_core::{Rate, Real, Time};
use ql_time::{inflation_period, Date, DayCounter, Frequency, Period};
use std::sync::Arc;

/// Time step used for the zero rate at the base date.
const DT: Time = 1.0e-4;

// ── Conventions ───────────────────────────────────────────────────────────────

/// Observation conventions shared by an inflation curve and its helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflationConventions {
    /// Delay between a payment date and the index observation it uses.
    pub observation_lag: Period,
    /// Publication frequency of the index.
    pub frequency: Frequency,
    /// Whether observations interpolate inside an inflation period.
    pub interpolated: bool,
}

impl InflationConventions {
    /// Bundle observation conventions.
    pub fn new(observation_lag: Period, frequency: Frequency, interpolated: bool) -> Self {
        Self {
            observation_lag,
            frequency,
            interpolated,
        }
    }

    /// The index observation date for a payment on `date`.
    pub fn observation_date(&self, date: Date) -> Result<Date> {
        let lagged = date.sub_period(self.observation_lag)?;
        self.snap(lagged)
    }

    /// `date` itself for interpolated indexes, else the start of its period.
    pub fn snap(&self, date: Date) -> Result<Date> {
        if self.interpolated {
            Ok(date)
        } else {
            Ok(inflation_period(date, self.frequency)?.0)
        }
    }
}

/// Range check shared by inflation curves: observation dates run from the
/// base date to the max date.
pub(crate) fn check_observation_range(
    base_date: Date,
    max_date: Date,
    extrapolation: Extrapolation,
    date: Date,
) -> Result<()> {
    if date < base_date {
        return Err(Error::Extrapolation(format!(
            "{date} is before the inflation base date {base_date}"
        )));
    }
    if date > max_date && !extrapolation.is_allowed() {
        return Err(Error::Extrapolation(format!(
            "{date} is past the max curve date {max_date}"
        )));
    }
    Ok(())
}

// ── Base trait ────────────────────────────────────────────────────────────────

/// Common interface for inflation term structures.
///
/// Implementors override [`TermStructure::check_range`] so that observation
/// dates from [`base_date`](Self::base_date) onwards are accepted.
pub trait InflationTermStructure: TermStructure {
    /// Observation conventions.
    fn conventions(&self) -> &InflationConventions;

    /// Date of the first node: the observation date of the reference date.
    fn base_date(&self) -> Date;

    /// Index publication frequency.
    fn frequency(&self) -> Frequency {
        self.conventions().frequency
    }

    /// Observation lag.
    fn observation_lag(&self) -> Period {
        self.conventions().observation_lag
    }

    /// Whether the index interpolates inside a period.
    fn index_is_interpolated(&self) -> bool {
        self.conventions().interpolated
    }

    /// Year fraction from the base date to `date`.
    fn time_from_base(&self, date: Date) -> Time {
        self.day_counter().year_fraction(self.base_date(), date)
    }
}

// ── Zero-inflation ────────────────────────────────────────────────────────────

/// A price-index curve.
pub trait ZeroInflationTermStructure: InflationTermStructure {
    /// Index level at time `t` from the base date, without range checks.
    fn index_level_impl(&self, t: Time) -> Result<Real>;

    /// Forecast index level observed at `date`.
    fn index_level(&self, date: Date) -> Result<Real> {
        let date = self.conventions().snap(date)?;
        self.check_range(date)?;
        self.index_level_impl(self.time_from_base(date))
    }

    /// Index level at `date` over the base level.
    fn index_ratio(&self, date: Date) -> Result<Real> {
        Ok(self.index_level(date)? / self.index_level_impl(0.0)?)
    }

    /// Annually compounded zero-coupon inflation rate from the base date to
    /// `date`.
    fn zero_rate(&self, date: Date) -> Result<Rate> {
        let date = self.conventions().snap(date)?;
        self.check_range(date)?;
        let t = self.time_from_base(date).max(DT);
        let ratio = self.index_level_impl(t)? / self.index_level_impl(0.0)?;
        Ok(ratio.powf(1.0 / t) - 1.0)
    }
}

// ── YoY-inflation ─────────────────────────────────────────────────────────────

/// A year-on-year inflation curve.
pub trait YoYInflationTermStructure: InflationTermStructure {
    /// Year-on-year rate at time `t` from the base date, without range checks.
    fn yoy_rate_impl(&self, t: Time) -> Result<Rate>;

    /// Forecast year-on-year rate observed at `date`.
    fn yoy_rate(&self, date: Date) -> Result<Rate> {
        let date = self.conventions().snap(date)?;
        self.check_range(date)?;
        self.yoy_rate_impl(self.time_from_base(date))
    }
}

// ── Flat curves ───────────────────────────────────────────────────────────────

/// Index levels growing at a constant annual rate from a base fixing.
#[derive(Debug)]
pub struct FlatZeroInflationCurve {
    reference_date: Date,
    base_date: Date,
    base_level: Real,
    rate: Rate,
    day_counter: Arc<dyn DayCounter>,
    conventions: InflationConventions,
}

impl FlatZeroInflationCurve {
    /// Create a flat zero-inflation curve.
    pub fn new(
        reference_date: Date,
        base_level: Real,
        rate: Rate,
        day_counter: impl DayCounter + 'static,
        conventions: InflationConventions,
    ) -> Result<Self> {
        if !(base_level > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "base index level must be positive, got {base_level}"
            )));
        }
        Ok(Self {
            reference_date,
            base_date: conventions.observation_date(reference_date)?,
            base_level,
            rate,
            day_counter: Arc::new(day_counter),
            conventions,
        })
    }
}

impl TermStructure for FlatZeroInflationCurve {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_counter(&self) -> Arc<dyn DayCounter> {
        self.day_counter.clone()
    }

    fn max_date(&self) -> Date {
        Date::MAX
    }

    fn extrapolation(&self) -> Extrapolation {
        Extrapolation::Allowed
    }

    fn check_range(&self, date: Date) -> Result<()> {
        check_observation_range(self.base_date, self.max_date(), self.extrapolation(), date)
    }
}

impl InflationTermStructure for FlatZeroInflationCurve {
    fn conventions(&self) -> &InflationConventions {
        &self.conventions
    }

    fn base_date(&self) -> Date {
        self.base_date
    }
}

impl ZeroInflationTermStructure for FlatZeroInflationCurve {
    fn index_level_impl(&self, t: Time) -> Result<Real> {
        Ok(self.base_level * (1.0 + self.rate).powf(t))
    }
}

/// A constant year-on-year rate.
#[derive(Debug)]
pub struct FlatYoYInflationCurve {
    reference_date: Date,
    base_date: Date,
    rate: Rate,
    day_counter: Arc<dyn DayCounter>,
    conventions: InflationConventions,
}

impl FlatYoYInflationCurve {
    /// Create a flat YoY inflation curve.
    pub fn new(
        reference_date: Date,
        rate: Rate,
        day_counter: impl DayCounter + 'static,
        conventions: InflationConventions,
    ) -> Result<Self> {
        Ok(Self {
            reference_date,
            base_date: conventions.observation_date(reference_date)?,
            rate,
            day_counter: Arc::new(day_counter),
            conventions,
        })
    }
}

impl TermStructure for FlatYoYInflationCurve {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_counter(&self) -> Arc<dyn DayCounter> {
        self.day_counter.clone()
    }

    fn max_date(&self) -> Date {
        Date::MAX
    }

    fn extrapolation(&self) -> Extrapolation {
        Extrapolation::Allowed
    }

    fn check_range(&self, date: Date) -> Result<()> {
        check_observation_range(self.base_date, self.max_date(), self.extrapolation(), date)
    }
}

impl InflationTermStructure for FlatYoYInflationCurve {
    fn conventions(&self) -> &InflationConventions {
        &self.conventions
    }

    fn base_date(&self) -> Date {
        self.base_date
    }
}

impl YoYInflationTermStructure for FlatYoYInflationCurve {
    fn yoy_rate_impl(&self, _t: Time) -> Result<Rate> {
        Ok(self.rate)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_time::{Actual365Fixed, Thirty360, TimeUnit};

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn monthly(lag_months: i32, interpolated: bool) -> InflationConventions {
        let lag = Period::new(lag_months, TimeUnit::Months);
        InflationConventions::new(lag, Frequency::Monthly, interpolated)
    }

    #[test]
    fn observation_dates_snap_to_period_start() {
        let conventions = monthly(3, false);
        assert_eq!(conventions.observation_date(date(2022, 8, 17)).unwrap(), date(2022, 5, 1));
        let interpolated = monthly(3, true);
        assert_eq!(interpolated.observation_date(date(2022, 8, 17)).unwrap(), date(2022, 5, 17));
    }

    #[test]
    fn flat_zero_inflation_curve() {
        let conventions = monthly(3, false);
        let curve =
            FlatZeroInflationCurve::new(date(2024, 6, 1), 300.0, 0.025, Thirty360, conventions)
                .unwrap();
        assert_eq!(curve.base_date(), date(2024, 3, 1));
        assert_eq!(curve.frequency(), Frequency::Monthly);
        assert!(!curve.index_is_interpolated());
        let d = date(2027, 3, 20);
        assert_abs_diff_eq!(curve.index_ratio(d).unwrap(), 1.025_f64.powi(3), epsilon = 1e-12);
        assert_abs_diff_eq!(curve.zero_rate(d).unwrap(), 0.025, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.index_level(date(2024, 3, 1)).unwrap(), 300.0, epsilon = 1e-12);
    }

    #[test]
    fn observations_before_base_are_rejected() {
        let today = date(2024, 6, 1);
        let conventions = monthly(3, false);
        let curve =
            FlatZeroInflationCurve::new(today, 300.0, 0.02, Actual365Fixed, conventions).unwrap();
        assert!(matches!(curve.index_level(date(2024, 2, 29)), Err(Error::Extrapolation(_))));
        let no_level = FlatZeroInflationCurve::new(today, 0.0, 0.02, Actual365Fixed, conventions);
        assert!(no_level.is_err());
    }

    #[test]
    fn flat_yoy_inflation_curve() {
        let curve =
            FlatYoYInflationCurve::new(date(2024, 1, 1), 0.03, Actual365Fixed, monthly(2, false))
                .unwrap();
        assert_eq!(curve.base_date(), date(2023, 11, 1));
        assert_abs_diff_eq!(curve.yoy_rate(date(2026, 6, 15)).unwrap(), 0.03, epsilon = 1e-15);
    }
}
