//! `InterestRate`: a rate value with its compounding and day-count
//! conventions.
//!
//! Curves quote zero and forward rates as `InterestRate`s, and rate helpers
//! use them to turn a quoted rate into a compound factor.

use crate::date::Date;
use crate::day_counter::DayCounter;
use crate::frequency::Frequency;
use ql_core::errors::{Error, Result};
use ql_core::{Compounding, Real, Time};
use std::sync::Arc;

/// An interest rate with associated compounding and day-counting conventions.
#[derive(Debug, Clone)]
pub struct InterestRate {
    rate: Real,
    dc: Arc<dyn DayCounter>,
    compounding: Compounding,
    frequency: Frequency,
}

impl InterestRate {
    /// Create a new interest rate.
    ///
    /// `frequency` is ignored for simple and continuous compounding.
    pub fn new(
        rate: Real,
        dc: Arc<dyn DayCounter>,
        compounding: Compounding,
        frequency: Frequency,
    ) -> Self {
        Self {
            rate,
            dc,
            compounding,
            frequency,
        }
    }

    /// The rate value.
    pub fn rate(&self) -> Real {
        self.rate
    }

    /// The day counter.
    pub fn day_counter(&self) -> &dyn DayCounter {
        &*self.dc
    }

    /// The compounding convention.
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// The compounding frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Growth of one unit of currency over `t` years.
    ///
    /// # Errors
    /// Negative `t`, a non-positive simple factor, or compounded interest
    /// without a periodic frequency.
    pub fn compound_factor_time(&self, t: Time) -> Result<Real> {
        if t < 0.0 {
            return Err(Error::InvalidArgument(format!("negative time {t}")));
        }
        if t == 0.0 {
            return Ok(1.0);
        }
        let factor = match self.compounding {
            Compounding::Simple => 1.0 + self.rate * t,
            Compounding::Continuous => (self.rate * t).exp(),
            Compounding::Compounded => {
                let f = periods_per_year(self.frequency)?;
                (1.0 + self.rate / f).powf(f * t)
            }
            Compounding::SimpleThenCompounded => {
                let f = periods_per_year(self.frequency)?;
                if t <= 1.0 / f {
                    1.0 + self.rate * t
                } else {
                    (1.0 + self.rate / f).powf(f * t)
                }
            }
        };
        if factor <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "non-positive compound factor {factor} for {self} over {t}y"
            )));
        }
        Ok(factor)
    }

    /// Compound factor between two dates, measured with this rate's day
    /// counter.
    pub fn compound_factor(&self, d1: Date, d2: Date) -> Result<Real> {
        self.compound_factor_time(self.dc.year_fraction(d1, d2))
    }

    /// Discount factor over `t` years.
    pub fn discount_factor_time(&self, t: Time) -> Result<Real> {
        Ok(1.0 / self.compound_factor_time(t)?)
    }

    /// Discount factor between two dates.
    pub fn discount_factor(&self, d1: Date, d2: Date) -> Result<Real> {
        Ok(1.0 / self.compound_factor(d1, d2)?)
    }

    /// The rate, under the given conventions, that reproduces `compound`
    /// over `t` years.  A zero `t` yields a zero rate.
    pub fn implied_rate(
        compound: Real,
        dc: Arc<dyn DayCounter>,
        comp: Compounding,
        freq: Frequency,
        t: Time,
    ) -> Result<InterestRate> {
        if compound <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "non-positive compound factor {compound}"
            )));
        }
        let rate = if t == 0.0 {
            0.0
        } else {
            match comp {
                Compounding::Simple => (compound - 1.0) / t,
                Compounding::Continuous => compound.ln() / t,
                Compounding::Compounded => {
                    let f = periods_per_year(freq)?;
                    (compound.powf(1.0 / (f * t)) - 1.0) * f
                }
                Compounding::SimpleThenCompounded => {
                    let f = periods_per_year(freq)?;
                    if t <= 1.0 / f {
                        (compound - 1.0) / t
                    } else {
                        (compound.powf(1.0 / (f * t)) - 1.0) * f
                    }
                }
            }
        };
        Ok(InterestRate::new(rate, dc, comp, freq))
    }

    /// The rate under other conventions with the same growth over `t` years.
    pub fn equivalent_rate(&self, comp: Compounding, freq: Frequency, t: Time) -> Result<Self> {
        Self::implied_rate(self.compound_factor_time(t)?, self.dc.clone(), comp, freq, t)
    }
}

fn periods_per_year(freq: Frequency) -> Result<Real> {
    match freq.periods_per_year() {
        Some(n) if n > 0 => Ok(n as Real),
        _ => Err(Error::InvalidArgument(format!(
            "compounded rates need a periodic frequency, got {freq}"
        ))),
    }
}

impl std::fmt::Display for InterestRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.6}% {} {:?}",
            self.rate * 100.0,
            self.dc.name(),
            self.compounding
        )?;
        if matches!(
            self.compounding,
            Compounding::Compounded | Compounding::SimpleThenCompounded
        ) {
            write!(f, " {}", self.frequency)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day_counter::{Actual360, Actual365Fixed};
    use approx::assert_abs_diff_eq;

    fn act365() -> Arc<dyn DayCounter> {
        Arc::new(Actual365Fixed)
    }

    #[test]
    fn compound_factors() {
        let simple = InterestRate::new(0.05, act365(), Compounding::Simple, Frequency::Annual);
        assert_abs_diff_eq!(simple.compound_factor_time(2.0).unwrap(), 1.10, epsilon = 1e-12);
        let semi =
            InterestRate::new(0.10, act365(), Compounding::Compounded, Frequency::Semiannual);
        assert_abs_diff_eq!(semi.compound_factor_time(1.0).unwrap(), 1.1025, epsilon = 1e-12);
        let cont =
            InterestRate::new(0.05, act365(), Compounding::Continuous, Frequency::NoFrequency);
        assert_abs_diff_eq!(
            cont.compound_factor_time(1.0).unwrap(),
            0.05_f64.exp(),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(cont.compound_factor_time(0.0).unwrap(), 1.0);
    }

    #[test]
    fn invalid_inputs_are_errors() {
        let r = InterestRate::new(0.05, act365(), Compounding::Compounded, Frequency::NoFrequency);
        assert!(r.compound_factor_time(1.0).is_err());
        assert!(r.compound_factor_time(-1.0).is_err());
        let steep = InterestRate::new(-2.0, act365(), Compounding::Simple, Frequency::Annual);
        assert!(steep.compound_factor_time(1.0).is_err());
        let nothing_back =
            InterestRate::implied_rate(0.0, act365(), Compounding::Simple, Frequency::Annual, 1.0);
        assert!(nothing_back.is_err());
    }

    #[test]
    fn implied_rates() {
        let ir =
            InterestRate::implied_rate(1.10, act365(), Compounding::Simple, Frequency::Annual, 2.0)
                .unwrap();
        assert_abs_diff_eq!(ir.rate(), 0.05, epsilon = 1e-12);
        let ir = InterestRate::implied_rate(
            (0.05_f64 * 3.0).exp(),
            act365(),
            Compounding::Continuous,
            Frequency::NoFrequency,
            3.0,
        )
        .unwrap();
        assert_abs_diff_eq!(ir.rate(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn equivalent_rate_roundtrip() {
        let ir = InterestRate::new(0.05, act365(), Compounding::Compounded, Frequency::Annual);
        let cont = ir
            .equivalent_rate(Compounding::Continuous, Frequency::NoFrequency, 1.0)
            .unwrap();
        let back = cont.equivalent_rate(Compounding::Compounded, Frequency::Annual, 1.0).unwrap();
        assert_abs_diff_eq!(back.rate(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn date_based_discounting() {
        let d1 = Date::from_ymd(2023, 1, 1).unwrap();
        let d2 = Date::from_ymd(2023, 2, 1).unwrap();
        let ir =
            InterestRate::new(0.0438, Arc::new(Actual360), Compounding::Simple, Frequency::Annual);
        let df = ir.discount_factor(d1, d2).unwrap();
        assert_abs_diff_eq!(df, 1.0 / (1.0 + 0.0438 * 31.0 / 360.0), epsilon = 1e-15);
        assert!(ir.to_string().starts_with("4.380000% Actual/360"));
    }
}
