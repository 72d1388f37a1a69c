//! `YieldTermStructure`: interest-rate curves.
//!
//! Implementors provide the discount factor as a function of time; zero
//! rates, forward rates and instantaneous forwards are derived from it:
//!
//! * **discount factor**: `P(0,t)`
//! * **zero rate**: the rate, under any compounding convention, that grows
//!   `P(0,t)` back to one over `t`
//! * **forward rate**: the rate implied by `P(0,t1) / P(0,t2)`
//!
//! Every query is fallible: a curve may be out of range, still failing to
//! bootstrap, or a partial view that refuses to look past its pivot.

use crate::term_structure::TermStructure;
use ql_core::errors::{Error, Result};
use ql_core::{Compounding, DiscountFactor, Rate, Real, Time};
use ql_time::{Date, Frequency, InterestRate};

/// Small time step used for instantaneous rates.
const DT: Real = 1.0e-4;

/// A yield (interest-rate) term structure.
pub trait YieldTermStructure: TermStructure {
    /// Discount factor at time `t`, without range checks.
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor>;

    /// Discount factor for a date.
    fn discount(&self, date: Date) -> Result<DiscountFactor> {
        self.check_range(date)?;
        self.discount_impl(self.time_from_reference(date))
    }

    /// Discount factor for a time.
    fn discount_time(&self, t: Time) -> Result<DiscountFactor> {
        self.check_range_time(t)?;
        self.discount_impl(t)
    }

    /// Zero rate between the reference date and `date`, measured with the
    /// curve's day counter and expressed under the given conventions.
    fn zero_rate(&self, date: Date, comp: Compounding, freq: Frequency) -> Result<InterestRate> {
        self.check_range(date)?;
        let t = self.time_from_reference(date);
        self.zero_rate_time(t, comp, freq)
    }

    /// Zero rate for time `t`.
    fn zero_rate_time(&self, t: Time, comp: Compounding, freq: Frequency) -> Result<InterestRate> {
        self.check_range_time(t)?;
        let (t, df) = if t == 0.0 {
            (DT, self.discount_impl(DT)?)
        } else {
            (t, self.discount_impl(t)?)
        };
        InterestRate::implied_rate(1.0 / df, self.day_counter(), comp, freq, t)
    }

    /// Forward rate between two dates, expressed under the given conventions.
    ///
    /// Equal dates give the instantaneous forward at that date.
    fn forward_rate(
        &self,
        d1: Date,
        d2: Date,
        comp: Compounding,
        freq: Frequency,
    ) -> Result<InterestRate> {
        if d2 < d1 {
            return Err(Error::InvalidArgument(format!(
                "forward start {d1} is after forward end {d2}"
            )));
        }
        self.check_range(d1)?;
        self.check_range(d2)?;
        let t1 = self.time_from_reference(d1);
        let t2 = self.time_from_reference(d2);
        if d1 == d2 {
            let f = self.instantaneous_forward_impl(t1)?;
            return InterestRate::implied_rate((f * DT).exp(), self.day_counter(), comp, freq, DT);
        }
        let compound = self.discount_impl(t1)? / self.discount_impl(t2)?;
        InterestRate::implied_rate(compound, self.day_counter(), comp, freq, t2 - t1)
    }

    /// Continuously-compounded instantaneous forward rate at `date`.
    fn instantaneous_forward(&self, date: Date) -> Result<Rate> {
        self.check_range(date)?;
        self.instantaneous_forward_impl(self.time_from_reference(date))
    }

    /// Instantaneous forward at time `t`, by central difference of
    /// `ln P(t)`.  Curves with an analytic forward override this.
    fn instantaneous_forward_impl(&self, t: Time) -> Result<Rate> {
        let t1 = (t - DT / 2.0).max(0.0);
        let t2 = t1 + DT;
        let df1 = self.discount_impl(t1)?;
        let df2 = self.discount_impl(t2)?;
        Ok((df1.ln() - df2.ln()) / DT)
    }
}
