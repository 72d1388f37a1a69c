//! `FlatForward`: a yield curve with a constant forward rate.
//!
//! Used as a fixed nominal discount curve (year-on-year inflation helpers
//! discount on one) and as a reference curve in tests.

use crate::term_structure::{Extrapolation, TermStructure};
use crate::yield_term_structure::YieldTermStructure;
use ql_core::errors::Result;
use ql_core::{Compounding, DiscountFactor, Rate, Time};
use ql_time::{Date, DayCounter, Frequency, InterestRate};
use std::sync::Arc;

/// A flat (constant) forward-rate yield term structure.
///
/// Discount factors are `P(t) = exp(-r * t)` where `r` is the
/// continuously-compounded equivalent of the supplied rate.
#[derive(Debug)]
pub struct FlatForward {
    reference_date: Date,
    day_counter: Arc<dyn DayCounter>,
    /// The continuously-compounded flat rate.
    rate: Rate,
}

impl FlatForward {
    /// Create a flat-forward curve from a rate quoted under the given
    /// compounding convention.
    pub fn new(
        reference_date: Date,
        rate: Rate,
        day_counter: impl DayCounter + 'static,
        compounding: Compounding,
        frequency: Frequency,
    ) -> Result<Self> {
        let day_counter: Arc<dyn DayCounter> = Arc::new(day_counter);
        let quoted = InterestRate::new(rate, day_counter.clone(), compounding, frequency);
        let rate = quoted.compound_factor_time(1.0)?.ln();
        Ok(Self {
            reference_date,
            day_counter,
            rate,
        })
    }

    /// Create a flat-forward curve from a continuously-compounded rate.
    pub fn continuous(
        reference_date: Date,
        rate: Rate,
        day_counter: impl DayCounter + 'static,
    ) -> Self {
        Self {
            reference_date,
            day_counter: Arc::new(day_counter),
            rate,
        }
    }

    /// The continuously-compounded flat rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }
}

impl TermStructure for FlatForward {
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
}

impl YieldTermStructure for FlatForward {
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor> {
        Ok((-self.rate * t).exp())
    }

    fn instantaneous_forward_impl(&self, _t: Time) -> Result<Rate> {
        Ok(self.rate)
    }
}
