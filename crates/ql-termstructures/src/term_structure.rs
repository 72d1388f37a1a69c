//! `TermStructure`: base trait for all curves.
//!
//! Every term structure has a **reference date**, a **day counter**, and a
//! **maximum date** (the last calibrated node).  Queries past the maximum
//! date are governed by the curve's [`Extrapolation`] policy.

use ql_core::errors::{Error, Result};
use ql_core::Time;
use ql_time::{Date, DayCounter};
use std::sync::Arc;

/// What a curve does with queries past its last node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extrapolation {
    /// Fail with [`Error::Extrapolation`].
    #[default]
    Disallowed,
    /// Continue with the flat instantaneous forward (or flat growth) of the
    /// last node.
    Allowed,
}

impl Extrapolation {
    /// Return `true` for [`Extrapolation::Allowed`].
    pub fn is_allowed(self) -> bool {
        self == Extrapolation::Allowed
    }
}

/// Base trait for all term structures.
pub trait TermStructure: std::fmt::Debug + Send + Sync {
    /// The date from which time is measured.
    fn reference_date(&self) -> Date;

    /// The day counter used for date to time conversions.
    fn day_counter(&self) -> Arc<dyn DayCounter>;

    /// The latest date for which the curve is calibrated.
    fn max_date(&self) -> Date;

    /// Policy for queries past [`max_date`](Self::max_date).
    fn extrapolation(&self) -> Extrapolation {
        Extrapolation::Disallowed
    }

    /// Convert a date to a year fraction relative to the reference date.
    fn time_from_reference(&self, date: Date) -> Time {
        self.day_counter().year_fraction(self.reference_date(), date)
    }

    /// The latest time for which the curve is calibrated.
    fn max_time(&self) -> Time {
        self.time_from_reference(self.max_date())
    }

    /// Fail unless `date` can be queried.
    fn check_range(&self, date: Date) -> Result<()> {
        if date < self.reference_date() {
            return Err(Error::Extrapolation(format!(
                "{date} is before the reference date {}",
                self.reference_date()
            )));
        }
        if date > self.max_date() && !self.extrapolation().is_allowed() {
            return Err(Error::Extrapolation(format!(
                "{date} is past the max curve date {}",
                self.max_date()
            )));
        }
        Ok(())
    }

    /// Fail unless time `t` can be queried.
    fn check_range_time(&self, t: Time) -> Result<()> {
        if t < 0.0 {
            return Err(Error::Extrapolation(format!("negative time {t}")));
        }
        let max = self.max_time();
        if t > max && !ql_math::close_enough(t, max, 1000) && !self.extrapolation().is_allowed() {
            return Err(Error::Extrapolation(format!("time {t} is past the max curve time {max}")));
        }
        Ok(())
    }
}
