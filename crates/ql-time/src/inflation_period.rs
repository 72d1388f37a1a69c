//! Inflation-index publication periods.
//!
//! A price index is published once per period (usually a month); every date
//! inside the period observes the same fixing.

use crate::date::Date;
use crate::frequency::Frequency;
use crate::time_unit::TimeUnit;
use ql_core::errors::{Error, Result};

/// The first and last calendar day of the inflation period containing
/// `date`.
///
/// # Errors
/// `frequency` must divide the year into whole months.
pub fn inflation_period(date: Date, frequency: Frequency) -> Result<(Date, Date)> {
    let months = frequency.months().ok_or_else(|| {
        Error::InvalidArgument(format!("{frequency} is not an inflation publication frequency"))
    })? as u8;
    let (y, m, _) = date.ymd();
    let first_month = (m - 1) / months * months + 1;
    let start = Date::from_ymd(y, first_month, 1)?;
    let end = start.advance(months as i32, TimeUnit::Months)?.pred()?;
    Ok((start, end))
}
