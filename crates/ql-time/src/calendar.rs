//! `Calendar` trait and the holiday-free calendars.
//!
//! A calendar knows which dates are business days and can adjust dates
//! according to a [`BusinessDayConvention`].  Every date move is checked
//! against the supported [`Date`] range, so adjustments return `Result`.

use crate::business_day_convention::BusinessDayConvention;
use crate::date::Date;
use crate::period::Period;
use crate::time_unit::TimeUnit;
use ql_core::errors::Result;

/// A financial calendar.
pub trait Calendar: std::fmt::Debug + Send + Sync {
    /// Human-readable name (e.g. `"TARGET"`).
    fn name(&self) -> &str;

    /// Return `true` if `date` is a business day in this calendar.
    fn is_business_day(&self, date: Date) -> bool;

    /// Return `true` if `date` is a holiday or weekend.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjust `date` according to the given business-day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Result<Date> {
        match convention {
            BusinessDayConvention::Unadjusted => Ok(date),
            BusinessDayConvention::Following => self.roll(date, 1),
            BusinessDayConvention::Preceding => self.roll(date, -1),
            BusinessDayConvention::ModifiedFollowing => {
                let adjusted = self.roll(date, 1)?;
                if adjusted.month() != date.month() {
                    self.roll(date, -1)
                } else {
                    Ok(adjusted)
                }
            }
            BusinessDayConvention::ModifiedPreceding => {
                let adjusted = self.roll(date, -1)?;
                if adjusted.month() != date.month() {
                    self.roll(date, 1)
                } else {
                    Ok(adjusted)
                }
            }
        }
    }

    /// Step day by day in direction `step` until a business day is found.
    #[doc(hidden)]
    fn roll(&self, mut date: Date, step: i32) -> Result<Date> {
        while self.is_holiday(date) {
            date = date.add_days(step)?;
        }
        Ok(date)
    }

    /// Advance `date` by `n` business days.
    fn advance_business_days(&self, mut date: Date, n: i32) -> Result<Date> {
        let step = if n >= 0 { 1 } else { -1 };
        let mut remaining = n.abs();
        if n == 0 {
            return self.adjust(date, BusinessDayConvention::Following);
        }
        while remaining > 0 {
            date = date.add_days(step)?;
            if self.is_business_day(date) {
                remaining -= 1;
            }
        }
        Ok(date)
    }

    /// Advance `date` by a period and adjust the result.
    ///
    /// Day periods count business days; other units move on the civil
    /// calendar and then apply `convention`.  With `end_of_month` set, a
    /// start date on the last business day of its month maps to the last
    /// business day of the target month.
    fn advance(
        &self,
        date: Date,
        period: Period,
        convention: BusinessDayConvention,
        end_of_month: bool,
    ) -> Result<Date> {
        match period.unit {
            TimeUnit::Days => self.advance_business_days(date, period.length),
            TimeUnit::Weeks => self.adjust(date.add_period(period)?, convention),
            TimeUnit::Months | TimeUnit::Years => {
                let moved = date.add_period(period)?;
                if end_of_month && self.is_end_of_month(date)? {
                    self.end_of_month(moved)
                } else {
                    self.adjust(moved, convention)
                }
            }
        }
    }

    /// Return `true` if `date` is the last business day of its month.
    fn is_end_of_month(&self, date: Date) -> Result<bool> {
        let next = self.adjust(date.add_days(1)?, BusinessDayConvention::Following)?;
        Ok(date.month() != next.month())
    }

    /// The last business day of the month containing `date`.
    fn end_of_month(&self, date: Date) -> Result<Date> {
        self.adjust(date.end_of_month(), BusinessDayConvention::Preceding)
    }

    /// Business days in `(from, to]`, negative when `to < from`.
    fn business_days_between(&self, from: Date, to: Date) -> Result<i32> {
        let (start, end, sign) = if to >= from { (from, to, 1) } else { (to, from, -1) };
        let mut count = 0;
        let mut d = start;
        while d < end {
            d = d.add_days(1)?;
            if self.is_business_day(d) {
                count += 1;
            }
        }
        Ok(sign * count)
    }
}

/// Every day is a business day.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &str {
        "Null"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }
}

/// Saturdays and Sundays are holidays; nothing else is.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendsOnly;

impl Calendar for WeekendsOnly {
    fn name(&self) -> &str {
        "Weekends only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.weekday().is_weekend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn null_calendar_never_moves() {
        let d = date(2023, 1, 1);
        assert!(NullCalendar.is_business_day(d));
        let moved = NullCalendar
            .advance(d, Period::new(1, TimeUnit::Months), BusinessDayConvention::Following, false)
            .unwrap();
        assert_eq!(moved, date(2023, 2, 1));
    }

    #[test]
    fn adjust_conventions() {
        let cal = WeekendsOnly;
        // Saturday 30 September 2023
        let sat = date(2023, 9, 30);
        assert_eq!(cal.adjust(sat, BusinessDayConvention::Following).unwrap(), date(2023, 10, 2));
        assert_eq!(
            cal.adjust(sat, BusinessDayConvention::ModifiedFollowing).unwrap(),
            date(2023, 9, 29)
        );
        assert_eq!(cal.adjust(sat, BusinessDayConvention::Preceding).unwrap(), date(2023, 9, 29));
        assert_eq!(cal.adjust(sat, BusinessDayConvention::Unadjusted).unwrap(), sat);
        // Sunday 1 October 2023
        let sun = date(2023, 10, 1);
        assert_eq!(
            cal.adjust(sun, BusinessDayConvention::ModifiedPreceding).unwrap(),
            date(2023, 10, 2)
        );
    }

    #[test]
    fn advance_business_days() {
        let cal = WeekendsOnly;
        // Friday + 1 business day = Monday
        let fri = date(2023, 1, 6);
        assert_eq!(cal.advance_business_days(fri, 1).unwrap(), date(2023, 1, 9));
        assert_eq!(cal.advance_business_days(date(2023, 1, 9), -1).unwrap(), fri);
        assert_eq!(cal.business_days_between(fri, date(2023, 1, 13)).unwrap(), 5);
        assert_eq!(cal.business_days_between(date(2023, 1, 13), fri).unwrap(), -5);
    }

    #[test]
    fn end_of_month_rule() {
        let cal = WeekendsOnly;
        // 28 February 2023 is a Tuesday and the last business day
        let d = date(2023, 2, 28);
        assert!(cal.is_end_of_month(d).unwrap());
        let eom = cal
            .advance(
                d,
                Period::new(1, TimeUnit::Months),
                BusinessDayConvention::ModifiedFollowing,
                true,
            )
            .unwrap();
        assert_eq!(eom, date(2023, 3, 31));
        let plain = cal
            .advance(
                d,
                Period::new(1, TimeUnit::Months),
                BusinessDayConvention::ModifiedFollowing,
                false,
            )
            .unwrap();
        assert_eq!(plain, date(2023, 3, 28));
    }
}
