//! `Schedule`: the adjusted coupon dates of a fixed or floating leg.
//!
//! Dates are generated from a seed date by whole multiples of the tenor so
//! that month-end clamping never accumulates drift.

use crate::business_day_convention::BusinessDayConvention;
use crate::calendar::Calendar;
use crate::date::Date;
use crate::period::Period;
use ql_core::errors::{Error, Result};

/// Date generation rule for schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateGeneration {
    /// Roll backward from the termination date; any stub is at the front.
    #[default]
    Backward,
    /// Roll forward from the effective date; any stub is at the back.
    Forward,
    /// Only the effective and termination dates.
    Zero,
}

/// An ordered sequence of adjusted dates.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    dates: Vec<Date>,
}

impl Schedule {
    /// All dates, ascending.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Return `true` if the schedule is empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The first date.
    pub fn start_date(&self) -> Option<Date> {
        self.dates.first().copied()
    }

    /// The last date.
    pub fn end_date(&self) -> Option<Date> {
        self.dates.last().copied()
    }

    /// Consecutive `(start, end)` accrual periods.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.dates.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Builder for [`Schedule`].
#[derive(Debug)]
pub struct ScheduleBuilder<'a> {
    effective_date: Date,
    termination_date: Date,
    tenor: Period,
    calendar: &'a dyn Calendar,
    convention: BusinessDayConvention,
    termination_convention: BusinessDayConvention,
    rule: DateGeneration,
    end_of_month: bool,
}

impl<'a> ScheduleBuilder<'a> {
    /// Begin building a schedule.
    pub fn new(
        effective_date: Date,
        termination_date: Date,
        tenor: Period,
        calendar: &'a dyn Calendar,
    ) -> Self {
        Self {
            effective_date,
            termination_date,
            tenor,
            calendar,
            convention: BusinessDayConvention::ModifiedFollowing,
            termination_convention: BusinessDayConvention::ModifiedFollowing,
            rule: DateGeneration::Backward,
            end_of_month: false,
        }
    }

    /// Set the business-day convention for intermediate dates.
    pub fn with_convention(mut self, c: BusinessDayConvention) -> Self {
        self.convention = c;
        self
    }

    /// Set the business-day convention for the termination date.
    pub fn with_termination_convention(mut self, c: BusinessDayConvention) -> Self {
        self.termination_convention = c;
        self
    }

    /// Set the date-generation rule.
    pub fn with_rule(mut self, rule: DateGeneration) -> Self {
        self.rule = rule;
        self
    }

    /// Whether a seed date on a month end pins the intermediate dates to
    /// month ends.
    pub fn end_of_month(mut self, flag: bool) -> Self {
        self.end_of_month = flag;
        self
    }

    /// Build the `Schedule`.
    pub fn build(self) -> Result<Schedule> {
        let (start, end) = (self.effective_date, self.termination_date);
        if start >= end {
            return Err(Error::InvalidArgument(format!(
                "effective date {start} must be before termination date {end}"
            )));
        }
        if self.tenor.length < 0 {
            return Err(Error::InvalidArgument(format!("negative tenor {}", self.tenor)));
        }

        let unadjusted = if self.tenor.length == 0 || self.rule == DateGeneration::Zero {
            vec![start, end]
        } else {
            self.roll(start, end)?
        };

        let seed = match self.rule {
            DateGeneration::Forward => start,
            DateGeneration::Backward | DateGeneration::Zero => end,
        };
        let month_end = self.end_of_month && seed.is_end_of_month();

        let last = unadjusted.len() - 1;
        let mut dates = Vec::with_capacity(unadjusted.len());
        for (i, d) in unadjusted.into_iter().enumerate() {
            let convention = if i == last {
                self.termination_convention
            } else {
                self.convention
            };
            let adjusted = if month_end && i > 0 && i < last {
                self.calendar.end_of_month(d)?
            } else {
                self.calendar.adjust(d, convention)?
            };
            // adjustment can collapse a short stub onto its neighbour
            if dates.last() != Some(&adjusted) {
                dates.push(adjusted);
            }
        }
        Ok(Schedule { dates })
    }

    fn roll(&self, start: Date, end: Date) -> Result<Vec<Date>> {
        let mut dates = Vec::new();
        match self.rule {
            DateGeneration::Forward => {
                dates.push(start);
                for k in 1.. {
                    let d = start.add_period(self.tenor * k)?;
                    if d >= end {
                        break;
                    }
                    dates.push(d);
                }
                dates.push(end);
            }
            DateGeneration::Backward | DateGeneration::Zero => {
                dates.push(end);
                for k in 1.. {
                    let d = end.sub_period(self.tenor * k)?;
                    if d <= start {
                        break;
                    }
                    dates.push(d);
                }
                dates.push(start);
                dates.reverse();
            }
        }
        Ok(dates)
    }
}
