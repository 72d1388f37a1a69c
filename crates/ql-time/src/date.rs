//! `Date` type: a day-precision serial number.
//!
//! # Serial number convention
//! * Spreadsheet-compatible numbering: serial 367 is 1 January 1901 and
//!   serial 36526 is 1 January 2000.
//! * Supported range is 1 January 1901 to 31 December 2199.
//!
//! Conversions to and from civil dates use the proleptic-Gregorian
//! days-from-civil algorithm, so there are no per-year loops.

use crate::period::Period;
use crate::time_unit::TimeUnit;
use crate::weekday::Weekday;
use ql_core::errors::{Error, Result};

/// A calendar date represented as a serial number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(i32);

/// Shift from days-since-0000-03-01 to the spreadsheet serial number.
const EPOCH_OFFSET: i32 = 693_899;

impl Date {
    /// Minimum valid date: 1 January 1901.
    pub const MIN: Date = Date(367);

    /// Maximum valid date: 31 December 2199.
    pub const MAX: Date = Date(109_574);

    // ── Constructors ─────────────────────────────────────────────────────────

    /// Create a date from year, month (1–12) and day of month.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::Date(format!("month {month} out of range [1, 12]")));
        }
        let last = days_in_month(year, month);
        if day == 0 || day > last {
            return Err(Error::Date(format!(
                "day {day} out of range [1, {last}] for {year}-{month:02}"
            )));
        }
        Self::from_serial(days_from_civil(year as i32, month as i32, day as i32) - EPOCH_OFFSET)
    }

    /// Create a date from a serial number, checking the supported range.
    pub fn from_serial(serial: i32) -> Result<Self> {
        if serial < Self::MIN.0 || serial > Self::MAX.0 {
            return Err(Error::Date(format!(
                "serial {serial} outside [{}, {}]",
                Self::MIN.0,
                Self::MAX.0
            )));
        }
        Ok(Date(serial))
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// The serial number.
    pub fn serial(&self) -> i32 {
        self.0
    }

    /// `(year, month, day)` components.
    pub fn ymd(&self) -> (u16, u8, u8) {
        civil_from_days(self.0 + EPOCH_OFFSET)
    }

    /// Year.
    pub fn year(&self) -> u16 {
        self.ymd().0
    }

    /// Month (1–12).
    pub fn month(&self) -> u8 {
        self.ymd().1
    }

    /// Day of the month (1–31).
    pub fn day_of_month(&self) -> u8 {
        self.ymd().2
    }

    /// Day of the year (1–366).
    pub fn day_of_year(&self) -> u16 {
        let (y, _, _) = self.ymd();
        let jan1 = days_from_civil(y as i32, 1, 1) - EPOCH_OFFSET;
        (self.0 - jan1 + 1) as u16
    }

    /// Day of the week.
    pub fn weekday(&self) -> Weekday {
        // serial 2 is a Monday
        Weekday::from_monday_offset((self.0 - 2).rem_euclid(7) as u8)
    }

    // ── Arithmetic ────────────────────────────────────────────────────────────

    /// Move by `n` calendar days.
    pub fn add_days(self, n: i32) -> Result<Self> {
        Self::from_serial(self.0 + n)
    }

    /// The next calendar day.
    pub fn succ(self) -> Result<Self> {
        self.add_days(1)
    }

    /// The previous calendar day.
    pub fn pred(self) -> Result<Self> {
        self.add_days(-1)
    }

    /// Move by `n` units.  Month and year moves clamp the day to the end of
    /// the target month (31 January + 1M = 28/29 February).
    pub fn advance(self, n: i32, unit: TimeUnit) -> Result<Self> {
        match unit {
            TimeUnit::Days => self.add_days(n),
            TimeUnit::Weeks => self.add_days(7 * n),
            TimeUnit::Months => {
                let (y, m, d) = self.ymd();
                let months = y as i32 * 12 + (m as i32 - 1) + n;
                let year = months.div_euclid(12);
                let month = (months.rem_euclid(12) + 1) as u8;
                if !(1901..=2199).contains(&year) {
                    return Err(Error::Date(format!("year {year} out of range")));
                }
                let year = year as u16;
                Self::from_ymd(year, month, d.min(days_in_month(year, month)))
            }
            TimeUnit::Years => self.advance(12 * n, TimeUnit::Months),
        }
    }

    /// Move by a [`Period`].
    pub fn add_period(self, period: Period) -> Result<Self> {
        self.advance(period.length, period.unit)
    }

    /// Move back by a [`Period`].
    pub fn sub_period(self, period: Period) -> Result<Self> {
        self.advance(-period.length, period.unit)
    }

    /// First calendar day of this date's month.
    pub fn start_of_month(self) -> Self {
        Date(self.0 - self.day_of_month() as i32 + 1)
    }

    /// Last calendar day of this date's month.
    pub fn end_of_month(self) -> Self {
        let (y, m, d) = self.ymd();
        Date(self.0 + (days_in_month(y, m) - d) as i32)
    }

    /// Return `true` if this is the last calendar day of its month.
    pub fn is_end_of_month(self) -> bool {
        self == self.end_of_month()
    }
}

impl std::ops::Sub<Date> for Date {
    type Output = i32;

    /// Calendar days from `rhs` to `self`.
    fn sub(self, rhs: Date) -> i32 {
        self.0 - rhs.0
    }
}

impl std::str::FromStr for Date {
    type Err = Error;

    /// Parse an ISO `yyyy-mm-dd` date.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().splitn(3, '-');
        let mut next = |what: &str| {
            parts
                .next()
                .ok_or_else(|| Error::Date(format!("missing {what} in '{s}'")))
        };
        let bad = |_| Error::Date(format!("cannot parse '{s}' as yyyy-mm-dd"));
        let y = next("year")?.parse::<u16>().map_err(bad)?;
        let m = next("month")?.parse::<u8>().map_err(bad)?;
        let d = next("day")?.parse::<u8>().map_err(bad)?;
        Date::from_ymd(y, m, d)
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (y, m, d) = self.ymd();
        write!(f, "{d} {} {y}", MONTH_NAMES[m as usize - 1])
    }
}

impl std::fmt::Debug for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (y, m, d) = self.ymd();
        write!(f, "Date({y:04}-{m:02}-{d:02})")
    }
}

// ── Civil calendar helpers ────────────────────────────────────────────────────

/// Whether a given year is a Gregorian leap year.
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a given month (1–12) of a given year.
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Days since 0000-03-01 for a proleptic-Gregorian civil date.
fn days_from_civil(y: i32, m: i32, d: i32) -> i32 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (m + 9) % 12;
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe
}

/// Inverse of [`days_from_civil`].
fn civil_from_days(z: i32) -> (u16, u8, u8) {
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = yoe + era * 400 + if m <= 2 { 1 } else { 0 };
    (y as u16, m as u8, d as u8)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn serial_anchors() {
        assert_eq!(date(1901, 1, 1), Date::MIN);
        assert_eq!(date(2199, 12, 31), Date::MAX);
        assert_eq!(date(2000, 1, 1).serial(), 36_526);
        assert!(Date::from_ymd(1900, 6, 1).is_err());
    }

    #[test]
    fn components_roundtrip() {
        let dates = [(1901, 1, 1), (2000, 2, 29), (2100, 2, 28), (2023, 6, 15), (2199, 12, 31)];
        for (y, m, d) in dates {
            assert_eq!(date(y, m, d).ymd(), (y, m, d));
        }
        assert!(Date::from_ymd(2100, 2, 29).is_err());
        assert!(Date::from_ymd(2023, 13, 1).is_err());
    }

    #[test]
    fn weekday() {
        assert_eq!(date(2024, 1, 1).weekday(), Weekday::Monday);
        assert_eq!(date(2024, 1, 6).weekday(), Weekday::Saturday);
        assert_eq!(date(2023, 1, 1).weekday(), Weekday::Sunday);
    }

    #[test]
    fn advance_months_clamps() {
        let next = date(2023, 1, 31).advance(1, TimeUnit::Months).unwrap();
        assert_eq!(next, date(2023, 2, 28));
        let back = date(2024, 3, 31).advance(-1, TimeUnit::Months).unwrap();
        assert_eq!(back, date(2024, 2, 29));
        assert_eq!(date(2022, 8, 1).advance(-3, TimeUnit::Months).unwrap(), date(2022, 5, 1));
        assert_eq!(date(2022, 8, 1).advance(12, TimeUnit::Years).unwrap(), date(2034, 8, 1));
    }

    #[test]
    fn month_boundaries() {
        let d = date(2024, 2, 15);
        assert_eq!(d.end_of_month(), date(2024, 2, 29));
        assert_eq!(d.start_of_month(), date(2024, 2, 1));
        assert!(date(2023, 4, 30).is_end_of_month());
        assert_eq!(date(2024, 12, 31).day_of_year(), 366);
    }

    #[test]
    fn arithmetic_and_parsing() {
        let d = date(2023, 1, 1);
        assert_eq!(d.add_days(31).unwrap(), date(2023, 2, 1));
        assert_eq!(date(2023, 2, 1) - d, 31);
        assert!(Date::MAX.succ().is_err());
        assert_eq!("2023-01-01".parse::<Date>().unwrap(), d);
        assert!("2023/01/01".parse::<Date>().is_err());
        assert_eq!(d.to_string(), "1 January 2023");
        assert_eq!(format!("{d:?}"), "Date(2023-01-01)");
    }
}
