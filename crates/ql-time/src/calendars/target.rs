//! TARGET, the euro-area settlement calendar.

use crate::calendar::Calendar;
use crate::date::Date;

/// TARGET calendar.
///
/// Holidays besides weekends: New Year's Day, Good Friday, Easter Monday,
/// Labour Day (1 May), Christmas Day and 26 December.  The Easter and
/// Labour Day holidays apply from 2000.
#[derive(Debug, Clone, Copy, Default)]
pub struct Target;

impl Calendar for Target {
    fn name(&self) -> &str {
        "TARGET"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if date.weekday().is_weekend() {
            return false;
        }
        let (y, m, d) = date.ymd();
        let easter = easter_sunday_day_of_year(y);
        let doy = date.day_of_year();
        let holiday = (m == 1 && d == 1)
            || (y >= 2000 && (doy + 2 == easter || doy == easter + 1))
            || (y >= 2000 && m == 5 && d == 1)
            || (m == 12 && (d == 25 || d == 26))
            || (m == 12 && d == 31 && (y == 1999 || y == 2001));
        !holiday
    }
}

/// Day of the year (1-based) of Gregorian Easter Sunday.
///
/// Anonymous Gregorian computus.
pub fn easter_sunday_day_of_year(year: u16) -> u16 {
    let y = year as i32;
    let a = y % 19;
    let b = y / 100;
    let c = y % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    // March has 31 days; add February's length for leap years
    let feb = if crate::date::is_leap_year(year) { 29 } else { 28 };
    let before = if month == 3 { 31 + feb } else { 31 + feb + 31 };
    (before + day) as u16
}
