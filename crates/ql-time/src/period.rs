//! `Period`: a tenor such as `3M` or `10Y`.

use crate::frequency::Frequency;
use crate::time_unit::TimeUnit;
use ql_core::errors::{Error, Result};

/// A time span made up of an integer length and a [`TimeUnit`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    /// Number of units.
    pub length: i32,
    /// The unit of time.
    pub unit: TimeUnit,
}

impl Period {
    /// Create a new period.
    pub const fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// The tenor between two payments of the given frequency.
    ///
    /// # Errors
    /// `NoFrequency` has no tenor.
    pub fn from_frequency(freq: Frequency) -> Result<Self> {
        match freq {
            Frequency::NoFrequency => Err(Error::InvalidArgument(format!(
                "cannot convert {freq} to a period"
            ))),
            Frequency::Once => Ok(Period::new(0, TimeUnit::Years)),
            Frequency::Annual => Ok(Period::new(1, TimeUnit::Years)),
            other => {
                let months = other.months().unwrap_or(12) as i32;
                Ok(Period::new(months, TimeUnit::Months))
            }
        }
    }

    /// Approximate length in years, used to order tenors and build guesses.
    pub fn years(&self) -> f64 {
        let l = self.length as f64;
        match self.unit {
            TimeUnit::Days => l / 365.0,
            TimeUnit::Weeks => l * 7.0 / 365.0,
            TimeUnit::Months => l / 12.0,
            TimeUnit::Years => l,
        }
    }
}

impl std::ops::Neg for Period {
    type Output = Self;
    fn neg(self) -> Self {
        Period::new(-self.length, self.unit)
    }
}

impl std::ops::Mul<i32> for Period {
    type Output = Self;
    fn mul(self, rhs: i32) -> Self {
        Period::new(self.length * rhs, self.unit)
    }
}

impl std::str::FromStr for Period {
    type Err = Error;

    /// Parse a tenor string such as `"1M"`, `"18m"` or `"10Y"`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let unit = match s.chars().last().map(|c| c.to_ascii_uppercase()) {
            Some('D') => TimeUnit::Days,
            Some('W') => TimeUnit::Weeks,
            Some('M') => TimeUnit::Months,
            Some('Y') => TimeUnit::Years,
            _ => return Err(Error::InvalidArgument(format!("unknown tenor unit in '{s}'"))),
        };
        let length = s[..s.len() - 1]
            .parse::<i32>()
            .map_err(|_| Error::InvalidArgument(format!("invalid tenor length in '{s}'")))?;
        Ok(Period::new(length, unit))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.length, self.unit.code())
    }
}

impl std::fmt::Debug for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Period({self})")
    }
}
