//! `Index` trait and the shared historical-fixing store.

use ql_core::errors::{Error, Result};
use ql_core::{Real, TimeSeries};
use ql_time::Date;
use std::sync::{Arc, PoisonError, RwLock};

/// Thread-safe historical fixings, keyed by date.
///
/// Clones share the same underlying series, so an index handed to several
/// curves sees fixings added through any of them.
#[derive(Debug, Clone, Default)]
pub struct FixingStore {
    data: Arc<RwLock<TimeSeries<Date, Real>>>,
}

impl FixingStore {
    /// Create a new, empty fixing store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fixing, replacing any previous value for the same date.
    ///
    /// # Errors
    /// Non-finite values are rejected.
    pub fn add(&self, date: Date, value: Real) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::InvalidArgument(format!("non-finite fixing {value} for {date}")));
        }
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(date, value);
        Ok(())
    }

    /// Look up a fixing.
    pub fn get(&self, date: Date) -> Option<Real> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&date)
            .copied()
    }

    /// Date of the most recent fixing.
    pub fn last_date(&self) -> Option<Date> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last_key()
            .copied()
    }

    /// Number of stored fixings.
    pub fn len(&self) -> usize {
        self.data.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all fixings.
    pub fn clear(&self) {
        self.data.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Base trait for market indexes.
pub trait Index: std::fmt::Debug + Send + Sync {
    /// Unique name (e.g. `"UKRPI"`).
    fn name(&self) -> &str;

    /// Reference to the historical-fixing store.
    fn fixing_store(&self) -> &FixingStore;

    /// Record a historical fixing.
    fn add_fixing(&self, date: Date, value: Real) -> Result<()> {
        self.fixing_store().add(date, value)
    }

    /// Record several historical fixings.
    fn add_fixings(&self, fixings: &[(Date, Real)]) -> Result<()> {
        fixings.iter().try_for_each(|&(d, v)| self.add_fixing(d, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn fixing_store_round_trip() {
        let store = FixingStore::new();
        store.add(date(2025, 1, 15), 0.035).unwrap();
        assert_eq!(store.get(date(2025, 1, 15)), Some(0.035));
        assert!(store.get(date(2025, 1, 16)).is_none());
        assert!(store.add(date(2025, 1, 16), f64::INFINITY).is_err());
    }

    #[test]
    fn clones_share_fixings() {
        let store = FixingStore::new();
        let other = store.clone();
        other.add(date(2025, 1, 15), 0.01).unwrap();
        other.add(date(2025, 2, 15), 0.02).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.last_date(), Some(date(2025, 2, 15)));
        store.clear();
        assert!(other.is_empty());
    }
}
