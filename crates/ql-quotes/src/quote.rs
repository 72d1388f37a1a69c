//! `Quote` trait and `SimpleQuote`.
//!
//! Quotes are shared as `Arc<dyn Quote>` between the caller, who moves the
//! market, and the helpers that read them during a bootstrap.  Setting a new
//! value notifies every registered observer.

use ql_core::errors::{Error, Result};
use ql_core::patterns::{Observable, ObservableImpl, Observer};
use ql_core::Real;
use std::sync::{PoisonError, RwLock, Weak};

/// A market-observable value.
pub trait Quote: Observable + std::fmt::Debug + Send + Sync {
    /// Return the current value, or `None` if the quote is not set.
    fn value(&self) -> Option<Real>;

    /// Return `true` if the quote is set to a finite number.
    fn is_valid(&self) -> bool {
        self.value().is_some_and(Real::is_finite)
    }

    /// The value, or `Error::InvalidQuote` if it is unset or not finite.
    fn checked_value(&self) -> Result<Real> {
        match self.value() {
            Some(v) if v.is_finite() => Ok(v),
            Some(v) => Err(Error::InvalidQuote(format!("quote value {v} is not finite"))),
            None => Err(Error::InvalidQuote("quote is not set".into())),
        }
    }
}

/// A market quote that can be moved through a shared reference.
#[derive(Debug, Default)]
pub struct SimpleQuote {
    value: RwLock<Option<Real>>,
    observable: ObservableImpl,
}

impl SimpleQuote {
    /// Create a new quote with the given value.
    pub fn new(value: Real) -> Self {
        Self {
            value: RwLock::new(Some(value)),
            observable: ObservableImpl::new(),
        }
    }

    /// Create an empty (invalid) quote.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set a new value, returning the old one.  Observers are notified only
    /// when the value actually changes.
    pub fn set_value(&self, value: Real) -> Option<Real> {
        self.replace(Some(value))
    }

    /// Clear the value, making the quote invalid.
    pub fn reset(&self) -> Option<Real> {
        self.replace(None)
    }

    fn replace(&self, value: Option<Real>) -> Option<Real> {
        let old = {
            let mut slot = self.value.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *slot, value)
        };
        // notify after the lock is released: observers may read the quote
        if old != value {
            self.observable.notify();
        }
        old
    }
}

impl Observable for SimpleQuote {
    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.observable.register(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.observable.unregister(observer);
    }

    fn notify_observers(&self) {
        self.observable.notify();
    }
}

impl Quote for SimpleQuote {
    fn value(&self) -> Option<Real> {
        *self.value.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counter(AtomicU32);

    impl Observer for Counter {
        fn update(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn simple_quote() {
        let q = SimpleQuote::new(1.05);
        assert!(q.is_valid());
        assert_eq!(q.value(), Some(1.05));
        assert_eq!(q.checked_value(), Ok(1.05));
    }

    #[test]
    fn empty_and_non_finite_quotes_are_invalid() {
        let q = SimpleQuote::empty();
        assert!(!q.is_valid());
        assert!(matches!(q.checked_value(), Err(Error::InvalidQuote(_))));
        q.set_value(f64::NAN);
        assert!(!q.is_valid());
        assert!(matches!(q.checked_value(), Err(Error::InvalidQuote(_))));
    }

    #[test]
    fn changes_notify_observers() {
        let q = SimpleQuote::new(0.01);
        let counter = Arc::new(Counter::default());
        let weak: Weak<dyn Observer> = Arc::downgrade(&counter) as Weak<dyn Observer>;
        q.register_observer(weak.clone());

        assert_eq!(q.set_value(0.02), Some(0.01));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        // same value: no notification
        q.set_value(0.02);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        q.reset();
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);

        q.unregister_observer(&weak);
        q.set_value(0.03);
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }
}
