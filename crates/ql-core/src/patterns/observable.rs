//! Observer / Observable pattern.
//!
//! Quotes notify the curves built on them when their value changes.  Curves
//! register a `Weak` observer so the notification graph never keeps a curve
//! alive, and a dropped curve is pruned on the next notification.
//!
//! The observer list sits behind a `Mutex` so observables can be shared
//! across threads (`Send + Sync`), matching how quotes are handed out as
//! `Arc<dyn Quote>`.

use std::sync::{Arc, Mutex, PoisonError, Weak};

/// An object that notifies registered observers whenever it changes.
pub trait Observable {
    /// Register an observer to receive future change notifications.
    fn register_observer(&self, observer: Weak<dyn Observer>);

    /// Remove a previously registered observer.
    fn unregister_observer(&self, observer: &Weak<dyn Observer>);

    /// Notify all currently registered observers.
    fn notify_observers(&self);
}

/// An object that reacts to changes in the observables it subscribed to.
pub trait Observer: Send + Sync {
    /// Called by every observable this observer is registered with when that
    /// observable changes state.
    fn update(&self);
}

/// Embeddable observer-list bookkeeping.
#[derive(Default)]
pub struct ObservableImpl {
    observers: Mutex<Vec<Weak<dyn Observer>>>,
}

impl ObservableImpl {
    /// Create a new, empty observer list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.  Registering the same observer twice is a no-op.
    pub fn register(&self, observer: Weak<dyn Observer>) {
        let mut list = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        if !list.iter().any(|o| Weak::ptr_eq(o, &observer)) {
            list.push(observer);
        }
    }

    /// Remove an observer (by pointer equality of the `Weak`).
    pub fn unregister(&self, observer: &Weak<dyn Observer>) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|o| !Weak::ptr_eq(o, observer));
    }

    /// Notify all live observers, pruning dead references.
    ///
    /// The lock is released before `update` runs, so an observer may query
    /// (or re-register with) this observable from inside its callback.
    pub fn notify(&self) {
        let live: Vec<Arc<dyn Observer>> = {
            let mut list = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
            list.retain(|w| w.strong_count() > 0);
            list.iter().filter_map(Weak::upgrade).collect()
        };
        for obs in live {
            obs.update();
        }
    }

    /// Number of registered observers that are still alive.
    pub fn len(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Return `true` if no live observer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ObservableImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObservableImpl({} observers)", self.len())
    }
}
