//! LazyObject pattern: cache an expensive computation and redo it only after
//! an input changed.
//!
//! The bookkeeping lives in [`LazyState`], which uses atomics so the cache
//! can be invalidated through `&self` from any thread (quote notifications
//! may arrive from wherever the quote was set).  An object reports itself
//! calculated only once a calculation has completed against inputs that did
//! not change while it ran.

use crate::errors::{Error, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Trait for objects that lazily compute and cache their results.
pub trait LazyObject {
    /// Perform the actual (expensive) calculation.
    fn perform_calculations(&self) -> Result<()>;

    /// The cache bookkeeping embedded in the implementor.
    fn lazy_state(&self) -> &LazyState;

    /// Ensure results are up to date.
    ///
    /// The cache is marked valid only after
    /// [`perform_calculations`][Self::perform_calculations] succeeds, and
    /// only if no [`update`][Self::update] arrived in the meantime.
    ///
    /// # Errors
    /// The calculation's own error, or [`Error::Evaluation`] when a
    /// calculation is already running (a re-entrant or concurrent query).
    fn calculate(&self) -> Result<()> {
        let state = self.lazy_state();
        if state.is_calculated() {
            return Ok(());
        }
        if state.running.swap(true, Ordering::SeqCst) {
            return Err(Error::Evaluation("calculation already in progress".into()));
        }
        let generation = state.generation.load(Ordering::SeqCst);
        let result = self.perform_calculations();
        if result.is_ok() && state.generation.load(Ordering::SeqCst) == generation {
            state.calculated.store(true, Ordering::SeqCst);
        }
        state.running.store(false, Ordering::SeqCst);
        result
    }

    /// Mark the cached result as stale without recalculating.
    fn update(&self) {
        let state = self.lazy_state();
        state.generation.fetch_add(1, Ordering::SeqCst);
        state.calculated.store(false, Ordering::SeqCst);
    }

    /// Invalidate and recalculate immediately.
    fn recalculate(&self) -> Result<()> {
        self.update();
        self.calculate()
    }

    /// Return `true` if the cache is currently valid.
    fn is_calculated(&self) -> bool {
        self.lazy_state().is_calculated()
    }
}

/// Bookkeeping fields required by [`LazyObject`].
///
/// # Example
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use ql_core::patterns::lazy_object::{LazyObject, LazyState};
///
/// struct Squares {
///     state: LazyState,
///     runs: AtomicU32,
/// }
///
/// impl LazyObject for Squares {
///     fn perform_calculations(&self) -> ql_core::errors::Result<()> {
///         self.runs.fetch_add(1, Ordering::SeqCst);
///         Ok(())
///     }
///     fn lazy_state(&self) -> &LazyState {
///         &self.state
///     }
/// }
///
/// let obj = Squares { state: LazyState::new(), runs: AtomicU32::new(0) };
/// obj.calculate().unwrap();
/// obj.calculate().unwrap();
/// assert_eq!(obj.runs.load(Ordering::SeqCst), 1);
/// obj.update();
/// obj.calculate().unwrap();
/// assert_eq!(obj.runs.load(Ordering::SeqCst), 2);
/// ```
#[derive(Debug, Default)]
pub struct LazyState {
    calculated: AtomicBool,
    running: AtomicBool,
    generation: AtomicU64,
}

impl LazyState {
    /// Create a new state where the cache is initially stale.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `true` if the cache is valid.
    pub fn is_calculated(&self) -> bool {
        self.calculated.load(Ordering::SeqCst)
    }

    /// Return `true` while a calculation is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
