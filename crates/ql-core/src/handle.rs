//! `Handle<T>` and `RelinkableHandle<T>`: shared, non-owning-by-intent
//! references to market objects.
//!
//! Helpers reference quotes and discount curves through handles so that the
//! caller keeps ownership and can re-quote or relink without rebuilding the
//! helper.  Both types accept unsized targets (`Handle<dyn Quote>`).
//!
//! | Type | Backing | Relinkable |
//! |------|---------|------------|
//! | `Handle<T>` | `Option<Arc<T>>` | no |
//! | `RelinkableHandle<T>` | `Arc<RwLock<Option<Arc<T>>>>` | yes, visible to every clone |

use crate::errors::{Error, Result};
use std::sync::{Arc, PoisonError, RwLock};

/// A shared, optionally-null reference to a value of type `T`.
pub struct Handle<T: ?Sized> {
    inner: Option<Arc<T>>,
}

impl<T> Handle<T> {
    /// Create a non-null handle wrapping `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Some(Arc::new(value)),
        }
    }
}

impl<T: ?Sized> Handle<T> {
    /// Create a handle from an existing `Arc`.
    pub fn from_arc(arc: Arc<T>) -> Self {
        Self { inner: Some(arc) }
    }

    /// Create a null (empty) handle.
    pub fn null() -> Self {
        Self { inner: None }
    }

    /// Return `true` if the handle is null.
    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Return the inner `Arc<T>`, or `None` if this handle is null.
    pub fn as_arc(&self) -> Option<&Arc<T>> {
        self.inner.as_ref()
    }

    /// Borrow the contained value, or `None` if the handle is null.
    pub fn get(&self) -> Option<&T> {
        self.inner.as_deref()
    }

    /// Borrow the contained value, failing with `Error::Runtime` when null.
    pub fn current(&self) -> Result<&T> {
        self.inner
            .as_deref()
            .ok_or_else(|| Error::Runtime("empty handle dereferenced".into()))
    }
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: ?Sized> Default for Handle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized> From<Arc<T>> for Handle<T> {
    fn from(arc: Arc<T>) -> Self {
        Self::from_arc(arc)
    }
}

impl<T: ?Sized + std::fmt::Debug> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            Some(v) => write!(f, "Handle({v:?})"),
            None => write!(f, "Handle(null)"),
        }
    }
}

/// A handle whose target can be replaced at runtime.
///
/// Relinking through one clone is visible to every other clone, which is how
/// a caller-owned context hands out curves that can later be rebuilt or
/// swapped.
pub struct RelinkableHandle<T: ?Sized> {
    inner: Arc<RwLock<Option<Arc<T>>>>,
}

impl<T: ?Sized> RelinkableHandle<T> {
    /// Create a new relinkable handle, initially null.
    pub fn null() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a relinkable handle pointing at `arc`.
    pub fn from_arc(arc: Arc<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(arc))),
        }
    }

    /// Point the handle (and all its clones) at `arc`.
    pub fn link_to(&self, arc: Arc<T>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(arc);
    }

    /// Detach the handle from any value.
    pub fn unlink(&self) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    /// Return `true` if the handle currently points at nothing.
    pub fn is_empty(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Snapshot of the current target as a plain [`Handle`].
    pub fn handle(&self) -> Handle<T> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(arc) => Handle::from_arc(Arc::clone(arc)),
            None => Handle::null(),
        }
    }

    /// Run `f` against the current target, or return `None` if unlinked.
    pub fn with<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_deref().map(f)
    }
}

impl<T: ?Sized> Clone for RelinkableHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized> Default for RelinkableHandle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized> std::fmt::Debug for RelinkableHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "RelinkableHandle(null)")
        } else {
            write!(f, "RelinkableHandle(linked)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn name(&self) -> &str;
    }

    struct Fixed(&'static str);

    impl Named for Fixed {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn null_handle_fails_on_current() {
        let h: Handle<f64> = Handle::null();
        assert!(h.is_empty());
        assert!(h.current().is_err());
    }

    #[test]
    fn handle_to_trait_object() {
        let h: Handle<dyn Named> = Handle::from_arc(Arc::new(Fixed("a")));
        assert_eq!(h.current().unwrap().name(), "a");
        let h2 = h.clone();
        assert!(Arc::ptr_eq(h.as_arc().unwrap(), h2.as_arc().unwrap()));
    }

    #[test]
    fn relinking_is_shared_between_clones() {
        let r: RelinkableHandle<dyn Named> = RelinkableHandle::null();
        let other = r.clone();
        assert!(other.is_empty());
        r.link_to(Arc::new(Fixed("first")));
        assert_eq!(other.with(|n| n.name().to_string()).unwrap(), "first");
        r.link_to(Arc::new(Fixed("second")));
        assert_eq!(other.handle().current().unwrap().name(), "second");
        other.unlink();
        assert!(r.handle().is_empty());
    }
}
