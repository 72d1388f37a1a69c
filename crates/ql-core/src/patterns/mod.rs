//! Patterns sub-module: observable, lazy_object.

pub mod lazy_object;
pub mod observable;

pub use lazy_object::{LazyObject, LazyState};
pub use observable::{Observable, ObservableImpl, Observer};
