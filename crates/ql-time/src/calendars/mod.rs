//! Market calendars with holiday rules.

pub mod target;

pub use target::Target;
