//! # ql-indexes
//!
//! Market indexes with historical fixings: the `Index` trait, the shared
//! `FixingStore`, and the zero and year-on-year inflation indexes.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `Index` trait and `FixingStore`.
pub mod index;

/// Zero and year-on-year inflation indexes.
pub mod inflation;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use index::{FixingStore, Index};
pub use inflation::{eu_hicp, uk_rpi, us_cpi, YoYInflationIndex, ZeroInflationIndex};
