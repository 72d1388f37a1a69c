//! # quantlib-bootstrap
//!
//! Piecewise term-structure bootstrapping: yield curves from deposits,
//! FRAs, futures and swaps; zero-coupon and year-on-year inflation curves
//! from inflation swaps.
//!
//! This crate is a **façade** that re-exports the underlying workspace
//! crates. Application code should depend on this crate rather than the
//! individual `ql-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use quantlib_bootstrap::core::Handle;
//! use quantlib_bootstrap::quotes::{Quote, SimpleQuote};
//! use quantlib_bootstrap::termstructures::{
//!     BootstrapConfig, DepositRateHelper, PiecewiseConstantForwards, RateHelper,
//!     YieldTermStructure,
//! };
//! use quantlib_bootstrap::time::{Actual360, Date};
//!
//! let today = Date::from_ymd(2023, 1, 2).unwrap();
//! let deposit = |rate: f64, maturity: Date| -> Arc<dyn RateHelper> {
//!     let quote = Handle::from_arc(Arc::new(SimpleQuote::new(rate)) as Arc<dyn Quote>);
//!     Arc::new(DepositRateHelper::new(quote, today, maturity, Actual360).unwrap())
//! };
//! let helpers = vec![
//!     deposit(0.0438, Date::from_ymd(2023, 2, 2).unwrap()),
//!     deposit(0.0449, Date::from_ymd(2023, 4, 3).unwrap()),
//! ];
//! let config = BootstrapConfig::default();
//! let curve = PiecewiseConstantForwards::constant_forwards(today, helpers, Actual360, config)
//!     .unwrap();
//! let df = curve.discount(Date::from_ymd(2023, 3, 1).unwrap()).unwrap();
//! assert!(df < 1.0 && df > 0.99);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use ql_core as core;

/// Date, calendar, day counter, and schedule types.
pub use ql_time as time;

/// Interpolation and 1-D solvers.
pub use ql_math as math;

/// Market quotes.
pub use ql_quotes as quotes;

/// Inflation indexes and historical fixings.
pub use ql_indexes as indexes;

/// Term structures, helpers and the bootstrapper.
pub use ql_termstructures as termstructures;
