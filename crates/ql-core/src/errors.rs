//! Error types shared by every crate in the workspace.
//!
//! A single `thiserror`-derived enum covers the whole bootstrapping stack:
//! ordering problems detected before solving, evaluation failures raised by
//! helpers, per-instrument bootstrap failures and query-time extrapolation
//! errors.  The `ensure!` and `fail!` macros are shorthands for the common
//! precondition and runtime cases.

use thiserror::Error;

/// The top-level error type used throughout the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Date-related error (out of range, invalid components, ...).
    #[error("date error: {0}")]
    Date(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Calibration pillars are not strictly increasing, collide, or precede
    /// the curve's reference date.  Detected before any solving begins.
    #[error("ordering error: {0}")]
    Ordering(String),

    /// A helper cannot be valued against the (possibly partial) curve.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// A quote is unset or not finite.
    #[error("invalid quote: {0}")]
    InvalidQuote(String),

    /// A 1-D solver could not find a root (no bracket, stagnation, or
    /// evaluation budget exhausted).
    #[error("convergence failure: {0}")]
    Convergence(String),

    /// The root-find for one calibrating instrument failed.
    ///
    /// `position` is zero-based within the sorted helper set; the message
    /// reports it as an ordinal.
    #[error(
        "could not bootstrap the {} instrument (pillar {pillar}, quote {quote}): {reason}",
        ordinal(.position + 1)
    )]
    Bootstrap {
        /// Zero-based position of the helper after sorting by pillar.
        position: usize,
        /// Pillar date of the offending helper, formatted.
        pillar: String,
        /// Market quote of the offending helper.
        quote: f64,
        /// Underlying failure.
        reason: String,
    },

    /// A query fell outside the curve's node range with extrapolation
    /// disabled.  Recoverable by the caller.
    #[error("extrapolation error: {0}")]
    Extrapolation(String),
}

impl Error {
    /// Return `true` for errors raised while building a curve, as opposed to
    /// per-query failures.
    pub fn is_bootstrap_time(&self) -> bool {
        matches!(
            self,
            Error::Ordering(_)
                | Error::Evaluation(_)
                | Error::InvalidQuote(_)
                | Error::Bootstrap { .. }
        )
    }
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// English ordinal for a one-based position: `1st`, `2nd`, `3rd`, `11th`, ...
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Return `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ql_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Precondition(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Return `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use ql_core::{fail, errors::Error};
/// fn always_err() -> ql_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(102), "102nd");
    }

    #[test]
    fn bootstrap_error_names_the_instrument() {
        let err = Error::Bootstrap {
            position: 2,
            pillar: "2 January 2024".into(),
            quote: 0.0449,
            reason: "no bracket".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("3rd instrument"), "{msg}");
        assert!(msg.contains("2 January 2024"), "{msg}");
        assert!(msg.contains("0.0449"), "{msg}");
        assert!(err.is_bootstrap_time());
    }

    #[test]
    fn extrapolation_is_query_time() {
        let err = Error::Extrapolation("beyond max date".into());
        assert!(!err.is_bootstrap_time());
    }
}
