//! Compounding conventions.

/// How interest is compounded when converting between rates and discount
/// factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compounding {
    /// Simple interest: `1 + r·t`.
    Simple,
    /// Compounded interest: `(1 + r/f)^(f·t)`.
    Compounded,
    /// Continuously compounded: `e^(r·t)`.
    #[default]
    Continuous,
    /// Simple up to the first period, compounded thereafter.
    SimpleThenCompounded,
}
