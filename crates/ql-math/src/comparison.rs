//! Floating-point comparisons.

use ql_core::Real;

/// Return `true` if `a` and `b` agree to within `n` ulps of the larger.
#[inline]
pub fn close_enough(a: Real, b: Real, n: u32) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    let tol = n as Real * f64::EPSILON;
    if a == 0.0 || b == 0.0 {
        return diff < tol * tol;
    }
    diff <= tol * a.abs().max(b.abs())
}

/// [`close_enough`] with the customary 42-ulp tolerance.
#[inline]
pub fn close(a: Real, b: Real) -> bool {
    close_enough(a, b, 42)
}

/// Mixed absolute/relative check: `|value - target| <= tolerance` for
/// `|target| <= 1`, relative to `|target|` above that.
#[inline]
pub fn within_tolerance(value: Real, target: Real, tolerance: Real) -> bool {
    (value - target).abs() <= tolerance * target.abs().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ulp_comparisons() {
        assert!(close(1.0, 1.0 + 10.0 * f64::EPSILON));
        assert!(!close(1.0, 1.0 + 1e-12));
        assert!(close(0.0, 0.0));
        assert!(!close(0.0, 1e-10));
    }

    #[test]
    fn tolerance_is_absolute_below_one() {
        assert!(within_tolerance(0.0438 + 5e-6, 0.0438, 1e-5));
        assert!(!within_tolerance(0.0438 + 2e-5, 0.0438, 1e-5));
        // relative on the price scale of futures quotes
        assert!(within_tolerance(95.5 + 5e-4, 95.5, 1e-5));
        assert!(!within_tolerance(95.5 + 2e-3, 95.5, 1e-5));
    }
}
