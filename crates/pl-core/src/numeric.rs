use crate::{CoreError, CoreResult};

/// Floating point type used throughout the simulator.
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparisons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    pub const fn new(abs: Real, rel: Real) -> Self {
        Self { abs, rel }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Number of whole `dt` intervals that fit in `span`, i.e. `floor(span / dt)`.
///
/// Returns `None` when the quotient is NaN, negative or does not fit a `usize`.
pub fn whole_steps(span: Real, dt: Real) -> Option<usize> {
    let n = (span / dt).floor();
    // usize::MAX rounds up to 2^64 as f64, so `<` keeps the cast exact.
    if n.is_nan() || n < 0.0 || n >= usize::MAX as Real {
        return None;
    }
    Some(n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances::new(1e-12, 1e-9);
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_finite_detects_infinity() {
        assert!(ensure_finite(Real::INFINITY, "test").is_err());
        assert_eq!(ensure_finite(2.5, "test").unwrap(), 2.5);
    }

    #[test]
    fn whole_steps_floors() {
        assert_eq!(whole_steps(10.0, 0.5), Some(20));
        assert_eq!(whole_steps(1.0, 0.3), Some(3));
        assert_eq!(whole_steps(0.25, 0.5), Some(0));
    }

    #[test]
    fn whole_steps_rejects_unrepresentable_counts() {
        assert_eq!(whole_steps(1e300, 1e-10), None);
        assert_eq!(whole_steps(1.0, 0.0), None);
        assert_eq!(whole_steps(-1.0, 0.5), None);
        assert_eq!(whole_steps(Real::NAN, 0.5), None);
    }

    proptest! {
        #[test]
        fn nearly_equal_is_symmetric(a in -1e6_f64..1e6, b in -1e6_f64..1e6) {
            let tol = Tolerances::default();
            prop_assert_eq!(nearly_equal(a, b, tol), nearly_equal(b, a, tol));
        }
    }
}
