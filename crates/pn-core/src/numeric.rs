/// Value returned by residual and loss functions in regions that have no
/// physical meaning (zero diameter, negative branch flow, unsolvable split).
/// Root finders steer away from it.
pub const PENALTY: f64 = 1e12;

/// Anything at or above this is treated as a penalty value when reporting.
pub const PENALTY_THRESHOLD: f64 = 1e10;

/// True if `v` is a penalty marker rather than a physical value.
pub fn is_penalty(v: f64) -> bool {
    !v.is_finite() || v >= PENALTY_THRESHOLD
}

/// `Some(v)` for physical values, `None` for penalties and non-finite values.
pub fn physical(v: f64) -> Option<f64> {
    (!is_penalty(v)).then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penalty_is_detected() {
        assert!(is_penalty(PENALTY));
        assert!(is_penalty(f64::INFINITY));
        assert!(is_penalty(f64::NAN));
        assert!(!is_penalty(42.0));
    }

    #[test]
    fn physical_filters_penalties() {
        assert_eq!(physical(12.5), Some(12.5));
        assert_eq!(physical(PENALTY), None);
        assert_eq!(physical(f64::NAN), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn values_below_threshold_are_physical(v in -1e9..1e9_f64) {
            prop_assert!(!is_penalty(v));
            prop_assert_eq!(physical(v), Some(v));
        }
    }
}
