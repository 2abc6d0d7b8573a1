//! Approximate equality of floating-point values.
//!
//! The rasterizers step interpolated colors and texture coordinates
//! incrementally, so the values they produce carry rounding error and
//! rarely equal a value computed in closed form. Tests compare them with
//! [`assert_approx_eq!`][crate::assert_approx_eq] instead of `assert_eq!`.

/// The default tolerance of [`ApproxEq::approx_eq`].
///
/// The software square root of `fallback` builds is less accurate than
/// that of `std` or `libm`, hence the looser tolerance.
pub const EPSILON: f32 = if cfg!(any(feature = "std", feature = "libm")) {
    1e-6
} else {
    5e-3
};

/// Approximate equality, for values made of `f32` components.
///
/// Two numbers `a` and `b` are approximately equal with tolerance `eps`
/// if `|a - b| <= eps * max(|a|, 1)`: the tolerance is relative for large
/// magnitudes and absolute near zero. Compound values are approximately
/// equal if all their components are. NaN is not approximately equal to
/// anything.
pub trait ApproxEq<Other: ?Sized = Self> {
    /// Returns whether `self` and `other` are equal within [`EPSILON`].
    fn approx_eq(&self, other: &Other) -> bool {
        self.approx_eq_eps(other, EPSILON)
    }

    /// Returns whether `self` and `other` are equal within `eps`.
    fn approx_eq_eps(&self, other: &Other, eps: f32) -> bool;
}

impl ApproxEq for f32 {
    fn approx_eq_eps(&self, other: &Self, eps: f32) -> bool {
        (self - other).abs() <= eps * self.abs().max(1.0)
    }
}

impl<T: ApproxEq> ApproxEq for [T] {
    fn approx_eq_eps(&self, other: &Self, eps: f32) -> bool {
        self.len() == other.len()
            && self.iter().zip(other).all(|(a, b)| a.approx_eq_eps(b, eps))
    }
}

impl<T: ApproxEq, const N: usize> ApproxEq for [T; N] {
    fn approx_eq_eps(&self, other: &Self, eps: f32) -> bool {
        self[..].approx_eq_eps(&other[..], eps)
    }
}

/// Asserts that two values are approximately equal.
///
/// The left operand must implement [`ApproxEq`] and both must implement
/// `Debug`, unless a custom message is given.
///
/// # Panics
/// If the values are not approximately equal.
///
/// # Examples
/// ```
/// # use softprim_core::assert_approx_eq;
/// assert_ne!(0.1 + 0.2, 0.3);
/// assert_approx_eq!(0.1 + 0.2, 0.3);
/// ```
/// A custom tolerance comes before a custom message, if any:
/// ```should_panic
/// # use softprim_core::assert_approx_eq;
/// assert_approx_eq!(100.0, 101.0, eps = 0.01);
/// assert_approx_eq!(0.5, 0.6, eps = 0.001, "{} is not half", 0.6);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr $(, eps = $eps:expr)?) => {
        $crate::assert_approx_eq!(
            $a, $b $(, eps = $eps)?,
            "`{:?}` is not approximately `{:?}`", $a, $b
        )
    };
    ($a:expr, $b:expr, $fmt:literal $($args:tt)*) => {
        $crate::assert_approx_eq!(
            $a, $b, eps = $crate::math::approx::EPSILON, $fmt $($args)*
        )
    };
    ($a:expr, $b:expr, eps = $eps:expr, $fmt:literal $($args:tt)*) => {{
        use $crate::math::approx::ApproxEq;
        match (&$a, &$b) {
            (a, b) => {
                assert!(ApproxEq::approx_eq_eps(a, b, $eps), $fmt $($args)*)
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_zeros() {
        assert_approx_eq!(0.0, -0.0);
        assert_approx_eq!(-0.0, 0.0);
    }

    #[test]
    fn accumulated_steps() {
        // Ten gradient steps of 0.1
        let acc = (0..10).fold(0.0f32, |acc, _| acc + 0.1);
        assert_ne!(acc, 1.0);
        assert_approx_eq!(acc, 1.0);
    }

    #[test]
    fn tolerance_scales_with_magnitude() {
        assert!(1.0e7f32.approx_eq(&(1.0e7 + 1.0)));
        assert!(!1.0f32.approx_eq_eps(&1.1, 0.01));
        assert!(255.0f32.approx_eq_eps(&254.0, 0.01));
        assert!(0.5f32.approx_eq_eps(&0.504, 0.01));
    }

    #[test]
    fn nan_is_never_equal() {
        assert!(!f32::NAN.approx_eq(&f32::NAN));
        assert!(!f32::NAN.approx_eq_eps(&0.0, f32::INFINITY));
    }

    #[test]
    fn arrays_and_slices() {
        assert_approx_eq!([0.25, 0.5], [0.25, 0.5000001]);
        assert!(![0.25f32][..].approx_eq(&[0.25, 0.5][..]));
    }

    #[test]
    #[should_panic(expected = "is not half")]
    fn custom_message() {
        assert_approx_eq!(0.5, 0.6, eps = 0.001, "{} is not half", 0.6);
    }
}
