//! Floating-point functions for `no_std` builds.
//!
//! `core` lacks most `f32` methods. Code needing them imports the `f32`
//! item of this module and calls, for example, `f32::floor(x)`:
//!
//! * with the `std` feature, `f32` is the primitive type itself;
//! * with `libm` or `mm`, it is a module forwarding to that crate;
//! * with none of them, it is [`fallback`], which covers only what the
//!   rasterizers need: rounding and the square root.

#[cfg(feature = "libm")]
pub mod libm {
    #[inline]
    pub fn floor(x: f32) -> f32 {
        libm::floorf(x)
    }
    #[inline]
    pub fn ceil(x: f32) -> f32 {
        libm::ceilf(x)
    }
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        libm::sqrtf(x)
    }
    #[inline]
    pub fn sin(x: f32) -> f32 {
        libm::sinf(x)
    }
    #[inline]
    pub fn cos(x: f32) -> f32 {
        libm::cosf(x)
    }
    #[inline]
    pub fn atan2(y: f32, x: f32) -> f32 {
        libm::atan2f(y, x)
    }
    pub use super::fallback::rem_euclid;
}

#[cfg(feature = "mm")]
pub mod mm {
    use micromath::F32Ext;

    #[inline]
    pub fn floor(x: f32) -> f32 {
        F32Ext::floor(x)
    }
    #[inline]
    pub fn ceil(x: f32) -> f32 {
        F32Ext::ceil(x)
    }
    /// Returns the square root of `x`, refined from micromath's estimate.
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        super::fallback::newton_sqrt(x, F32Ext::sqrt(x), 2)
    }
    #[inline]
    pub fn sin(x: f32) -> f32 {
        F32Ext::sin(x)
    }
    #[inline]
    pub fn cos(x: f32) -> f32 {
        F32Ext::cos(x)
    }
    /// Returns the four-quadrant arctangent of `y / x`; zero at the origin.
    #[inline]
    pub fn atan2(y: f32, x: f32) -> f32 {
        if x == 0.0 && y == 0.0 {
            0.0
        } else {
            F32Ext::atan2(y, x)
        }
    }
    pub use super::fallback::rem_euclid;
}

pub mod fallback {
    /// Magnitude above which every `f32` is an integer.
    const INTEGRAL: f32 = 8_388_608.0; // 2^23

    /// Returns the largest integer less than or equal to `x`.
    #[inline]
    pub fn floor(x: f32) -> f32 {
        if x.is_nan() || x.abs() >= INTEGRAL {
            return x;
        }
        let t = x as i32 as f32;
        if t > x { t - 1.0 } else { t }
    }

    /// Returns the smallest integer greater than or equal to `x`.
    #[inline]
    pub fn ceil(x: f32) -> f32 {
        -floor(-x)
    }

    /// Returns `x` mod `m` in `[0, |m|)`.
    #[inline]
    pub fn rem_euclid(x: f32, m: f32) -> f32 {
        let r = x % m;
        if r < 0.0 { r + m.abs() } else { r }
    }

    /// Returns the square root of `x`, accurate to a few ulps.
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        if x.is_nan() || x < 0.0 {
            return f32::NAN;
        }
        if x == 0.0 || x == f32::INFINITY {
            return x;
        }
        // Halving the exponent bits gives an estimate within about 6%
        let guess = f32::from_bits((x.to_bits() >> 1) + 0x1FC0_0000);
        newton_sqrt(x, guess, 4)
    }

    /// Improves the estimate `y` of the square root of `x` by `n` rounds
    /// of Newton's method.
    #[inline]
    pub(crate) fn newton_sqrt(x: f32, mut y: f32, n: u32) -> f32 {
        if y == 0.0 {
            return y;
        }
        for _ in 0..n {
            y = 0.5 * (y + x / y);
        }
        y
    }
}

#[cfg(feature = "std")]
#[allow(non_camel_case_types)]
pub type f32 = core::primitive::f32;

#[cfg(all(feature = "libm", not(feature = "std")))]
pub use libm as f32;

#[cfg(all(feature = "mm", not(feature = "std"), not(feature = "libm")))]
pub use mm as f32;

#[cfg(not(feature = "fp"))]
pub use fallback as f32;
