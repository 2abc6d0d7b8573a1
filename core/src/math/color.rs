//! RGBA colors.

use core::array;
use core::fmt::{self, Debug, Formatter};
use core::ops::{Add, AddAssign, Index, Mul, Sub};

use crate::math::approx::ApproxEq;

//
// Types
//

/// A generic color type, similar to [`Vector`][crate::math::vec::Vector].
///
/// Color components are also called *channels*. All colors are in the RGBA
/// space with straight or premultiplied alpha, depending on the blender.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct Color<Repr>(pub Repr);

/// An RGBA color with `u8` components.
pub type Color4 = Color<[u8; 4]>;

/// An RGBA color with `f32` components normalized to 0.0..=1.0.
///
/// This is the pixel format of [`Bitmap`][crate::render::target::Bitmap]
/// and the color format of [`Vertex`][crate::geom::Vertex].
pub type Color4f = Color<[f32; 4]>;

/// Returns a new RGBA color with `r`, `g`, `b`, and `a` components.
pub const fn rgba<Ch>(r: Ch, g: Ch, b: Ch, a: Ch) -> Color<[Ch; 4]> {
    Color([r, g, b, a])
}

/// Returns a new opaque RGBA color with `r`, `g`, and `b` components.
pub const fn rgb(r: f32, g: f32, b: f32) -> Color4f {
    Color([r, g, b, 1.0])
}

//
// Inherent impls
//

impl Color4 {
    /// Returns a `u32` containing the component bytes of `self`
    /// in format `0xRR_GG_BB_AA`.
    #[inline]
    pub const fn to_rgba_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
    /// Returns a `u32` containing the component bytes of `self`
    /// in format `0xAA_RR_GG_BB`.
    #[inline]
    pub const fn to_argb_u32(self) -> u32 {
        self.to_rgba_u32().rotate_right(8)
    }
}

impl Color4f {
    /// Transparent black.
    pub const TRANSPARENT: Self = rgba(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = rgb(1.0, 1.0, 1.0);

    /// Returns a `Color4` with the components of `self` mapped
    /// to `u8` with `(c.clamp(0.0, 1.0) * 255.0) as u8`.
    #[inline]
    pub fn to_color4(self) -> Color4 {
        Color(self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8))
    }

    /// Returns whether `self` is exactly opaque white.
    ///
    /// Tinting a texel with white is a no-op, so the textured rasterizers
    /// use this to select an untinted fast path.
    #[inline]
    pub fn is_white(&self) -> bool {
        *self == Self::WHITE
    }

    /// Returns the component-wise product of `self` and `other`.
    #[inline]
    pub fn mul_color(self, other: Self) -> Self {
        Color(array::from_fn(|i| self.0[i] * other.0[i]))
    }

    /// Returns `self` with every component clamped to 0.0..=1.0.
    #[inline]
    pub fn clamp(self) -> Self {
        Color(self.0.map(|c| c.clamp(0.0, 1.0)))
    }
}

impl<Sc: Copy> Color<[Sc; 4]> {
    /// Returns the red component of `self`.
    pub fn r(&self) -> Sc {
        self.0[0]
    }
    /// Returns the green component of `self`.
    pub fn g(&self) -> Sc {
        self.0[1]
    }
    /// Returns the blue component of `self`.
    pub fn b(&self) -> Sc {
        self.0[2]
    }
    /// Returns the alpha component of `self`.
    pub fn a(&self) -> Sc {
        self.0[3]
    }
}

//
// Foreign trait impls
//

impl<R: Debug> Debug for Color<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Color<Rgba>{:?}", self.0)
    }
}

impl<R> From<R> for Color<R> {
    #[inline]
    fn from(els: R) -> Self {
        Self(els)
    }
}

impl<Sc, const N: usize> Index<usize> for Color<[Sc; N]> {
    type Output = Sc;
    fn index(&self, i: usize) -> &Sc {
        &self.0[i]
    }
}

impl Add for Color4f {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Color(array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}
impl AddAssign for Color4f {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl Sub for Color4f {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Color(array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}
impl Mul<f32> for Color4f {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Color(self.0.map(|c| c * rhs))
    }
}

impl ApproxEq for Color4f {
    fn approx_eq_eps(&self, other: &Self, eps: f32) -> bool {
        self.0.approx_eq_eps(&other.0, eps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_components() {
        assert_eq!(rgba(0xFF, 0, 0, 0).r(), 0xFF);
        assert_eq!(rgba(0, 0xFF, 0, 0).g(), 0xFF);
        assert_eq!(rgba(0, 0, 0xFF, 0).b(), 0xFF);
        assert_eq!(rgba(0, 0, 0, 0xFF).a(), 0xFF);
        assert_eq!(rgb(0.1, 0.2, 0.3).a(), 1.0);
    }
    #[test]
    fn rgba_to_u32() {
        assert_eq!(rgba(0x11, 0x22, 0x33, 0x44).to_rgba_u32(), 0x11_22_33_44);
        assert_eq!(rgba(0x11, 0x22, 0x33, 0x44).to_argb_u32(), 0x44_11_22_33);
    }
    #[test]
    fn float_to_bytes_clamps() {
        let c = rgba(-1.0, 0.0, 1.0, 2.0).to_color4();
        assert_eq!(c, rgba(0, 0, 255, 255));
    }
    #[test]
    fn white_and_modulate() {
        assert!(Color4f::WHITE.is_white());
        assert!(!rgba(1.0, 1.0, 1.0, 0.5).is_white());

        let c = rgba(0.5, 1.0, 0.25, 1.0);
        assert_eq!(c.mul_color(Color4f::WHITE), c);
        assert_eq!(c.mul_color(Color4f::TRANSPARENT), Color4f::TRANSPARENT);
    }
    #[test]
    fn arithmetic() {
        let a = rgba(0.25, 0.5, 0.75, 1.0);
        assert_eq!(a + a, rgba(0.5, 1.0, 1.5, 2.0));
        assert_eq!(a - a, Color4f::TRANSPARENT);
        assert_eq!(a * 2.0, rgba(0.5, 1.0, 1.5, 2.0));
        assert_eq!((a * 2.0).clamp(), rgba(0.5, 1.0, 1.0, 1.0));
    }
}
