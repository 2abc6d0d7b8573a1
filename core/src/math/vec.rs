//! Two-dimensional vectors.

use core::array;
use core::fmt::{self, Debug, Formatter};
use core::ops::{Add, AddAssign, Index, Mul, Neg, Sub, SubAssign};

use crate::math::approx::ApproxEq;

//
// Types
//

/// A generic vector type. The representation is typically an array
/// of scalars.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct Vector<Repr>(pub Repr);

/// A 2-vector with `f32` components.
pub type Vec2 = Vector<[f32; 2]>;

/// Returns a real 2-vector with components `x` and `y`.
#[inline]
pub const fn vec2<Sc>(x: Sc, y: Sc) -> Vector<[Sc; 2]> {
    Vector([x, y])
}

/// Returns a vector with all components equal to `s`.
#[inline]
pub const fn splat(s: f32) -> Vec2 {
    Vector([s, s])
}

//
// Inherent impls
//

impl<Sc: Copy> Vector<[Sc; 2]> {
    /// Returns the x component of `self`.
    #[inline]
    pub const fn x(&self) -> Sc {
        self.0[0]
    }
    /// Returns the y component of `self`.
    #[inline]
    pub const fn y(&self) -> Sc {
        self.0[1]
    }
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = vec2(0.0, 0.0);

    /// Returns the dot product of `self` and `other`.
    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x() * other.x() + self.y() * other.y()
    }

    /// Returns the z component of the cross product of `self` and `other`
    /// taken as 3-vectors with z = 0. Also known as the perp-dot product.
    ///
    /// In the y-down screen space used by the rasterizers, the result is
    /// positive if `other` is clockwise from `self`.
    #[inline]
    pub fn cross(&self, other: &Self) -> f32 {
        self.x() * other.y() - self.y() * other.x()
    }

    /// Returns the squared length of `self`.
    #[inline]
    pub fn len_sqr(&self) -> f32 {
        self.dot(self)
    }

    /// Returns the length of `self`.
    #[inline]
    pub fn len(&self) -> f32 {
        use crate::math::float::f32;
        f32::sqrt(self.len_sqr())
    }

    /// Returns `self` rotated 90 degrees, `(-y, x)`.
    #[inline]
    pub fn perp(&self) -> Self {
        vec2(-self.y(), self.x())
    }

    /// Returns the component-wise minimum of `self` and `other`.
    pub fn min(&self, other: &Self) -> Self {
        vec2(self.x().min(other.x()), self.y().min(other.y()))
    }

    /// Returns the component-wise maximum of `self` and `other`.
    pub fn max(&self, other: &Self) -> Self {
        vec2(self.x().max(other.x()), self.y().max(other.y()))
    }
}

//
// Foreign trait impls
//

impl<Sc: Debug, const N: usize> Debug for Vector<[Sc; N]> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Vec{:?}", self.0)
    }
}

impl<Sc, const N: usize> From<[Sc; N]> for Vector<[Sc; N]> {
    #[inline]
    fn from(els: [Sc; N]) -> Self {
        Self(els)
    }
}

impl<Sc, const N: usize> Index<usize> for Vector<[Sc; N]> {
    type Output = Sc;
    #[inline]
    fn index(&self, i: usize) -> &Sc {
        &self.0[i]
    }
}

impl<const N: usize> Add for Vector<[f32; N]> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}
impl<const N: usize> Sub for Vector<[f32; N]> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}
impl<const N: usize> Mul<f32> for Vector<[f32; N]> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self(self.0.map(|c| c * rhs))
    }
}
impl<const N: usize> Neg for Vector<[f32; N]> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(self.0.map(|c| -c))
    }
}
impl<const N: usize> AddAssign for Vector<[f32; N]> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl<const N: usize> SubAssign for Vector<[f32; N]> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<const N: usize> ApproxEq for Vector<[f32; N]> {
    fn approx_eq_eps(&self, other: &Self, eps: f32) -> bool {
        self.0.approx_eq_eps(&other.0, eps)
    }
}
