//! Matrices and 2D affine transforms.

use core::fmt::{self, Debug, Formatter};

use crate::math::approx::ApproxEq;
use crate::math::vec::{Vec2, vec2};

/// A generic matrix type, stored in row-major order.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq)]
pub struct Matrix<Repr>(pub Repr);

/// A 2×3 matrix representing an affine map of the plane.
///
/// The last column is the translation part; a point `p` is mapped to
/// ```text
/// ⎛ a b tx ⎞ ⎛ px ⎞
/// ⎝ c d ty ⎠ ⎜ py ⎟
///            ⎝  1 ⎠
/// ```
pub type Mat2x3 = Matrix<[[f32; 3]; 2]>;

/// The transform applied to every vertex before rasterization.
pub type Transform = Mat2x3;

impl Mat2x3 {
    /// Returns the identity transform.
    pub const fn identity() -> Self {
        Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
    }

    /// Returns the composite of `self` and `other`, which first applies
    /// `other` and then `self`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        let [[a, b, c], [d, e, f]] = self.0;
        let [[g, h, i], [j, k, l]] = other.0;
        Self([
            [a * g + b * j, a * h + b * k, a * i + b * l + c],
            [d * g + e * j, d * h + e * k, d * i + e * l + f],
        ])
    }

    /// Returns the composite of `self` and `other`, which first applies
    /// `self` and then `other`.
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        other.compose(self)
    }

    /// Maps the point `p` by `self`.
    #[inline]
    pub fn apply(&self, p: &Vec2) -> Vec2 {
        let [[a, b, tx], [c, d, ty]] = self.0;
        vec2(a * p.x() + b * p.y() + tx, c * p.x() + d * p.y() + ty)
    }

    /// Returns the determinant of the linear part of `self`.
    pub fn determinant(&self) -> f32 {
        let [[a, b, _], [c, d, _]] = self.0;
        a * d - b * c
    }

    /// Returns whether `self` is exactly the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

#[cfg(feature = "fp")]
impl Mat2x3 {
    /// Returns an estimate of the linear scale factor of `self`.
    ///
    /// This is the square root of the absolute value of the determinant,
    /// the factor by which `self` scales lengths on average.
    pub fn scale_factor(&self) -> f32 {
        use crate::math::float::f32;
        f32::sqrt(self.determinant().abs())
    }
}

/// Returns a transform that scales by `s`.
pub const fn scale(s: Vec2) -> Transform {
    Matrix([[s.0[0], 0.0, 0.0], [0.0, s.0[1], 0.0]])
}

/// Returns a transform that translates by `t`.
pub const fn translate(t: Vec2) -> Transform {
    Matrix([[1.0, 0.0, t.0[0]], [0.0, 1.0, t.0[1]]])
}

/// Returns a transform that rotates by `rads` radians.
///
/// With y pointing down, positive angles rotate clockwise on screen.
#[cfg(feature = "fp")]
pub fn rotate(rads: f32) -> Transform {
    use crate::math::float::f32;
    let (s, c) = (f32::sin(rads), f32::cos(rads));
    Matrix([[c, -s, 0.0], [s, c, 0.0]])
}

impl Default for Mat2x3 {
    /// Returns the identity transform.
    fn default() -> Self {
        Self::identity()
    }
}

impl<S: Debug, const M: usize, const N: usize> Debug for Matrix<[[S; N]; M]> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix[")?;
        for row in &self.0 {
            writeln!(f, "    {row:?}")?;
        }
        write!(f, "]")
    }
}

impl<const M: usize, const N: usize> ApproxEq for Matrix<[[f32; N]; M]> {
    fn approx_eq_eps(&self, other: &Self, eps: f32) -> bool {
        self.0.approx_eq_eps(&other.0, eps)
    }
}
