//! Blending of source colors with the existing contents of a target.
//!
//! A [`Blender`] combines a *source* color `s` (the color being drawn) with
//! a *destination* color `d` (the color already in the target) as
//! ```text
//! result = op(s * src_factor, d * dst_factor)
//! ```
//! separately for the color channels and the alpha channel, clamping the
//! result to 0.0..=1.0.

use core::array;

use crate::math::color::{Color4f, rgba};

/// The operation combining the weighted source and destination colors.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum BlendOp {
    /// `s + d`
    #[default]
    Add,
    /// `s - d`
    SrcMinusDst,
    /// `d - s`
    DstMinusSrc,
}

/// The weight by which the source or destination color is multiplied.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BlendFactor {
    /// 0
    Zero,
    /// 1
    One,
    /// The source alpha.
    Alpha,
    /// One minus the source alpha.
    InverseAlpha,
    /// The source color.
    SrcColor,
    /// The destination color.
    DstColor,
    /// One minus the source color.
    InverseSrcColor,
    /// One minus the destination color.
    InverseDstColor,
    /// The blend color of the blender.
    ConstColor,
    /// One minus the blend color of the blender.
    InverseConstColor,
}

/// Blending state: separate operations and factors for the color and alpha
/// channels, plus a constant blend color.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Blender {
    /// Operation for the red, green and blue channels.
    pub op: BlendOp,
    /// Source factor for the red, green and blue channels.
    pub src: BlendFactor,
    /// Destination factor for the red, green and blue channels.
    pub dst: BlendFactor,
    /// Operation for the alpha channel.
    pub alpha_op: BlendOp,
    /// Source factor for the alpha channel.
    pub src_alpha: BlendFactor,
    /// Destination factor for the alpha channel.
    pub dst_alpha: BlendFactor,
    /// The constant color used by `ConstColor` and `InverseConstColor`.
    pub color: Color4f,
}

use BlendFactor::*;
use BlendOp::*;

impl Blender {
    /// The blender that replaces the destination with the source.
    ///
    /// Rasterizers detect this blender and write pixels directly without
    /// reading the destination.
    pub const IDENTITY: Self = Self::new(Add, One, Zero);

    /// Blending for premultiplied alpha, `s + (1 - s.a) * d`.
    pub const PREMULTIPLIED: Self = Self::new(Add, One, InverseAlpha);

    /// Blending for straight alpha, `s.a * s + (1 - s.a) * d`.
    pub const ALPHA: Self = Self::new(Add, Alpha, InverseAlpha);

    /// Additive blending, `s + d`.
    pub const ADDITIVE: Self = Self::new(Add, One, One);

    /// Returns a blender using the same operation and factors for the color
    /// and alpha channels, with white as the blend color.
    pub const fn new(op: BlendOp, src: BlendFactor, dst: BlendFactor) -> Self {
        Self {
            op,
            src,
            dst,
            alpha_op: op,
            src_alpha: src,
            dst_alpha: dst,
            color: rgba(1.0, 1.0, 1.0, 1.0),
        }
    }

    /// Returns `self` with the alpha channel operation and factors replaced.
    #[must_use]
    pub const fn with_alpha(
        self,
        op: BlendOp,
        src: BlendFactor,
        dst: BlendFactor,
    ) -> Self {
        Self {
            alpha_op: op,
            src_alpha: src,
            dst_alpha: dst,
            ..self
        }
    }

    /// Returns `self` with the blend color replaced.
    #[must_use]
    pub const fn with_color(self, color: Color4f) -> Self {
        Self { color, ..self }
    }

    /// Returns whether `self` writes the source color unmodified.
    pub fn is_identity(&self) -> bool {
        self.op == Add
            && self.alpha_op == Add
            && self.src == One
            && self.src_alpha == One
            && self.dst == Zero
            && self.dst_alpha == Zero
            && self.color.is_white()
    }

    /// Blends the source color `src` with the destination color `dst`.
    #[inline]
    pub fn blend(&self, src: Color4f, dst: Color4f) -> Color4f {
        let c = self.color;
        let ch = |i: usize| {
            let (op, sf, df) = if i < 3 {
                (self.op, self.src, self.dst)
            } else {
                (self.alpha_op, self.src_alpha, self.dst_alpha)
            };
            let s = src.0[i] * factor(sf, src, dst, c, i);
            let d = dst.0[i] * factor(df, src, dst, c, i);
            let res = match op {
                Add => s + d,
                SrcMinusDst => s - d,
                DstMinusSrc => d - s,
            };
            res.clamp(0.0, 1.0)
        };
        Color4f::from(array::from_fn(ch))
    }
}

impl Default for Blender {
    /// Returns the premultiplied alpha blender, [`Blender::PREMULTIPLIED`].
    fn default() -> Self {
        Self::PREMULTIPLIED
    }
}

/// Returns the weight of channel `i` for factor `f`.
#[inline]
fn factor(f: BlendFactor, s: Color4f, d: Color4f, c: Color4f, i: usize) -> f32 {
    match f {
        Zero => 0.0,
        One => 1.0,
        Alpha => s.a(),
        InverseAlpha => 1.0 - s.a(),
        SrcColor => s.0[i],
        DstColor => d.0[i],
        InverseSrcColor => 1.0 - s.0[i],
        InverseDstColor => 1.0 - d.0[i],
        ConstColor => c.0[i],
        InverseConstColor => 1.0 - c.0[i],
    }
}
