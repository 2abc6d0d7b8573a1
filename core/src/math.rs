//! Mathematics needed by the rasterizers.
//!
//! Includes [vectors][self::vec], 2D affine [transforms][mat], RGBA
//! [colors][color], floating-point [compatibility][float] functions for
//! `no_std` targets, and approximate equality comparisons.

pub use {
    approx::ApproxEq,
    color::{Color, Color4, Color4f, rgb, rgba},
    mat::{Mat2x3, Matrix, Transform, scale, translate},
    vec::{Vec2, Vector, splat, vec2},
};
#[cfg(feature = "fp")]
pub use mat::rotate;

pub mod approx;
pub mod color;
pub mod float;
pub mod mat;
pub mod vec;

