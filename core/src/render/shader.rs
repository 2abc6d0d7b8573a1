//! Shading of rasterized pixels.
//!
//! The rasterizers are parameterized by *shaders*, state machines that are
//! told where the rasterizer is going and compute the color of each pixel.
//! Shaders come in four flavors, listed in [`ShaderKind`], and write their
//! pixels through a [`PixelWriter`], either directly ([`Opaque`]) or by
//! blending with the target ([`Blended`]).
//!
//! This module contains the parts shared by the triangle and line shaders:
//! pixel writers, texel lookup, and linear interpolation over a triangle.

use core::ops::Range;

use crate::math::color::Color4f;
use crate::math::vec::{Vec2, Vector};
use crate::util::rect::Rect;

use super::blend::Blender;
use super::stats::Throughput;
use super::target::{Target, Texture};

//
// Traits
//

/// Writes a shaded color into a target pixel.
pub trait PixelWriter: Copy {
    /// Combines `src` with the pixel `dst` and stores the result in `dst`.
    fn write(&self, dst: &mut Color4f, src: Color4f);
}

//
// Types
//

/// Writes pixels directly, replacing the previous contents.
#[derive(Copy, Clone, Debug, Default)]
pub struct Opaque;

/// Writes pixels by blending them with the previous contents.
#[derive(Copy, Clone, Debug)]
pub struct Blended(pub Blender);

/// The shader variants, chosen per draw call.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShaderKind {
    /// Every pixel has the same color.
    Solid,
    /// The color is interpolated between the vertex colors.
    Gradient,
    /// Texels are tinted with the color shared by all vertices,
    /// or untinted if `white`.
    TexturedSolid { white: bool },
    /// Texels are tinted with the interpolated vertex colors.
    TexturedGradient,
}

/// A linear function over the plane, defined by its values at the
/// vertices of a triangle.
///
/// Used to interpolate colors and texture coordinates across triangles.
#[derive(Copy, Clone, Debug)]
pub struct Plane<const N: usize> {
    origin: Vec2,
    at_origin: Vector<[f32; N]>,
    ddx: Vector<[f32; N]>,
    ddy: Vector<[f32; N]>,
}

/// Incrementally evaluates a [`Plane`] at the left edge of each scanline
/// of a triangle.
#[derive(Copy, Clone, Debug)]
pub struct PlaneStepper<const N: usize> {
    plane: Plane<N>,
    cur: Vector<[f32; N]>,
    minor: Vector<[f32; N]>,
    major: Vector<[f32; N]>,
}

//
// Inherent impls
//

impl ShaderKind {
    /// Returns the shader kind suited to a primitive with vertex colors
    /// `colors`, textured or not.
    ///
    /// The gradient variants are only needed if the colors differ.
    pub fn select(colors: &[Color4f], textured: bool) -> Self {
        let gradient = colors.windows(2).any(|w| w[0] != w[1]);
        match (textured, gradient) {
            (false, false) => Self::Solid,
            (false, true) => Self::Gradient,
            (true, false) => Self::TexturedSolid {
                white: colors.first().is_none_or(Color4f::is_white),
            },
            (true, true) => Self::TexturedGradient,
        }
    }
}

impl<const N: usize> Plane<N> {
    /// Returns the plane taking the values `vals[i]` at the points `pos[i]`.
    ///
    /// If the points are collinear, the plane is constant and equal to
    /// `vals[0]`.
    pub fn new(pos: [Vec2; 3], vals: [Vector<[f32; N]>; 3]) -> Self {
        let e1 = pos[1] - pos[0];
        let e2 = pos[2] - pos[0];
        let d = e1.cross(&e2);

        let (ddx, ddy) = if d == 0.0 {
            (Vector([0.0; N]), Vector([0.0; N]))
        } else {
            let dc1 = vals[1] - vals[0];
            let dc2 = vals[2] - vals[0];
            let inv_d = 1.0 / d;
            (
                (dc1 * e2.y() - dc2 * e1.y()) * inv_d,
                (dc2 * e1.x() - dc1 * e2.x()) * inv_d,
            )
        };
        Self { origin: pos[0], at_origin: vals[0], ddx, ddy }
    }

    /// Returns the value of `self` at the center of pixel (x, y).
    #[inline]
    pub fn at(&self, x: i32, y: i32) -> Vector<[f32; N]> {
        let dx = x as f32 + 0.5 - self.origin.x();
        let dy = y as f32 + 0.5 - self.origin.y();
        self.at_origin + self.ddx * dx + self.ddy * dy
    }

    /// Returns the change in value per pixel in the x direction.
    #[inline]
    pub fn ddx(&self) -> Vector<[f32; N]> {
        self.ddx
    }

    /// Returns the change in value per pixel in the y direction.
    #[inline]
    pub fn ddy(&self) -> Vector<[f32; N]> {
        self.ddy
    }
}

impl<const N: usize> Default for Plane<N> {
    /// Returns the constant zero plane.
    fn default() -> Self {
        let zero = Vector([0.0; N]);
        Self {
            origin: Vec2::ZERO,
            at_origin: zero,
            ddx: zero,
            ddy: zero,
        }
    }
}

impl<const N: usize> PlaneStepper<N> {
    /// Returns a stepper evaluating `plane`.
    pub fn new(plane: Plane<N>) -> Self {
        let zero = Vector([0.0; N]);
        Self { plane, cur: zero, minor: zero, major: zero }
    }

    /// Seeds the stepper at pixel (x, y). The left edge advances by
    /// `left_minor` pixels on a minor step and by `left_major` pixels
    /// on a major step.
    pub fn first(&mut self, x: i32, y: i32, left_minor: i32, left_major: i32) {
        let Plane { ddx, ddy, .. } = self.plane;
        self.cur = self.plane.at(x, y);
        self.minor = ddx * left_minor as f32 + ddy;
        self.major = ddx * left_major as f32 + ddy;
    }

    /// Moves to the next scanline.
    #[inline]
    pub fn step(&mut self, minor: bool) {
        self.cur += if minor { self.minor } else { self.major };
    }

    /// Returns the value at the left edge of the current scanline.
    #[inline]
    pub fn cur(&self) -> Vector<[f32; N]> {
        self.cur
    }

    /// Returns the change in value per pixel along a scanline.
    #[inline]
    pub fn ddx(&self) -> Vector<[f32; N]> {
        self.plane.ddx
    }
}

//
// Local trait impls
//

impl PixelWriter for Opaque {
    #[inline]
    fn write(&self, dst: &mut Color4f, src: Color4f) {
        *dst = src;
    }
}

impl PixelWriter for Blended {
    #[inline]
    fn write(&self, dst: &mut Color4f, src: Color4f) {
        *dst = self.0.blend(src, *dst);
    }
}

//
// Free functions
//

/// Wraps the texture coordinate `t` to the range `0..size`.
#[inline]
pub fn fix(t: f32, size: usize) -> usize {
    use crate::math::float::f32;
    if size == 0 {
        return 0;
    }
    (f32::floor(t) as i64).rem_euclid(size as i64) as usize
}

/// Returns the texel of `tex` at texture coordinates (u, v), wrapping
/// around at the edges of the texture.
///
/// Returns transparent black if `tex` is empty.
#[inline]
pub fn texel(tex: &Texture, u: f32, v: f32) -> Color4f {
    let (x, y) = (fix(u, tex.width()), fix(v, tex.height()));
    tex.get(x as i32, y as i32)
        .copied()
        .unwrap_or(Color4f::TRANSPARENT)
}

/// Clips the inclusive span `x_left..=x_right` of row `y` to `area`.
///
/// Returns the clipped span as a half-open range, or `None` if nothing
/// remains.
#[inline]
pub fn clip_span(
    area: &Rect,
    x_left: i32,
    y: i32,
    x_right: i32,
) -> Option<Range<i32>> {
    if !(area.top..area.bottom).contains(&y) {
        return None;
    }
    let x0 = x_left.max(area.left);
    let x1 = x_right.saturating_add(1).min(area.right);
    (x0 < x1).then_some(x0..x1)
}

/// Fills the inclusive span `x_left..=x_right` of row `y` of `target`,
/// clipped to the draw area, with colors returned by `shade(x)`.
#[inline]
pub fn fill_span<T, W, F>(
    target: &mut T,
    writer: W,
    x_left: i32,
    y: i32,
    x_right: i32,
    mut shade: F,
) -> Throughput
where
    T: Target + ?Sized,
    W: PixelWriter,
    F: FnMut(i32) -> Color4f,
{
    let len = x_right.saturating_sub(x_left).saturating_add(1).max(0);
    let mut io = Throughput { i: len as usize, o: 0 };

    let area = target.draw_area();
    let Some(xs) = clip_span(&area, x_left, y, x_right) else {
        return io;
    };
    if let Some(span) = target.span_mut(y, xs.clone()) {
        for (x, px) in xs.zip(span.iter_mut()) {
            writer.write(px, shade(x));
        }
        io.o = span.len();
    }
    io
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::color::{rgb, rgba};
    use crate::math::vec::vec2;
    use crate::util::buf::{AsSlice2, Buf2};

    use super::*;

    #[test]
    fn select_kind() {
        let [r, g] = [rgb(1.0, 0.0, 0.0), rgb(0.0, 1.0, 0.0)];
        let w = Color4f::WHITE;
        assert_eq!(ShaderKind::select(&[r, r, r], false), ShaderKind::Solid);
        assert_eq!(ShaderKind::select(&[r, g, r], false), ShaderKind::Gradient);
        assert_eq!(
            ShaderKind::select(&[w, w], true),
            ShaderKind::TexturedSolid { white: true }
        );
        assert_eq!(
            ShaderKind::select(&[r, r], true),
            ShaderKind::TexturedSolid { white: false }
        );
        assert_eq!(
            ShaderKind::select(&[w, r, w], true),
            ShaderKind::TexturedGradient
        );
    }

    #[test]
    fn fix_wraps() {
        assert_eq!(fix(0.0, 4), 0);
        assert_eq!(fix(3.9, 4), 3);
        assert_eq!(fix(4.0, 4), 0);
        assert_eq!(fix(9.5, 4), 1);
        assert_eq!(fix(-0.5, 4), 3);
        assert_eq!(fix(-4.0, 4), 0);
        assert_eq!(fix(123.0, 0), 0);
    }

    #[test]
    fn texel_wraps() {
        let buf = Buf2::new_with(2, 2, |x, y| rgb(x as f32, y as f32, 0.0));
        let tex = buf.as_slice2();
        assert_eq!(texel(&tex, 1.5, 0.5), rgb(1.0, 0.0, 0.0));
        assert_eq!(texel(&tex, -0.5, 3.0), rgb(1.0, 1.0, 0.0));

        let empty = Buf2::new_default(0, 0);
        assert_eq!(texel(&empty.as_slice2(), 1.0, 1.0), Color4f::TRANSPARENT);
    }

    #[test]
    fn plane_interpolates_vertex_values() {
        let pos = [vec2(0.5, 0.5), vec2(10.5, 0.5), vec2(0.5, 20.5)];
        let vals = [Vector([1.0]), Vector([11.0]), Vector([-19.0])];
        let p = Plane::new(pos, vals);

        assert_approx_eq!(p.ddx().0[0], 1.0);
        assert_approx_eq!(p.ddy().0[0], -1.0);
        assert_approx_eq!(p.at(0, 0).0[0], 1.0);
        assert_approx_eq!(p.at(10, 0).0[0], 11.0);
        assert_approx_eq!(p.at(3, 2).0[0], 2.0);
    }

    #[test]
    fn degenerate_plane_is_constant() {
        let pos = [vec2(0.0, 0.0), vec2(1.0, 1.0), vec2(2.0, 2.0)];
        let vals = [Vector([1.0, 2.0]), Vector([3.0, 4.0]), Vector([5.0, 6.0])];
        let p = Plane::new(pos, vals);
        assert_eq!(p.at(7, -3), Vector([1.0, 2.0]));
    }

    #[test]
    fn stepper_follows_left_edge() {
        let pos = [vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(0.0, 1.0)];
        let vals = [Vector([0.0]), Vector([1.0]), Vector([10.0])];
        let mut s = PlaneStepper::new(Plane::new(pos, vals));

        s.first(2, 0, 1, 0);
        assert_approx_eq!(s.cur().0[0], 7.5);
        s.step(true);
        assert_approx_eq!(s.cur().0, s.plane.at(3, 1).0);
        s.step(false);
        assert_approx_eq!(s.cur().0, s.plane.at(3, 2).0);
        assert_approx_eq!(s.ddx().0[0], 1.0);
    }

    #[test]
    fn clip_span_to_area() {
        let area = Rect::new(2, 0, 4, 2);
        assert_eq!(clip_span(&area, 0, 0, 9), Some(2..6));
        assert_eq!(clip_span(&area, 3, 1, 4), Some(3..5));
        assert_eq!(clip_span(&area, 0, 2, 9), None);
        assert_eq!(clip_span(&area, 6, 0, 9), None);
        assert_eq!(clip_span(&area, 4, 0, 3), None);
    }

    #[test]
    fn blended_writer() {
        let mut dst = rgb(0.0, 0.0, 1.0);
        Blended(Blender::ALPHA).write(&mut dst, rgba(1.0, 0.0, 0.0, 0.5));
        assert_eq!(dst, rgba(0.5, 0.0, 0.5, 0.75));

        Opaque.write(&mut dst, Color4f::WHITE);
        assert_eq!(dst, Color4f::WHITE);
    }
}
