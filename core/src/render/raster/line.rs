//! Line rasterization.
//!
//! A line is walked along its *major* axis, the axis in which it is longer,
//! one pixel per step. At each step the pixel on the *minor* axis is the one
//! containing the line at the center of the major-axis pixel. The minor
//! coordinate is tracked with a fractional error term; a *straight* step
//! only moves along the major axis, a *diagonal* step moves along both.
//!
//! Only those major-axis pixels whose centers project onto the half-open
//! segment from the start point (inclusive) to the end point (exclusive)
//! are drawn, so consecutive lines of a strip neither leave gaps nor draw
//! their shared endpoint twice.

use crate::geom::Vertex;
use crate::math::color::Color4f;
use crate::math::vec::{Vec2, vec2};
use crate::render::blend::Blender;
use crate::render::shader::{Blended, Opaque, PixelWriter, ShaderKind, texel};
use crate::render::stats::Throughput;
use crate::render::target::{Target, Texture};

use super::{LockGuard, all_finite, bounding_box, ceil, floor};

/// A line shader.
///
/// The rasterizer calls [`first`][Self::first] once with the first pixel
/// of the line, then alternates [`draw`][Self::draw] and
/// [`step`][Self::step] for each pixel.
pub trait LineShader {
    /// Starts the line from `v1` to `v2` at pixel (x, y).
    fn first(&mut self, x: i32, y: i32, v1: &Vertex, v2: &Vertex);

    /// Moves to the next pixel. `minor` is true on a straight step
    /// and false on a diagonal step.
    fn step(&mut self, minor: bool);

    /// Draws the pixel (x, y). Returns whether the pixel was written.
    ///
    /// Only called for pixels inside the draw area of `target`.
    fn draw<T: Target + ?Sized>(
        &mut self,
        target: &mut T,
        x: i32,
        y: i32,
    ) -> bool;
}

/// Draws lines with the color of their first vertex.
#[derive(Copy, Clone, Debug)]
pub struct SolidLine<W> {
    color: Color4f,
    writer: W,
}

/// Draws lines with colors interpolated between the vertex colors.
#[derive(Copy, Clone, Debug)]
pub struct GradientLine<W> {
    proj: Projection,
    c1: Color4f,
    c2: Color4f,
    writer: W,
}

/// Draws lines with texels, optionally tinted with the color of the first
/// vertex.
#[derive(Copy, Clone, Debug)]
pub struct TexturedLine<'a, W> {
    tex: Texture<'a>,
    white: bool,
    tint: Color4f,
    proj: Projection,
    uv1: Vec2,
    uv2: Vec2,
    writer: W,
}

/// Draws lines with texels tinted with interpolated vertex colors.
#[derive(Copy, Clone, Debug)]
pub struct TexturedGradientLine<'a, W> {
    tex: Texture<'a>,
    proj: Projection,
    v1: Vertex,
    v2: Vertex,
    writer: W,
}

/// The position of the current pixel center projected onto the line,
/// as a fraction of the line length.
#[derive(Copy, Clone, Debug, Default)]
struct Projection {
    t: f32,
    straight: f32,
    diagonal: f32,
}

//
// Free functions
//

/// Draws a line with vertex colors, optionally textured, blending it with
/// the target using `blender`.
///
/// Selects the cheapest shader that can draw the line, in the same way as
/// [`draw_triangle`][super::draw_triangle].
pub fn draw_line<T>(
    target: &mut T,
    [v1, v2]: [&Vertex; 2],
    texture: Option<&Texture>,
    blender: &Blender,
) -> Throughput
where
    T: Target + ?Sized,
{
    if blender.is_identity() {
        draw_with(target, [v1, v2], texture, Opaque)
    } else {
        draw_with(target, [v1, v2], texture, Blended(*blender))
    }
}

fn draw_with<T, W>(
    target: &mut T,
    [v1, v2]: [&Vertex; 2],
    texture: Option<&Texture>,
    w: W,
) -> Throughput
where
    T: Target + ?Sized,
    W: PixelWriter,
{
    let kind = ShaderKind::select(&[v1.color, v2.color], texture.is_some());
    match (texture, kind) {
        (Some(tex), ShaderKind::TexturedSolid { white }) => {
            let sh = &mut TexturedLine::new(*tex, white, w);
            draw_soft_line(target, v1, v2, sh)
        }
        (Some(tex), _) => {
            let sh = &mut TexturedGradientLine::new(*tex, w);
            draw_soft_line(target, v1, v2, sh)
        }
        (None, ShaderKind::Gradient) => {
            draw_soft_line(target, v1, v2, &mut GradientLine::new(w))
        }
        (None, _) => draw_soft_line(target, v1, v2, &mut SolidLine::new(w)),
    }
}

/// Rasterizes the line from `v1` to `v2` into `target` using `shader`.
///
/// Draws one pixel per major-axis step, including the start point and
/// excluding the end point. Pixels outside the draw area of `target` are
/// skipped; the vertices themselves are never modified.
///
/// Returns the number of pixels walked inside the draw area's major-axis
/// range and the number actually written. Draws nothing if the line has
/// zero length, or if `target` cannot be locked for drawing.
pub fn draw_soft_line<T, S>(
    target: &mut T,
    v1: &Vertex,
    v2: &Vertex,
    shader: &mut S,
) -> Throughput
where
    T: Target + ?Sized,
    S: LineShader,
{
    let (p1, p2) = (v1.pos, v2.pos);
    if !all_finite(&[p1, p2]) || (p2 - p1).len_sqr() == 0.0 {
        return Throughput::default();
    }
    let Some(mut target) = LockGuard::acquire(target, &bounding_box(&[p1, p2]))
    else {
        return Throughput::default();
    };
    let area = target.draw_area();

    let d = p2 - p1;
    let x_major = d.x().abs() > d.y().abs();
    // (major, minor) coordinates and back
    let split = |p: Vec2| {
        if x_major { (p.x(), p.y()) } else { (p.y(), p.x()) }
    };
    let join = |a: i32, m: i32| if x_major { (a, m) } else { (m, a) };
    let (a1, m1) = split(p1);
    let (a2, m2) = split(p2);
    let (da, dm) = (a2 - a1, m2 - m1);
    let (lo, hi) = if x_major {
        (area.left, area.right)
    } else {
        (area.top, area.bottom)
    };

    // Major-axis pixels with centers in [a1, a2) or (a2, a1],
    // restricted to the draw area
    let (s, first, end) = if da > 0.0 {
        let first = ceil(a1 - 0.5).max(lo);
        (1, first, ceil(a2 - 0.5).min(hi).max(first))
    } else {
        let first = floor(a1 - 0.5).min(hi.saturating_sub(1));
        (-1, first, floor(a2 - 0.5).max(lo.saturating_sub(1)).min(first))
    };
    let n = end.abs_diff(first);
    if n == 0 {
        return Throughput::default();
    }

    // Change in the minor coordinate per major-axis step
    let k = dm / da.abs();
    let m = m1 + (first as f32 + 0.5 - a1) * (dm / da);
    let mut minor = floor(m);
    let mut frac = m - minor as f32;
    let mut major = first;

    let (x, y) = join(major, minor);
    shader.first(x, y, v1, v2);

    let mut io = Throughput { i: n as usize, o: 0 };
    for _ in 0..n {
        let (x, y) = join(major, minor);
        if area.contains(x, y) && shader.draw(&mut *target, x, y) {
            io.o += 1;
        }
        major += s;
        frac += k;
        let straight = if frac >= 1.0 {
            frac -= 1.0;
            minor += 1;
            false
        } else if frac < 0.0 {
            frac += 1.0;
            minor -= 1;
            false
        } else {
            true
        };
        shader.step(straight);
    }
    io
}

//
// Inherent impls
//

impl<W> SolidLine<W> {
    /// Returns a solid shader writing pixels with `writer`.
    pub fn new(writer: W) -> Self {
        Self { color: Color4f::TRANSPARENT, writer }
    }
}

impl<W> GradientLine<W> {
    /// Returns a gradient shader writing pixels with `writer`.
    pub fn new(writer: W) -> Self {
        let c = Color4f::TRANSPARENT;
        Self {
            proj: Projection::default(),
            c1: c,
            c2: c,
            writer,
        }
    }
}

impl<'a, W> TexturedLine<'a, W> {
    /// Returns a shader drawing texels of `tex` with `writer`.
    ///
    /// If `white` is true, the texels are drawn as is; otherwise they are
    /// multiplied by the color of the first vertex.
    pub fn new(tex: Texture<'a>, white: bool, writer: W) -> Self {
        Self {
            tex,
            white,
            tint: Color4f::WHITE,
            proj: Projection::default(),
            uv1: Vec2::ZERO,
            uv2: Vec2::ZERO,
            writer,
        }
    }
}

impl<'a, W> TexturedGradientLine<'a, W> {
    /// Returns a shader drawing texels of `tex`, tinted with interpolated
    /// vertex colors, with `writer`.
    pub fn new(tex: Texture<'a>, writer: W) -> Self {
        Self {
            tex,
            proj: Projection::default(),
            v1: Vertex::default(),
            v2: Vertex::default(),
            writer,
        }
    }
}

impl Projection {
    fn new(x: i32, y: i32, v1: &Vertex, v2: &Vertex) -> Self {
        let d = v2.pos - v1.pos;
        let len_sqr = d.len_sqr();
        let c = vec2(x as f32 + 0.5, y as f32 + 0.5) - v1.pos;
        let (dx, dy) = (d.x().abs(), d.y().abs());
        Self {
            t: c.dot(&d) / len_sqr,
            straight: dx.max(dy) / len_sqr,
            diagonal: (dx + dy) / len_sqr,
        }
    }

    #[inline]
    fn step(&mut self, straight: bool) {
        self.t += if straight { self.straight } else { self.diagonal };
    }

    /// Returns the projection clamped to the line.
    #[inline]
    fn t(&self) -> f32 {
        self.t.clamp(0.0, 1.0)
    }

    #[inline]
    fn lerp_color(&self, c1: Color4f, c2: Color4f) -> Color4f {
        c1 + (c2 - c1) * self.t()
    }
}

/// Writes `color` to the pixel (x, y) of `target` with `writer`.
#[inline]
fn plot<T, W>(target: &mut T, w: W, x: i32, y: i32, color: Color4f) -> bool
where
    T: Target + ?Sized,
    W: PixelWriter,
{
    target
        .pixel_mut(x, y)
        .map(|px| w.write(px, color))
        .is_some()
}

//
// Local trait impls
//

impl<W: PixelWriter> LineShader for SolidLine<W> {
    fn first(&mut self, _: i32, _: i32, v1: &Vertex, _: &Vertex) {
        self.color = v1.color;
    }
    fn step(&mut self, _: bool) {}

    fn draw<T>(&mut self, target: &mut T, x: i32, y: i32) -> bool
    where
        T: Target + ?Sized,
    {
        plot(target, self.writer, x, y, self.color)
    }
}

impl<W: PixelWriter> LineShader for GradientLine<W> {
    fn first(&mut self, x: i32, y: i32, v1: &Vertex, v2: &Vertex) {
        self.proj = Projection::new(x, y, v1, v2);
        (self.c1, self.c2) = (v1.color, v2.color);
    }
    fn step(&mut self, minor: bool) {
        self.proj.step(minor);
    }

    fn draw<T>(&mut self, target: &mut T, x: i32, y: i32) -> bool
    where
        T: Target + ?Sized,
    {
        let c = self.proj.lerp_color(self.c1, self.c2);
        plot(target, self.writer, x, y, c)
    }
}

impl<W: PixelWriter> LineShader for TexturedLine<'_, W> {
    fn first(&mut self, x: i32, y: i32, v1: &Vertex, v2: &Vertex) {
        self.proj = Projection::new(x, y, v1, v2);
        (self.uv1, self.uv2) = (v1.uv, v2.uv);
        self.tint = v1.color;
    }
    fn step(&mut self, minor: bool) {
        self.proj.step(minor);
    }

    fn draw<T>(&mut self, target: &mut T, x: i32, y: i32) -> bool
    where
        T: Target + ?Sized,
    {
        let uv = self.uv1 + (self.uv2 - self.uv1) * self.proj.t();
        let mut c = texel(&self.tex, uv.x(), uv.y());
        if !self.white {
            c = c.mul_color(self.tint);
        }
        plot(target, self.writer, x, y, c)
    }
}

impl<W: PixelWriter> LineShader for TexturedGradientLine<'_, W> {
    fn first(&mut self, x: i32, y: i32, v1: &Vertex, v2: &Vertex) {
        self.proj = Projection::new(x, y, v1, v2);
        (self.v1, self.v2) = (*v1, *v2);
    }
    fn step(&mut self, minor: bool) {
        self.proj.step(minor);
    }

    fn draw<T>(&mut self, target: &mut T, x: i32, y: i32) -> bool
    where
        T: Target + ?Sized,
    {
        let (v1, v2) = (&self.v1, &self.v2);
        let uv = v1.uv + (v2.uv - v1.uv) * self.proj.t();
        let tint = self.proj.lerp_color(v1.color, v2.color);
        let c = texel(&self.tex, uv.x(), uv.y()).mul_color(tint);
        plot(target, self.writer, x, y, c)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::assert_approx_eq;
    use crate::geom::vertex;
    use crate::math::color::{rgb, rgba};
    use crate::render::target::{Bitmap, LockMode};
    use crate::util::buf::{AsSlice2, Buf2};
    use crate::util::rect::Rect;

    use super::*;

    const RED: Color4f = rgb(1.0, 0.0, 0.0);
    const BLUE: Color4f = rgb(0.0, 0.0, 1.0);

    fn line(bmp: &mut Bitmap, p1: (f32, f32), p2: (f32, f32)) -> Throughput {
        let v1 = vertex(vec2(p1.0, p1.1), RED);
        let v2 = vertex(vec2(p2.0, p2.1), RED);
        draw_line(bmp, [&v1, &v2], None, &Blender::IDENTITY)
    }

    fn to_ascii(bmp: &Bitmap, f: impl Fn(Color4f) -> char) -> String {
        let mut s = String::new();
        for row in bmp.buf().rows() {
            s.push('\n');
            s.extend(row.iter().map(|&c| f(c)));
        }
        s
    }

    fn red_or_dot(c: Color4f) -> char {
        if c == RED { '#' } else { '.' }
    }

    /// Records the calls made by the rasterizer.
    #[derive(Default)]
    struct Recorder {
        firsts: Vec<(i32, i32)>,
        pixels: Vec<(i32, i32)>,
        steps: Vec<bool>,
    }

    impl LineShader for Recorder {
        fn first(&mut self, x: i32, y: i32, _: &Vertex, _: &Vertex) {
            self.firsts.push((x, y));
        }
        fn step(&mut self, minor: bool) {
            self.steps.push(minor);
        }
        fn draw<T>(&mut self, _: &mut T, x: i32, y: i32) -> bool
        where
            T: Target + ?Sized,
        {
            self.pixels.push((x, y));
            true
        }
    }

    #[test]
    fn horizontal_line_is_half_open() {
        let mut bmp = Bitmap::new(12, 2);
        let io = line(&mut bmp, (0.0, 0.0), (10.0, 0.0));
        assert_eq!(io, Throughput { i: 10, o: 10 });
        assert_eq!(
            to_ascii(&bmp, red_or_dot),
            r"
##########..
............"
        );
    }

    #[test]
    fn reversed_horizontal_line() {
        let mut bmp = Bitmap::new(12, 2);
        line(&mut bmp, (10.0, 0.0), (0.0, 0.0));
        assert_eq!(
            to_ascii(&bmp, red_or_dot),
            r"
##########..
............"
        );
    }

    #[test]
    fn vertical_line() {
        let mut bmp = Bitmap::new(4, 4);
        line(&mut bmp, (2.0, 0.0), (2.0, 3.0));
        assert_eq!(
            to_ascii(&bmp, red_or_dot),
            r"
..#.
..#.
..#.
...."
        );
    }

    #[test]
    fn shader_call_sequence() {
        let mut bmp = Bitmap::new(8, 8);
        let v1 = vertex(vec2(0.5, 0.5), RED);
        let v2 = vertex(vec2(3.5, 2.0), RED);
        let mut rec = Recorder::default();

        let io = draw_soft_line(&mut bmp, &v1, &v2, &mut rec);

        assert_eq!(io, Throughput { i: 3, o: 3 });
        assert_eq!(rec.firsts, [(0, 0)]);
        assert_eq!(rec.pixels, [(0, 0), (1, 1), (2, 1)]);
        assert_eq!(rec.steps, [false, true, false]);
        assert!(!bmp.is_locked());
    }

    #[test]
    fn line_strip_has_no_gaps_or_overdraw() {
        let mut bmp = Bitmap::new(8, 7);
        let quarter = rgba(0.25, 0.25, 0.25, 0.25);
        let vs = [(0.5, 0.5), (4.5, 2.5), (6.5, 6.5)]
            .map(|(x, y)| vertex(vec2(x, y), quarter));

        let add = Blender::ADDITIVE;
        draw_line(&mut bmp, [&vs[0], &vs[1]], None, &add);
        draw_line(&mut bmp, [&vs[1], &vs[2]], None, &add);

        let s = to_ascii(&bmp, |c| {
            char::from_digit((c.r() * 4.0 + 0.5) as u32, 10).unwrap_or('?')
        });
        assert_eq!(
            s,
            r"
10000000
01100000
00011000
00000100
00000100
00000010
00000000"
        );
    }

    #[test]
    fn zero_length_draws_nothing() {
        let mut bmp = Bitmap::new(4, 4);
        let io = line(&mut bmp, (1.5, 1.5), (1.5, 1.5));
        assert_eq!(io, Throughput::default());
        assert!(bmp.buf().iter().all(|&c| c == Color4f::TRANSPARENT));
    }

    #[test]
    fn non_finite_draws_nothing() {
        let mut bmp = Bitmap::new(4, 4);
        let io = line(&mut bmp, (0.0, 0.0), (f32::INFINITY, 1.0));
        assert_eq!(io, Throughput::default());
        assert!(!bmp.is_locked());
    }

    #[test]
    fn tiny_bitmap() {
        let mut bmp = Bitmap::new(1, 1);
        line(&mut bmp, (0.0, 1.5), (1.0, 1.5));
        assert_eq!(bmp.get_pixel(0, 0), Some(Color4f::TRANSPARENT));
        line(&mut bmp, (-3.0, 3.0), (3.0, 3.5));
        assert_eq!(bmp.get_pixel(0, 0), Some(Color4f::TRANSPARENT));

        let io = line(&mut bmp, (0.0, 0.5), (1.0, 0.5));
        assert_eq!(io, Throughput { i: 1, o: 1 });
        assert_eq!(bmp.get_pixel(0, 0), Some(RED));
    }

    #[test]
    fn clipped_to_clip_rect() {
        let mut bmp = Bitmap::new(4, 4);
        bmp.set_clip(Rect::new(1, 0, 2, 4));
        let io = line(&mut bmp, (-5.0, 1.5), (20.0, 1.5));
        assert_eq!(io, Throughput { i: 2, o: 2 });
        assert_eq!(
            to_ascii(&bmp, red_or_dot),
            r"
....
.##.
....
...."
        );
    }

    #[test]
    fn locked_read_only_draws_nothing() {
        let mut bmp = Bitmap::new(4, 4);
        bmp.lock_region(&Rect::new(0, 0, 4, 4), LockMode::ReadOnly)
            .unwrap();
        let io = line(&mut bmp, (0.0, 0.5), (4.0, 0.5));
        assert_eq!(io, Throughput::default());
        assert_eq!(bmp.get_pixel(0, 0), Some(Color4f::TRANSPARENT));
    }

    #[test]
    fn gradient_follows_projection() {
        let mut bmp = Bitmap::new(4, 1);
        let v1 = vertex(vec2(0.0, 0.5), RED);
        let v2 = vertex(vec2(4.0, 0.5), BLUE);
        draw_line(&mut bmp, [&v1, &v2], None, &Blender::IDENTITY);

        for x in 0..4 {
            let t = (x as f32 + 0.5) / 4.0;
            let px = bmp.get_pixel(x, 0).unwrap();
            assert_approx_eq!(px, rgb(1.0 - t, 0.0, t), eps = 1e-5);
        }
    }

    #[test]
    fn diagonal_gradient_steps() {
        let mut bmp = Bitmap::new(4, 4);
        let v1 = vertex(vec2(0.0, 0.0), RED);
        let v2 = vertex(vec2(4.0, 4.0), BLUE);
        draw_line(&mut bmp, [&v1, &v2], None, &Blender::IDENTITY);

        for i in 0..4 {
            let t = (i as f32 + 0.5) / 4.0;
            let px = bmp.get_pixel(i, i).unwrap();
            assert_approx_eq!(px, rgb(1.0 - t, 0.0, t), eps = 1e-5);
        }
    }

    #[test]
    fn textured_line_wraps_texture() {
        let tex = Buf2::new(2, 1, [Color4f::WHITE, BLUE]);
        let tex = tex.as_slice2();
        let mut bmp = Bitmap::new(4, 1);
        let v1 = vertex(vec2(0.0, 0.5), Color4f::WHITE);
        let v2 = vertex(vec2(4.0, 0.5), Color4f::WHITE)
            .with_uv(vec2(4.0, 0.0));

        draw_line(&mut bmp, [&v1, &v2], Some(&tex), &Blender::IDENTITY);

        let s = to_ascii(&bmp, |c| if c == BLUE { 'b' } else { 'W' });
        assert_eq!(s, "\nWbWb");
    }

    #[test]
    fn textured_line_tinted() {
        let tex = Buf2::new(1, 1, [rgb(1.0, 1.0, 0.0)]);
        let tex = tex.as_slice2();
        let mut bmp = Bitmap::new(2, 1);
        let v1 = vertex(vec2(0.0, 0.5), RED);
        let v2 = vertex(vec2(2.0, 0.5), RED);

        draw_line(&mut bmp, [&v1, &v2], Some(&tex), &Blender::IDENTITY);
        assert_eq!(bmp.get_pixel(1, 0), Some(RED));

        let v2 = vertex(vec2(2.0, 0.5), Color4f::WHITE);
        draw_line(&mut bmp, [&v1, &v2], Some(&tex), &Blender::IDENTITY);
        // Three quarters of the way from red to white at (1.5, 0.5)
        let px = bmp.get_pixel(1, 0).unwrap();
        assert_approx_eq!(px, rgb(1.0, 0.75, 0.0), eps = 1e-5);
    }

    #[test]
    fn blended_line() {
        let mut bmp = Bitmap::try_new(2, 1, BLUE).unwrap();
        let half = rgba(1.0, 0.0, 0.0, 0.5);
        let v1 = vertex(vec2(0.0, 0.5), half);
        let v2 = vertex(vec2(2.0, 0.5), half);
        draw_line(&mut bmp, [&v1, &v2], None, &Blender::ALPHA);

        let px = bmp.get_pixel(0, 0).unwrap();
        assert_approx_eq!(px.r(), 0.5);
        assert_approx_eq!(px.b(), 0.5);
    }
}
