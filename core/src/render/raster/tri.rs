//! Triangle rasterization.
//!
//! A triangle is scanned top to bottom in two segments, split at the
//! vertex in the middle. The *major* edge spans the whole height of the
//! triangle; the two *minor* edges span one segment each:
//! ```text
//!               V1
//!              /  \__
//!       minor /      \__  major
//!            /          \__
//!          V2 ------------ ` -- segment boundary
//!             \__           \
//!          minor \__         \
//!                   \__       \
//!                      \_______V3
//! ```
//! Edges are walked with an integer pixel position and a floating-point
//! error term, both stepped once per scanline. An edge is always walked
//! from its upper to its lower endpoint, so two triangles sharing an edge
//! compute exactly the same boundary.

use crate::geom::Vertex;
use crate::math::color::{Color, Color4f};
use crate::math::vec::{Vec2, Vector};
use crate::render::blend::Blender;
use crate::render::shader::{
    Blended, Opaque, PixelWriter, Plane, PlaneStepper, ShaderKind, fill_span,
    texel,
};
use crate::render::stats::Throughput;
use crate::render::target::{Target, Texture};

use super::{LockGuard, all_finite, bounding_box, ceil};

/// A triangle shader.
///
/// The rasterizer calls the methods of a shader in the following order:
/// * [`init`][Self::init] once per triangle,
/// * [`first`][Self::first] at the start of each of the two segments,
/// * [`draw`][Self::draw] for each scanline of the segment, followed by
///   [`step`][Self::step] to move to the next scanline.
pub trait TriShader {
    /// Prepares to draw the triangle `v1`, `v2`, `v3`.
    fn init(&mut self, v1: &Vertex, v2: &Vertex, v3: &Vertex);

    /// Starts a new segment whose first span starts at pixel (x, y).
    ///
    /// The left edge moves right by `left_minor` pixels on a minor step,
    /// and by `left_major` pixels on a major step.
    fn first(&mut self, x: i32, y: i32, left_minor: i32, left_major: i32);

    /// Moves to the next scanline; `minor` tells which kind of step
    /// the left edge took.
    fn step(&mut self, minor: bool);

    /// Draws the inclusive span `x_left..=x_right` of row `y`.
    ///
    /// Pixels outside the draw area of `target` must not be touched.
    fn draw<T: Target + ?Sized>(
        &mut self,
        target: &mut T,
        x_left: i32,
        y: i32,
        x_right: i32,
    ) -> Throughput;
}

/// Fills triangles with the color of their first vertex.
#[derive(Copy, Clone, Debug)]
pub struct SolidTri<W> {
    color: Color4f,
    writer: W,
}

/// Fills triangles with colors interpolated between the vertex colors.
#[derive(Copy, Clone, Debug)]
pub struct GradientTri<W> {
    colors: PlaneStepper<4>,
    writer: W,
}

/// Fills triangles with texels, optionally tinted with the color of
/// the first vertex.
#[derive(Copy, Clone, Debug)]
pub struct TexturedTri<'a, W> {
    tex: Texture<'a>,
    white: bool,
    tint: Color4f,
    uv: PlaneStepper<2>,
    writer: W,
}

/// Fills triangles with texels tinted with colors interpolated between
/// the vertex colors.
#[derive(Copy, Clone, Debug)]
pub struct TexturedGradientTri<'a, W> {
    tex: Texture<'a>,
    vals: PlaneStepper<6>,
    writer: W,
}

/// Walks a triangle edge one scanline at a time.
#[derive(Copy, Clone, Debug)]
struct Edge {
    /// The leftmost pixel whose center is on or to the right of the edge.
    x: i32,
    /// The signed horizontal distance from the edge to the center of
    /// pixel `x`, scaled by `-dy`. Always in `-dy < err <= 0`.
    err: f32,
    dx: f32,
    dy: f32,
    /// The pixels `x` moves on a minor step. A major step moves one less.
    step: i32,
}

//
// Free functions
//

/// Draws a triangle with vertex colors, optionally textured, blending it
/// with the target using `blender`.
///
/// Selects the cheapest shader that can draw the triangle: a gradient is
/// only used if the vertex colors differ, and pixels are written without
/// blending if `blender` is the identity.
pub fn draw_triangle<T>(
    target: &mut T,
    [v1, v2, v3]: [&Vertex; 3],
    texture: Option<&Texture>,
    blender: &Blender,
) -> Throughput
where
    T: Target + ?Sized,
{
    if blender.is_identity() {
        draw_with(target, [v1, v2, v3], texture, Opaque)
    } else {
        draw_with(target, [v1, v2, v3], texture, Blended(*blender))
    }
}

fn draw_with<T, W>(
    target: &mut T,
    [v1, v2, v3]: [&Vertex; 3],
    texture: Option<&Texture>,
    w: W,
) -> Throughput
where
    T: Target + ?Sized,
    W: PixelWriter,
{
    let colors = [v1.color, v2.color, v3.color];
    let kind = ShaderKind::select(&colors, texture.is_some());
    match (texture, kind) {
        (Some(tex), ShaderKind::TexturedSolid { white }) => {
            let sh = &mut TexturedTri::new(*tex, white, w);
            draw_soft_triangle(target, v1, v2, v3, sh)
        }
        (Some(tex), _) => {
            let sh = &mut TexturedGradientTri::new(*tex, w);
            draw_soft_triangle(target, v1, v2, v3, sh)
        }
        (None, ShaderKind::Gradient) => {
            draw_soft_triangle(target, v1, v2, v3, &mut GradientTri::new(w))
        }
        (None, _) => {
            draw_soft_triangle(target, v1, v2, v3, &mut SolidTri::new(w))
        }
    }
}

/// Rasterizes the triangle `v1`, `v2`, `v3` into `target` using `shader`.
///
/// Draws exactly those pixels whose center lies inside the triangle, where
/// points on a left or top edge are inside and points on a right or bottom
/// edge are outside. Pixels outside the draw area of `target` are skipped.
///
/// Returns the number of pixels in the spans drawn and the number actually
/// written. Draws nothing if the triangle has zero area, or if `target`
/// cannot be locked for drawing.
pub fn draw_soft_triangle<T, S>(
    target: &mut T,
    v1: &Vertex,
    v2: &Vertex,
    v3: &Vertex,
    shader: &mut S,
) -> Throughput
where
    T: Target + ?Sized,
    S: TriShader,
{
    let pts = [v1.pos, v2.pos, v3.pos];
    if !all_finite(&pts) || (pts[1] - pts[0]).cross(&(pts[2] - pts[0])) == 0.0
    {
        return Throughput::default();
    }
    let Some(mut target) = LockGuard::acquire(target, &bounding_box(&pts))
    else {
        return Throughput::default();
    };
    shader.init(v1, v2, v3);
    scan(&mut *target, pts, shader)
}

fn scan<T, S>(target: &mut T, mut pts: [Vec2; 3], shader: &mut S) -> Throughput
where
    T: Target + ?Sized,
    S: TriShader,
{
    pts.sort_unstable_by(|a, b| a.y().total_cmp(&b.y()));
    let [p1, p2, p3] = pts;

    // Negative iff V2 is to the right of the major edge
    let cross = (p3 - p1).cross(&(p2 - p1));
    let major_on_left = cross < 0.0;

    // The first scanline whose pixel centers are at or below y
    let row = |y: f32| ceil(y - 0.5);
    let [r1, r2, r3] = [row(p1.y()), row(p2.y()), row(p3.y())];

    let area = target.draw_area();
    let start = r1.max(area.top);
    if start >= r3.min(area.bottom) {
        return Throughput::default();
    }

    let mut io = Throughput::default();
    let mut major = Edge::new(p1, p3, start);

    for (a, b, y0, y1) in [(p1, p2, r1, r2), (p2, p3, r2, r3)] {
        let (y0, y1) = (y0.max(area.top), y1.min(area.bottom));
        if y0 >= y1 {
            continue;
        }
        let mut minor = Edge::new(a, b, y0);
        let (left, right) = if major_on_left {
            (&mut major, &mut minor)
        } else {
            (&mut minor, &mut major)
        };

        shader.first(left.x, y0, left.step, left.step - 1);
        for y in y0..y1 {
            if left.x < right.x {
                io += shader.draw(target, left.x, y, right.x - 1);
            }
            let minor_step = left.advance();
            right.advance();
            shader.step(minor_step);
        }
    }
    io
}

//
// Inherent impls
//

impl<W> SolidTri<W> {
    /// Returns a solid shader writing pixels with `writer`.
    pub fn new(writer: W) -> Self {
        Self { color: Color4f::TRANSPARENT, writer }
    }
}

impl<W> GradientTri<W> {
    /// Returns a gradient shader writing pixels with `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            colors: PlaneStepper::new(Plane::default()),
            writer,
        }
    }
}

impl<'a, W> TexturedTri<'a, W> {
    /// Returns a shader drawing texels of `tex` with `writer`.
    ///
    /// If `white` is true, the texels are drawn as is; otherwise they are
    /// multiplied by the color of the first vertex.
    pub fn new(tex: Texture<'a>, white: bool, writer: W) -> Self {
        Self {
            tex,
            white,
            tint: Color4f::WHITE,
            uv: PlaneStepper::new(Plane::default()),
            writer,
        }
    }
}

impl<'a, W> TexturedGradientTri<'a, W> {
    /// Returns a shader drawing texels of `tex`, tinted with interpolated
    /// vertex colors, with `writer`.
    pub fn new(tex: Texture<'a>, writer: W) -> Self {
        Self {
            tex,
            vals: PlaneStepper::new(Plane::default()),
            writer,
        }
    }
}

impl Edge {
    /// Returns a walker for the edge from `a` to `b`, where `a.y < b.y`,
    /// positioned at scanline `y`.
    fn new(a: Vec2, b: Vec2, y: i32) -> Self {
        let (dx, dy) = (b.x() - a.x(), b.y() - a.y());
        let yc = y as f32 + 0.5 - a.y();

        let mut x = ceil(a.x() + yc * dx / dy - 0.5);
        let mut err = yc * dx - (x as f32 + 0.5 - a.x()) * dy;
        // Rounding may leave x off by one
        if err > 0.0 {
            x = x.saturating_add(1);
            err -= dy;
        }
        if err <= -dy {
            x = x.saturating_sub(1);
            err += dy;
        }
        let step = ceil(dx / dy);
        Self { x, err, dx, dy, step }
    }

    /// Moves to the next scanline. Returns whether the step was minor.
    #[inline]
    fn advance(&mut self) -> bool {
        self.x = self.x.saturating_add(self.step);
        self.err += self.dx - self.step as f32 * self.dy;
        if self.err <= -self.dy {
            self.x = self.x.saturating_sub(1);
            self.err += self.dy;
            false
        } else {
            true
        }
    }
}

//
// Local trait impls
//

impl<W: PixelWriter> TriShader for SolidTri<W> {
    fn init(&mut self, v1: &Vertex, _: &Vertex, _: &Vertex) {
        self.color = v1.color;
    }
    fn first(&mut self, _: i32, _: i32, _: i32, _: i32) {}
    fn step(&mut self, _: bool) {}

    fn draw<T: Target + ?Sized>(
        &mut self,
        target: &mut T,
        x_left: i32,
        y: i32,
        x_right: i32,
    ) -> Throughput {
        let c = self.color;
        fill_span(target, self.writer, x_left, y, x_right, |_| c)
    }
}

impl<W: PixelWriter> TriShader for GradientTri<W> {
    fn init(&mut self, v1: &Vertex, v2: &Vertex, v3: &Vertex) {
        let pos = [v1.pos, v2.pos, v3.pos];
        let vals = [v1, v2, v3].map(|v| Vector(v.color.0));
        self.colors = PlaneStepper::new(Plane::new(pos, vals));
    }
    fn first(&mut self, x: i32, y: i32, left_minor: i32, left_major: i32) {
        self.colors.first(x, y, left_minor, left_major);
    }
    fn step(&mut self, minor: bool) {
        self.colors.step(minor);
    }

    fn draw<T: Target + ?Sized>(
        &mut self,
        target: &mut T,
        x_left: i32,
        y: i32,
        x_right: i32,
    ) -> Throughput {
        let (c0, dc) = (self.colors.cur(), self.colors.ddx());
        fill_span(target, self.writer, x_left, y, x_right, |x| {
            Color((c0 + dc * (x - x_left) as f32).0)
        })
    }
}

impl<W: PixelWriter> TriShader for TexturedTri<'_, W> {
    fn init(&mut self, v1: &Vertex, v2: &Vertex, v3: &Vertex) {
        let pos = [v1.pos, v2.pos, v3.pos];
        let vals = [v1.uv, v2.uv, v3.uv];
        self.uv = PlaneStepper::new(Plane::new(pos, vals));
        self.tint = v1.color;
    }
    fn first(&mut self, x: i32, y: i32, left_minor: i32, left_major: i32) {
        self.uv.first(x, y, left_minor, left_major);
    }
    fn step(&mut self, minor: bool) {
        self.uv.step(minor);
    }

    fn draw<T: Target + ?Sized>(
        &mut self,
        target: &mut T,
        x_left: i32,
        y: i32,
        x_right: i32,
    ) -> Throughput {
        let (uv0, duv) = (self.uv.cur(), self.uv.ddx());
        let (tex, tint) = (&self.tex, self.tint);
        let uv = |x: i32| uv0 + duv * (x - x_left) as f32;

        if self.white {
            fill_span(target, self.writer, x_left, y, x_right, |x| {
                let [u, v] = uv(x).0;
                texel(tex, u, v)
            })
        } else {
            fill_span(target, self.writer, x_left, y, x_right, |x| {
                let [u, v] = uv(x).0;
                texel(tex, u, v).mul_color(tint)
            })
        }
    }
}

impl<W: PixelWriter> TriShader for TexturedGradientTri<'_, W> {
    fn init(&mut self, v1: &Vertex, v2: &Vertex, v3: &Vertex) {
        let pos = [v1.pos, v2.pos, v3.pos];
        let vals = [v1, v2, v3].map(|v| {
            let [r, g, b, a] = v.color.0;
            Vector([r, g, b, a, v.uv.x(), v.uv.y()])
        });
        self.vals = PlaneStepper::new(Plane::new(pos, vals));
    }
    fn first(&mut self, x: i32, y: i32, left_minor: i32, left_major: i32) {
        self.vals.first(x, y, left_minor, left_major);
    }
    fn step(&mut self, minor: bool) {
        self.vals.step(minor);
    }

    fn draw<T: Target + ?Sized>(
        &mut self,
        target: &mut T,
        x_left: i32,
        y: i32,
        x_right: i32,
    ) -> Throughput {
        let (v0, dv) = (self.vals.cur(), self.vals.ddx());
        let tex = &self.tex;
        fill_span(target, self.writer, x_left, y, x_right, |x| {
            let [r, g, b, a, u, v] = (v0 + dv * (x - x_left) as f32).0;
            texel(tex, u, v).mul_color(Color([r, g, b, a]))
        })
    }
}
