//! Drawing of vertex arrays as points, lines, and triangles.

use alloc::vec::Vec;
use core::ops::Range;

use log::{debug, trace};

use crate::geom::{PrimType, Vertex};
use crate::math::color::Color4f;

use super::cache::VertexCache;
use super::ctx::Context;
use super::raster::{draw_line, draw_soft_point, draw_triangle};
use super::stats::Throughput;
use super::target::{Target, Texture};

/// The entry point of all drawing: owns the rendering [`Context`] and the
/// buffers needed to assemble and transform primitives.
///
/// A renderer is `Send`, so each thread can use its own renderer to draw
/// into its own targets.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    /// Rendering settings and statistics.
    pub ctx: Context,
    cache: VertexCache,
    scratch: Vec<Vertex>,
}

/// The sink a [`VertexCache`] is flushed into by [`Renderer::draw_cached`].
pub type Sink<'a> = dyn FnMut(&[Vertex], PrimType) + 'a;

impl Renderer {
    /// Returns a renderer using `ctx`.
    pub fn new(ctx: Context) -> Self {
        Self { ctx, ..Self::default() }
    }

    /// Draws the vertices `range` of `vertices` as primitives of type `prim`.
    ///
    /// Every vertex is transformed by `self.ctx.transform`; `vertices`
    /// itself is left untouched. If `texture` is given, the primitives are
    /// textured, except for points which use it as a single texel lookup.
    /// A range extending past the end of `vertices` is clamped.
    ///
    /// Returns the number of primitives drawn.
    pub fn draw_prim<T>(
        &mut self,
        target: &mut T,
        vertices: &[Vertex],
        texture: Option<&Texture>,
        range: Range<usize>,
        prim: PrimType,
    ) -> usize
    where
        T: Target + ?Sized,
    {
        let end = range.end.min(vertices.len());
        let start = range.start.min(end);
        let vs = &vertices[start..end];

        if self.ctx.transform.is_identity() {
            return draw_vertices(&mut self.ctx, target, vs, texture, prim);
        }
        let Self { ctx, scratch, .. } = self;
        if !transform_into(ctx, scratch, vs.iter().copied(), vs.len()) {
            return 0;
        }
        draw_vertices(ctx, target, scratch, texture, prim)
    }

    /// Draws the vertices of `vertices` listed in `indices` as primitives
    /// of type `prim`.
    ///
    /// Out-of-range indices are clamped to the last vertex. Otherwise like
    /// [`draw_prim`][Self::draw_prim].
    ///
    /// Returns the number of primitives drawn.
    pub fn draw_indexed_prim<T>(
        &mut self,
        target: &mut T,
        vertices: &[Vertex],
        texture: Option<&Texture>,
        indices: &[usize],
        prim: PrimType,
    ) -> usize
    where
        T: Target + ?Sized,
    {
        let Some(last) = vertices.len().checked_sub(1) else {
            debug!("skipping indexed draw: no vertices");
            return 0;
        };
        let vs = indices.iter().map(|&i| vertices[i.min(last)]);

        let Self { ctx, scratch, .. } = self;
        if !transform_into(ctx, scratch, vs, indices.len()) {
            return 0;
        }
        draw_vertices(ctx, target, scratch, texture, prim)
    }

    /// Builds primitives of one color in the vertex cache and draws them.
    ///
    /// Calls `build` with the cache, prepared for primitives of type `prim`
    /// with `color`, and with the sink to pass to the cache's methods.
    /// Whatever is left in the cache when `build` returns is drawn as well.
    ///
    /// Returns the number of primitives drawn.
    pub fn draw_cached<T, B>(
        &mut self,
        target: &mut T,
        color: Color4f,
        prim: PrimType,
        build: B,
    ) -> usize
    where
        T: Target + ?Sized,
        B: FnOnce(&mut VertexCache, &mut Sink<'_>),
    {
        let Self { ctx, cache, scratch } = self;
        let mut n = 0;
        let mut sink = |vs: &[Vertex], prim: PrimType| {
            let len = vs.len();
            if ctx.transform.is_identity() {
                n += draw_vertices(ctx, &mut *target, vs, None, prim);
            } else if transform_into(ctx, scratch, vs.iter().copied(), len) {
                n += draw_vertices(ctx, &mut *target, scratch, None, prim);
            }
        };
        cache.begin(color, prim);
        build(cache, &mut sink);
        cache.finish(&mut sink);
        n
    }
}

/// Replaces the contents of `buf` with the `n` vertices of `vs`
/// transformed by the transform of `ctx`.
///
/// Returns false if `buf` could not be grown.
fn transform_into(
    ctx: &Context,
    buf: &mut Vec<Vertex>,
    vs: impl Iterator<Item = Vertex>,
    n: usize,
) -> bool {
    buf.clear();
    if let Err(e) = buf.try_reserve(n) {
        debug!("skipping draw: {e}");
        return false;
    }
    let tf = &ctx.transform;
    buf.extend(vs.map(|v| Vertex { pos: tf.apply(&v.pos), ..v }));
    true
}

/// Rasterizes `vs` as primitives of type `prim` and updates the statistics
/// of `ctx`. Returns the number of primitives drawn.
fn draw_vertices<T>(
    ctx: &mut Context,
    target: &mut T,
    vs: &[Vertex],
    texture: Option<&Texture>,
    prim: PrimType,
) -> usize
where
    T: Target + ?Sized,
{
    use PrimType::*;

    let n = prim.count(vs.len());
    if n == 0 {
        return 0;
    }
    let b = &ctx.blender;
    let mut px = Throughput::default();
    let line = |target: &mut T, v1, v2| draw_line(target, [v1, v2], texture, b);
    let tri = |target: &mut T, vs| draw_triangle(target, vs, texture, b);

    match prim {
        PointList => {
            for v in vs {
                px.i += 1;
                px.o += draw_soft_point(target, v, texture, b) as usize;
            }
        }
        LineList => {
            for l in vs.chunks_exact(2) {
                px += line(target, &l[0], &l[1]);
            }
        }
        LineStrip | LineLoop => {
            for l in vs.windows(2) {
                px += line(target, &l[0], &l[1]);
            }
            if let (LineLoop, [first, .., last]) = (prim, vs) {
                px += line(target, last, first);
            }
        }
        TriangleList => {
            for t in vs.chunks_exact(3) {
                px += tri(target, [&t[0], &t[1], &t[2]]);
            }
        }
        TriangleStrip => {
            for t in vs.windows(3) {
                px += tri(target, [&t[0], &t[1], &t[2]]);
            }
        }
        TriangleFan => {
            if let [v0, rest @ ..] = vs {
                for t in rest.windows(2) {
                    px += tri(target, [v0, &t[0], &t[1]]);
                }
            }
        }
    }
    trace!("drew {n} of {prim:?}, {} of {} pixels written", px.o, px.i);

    let st = &mut ctx.stats;
    st.calls += 1;
    st.prims += Throughput { i: n, o: n };
    st.verts += Throughput { i: vs.len(), o: vs.len() };
    st.pixels += px;
    n
}
