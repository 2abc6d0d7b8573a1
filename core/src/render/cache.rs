//! Batching of generated vertices.

use alloc::vec::Vec;

use log::trace;

use crate::geom::{PrimType, Vertex, vertex};
use crate::math::{color::Color4f, vec::Vec2};

/// A fixed-capacity buffer accumulating triangles or the vertices of a line
/// strip, all of one color.
///
/// Vertices are handed to a *sink*, typically a draw call, when the buffer
/// becomes full and when the producer [finishes][Self::finish]. In line
/// strip mode a flush keeps the last vertex, so the strip stays connected
/// across flushes.
#[derive(Clone, Debug)]
pub struct VertexCache {
    verts: Vec<Vertex>,
    color: Color4f,
    prim: PrimType,
}

impl VertexCache {
    /// The maximum number of vertices held before a flush.
    pub const CAPACITY: usize = 256;

    /// Returns an empty cache of triangles.
    pub fn new() -> Self {
        Self {
            verts: Vec::new(),
            color: Color4f::WHITE,
            prim: PrimType::TriangleList,
        }
    }

    /// Empties `self` and starts accumulating primitives of type `prim`
    /// with `color`.
    ///
    /// `prim` should be either [`PrimType::TriangleList`] or
    /// [`PrimType::LineStrip`].
    pub fn begin(&mut self, color: Color4f, prim: PrimType) {
        debug_assert!(matches!(
            prim,
            PrimType::TriangleList | PrimType::LineStrip
        ));
        self.verts.clear();
        self.color = color;
        self.prim = prim;
    }

    /// Returns the color of the vertices.
    pub fn color(&self) -> Color4f {
        self.color
    }

    /// Returns the type of the primitives accumulated.
    pub fn prim(&self) -> PrimType {
        self.prim
    }

    /// Returns the vertices not yet flushed.
    pub fn vertices(&self) -> &[Vertex] {
        &self.verts
    }

    /// Adds the triangle `a`, `b`, `c`, flushing first if there is no room.
    pub fn push_triangle<F>(&mut self, [a, b, c]: [Vec2; 3], sink: &mut F)
    where
        F: FnMut(&[Vertex], PrimType) + ?Sized,
    {
        if Self::CAPACITY - self.verts.len() < 3 {
            self.flush(sink);
        }
        let col = self.color;
        self.verts
            .extend([vertex(a, col), vertex(b, col), vertex(c, col)]);
    }

    /// Adds the next vertex of a line strip, flushing first if there is
    /// no room.
    pub fn push_line_vertex<F>(&mut self, p: Vec2, sink: &mut F)
    where
        F: FnMut(&[Vertex], PrimType) + ?Sized,
    {
        if self.verts.len() >= Self::CAPACITY {
            self.flush(sink);
        }
        self.verts.push(vertex(p, self.color));
    }

    /// Hands the accumulated vertices to `sink`.
    ///
    /// In line strip mode the last vertex is kept as the first vertex of
    /// the continuation.
    pub fn flush<F>(&mut self, sink: &mut F)
    where
        F: FnMut(&[Vertex], PrimType) + ?Sized,
    {
        let n = self.verts.len();
        if n == 0 {
            return;
        }
        trace!("flushing {n} vertices as {:?}", self.prim);
        sink(&self.verts, self.prim);
        match (self.prim, self.verts.last()) {
            (PrimType::LineStrip, Some(&last)) => {
                self.verts.clear();
                self.verts.push(last);
            }
            _ => self.verts.clear(),
        }
    }

    /// Flushes the remaining primitives and empties `self`.
    pub fn finish<F>(&mut self, sink: &mut F)
    where
        F: FnMut(&[Vertex], PrimType) + ?Sized,
    {
        // A lone vertex left over by a flush is not a line
        if self.prim != PrimType::LineStrip || self.verts.len() > 1 {
            self.flush(sink);
        }
        self.verts.clear();
    }
}

impl Default for VertexCache {
    fn default() -> Self {
        Self::new()
    }
}
