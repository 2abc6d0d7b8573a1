//! Vertices and primitive types.

use crate::math::{Color4f, Vec2, vec2};

/// A vertex with a position, a color, and texture coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    /// Position in target pixel space, y pointing down. Pixel centers
    /// are at half-integer coordinates.
    pub pos: Vec2,
    /// Depth. Carried along but not used by the rasterizers.
    pub z: f32,
    /// Vertex color. Used as a tint if the primitive is textured.
    pub color: Color4f,
    /// Texture coordinates in texels.
    pub uv: Vec2,
}

/// The ways a sequence of vertices can be assembled into primitives.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PrimType {
    /// Each vertex is a point.
    PointList,
    /// Each pair of vertices is a line.
    #[default]
    LineList,
    /// Each vertex after the first is joined to the previous one.
    LineStrip,
    /// Like `LineStrip`, plus a line from the last vertex to the first.
    LineLoop,
    /// Each triplet of vertices is a triangle.
    TriangleList,
    /// Each vertex after the second forms a triangle with the
    /// two previous ones.
    TriangleStrip,
    /// Each vertex after the second forms a triangle with the
    /// previous one and the first vertex.
    TriangleFan,
}

/// Returns a new vertex at `pos` with `color` and zero texture coordinates.
#[inline]
pub const fn vertex(pos: Vec2, color: Color4f) -> Vertex {
    Vertex { pos, z: 0.0, color, uv: vec2(0.0, 0.0) }
}

impl Vertex {
    /// Returns `self` with texture coordinates `uv`.
    #[inline]
    #[must_use]
    pub const fn with_uv(self, uv: Vec2) -> Self {
        Self { uv, ..self }
    }
}

impl PrimType {
    /// Returns the number of primitives of this type formed by
    /// `n` vertices.
    ///
    /// # Examples
    /// ```
    /// use softprim_core::geom::PrimType::*;
    ///
    /// assert_eq!(LineStrip.count(5), 4);
    /// assert_eq!(TriangleList.count(7), 2);
    /// assert_eq!(TriangleFan.count(1), 0);
    /// ```
    pub const fn count(self, n: usize) -> usize {
        use PrimType::*;
        match self {
            PointList => n,
            LineList => n / 2,
            LineStrip => n.saturating_sub(1),
            LineLoop if n < 2 => 0,
            LineLoop => n,
            TriangleList => n / 3,
            TriangleStrip | TriangleFan => n.saturating_sub(2),
        }
    }
}
