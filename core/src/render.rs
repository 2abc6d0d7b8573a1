//! Turning 2D primitives into pixels.
//!
//! This module constitutes the software rendering pipeline of `softprim`.
//! Vertex arrays enter through the [`Renderer`], are [transformed][ctx] and
//! assembled into points, lines, and triangles, and are [rasterized][raster]
//! into a [target] by [shaders][shader] that interpolate colors and
//! [texture][Texture] coordinates and [blend] the result with the target.

pub use {
    blend::{BlendFactor, BlendOp, Blender},
    cache::VertexCache,
    ctx::Context,
    prim::{Renderer, Sink},
    stats::{Stats, Throughput},
    target::{Bitmap, LockMode, SubBitmap, Target, Texture},
};

pub mod blend;
pub mod cache;
pub mod ctx;
pub mod prim;
pub mod raster;
pub mod shader;
pub mod stats;
pub mod target;
