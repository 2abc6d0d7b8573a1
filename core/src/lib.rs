//! ```text
//!                    ___ __                    _
//!     ________  ____/ _// /_ ____  _____ (_)___ ___
//!    / ___/ __ \/ __/ /_/ __// __ \/ ___// // __ `__ \
//!   (__  ) /_/ / / / __/ /_ / /_/ / /   / // / / / / /
//!  /____/\____/_/ /_/  \__// .___/_/   /_//_/ /_/ /_/
//!                         /_/
//! ```
//!
//! Core functionality of the `softprim` project.
//!
//! Includes a small math library with 2D vectors, affine transforms, and
//! colors; vertices and primitive types; bitmaps and other render targets;
//! and a software rasterizer drawing points, lines, and triangles with
//! solid, gradient, and textured shading and configurable blending.
//!
//! # Crate features
//!
//! * `std`:
//!   Uses the floating-point functions of `std`, needed by rotations and
//!   the curve tessellators, and implements `std::error::Error`.
//!
//!   If this feature is disabled, the crate only depends on `alloc`.
//!
//! * `libm`:
//!   Provides software implementations of floating-point functions via the
//!   [libm](https://crates.io/crates/libm) crate.
//!
//! * `mm`:
//!   Provides fast approximate implementations of floating-point functions
//!   via the [micromath](https://crates.io/crates/micromath) crate.
//!
//! All features are disabled by default. The rasterizers themselves work
//! without any of them.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;
extern crate core;

pub mod geom;
pub mod math;
pub mod render;
pub mod util;

pub mod prelude {
    #[cfg(feature = "fp")]
    pub use crate::math::mat::rotate;
    pub use crate::math::{
        approx::ApproxEq,
        color::{Color4, Color4f, rgb, rgba},
        mat::{Mat2x3, Transform, scale, translate},
        vec::{Vec2, Vector, splat, vec2},
    };

    pub use crate::geom::{PrimType, Vertex, vertex};

    pub use crate::render::{
        Bitmap, Blender, Context, LockMode, Renderer, SubBitmap, Target,
        Texture,
    };

    pub use crate::util::{
        Error, Result,
        buf::{AsMutSlice2, AsSlice2, Buf2, MutSlice2, Slice2},
        rect::Rect,
    };
}
