//! Polyline stroking, polygon triangulation, and high-level 2D shapes
//! for `softprim`.
//!
//! The [shapes] module offers immediate-mode drawing of lines, rectangles,
//! ellipses, arcs, pie slices, splines, and polygons, filled or outlined
//! with a given thickness. Outlines are turned into triangles by the
//! [stroker][stroke] and filled polygons by the [triangulator][tess]; the
//! resulting primitives are drawn by a [`Renderer`][sp::render::Renderer].
//!
//! # Crate features
//!
//! * `std`: Uses the floating-point functions of `std`. Enabled by default.
//! * `libm`: Uses the [libm](https://crates.io/crates/libm) crate instead.
//! * `mm`: Uses the [micromath](https://crates.io/crates/micromath) crate
//!   instead.
//!
//! At least one of the features must be enabled, as curves and joins need
//! trigonometric functions.

#![no_std]

extern crate alloc;
extern crate core;
#[cfg(feature = "std")]
extern crate std;

#[cfg(not(any(feature = "std", feature = "libm", feature = "mm")))]
compile_error!("one of the features `std`, `libm`, or `mm` is required");

pub mod curve;
pub mod isect;
pub mod shapes;
pub mod stroke;
pub mod tess;
