//! Translation of points, lines, and triangles into pixels in a target.
//!
//! All the rasterizers follow the same pixel-center convention: pixel (x, y)
//! covers the unit square with top-left corner (x, y), and its center is at
//! (x + 0.5, y + 0.5). A triangle draws exactly those pixels whose center
//! lies inside it, with left and top edges inclusive and right and bottom
//! edges exclusive; a line draws one pixel per major-axis step, including
//! its start point and excluding its end point. Thus primitives that share
//! an edge or an endpoint tile without gaps or overdrawn pixels.
//!
//! Before drawing, the rasterizers lock the region of the target they may
//! touch. If the target is already locked in a way that does not permit
//! drawing into that region, the draw call does nothing.

use core::ops::{Deref, DerefMut};

use log::debug;

use crate::math::vec::Vec2;
use crate::util::rect::Rect;

use super::target::{LockMode, Target};

pub use line::{
    GradientLine, LineShader, SolidLine, TexturedGradientLine, TexturedLine,
    draw_line, draw_soft_line,
};
pub use point::draw_soft_point;
pub use tri::{
    GradientTri, SolidTri, TexturedGradientTri, TexturedTri, TriShader,
    draw_soft_triangle, draw_triangle,
};

pub mod line;
pub mod point;
pub mod tri;

/// Exclusive access to a target for the duration of a draw call.
///
/// Unlocks the target on drop if the guard locked it.
pub(crate) struct LockGuard<'a, T: Target + ?Sized> {
    target: &'a mut T,
    owned: bool,
}

impl<'a, T: Target + ?Sized> LockGuard<'a, T> {
    /// Prepares `target` for drawing into the region `bbox`.
    ///
    /// If `target` is not locked, locks `bbox` clipped to the clipping
    /// rectangle. If it is already locked, drawing may proceed iff the lock
    /// is writable and overlaps `bbox`. Returns `None` if nothing can be
    /// drawn.
    pub(crate) fn acquire(target: &'a mut T, bbox: &Rect) -> Option<Self> {
        let bbox = bbox.intersect(&target.clip());
        if bbox.is_empty() {
            return None;
        }
        if let Some((lock, mode)) = target.locked_region() {
            if mode == LockMode::ReadOnly || !lock.overlaps(&bbox) {
                debug!("skipping draw: lock {lock:?} denies {bbox:?}");
                return None;
            }
            return Some(Self { target, owned: false });
        }
        match target.lock_region(&bbox, LockMode::ReadWrite) {
            Ok(_) => Some(Self { target, owned: true }),
            Err(e) => {
                debug!("skipping draw: cannot lock {bbox:?}: {e}");
                None
            }
        }
    }
}

impl<T: Target + ?Sized> Deref for LockGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: Target + ?Sized> DerefMut for LockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: Target + ?Sized> Drop for LockGuard<'_, T> {
    fn drop(&mut self) {
        if self.owned {
            self.target.unlock();
        }
    }
}

/// Returns the pixel rectangle containing all of `pts` plus a margin of
/// one pixel on every side.
pub(crate) fn bounding_box(pts: &[Vec2]) -> Rect {
    let Some((first, rest)) = pts.split_first() else {
        return Rect::default();
    };
    let (min, max) = rest
        .iter()
        .fold((*first, *first), |(lo, hi), p| (lo.min(p), hi.max(p)));
    Rect {
        left: floor(min.x()).saturating_sub(1),
        top: floor(min.y()).saturating_sub(1),
        right: ceil(max.x()).saturating_add(1),
        bottom: ceil(max.y()).saturating_add(1),
    }
}

/// Returns the largest integer less than or equal to `x`, saturating.
#[inline]
pub(crate) fn floor(x: f32) -> i32 {
    use crate::math::float::f32;
    f32::floor(x) as i32
}

/// Returns the smallest integer greater than or equal to `x`, saturating.
#[inline]
pub(crate) fn ceil(x: f32) -> i32 {
    use crate::math::float::f32;
    f32::ceil(x) as i32
}

/// Returns whether all coordinates of `pts` are finite.
pub(crate) fn all_finite(pts: &[Vec2]) -> bool {
    pts.iter().all(|p| p.x().is_finite() && p.y().is_finite())
}
