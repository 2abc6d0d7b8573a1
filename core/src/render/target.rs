//! Render targets.
//!
//! A render target is anything the rasterizers can draw into: typically an
//! in-memory [`Bitmap`], or a [`SubBitmap`] view into part of one. Targets
//! carry a clipping rectangle and an advisory lock; the rasterizers only
//! ever touch pixels inside the [draw area][Target::draw_area], the
//! intersection of the two.

use core::ops::Range;

use crate::math::color::Color4f;
use crate::util::buf::{AsMutSlice2, AsSlice2, Buf2, MutSlice2, Slice2};
use crate::util::rect::Rect;
use crate::util::{Error, Result};

use super::blend::Blender;

//
// Types
//

/// How a locked region is going to be accessed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LockMode {
    /// The locker only reads pixels.
    ReadOnly,
    /// The locker only writes pixels.
    WriteOnly,
    /// The locker reads and writes pixels.
    ReadWrite,
}

/// Trait for types that can be used as render targets.
///
/// Coordinates are in pixels relative to the top-left corner of the
/// target. Out-of-bounds accesses return `None` rather than panicking.
pub trait Target {
    /// Returns the width of `self` in pixels.
    fn width(&self) -> usize;

    /// Returns the height of `self` in pixels.
    fn height(&self) -> usize;

    /// Returns the color of the pixel at (x, y),
    /// or `None` if (x, y) is out of bounds.
    fn get_pixel(&self, x: i32, y: i32) -> Option<Color4f>;

    /// Returns a mutable reference to the pixel at (x, y),
    /// or `None` if (x, y) is out of bounds.
    ///
    /// Ignores the clipping rectangle and the lock.
    fn pixel_mut(&mut self, x: i32, y: i32) -> Option<&mut Color4f>;

    /// Returns the pixels `xs` of row `y` as a mutable slice,
    /// or `None` if any of them is out of bounds.
    ///
    /// Ignores the clipping rectangle and the lock.
    fn span_mut(&mut self, y: i32, xs: Range<i32>) -> Option<&mut [Color4f]>;

    /// Returns the clipping rectangle of `self`.
    fn clip(&self) -> Rect;

    /// Sets the clipping rectangle of `self`.
    ///
    /// The rectangle is intersected with the bounds of `self`.
    fn set_clip(&mut self, clip: Rect);

    /// Locks the region `rect` of `self` for access in `mode`.
    ///
    /// Returns the locked region. While locked, drawing is restricted to the
    /// locked region.
    ///
    /// # Errors
    /// Returns [`Error::Locked`] if `self` is already locked, or
    /// [`Error::OutOfBounds`] if `rect` is not inside the bounds of `self`.
    fn lock_region(&mut self, rect: &Rect, mode: LockMode) -> Result<Rect>;

    /// Unlocks `self`. No-op if `self` is not locked.
    fn unlock(&mut self);

    /// Returns the currently locked region and its mode, if any.
    fn locked_region(&self) -> Option<(Rect, LockMode)>;

    /// Returns whether `self` is currently locked.
    fn is_locked(&self) -> bool {
        self.locked_region().is_some()
    }

    /// Returns the bounds of `self` as a rectangle with origin at 0.
    fn bounds(&self) -> Rect {
        Rect::of_size(self.width(), self.height())
    }

    /// Returns the region of `self` that drawing operations may modify:
    /// the clipping rectangle, intersected with the locked region if any.
    fn draw_area(&self) -> Rect {
        let clip = self.clip();
        match self.locked_region() {
            Some((lock, _)) => clip.intersect(&lock),
            None => clip,
        }
    }

    /// Writes `color` to the pixel at (x, y) without blending.
    ///
    /// Returns whether the pixel was written: pixels outside the draw area
    /// are left untouched.
    fn put_pixel(&mut self, x: i32, y: i32, color: Color4f) -> bool {
        if !self.draw_area().contains(x, y) {
            return false;
        }
        self.pixel_mut(x, y).map(|p| *p = color).is_some()
    }

    /// Blends `color` into the pixel at (x, y) with `blender`.
    ///
    /// Returns whether the pixel was written: pixels outside the draw area
    /// are left untouched.
    fn draw_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: Color4f,
        blender: &Blender,
    ) -> bool {
        if !self.draw_area().contains(x, y) {
            return false;
        }
        self.pixel_mut(x, y)
            .map(|p| *p = blender.blend(color, *p))
            .is_some()
    }
}

/// An in-memory bitmap of [`Color4f`] pixels.
///
/// The pixel storage is any 2D buffer: by default an owned [`Buf2`];
/// a [`SubBitmap`] borrows part of the storage of another bitmap.
#[derive(Clone, Debug)]
pub struct Bitmap<B = Buf2<Color4f>> {
    buf: B,
    clip: Rect,
    lock: Option<(Rect, LockMode)>,
}

/// A bitmap drawing into a rectangular part of another bitmap.
///
/// A sub-bitmap has its own clipping rectangle and lock. Its coordinates
/// are relative to its own top-left corner.
pub type SubBitmap<'a> = Bitmap<MutSlice2<'a, Color4f>>;

/// An immutable 2D view of pixels, used as a texture by the rasterizers.
///
/// Texture coordinates are in texels; lookups wrap around at the edges.
pub type Texture<'a> = Slice2<'a, Color4f>;

//
// Inherent impls
//

impl Bitmap {
    /// Returns a new `w` × `h` bitmap filled with transparent black.
    pub fn new(w: usize, h: usize) -> Self {
        Self::from_buf(Buf2::new_default(w, h))
    }

    /// Returns a new `w` × `h` bitmap filled with `color`.
    ///
    /// # Errors
    /// Returns [`Error::Alloc`] if the pixel storage cannot be allocated.
    pub fn try_new(w: usize, h: usize, color: Color4f) -> Result<Self> {
        Ok(Self::from_buf(Buf2::try_new(w, h, color)?))
    }
}

impl<B: AsSlice2<Color4f>> Bitmap<B> {
    /// Returns a bitmap using `buf` as its pixel storage.
    ///
    /// The clipping rectangle is initially the whole bitmap.
    pub fn from_buf(buf: B) -> Self {
        let clip = buf.as_slice2().layout().bounds();
        Self { buf, clip, lock: None }
    }

    /// Returns the pixel storage of `self`.
    pub fn buf(&self) -> &B {
        &self.buf
    }

    /// Returns the pixel storage of `self`, consuming `self`.
    pub fn into_buf(self) -> B {
        self.buf
    }

    /// Returns a view of the pixels of `self` usable as a texture.
    pub fn as_texture(&self) -> Texture<'_> {
        self.buf.as_slice2()
    }
}

impl<B: AsMutSlice2<Color4f>> Bitmap<B> {
    /// Returns a sub-bitmap drawing into the region `rect` of `self`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `rect` is not inside the bounds
    /// of `self`, or [`Error::Locked`] if `self` is locked.
    pub fn sub_bitmap(&mut self, rect: &Rect) -> Result<SubBitmap<'_>> {
        if self.lock.is_some() {
            return Err(Error::Locked);
        }
        let slice = self.buf.as_mut_slice2().into_slice(rect)?;
        Ok(Bitmap::from_buf(slice))
    }

    /// Fills the whole of `self` with `color`, ignoring the clipping
    /// rectangle and the lock.
    pub fn clear(&mut self, color: Color4f) {
        self.buf.as_mut_slice2().fill(color);
    }
}

//
// Local trait impls
//

impl<B> Target for Bitmap<B>
where
    B: AsSlice2<Color4f> + AsMutSlice2<Color4f>,
{
    fn width(&self) -> usize {
        self.buf.as_slice2().width()
    }

    fn height(&self) -> usize {
        self.buf.as_slice2().height()
    }

    fn get_pixel(&self, x: i32, y: i32) -> Option<Color4f> {
        self.buf.as_slice2().get(x, y).copied()
    }

    fn pixel_mut(&mut self, x: i32, y: i32) -> Option<&mut Color4f> {
        self.buf.as_mut_slice2().into_elem(x, y)
    }

    fn span_mut(&mut self, y: i32, xs: Range<i32>) -> Option<&mut [Color4f]> {
        self.buf.as_mut_slice2().into_span(y, xs)
    }

    fn clip(&self) -> Rect {
        self.clip
    }

    fn set_clip(&mut self, clip: Rect) {
        self.clip = clip.intersect(&self.bounds());
    }

    fn lock_region(&mut self, rect: &Rect, mode: LockMode) -> Result<Rect> {
        if self.lock.is_some() {
            return Err(Error::Locked);
        }
        if rect.is_empty() || !self.bounds().contains_rect(rect) {
            return Err(Error::out_of_bounds(rect));
        }
        self.lock = Some((*rect, mode));
        Ok(*rect)
    }

    fn unlock(&mut self) {
        self.lock = None;
    }

    fn locked_region(&self) -> Option<(Rect, LockMode)> {
        self.lock
    }
}

//
// Foreign trait impls
//

impl Default for Bitmap {
    /// Returns an empty 0 × 0 bitmap.
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::math::color::{rgb, rgba};

    use super::*;

    const RED: Color4f = rgb(1.0, 0.0, 0.0);

    #[test]
    fn new_bitmap_is_transparent() {
        let bmp = Bitmap::new(3, 2);
        assert_eq!(bmp.width(), 3);
        assert_eq!(bmp.height(), 2);
        assert_eq!(bmp.clip(), Rect::new(0, 0, 3, 2));
        assert_eq!(bmp.get_pixel(2, 1), Some(Color4f::TRANSPARENT));
        assert_eq!(bmp.get_pixel(3, 1), None);
        assert_eq!(bmp.get_pixel(0, -1), None);
    }

    #[test]
    fn try_new_too_large_is_alloc_error() {
        let res = Bitmap::try_new(usize::MAX, 2, RED);
        assert_eq!(res.unwrap_err(), Error::Alloc);
    }

    #[test]
    fn put_pixel_honors_clip() {
        let mut bmp = Bitmap::new(4, 4);
        bmp.set_clip(Rect::new(1, 1, 2, 2));

        assert!(bmp.put_pixel(1, 1, RED));
        assert!(!bmp.put_pixel(0, 0, RED));
        assert!(!bmp.put_pixel(3, 3, RED));
        assert!(!bmp.put_pixel(-1, 9, RED));

        assert_eq!(bmp.get_pixel(1, 1), Some(RED));
        assert_eq!(bmp.get_pixel(0, 0), Some(Color4f::TRANSPARENT));
    }

    #[test]
    fn set_clip_is_intersected_with_bounds() {
        let mut bmp = Bitmap::new(4, 4);
        bmp.set_clip(Rect::new(-2, 2, 10, 10));
        assert_eq!(bmp.clip(), Rect::new(0, 2, 4, 2));
    }

    #[test]
    fn draw_pixel_blends() {
        let mut bmp = Bitmap::try_new(2, 2, rgb(0.0, 0.0, 1.0)).unwrap();
        let half = rgba(1.0, 0.0, 0.0, 0.5);
        assert!(bmp.draw_pixel(0, 0, half, &Blender::ALPHA));
        assert_eq!(bmp.get_pixel(0, 0), Some(rgba(0.5, 0.0, 0.5, 0.75)));
    }

    #[test]
    fn lock_twice_is_error() {
        let mut bmp = Bitmap::new(4, 4);
        let r = Rect::new(0, 0, 2, 2);
        assert_eq!(bmp.lock_region(&r, LockMode::ReadWrite), Ok(r));
        assert!(bmp.is_locked());
        assert_eq!(
            bmp.lock_region(&r, LockMode::ReadOnly),
            Err(Error::Locked)
        );
        assert_eq!(bmp.locked_region(), Some((r, LockMode::ReadWrite)));

        bmp.unlock();
        assert!(!bmp.is_locked());
        assert_eq!(bmp.lock_region(&r, LockMode::ReadOnly), Ok(r));
    }

    #[test]
    fn lock_out_of_bounds_is_error() {
        let mut bmp = Bitmap::new(4, 4);
        let res = bmp.lock_region(&Rect::new(2, 2, 4, 4), LockMode::ReadWrite);
        assert_eq!(res, Err(Error::OutOfBounds { x: 2, y: 2 }));
        assert!(!bmp.is_locked());
    }

    #[test]
    fn lock_restricts_draw_area() {
        let mut bmp = Bitmap::new(4, 4);
        bmp.set_clip(Rect::new(1, 0, 3, 4));
        let lock = Rect::new(0, 2, 4, 2);
        bmp.lock_region(&lock, LockMode::WriteOnly).unwrap();

        assert_eq!(bmp.draw_area(), Rect::new(1, 2, 3, 2));
        assert!(!bmp.put_pixel(1, 1, RED));
        assert!(bmp.put_pixel(1, 2, RED));
    }

    #[test]
    fn span_mut() {
        let mut bmp = Bitmap::new(4, 3);
        bmp.span_mut(1, 1..3).unwrap().fill(RED);
        assert_eq!(bmp.get_pixel(0, 1), Some(Color4f::TRANSPARENT));
        assert_eq!(bmp.get_pixel(1, 1), Some(RED));
        assert_eq!(bmp.get_pixel(2, 1), Some(RED));
        assert_eq!(bmp.get_pixel(3, 1), Some(Color4f::TRANSPARENT));

        assert!(bmp.span_mut(1, 2..5).is_none());
        assert!(bmp.span_mut(3, 0..1).is_none());
        assert_eq!(bmp.span_mut(9, 2..2).map(|s| s.len()), Some(0));
    }

    #[test]
    fn sub_bitmap_draws_into_parent() {
        let mut bmp = Bitmap::new(4, 4);
        {
            let mut sub = bmp.sub_bitmap(&Rect::new(1, 2, 3, 2)).unwrap();
            assert_eq!(sub.width(), 3);
            assert_eq!(sub.height(), 2);
            assert!(sub.put_pixel(2, 1, RED));
            assert!(!sub.put_pixel(3, 1, RED));
            *sub.span_mut(0, 0..3).unwrap().first_mut().unwrap() = RED;
        }
        assert_eq!(bmp.get_pixel(3, 3), Some(RED));
        assert_eq!(bmp.get_pixel(1, 2), Some(RED));
        assert_eq!(bmp.get_pixel(2, 2), Some(Color4f::TRANSPARENT));
    }

    #[test]
    fn sub_bitmap_of_locked_is_error() {
        let mut bmp = Bitmap::new(4, 4);
        bmp.lock_region(&Rect::new(0, 0, 1, 1), LockMode::ReadOnly)
            .unwrap();
        assert!(matches!(
            bmp.sub_bitmap(&Rect::new(0, 0, 2, 2)),
            Err(Error::Locked)
        ));
    }
}
