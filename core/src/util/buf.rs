//! Two-dimensional pixel storage and views into it.
//!
//! A [`Buf2`] owns its elements; a [`Slice2`] or [`MutSlice2`] borrows a
//! rectangular region of some other storage. All three share the same
//! [`Layout`]: element (x, y) lives at index `y * stride + x` of the
//! backing slice, so a view of a region of a buffer is just a shorter
//! slice with the parent's stride.
//!
//! These are the storage behind [bitmaps][crate::render::target::Bitmap]
//! and [textures][crate::render::target::Texture]. A sub-bitmap is a
//! bitmap whose storage is a `MutSlice2` of its parent.

use alloc::vec::Vec;
use core::iter::repeat_n;
use core::ops::Range;

use crate::util::rect::Rect;
use crate::util::{Error, Result};

/// Types that can be viewed as an immutable [`Slice2`].
pub trait AsSlice2<T> {
    /// Returns a borrowed view of all of `self`.
    fn as_slice2(&self) -> Slice2<'_, T>;
}

/// Types that can be viewed as a mutable [`MutSlice2`].
pub trait AsMutSlice2<T> {
    /// Returns a mutably borrowed view of all of `self`.
    fn as_mut_slice2(&mut self) -> MutSlice2<'_, T>;
}

/// The dimensions of a 2D buffer and the distance between its rows.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Layout {
    /// Width in elements.
    pub w: usize,
    /// Height in elements.
    pub h: usize,
    /// Distance between the starts of consecutive rows, in elements.
    pub stride: usize,
}

/// A rectangular 2D buffer that owns its elements, stored row by row
/// with no padding.
///
/// # Examples
/// ```
/// # use softprim_core::util::buf::Buf2;
/// let buf = Buf2::new_with(3, 2, |x, y| 10 * y + x);
/// assert_eq!(buf.data(), &[0, 1, 2, 10, 11, 12]);
/// assert_eq!(buf.get(2, 1), Some(&12));
/// assert_eq!(buf.get(3, 1), None);
/// ```
#[derive(Clone, Debug)]
pub struct Buf2<T> {
    layout: Layout,
    data: Vec<T>,
}

/// An immutable view to a rectangle of 2D storage.
///
/// The rows of a `Slice2` need not be contiguous:
/// ```text
/// +------stride-----+
/// |    ____w____    |
/// |   |r0_______|   |
/// |   |r1_______| h |
/// |   |r2_______|   |
/// +-----------------+
/// ```
#[derive(Debug)]
pub struct Slice2<'a, T> {
    layout: Layout,
    data: &'a [T],
}

/// A mutable view to a rectangle of 2D storage.
#[derive(Debug)]
pub struct MutSlice2<'a, T> {
    layout: Layout,
    data: &'a mut [T],
}

//
// Inherent impls
//

impl Layout {
    /// Returns the layout of a `w` × `h` buffer without padding.
    pub const fn packed(w: usize, h: usize) -> Self {
        Self { w, h, stride: w }
    }

    /// Returns the number of backing elements needed by `self`.
    pub fn len(&self) -> usize {
        match self.h {
            0 => 0,
            h => (h - 1) * self.stride + self.w,
        }
    }

    /// Returns whether `self` has no elements.
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Returns whether the rows of `self` follow each other without gaps.
    pub fn is_contiguous(&self) -> bool {
        self.stride == self.w || self.h <= 1
    }

    /// Returns the rectangle (0, 0)..(w, h).
    pub fn bounds(&self) -> Rect {
        Rect::of_size(self.w, self.h)
    }

    /// Returns the backing index of element (x, y), or `None` if the
    /// position is outside `self`.
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.w && y < self.h).then(|| y * self.stride + x)
    }

    /// Returns the backing index range of the span `xs` of row `y`, or
    /// `None` if the span is not inside `self`.
    #[inline]
    pub fn span(&self, y: i32, xs: Range<i32>) -> Option<Range<usize>> {
        if xs.is_empty() {
            return Some(0..0);
        }
        let start = self.index(xs.start, y)?;
        let _ = self.index(xs.end - 1, y)?;
        Some(start..start + xs.len())
    }

    /// Returns the layout of the region `rect` of `self` and the offset
    /// of its first element.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `rect` is not inside `self`.
    fn region(&self, rect: &Rect) -> Result<(Layout, usize)> {
        if !self.bounds().contains_rect(rect) {
            return Err(Error::out_of_bounds(rect));
        }
        if rect.is_empty() {
            return Ok((Layout { w: 0, h: 0, stride: self.stride }, 0));
        }
        let (xs, ys) = rect.ranges();
        let layout = Layout {
            w: xs.len(),
            h: ys.len(),
            stride: self.stride,
        };
        let offset = ys.start as usize * self.stride + xs.start as usize;
        Ok((layout, offset))
    }
}

impl<T> Buf2<T> {
    /// Returns a `w` × `h` buffer with elements taken from `init` in
    /// row-major order.
    ///
    /// # Panics
    /// If `init` yields fewer than `w * h` elements.
    pub fn new<I>(w: usize, h: usize, init: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let layout = Layout::packed(w, h);
        let data: Vec<_> = init.into_iter().take(layout.len()).collect();
        assert_eq!(data.len(), w * h, "too few elements for {w}×{h}");
        Self { layout, data }
    }

    /// Returns a `w` × `h` buffer filled with `T::default()`.
    pub fn new_default(w: usize, h: usize) -> Self
    where
        T: Clone + Default,
    {
        Self::new(w, h, repeat_n(T::default(), w * h))
    }

    /// Returns a `w` × `h` buffer whose element (x, y) is `init(x, y)`.
    pub fn new_with<F>(w: usize, h: usize, mut init: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let data = (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .map(|(x, y)| init(x, y))
            .collect();
        Self { layout: Layout::packed(w, h), data }
    }

    /// Returns a `w` × `h` buffer filled with clones of `val`.
    ///
    /// # Errors
    /// Returns [`Error::Alloc`] if the storage cannot be allocated.
    pub fn try_new(w: usize, h: usize, val: T) -> Result<Self>
    where
        T: Clone,
    {
        let len = w.checked_mul(h).ok_or(Error::Alloc)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize(len, val);
        Ok(Self { layout: Layout::packed(w, h), data })
    }

    /// Returns the layout of `self`.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the elements of `self` in row-major order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns the element at (x, y), or `None` if out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.layout.index(x, y).map(|i| &self.data[i])
    }

    /// Returns an iterator over the rows of `self`.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.as_slice2().rows()
    }

    /// Returns an iterator over the elements of `self` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<'a, T> Slice2<'a, T> {
    /// Returns a view to `data` with the given dimensions and stride.
    ///
    /// # Examples
    /// ```
    /// # use softprim_core::util::buf::Slice2;
    /// let s = Slice2::new(2, 2, 3, &[0, 1, 2, 3, 4, 5, 6]);
    /// assert_eq!(s.rows().collect::<Vec<_>>(), [[0, 1], [3, 4]]);
    /// ```
    ///
    /// # Panics
    /// If `stride < w` or if the rows do not fit in `data`.
    pub fn new(w: usize, h: usize, stride: usize, data: &'a [T]) -> Self {
        let layout = Layout { w, h, stride };
        assert!(stride >= w && layout.len() <= data.len());
        Self { layout, data }
    }

    /// Returns the layout of `self`.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the width of `self`.
    pub fn width(&self) -> usize {
        self.layout.w
    }

    /// Returns the height of `self`.
    pub fn height(&self) -> usize {
        self.layout.h
    }

    /// Returns the element at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&'a T> {
        let data = self.data;
        self.layout.index(x, y).map(|i| &data[i])
    }

    /// Returns an iterator over the rows of `self`, each `width` long.
    pub fn rows(self) -> impl Iterator<Item = &'a [T]> {
        let Layout { w, h, stride } = self.layout;
        self.data
            .chunks(stride.max(1))
            .take(h)
            .map(move |row| &row[..w])
    }

    /// Returns an iterator over the elements of `self` in row-major order.
    pub fn iter(self) -> impl Iterator<Item = &'a T> {
        self.rows().flatten()
    }

    /// Returns a view of the region `rect` of `self`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `rect` is not inside `self`.
    pub fn slice(self, rect: &Rect) -> Result<Self> {
        let (layout, offset) = self.layout.region(rect)?;
        let data = self.data.get(offset..offset + layout.len());
        let data = data.ok_or_else(|| Error::out_of_bounds(rect))?;
        Ok(Self { layout, data })
    }
}

impl<'a, T> MutSlice2<'a, T> {
    /// Returns a mutable view to `data` with the given dimensions and
    /// stride.
    ///
    /// # Panics
    /// If `stride < w` or if the rows do not fit in `data`.
    pub fn new(w: usize, h: usize, stride: usize, data: &'a mut [T]) -> Self {
        let layout = Layout { w, h, stride };
        assert!(stride >= w && layout.len() <= data.len());
        Self { layout, data }
    }

    /// Returns the layout of `self`.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Converts `self` into a view of its region `rect`, keeping the
    /// original borrow.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `rect` is not inside `self`.
    pub fn into_slice(self, rect: &Rect) -> Result<Self> {
        let (layout, offset) = self.layout.region(rect)?;
        let data = self.data.get_mut(offset..offset + layout.len());
        let data = data.ok_or_else(|| Error::out_of_bounds(rect))?;
        Ok(Self { layout, data })
    }

    /// Converts `self` into a reference to its element at (x, y), or
    /// `None` if out of bounds.
    pub fn into_elem(self, x: i32, y: i32) -> Option<&'a mut T> {
        let i = self.layout.index(x, y)?;
        self.data.get_mut(i)
    }

    /// Converts `self` into a reference to the span `xs` of row `y`, or
    /// `None` if the span is not inside `self`.
    pub fn into_span(self, y: i32, xs: Range<i32>) -> Option<&'a mut [T]> {
        let r = self.layout.span(y, xs)?;
        self.data.get_mut(r)
    }

    /// Returns an iterator over the rows of `self`, each `width` long.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [T]> {
        let Layout { w, h, stride } = self.layout;
        self.data
            .chunks_mut(stride.max(1))
            .take(h)
            .map(move |row| &mut row[..w])
    }

    /// Sets every element of `self` to a clone of `val`.
    pub fn fill(&mut self, val: T)
    where
        T: Clone,
    {
        if self.layout.is_contiguous() {
            let len = self.layout.len();
            self.data[..len].fill(val);
        } else {
            self.rows_mut().for_each(|row| row.fill(val.clone()));
        }
    }
}

//
// Local trait impls
//

impl<T> Clone for Slice2<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Slice2<'_, T> {}

impl<T> AsSlice2<T> for Buf2<T> {
    fn as_slice2(&self) -> Slice2<'_, T> {
        Slice2 { layout: self.layout, data: &self.data }
    }
}
impl<T> AsSlice2<T> for Slice2<'_, T> {
    fn as_slice2(&self) -> Slice2<'_, T> {
        *self
    }
}
impl<T> AsSlice2<T> for MutSlice2<'_, T> {
    fn as_slice2(&self) -> Slice2<'_, T> {
        Slice2 { layout: self.layout, data: &*self.data }
    }
}

impl<T> AsMutSlice2<T> for Buf2<T> {
    fn as_mut_slice2(&mut self) -> MutSlice2<'_, T> {
        MutSlice2 { layout: self.layout, data: &mut self.data }
    }
}
impl<T> AsMutSlice2<T> for MutSlice2<'_, T> {
    fn as_mut_slice2(&mut self) -> MutSlice2<'_, T> {
        MutSlice2 { layout: self.layout, data: &mut *self.data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buf_new() {
        let buf = Buf2::new(3, 2, 1..);
        assert_eq!(buf.data(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(buf.layout(), Layout { w: 3, h: 2, stride: 3 });
    }

    #[test]
    #[should_panic]
    fn buf_new_too_few_elements() {
        let _ = Buf2::new(3, 2, [1, 2, 3]);
    }

    #[test]
    fn buf_try_new() {
        let buf = Buf2::try_new(2, 2, 7u8).unwrap();
        assert_eq!(buf.data(), &[7, 7, 7, 7]);
        let huge = Buf2::try_new(usize::MAX, 2, 0u8);
        assert_eq!(huge.unwrap_err(), Error::Alloc);
    }

    #[test]
    fn layout_index() {
        let l = Layout { w: 3, h: 2, stride: 5 };
        assert_eq!(l.len(), 8);
        assert_eq!(l.index(2, 1), Some(7));
        assert_eq!(l.index(3, 1), None);
        assert_eq!(l.index(0, 2), None);
        assert_eq!(l.index(-1, 0), None);

        assert_eq!(l.span(1, 1..3), Some(6..8));
        assert_eq!(l.span(1, 2..4), None);
        assert_eq!(l.span(9, 2..2), Some(0..0));
    }

    #[test]
    fn slice_region() {
        let buf = Buf2::new_with(5, 4, |x, y| x * 10 + y);
        let s = buf.as_slice2().slice(&(2..5, 1..3).into()).unwrap();
        assert_eq!(s.layout(), Layout { w: 3, h: 2, stride: 5 });
        assert_eq!(s.get(2, 1), Some(&42));
        assert_eq!(s.get(3, 1), None);

        let mut rows = s.rows();
        assert_eq!(rows.next(), Some(&[21, 31, 41][..]));
        assert_eq!(rows.next(), Some(&[22, 32, 42][..]));
        assert_eq!(rows.next(), None);
    }

    #[test]
    fn slice_to_bottom_right_corner() {
        let buf = Buf2::new_with(3, 3, |x, y| x + 3 * y);
        let s = buf.as_slice2().slice(&(1..3, 1..3).into()).unwrap();
        assert_eq!(s.iter().copied().collect::<Vec<_>>(), [4, 5, 7, 8]);
    }

    #[test]
    fn slice_out_of_bounds_is_error() {
        let buf: Buf2<()> = Buf2::new_default(4, 5);
        let res = buf.as_slice2().slice(&(0..11, 0..10).into());
        assert_eq!(res.unwrap_err(), Error::OutOfBounds { x: 0, y: 0 });
        assert!(buf.as_slice2().slice(&(-1..2, 0..2).into()).is_err());
    }

    #[test]
    fn empty_slice() {
        let buf: Buf2<u8> = Buf2::new_default(4, 4);
        let s = buf.as_slice2().slice(&(2..2, 1..3).into()).unwrap();
        assert!(s.layout().is_empty());
        assert_eq!(s.iter().count(), 0);
    }

    #[test]
    fn slice_of_non_copy_elements_is_copy() {
        use core::cell::Cell;
        let buf = Buf2::new_with(3, 2, |x, y| Cell::new(x + 3 * y));
        let s = buf.as_slice2();
        let t = s.as_slice2();
        let u = t;
        assert_eq!(s.get(2, 1).map(Cell::get), Some(5));
        assert_eq!(t.iter().map(Cell::get).sum::<usize>(), 15);
        assert_eq!(u.rows().count(), 2);
    }

    #[test]
    #[rustfmt::skip]
    fn fill_region() {
        let mut buf = Buf2::new_default(5, 4);
        let mut s = buf
            .as_mut_slice2()
            .into_slice(&(2..5, 1..3).into())
            .unwrap();

        s.fill(1);

        assert_eq!(
            buf.data(),
            &[0, 0, 0, 0, 0,
              0, 0, 1, 1, 1,
              0, 0, 1, 1, 1,
              0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn nested_regions() {
        let mut buf = Buf2::new_default(4, 4);
        let sub = buf.as_mut_slice2().into_slice(&(1..4, 1..4).into());
        let sub = sub.unwrap().into_slice(&(1..3, 1..3).into()).unwrap();
        *sub.into_elem(1, 1).unwrap() = 7;
        assert_eq!(buf.get(3, 3), Some(&7));
    }

    #[test]
    fn span_of_region() {
        let mut buf = Buf2::new_default(4, 3);
        let sub = buf.as_mut_slice2().into_slice(&(1..4, 1..3).into());
        sub.unwrap().into_span(1, 0..2).unwrap().fill(5);
        assert_eq!(buf.data(), &[0, 0, 0, 0, 0, 0, 0, 0, 0, 5, 5, 0]);
    }
}
