//! Rectangular regions; essentially two-dimensional ranges.

use core::ops::{Range, RangeInclusive, Sub};

/// An axis-aligned rectangle with half-open bounds.
///
/// A rectangle contains a point (x, y) iff `left <= x < right` and
/// `top <= y < bottom`. If `right <= left` or `bottom <= top`, the
/// rectangle is empty.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Rect<T = i32> {
    /// The left bound of `self`, inclusive.
    pub left: T,
    /// The top bound of `self`, inclusive.
    pub top: T,
    /// The right bound of `self`, exclusive.
    pub right: T,
    /// The bottom bound of `self`, exclusive.
    pub bottom: T,
}

impl Rect {
    /// Returns a rectangle with top-left corner (x, y) and size w × h.
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + w,
            bottom: y + h,
        }
    }

    /// Returns a rectangle covering a `w` × `h` buffer with origin at 0.
    #[inline]
    pub const fn of_size(w: usize, h: usize) -> Self {
        Self::new(0, 0, w as i32, h as i32)
    }
}

impl<T: Copy + Ord> Rect<T> {
    /// Returns the width of `self`, or zero if `self` is empty.
    pub fn width(&self) -> T::Output
    where
        T: Sub,
    {
        let (r, l) = (self.right, self.left);
        r - r.min(l) // Clamp width to 0
    }

    /// Returns the height of `self`, or zero if `self` is empty.
    pub fn height(&self) -> T::Output
    where
        T: Sub,
    {
        let (b, t) = (self.bottom, self.top);
        b - b.min(t) // Clamp height to 0
    }

    /// Returns whether `self` contains no points.
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Returns whether the point (x, y) is inside `self`.
    pub fn contains(&self, x: T, y: T) -> bool {
        (self.left..self.right).contains(&x)
            && (self.top..self.bottom).contains(&y)
    }

    /// Returns whether `other` is entirely inside `self`.
    ///
    /// An empty rectangle is inside every rectangle.
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.is_empty()
            || (self.left <= other.left
                && self.top <= other.top
                && other.right <= self.right
                && other.bottom <= self.bottom)
    }

    /// Returns whether `self` and `other` have any points in common.
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Returns the intersection of `self` and `other`.
    ///
    /// The result may be empty, in which case its bounds are unspecified
    /// beyond `is_empty` returning true.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }

    /// Returns the horizontal and vertical extents of `self` as ranges.
    pub fn ranges(&self) -> (Range<T>, Range<T>) {
        (self.left..self.right, self.top..self.bottom)
    }
}

impl<T> From<(Range<T>, Range<T>)> for Rect<T> {
    fn from((x, y): (Range<T>, Range<T>)) -> Self {
        Self {
            left: x.start,
            top: y.start,
            right: x.end,
            bottom: y.end,
        }
    }
}

impl From<(RangeInclusive<i32>, RangeInclusive<i32>)> for Rect {
    fn from((x, y): (RangeInclusive<i32>, RangeInclusive<i32>)) -> Self {
        Self {
            left: *x.start(),
            top: *y.start(),
            right: *x.end() + 1,
            bottom: *y.end() + 1,
        }
    }
}
