//! The error type shared by the bitmap, rasterizer, and geometry APIs.

use alloc::collections::TryReserveError;
use core::fmt::{self, Display, Formatter};

use crate::util::rect::Rect;

/// Error returned by fallible bitmap and geometry operations.
///
/// Drawing operations themselves never fail: if a draw call cannot
/// proceed, it returns without touching the target.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The bitmap is already locked.
    Locked,
    /// A position or region was outside the bitmap.
    OutOfBounds { x: i32, y: i32 },
    /// A memory allocation failed.
    Alloc,
}

/// Result of a fallible bitmap or geometry operation.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Locked => f.write_str("bitmap already locked"),
            Error::OutOfBounds { x, y } => {
                write!(f, "position (x={x}, y={y}) out of bounds")
            }
            Error::Alloc => f.write_str("memory allocation failed"),
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::Alloc
    }
}

impl Error {
    /// Returns an `OutOfBounds` error pointing to the top-left corner
    /// of `rect`.
    pub(crate) fn out_of_bounds(rect: &Rect) -> Self {
        Error::OutOfBounds { x: rect.left, y: rect.top }
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn display() {
        assert_eq!(format!("{}", Error::Locked), "bitmap already locked");
        assert_eq!(
            format!("{}", Error::OutOfBounds { x: -1, y: 3 }),
            "position (x=-1, y=3) out of bounds"
        );
    }

    #[test]
    fn from_try_reserve_error() {
        let mut v: Vec<u64> = Vec::new();
        let e = v.try_reserve(usize::MAX).unwrap_err();
        assert_eq!(Error::from(e), Error::Alloc);
    }
}
