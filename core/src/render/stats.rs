//! Rendering statistics.

use core::fmt::{self, Display, Formatter};
use core::ops::{Add, AddAssign};

/// Running counts of the work done by a [`Renderer`][super::Renderer].
///
/// Updated by every draw call that reaches the rasterizers. Reset by
/// assigning `Stats::default()`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Number of draw calls that drew at least one primitive.
    pub calls: usize,
    /// Primitives submitted / assembled.
    pub prims: Throughput,
    /// Vertices submitted / used by the assembled primitives.
    pub verts: Throughput,
    /// Pixels inside the draw area / actually written.
    pub pixels: Throughput,
}

/// Counts of items going into and coming out of a rendering stage.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Throughput {
    /// Items in.
    pub i: usize,
    /// Items out.
    pub o: usize,
}

impl Throughput {
    /// Returns the fraction of input items that made it to the output,
    /// or `None` if there was no input.
    pub fn ratio(&self) -> Option<f32> {
        (self.i > 0).then(|| self.o as f32 / self.i as f32)
    }
}

impl Display for Stats {
    /// Formats `self` on one line, for example
    /// `7 calls, 18 prims, 40 verts, 96/120 pixels (80.0%)`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self { calls, prims, verts, pixels } = self;
        write!(
            f,
            "{calls} calls, {} prims, {} verts, {pixels}",
            prims.o, verts.o
        )?;
        f.write_str(" pixels")?;
        if let Some(r) = pixels.ratio() {
            write!(f, " ({:.1}%)", 100.0 * r)?;
        }
        Ok(())
    }
}

impl Display for Throughput {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.o, self.i)
    }
}

impl Add for Throughput {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { i: self.i + rhs.i, o: self.o + rhs.o }
    }
}

impl AddAssign for Throughput {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl AddAssign for Stats {
    /// Adds the counts of `other` to `self`, for example to total the
    /// statistics of renderers running on different threads.
    fn add_assign(&mut self, other: Self) {
        self.calls += other.calls;
        self.prims += other.prims;
        self.verts += other.verts;
        self.pixels += other.pixels;
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    fn stats() -> Stats {
        Stats {
            calls: 7,
            prims: Throughput { i: 18, o: 18 },
            verts: Throughput { i: 40, o: 40 },
            pixels: Throughput { i: 120, o: 96 },
        }
    }

    #[test]
    fn ratio() {
        assert_eq!(Throughput { i: 4, o: 3 }.ratio(), Some(0.75));
        assert_eq!(Throughput::default().ratio(), None);
    }

    #[test]
    fn totals() {
        let mut s = stats();
        s += stats();
        assert_eq!(s.calls, 14);
        assert_eq!(s.pixels, Throughput { i: 240, o: 192 });
    }

    #[test]
    fn display() {
        assert_eq!(
            format!("{}", stats()),
            "7 calls, 18 prims, 40 verts, 96/120 pixels (80.0%)"
        );
        assert_eq!(
            format!("{}", Stats::default()),
            "0 calls, 0 prims, 0 verts, 0/0 pixels"
        );
    }
}
