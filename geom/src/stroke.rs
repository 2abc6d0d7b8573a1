//! Turning polylines into triangles.
//!
//! The stroker outlines each segment of a polyline with a rectangle of the
//! stroke thickness, fills the gaps at the corners with a [join][LineJoin],
//! and finishes the ends of open polylines with a [cap][LineCap]. The
//! result is a soup of triangles handed to a callback one at a time.

use core::f32::consts::{PI, TAU};

use sp::math::{Vec2, vec2};

use crate::isect::{direction, exit_point, normalize};

//
// Types
//

/// How the outlines of two consecutive segments are connected.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum LineJoin {
    /// The gap on the outside of the corner is left open.
    #[default]
    None,
    /// The gap is filled with a triangle.
    Bevel,
    /// The gap is filled with a circular sector.
    Round,
    /// The outer edges are extended until they meet, up to the miter limit.
    Miter,
}

/// How the ends of an open polyline are finished.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum LineCap {
    /// The stroke ends flush with the end point.
    #[default]
    None,
    /// The stroke is extended by half the thickness.
    Square,
    /// The stroke ends in a half circle.
    Round,
    /// The stroke ends in a triangle pointing outwards.
    Triangle,
    /// The polyline is closed: the last point connects to the first.
    Closed,
}

/// The parameters of a stroke.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stroke {
    /// The width of the stroke.
    pub thickness: f32,
    /// How consecutive segments are joined.
    pub join: LineJoin,
    /// How the ends are finished.
    pub cap: LineCap,
    /// The maximum distance of a miter join from its corner point as a
    /// multiple of half the thickness.
    pub miter_limit: f32,
}

/// A segment of the polyline.
#[derive(Copy, Clone, Debug)]
struct Segment {
    dir: Vec2,
    normal: Vec2,
    len: f32,
}

/// The outline points at a corner of the polyline.
#[derive(Copy, Clone, Debug)]
struct Corner {
    /// The ends of the incoming segment's outline, normal side first.
    end: [Vec2; 2],
    /// The starts of the outgoing segment's outline, normal side first.
    start: [Vec2; 2],
    /// Unit vector pointing from the corner to the outside.
    middle: Vec2,
    /// Signed angle between the segment directions.
    angle: f32,
    /// Distance from the corner to the meeting point of the outer edges.
    miter: f32,
}

/// Number of segments in a quarter circle of a round join or cap.
const ARC_SEGMENTS: f32 = 16.0;

//
// Inherent impls
//

impl Stroke {
    /// Returns a stroke of `thickness` with no joins or caps.
    pub fn new(thickness: f32) -> Self {
        Self {
            thickness,
            join: LineJoin::None,
            cap: LineCap::None,
            miter_limit: 1.0,
        }
    }

    /// Returns `self` with `join`.
    #[must_use]
    pub fn join(self, join: LineJoin) -> Self {
        Self { join, ..self }
    }

    /// Returns `self` with `cap`.
    #[must_use]
    pub fn cap(self, cap: LineCap) -> Self {
        Self { cap, ..self }
    }

    /// Returns `self` with `miter_limit`.
    #[must_use]
    pub fn miter_limit(self, miter_limit: f32) -> Self {
        Self { miter_limit, ..self }
    }
}

impl Segment {
    fn new(a: Vec2, b: Vec2) -> Self {
        let (dir, len) = direction(a, b);
        Self { dir, normal: dir.perp(), len }
    }
}

impl Corner {
    /// Computes the corner at `v1` between the segments `v0`–`v1` and
    /// `v1`–`v2` of a stroke with radius `r`.
    fn new(v0: Vec2, v1: Vec2, v2: Vec2, r: f32) -> Self {
        use sp::math::float::f32 as fp;

        let s0 = Segment::new(v0, v1);
        let s1 = Segment::new(v1, v2);
        let (n0, n1) = (s0.normal, s1.normal);

        let (dot, cross) = (s0.dir.dot(&s1.dir), s0.dir.cross(&s1.dir));
        let angle = if dot == 0.0 && cross == 0.0 {
            0.0
        } else {
            fp::atan2(-cross, dot)
        };

        let mut miter = if angle == 0.0 {
            r
        } else {
            r / fp::cos(angle.abs() / 2.0)
        };
        // Too short segments cannot hold the inner meeting point. When the
        // polyline doubles back, cos(angle / 2) is zero or slightly negative
        // and there is no meeting point at all.
        let sharp = !(miter >= 0.0 && miter <= s0.len && miter <= s1.len);
        if sharp {
            miter = if miter > 0.0 {
                miter.min(s0.len).min(s1.len)
            } else {
                0.0
            };
        }

        let mut middle = normalize(n0 + n1);
        if middle == Vec2::ZERO {
            middle = s1.dir;
        }

        let out = |n: Vec2| v1 + n * r;
        let inn = |n: Vec2| v1 - n * r;
        if angle > 0.0 {
            // Turning towards the normals; the normal side is the outside
            let inner = v1 - middle * miter;
            let (l1, r1) = if sharp {
                (inn(n0), inn(n1))
            } else {
                (inner, inner)
            };
            Self {
                end: [out(n0), l1],
                start: [out(n1), r1],
                middle,
                angle,
                miter,
            }
        } else {
            let middle = -middle;
            let inner = v1 - middle * miter;
            let (l0, r0) = if sharp {
                (out(n0), out(n1))
            } else {
                (inner, inner)
            };
            Self {
                end: [l0, inn(n0)],
                start: [r0, inn(n1)],
                middle,
                angle,
                miter,
            }
        }
    }
}

//
// Free functions
//

/// Strokes the polyline through `pts` with `stroke`, calling `emit` with
/// each resulting triangle.
///
/// Emits nothing if there are fewer than two points or if the thickness is
/// not positive. A closed polyline must have at least three points; the cap
/// of a two-point polyline is ignored if it is [`LineCap::Closed`].
///
/// # Examples
/// ```
/// use sp::math::vec2;
/// use softprim_geom::stroke::{Stroke, stroke_polyline};
///
/// let pts = [vec2(0.0, 0.0), vec2(10.0, 0.0)];
/// let mut tris = vec![];
/// stroke_polyline(&pts, &Stroke::new(2.0), |t| tris.push(t));
///
/// // Four triangles outline a segment
/// assert_eq!(tris.len(), 4);
/// ```
pub fn stroke_polyline<F>(pts: &[Vec2], stroke: &Stroke, mut emit: F)
where
    F: FnMut([Vec2; 3]),
{
    let n = pts.len();
    let r = stroke.thickness / 2.0;
    if n < 2 || !(r > 0.0) {
        return;
    }
    let closed = stroke.cap == LineCap::Closed && n > 2;
    let at = |i: usize| pts[i % n];

    // The outline points at the start of the current segment
    let (mut p0, mut p1);
    let steps;
    if closed {
        [p0, p1] = Corner::new(pts[n - 1], pts[0], pts[1], r).start;
        steps = n + 1;
    } else {
        emit_cap(stroke.cap, pts[1], pts[0], r, &mut emit);
        emit_cap(stroke.cap, pts[n - 2], pts[n - 1], r, &mut emit);
        [p0, p1] = offsets(pts[0], Segment::new(pts[0], pts[1]).normal, r);
        steps = n;
    }

    for i in 1..steps {
        let (v0, v1) = (at(i - 1), at(i));
        let (l0, l1, r0, r1);
        if closed || i < steps - 1 {
            let c = Corner::new(v0, v1, at(i + 1), r);
            if c.angle >= 0.0 {
                emit_join(stroke, v1, c.end[0], c.start[0], &c, r, &mut emit);
            } else {
                emit_join(stroke, v1, c.start[1], c.end[1], &c, r, &mut emit);
            }
            [l0, l1] = c.end;
            [r0, r1] = c.start;
        } else {
            [l0, l1] = offsets(v1, Segment::new(v0, v1).normal, r);
            [r0, r1] = [l0, l1];
        }

        emit([v0, v1, l1]);
        emit([v0, l1, p1]);
        emit([v0, p0, l0]);
        emit([v0, l0, v1]);

        [p0, p1] = [r0, r1];
    }
}

/// Returns the points at distance `r` from `p` along `normal`, positive
/// side first.
fn offsets(p: Vec2, normal: Vec2, r: f32) -> [Vec2; 2] {
    [p + normal * r, p - normal * r]
}

/// Emits the cap at `v1` of the segment `v0`–`v1`.
fn emit_cap<F>(cap: LineCap, v0: Vec2, v1: Vec2, r: f32, emit: &mut F)
where
    F: FnMut([Vec2; 3]),
{
    let Segment { dir, normal, .. } = Segment::new(v0, v1);
    let [a, b] = offsets(v1, normal, r);
    match cap {
        LineCap::Square => {
            let (c, d) = (a + dir * r, b + dir * r);
            emit([a, c, d]);
            emit([a, d, b]);
        }
        LineCap::Triangle => emit([a, v1 + dir * r, b]),
        LineCap::Round => {
            use sp::math::float::f32 as fp;
            let start = fp::atan2(-normal.y(), -normal.x());
            emit_arc(v1, start, start + PI, r, emit);
        }
        LineCap::None | LineCap::Closed => {}
    }
}

/// Emits the join filling the gap between the outline points `p0` and `p1`
/// at the corner `pivot`.
fn emit_join<F>(
    stroke: &Stroke,
    pivot: Vec2,
    p0: Vec2,
    p1: Vec2,
    corner: &Corner,
    r: f32,
    emit: &mut F,
) where
    F: FnMut([Vec2; 3]),
{
    match stroke.join {
        LineJoin::None => {}
        LineJoin::Bevel => emit([pivot, p0, p1]),
        LineJoin::Round => {
            let start = angle_of(p1 - pivot);
            let mut end = angle_of(p0 - pivot);
            if end < start {
                end += TAU;
            }
            emit_arc(pivot, start, end, r, emit);
        }
        LineJoin::Miter => {
            let max = stroke.miter_limit * r;
            let tip = pivot + corner.middle * corner.miter;
            if corner.miter > max {
                // Cut off where the outer edges leave the limit circle
                let c0 = exit_point(pivot, p0, tip, max);
                let c1 = exit_point(pivot, p1, tip, max);
                emit([pivot, p0, c0]);
                emit([pivot, c0, c1]);
                emit([pivot, c1, p1]);
            } else {
                emit([pivot, p0, tip]);
                emit([pivot, tip, p1]);
            }
        }
    }
}

/// Emits a circular sector around `pivot` with radius `r` from the angle
/// `start` to the angle `end`.
fn emit_arc<F>(pivot: Vec2, start: f32, end: f32, r: f32, emit: &mut F)
where
    F: FnMut([Vec2; 3]),
{
    use sp::math::float::f32 as fp;

    if (end - start).abs() < 0.001 {
        return;
    }
    let start = start % TAU;
    let mut end = end % TAU;
    if end <= start {
        end += TAU;
    }
    let arc = end - start;
    let segs = ((ARC_SEGMENTS * arc / PI * 2.0 + 0.5) as usize).max(1);

    let step = arc / segs as f32;
    let (c, s) = (fp::cos(step), fp::sin(step));
    let mut d = vec2(fp::cos(start), fp::sin(start)) * r;
    let mut v0 = pivot + d;
    for i in 1..=segs {
        let v1 = if i == segs {
            pivot + vec2(fp::cos(end), fp::sin(end)) * r
        } else {
            d = vec2(c * d.x() - s * d.y(), s * d.x() + c * d.y());
            pivot + d
        };
        emit([v0, pivot, v1]);
        v0 = v1;
    }
}

/// Returns the angle of `v` from the positive x axis.
fn angle_of(v: Vec2) -> f32 {
    use sp::math::float::f32 as fp;
    fp::atan2(v.y(), v.x())
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use sp::assert_approx_eq;

    use super::*;

    fn stroke(pts: &[Vec2], stroke: Stroke) -> Vec<[Vec2; 3]> {
        let mut tris = Vec::new();
        stroke_polyline(pts, &stroke, |t| tris.push(t));
        tris
    }

    fn area(tris: &[[Vec2; 3]]) -> f32 {
        tris.iter()
            .map(|[a, b, c]| (*b - *a).cross(&(*c - *a)).abs() / 2.0)
            .sum()
    }

    const L: [Vec2; 3] = [vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(10.0, 10.0)];

    #[test]
    fn too_few_points_or_no_thickness() {
        assert!(stroke(&L[..1], Stroke::new(2.0)).is_empty());
        assert!(stroke(&L, Stroke::new(0.0)).is_empty());
        assert!(stroke(&L, Stroke::new(-1.0)).is_empty());
    }

    #[test]
    fn single_segment_covers_rectangle() {
        let tris = stroke(&L[..2], Stroke::new(2.0));
        assert_eq!(tris.len(), 4);
        assert_approx_eq!(area(&tris), 20.0);
        for p in tris.iter().flatten() {
            assert!(p.y().abs() <= 1.0 + 1e-6, "{p:?}");
        }
    }

    #[test]
    fn square_caps_extend_by_radius() {
        let tris = stroke(&L[..2], Stroke::new(2.0).cap(LineCap::Square));
        assert_eq!(tris.len(), 4 + 2 * 2);
        assert_approx_eq!(area(&tris), 24.0);
        let xs = tris.iter().flatten().map(|p| p.x());
        assert_eq!(xs.clone().fold(f32::MAX, f32::min), -1.0);
        assert_eq!(xs.fold(f32::MIN, f32::max), 11.0);
    }

    #[test]
    fn triangle_caps() {
        let tris = stroke(&L[..2], Stroke::new(2.0).cap(LineCap::Triangle));
        assert_eq!(tris.len(), 4 + 2);
        assert_approx_eq!(area(&tris), 22.0);
    }

    #[test]
    fn round_caps_are_half_circles() {
        let tris = stroke(&L[..2], Stroke::new(2.0).cap(LineCap::Round));
        // Two half circles of 32 segments each
        assert_eq!(tris.len(), 4 + 2 * 32);
        assert_approx_eq!(area(&tris), 20.0 + PI, eps = 1e-2);
    }

    #[test]
    fn two_points_cannot_be_closed() {
        let open = stroke(&L[..2], Stroke::new(2.0));
        let closed = stroke(&L[..2], Stroke::new(2.0).cap(LineCap::Closed));
        assert_eq!(open, closed);
    }

    #[test]
    fn bevel_join_fills_corner() {
        let none = stroke(&L, Stroke::new(2.0));
        let bevel = stroke(&L, Stroke::new(2.0).join(LineJoin::Bevel));
        assert_eq!(none.len(), 8);
        assert_eq!(bevel.len(), 9);
        // A right triangle with legs of length 1
        assert_approx_eq!(area(&bevel) - area(&none), 0.5, eps = 1e-4);
    }

    #[test]
    fn miter_join_within_limit() {
        let st = Stroke::new(2.0).join(LineJoin::Miter).miter_limit(2.0);
        let tris = stroke(&L, st);
        assert_eq!(tris.len(), 8 + 2);
        // The outer corner at (11, -1) is reached
        let corner = vec2(11.0, -1.0);
        assert!(tris.iter().flatten().any(|p| (*p - corner).len() < 1e-4));
    }

    #[test]
    fn miter_join_cut_off_at_limit() {
        let st = Stroke::new(2.0).join(LineJoin::Miter).miter_limit(1.2);
        let tris = stroke(&L, st);
        assert_eq!(tris.len(), 8 + 3);
        let pivot = L[1];
        for p in tris[..3].iter().flatten() {
            assert!((*p - pivot).len() <= 1.2 + 1e-5, "{p:?}");
        }
    }

    #[test]
    fn round_join_is_quarter_circle() {
        let none = stroke(&L, Stroke::new(2.0));
        let round = stroke(&L, Stroke::new(2.0).join(LineJoin::Round));
        assert_eq!(round.len(), 8 + 16);
        let sector = area(&round) - area(&none);
        assert_approx_eq!(sector, PI / 4.0, eps = 1e-2);
    }

    #[test]
    fn closed_square_has_joins_at_every_corner() {
        let sq = [
            vec2(0.0, 0.0),
            vec2(10.0, 0.0),
            vec2(10.0, 10.0),
            vec2(0.0, 10.0),
        ];
        let st = Stroke::new(2.0).cap(LineCap::Closed);
        let tris = stroke(&sq, st.join(LineJoin::Miter).miter_limit(2.0));
        assert_eq!(tris.len(), 4 * (4 + 2));
        // Outline from -1 to 11 minus the hole from 1 to 9
        assert_approx_eq!(area(&tris), 144.0 - 64.0, eps = 1e-4);
    }

    #[test]
    fn doubling_back_stays_near_the_polyline() {
        let joins = [
            LineJoin::None,
            LineJoin::Bevel,
            LineJoin::Round,
            LineJoin::Miter,
        ];
        let back = [vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(5.0, 0.0)];
        let up = [vec2(0.0, 0.0), vec2(0.0, -10.0), vec2(0.0, -2.0)];
        for pts in [back, up] {
            for join in joins {
                for cap in [LineCap::None, LineCap::Closed] {
                    let st = Stroke::new(2.0).join(join).cap(cap);
                    let tris = stroke(&pts, st);
                    assert!(!tris.is_empty());
                    for p in tris.iter().flatten() {
                        assert!(
                            p.len() <= 11.0 + 1e-4,
                            "{join:?} {cap:?}: {p:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn turning_either_way_is_symmetric() {
        let left = [vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(10.0, -10.0)];
        let st = Stroke::new(2.0).join(LineJoin::Bevel);
        assert_approx_eq!(
            area(&stroke(&L, st)),
            area(&stroke(&left, st)),
            eps = 1e-4
        );
    }
}
