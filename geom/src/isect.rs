//! Orientation and intersection tests on 2D points and segments.

use core::cmp::Ordering;

use sp::math::{ApproxEq, Vec2, vec2};

/// Returns the unit vector pointing from `a` to `b`, and the distance
/// between `a` and `b`.
///
/// If `a` and `b` coincide, the direction is the zero vector.
///
/// # Examples
/// ```
/// use sp::math::vec2;
/// use softprim_geom::isect::direction;
///
/// let (dir, len) = direction(vec2(1.0, 1.0), vec2(1.0, 4.0));
/// assert_eq!(dir, vec2(0.0, 1.0));
/// assert_eq!(len, 3.0);
/// ```
pub fn direction(a: Vec2, b: Vec2) -> (Vec2, f32) {
    let d = b - a;
    let len = d.len();
    if len > 0.0 {
        (d * len.recip(), len)
    } else {
        (Vec2::ZERO, 0.0)
    }
}

/// Returns `v` scaled to unit length, or the zero vector if `v` is zero.
pub fn normalize(v: Vec2) -> Vec2 {
    direction(Vec2::ZERO, v).0
}

/// Returns on which side of the line through `a` and `b` the point `p` lies.
///
/// In the y-down screen space, `Less` means `p` is to the left when looking
/// from `a` towards `b`, `Greater` that it is to the right, and `Equal`
/// that the three points are collinear.
pub fn line_side(a: Vec2, b: Vec2, p: Vec2) -> Ordering {
    let c = (b - a).cross(&(p - a));
    c.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
}

/// Returns whether `p` lies strictly inside the triangle `tri`.
///
/// Points on the edges or at the vertices are not inside, nor is anything
/// inside a degenerate triangle. Works with either winding.
///
/// # Examples
/// ```
/// use sp::math::vec2;
/// use softprim_geom::isect::is_point_in_triangle;
///
/// let tri = [vec2(0.0, 0.0), vec2(4.0, 0.0), vec2(0.0, 4.0)];
/// assert!(is_point_in_triangle(vec2(1.0, 1.0), tri));
/// assert!(!is_point_in_triangle(vec2(2.0, 2.0), tri));
/// assert!(!is_point_in_triangle(vec2(0.0, 0.0), tri));
/// ```
pub fn is_point_in_triangle(p: Vec2, [a, b, c]: [Vec2; 3]) -> bool {
    let s = line_side(a, b, p);
    s != Ordering::Equal && line_side(b, c, p) == s && line_side(c, a, p) == s
}

/// Intersects the lines through the segments `p0`–`p1` and `q0`–`q1`.
///
/// Returns the intersection point and its parameters along both segments:
/// the point equals `p0 + t * (p1 - p0)` and `q0 + u * (q1 - q0)`. The
/// point is on both segments iff `t` and `u` are both in `0.0..=1.0`.
///
/// Returns `None` if the lines are parallel or a segment is degenerate.
///
/// # Examples
/// ```
/// use sp::math::vec2;
/// use softprim_geom::isect::intersect_segments;
///
/// let (pt, t, u) = intersect_segments(
///     vec2(0.0, 1.0), vec2(4.0, 1.0),
///     vec2(1.0, 0.0), vec2(1.0, 2.0),
/// ).unwrap();
/// assert_eq!(pt, vec2(1.0, 1.0));
/// assert_eq!((t, u), (0.25, 0.5));
/// ```
pub fn intersect_segments(
    p0: Vec2,
    p1: Vec2,
    q0: Vec2,
    q1: Vec2,
) -> Option<(Vec2, f32, f32)> {
    let (dp, dq) = (p1 - p0, q1 - q0);
    let denom = dp.cross(&dq);
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    let d0 = q0 - p0;
    let t = d0.cross(&dq) / denom;
    let u = d0.cross(&dp) / denom;
    Some((p0 + dp * t, t, u))
}

/// Returns whether `a` and `b` are the same point up to rounding error.
pub fn points_equal(a: Vec2, b: Vec2) -> bool {
    a.approx_eq(&b)
}

/// Returns the point where the segment from `from` to `to` leaves the
/// circle of `radius` around `center`.
///
/// Returns `from` if it is not inside the circle, and `to` if the whole
/// segment is inside.
pub fn exit_point(center: Vec2, from: Vec2, to: Vec2, radius: f32) -> Vec2 {
    use sp::math::float::f32;
    let (w, e) = (from - center, to - from);
    let a = e.len_sqr();
    let b = w.dot(&e);
    let c = w.len_sqr() - radius * radius;
    if c >= 0.0 || a == 0.0 {
        return from;
    }
    // c < 0 so the discriminant is positive and the root is positive
    let t = (-b + f32::sqrt(b * b - a * c)) / a;
    from + e * t.min(1.0)
}

/// Returns the point at `angle` radians on the ellipse with `radii`
/// centered at the origin.
pub fn polar(radii: Vec2, angle: f32) -> Vec2 {
    use sp::math::float::f32;
    vec2(radii.x() * f32::cos(angle), radii.y() * f32::sin(angle))
}

#[cfg(test)]
mod tests {
    use sp::assert_approx_eq;

    use super::*;

    #[test]
    fn direction_of_coincident_points_is_zero() {
        let p = vec2(3.0, -2.0);
        assert_eq!(direction(p, p), (Vec2::ZERO, 0.0));
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn normalize_has_unit_length() {
        let v = normalize(vec2(3.0, 4.0));
        assert_approx_eq!(v, vec2(0.6, 0.8));
        assert_approx_eq!(v.len(), 1.0);
    }

    #[test]
    fn line_sides() {
        let (a, b) = (vec2(0.0, 0.0), vec2(2.0, 0.0));
        // y points down, so negative y is to the left of a rightward line
        assert_eq!(line_side(a, b, vec2(1.0, -1.0)), Ordering::Less);
        assert_eq!(line_side(a, b, vec2(1.0, 1.0)), Ordering::Greater);
        assert_eq!(line_side(a, b, vec2(5.0, 0.0)), Ordering::Equal);
    }

    #[test]
    fn point_in_triangle_either_winding() {
        let cw = [vec2(0.0, 0.0), vec2(4.0, 0.0), vec2(0.0, 4.0)];
        let ccw = [cw[0], cw[2], cw[1]];
        for tri in [cw, ccw] {
            assert!(is_point_in_triangle(vec2(1.0, 1.0), tri));
            assert!(!is_point_in_triangle(vec2(3.0, 3.0), tri));
            // On an edge
            assert!(!is_point_in_triangle(vec2(2.0, 0.0), tri));
            assert!(!is_point_in_triangle(vec2(2.0, 2.0), tri));
        }
    }

    #[test]
    fn nothing_is_inside_degenerate_triangle() {
        let tri = [vec2(0.0, 0.0), vec2(1.0, 1.0), vec2(2.0, 2.0)];
        assert!(!is_point_in_triangle(vec2(1.0, 1.0), tri));
        assert!(!is_point_in_triangle(vec2(1.0, 0.0), tri));
    }

    #[test]
    fn crossing_segments() {
        let (pt, t, u) = intersect_segments(
            vec2(0.0, 0.0),
            vec2(4.0, 4.0),
            vec2(0.0, 4.0),
            vec2(4.0, 0.0),
        )
        .unwrap();
        assert_approx_eq!(pt, vec2(2.0, 2.0));
        assert_approx_eq!(t, 0.5);
        assert_approx_eq!(u, 0.5);
    }

    #[test]
    fn lines_intersect_outside_segments() {
        let (pt, t, u) = intersect_segments(
            vec2(0.0, 0.0),
            vec2(1.0, 0.0),
            vec2(3.0, -1.0),
            vec2(3.0, 1.0),
        )
        .unwrap();
        assert_approx_eq!(pt, vec2(3.0, 0.0));
        assert_approx_eq!(t, 3.0);
        assert_approx_eq!(u, 0.5);
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let res = intersect_segments(
            vec2(0.0, 0.0),
            vec2(1.0, 1.0),
            vec2(0.0, 1.0),
            vec2(1.0, 2.0),
        );
        assert_eq!(res, None);
    }

    #[test]
    fn equal_points() {
        assert!(points_equal(vec2(1.0, 2.0), vec2(1.0, 2.0 + 1e-7)));
        assert!(!points_equal(vec2(1.0, 2.0), vec2(1.0, 2.01)));
    }

    #[test]
    fn exit_points() {
        let c = vec2(0.0, 0.0);
        // Tangent start on the circle
        let p = exit_point(c, vec2(0.0, 1.0), vec2(5.0, 1.0), 1.0);
        assert_eq!(p, vec2(0.0, 1.0));
        // From the inside out
        let p = exit_point(c, vec2(0.0, 0.0), vec2(4.0, 0.0), 2.0);
        assert_approx_eq!(p, vec2(2.0, 0.0));
        // Entirely inside
        let p = exit_point(c, vec2(0.0, 0.0), vec2(1.0, 0.0), 2.0);
        assert_eq!(p, vec2(1.0, 0.0));
        // Leaving a larger circle, tangent line
        let p = exit_point(c, vec2(0.0, 3.0), vec2(8.0, 3.0), 5.0);
        assert_approx_eq!(p, vec2(4.0, 3.0));
    }

    #[test]
    fn polar_points() {
        let r = vec2(2.0, 1.0);
        assert_approx_eq!(polar(r, 0.0), vec2(2.0, 0.0));
        assert_approx_eq!(
            polar(r, core::f32::consts::FRAC_PI_2),
            vec2(0.0, 1.0),
            eps = 1e-6
        );
    }
}
