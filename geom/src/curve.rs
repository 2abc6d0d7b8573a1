//! Vertex generators for arcs, cubic Bézier splines, and ribbons.
//!
//! The generators append positions to a caller-owned vector. A generator
//! given a positive `thickness` produces pairs of points offset to either
//! side of the curve by half the thickness, suitable for drawing as a
//! triangle strip; otherwise it produces points on the curve itself,
//! suitable for a line strip.

use alloc::vec::Vec;

use sp::math::{Vec2, vec2};
use sp::util::Result;

use crate::isect::{direction, normalize};

/// Appends `n` points along an elliptical arc to `dest`.
///
/// The arc is centered at `center`, has `radii`, and spans `delta` radians
/// starting from the angle `start`. Angles increase clockwise on screen.
/// If `thickness` is positive, appends `n` pairs of points instead: the
/// first of each pair on the outside and the second on the inside of an
/// arc band `thickness` wide.
///
/// # Errors
/// Returns [`Error::Alloc`][sp::util::Error::Alloc] if `dest` cannot grow.
///
/// # Examples
/// ```
/// use core::f32::consts::PI;
/// use sp::{assert_approx_eq, math::vec2};
/// use softprim_geom::curve::calculate_arc;
///
/// let mut pts = vec![];
/// let (c, r) = (vec2(0.0, 0.0), vec2(2.0, 2.0));
/// calculate_arc(&mut pts, c, r, 0.0, PI, 0.0, 3).unwrap();
///
/// assert_approx_eq!(pts[0], vec2(2.0, 0.0));
/// assert_approx_eq!(pts[1], vec2(0.0, 2.0), eps = 1e-6);
/// assert_approx_eq!(pts[2], vec2(-2.0, 0.0), eps = 1e-6);
/// ```
pub fn calculate_arc(
    dest: &mut Vec<Vec2>,
    center: Vec2,
    radii: Vec2,
    start: f32,
    delta: f32,
    thickness: f32,
    n: usize,
) -> Result<()> {
    use sp::math::float::f32 as fp;

    debug_assert!(n > 1, "arc needs at least two points, got {n}");
    debug_assert!(radii.x() >= 0.0 && radii.y() >= 0.0);
    if n < 2 {
        return Ok(());
    }
    let thick = thickness > 0.0;
    dest.try_reserve(if thick { 2 * n } else { n })?;

    let (rx, ry) = (radii.x(), radii.y());
    let step = delta / (n - 1) as f32;
    let (c, s) = (fp::cos(step), fp::sin(step));
    // Unit vector, rotated incrementally
    let mut p = vec2(fp::cos(start), fp::sin(start));
    let ht = thickness / 2.0;

    for _ in 0..n {
        let on_arc = center + vec2(rx * p.x(), ry * p.y());
        if !thick {
            dest.push(on_arc);
        } else if rx == ry {
            dest.push(center + p * (rx + ht));
            dest.push(center + p * (rx - ht));
        } else {
            // Normal of the ellipse at p
            let off = normalize(vec2(ry * p.x(), rx * p.y())) * ht;
            dest.push(on_arc + off);
            dest.push(on_arc - off);
        }
        p = vec2(c * p.x() - s * p.y(), s * p.x() + c * p.y());
    }
    Ok(())
}

/// Appends `n` points along the cubic Bézier curve with control points
/// `pts` to `dest`.
///
/// The points are evaluated at evenly spaced parameter values by forward
/// differencing. If `thickness` is positive, appends `n` pairs of points
/// outlining a ribbon around the curve instead; see [`calculate_ribbon`].
///
/// # Errors
/// Returns [`Error::Alloc`][sp::util::Error::Alloc] if an allocation fails.
pub fn calculate_spline(
    dest: &mut Vec<Vec2>,
    pts: &[Vec2; 4],
    thickness: f32,
    n: usize,
) -> Result<()> {
    debug_assert!(n > 1, "spline needs at least two points, got {n}");
    if n < 2 {
        return Ok(());
    }
    let dt = 1.0 / (n - 1) as f32;
    let (dt2, dt3) = (dt * dt, dt * dt * dt);
    let [p0, p1, p2, p3] = *pts;

    let t2 = (p2 - p1 * 2.0 + p0) * (3.0 * dt2);
    let t3 = (p3 + (p1 - p2) * 3.0 - p0) * dt3;

    let dddp = t3 * 6.0;
    let mut ddp = t3 * -6.0 + t2 * 2.0;
    let mut dp = t3 - t2 + (p1 - p0) * (3.0 * dt);
    let mut p = p0;

    let mut curve = Vec::new();
    curve.try_reserve(n)?;
    curve.push(p);
    for _ in 1..n {
        ddp += dddp;
        dp += ddp;
        p += dp;
        curve.push(p);
    }
    calculate_ribbon(dest, &curve, thickness)
}

/// Appends the outline of a ribbon around the polyline `pts` to `dest`.
///
/// If `thickness` is positive, appends a pair of points per point of `pts`,
/// offset to either side by half the thickness, mitered at the corners.
/// Otherwise appends `pts` as is.
///
/// # Errors
/// Returns [`Error::Alloc`][sp::util::Error::Alloc] if `dest` cannot grow.
pub fn calculate_ribbon(
    dest: &mut Vec<Vec2>,
    pts: &[Vec2],
    thickness: f32,
) -> Result<()> {
    if thickness <= 0.0 {
        dest.try_reserve(pts.len())?;
        dest.extend_from_slice(pts);
        return Ok(());
    }
    let [.., last] = pts else {
        return Ok(());
    };
    if pts.len() < 2 {
        return Ok(());
    }
    dest.try_reserve(2 * pts.len())?;

    let t = thickness / 2.0;
    let mut sign = 1.0;
    let mut prev = Vec2::ZERO;

    for (i, w) in pts.windows(2).enumerate() {
        let (dir, len) = direction(w[0], w[1]);
        let cur = match (len > 1e-6, i) {
            (true, _) => dir,
            (false, 0) => vec2(1.0, 0.0),
            (false, _) => prev,
        };

        let (side, shift) = if i == 0 {
            (cur.perp() * t, Vec2::ZERO)
        } else if cur.dot(&prev) < 0.0 {
            // Sharp turn; the ribbon folds over, flipping its sides
            let m = normalize(cur - prev);
            let cos = m.dot(&cur);
            sign = -sign;
            (m.perp() * (t * cos), m * (-t / cos))
        } else {
            let m = normalize(-(cur + prev).perp());
            let cos = m.dot(&cur.perp());
            (m * (t / cos), Vec2::ZERO)
        };

        let p = w[0] + shift;
        dest.push(p - side * sign);
        dest.push(p + side * sign);
        prev = cur;
    }

    let side = prev.perp() * t;
    dest.push(*last - side * sign);
    dest.push(*last + side * sign);
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use core::f32::consts::{FRAC_PI_2, PI};

    use sp::assert_approx_eq;

    use super::*;

    #[test]
    fn thin_circle_arc_closes() {
        let mut pts = vec![];
        let c = vec2(5.0, 5.0);
        calculate_arc(&mut pts, c, vec2(3.0, 3.0), 0.0, 2.0 * PI, 0.0, 9)
            .unwrap();

        assert_eq!(pts.len(), 9);
        assert_approx_eq!(pts[0], pts[8], eps = 1e-5);
        for p in &pts {
            assert_approx_eq!((*p - c).len(), 3.0, eps = 1e-5);
        }
    }

    #[test]
    fn thick_circle_arc_pairs() {
        let mut pts = vec![];
        let c = vec2(0.0, 0.0);
        calculate_arc(&mut pts, c, vec2(4.0, 4.0), 0.0, FRAC_PI_2, 2.0, 5)
            .unwrap();

        assert_eq!(pts.len(), 10);
        for pair in pts.chunks(2) {
            assert_approx_eq!(pair[0].len(), 5.0, eps = 1e-5);
            assert_approx_eq!(pair[1].len(), 3.0, eps = 1e-5);
        }
        assert_approx_eq!(pts[9], vec2(0.0, 3.0), eps = 1e-5);
    }

    #[test]
    fn thick_ellipse_arc_offsets_along_normal() {
        let mut pts = vec![];
        let c = vec2(0.0, 0.0);
        calculate_arc(&mut pts, c, vec2(4.0, 2.0), 0.0, PI, 1.0, 3).unwrap();

        assert_eq!(pts.len(), 6);
        assert_approx_eq!(pts[0], vec2(4.5, 0.0));
        assert_approx_eq!(pts[1], vec2(3.5, 0.0));
        assert_approx_eq!(pts[2], vec2(0.0, 2.5), eps = 1e-5);
        assert_approx_eq!(pts[3], vec2(0.0, 1.5), eps = 1e-5);
    }

    #[test]
    fn spline_of_straight_control_polygon_is_straight() {
        let ctrl = [
            vec2(0.0, 1.0),
            vec2(1.0, 1.0),
            vec2(2.0, 1.0),
            vec2(3.0, 1.0),
        ];
        let mut pts = vec![];
        calculate_spline(&mut pts, &ctrl, 0.0, 4).unwrap();

        assert_eq!(pts.len(), 4);
        for (i, p) in pts.iter().enumerate() {
            assert_approx_eq!(*p, vec2(i as f32, 1.0), eps = 1e-5);
        }
    }

    #[test]
    fn spline_hits_end_points() {
        let ctrl = [
            vec2(0.0, 0.0),
            vec2(0.0, 10.0),
            vec2(10.0, 10.0),
            vec2(10.0, 0.0),
        ];
        let mut pts = vec![];
        calculate_spline(&mut pts, &ctrl, 0.0, 11).unwrap();

        assert_eq!(pts.len(), 11);
        assert_eq!(pts[0], ctrl[0]);
        assert_approx_eq!(pts[10], ctrl[3], eps = 1e-4);
        // Symmetric curve peaks at t = 0.5 at 3/4 of the control height
        assert_approx_eq!(pts[5], vec2(5.0, 7.5), eps = 1e-4);
    }

    #[test]
    fn thin_ribbon_is_the_polyline() {
        let line = [vec2(0.0, 0.0), vec2(1.0, 2.0), vec2(3.0, 3.0)];
        let mut pts = vec![];
        calculate_ribbon(&mut pts, &line, 0.0).unwrap();
        assert_eq!(pts, line);
    }

    #[test]
    fn straight_ribbon() {
        let line = [vec2(0.0, 5.0), vec2(4.0, 5.0), vec2(8.0, 5.0)];
        let mut pts = vec![];
        calculate_ribbon(&mut pts, &line, 2.0).unwrap();

        assert_eq!(
            pts,
            [
                vec2(0.0, 4.0),
                vec2(0.0, 6.0),
                vec2(4.0, 4.0),
                vec2(4.0, 6.0),
                vec2(8.0, 4.0),
                vec2(8.0, 6.0),
            ]
        );
    }

    #[test]
    fn ribbon_right_angle_is_mitered() {
        let line = [vec2(0.0, 0.0), vec2(4.0, 0.0), vec2(4.0, 4.0)];
        let mut pts = vec![];
        calculate_ribbon(&mut pts, &line, 2.0).unwrap();

        assert_eq!(pts.len(), 6);
        // Outer and inner corners of the miter
        assert_approx_eq!(pts[2], vec2(5.0, -1.0), eps = 1e-5);
        assert_approx_eq!(pts[3], vec2(3.0, 1.0), eps = 1e-5);
    }

    #[test]
    fn too_short_ribbon_is_empty() {
        let mut pts = vec![];
        calculate_ribbon(&mut pts, &[vec2(1.0, 1.0)], 2.0).unwrap();
        calculate_ribbon(&mut pts, &[], 2.0).unwrap();
        assert!(pts.is_empty());
    }
}
