//! Immediate-mode drawing of lines, rectangles, ellipses, arcs, splines,
//! and polygons.
//!
//! Every function takes the [`Renderer`] to draw with, the target to draw
//! into, the geometry of the shape, and a color. Outlined shapes also take
//! a thickness: a positive thickness draws a band of triangles centered on
//! the outline, while zero or a negative thickness draws a hairline one
//! pixel wide with the line rasterizer.
//!
//! Curves are approximated by line segments. The number of segments grows
//! with the square root of the radius, the [curve quality][q] of the
//! rendering context, and the scale factor of its transform.
//!
//! All functions return the number of primitives drawn.
//!
//! [q]: sp::render::Context::curve_quality

use alloc::vec::Vec;
use core::f32::consts::{FRAC_PI_2, PI, TAU};

use log::debug;

use sp::geom::{PrimType, vertex};
use sp::math::{Color4f, Vec2, vec2};
use sp::render::{Renderer, Target, VertexCache};
use sp::util::Result;

use crate::curve::{calculate_arc, calculate_ribbon, calculate_spline};
use crate::isect::{direction, normalize, polar};
use crate::stroke::{LineCap, LineJoin, Stroke, stroke_polyline};
use crate::tess::triangulate_polygon;

/// The maximum number of vertices in a single curve.
const CAP: usize = VertexCache::CAPACITY;

//
// Lines and triangles
//

/// Draws a line segment from `a` to `b`.
///
/// A thick line is a rectangle with butt ends. Nothing is drawn if a thick
/// line has zero length.
pub fn draw_line<T>(
    rdr: &mut Renderer,
    target: &mut T,
    a: Vec2,
    b: Vec2,
    color: Color4f,
    thickness: f32,
) -> usize
where
    T: Target + ?Sized,
{
    if thickness <= 0.0 {
        return draw(rdr, target, &[a, b], color, PrimType::LineList);
    }
    let (dir, len) = direction(a, b);
    if len == 0.0 {
        return 0;
    }
    let t = vec2(dir.y(), -dir.x()) * (thickness / 2.0);
    let quad = [a + t, a - t, b - t, b + t];
    draw(rdr, target, &quad, color, PrimType::TriangleFan)
}

/// Draws the outline of the triangle `tri`.
///
/// A thick outline is offset evenly to either side of the edges, with
/// sharp corners cut off square. A triangle too flat to have an inside is
/// drawn as a thick line between its two farthest vertices.
pub fn draw_triangle<T>(
    rdr: &mut Renderer,
    target: &mut T,
    tri: [Vec2; 3],
    color: Color4f,
    thickness: f32,
) -> usize
where
    T: Target + ?Sized,
{
    use sp::math::float::f32 as fp;

    if thickness <= 0.0 {
        return draw(rdr, target, &tri, color, PrimType::LineLoop);
    }
    let [p0, mut p1, mut p2] = tri;
    let cross = (p1 - p0).cross(&(p2 - p0));
    if cross.abs() < 1e-4 {
        // The vertex between the others has an obtuse angle
        let (a, b) = if (p1 - p0).dot(&(p2 - p0)) < 0.0 {
            (p1, p2)
        } else if (p0 - p1).dot(&(p2 - p1)) < 0.0 {
            (p0, p2)
        } else {
            (p0, p1)
        };
        return draw_line(rdr, target, a, b, color, thickness);
    }
    if cross > 0.0 {
        (p1, p2) = (p2, p1);
    }

    let sides = [(p1 - p0).len(), (p2 - p0).len(), (p2 - p1).len()];
    let perimeter = sides[0] + sides[1] + sides[2];
    let s = perimeter / 2.0;
    if s < 1e-5 {
        return 0;
    }
    let inradius =
        fp::sqrt((s - sides[0]) * (s - sides[1]) * (s - sides[2]) / s);
    if inradius < 1e-5 {
        return 0;
    }
    let ht = thickness / 2.0;
    let outer = (inradius + ht) / inradius;
    let inner = ((inradius - ht) / inradius).max(0.0);
    let incenter =
        (p2 * sides[0] + p1 * sides[1] + p0 * sides[2]) * perimeter.recip();

    // Each side is a quad fan, plus a square corner if the corner is sharp
    let pts = [p0, p1, p2];
    let mut fan = [Vec2::ZERO; 5];
    let mut len = 0;
    let mut first = [Vec2::ZERO; 2];
    let mut drawn = 0;

    for i in 0..3 {
        let p = pts[i];
        let v = p - incenter;
        let (o, inn) = (v * outer, v * inner);
        let in_v = incenter + inn;
        let (out_v, next_v) =
            if (o - inn).len_sqr() > 16.0 * thickness * thickness {
                let e12 = normalize(p - pts[(i + 1) % 3]) * ht;
                let e13 = normalize(p - pts[(i + 2) % 3]) * ht;
                (p + e13 + e13.perp(), Some(p + e12 - e12.perp()))
            } else {
                (incenter + o, None)
            };

        if i != 0 {
            fan[len..len + 2].copy_from_slice(&[out_v, in_v]);
            len += 2;
            let quad = &fan[..len];
            drawn += draw(rdr, target, quad, color, PrimType::TriangleFan);
            len = 0;
        }
        fan[len..len + 2].copy_from_slice(&[in_v, out_v]);
        len += 2;
        if let Some(next_v) = next_v {
            fan[len] = next_v;
            len += 1;
        }
        if i == 0 {
            first = [in_v, out_v];
        }
    }
    fan[len..len + 2].copy_from_slice(&[first[1], first[0]]);
    len += 2;
    drawn + draw(rdr, target, &fan[..len], color, PrimType::TriangleFan)
}

/// Draws the filled triangle `tri`.
pub fn draw_filled_triangle<T>(
    rdr: &mut Renderer,
    target: &mut T,
    tri: [Vec2; 3],
    color: Color4f,
) -> usize
where
    T: Target + ?Sized,
{
    draw(rdr, target, &tri, color, PrimType::TriangleList)
}

//
// Rectangles
//

/// Draws the outline of the axis-aligned rectangle with opposite corners
/// `a` and `b`.
pub fn draw_rectangle<T>(
    rdr: &mut Renderer,
    target: &mut T,
    a: Vec2,
    b: Vec2,
    color: Color4f,
    thickness: f32,
) -> usize
where
    T: Target + ?Sized,
{
    let [x1, y1, x2, y2] = [a.x(), a.y(), b.x(), b.y()];
    if thickness <= 0.0 {
        let quad = [a, vec2(x2, y1), b, vec2(x1, y2)];
        return draw(rdr, target, &quad, color, PrimType::LineLoop);
    }
    let t = thickness / 2.0;
    #[rustfmt::skip]
    let strip = [
        vec2(x1 - t, y1 - t), vec2(x1 + t, y1 + t),
        vec2(x2 + t, y1 - t), vec2(x2 - t, y1 + t),
        vec2(x2 + t, y2 + t), vec2(x2 - t, y2 - t),
        vec2(x1 - t, y2 + t), vec2(x1 + t, y2 - t),
        vec2(x1 - t, y1 - t), vec2(x1 + t, y1 + t),
    ];
    draw(rdr, target, &strip, color, PrimType::TriangleStrip)
}

/// Draws the filled axis-aligned rectangle with opposite corners `a`
/// and `b`.
pub fn draw_filled_rectangle<T>(
    rdr: &mut Renderer,
    target: &mut T,
    a: Vec2,
    b: Vec2,
    color: Color4f,
) -> usize
where
    T: Target + ?Sized,
{
    let quad = [a, vec2(a.x(), b.y()), b, vec2(b.x(), a.y())];
    draw(rdr, target, &quad, color, PrimType::TriangleFan)
}

/// Draws the outline of the rectangle from `a` to `b`, `a` being the
/// top-left corner, with corners rounded by an ellipse with `radii`.
///
/// Falls back to [`draw_rectangle`] if the corners are too small to round.
pub fn draw_rounded_rectangle<T>(
    rdr: &mut Renderer,
    target: &mut T,
    a: Vec2,
    b: Vec2,
    radii: Vec2,
    color: Color4f,
    thickness: f32,
) -> usize
where
    T: Target + ?Sized,
{
    debug_assert!(radii.x() >= 0.0 && radii.y() >= 0.0);
    let n = (segments(rdr, (radii.x() + radii.y()) / 2.0) / 4.0) as usize;
    if n < 2 {
        return draw_rectangle(rdr, target, a, b, color, thickness);
    }
    if thickness > 0.0 {
        let n = if 8 * n + 2 >= CAP { (CAP - 3) / 8 } else { n };
        let quarter = generate(|d| {
            calculate_arc(d, Vec2::ZERO, radii, 0.0, FRAC_PI_2, thickness, n)
        });
        let mut strip = generate(|d| {
            round_corners(d, &quarter, 2, [a, b, radii])
        });
        // Close the band
        if let [p0, p1, ..] = *strip.as_slice() {
            strip.extend([p0, p1]);
        }
        draw(rdr, target, &strip, color, PrimType::TriangleStrip)
    } else {
        let n = if 4 * n >= CAP { (CAP - 1) / 4 } else { n };
        let pts = rounded_outline(a, b, radii, n);
        draw(rdr, target, &pts, color, PrimType::LineLoop)
    }
}

/// Draws the filled rectangle from `a` to `b`, `a` being the top-left
/// corner, with corners rounded by an ellipse with `radii`.
///
/// Falls back to [`draw_filled_rectangle`] if the corners are too small to
/// round.
pub fn draw_filled_rounded_rectangle<T>(
    rdr: &mut Renderer,
    target: &mut T,
    a: Vec2,
    b: Vec2,
    radii: Vec2,
    color: Color4f,
) -> usize
where
    T: Target + ?Sized,
{
    debug_assert!(radii.x() >= 0.0 && radii.y() >= 0.0);
    let n = (segments(rdr, (radii.x() + radii.y()) / 2.0) / 4.0) as usize;
    if n < 2 {
        return draw_filled_rectangle(rdr, target, a, b, color);
    }
    let n = if 4 * n >= CAP { (CAP - 1) / 4 } else { n };
    let pts = rounded_outline(a, b, radii, n);
    draw(rdr, target, &pts, color, PrimType::TriangleFan)
}

//
// Ellipses and arcs
//

/// Draws the outline of the ellipse centered at `center` with `radii`.
pub fn draw_ellipse<T>(
    rdr: &mut Renderer,
    target: &mut T,
    center: Vec2,
    radii: Vec2,
    color: Color4f,
    thickness: f32,
) -> usize
where
    T: Target + ?Sized,
{
    debug_assert!(radii.x() >= 0.0 && radii.y() >= 0.0);
    let n = segments(rdr, (radii.x() + radii.y()) / 2.0) as usize;
    if n < 2 {
        return 0;
    }
    if thickness > 0.0 {
        let n = if 2 * n >= CAP { (CAP - 1) / 2 } else { n };
        let band = generate(|d| {
            calculate_arc(d, center, radii, 0.0, TAU, thickness, n)
        });
        draw(rdr, target, &band, color, PrimType::TriangleStrip)
    } else {
        let n = n.min(CAP - 1);
        let mut pts =
            generate(|d| calculate_arc(d, center, radii, 0.0, TAU, 0.0, n));
        // Same as the first point
        pts.pop();
        draw(rdr, target, &pts, color, PrimType::LineLoop)
    }
}

/// Draws the filled ellipse centered at `center` with `radii`.
pub fn draw_filled_ellipse<T>(
    rdr: &mut Renderer,
    target: &mut T,
    center: Vec2,
    radii: Vec2,
    color: Color4f,
) -> usize
where
    T: Target + ?Sized,
{
    debug_assert!(radii.x() >= 0.0 && radii.y() >= 0.0);
    let n = segments(rdr, (radii.x() + radii.y()) / 2.0) as usize;
    if n < 2 {
        return 0;
    }
    let n = n.min(CAP - 1);
    let fan = generate(|d| {
        d.try_reserve(n + 1)?;
        d.push(center);
        calculate_arc(d, center, radii, 0.0, TAU, 0.0, n)
    });
    draw(rdr, target, &fan, color, PrimType::TriangleFan)
}

/// Draws the outline of the circle centered at `center` with radius `r`.
pub fn draw_circle<T>(
    rdr: &mut Renderer,
    target: &mut T,
    center: Vec2,
    r: f32,
    color: Color4f,
    thickness: f32,
) -> usize
where
    T: Target + ?Sized,
{
    draw_ellipse(rdr, target, center, vec2(r, r), color, thickness)
}

/// Draws the filled circle centered at `center` with radius `r`.
pub fn draw_filled_circle<T>(
    rdr: &mut Renderer,
    target: &mut T,
    center: Vec2,
    r: f32,
    color: Color4f,
) -> usize
where
    T: Target + ?Sized,
{
    draw_filled_ellipse(rdr, target, center, vec2(r, r), color)
}

/// Draws an arc of the ellipse centered at `center` with `radii`.
///
/// The arc starts at the angle `start` and spans `delta` radians, clockwise
/// on screen if positive.
#[allow(clippy::too_many_arguments)]
pub fn draw_elliptical_arc<T>(
    rdr: &mut Renderer,
    target: &mut T,
    center: Vec2,
    radii: Vec2,
    start: f32,
    delta: f32,
    color: Color4f,
    thickness: f32,
) -> usize
where
    T: Target + ?Sized,
{
    debug_assert!(radii.x() >= 0.0 && radii.y() >= 0.0);
    let r = (radii.x() + radii.y()) / 2.0;
    let n = ((delta / TAU * segments(rdr, r)).abs() as usize).max(2);
    if thickness > 0.0 {
        let n = if 2 * n >= CAP { (CAP - 1) / 2 } else { n };
        let band = generate(|d| {
            calculate_arc(d, center, radii, start, delta, thickness, n)
        });
        draw(rdr, target, &band, color, PrimType::TriangleStrip)
    } else {
        let n = n.min(CAP - 1);
        let pts = generate(|d| {
            calculate_arc(d, center, radii, start, delta, 0.0, n)
        });
        draw(rdr, target, &pts, color, PrimType::LineStrip)
    }
}

/// Draws an arc of the circle centered at `center` with radius `r`.
///
/// See [`draw_elliptical_arc`].
#[allow(clippy::too_many_arguments)]
pub fn draw_arc<T>(
    rdr: &mut Renderer,
    target: &mut T,
    center: Vec2,
    r: f32,
    start: f32,
    delta: f32,
    color: Color4f,
    thickness: f32,
) -> usize
where
    T: Target + ?Sized,
{
    let radii = vec2(r, r);
    draw_elliptical_arc(
        rdr, target, center, radii, start, delta, color, thickness,
    )
}

/// Draws the outline of a pie slice of the circle centered at `center`
/// with radius `r`.
///
/// The slice starts at the angle `start` and spans `delta` radians. A thick
/// outline is drawn inside the arc and the two radii as one band, pointed
/// at the center of the circle, or blunt if the point would be very long.
#[allow(clippy::too_many_arguments)]
pub fn draw_pieslice<T>(
    rdr: &mut Renderer,
    target: &mut T,
    center: Vec2,
    r: f32,
    mut start: f32,
    mut delta: f32,
    color: Color4f,
    thickness: f32,
) -> usize
where
    T: Target + ?Sized,
{
    use sp::math::float::f32 as fp;

    debug_assert!(r >= 0.0);
    if delta < 0.0 {
        delta = -delta;
        start -= delta;
    }
    if thickness <= 0.0 {
        let n = ((delta / TAU * segments(rdr, r)) as usize).clamp(2, CAP - 2);
        let pts = generate(|d| {
            d.try_reserve(n + 1)?;
            d.push(center);
            calculate_arc(d, center, vec2(r, r), start, delta, 0.0, n)
        });
        return draw(rdr, target, &pts, color, PrimType::LineLoop);
    }

    let ht = thickness / 2.0;
    let asin = |x: f32| fp::atan2(x, fp::sqrt(1.0 - x * x));
    // Half the angle the band subtends at the inner and outer radius
    let outer = asin(ht / (r + ht));
    let inner = (ht <= r - ht).then(|| asin(ht / (r - ht)));
    let inverted = (delta / PI) as i32 % 2 == 1;

    let mid = start + (fp::rem_euclid(delta + PI, TAU) - PI) / 2.0;
    let mid_dir = vec2(fp::cos(mid), fp::sin(mid));
    let side_dir = vec2(fp::cos(start), fp::sin(start));
    let connect = ht / side_dir.cross(&mid_dir).abs();
    let blunt = connect > 2.0 * thickness;
    let mirror = |p: Vec2| {
        let d = (p - center).dot(&mid_dir);
        center * 2.0 + mid_dir * (2.0 * d) - p
    };

    match inner.filter(|&a| delta - 2.0 * a > 0.0) {
        // Wide enough to leave a hole in the middle
        Some(inner) => {
            let arc_start = start + inner;
            let n = ((delta / TAU * segments(rdr, r)) as usize).max(2);
            let n = if 2 * n >= CAP { (CAP - 1) / 2 } else { n };
            let central = delta - 2.0 * inner;
            let band = generate(|d| {
                let (radii, th) = (vec2(r, r), thickness);
                calculate_arc(d, center, radii, arc_start, central, th, n)
            });
            let mut drawn =
                draw(rdr, target, &band, color, PrimType::TriangleStrip);

            // The corner at the start; the one at the end is its mirror
            let extra = if blunt { 4 } else { 3 };
            let side = (inner + outer) / TAU * segments(rdr, r + ht);
            let n = (side as usize).max(2);
            let n = if n + extra >= CAP { CAP - 1 - extra } else { n };

            let last = center + mid_dir * connect.min(r - ht);
            let (mut tip, k) = if blunt {
                let s = if inverted { -1.0 } else { 1.0 };
                let v = vec2(
                    side_dir.y() * s - side_dir.x(),
                    -side_dir.x() * s - side_dir.y(),
                ) * ht;
                ([center + v, center + mid_dir * v.dot(&mid_dir), last], 3)
            } else {
                ([center - mid_dir * connect, last, last], 2)
            };
            let tip = &mut tip[..k];
            if inverted {
                tip.reverse();
            }

            let mut fan = generate(|d| {
                d.try_reserve(n + extra)?;
                d.push(center + polar(vec2(r - ht, r - ht), arc_start));
                let radii = vec2(r + ht, r + ht);
                let delta = -(outer + inner);
                calculate_arc(d, center, radii, arc_start, delta, 0.0, n)?;
                d.extend_from_slice(tip);
                Ok(())
            });
            drawn += draw(rdr, target, &fan, color, PrimType::TriangleFan);

            for p in &mut fan {
                *p = mirror(*p);
            }
            drawn + draw(rdr, target, &fan, color, PrimType::TriangleFan)
        }
        None => {
            let extra = if blunt { 2 } else { 1 };
            let n = ((2.0 * outer / TAU * segments(rdr, r + ht)) as usize)
                .max(2);
            let n = if n + extra >= CAP { CAP - 1 - extra } else { n };

            let fan = generate(|d| {
                d.try_reserve(n + extra)?;
                let v = if blunt {
                    vec2(
                        side_dir.y() - side_dir.x(),
                        -side_dir.x() - side_dir.y(),
                    ) * ht
                } else {
                    -(mid_dir * connect)
                };
                d.push(center + v);
                let radii = vec2(r + ht, r + ht);
                let (start, delta) = (start - outer, 2.0 * outer + delta);
                calculate_arc(d, center, radii, start, delta, 0.0, n)?;
                if blunt {
                    d.push(mirror(center + v));
                }
                Ok(())
            });
            draw(rdr, target, &fan, color, PrimType::TriangleFan)
        }
    }
}

/// Draws a filled pie slice of the circle centered at `center` with
/// radius `r`.
///
/// The slice starts at the angle `start` and spans `delta` radians.
pub fn draw_filled_pieslice<T>(
    rdr: &mut Renderer,
    target: &mut T,
    center: Vec2,
    r: f32,
    start: f32,
    delta: f32,
    color: Color4f,
) -> usize
where
    T: Target + ?Sized,
{
    debug_assert!(r >= 0.0);
    let n =
        ((delta / TAU * segments(rdr, r)).abs() as usize).clamp(2, CAP - 2);
    let fan = generate(|d| {
        d.try_reserve(n + 1)?;
        d.push(center);
        calculate_arc(d, center, vec2(r, r), start, delta, 0.0, n)
    });
    draw(rdr, target, &fan, color, PrimType::TriangleFan)
}

//
// Splines and ribbons
//

/// Draws the cubic Bézier spline with control points `ctrl`.
pub fn draw_spline<T>(
    rdr: &mut Renderer,
    target: &mut T,
    ctrl: &[Vec2; 4],
    color: Color4f,
    thickness: f32,
) -> usize
where
    T: Target + ?Sized,
{
    use sp::math::float::f32 as fp;

    let [p0, p1, p2, p3] = *ctrl;
    let len = (p1 - p0).len() + (p2 - p1).len() + (p3 - p2).len();
    let q = rdr.ctx.curve_quality * rdr.ctx.scale();
    let n = ((fp::sqrt(len) * 1.2 * q / 10.0) as usize).max(2);

    if thickness > 0.0 {
        let n = if 2 * n >= CAP { (CAP - 1) / 2 } else { n };
        let band = generate(|d| calculate_spline(d, ctrl, thickness, n));
        draw(rdr, target, &band, color, PrimType::TriangleStrip)
    } else {
        let n = n.min(CAP - 1);
        let pts = generate(|d| calculate_spline(d, ctrl, 0.0, n));
        draw(rdr, target, &pts, color, PrimType::LineStrip)
    }
}

/// Draws a ribbon along the polyline through `pts`.
///
/// Unlike [`draw_polyline`], the ribbon is a single triangle strip with
/// mitered corners and no caps.
pub fn draw_ribbon<T>(
    rdr: &mut Renderer,
    target: &mut T,
    pts: &[Vec2],
    color: Color4f,
    thickness: f32,
) -> usize
where
    T: Target + ?Sized,
{
    let band = generate(|d| calculate_ribbon(d, pts, thickness));
    let prim = if thickness > 0.0 {
        PrimType::TriangleStrip
    } else {
        PrimType::LineStrip
    };
    draw(rdr, target, &band, color, prim)
}

//
// Polylines and polygons
//

/// Draws the polyline through `pts` with `stroke`.
///
/// If the thickness of `stroke` is not positive, draws a hairline strip,
/// closed into a loop if the cap is [`LineCap::Closed`] and there are more
/// than two points.
///
/// # Examples
/// ```
/// use sp::math::{rgb, vec2};
/// use sp::render::{Bitmap, Renderer};
/// use softprim_geom::shapes::draw_polyline;
/// use softprim_geom::stroke::{LineJoin, Stroke};
///
/// let mut rdr = Renderer::default();
/// let mut bmp = Bitmap::new(16, 16);
/// let pts = [vec2(2.0, 2.0), vec2(14.0, 2.0), vec2(8.0, 14.0)];
/// let stroke = Stroke::new(2.0).join(LineJoin::Round);
///
/// let red = rgb(1.0, 0.0, 0.0);
/// let n = draw_polyline(&mut rdr, &mut bmp, &pts, &stroke, red);
/// assert!(n > 8);
/// ```
pub fn draw_polyline<T>(
    rdr: &mut Renderer,
    target: &mut T,
    pts: &[Vec2],
    stroke: &Stroke,
    color: Color4f,
) -> usize
where
    T: Target + ?Sized,
{
    if stroke.thickness > 0.0 {
        rdr.draw_cached(target, color, PrimType::TriangleList, |c, sink| {
            stroke_polyline(pts, stroke, |t| c.push_triangle(t, &mut *sink));
        })
    } else {
        let closed = stroke.cap == LineCap::Closed && pts.len() > 2;
        let first = pts.first().filter(|_| closed);
        rdr.draw_cached(target, color, PrimType::LineStrip, |c, sink| {
            for &p in pts.iter().chain(first) {
                c.push_line_vertex(p, &mut *sink);
            }
        })
    }
}

/// Draws the outline of the polygon with vertices `pts`.
///
/// Corners are connected with `join`; miter joins are limited by the
/// [miter limit][sp::render::Context::miter_limit] of the context.
pub fn draw_polygon<T>(
    rdr: &mut Renderer,
    target: &mut T,
    pts: &[Vec2],
    join: LineJoin,
    color: Color4f,
    thickness: f32,
) -> usize
where
    T: Target + ?Sized,
{
    let stroke = Stroke::new(thickness)
        .join(join)
        .cap(LineCap::Closed)
        .miter_limit(rdr.ctx.miter_limit);
    draw_polyline(rdr, target, pts, &stroke, color)
}

/// Draws the filled polygon with vertices `pts`.
///
/// The polygon must be simple but need not be convex.
///
/// # Errors
/// Returns [`Error::Alloc`][sp::util::Error::Alloc] if the polygon cannot
/// be triangulated for lack of memory. Nothing is drawn in this case.
pub fn draw_filled_polygon<T>(
    rdr: &mut Renderer,
    target: &mut T,
    pts: &[Vec2],
    color: Color4f,
) -> Result<usize>
where
    T: Target + ?Sized,
{
    draw_filled_polygon_with_holes(rdr, target, pts, &[pts.len()], color)
}

/// Draws a filled polygon with holes.
///
/// `pts` holds the vertices of all the rings of the polygon one after the
/// other, and `ring_counts` the number of vertices in each ring. The first
/// ring is the outline and the rest are holes, wound opposite to the
/// outline. See [`triangulate_polygon`].
///
/// # Errors
/// Returns [`Error::Alloc`][sp::util::Error::Alloc] if the polygon cannot
/// be triangulated for lack of memory. Nothing is drawn in this case.
pub fn draw_filled_polygon_with_holes<T>(
    rdr: &mut Renderer,
    target: &mut T,
    pts: &[Vec2],
    ring_counts: &[usize],
    color: Color4f,
) -> Result<usize>
where
    T: Target + ?Sized,
{
    debug_assert_eq!(ring_counts.iter().sum::<usize>(), pts.len());

    let mut coords = Vec::new();
    coords.try_reserve_exact(2 * pts.len())?;
    coords.extend(pts.iter().flat_map(|p| [p.x(), p.y()]));

    let holes = ring_counts.len().saturating_sub(1);
    let mut indices = Vec::new();
    indices.try_reserve_exact(3 * (pts.len() + 2 * holes).saturating_sub(2))?;
    triangulate_polygon(&coords, 2, ring_counts, |a, b, c| {
        indices.extend([a, b, c]);
    })?;

    let mut verts = Vec::new();
    verts.try_reserve_exact(pts.len())?;
    verts.extend(pts.iter().map(|&p| vertex(p, color)));

    let tris = PrimType::TriangleList;
    Ok(rdr.draw_indexed_prim(target, &verts, None, &indices, tris))
}

//
// Local helpers
//

/// Returns the number of segments in a full circle of radius `r`.
fn segments(rdr: &Renderer, r: f32) -> f32 {
    use sp::math::float::f32 as fp;
    rdr.ctx.curve_quality * fp::sqrt(rdr.ctx.scale() * r)
}

/// Collects the points generated by `f`, or nothing if `f` fails.
fn generate<F>(f: F) -> Vec<Vec2>
where
    F: FnOnce(&mut Vec<Vec2>) -> Result<()>,
{
    let mut pts = Vec::new();
    if let Err(e) = f(&mut pts) {
        debug!("skipping shape: {e}");
        pts.clear();
    }
    pts
}

/// Draws `pts` as primitives of type `prim`, all with `color`.
fn draw<T>(
    rdr: &mut Renderer,
    target: &mut T,
    pts: &[Vec2],
    color: Color4f,
    prim: PrimType,
) -> usize
where
    T: Target + ?Sized,
{
    let mut verts = Vec::new();
    if let Err(e) = verts.try_reserve_exact(pts.len()) {
        debug!("skipping shape: {e}");
        return 0;
    }
    verts.extend(pts.iter().map(|&p| vertex(p, color)));
    rdr.draw_prim(target, &verts, None, 0..verts.len(), prim)
}

/// Returns the `4 * n` points of the outline of a rounded rectangle.
fn rounded_outline(a: Vec2, b: Vec2, radii: Vec2, n: usize) -> Vec<Vec2> {
    let mut quarter = generate(|d| {
        calculate_arc(d, Vec2::ZERO, radii, 0.0, FRAC_PI_2, 0.0, n + 1)
    });
    // The last point would duplicate the first point of the next corner
    quarter.truncate(n);
    generate(|d| round_corners(d, &quarter, 1, [a, b, radii]))
}

/// Appends the quarter arc `quarter` mirrored into each corner of the
/// rectangle from `a` to `b` with corner `radii`, going clockwise from the
/// top-right corner.
///
/// The arc is split into chunks of `chunk` points, whose order is kept
/// when the arc is traversed backwards.
fn round_corners(
    dest: &mut Vec<Vec2>,
    quarter: &[Vec2],
    chunk: usize,
    [a, b, radii]: [Vec2; 3],
) -> Result<()> {
    dest.try_reserve(4 * quarter.len() + 2)?;
    let (rx, ry) = (radii.x(), radii.y());
    let corners = [
        (vec2(b.x() - rx, a.y() + ry), vec2(1.0, -1.0), false),
        (vec2(a.x() + rx, a.y() + ry), vec2(-1.0, -1.0), true),
        (vec2(a.x() + rx, b.y() - ry), vec2(-1.0, 1.0), false),
        (vec2(b.x() - rx, b.y() - ry), vec2(1.0, 1.0), true),
    ];
    for (origin, sign, backwards) in corners {
        let place = |p: &Vec2| {
            origin + vec2(sign.x() * p.x(), sign.y() * p.y())
        };
        if backwards {
            for c in quarter.chunks(chunk).rev() {
                dest.extend(c.iter().map(place));
            }
        } else {
            dest.extend(quarter.iter().map(place));
        }
    }
    Ok(())
}
