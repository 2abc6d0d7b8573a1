use sp::math::{Vec2, vec2};
use softprim_geom::stroke::{LineCap, LineJoin, Stroke, stroke_polyline};

fn stroke(pts: &[Vec2], stroke: Stroke) -> Vec<[Vec2; 3]> {
    let mut tris = vec![];
    stroke_polyline(pts, &stroke, |t| tris.push(t));
    tris
}

/// Returns the triangles of `with` not in `without`.
fn joins(with: &[[Vec2; 3]], without: &[[Vec2; 3]]) -> Vec<[Vec2; 3]> {
    with.iter()
        .filter(|t| !without.contains(t))
        .copied()
        .collect()
}

const ACUTE: [Vec2; 3] = [vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(0.0, 3.0)];

#[test]
fn clipped_miter_stays_within_limit() {
    let pivot = ACUTE[1];
    let st = Stroke::new(2.0).miter_limit(1.0);
    let none = stroke(&ACUTE, st);
    let miter = stroke(&ACUTE, st.join(LineJoin::Miter));

    let joins = joins(&miter, &none);
    assert_eq!(joins.len(), 3);
    for p in joins.iter().flatten() {
        assert!((*p - pivot).len() <= 1.0 + 1e-4, "{p:?} too far out");
    }
}

#[test]
fn looser_limit_allows_longer_miter() {
    let pivot = ACUTE[1];
    let st = Stroke::new(2.0).join(LineJoin::Miter);
    let none = stroke(&ACUTE, st.join(LineJoin::None));

    let far = |limit: f32| {
        joins(&stroke(&ACUTE, st.miter_limit(limit)), &none)
            .iter()
            .flatten()
            .map(|p| (*p - pivot).len())
            .fold(0.0, f32::max)
    };
    let (near, farther) = (far(1.0), far(4.0));
    assert!(near <= 1.0 + 1e-4);
    assert!(farther > 3.9 && farther <= 4.0 + 1e-4, "{farther}");
}

#[test]
fn every_join_fills_the_corner() {
    let st = Stroke::new(2.0);
    let none = stroke(&ACUTE, st);
    for join in [LineJoin::Bevel, LineJoin::Round, LineJoin::Miter] {
        let tris = stroke(&ACUTE, st.join(join));
        assert!(tris.len() > none.len(), "{join:?}");
    }
}

#[test]
fn caps_add_triangles_only_to_open_polylines() {
    let st = Stroke::new(2.0);
    let bare = stroke(&ACUTE, st).len();
    for cap in [LineCap::Square, LineCap::Round, LineCap::Triangle] {
        assert!(stroke(&ACUTE, st.cap(cap)).len() > bare, "{cap:?}");
    }
    // Closing adds a third segment and no caps
    let closed = stroke(&ACUTE, st.cap(LineCap::Closed));
    assert_eq!(closed.len(), 3 * 4);
}
