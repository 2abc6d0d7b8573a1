//! Triangulation of polygons with holes by ear clipping.
//!
//! Holes are first merged into the outline by cutting a bridge from each
//! hole to a visible outline vertex, turning the polygon into a single
//! weakly simple ring. Then *ears*, convex vertices whose triangle contains
//! no other vertex, are clipped off one at a time until nothing is left.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use log::{debug, warn};

use sp::math::{Vec2, vec2};
use sp::util::Result;

use crate::isect::{intersect_segments, is_point_in_triangle, points_equal};

//
// Types
//

/// A vertex of the ring being clipped, linked to its neighbors.
#[derive(Copy, Clone, Debug)]
struct Node {
    /// Index of the vertex in the input.
    idx: usize,
    pos: Vec2,
    prev: usize,
    next: usize,
}

/// A hole waiting to be merged into the outline.
#[derive(Copy, Clone, Debug)]
struct Hole {
    /// Index of the first vertex of the hole in the input.
    begin: usize,
    len: usize,
    /// Offset of the rightmost vertex from `begin`.
    right: usize,
    /// Position of the rightmost vertex.
    pos: Vec2,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Class {
    Reflex,
    Ear,
    Convex,
}

/// The ring of vertices plus its reflex and ear vertex lists.
///
/// Nodes are never freed; clipped nodes are unlinked from the ring.
#[derive(Clone, Debug, Default)]
struct Ring {
    nodes: Vec<Node>,
    head: usize,
    len: usize,
    reflex: Vec<usize>,
    ears: VecDeque<usize>,
}

//
// Inherent impls
//

impl Ring {
    fn with_capacity(n: usize) -> Result<Self> {
        let mut ring = Self::default();
        ring.nodes.try_reserve_exact(n)?;
        ring.reflex.try_reserve_exact(n)?;
        ring.ears.try_reserve_exact(n)?;
        Ok(ring)
    }

    fn pos(&self, id: usize) -> Vec2 {
        self.nodes[id].pos
    }

    /// Returns the ids of the nodes in ring order, starting from the head.
    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        let mut id = self.head;
        (0..self.len).map(move |_| {
            let cur = id;
            id = self.nodes[id].next;
            cur
        })
    }

    /// Appends a node to the end of the ring.
    fn push(&mut self, idx: usize, pos: Vec2) -> usize {
        if self.len == 0 {
            let id = self.nodes.len();
            self.nodes.push(Node { idx, pos, prev: id, next: id });
            self.head = id;
            self.len = 1;
            id
        } else {
            let last = self.nodes[self.head].prev;
            self.insert_after(last, idx, pos)
        }
    }

    /// Inserts a node after the node `at`, returning the new node's id.
    fn insert_after(&mut self, at: usize, idx: usize, pos: Vec2) -> usize {
        let id = self.nodes.len();
        let next = self.nodes[at].next;
        self.nodes.push(Node { idx, pos, prev: at, next });
        self.nodes[at].next = id;
        self.nodes[next].prev = id;
        self.len += 1;
        id
    }

    fn unlink(&mut self, id: usize) {
        let Node { prev, next, .. } = self.nodes[id];
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        if self.head == id {
            self.head = next;
        }
        self.len -= 1;
    }

    /// Returns whether the interior angle at `id` is at most 180 degrees.
    fn is_convex(&self, id: usize) -> bool {
        let Node { prev, next, pos, .. } = self.nodes[id];
        (self.pos(prev) - pos).cross(&(self.pos(next) - pos)) >= 0.0
    }

    fn classify(&self, id: usize) -> Class {
        if self.len < 3 {
            return Class::Convex;
        }
        if !self.is_convex(id) {
            return Class::Reflex;
        }
        let Node { prev, next, idx, pos } = self.nodes[id];
        let [a, b] = [self.nodes[prev], self.nodes[next]];
        let tri = [a.pos, pos, b.pos];
        // Bridge vertices appear twice but are the same input vertex
        let blocked = self.reflex.iter().any(|&r| {
            let r = self.nodes[r];
            r.idx != a.idx
                && r.idx != idx
                && r.idx != b.idx
                && is_point_in_triangle(r.pos, tri)
        });
        if blocked { Class::Convex } else { Class::Ear }
    }

    /// Adds the node `id` to the reflex list if it is reflex.
    fn add_if_reflex(&mut self, id: usize) {
        if !self.is_convex(id) {
            self.reflex.push(id);
        }
    }

    /// Moves `id` to the correct lists after a neighbor was clipped.
    fn reclassify(&mut self, id: usize) {
        let class = self.classify(id);
        let is_reflex = self.reflex.iter().position(|&r| r == id);
        let is_ear = self.ears.contains(&id);
        match class {
            Class::Reflex => {
                if is_reflex.is_none() {
                    self.reflex.push(id);
                }
                self.ears.retain(|&e| e != id);
            }
            Class::Ear | Class::Convex => {
                if let Some(i) = is_reflex {
                    self.reflex.swap_remove(i);
                }
                if class == Class::Ear && !is_ear {
                    self.ears.push_front(id);
                } else if class != Class::Ear && is_ear {
                    self.ears.retain(|&e| e != id);
                }
            }
        }
    }

    /// Finds the vertex a bridge to the hole vertex at `m` should go to.
    ///
    /// Casts a ray from `m` to the right and picks the closest edge hit.
    /// Returns `None` if no edge is hit.
    fn find_bridge(&self, m: Vec2) -> Option<usize> {
        let ray = m + vec2(1.0, 0.0);
        let mut best: Option<(usize, usize, Vec2)> = None;
        let mut best_t = f32::MAX;

        for e0 in self.iter() {
            let e1 = self.nodes[e0].next;
            let (p0, p1) = (self.pos(e0), self.pos(e1));
            // Only edges going up can be hit from the inside
            if p0.y() < p1.y() || (p0.x() <= m.x() && p1.x() <= m.x()) {
                continue;
            }
            let Some((hit, t, u)) = intersect_segments(m, ray, p0, p1) else {
                continue;
            };
            if (0.0..=1.0).contains(&u) && t >= 0.0 && t < best_t {
                best_t = t;
                best = Some((e0, e1, hit));
            }
        }
        let (e0, e1, hit) = best?;

        if points_equal(m, self.pos(e0)) {
            return Some(e0);
        }
        if points_equal(m, self.pos(e1)) {
            return Some(e1);
        }
        let far = if self.pos(e0).x() > self.pos(e1).x() { e0 } else { e1 };

        // Reflex vertices inside the triangle may block the view to `far`
        let tri = [m, self.pos(far), hit];
        let nearest = self
            .reflex
            .iter()
            .map(|&r| (r, (self.pos(r) - m).len_sqr()))
            .filter(|&(r, _)| is_point_in_triangle(self.pos(r), tri))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        Some(nearest.map_or(far, |(r, _)| r))
    }

    /// Merges `hole` into the ring, bridging it to the node `bridge`.
    fn merge(&mut self, hole: &Hole, bridge: usize, pts: &Points) {
        let first = self.nodes.len();
        let mut last = bridge;
        for j in 0..=hole.len {
            let i = hole.begin + (j + hole.right) % hole.len;
            last = self.insert_after(last, i, pts.get(i));
        }
        let Node { idx, pos, .. } = self.nodes[bridge];
        self.insert_after(last, idx, pos);

        if let Some(i) = self.reflex.iter().position(|&r| r == bridge) {
            self.reflex.swap_remove(i);
        }
        self.add_if_reflex(bridge);
        for id in first..self.nodes.len() {
            self.add_if_reflex(id);
        }
    }

    /// Clips ears until none are left, emitting each as a triangle.
    fn clip<F: FnMut(usize, usize, usize)>(&mut self, emit: &mut F) {
        while let Some(ear) = self.ears.pop_front() {
            let Node { idx, prev, next, .. } = self.nodes[ear];
            emit(self.nodes[prev].idx, idx, self.nodes[next].idx);

            self.unlink(ear);
            if let Some(i) = self.reflex.iter().position(|&r| r == ear) {
                self.reflex.swap_remove(i);
            }
            self.reclassify(prev);
            self.reclassify(next);
        }
    }
}

/// Positions of the input vertices.
struct Points<'a> {
    data: &'a [f32],
    stride: usize,
    /// -1.0 to mirror the polygon vertically, 1.0 otherwise.
    flip: f32,
}

impl Points<'_> {
    fn get(&self, i: usize) -> Vec2 {
        let j = i * self.stride;
        vec2(self.data[j], self.flip * self.data[j + 1])
    }
}

//
// Free functions
//

/// Triangulates a polygon with holes.
///
/// The vertices are read from `vertices` as (x, y) pairs, one every
/// `stride` floats. `ring_counts` lists the numbers of vertices in each
/// ring: the first ring is the outline of the polygon, and the rest are
/// holes. The rings must not intersect each other or themselves. The holes
/// must wind opposite to the outline; the outline may wind either way.
///
/// Calls `emit` with the indices of the three vertices of each triangle.
/// A polygon with `n` vertices in total and `h` holes produces
/// `n + 2h - 2` triangles. If a hole cannot be connected to the outline,
/// it and the holes after it are ignored.
///
/// # Errors
/// Returns [`Error::Alloc`][sp::util::Error::Alloc] if memory for the
/// working set cannot be allocated. Nothing is emitted in this case.
///
/// # Examples
/// ```
/// use softprim_geom::tess::triangulate_polygon;
///
/// #[rustfmt::skip]
/// let square = [
///     0.0, 0.0,
///     0.0, 1.0,
///     1.0, 1.0,
///     1.0, 0.0,
/// ];
/// let mut tris = vec![];
/// triangulate_polygon(&square, 2, &[4], |a, b, c| tris.push([a, b, c]))
///     .unwrap();
///
/// assert_eq!(tris.len(), 2);
/// ```
pub fn triangulate_polygon<F>(
    vertices: &[f32],
    stride: usize,
    ring_counts: &[usize],
    mut emit: F,
) -> Result<()>
where
    F: FnMut(usize, usize, usize),
{
    let total: usize = ring_counts.iter().sum();
    let outline = ring_counts.first().copied().unwrap_or(0);
    if outline < 3 {
        debug!("skipping triangulation: outline of {outline} vertices");
        return Ok(());
    }
    let fits = stride >= 2 && (total - 1) * stride + 2 <= vertices.len();
    debug_assert!(fits, "{total} vertices do not fit in the vertex buffer");
    if !fits {
        return Ok(());
    }

    let mut pts = Points { data: vertices, stride, flip: 1.0 };
    // Shoelace formula; the clipper wants outlines of negative area
    let area: f32 = (0..outline)
        .map(|i| pts.get(i).cross(&pts.get((i + 1) % outline)))
        .sum();
    if area > 0.0 {
        pts.flip = -1.0;
    }

    let mut holes = Vec::new();
    holes.try_reserve_exact(ring_counts.len() - 1)?;
    let mut begin = outline;
    for &len in &ring_counts[1..] {
        if len > 0 {
            let (right, pos) = (0..len)
                .map(|j| (j, pts.get(begin + j)))
                .reduce(|a, b| if b.1.x() >= a.1.x() { b } else { a })
                .unwrap_or((0, Vec2::ZERO));
            holes.push(Hole { begin, len, right, pos });
        }
        begin += len;
    }
    // Rightmost holes first
    holes.sort_by(|a, b| b.pos.x().total_cmp(&a.pos.x()));

    let mut ring = Ring::with_capacity(total + 2 * holes.len())?;
    for i in 0..outline {
        ring.push(i, pts.get(i));
    }
    let ids: Vec<_> = ring.iter().collect();
    for id in ids {
        ring.add_if_reflex(id);
    }

    for hole in &holes {
        let Some(bridge) = ring.find_bridge(hole.pos) else {
            warn!(
                "no bridge found to hole at {:?}, ignoring remaining holes",
                hole.pos
            );
            break;
        };
        ring.merge(hole, bridge, &pts);
    }

    let ids: Vec<_> = ring.iter().collect();
    for id in ids {
        if ring.classify(id) == Class::Ear {
            ring.ears.push_back(id);
        }
    }
    ring.clip(&mut emit);
    Ok(())
}
