//! Small shared helpers.

use crate::model::{Point, Rect};
use selkie_graphlib::EdgeKey;

/// Canonical undirected edge key between two nodes (endpoints in
/// lexicographic order, matching the graph container's storage rule).
pub fn key_between(v: &str, w: &str) -> EdgeKey {
    if v <= w {
        EdgeKey::new(v, w, None::<String>)
    } else {
        EdgeKey::new(w, v, None::<String>)
    }
}

/// Smallest axis-aligned rectangle covering all points. Empty input yields a
/// zero rect at the origin.
pub fn bounding_rect<'a, I>(points: I) -> Rect
where
    I: IntoIterator<Item = &'a Point>,
{
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if !min_x.is_finite() {
        return Rect::default();
    }
    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Proper intersection test for segments `a1-a2` and `b1-b2`. Shared
/// endpoints and collinear touching do not count.
pub fn segments_cross(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}
