//! Dynamic square region tracking the current node extents.
//!
//! Frames the repulsion grid. The solver fits one box per run and only ever
//! grows it (via `cover`, in fixed increments) as positions move, so the
//! grid's frame never shrinks mid-run.

use crate::model::Point;

const GROW_STEP: f64 = 16.0;

#[derive(Debug, Clone, Copy)]
pub struct LayoutBox {
    pub left: f64,
    pub bottom: f64,
    pub length: f64,
}

impl LayoutBox {
    /// Smallest square covering all points, with a minimal side of 1.
    pub fn fit<'a, I>(points: I) -> Self
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
            return Self {
                left: 0.0,
                bottom: 0.0,
                length: 1.0,
            };
        }
        Self {
            left: min_x,
            bottom: min_y,
            length: (max_x - min_x).max(max_y - min_y).max(1.0),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left
            && p.x <= self.left + self.length
            && p.y >= self.bottom
            && p.y <= self.bottom + self.length
    }

    /// Grow (never shrink) in `GROW_STEP` increments until `p` is inside.
    pub fn cover(&mut self, p: Point) {
        while p.x < self.left {
            self.left -= GROW_STEP;
            self.length += GROW_STEP;
        }
        while p.y < self.bottom {
            self.bottom -= GROW_STEP;
            self.length += GROW_STEP;
        }
        while p.x > self.left + self.length || p.y > self.bottom + self.length {
            self.length += GROW_STEP;
        }
    }

    /// Grid cell of `p` for a `cells × cells` partition of the box.
    pub fn cell_of(&self, p: Point, cells: usize) -> (usize, usize) {
        let w = self.length / cells as f64;
        let cx = ((p.x - self.left) / w) as usize;
        let cy = ((p.y - self.bottom) / w) as usize;
        (cx.min(cells - 1), cy.min(cells - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_only_grows() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        let mut b = LayoutBox::fit(pts.iter());
        let before = b.length;
        b.cover(Point::new(40.0, -5.0));
        assert!(b.length >= before);
        assert!(b.contains(Point::new(40.0, -5.0)));
        assert!(b.contains(Point::new(0.0, 0.0)));
    }

    #[test]
    fn cell_indices_stay_in_range() {
        let pts = [Point::new(0.0, 0.0), Point::new(9.0, 9.0)];
        let b = LayoutBox::fit(pts.iter());
        let (cx, cy) = b.cell_of(Point::new(9.0, 9.0), 3);
        assert!(cx < 3 && cy < 3);
    }
}
