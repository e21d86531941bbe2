//! Degeneracy-safe distance and force computation.
//!
//! The simulation never surfaces numerical degeneracy as an error: distances
//! below [`MIN_DISTANCE`] (coincident nodes) or non-finite values are replaced
//! by a bounded pseudo-random substitute so no force ever divides by zero or
//! overflows.

use crate::model::Point;
use rand::Rng;
use rand::rngs::StdRng;

/// Distances below this are treated as coincident.
pub const MIN_DISTANCE: f64 = 1e-6;

/// Coordinates/forces above this are treated as overflowed.
pub const MAX_MAGNITUDE: f64 = 1e100;

/// A uniformly random point in the disk of the given radius, bounded away
/// from the center so callers always get a usable direction.
pub fn random_in_disk(rng: &mut StdRng, radius: f64) -> Point {
    let radius = radius.max(MIN_DISTANCE * 2.0);
    loop {
        let x = rng.gen_range(-radius..=radius);
        let y = rng.gen_range(-radius..=radius);
        let p = Point::new(x, y);
        let n = p.norm();
        if n >= MIN_DISTANCE && n <= radius {
            return p;
        }
    }
}

/// Unit vector at the given angle.
pub fn unit(angle: f64) -> Point {
    Point::new(angle.cos(), angle.sin())
}

/// Difference `to - from` and its length, substituting a random short vector
/// when the pair is coincident or non-finite.
pub fn safe_delta(from: Point, to: Point, rng: &mut StdRng) -> (Point, f64) {
    let delta = to - from;
    let dist = delta.norm();
    if dist.is_finite() && (MIN_DISTANCE..=MAX_MAGNITUDE).contains(&dist) {
        return (delta, dist);
    }
    let sub = random_in_disk(rng, MIN_DISTANCE * 100.0);
    let n = sub.norm();
    (sub, n)
}

/// Clamp a force vector to a finite, bounded value. Non-finite forces are
/// replaced by a random bounded substitute; oversized ones are rescaled.
pub fn safe_force(f: Point, rng: &mut StdRng) -> Point {
    if !f.is_finite() {
        return random_in_disk(rng, 1.0);
    }
    let n = f.norm();
    if n > MAX_MAGNITUDE {
        f * (MAX_MAGNITUDE / n)
    } else {
        f
    }
}
