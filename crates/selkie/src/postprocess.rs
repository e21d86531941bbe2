//! Local artifact fix-ups run after the finest-level simulation.

use crate::attributes::Level;
use crate::model::Point;
use crate::util::{bounding_rect, segments_cross};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::f64::consts::PI;

// A degree-2 node counts as straight once its neighbor angle is within this
// of π.
const STRAIGHT_TOLERANCE: f64 = 0.1;

/// Fix twisted symmetric splits: for every degree-3 node, follow each branch
/// through degree-2 chains; when exactly two branches reconverge at the same
/// node after the same number of steps, remove any literal crossing between
/// corresponding path segments by swapping the offending endpoints.
///
/// This targets one known rendering artifact, not crossings in general.
pub fn untwist_splits(level: &mut Level) {
    let ids = level.graph.node_ids();
    for id in &ids {
        if level.graph.degree(id) != 3 {
            continue;
        }

        let mut walks: Vec<Vec<String>> = Vec::with_capacity(3);
        for first in level.graph.neighbors(id) {
            walks.push(walk_chain(level, id, first));
        }

        // Exactly two of the three branches must meet again in equal steps;
        // if all three converge, leave the split alone.
        let mut matches: Vec<(usize, usize)> = Vec::new();
        for a in 0..3 {
            for b in (a + 1)..3 {
                let ta = walks[a].last().unwrap();
                let tb = walks[b].last().unwrap();
                if ta == tb && ta != id && walks[a].len() == walks[b].len() {
                    matches.push((a, b));
                }
            }
        }
        let [(a, b)] = matches[..] else {
            continue;
        };

        let path_a: Vec<String> = std::iter::once(id.clone()).chain(walks[a].iter().cloned()).collect();
        let path_b: Vec<String> = std::iter::once(id.clone()).chain(walks[b].iter().cloned()).collect();

        for i in 0..path_a.len() - 1 {
            let pa1 = level.node(&path_a[i]).position;
            let pa2 = level.node(&path_a[i + 1]).position;
            let pb1 = level.node(&path_b[i]).position;
            let pb2 = level.node(&path_b[i + 1]).position;
            if path_a[i + 1] == path_b[i + 1] {
                continue; // reached the common terminal
            }
            if segments_cross(pa1, pa2, pb1, pb2) {
                level.node_mut(&path_a[i + 1]).position = pb2;
                level.node_mut(&path_b[i + 1]).position = pa2;
            }
        }
    }
}

/// Follow a chain of degree-2 nodes starting with `first`, stopping at the
/// first branch point (degree != 2). Returns the visited nodes including the
/// terminal.
fn walk_chain(level: &Level, from: &str, first: &str) -> Vec<String> {
    let mut path = vec![first.to_string()];
    let mut prev = from.to_string();
    let mut cur = first.to_string();
    while level.graph.degree(&cur) == 2 {
        let next = level
            .graph
            .neighbors(&cur)
            .iter()
            .copied()
            .find(|n| *n != prev.as_str())
            .map(|n| n.to_string());
        let Some(next) = next else {
            break;
        };
        prev = cur;
        cur = next;
        path.push(cur.clone());
        if path.len() > level.graph.node_count() {
            break; // cycle guard
        }
    }
    path
}

/// Pull the least-straight degree-2 nodes toward the line through their
/// neighbors, over up to `rounds` random-order rounds, then refit all
/// positions into the bounding box the layout had before smoothing.
pub fn smooth_degree_two(level: &mut Level, rounds: usize, rng: &mut StdRng) {
    let ids = level.graph.node_ids();
    let deg2: Vec<String> = ids
        .iter()
        .filter(|id| level.graph.degree(id) == 2)
        .cloned()
        .collect();
    if deg2.is_empty() {
        return;
    }

    let original = bounding_rect(ids.iter().map(|id| &level.node(id).position));

    for _ in 0..rounds {
        let mut worst = 0.0_f64;
        let mut order = deg2.clone();
        order.shuffle(rng);
        for id in &order {
            let nbs = level.graph.neighbors(id);
            let (n1, n2) = (nbs[0].to_string(), nbs[1].to_string());
            let v = level.node(id).position;
            let a = level.node(&n1).position - v;
            let b = level.node(&n2).position - v;
            let deficit = PI - angle_between(a, b);
            worst = worst.max(deficit);
            if deficit <= STRAIGHT_TOLERANCE {
                continue;
            }
            let mid = (level.node(&n1).position + level.node(&n2).position) * 0.5;
            level.node_mut(id).position = (v + mid) * 0.5;
        }
        if worst <= STRAIGHT_TOLERANCE {
            break;
        }
    }

    refit(level, &ids, original);
}

fn angle_between(a: Point, b: Point) -> f64 {
    let na = a.norm();
    let nb = b.norm();
    if na <= 0.0 || nb <= 0.0 {
        return PI;
    }
    let cos = ((a.x * b.x + a.y * b.y) / (na * nb)).clamp(-1.0, 1.0);
    cos.acos()
}

fn refit(level: &mut Level, ids: &[String], original: crate::model::Rect) {
    let now = bounding_rect(ids.iter().map(|id| &level.node(id).position));
    let sx = if now.width > 0.0 {
        original.width / now.width
    } else {
        1.0
    };
    let sy = if now.height > 0.0 {
        original.height / now.height
    } else {
        1.0
    };
    for id in ids {
        let a = level.node_mut(id);
        a.position = Point::new(
            original.x + (a.position.x - now.x) * sx,
            original.y + (a.position.y - now.y) * sy,
        );
    }
}
