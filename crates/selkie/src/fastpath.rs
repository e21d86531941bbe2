//! Direct placement for pure chains and pure cycles.
//!
//! Both shapes are common inputs where the full multilevel simulation is
//! wasted effort: an arc-length walk along the structure already gives the
//! optimal drawing.

use crate::attributes::Level;
use crate::model::Point;
use rand::Rng;
use rand::rngs::StdRng;
use std::f64::consts::TAU;

// Cycle nodes are jittered by this fraction of their angular spacing.
const JITTER: f64 = 0.01;

/// Place `level` directly when its degree sequence is a pure chain (min 1,
/// max 2) or pure cycle (all 2). Returns `false` when the shape doesn't
/// qualify and the general algorithm must run.
pub fn try_direct(level: &mut Level, rng: &mut StdRng) -> bool {
    let ids = level.graph.node_ids();
    if ids.len() < 3 {
        return false;
    }

    let mut min_deg = usize::MAX;
    let mut max_deg = 0;
    let mut endpoint: Option<&String> = None;
    for id in &ids {
        let d = level.graph.degree(id);
        min_deg = min_deg.min(d);
        max_deg = max_deg.max(d);
        if d == 1 && endpoint.is_none() {
            endpoint = Some(id);
        }
    }

    if min_deg == 2 && max_deg == 2 {
        place_cycle(level, &ids, rng);
        true
    } else if min_deg == 1 && max_deg == 2 {
        let start = endpoint.expect("a chain has a degree-1 endpoint").clone();
        place_chain(level, &start);
        true
    } else {
        false
    }
}

/// Walk from an endpoint and lay the chain along the x-axis at cumulative
/// ideal lengths.
fn place_chain(level: &mut Level, start: &str) {
    let mut prev: Option<String> = None;
    let mut cur = start.to_string();
    let mut x = 0.0;
    loop {
        {
            let a = level.node_mut(&cur);
            a.position = Point::new(x, 0.0);
            a.placed = true;
        }
        let next = level
            .graph
            .neighbors(&cur)
            .iter()
            .copied()
            .find(|n| Some(*n) != prev.as_deref())
            .map(|n| n.to_string());
        let Some(next) = next else {
            break;
        };
        x += level.edge_length(&cur, &next);
        prev = Some(cur);
        cur = next;
    }
}

/// Distribute the cycle around a circle whose circumference is the total
/// edge length, each node at its arc-length position plus a slight jitter.
fn place_cycle(level: &mut Level, ids: &[String], rng: &mut StdRng) {
    // Walk the ring once, recording each node's arc offset. After `n` steps
    // the walk is back at the start and `arc` holds the full circumference.
    let n = ids.len();
    let start = ids[0].clone();
    let mut order: Vec<(String, f64)> = Vec::with_capacity(n);
    let mut prev: Option<String> = None;
    let mut cur = start;
    let mut arc = 0.0;
    for _ in 0..n {
        order.push((cur.clone(), arc));
        let nbs = level.graph.neighbors(&cur);
        let next = nbs
            .iter()
            .copied()
            .find(|x| Some(*x) != prev.as_deref())
            .unwrap_or(nbs[0])
            .to_string();
        arc += level.edge_length(&cur, &next);
        prev = Some(cur);
        cur = next;
    }
    let total = if arc > 0.0 { arc } else { n as f64 };
    let radius = total / TAU;
    let spacing = TAU / n as f64;

    for (id, at) in order {
        let jitter = rng.gen_range(-JITTER..=JITTER) * spacing;
        let theta = at / total * TAU + jitter;
        let a = level.node_mut(&id);
        a.position = Point::new(radius * theta.cos(), radius * theta.sin());
        a.placed = true;
    }
}
