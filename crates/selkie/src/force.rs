//! Iterative force simulation run at every hierarchy level.
//!
//! Each iteration accumulates attractive forces along edges (one of three
//! models) and repulsive forces between node pairs (exact or grid-approximate),
//! scales the combination by the squared average ideal length and the current
//! temperature, damps oscillations against the previous iteration's force, and
//! applies the capped displacement.

use crate::attributes::Level;
use crate::layout_box::LayoutBox;
use crate::model::{ForceModel, LayoutOptions, Point, RepulsionMode, StopCriterion};
use crate::numeric::{self, MIN_DISTANCE};
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::f64::consts::TAU;

/// Hard ceiling regardless of stop criterion.
pub const MAX_ITERATIONS: usize = 10_000;

/// Oscillation-damping limits per π/6-wide bucket of the oriented angle
/// between the current and previous force. A reversing force (buckets 5–7)
/// may grow to at most 0.33× the previous magnitude, a continuing one to 2×.
/// The table is a fixed constant of the engine; tests pin it.
pub const OSCILLATION_FACTORS: [f64; 12] = [
    2.0, 1.5, 1.0, 0.66, 0.5, 0.33, 0.33, 0.33, 0.5, 0.66, 1.0, 1.5,
];

#[derive(Debug, Clone, Copy)]
pub struct SolverParams {
    pub spring_strength: f64,
    pub repulsion_strength: f64,
    pub stop: StopCriterion,
    pub iterations: usize,
}

impl SolverParams {
    /// Main per-level pass.
    pub fn gross(options: &LayoutOptions) -> Self {
        Self {
            spring_strength: options.spring_strength,
            repulsion_strength: options.repulsion_strength,
            stop: options.stop,
            iterations: options.fixed_iterations,
        }
    }

    /// First finest-level fine-tuning pass: stiffer springs, softer repulsion.
    pub fn fine_one(options: &LayoutOptions) -> Self {
        Self {
            spring_strength: options.fine_tune_spring,
            repulsion_strength: options.fine_tune_repulsion,
            stop: StopCriterion::FixedIterations,
            iterations: options.fine_tune_iterations,
        }
    }

    /// Second pass tightens further.
    pub fn fine_two(options: &LayoutOptions) -> Self {
        Self {
            spring_strength: options.fine_tune_spring * 2.0,
            repulsion_strength: options.fine_tune_repulsion * 0.5,
            stop: StopCriterion::FixedIterations,
            iterations: options.fine_tune_iterations,
        }
    }
}

/// Clamp `current` against `previous` according to the oscillation table.
pub fn dampen(current: Point, previous: Point) -> Point {
    let pn = previous.norm();
    let cn = current.norm();
    if pn < MIN_DISTANCE || cn < MIN_DISTANCE {
        return current;
    }
    let angle = (current.angle() - previous.angle()).rem_euclid(TAU);
    let bucket = ((angle / (TAU / 12.0)) as usize).min(11);
    let limit = OSCILLATION_FACTORS[bucket] * pn;
    if cn > limit {
        current * (limit / cn)
    } else {
        current
    }
}

fn attraction(model: ForceModel, d: f64, ideal: f64) -> f64 {
    let ideal = ideal.max(MIN_DISTANCE);
    match model {
        ForceModel::FruchtermanReingold => d * d / (ideal * ideal * ideal),
        ForceModel::Eades => (d / ideal).log2(),
        ForceModel::New => (d / ideal).log2() * d * d / (ideal * ideal * ideal),
    }
}

struct Body {
    pos: Point,
    radius: f64,
}

fn repel_pair(
    bodies: &[Body],
    i: usize,
    j: usize,
    strength: f64,
    force: &mut [Point],
    rng: &mut StdRng,
) {
    let (delta, d) = numeric::safe_delta(bodies[j].pos, bodies[i].pos, rng);
    let gap = (d - bodies[i].radius - bodies[j].radius).max(MIN_DISTANCE);
    let f = delta * (strength / (gap * d));
    force[i] += f;
    force[j] += f * -1.0;
}

fn repulsion_exact(bodies: &[Body], strength: f64, force: &mut [Point], rng: &mut StdRng) {
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            repel_pair(bodies, i, j, strength, force, rng);
        }
    }
}

/// Grid-approximate repulsion: same- and adjacent-cell pairs only. Falls back
/// to the exact pass when the grid would be too coarse to prune anything.
fn repulsion_grid(
    bodies: &[Body],
    strength: f64,
    quotient: usize,
    bounds: &LayoutBox,
    force: &mut [Point],
    rng: &mut StdRng,
) {
    let n = bodies.len();
    let cells = ((n as f64).sqrt() / quotient.max(1) as f64) as usize;
    if cells <= 2 {
        repulsion_exact(bodies, strength, force, rng);
        return;
    }

    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); cells * cells];
    for (i, b) in bodies.iter().enumerate() {
        let (cx, cy) = bounds.cell_of(b.pos, cells);
        buckets[cy * cells + cx].push(i);
    }

    // Each unordered cell pair is visited once: within-cell pairs, plus the
    // four forward neighbor offsets.
    const NEIGHBORS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];
    for cy in 0..cells {
        for cx in 0..cells {
            let here = &buckets[cy * cells + cx];
            for a in 0..here.len() {
                for b in (a + 1)..here.len() {
                    repel_pair(bodies, here[a], here[b], strength, force, rng);
                }
            }
            for (dx, dy) in NEIGHBORS {
                let nx = cx as isize + dx;
                let ny = cy as isize + dy;
                if nx < 0 || ny < 0 || nx >= cells as isize || ny >= cells as isize {
                    continue;
                }
                let there = &buckets[ny as usize * cells + nx as usize];
                for &a in here {
                    for &b in there {
                        repel_pair(bodies, a, b, strength, force, rng);
                    }
                }
            }
        }
    }
}

/// Run the solver over one level, updating node positions in place.
pub fn run(level: &mut Level, options: &LayoutOptions, params: &SolverParams, rng: &mut StdRng) {
    let ids = level.graph.node_ids();
    let n = ids.len();
    if n <= 1 {
        return;
    }
    let index: FxHashMap<String, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i))
        .collect();

    let mut bodies: Vec<Body> = ids
        .iter()
        .map(|id| {
            let a = level.node(id);
            Body {
                pos: a.position,
                radius: (a.width + a.height) / 4.0,
            }
        })
        .collect();

    let mut edges: Vec<(usize, usize, f64)> = Vec::with_capacity(level.graph.edge_count());
    let mut ideal_sum = 0.0;
    for key in level.graph.edge_keys() {
        if key.is_self_loop() {
            continue;
        }
        let len = level.edge(&key).length;
        edges.push((index[&key.v], index[&key.w], len));
        ideal_sum += len;
    }
    let ideal_avg = if edges.is_empty() {
        options.unit_edge_length
    } else {
        ideal_sum / edges.len() as f64
    };
    let scale = ideal_avg * ideal_avg;

    // One box per run: it grows with the drawing and never shrinks until the
    // next run re-fits it, so the repulsion grid's frame stays stable while
    // nodes oscillate near the boundary.
    let mut bounds = LayoutBox::fit(bodies.iter().map(|b| &b.pos));

    let mut prev_force: Vec<Point> = vec![Point::ZERO; n];
    let mut temperature = 1.0_f64;
    let iteration_cap = match params.stop {
        StopCriterion::FixedIterations | StopCriterion::Both => {
            params.iterations.min(MAX_ITERATIONS)
        }
        StopCriterion::Threshold => MAX_ITERATIONS,
    };

    for iter in 0..iteration_cap {
        if options.snap_to_grid {
            for b in &mut bodies {
                b.pos = Point::new(b.pos.x.round(), b.pos.y.round());
                bounds.cover(b.pos);
            }
        }

        let mut force = vec![Point::ZERO; n];

        for &(u, w, ideal) in &edges {
            let (delta, d) = numeric::safe_delta(bodies[u].pos, bodies[w].pos, rng);
            let mag = attraction(options.force_model, d, ideal) * params.spring_strength;
            let f = delta * (mag / d);
            force[u] += f;
            force[w] += f * -1.0;
        }

        match options.repulsion {
            RepulsionMode::Exact => {
                repulsion_exact(&bodies, params.repulsion_strength, &mut force, rng)
            }
            RepulsionMode::Grid => repulsion_grid(
                &bodies,
                params.repulsion_strength,
                options.grid_quotient,
                &bounds,
                &mut force,
                rng,
            ),
        }

        let max_displacement =
            options.unit_edge_length * options.max_displacement_factor / ((1 + iter) as f64).sqrt();
        let mut total = 0.0;
        for i in 0..n {
            let scaled = numeric::safe_force(force[i] * (scale * temperature), rng);
            let damped = dampen(scaled, prev_force[i]);
            let norm = damped.norm();
            let step = if norm > max_displacement {
                damped * (max_displacement / norm)
            } else {
                damped
            };
            bodies[i].pos += step;
            bounds.cover(bodies[i].pos);
            prev_force[i] = damped;
            total += norm;
        }
        temperature *= options.cooling_factor;

        let mean = total / n as f64;
        let threshold_hit = mean < options.force_threshold;
        match params.stop {
            StopCriterion::Threshold | StopCriterion::Both if threshold_hit => break,
            _ => {}
        }
    }

    for (i, id) in ids.iter().enumerate() {
        level.node_mut(id).position = bodies[i].pos;
    }
}

/// Uniformly rescale positions about their centroid so the realized average
/// edge length matches the ideal average.
pub fn rescale_to_ideal(level: &mut Level, fallback_ideal: f64) {
    let keys = level.graph.edge_keys();
    if keys.is_empty() {
        return;
    }
    let mut realized = 0.0;
    let mut ideal = 0.0;
    for key in &keys {
        realized += level.node(&key.v).position.distance(level.node(&key.w).position);
        ideal += level.edge(key).length;
    }
    if ideal <= 0.0 {
        ideal = fallback_ideal * keys.len() as f64;
    }
    if realized < MIN_DISTANCE {
        return;
    }
    let factor = ideal / realized;

    let ids = level.graph.node_ids();
    let mut centroid = Point::ZERO;
    for id in &ids {
        centroid += level.node(id).position;
    }
    centroid = centroid * (1.0 / ids.len() as f64);
    for id in &ids {
        let a = level.node_mut(id);
        a.position = centroid + (a.position - centroid) * factor;
    }
}
