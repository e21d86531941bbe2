//! Initial placement: seeding the coarsest level and projecting solved
//! positions down the hierarchy.
//!
//! Suns copy their higher-level position directly. Everything else
//! barycenters over already-placed same-system neighbors (walked radially to
//! the node's distance-to-sun and waggled to break coincidences) plus
//! lambda-interpolated estimates toward inter-system neighbor suns. Nodes
//! with nothing placed nearby fall back to a random point inside their
//! inherited angular sector.

use crate::attributes::{Level, NodeRole};
use crate::model::{InitialPlacement, LayoutOptions, Point};
use crate::numeric::{self, MIN_DISTANCE};
use rand::Rng;
use rand::rngs::StdRng;
use std::f64::consts::TAU;

// Waggle radius as a fraction of the edge's ideal length.
const WAGGLE: f64 = 0.05;

/// Seed positions at the coarsest level.
pub fn place_coarsest(level: &mut Level, options: &LayoutOptions, rng: &mut StdRng) {
    let ids = level.graph.node_ids();
    let n = ids.len().max(1);
    match options.initial_placement {
        InitialPlacement::KeepPositions => {
            for id in &ids {
                level.node_mut(id).placed = true;
            }
        }
        InitialPlacement::UniformGrid => {
            let cols = (n as f64).sqrt().ceil() as usize;
            for (i, id) in ids.iter().enumerate() {
                let a = level.node_mut(id);
                a.position = Point::new(
                    (i % cols) as f64 * options.unit_edge_length,
                    (i / cols) as f64 * options.unit_edge_length,
                );
                a.placed = true;
            }
        }
        InitialPlacement::Random => {
            let side = options.unit_edge_length * (n as f64).sqrt();
            for id in &ids {
                let a = level.node_mut(id);
                a.position = Point::new(rng.gen_range(0.0..=side), rng.gen_range(0.0..=side));
                a.placed = true;
            }
        }
    }
}

/// Project `upper`'s solved positions into `lower` and place every node
/// introduced at the finer level.
pub fn project_down(upper: &Level, lower: &mut Level, options: &LayoutOptions, rng: &mut StdRng) {
    let ids = lower.graph.node_ids();

    // Suns first: copied positions and angular sectors from the level above.
    for id in &ids {
        let Some(higher) = lower.node(id).higher_level_node.clone() else {
            continue;
        };
        let h = upper.node(&higher);
        let sector = sun_sector(upper, &higher);
        let a = lower.node_mut(id);
        a.position = h.position;
        a.placed = true;
        a.sector = Some(sector);
    }

    // Descendants inherit their sun's sector.
    for id in &ids {
        let sun = lower.node(id).dedicated_sun.clone();
        if let Some(sun) = sun {
            if sun != *id {
                let sector = lower.node(&sun).sector;
                lower.node_mut(id).sector = sector;
            }
        }
    }

    // Planets before moons so moons see their planet placed.
    for role in [NodeRole::Planet, NodeRole::PlanetWithMoons, NodeRole::Moon] {
        for id in &ids {
            if lower.node(id).role == role && !lower.node(id).placed {
                place_node(lower, id, options, rng);
            }
        }
    }
    for id in &ids {
        if !lower.node(id).placed {
            place_node(lower, id, options, rng);
        }
    }
}

/// Angular sector assigned to a sun, derived from the fan of its higher-level
/// node's inter-system edges: the largest angular gap between neighbor
/// directions, so descendants avoid the edges leaving the system.
fn sun_sector(upper: &Level, higher: &str) -> (f64, f64) {
    let pos = upper.node(higher).position;
    let mut angles: Vec<f64> = Vec::new();
    for key in upper.graph.node_edges(higher) {
        if !upper.edge(&key).extra_edge {
            continue;
        }
        let Some(other) = key.opposite(higher) else {
            continue;
        };
        let d = upper.node(other).position - pos;
        if d.norm() > MIN_DISTANCE {
            angles.push(d.angle());
        }
    }

    match angles.len() {
        0 => (0.0, TAU),
        1 => {
            // Half-plane facing away from the lone neighbor.
            let a = angles[0];
            (a + TAU / 4.0, a + 3.0 * TAU / 4.0)
        }
        _ => {
            angles.sort_by(|a, b| a.partial_cmp(b).unwrap());
            // Seed with the wrap-around gap from the last angle back to the first.
            let mut start = angles[angles.len() - 1];
            let mut width = angles[0] + TAU - start;
            for w in angles.windows(2) {
                if w[1] - w[0] > width {
                    width = w[1] - w[0];
                    start = w[0];
                }
            }
            (start, start + width)
        }
    }
}

fn sample_sector(rng: &mut StdRng, sector: Option<(f64, f64)>) -> f64 {
    let (start, end) = sector.unwrap_or((0.0, TAU));
    if end - start < MIN_DISTANCE {
        return start.rem_euclid(TAU);
    }
    rng.gen_range(start..end).rem_euclid(TAU)
}

fn place_node(lower: &mut Level, id: &str, options: &LayoutOptions, rng: &mut StdRng) {
    let (sun_id, dist_to_sun, sector, neighbor_suns) = {
        let a = lower.node(id);
        (
            a.dedicated_sun.clone(),
            a.dist_to_sun,
            a.sector,
            a.neighbor_suns.clone(),
        )
    };
    let sun_pos = sun_id
        .as_deref()
        .map(|s| lower.node(s).position)
        .unwrap_or(Point::ZERO);

    let mut acc = Point::ZERO;
    let mut count = 0usize;

    for key in lower.graph.node_edges(id) {
        let Some(other) = key.opposite(id) else {
            continue;
        };
        let u = lower.node(other);
        if !u.placed || u.dedicated_sun != sun_id {
            continue;
        }
        let len = lower.edge(&key).length;
        let dir = u.position - sun_pos;
        let base = if dir.norm() < MIN_DISTANCE {
            // The placed neighbor is the sun itself: step out into the sector.
            sun_pos + numeric::unit(sample_sector(rng, sector)) * len
        } else {
            // Walk radially from the neighbor to this node's own orbit.
            u.position + dir * ((dist_to_sun - u.dist_to_sun) / dir.norm())
        };
        acc += base + numeric::random_in_disk(rng, WAGGLE * len);
        count += 1;
    }

    for nb in &neighbor_suns {
        if let Some(t) = lower.nodes.get(&nb.sun) {
            if t.placed {
                acc += sun_pos + (t.position - sun_pos) * nb.lambda;
                count += 1;
            }
        }
    }

    let pos = if count == 0 {
        let r = if dist_to_sun > MIN_DISTANCE {
            dist_to_sun
        } else {
            options.unit_edge_length * 0.5
        };
        sun_pos + numeric::unit(sample_sector(rng, sector)) * r
    } else {
        acc * (1.0 / count as f64)
    };

    let a = lower.node_mut(id);
    a.position = pos;
    a.placed = true;
}
