//! Multilevel coarsening ("galaxy" construction).
//!
//! Each round partitions the current graph into solar systems: randomly drawn
//! suns, their direct neighbors as planets, and leftover nodes as moons of
//! their nearest planet. Every system collapses to a single node one level
//! up; edges between systems are rewired to the new sun nodes, accumulating
//! the traversed distance, and parallel duplicates merge by count-weighted
//! averaging. Coarsening stops at a node floor or when edge-count shrinkage
//! stalls for too long.

use crate::attributes::{EdgeAttributes, Level, NodeAttributes, NodeRole, SunNeighbor};
use crate::model::LayoutOptions;
use crate::random_set::RandomNodeSet;
use crate::util::key_between;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tracing::debug;

// A level must shrink its edge count to <= SHRINK_FACTOR of the previous one;
// after MAX_BAD_LEVELS consecutive misses we give up on further coarsening and
// proceed with the hierarchy built so far.
const SHRINK_FACTOR: f64 = 0.8;
const MAX_BAD_LEVELS: usize = 5;

/// Build the level hierarchy. Index 0 is the input level; the last entry is
/// the coarsest graph.
pub fn build_hierarchy(options: &LayoutOptions, base: Level, rng: &mut StdRng) -> Vec<Level> {
    let floor = options.min_graph_size.max(2);
    let mut levels = vec![base];
    let mut bad_levels = 0usize;

    loop {
        let cur_nodes = levels.last().unwrap().graph.node_count();
        let cur_edges = levels.last().unwrap().graph.edge_count();
        if cur_nodes <= floor {
            break;
        }

        let next = coarsen_once(options, levels.last_mut().unwrap(), rng);
        if next.graph.node_count() >= cur_nodes {
            // No progress is possible (e.g. an edgeless level where every
            // node becomes its own sun).
            break;
        }

        if (next.graph.edge_count() as f64) > SHRINK_FACTOR * cur_edges as f64 {
            bad_levels += 1;
        } else {
            bad_levels = 0;
        }
        debug!(
            level = levels.len(),
            nodes = next.graph.node_count(),
            edges = next.graph.edge_count(),
            bad_levels,
            "coarsened level"
        );
        levels.push(next);
        if bad_levels >= MAX_BAD_LEVELS {
            break;
        }
    }

    levels
}

/// Partition `cur` into solar systems and return the collapsed next level.
/// Mutates `cur`: roles, dedicated suns, moon lists, hierarchy links, and
/// inter-system edge links are all filled in here.
fn coarsen_once(options: &LayoutOptions, cur: &mut Level, rng: &mut StdRng) -> Level {
    let ids: Vec<String> = cur.graph.node_ids();
    let index: FxHashMap<String, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i))
        .collect();
    let mass: Vec<u32> = ids.iter().map(|id| cur.node(id).mass).collect();

    let mut pool = RandomNodeSet::full(ids.len());
    let mut suns: Vec<String> = Vec::new();

    while let Some(si) = pool.draw(rng, options.galaxy_choice, options.random_tries, &mass) {
        let sun = ids[si].clone();
        {
            let a = cur.node_mut(&sun);
            a.role = NodeRole::Sun;
            a.dedicated_sun = Some(sun.clone());
            a.dist_to_sun = 0.0;
        }

        // Direct neighbors become planets of this sun, including nodes
        // previously reserved as possible moons.
        let nbs: Vec<String> = cur.graph.neighbors(&sun).iter().map(|s| s.to_string()).collect();
        let mut planets: Vec<String> = Vec::new();
        for nb in nbs {
            if cur.node(&nb).role != NodeRole::Unspecified {
                continue;
            }
            let len = cur.edge_length(&sun, &nb);
            let a = cur.node_mut(&nb);
            a.role = NodeRole::Planet;
            a.dedicated_sun = Some(sun.clone());
            a.dist_to_sun = len;
            pool.remove(index[&nb]);
            planets.push(nb);
        }

        // Planet neighbors leave the sun pool but keep no role yet; the moon
        // pass below picks them up.
        for p in &planets {
            let reach: Vec<String> = cur.graph.neighbors(p).iter().map(|s| s.to_string()).collect();
            for nb in reach {
                if cur.node(&nb).role == NodeRole::Unspecified {
                    pool.remove(index[&nb]);
                }
            }
        }

        suns.push(sun);
    }

    assign_moons(cur, &ids);

    // One next-level node per sun, reusing the sun's id as the stable key.
    let mut next = Level::default();
    for sun in &suns {
        cur.node_mut(sun).higher_level_node = Some(sun.clone());
        next.graph.ensure_node(sun.clone());
        let src = cur.node(sun);
        next.nodes.insert(
            sun.clone(),
            NodeAttributes {
                width: src.width,
                height: src.height,
                mass: 0,
                lower_level_node: Some(sun.clone()),
                ..Default::default()
            },
        );
    }
    for id in &ids {
        let sun = cur.node(id).dedicated_sun.clone().expect("every node has a sun");
        let m = cur.node(id).mass;
        next.node_mut(&sun).mass += m;
    }

    // Rewire inter-system edges onto the new sun nodes. Edges that collapse
    // onto a single sun (intra-system and would-be self-loops) are dropped.
    let mut merged: BTreeMap<(String, String), (f64, usize)> = BTreeMap::new();
    for key in cur.graph.edge_keys() {
        let su = cur.node(&key.v).dedicated_sun.clone().expect("sun");
        let sw = cur.node(&key.w).dedicated_sun.clone().expect("sun");
        if su == sw {
            continue;
        }
        let len = cur.edge(&key).length;
        let path = cur.node(&key.v).dist_to_sun + len + cur.node(&key.w).dist_to_sun;

        let hkey = key_between(&su, &sw);
        let slot = merged
            .entry((hkey.v.clone(), hkey.w.clone()))
            .or_insert((0.0, 0));
        slot.0 += path;
        slot.1 += 1;

        cur.edges.get_mut(&key).expect("edge attributes").higher_level_edge = Some(hkey);

        // Record interpolation fractions toward the opposite system's sun
        // for the non-sun endpoints.
        for (end, other_sun) in [(&key.v, &sw), (&key.w, &su)] {
            let a = cur.node_mut(end);
            if a.role != NodeRole::Sun && path > 0.0 {
                a.neighbor_suns.push(SunNeighbor {
                    sun: other_sun.clone(),
                    lambda: a.dist_to_sun / path,
                });
            }
        }
    }

    for ((v, w), (sum, count)) in merged {
        next.graph.set_edge(v.clone(), w.clone());
        next.edges.insert(
            key_between(&v, &w),
            EdgeAttributes {
                length: sum / count as f64,
                extra_edge: true,
                ..Default::default()
            },
        );
    }

    next
}

/// Attach every still-unassigned node as a moon of its nearest planet
/// neighbor (by edge length); the planet is re-tagged `PlanetWithMoons`.
fn assign_moons(cur: &mut Level, ids: &[String]) {
    for id in ids {
        if cur.node(id).role != NodeRole::Unspecified {
            continue;
        }

        let mut best: Option<(String, f64)> = None;
        let mut fallback: Option<(String, f64)> = None;
        let nbs: Vec<String> = cur.graph.neighbors(id).iter().map(|s| s.to_string()).collect();
        for nb in nbs {
            let len = cur.edge_length(id, &nb);
            match cur.node(&nb).role {
                NodeRole::Planet | NodeRole::PlanetWithMoons => {
                    if best.as_ref().map(|(_, l)| len < *l).unwrap_or(true) {
                        best = Some((nb, len));
                    }
                }
                NodeRole::Sun | NodeRole::Moon => {
                    if fallback.as_ref().map(|(_, l)| len < *l).unwrap_or(true) {
                        fallback = Some((nb, len));
                    }
                }
                NodeRole::Unspecified => {}
            }
        }

        // A reserved node always neighbors a planet; the fallback only fires
        // on graphs mutated between passes.
        let Some((anchor, len)) = best.or(fallback) else {
            continue;
        };

        let (sun, anchor_dist) = {
            let p = cur.node(&anchor);
            (p.dedicated_sun.clone().expect("anchor has a sun"), p.dist_to_sun)
        };
        {
            let a = cur.node_mut(id);
            a.role = NodeRole::Moon;
            a.dedicated_sun = Some(sun);
            a.dist_to_sun = anchor_dist + len;
        }
        {
            let p = cur.node_mut(&anchor);
            if p.role == NodeRole::Planet {
                p.role = NodeRole::PlanetWithMoons;
            }
            p.moons.push(id.clone());
        }
        if let Some(e) = cur.edges.get_mut(&key_between(id, &anchor)) {
            e.moon_edge = true;
        }
    }
}
