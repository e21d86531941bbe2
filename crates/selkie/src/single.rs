//! Single-component layout entry point.
//!
//! Requires a simple, connected graph (the multi-component orchestrator in
//! `components` enforces this for arbitrary input). Tiny graphs and pure
//! chains/cycles are placed directly; everything else goes through the full
//! coarsen → seed → project/simulate → post-process pipeline.

use crate::attributes::{EdgeAttributes, Level, NodeAttributes};
use crate::error::{Error, Result};
use crate::force::{self, SolverParams};
use crate::model::{EdgeLabel, LayoutOptions, NodeLabel, Point, Rect};
use crate::util::{bounding_rect, key_between};
use crate::{fastpath, galaxy, placement, postprocess};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use selkie_graphlib::{Graph, alg};
use tracing::debug;

pub fn layout(options: &LayoutOptions, g: &mut Graph<NodeLabel, EdgeLabel, ()>) -> Result<Rect> {
    if g.node_count() == 0 {
        return Ok(Rect::default());
    }
    if !g.is_simple() {
        return Err(Error::GraphNotSimple);
    }
    if !alg::is_connected(g) {
        return Err(Error::GraphNotConnected);
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    layout_connected(options, g, &mut rng)
}

/// Preconditions already checked; used directly by the orchestrator so
/// component seeds stay under its control.
pub(crate) fn layout_connected(
    options: &LayoutOptions,
    g: &mut Graph<NodeLabel, EdgeLabel, ()>,
    rng: &mut StdRng,
) -> Result<Rect> {
    let ids = g.node_ids();

    if ids.len() == 1 {
        g.node_mut(&ids[0]).unwrap().set_position(Point::ZERO);
        return Ok(finish(g));
    }
    if ids.len() == 2 {
        let ideal = g
            .edge(&ids[0], &ids[1], None)
            .map(|e| e.length)
            .unwrap_or(1.0)
            * options.unit_edge_length;
        g.node_mut(&ids[0]).unwrap().set_position(Point::ZERO);
        g.node_mut(&ids[1]).unwrap().set_position(Point::new(ideal, 0.0));
        return Ok(finish(g));
    }

    let mut base = build_base_level(options, g);

    if options.chain_cycle_fastpath && fastpath::try_direct(&mut base, rng) {
        debug!(nodes = ids.len(), "placed by chain/cycle fast path");
        write_back(g, &base);
        return Ok(finish(g));
    }

    let mut levels = galaxy::build_hierarchy(options, base, rng);
    debug!(levels = levels.len(), nodes = ids.len(), "hierarchy built");

    let gross = SolverParams::gross(options);
    let mut upper = levels.pop().expect("hierarchy has at least one level");
    placement::place_coarsest(&mut upper, options, rng);
    force::run(&mut upper, options, &gross, rng);

    // Finer levels consume the level above and then replace it, so each
    // level's graph and attributes are dropped as soon as placement below is
    // done.
    while let Some(mut lower) = levels.pop() {
        placement::project_down(&upper, &mut lower, options, rng);
        force::run(&mut lower, options, &gross, rng);
        upper = lower;
    }

    force::run(&mut upper, options, &SolverParams::fine_one(options), rng);
    force::run(&mut upper, options, &SolverParams::fine_two(options), rng);
    if options.rescale_to_ideal {
        force::rescale_to_ideal(&mut upper, options.unit_edge_length);
    }

    if options.untwist_splits {
        postprocess::untwist_splits(&mut upper);
    }
    if options.smoothing_rounds > 0 {
        postprocess::smooth_degree_two(&mut upper, options.smoothing_rounds, rng);
    }

    write_back(g, &upper);
    Ok(finish(g))
}

/// Level 0: topology copy plus fresh attribute containers seeded from the
/// labels. Ideal edge lengths get the unit length applied here, once.
fn build_base_level(options: &LayoutOptions, g: &Graph<NodeLabel, EdgeLabel, ()>) -> Level {
    let mut level = Level::default();
    g.for_each_node(|id, label| {
        level.graph.ensure_node(id);
        level.nodes.insert(
            id.to_string(),
            NodeAttributes {
                position: label.position().unwrap_or(Point::ZERO),
                width: label.width,
                height: label.height,
                ..Default::default()
            },
        );
    });
    g.for_each_edge(|key, label| {
        level.graph.set_edge(key.v.clone(), key.w.clone());
        level.edges.insert(
            key_between(&key.v, &key.w),
            EdgeAttributes {
                length: label.length * options.unit_edge_length,
                ..Default::default()
            },
        );
    });
    level
}

fn write_back(g: &mut Graph<NodeLabel, EdgeLabel, ()>, level: &Level) {
    for id in g.node_ids() {
        let p = level.node(&id).position;
        g.node_mut(&id).unwrap().set_position(p);
    }
}

fn finish(g: &Graph<NodeLabel, EdgeLabel, ()>) -> Rect {
    let points: Vec<Point> = g
        .node_ids()
        .iter()
        .filter_map(|id| g.node(id).and_then(|n| n.position()))
        .collect();
    bounding_rect(points.iter())
}

// Derive a fresh seed when the caller didn't pin one.
pub(crate) fn entropy_seed() -> u64 {
    StdRng::from_entropy().next_u64()
}
