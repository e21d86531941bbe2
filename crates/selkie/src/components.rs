//! Multi-component orchestration: accept any graph, simplify it, lay out each
//! connected component in parallel, and pack the results into rows.

use crate::error::{Error, Result};
use crate::model::{EdgeLabel, LayoutOptions, NodeLabel, PackingOptions, Point, Rect};
use crate::numeric::MIN_DISTANCE;
use crate::single;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use selkie_graphlib::{Graph, GraphOptions, alg};
use std::collections::BTreeMap;
use tracing::debug;

type LayoutGraph = Graph<NodeLabel, EdgeLabel, ()>;

/// Simplified isomorphic copy: parallel edges collapse to one edge with the
/// mean length multiplier, self-loops drop. Node ids carry over unchanged,
/// so the correspondence to the input is the identity.
pub fn simplify(g: &LayoutGraph) -> LayoutGraph {
    let mut out: LayoutGraph = Graph::new(GraphOptions {
        multigraph: false,
        directed: false,
    });
    for id in g.node_ids() {
        if let Some(label) = g.node(&id) {
            out.set_node(id, label.clone());
        }
    }

    let mut merged: BTreeMap<(String, String), (f64, usize)> = BTreeMap::new();
    g.for_each_edge(|key, label| {
        if key.is_self_loop() {
            return;
        }
        let (a, b) = if key.v <= key.w {
            (key.v.clone(), key.w.clone())
        } else {
            (key.w.clone(), key.v.clone())
        };
        let slot = merged.entry((a, b)).or_insert((0.0, 0));
        slot.0 += label.length;
        slot.1 += 1;
    });
    for ((v, w), (sum, count)) in merged {
        out.set_edge_with_label(
            v,
            w,
            EdgeLabel {
                length: sum / count as f64,
            },
        );
    }
    out
}

/// Lay out an arbitrary graph. Connected input delegates straight to the
/// single-component pipeline; otherwise components are laid out concurrently
/// (one task each, derived seeds) and their bounding rectangles packed into
/// rows. The first component failure wins; in-flight siblings finish but
/// their results are discarded.
pub fn layout_components(
    options: &LayoutOptions,
    packing: &PackingOptions,
    g: &mut LayoutGraph,
) -> Result<Rect> {
    if g.node_count() == 0 {
        return Ok(Rect::default());
    }

    let simple = simplify(g);
    let comps = alg::components(&simple);
    let base_seed = options.seed.unwrap_or_else(single::entropy_seed);

    if comps.len() == 1 {
        let mut sub = simple;
        let mut opts = options.clone();
        opts.seed = Some(base_seed);
        let rect = crate::layout(&opts, &mut sub)?;
        copy_positions(&sub, g);
        return Ok(rect);
    }
    debug!(components = comps.len(), "laying out disconnected graph");

    let subs: Vec<LayoutGraph> = comps.iter().map(|ids| subgraph(&simple, ids)).collect();
    let results: Vec<Result<(LayoutGraph, Rect)>> = subs
        .into_par_iter()
        .enumerate()
        .map(|(i, mut sub)| {
            let mut opts = options.clone();
            opts.seed = Some(base_seed.wrapping_add(i as u64));
            match crate::layout(&opts, &mut sub) {
                Ok(rect) => Ok((sub, rect)),
                Err(e) => Err(Error::Component {
                    index: i,
                    source: Box::new(e),
                }),
            }
        })
        .collect();

    let mut laid: Vec<(LayoutGraph, Rect)> = Vec::with_capacity(results.len());
    for r in results {
        laid.push(r?);
    }

    let overall = pack_rows(packing, &mut laid);
    for (sub, _) in &laid {
        copy_positions(sub, g);
    }
    Ok(overall)
}

fn subgraph(g: &LayoutGraph, ids: &[String]) -> LayoutGraph {
    let keep: FxHashSet<&str> = ids.iter().map(|s| s.as_str()).collect();
    let mut out: LayoutGraph = Graph::new(g.options());
    for id in ids {
        if let Some(label) = g.node(id) {
            out.set_node(id.clone(), label.clone());
        }
    }
    g.for_each_edge(|key, label| {
        if keep.contains(key.v.as_str()) && keep.contains(key.w.as_str()) {
            out.set_edge_with_label(key.v.clone(), key.w.clone(), label.clone());
        }
    });
    out
}

fn copy_positions(from: &LayoutGraph, to: &mut LayoutGraph) {
    for id in from.node_ids() {
        let src = from.node(&id).and_then(|n| n.position());
        if let (Some(p), Some(dst)) = (src, to.node_mut(&id)) {
            dst.set_position(p);
        }
    }
}

/// Sort components by decreasing area, scale everything so the largest
/// component spans `max_width`, then fill rows greedily left to right,
/// wrapping when the running width would exceed `max_line_width`.
fn pack_rows(packing: &PackingOptions, laid: &mut [(LayoutGraph, Rect)]) -> Rect {
    let mut order: Vec<usize> = (0..laid.len()).collect();
    order.sort_by(|&a, &b| {
        let area_a = laid[a].1.width * laid[a].1.height;
        let area_b = laid[b].1.width * laid[b].1.height;
        area_b.partial_cmp(&area_a).unwrap().then(a.cmp(&b))
    });

    let first_width = laid[order[0]].1.width;
    let factor = if first_width > MIN_DISTANCE {
        packing.max_width / first_width
    } else {
        1.0
    };
    for (sub, rect) in laid.iter_mut() {
        sub.for_each_node_mut(|_, label| {
            if let Some(p) = label.position() {
                label.set_position(p * factor);
            }
        });
        *rect = Rect::new(
            rect.x * factor,
            rect.y * factor,
            rect.width * factor,
            rect.height * factor,
        );
    }

    let mut x = 0.0;
    let mut y = 0.0;
    let mut row_height = 0.0_f64;
    let mut overall: Option<Rect> = None;
    for &i in &order {
        let (sub, rect) = &mut laid[i];
        if x > 0.0 && x + rect.width > packing.max_line_width {
            x = 0.0;
            y += row_height + packing.gap;
            row_height = 0.0;
        }
        let shift = Point::new(x - rect.x, y - rect.y);
        sub.for_each_node_mut(|_, label| {
            if let Some(p) = label.position() {
                label.set_position(p + shift);
            }
        });
        *rect = Rect::new(x, y, rect.width, rect.height);
        overall = Some(match overall {
            Some(o) => o.union(rect),
            None => *rect,
        });
        x += rect.width + packing.gap;
        row_height = row_height.max(rect.height);
    }

    overall.unwrap_or_default()
}
