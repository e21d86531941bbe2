//! Connectivity helpers shared by layout passes.

use super::Graph;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// Connected components in deterministic order: components are ordered by
/// their first node's insertion position, and nodes inside a component in
/// BFS-from-that-node order.
pub fn components<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut seen: FxHashMap<String, ()> = FxHashMap::default();
    let mut out: Vec<Vec<String>> = Vec::new();

    for start in g.node_ids() {
        if seen.insert(start.clone(), ()).is_some() {
            continue;
        }
        let mut comp: Vec<String> = Vec::new();
        let mut q: VecDeque<String> = VecDeque::new();
        q.push_back(start);
        while let Some(v) = q.pop_front() {
            for n in g.neighbors(&v) {
                if seen.insert(n.to_string(), ()).is_none() {
                    q.push_back(n.to_string());
                }
            }
            comp.push(v);
        }
        out.push(comp);
    }

    out
}

/// Node id -> component index, matching the order returned by [`components`].
pub fn component_map<N, E, G>(g: &Graph<N, E, G>) -> FxHashMap<String, usize>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut map = FxHashMap::default();
    for (i, comp) in components(g).into_iter().enumerate() {
        for v in comp {
            map.insert(v, i);
        }
    }
    map
}

/// A graph with zero or one node counts as connected.
pub fn is_connected<N, E, G>(g: &Graph<N, E, G>) -> bool
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    g.node_count() <= 1 || components(g).len() == 1
}
