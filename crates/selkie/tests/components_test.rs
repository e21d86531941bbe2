use selkie::graphlib::{Graph, GraphOptions};
use selkie::{
    EdgeLabel, LayoutOptions, NodeLabel, PackingOptions, Point, Rect, layout_components, simplify,
};

type G = Graph<NodeLabel, EdgeLabel, ()>;

fn new_graph(multigraph: bool) -> G {
    let mut g: G = Graph::new(GraphOptions {
        multigraph,
        directed: false,
    });
    g.set_default_node_label(NodeLabel::default);
    g.set_default_edge_label(EdgeLabel::default);
    g
}

fn seeded(seed: u64) -> LayoutOptions {
    LayoutOptions {
        seed: Some(seed),
        ..Default::default()
    }
}

/// Path of 5 nodes and a triangle: component sizes {5, 3}.
fn five_and_three() -> G {
    let mut g = new_graph(false);
    g.set_path(&["p0", "p1", "p2", "p3", "p4"]);
    g.set_path(&["t0", "t1", "t2", "t0"]);
    g
}

fn component_rect(g: &G, ids: &[&str]) -> Rect {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for id in ids {
        let p = g.node(id).unwrap().position().unwrap();
        min = Point::new(min.x.min(p.x), min.y.min(p.y));
        max = Point::new(max.x.max(p.x), max.y.max(p.y));
    }
    Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
}

fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && b.x < a.right() && a.y < b.top() && b.y < a.top()
}

#[test]
fn simplifier_merges_parallels_and_drops_self_loops() {
    let mut g = new_graph(true);
    g.set_edge_with_label("a", "b", EdgeLabel { length: 1.0 });
    g.set_edge_named("a", "b", "dup", EdgeLabel { length: 3.0 });
    g.set_edge_with_label("b", "c", EdgeLabel { length: 1.0 });
    g.set_edge_with_label("a", "a", EdgeLabel { length: 1.0 });

    let simple = simplify(&g);
    assert!(simple.is_simple());
    assert_eq!(simple.node_count(), 3);
    assert_eq!(simple.edge_count(), 2);
    // Parallel lengths merge by averaging.
    assert_eq!(simple.edge("a", "b", None).unwrap().length, 2.0);
}

#[test]
fn simplifying_twice_is_idempotent() {
    let mut g = new_graph(false);
    g.set_path(&["a", "b", "c", "d"]);
    let once = simplify(&g);
    let twice = simplify(&once);
    assert_eq!(once.node_count(), twice.node_count());
    assert_eq!(once.edge_count(), twice.edge_count());
    assert_eq!(g.node_count(), twice.node_count());
    assert_eq!(g.edge_count(), twice.edge_count());
}

#[test]
fn disconnected_components_pack_without_overlap() {
    let mut g = five_and_three();
    let packing = PackingOptions {
        max_width: 300.0,
        max_line_width: 5000.0,
        gap: 30.0,
    };
    layout_components(&seeded(11), &packing, &mut g).unwrap();

    // Every one of the 8 nodes received a position.
    assert_eq!(g.node_count(), 8);
    for id in g.node_ids() {
        assert!(g.node(&id).unwrap().position().unwrap().is_finite());
    }

    let path_rect = component_rect(&g, &["p0", "p1", "p2", "p3", "p4"]);
    let tri_rect = component_rect(&g, &["t0", "t1", "t2"]);
    assert!(
        !overlaps(&path_rect, &tri_rect),
        "components overlap: {path_rect:?} vs {tri_rect:?}"
    );

    // Same row: packed left-to-right with at least the configured gap.
    let (left, right) = if path_rect.x < tri_rect.x {
        (&path_rect, &tri_rect)
    } else {
        (&tri_rect, &path_rect)
    };
    assert!(right.x - left.right() >= packing.gap - 1e-6);
}

#[test]
fn narrow_lines_wrap_components_into_rows() {
    let mut g = five_and_three();
    let packing = PackingOptions {
        max_width: 300.0,
        max_line_width: 320.0,
        gap: 30.0,
    };
    layout_components(&seeded(11), &packing, &mut g).unwrap();

    let path_rect = component_rect(&g, &["p0", "p1", "p2", "p3", "p4"]);
    let tri_rect = component_rect(&g, &["t0", "t1", "t2"]);
    assert!(!overlaps(&path_rect, &tri_rect));
    // The second component wrapped below the first.
    let (top, bottom) = if path_rect.y < tri_rect.y {
        (&path_rect, &tri_rect)
    } else {
        (&tri_rect, &path_rect)
    };
    assert!(bottom.y >= top.top() + packing.gap - 1e-6);
}

#[test]
fn multi_component_runs_are_deterministic_for_a_fixed_seed() {
    let packing = PackingOptions::default();

    let collect = |g: &G| -> Vec<(String, f64, f64)> {
        g.node_ids()
            .into_iter()
            .map(|id| {
                let n = g.node(&id).unwrap();
                (id, n.x.unwrap(), n.y.unwrap())
            })
            .collect()
    };

    let mut g1 = five_and_three();
    let mut g2 = five_and_three();
    layout_components(&seeded(77), &packing, &mut g1).unwrap();
    layout_components(&seeded(77), &packing, &mut g2).unwrap();
    assert_eq!(collect(&g1), collect(&g2));
}

#[test]
fn connected_input_delegates_to_the_single_component_path() {
    let mut g = new_graph(false);
    g.set_path(&["a", "b", "c", "d", "e"]);
    let rect = layout_components(&seeded(5), &PackingOptions::default(), &mut g).unwrap();
    for id in g.node_ids() {
        let p = g.node(&id).unwrap().position().unwrap();
        assert!(rect.contains(p));
    }
}

#[test]
fn non_simple_connected_input_is_simplified_not_rejected() {
    let mut g = new_graph(true);
    g.set_edge_with_label("a", "b", EdgeLabel { length: 1.0 });
    g.set_edge_named("a", "b", "dup", EdgeLabel { length: 1.0 });
    g.set_edge_with_label("b", "c", EdgeLabel { length: 1.0 });
    g.set_edge_with_label("c", "c", EdgeLabel { length: 1.0 });

    layout_components(&seeded(2), &PackingOptions::default(), &mut g).unwrap();
    for id in g.node_ids() {
        assert!(g.node(&id).unwrap().position().unwrap().is_finite());
    }
}
