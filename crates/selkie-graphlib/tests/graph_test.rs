use selkie_graphlib::{EdgeKey, Graph, GraphOptions};

type G = Graph<u32, f64, ()>;

fn undirected() -> G {
    Graph::new(GraphOptions {
        multigraph: false,
        directed: false,
    })
}

#[test]
fn nodes_iterate_in_insertion_order() {
    let mut g = undirected();
    g.set_node("b", 1);
    g.set_node("a", 2);
    g.set_node("c", 3);
    let ids: Vec<&str> = g.nodes().collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
    assert_eq!(g.node_count(), 3);
}

#[test]
fn setting_a_node_twice_updates_the_label_in_place() {
    let mut g = undirected();
    g.set_node("a", 1);
    g.set_node("a", 9);
    assert_eq!(g.node("a"), Some(&9));
    assert_eq!(g.node_count(), 1);
}

#[test]
fn undirected_edges_are_reachable_from_both_directions() {
    let mut g = undirected();
    g.set_edge_with_label("b", "a", 2.5);
    assert!(g.has_edge("a", "b", None));
    assert!(g.has_edge("b", "a", None));
    assert_eq!(g.edge("a", "b", None), Some(&2.5));
    assert_eq!(g.edge("b", "a", None), Some(&2.5));
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn set_edge_creates_missing_endpoints_with_defaults() {
    let mut g = undirected();
    g.set_edge("x", "y");
    assert!(g.has_node("x"));
    assert!(g.has_node("y"));
    assert_eq!(g.node("x"), Some(&0));
}

#[test]
fn neighbors_follow_first_seen_edge_order() {
    let mut g = undirected();
    g.set_edge("a", "c");
    g.set_edge("a", "b");
    g.set_edge("d", "a");
    assert_eq!(g.neighbors("a"), vec!["c", "b", "d"]);
    assert_eq!(g.degree("a"), 3);
}

#[test]
fn node_edges_report_incident_keys() {
    let mut g = undirected();
    g.set_edge("a", "b");
    g.set_edge("b", "c");
    g.set_edge("c", "a");
    let keys = g.node_edges("b");
    assert_eq!(keys.len(), 2);
    for key in &keys {
        assert!(key.opposite("b").is_some());
    }
}

#[test]
fn opposite_endpoint_resolves_both_sides() {
    let key = EdgeKey::new("a", "b", None::<String>);
    assert_eq!(key.opposite("a"), Some("b"));
    assert_eq!(key.opposite("b"), Some("a"));
    assert_eq!(key.opposite("z"), None);
}

#[test]
fn removing_a_node_removes_incident_edges() {
    let mut g = undirected();
    g.set_path(&["a", "b", "c"]);
    assert!(g.remove_node("b"));
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 0);
    assert!(g.neighbors("a").is_empty());
}

#[test]
fn simplicity_detects_self_loops_and_parallels() {
    let mut g = undirected();
    g.set_edge("a", "b");
    assert!(g.is_simple());
    g.set_edge("a", "a");
    assert!(!g.is_simple());

    let mut m: G = Graph::new(GraphOptions {
        multigraph: true,
        directed: false,
    });
    m.set_edge_with_label("a", "b", 1.0);
    assert!(m.is_simple());
    m.set_edge_named("b", "a", "dup", 2.0);
    assert!(!m.is_simple());
}

#[test]
fn multigraph_keeps_named_parallel_edges_distinct() {
    let mut m: G = Graph::new(GraphOptions {
        multigraph: true,
        directed: false,
    });
    m.set_edge_with_label("a", "b", 1.0);
    m.set_edge_named("a", "b", "second", 2.0);
    assert_eq!(m.edge_count(), 2);
    assert_eq!(m.edge("a", "b", Some("second")), Some(&2.0));
    assert_eq!(m.degree("a"), 2);
}
