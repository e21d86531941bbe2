use rand::SeedableRng;
use rand::rngs::StdRng;
use selkie::attributes::{EdgeAttributes, Level, NodeAttributes, NodeRole};
use selkie::galaxy;
use selkie::model::LayoutOptions;
use selkie::util::key_between;

fn level_from(edges: &[(&str, &str)]) -> Level {
    let mut level = Level::default();
    for (v, w) in edges {
        level.graph.set_edge(*v, *w);
        level.edges.insert(
            key_between(v, w),
            EdgeAttributes {
                length: 100.0,
                ..Default::default()
            },
        );
    }
    for id in level.graph.node_ids() {
        level.nodes.insert(id, NodeAttributes::default());
    }
    level
}

/// 6x6 grid graph: big enough to coarsen at least once.
fn grid_level() -> Level {
    let mut edges = Vec::new();
    let names: Vec<Vec<String>> = (0..6)
        .map(|r| (0..6).map(|c| format!("g{r}_{c}")).collect())
        .collect();
    for r in 0..6 {
        for c in 0..6 {
            if c + 1 < 6 {
                edges.push((names[r][c].clone(), names[r][c + 1].clone()));
            }
            if r + 1 < 6 {
                edges.push((names[r][c].clone(), names[r + 1][c].clone()));
            }
        }
    }
    let borrowed: Vec<(&str, &str)> = edges.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
    level_from(&borrowed)
}

#[test]
fn hierarchy_shrinks_to_the_node_floor() {
    let options = LayoutOptions {
        min_graph_size: 3,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(17);
    let levels = galaxy::build_hierarchy(&options, grid_level(), &mut rng);

    assert!(levels.len() >= 2, "a 36-node grid must coarsen");
    for pair in levels.windows(2) {
        assert!(pair[1].graph.node_count() < pair[0].graph.node_count());
    }
}

#[test]
fn every_partitioned_node_has_a_dedicated_sun_and_role() {
    let options = LayoutOptions::default();
    let mut rng = StdRng::seed_from_u64(23);
    let levels = galaxy::build_hierarchy(&options, grid_level(), &mut rng);

    // All levels except the last were partitioned into solar systems.
    for level in &levels[..levels.len() - 1] {
        for id in level.graph.node_ids() {
            let a = level.node(&id);
            assert_ne!(a.role, NodeRole::Unspecified, "node {id} kept no role");
            let sun = a.dedicated_sun.as_ref().expect("dedicated sun");
            assert_eq!(level.node(sun).role, NodeRole::Sun);
            if a.role == NodeRole::Sun {
                assert_eq!(sun, &id);
                assert_eq!(a.dist_to_sun, 0.0);
            } else {
                assert!(a.dist_to_sun > 0.0);
            }
        }
    }
}

#[test]
fn hierarchy_links_pair_up_across_adjacent_levels() {
    let options = LayoutOptions::default();
    let mut rng = StdRng::seed_from_u64(29);
    let levels = galaxy::build_hierarchy(&options, grid_level(), &mut rng);

    for pair in levels.windows(2) {
        let (finer, coarser) = (&pair[0], &pair[1]);
        for id in coarser.graph.node_ids() {
            let lower = coarser
                .node(&id)
                .lower_level_node
                .as_ref()
                .expect("collapsed nodes remember their sun")
                .clone();
            assert_eq!(finer.node(&lower).role, NodeRole::Sun);
            assert_eq!(finer.node(&lower).higher_level_node.as_deref(), Some(id.as_str()));
        }
    }
}

#[test]
fn rewired_edges_link_to_their_collapsed_counterpart() {
    let options = LayoutOptions::default();
    let mut rng = StdRng::seed_from_u64(43);
    let levels = galaxy::build_hierarchy(&options, grid_level(), &mut rng);

    for pair in levels.windows(2) {
        let (finer, coarser) = (&pair[0], &pair[1]);
        for key in finer.graph.edge_keys() {
            match &finer.edge(&key).higher_level_edge {
                Some(h) => {
                    // The link names a real coarser edge with attributes.
                    assert!(coarser.graph.has_edge(&h.v, &h.w, None), "dangling {h:?}");
                    assert!(coarser.edges.contains_key(h));
                }
                None => {
                    // Unlinked edges collapsed inside a single system.
                    assert_eq!(
                        finer.node(&key.v).dedicated_sun,
                        finer.node(&key.w).dedicated_sun
                    );
                }
            }
        }
    }
}

#[test]
fn mass_is_conserved_across_levels() {
    let options = LayoutOptions::default();
    let mut rng = StdRng::seed_from_u64(31);
    let levels = galaxy::build_hierarchy(&options, grid_level(), &mut rng);

    for level in &levels {
        let total: u32 = level
            .graph
            .node_ids()
            .iter()
            .map(|id| level.node(id).mass)
            .sum();
        assert_eq!(total, 36, "every level accounts for all original nodes");
    }
}

#[test]
fn coarser_edges_are_simple_and_carry_positive_lengths() {
    let options = LayoutOptions::default();
    let mut rng = StdRng::seed_from_u64(37);
    let levels = galaxy::build_hierarchy(&options, grid_level(), &mut rng);

    for level in &levels[1..] {
        assert!(level.graph.is_simple());
        for key in level.graph.edge_keys() {
            let e = level.edge(&key);
            // Rewired paths are at least sun-planet + edge + planet-sun long.
            assert!(e.length >= 100.0);
            assert!(e.extra_edge);
        }
    }
}

#[test]
fn moons_attach_to_their_nearest_planet() {
    let options = LayoutOptions::default();
    let mut rng = StdRng::seed_from_u64(41);
    let levels = galaxy::build_hierarchy(&options, grid_level(), &mut rng);

    for level in &levels[..levels.len() - 1] {
        for id in level.graph.node_ids() {
            if level.node(&id).role != NodeRole::Moon {
                continue;
            }
            // A moon's planet lists it, and the moon edge is flagged.
            let planet = level
                .graph
                .neighbors(&id)
                .iter()
                .map(|s| s.to_string())
                .find(|nb| level.node(nb).moons.contains(&id));
            let planet = planet.expect("moon has an owning planet neighbor");
            assert_eq!(level.node(&planet).role, NodeRole::PlanetWithMoons);
            assert!(level.edge(&key_between(&id, &planet)).moon_edge);
        }
    }
}
