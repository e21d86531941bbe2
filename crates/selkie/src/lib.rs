//! Multilevel force-directed graph layout.
//!
//! Given a simple graph with optional per-edge target lengths, `selkie`
//! computes a 2D position for every node so that edge lengths approximate
//! their ideal lengths. The engine coarsens the graph into a hierarchy of
//! "galaxies" (sun/planet/moon clusters), seeds coordinates at the coarsest
//! level, then projects and refines them level by level with an iterative
//! force simulation. Results are reproducible for a fixed seed.
//!
//! [`layout`] handles a single connected component; [`layout_components`]
//! accepts any graph, simplifying and splitting it first and packing the
//! per-component results into rows.
//!
//! ```no_run
//! use selkie::graphlib::{Graph, GraphOptions};
//! use selkie::{EdgeLabel, LayoutOptions, NodeLabel, layout};
//!
//! let mut g: Graph<NodeLabel, EdgeLabel, ()> = Graph::new(GraphOptions::default());
//! g.set_default_edge_label(EdgeLabel::default);
//! g.set_node("a", NodeLabel::default());
//! g.set_node("b", NodeLabel::default());
//! g.set_edge("a", "b");
//!
//! let options = LayoutOptions {
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let bounds = layout(&options, &mut g).unwrap();
//! let a = g.node("a").unwrap();
//! println!("a at ({:?}, {:?}) inside {bounds:?}", a.x, a.y);
//! ```

pub use selkie_graphlib as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod attributes;
pub mod components;
pub mod error;
pub mod fastpath;
pub mod force;
pub mod galaxy;
pub mod layout_box;
pub mod model;
pub mod numeric;
pub mod placement;
pub mod postprocess;
pub mod random_set;
pub mod single;
pub mod util;

pub use components::{layout_components, simplify};
pub use error::{Error, Result};
pub use force::{MAX_ITERATIONS, OSCILLATION_FACTORS, dampen};
pub use model::{
    EdgeLabel, ForceModel, GalaxyChoice, InitialPlacement, LayoutOptions, NodeLabel,
    PackingOptions, Point, Rect, RepulsionMode, StopCriterion,
};
pub use single::layout;
