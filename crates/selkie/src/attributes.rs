//! Per-level simulation state.
//!
//! Each coarsening level owns its graph plus one attribute container per
//! node/edge. Cross-level links (`lower_level_node` / `higher_level_node`)
//! are plain identifiers valid only in the neighboring level's container,
//! never references, so levels can be dropped independently as placement
//! walks back down the hierarchy.

use crate::model::Point;
use rustc_hash::FxHashMap;
use selkie_graphlib::{EdgeKey, Graph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeRole {
    #[default]
    Unspecified,
    Sun,
    Planet,
    PlanetWithMoons,
    Moon,
}

/// An inter-system neighbor sun together with the fraction of the collapsed
/// path at which this node sits (used to interpolate an initial position).
#[derive(Debug, Clone)]
pub struct SunNeighbor {
    pub sun: String,
    pub lambda: f64,
}

#[derive(Debug, Clone)]
pub struct NodeAttributes {
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Number of original nodes collapsed into this one.
    pub mass: u32,
    pub role: NodeRole,

    /// Sun this node was collapsed from, one level down.
    pub lower_level_node: Option<String>,
    /// Node this sun collapses into, one level up. Set only on suns.
    pub higher_level_node: Option<String>,

    pub dedicated_sun: Option<String>,
    pub dist_to_sun: f64,
    pub neighbor_suns: Vec<SunNeighbor>,
    pub moons: Vec<String>,

    pub placed: bool,
    /// Angular placement sector `[start, end)` around the dedicated sun.
    pub sector: Option<(f64, f64)>,
}

impl Default for NodeAttributes {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            width: 0.0,
            height: 0.0,
            mass: 1,
            role: NodeRole::Unspecified,
            lower_level_node: None,
            higher_level_node: None,
            dedicated_sun: None,
            dist_to_sun: 0.0,
            neighbor_suns: Vec::new(),
            moons: Vec::new(),
            placed: false,
            sector: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EdgeAttributes {
    /// Ideal length in layout units (unit edge length already applied).
    pub length: f64,
    /// The collapsed counterpart one level up, for inter-system edges. Kept
    /// so the hierarchy is traversable from either side; the placement passes
    /// currently read the coarser level directly (`extra_edge`,
    /// `neighbor_suns`) rather than following this link upward.
    pub higher_level_edge: Option<EdgeKey>,
    /// Attaches a moon to its planet.
    pub moon_edge: bool,
    /// Participates in the angle fan that bounds placement sectors.
    pub extra_edge: bool,
}

impl Default for EdgeAttributes {
    fn default() -> Self {
        Self {
            length: 1.0,
            higher_level_edge: None,
            moon_edge: false,
            extra_edge: false,
        }
    }
}

/// One coarsening level: a topology plus its attribute containers. Index 0 is
/// the original graph; higher indices are coarser.
#[derive(Debug, Default)]
pub struct Level {
    pub graph: Graph<(), (), ()>,
    pub nodes: FxHashMap<String, NodeAttributes>,
    pub edges: FxHashMap<EdgeKey, EdgeAttributes>,
}

impl Level {
    pub fn node(&self, id: &str) -> &NodeAttributes {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: &str) -> &mut NodeAttributes {
        self.nodes.get_mut(id).expect("attribute for known node")
    }

    pub fn edge(&self, key: &EdgeKey) -> &EdgeAttributes {
        &self.edges[key]
    }

    /// Ideal length of the edge between `v` and `w`.
    pub fn edge_length(&self, v: &str, w: &str) -> f64 {
        let key = if v <= w {
            EdgeKey::new(v, w, None::<String>)
        } else {
            EdgeKey::new(w, v, None::<String>)
        };
        self.edges.get(&key).map(|e| e.length).unwrap_or(1.0)
    }
}
