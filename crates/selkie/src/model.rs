//! Geometry primitives, graph labels, and the layout option set.
//!
//! Labels are intentionally lightweight and `Clone`-friendly; the engine
//! writes results back into `NodeLabel::x`/`y`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (other - self).norm()
    }

    /// Angle of the vector in `[0, 2π)`.
    pub fn angle(self) -> f64 {
        let a = self.y.atan2(self.x);
        if a < 0.0 {
            a + std::f64::consts::TAU
        } else {
            a
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.top()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.top().max(other.top()) - y,
        )
    }
}

/// Per-node input/output label. `width`/`height` act as a radius proxy for
/// minimum separation; `x`/`y` are read when the initial-placement policy is
/// `KeepPositions` and always written on success.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl NodeLabel {
    pub fn position(&self) -> Option<Point> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }

    pub fn set_position(&mut self, p: Point) {
        self.x = Some(p.x);
        self.y = Some(p.y);
    }
}

/// Per-edge input label. `length` is a multiplier on
/// [`LayoutOptions::unit_edge_length`]; the product is the edge's ideal length.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub length: f64,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self { length: 1.0 }
    }
}

/// Attractive-force model applied along each edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForceModel {
    /// `d² / ℓ³` (Fruchterman–Reingold).
    FruchtermanReingold,
    /// `log₂(d / ℓ)` (Eades).
    Eades,
    /// `log₂(d / ℓ) · d² / ℓ³`, blending the two above.
    #[default]
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepulsionMode {
    /// O(n²) pairwise repulsion.
    Exact,
    /// Bucket nodes into a `√n / quotient`-sided grid and restrict repulsion
    /// to same- and adjacent-cell pairs. Falls back to `Exact` when the grid
    /// degenerates.
    #[default]
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StopCriterion {
    FixedIterations,
    Threshold,
    #[default]
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InitialPlacement {
    /// Trust positions already present on the labels.
    KeepPositions,
    /// Evenly spaced grid.
    UniformGrid,
    #[default]
    Random,
}

/// How a sun is drawn from the candidate pool during coarsening. Mass-biased
/// policies take the extreme among `random_tries` samples, steering
/// coarsening toward sparse (`LowMass`) or dense (`HighMass`) regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GalaxyChoice {
    UniformRandom,
    #[default]
    LowMass,
    HighMass,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// RNG seed. `None` seeds from entropy; fix it for reproducible output.
    pub seed: Option<u64>,
    /// Base ideal edge length; per-edge `EdgeLabel::length` multiplies it.
    pub unit_edge_length: f64,

    pub force_model: ForceModel,
    pub repulsion: RepulsionMode,
    /// Divisor in the `√n / quotient` repulsion-grid side length.
    pub grid_quotient: usize,

    pub stop: StopCriterion,
    /// Iteration count for `FixedIterations` (and the cap for `Both`).
    pub fixed_iterations: usize,
    /// Mean-force threshold for `Threshold`/`Both`.
    pub force_threshold: f64,

    pub spring_strength: f64,
    pub repulsion_strength: f64,
    /// Multiplied into the temperature each iteration; 1.0 disables cooling.
    pub cooling_factor: f64,
    /// Scales the per-iteration displacement cap.
    pub max_displacement_factor: f64,
    /// Snap positions to integer lattice coordinates each iteration.
    pub snap_to_grid: bool,

    pub galaxy_choice: GalaxyChoice,
    /// Sample count for the mass-biased sun draw.
    pub random_tries: usize,
    /// Coarsening stops once a level has at most this many nodes.
    pub min_graph_size: usize,

    pub initial_placement: InitialPlacement,
    /// Place pure chains/cycles directly instead of simulating.
    pub chain_cycle_fastpath: bool,

    /// Iterations for each of the two finest-level fine-tuning passes.
    pub fine_tune_iterations: usize,
    pub fine_tune_spring: f64,
    pub fine_tune_repulsion: f64,
    /// Uniformly rescale so the realized average edge length matches the
    /// ideal average.
    pub rescale_to_ideal: bool,

    /// Random-restart rounds of degree-2 smoothing; 0 disables.
    pub smoothing_rounds: usize,
    pub untwist_splits: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            seed: None,
            unit_edge_length: 100.0,
            force_model: ForceModel::default(),
            repulsion: RepulsionMode::default(),
            grid_quotient: 2,
            stop: StopCriterion::default(),
            fixed_iterations: 30,
            force_threshold: 0.01,
            spring_strength: 1.0,
            repulsion_strength: 1.0,
            cooling_factor: 0.99,
            max_displacement_factor: 10.0,
            snap_to_grid: false,
            galaxy_choice: GalaxyChoice::default(),
            random_tries: 20,
            min_graph_size: 3,
            initial_placement: InitialPlacement::default(),
            chain_cycle_fastpath: true,
            fine_tune_iterations: 20,
            fine_tune_spring: 2.0,
            fine_tune_repulsion: 0.2,
            rescale_to_ideal: true,
            smoothing_rounds: 2,
            untwist_splits: true,
        }
    }
}

/// Row packing parameters for the multi-component entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingOptions {
    /// The largest component is scaled to this width; the same scale applies
    /// to every component.
    pub max_width: f64,
    /// A row wraps once its running width would exceed this.
    pub max_line_width: f64,
    /// Horizontal and vertical spacing between packed components.
    pub gap: f64,
}

impl Default for PackingOptions {
    fn default() -> Self {
        Self {
            max_width: 800.0,
            max_line_width: 1600.0,
            gap: 30.0,
        }
    }
}
