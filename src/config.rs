use serde::{Deserialize, Serialize};

pub const DEFAULT_ACCURACY: f64 = 1e-6;
pub const DEFAULT_TOLERANCE: f64 = 1e-9;
pub const DEFAULT_ARC_POINTS: usize = 150;
pub const DEFAULT_COLLINEAR_EPSILON: f64 = 1e-11;
/// Upper bound on positions sampled for one arc under a max-error criterion.
pub const MAX_ARC_POINTS: usize = 1 << 20;

/// Numeric thresholds shared by construction, predicates and linearization.
///
/// Nothing in the crate reads these from global state: every operation that
/// needs a threshold takes the value (or the whole config) as an argument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Distance below which two positions are considered equal.
    pub accuracy: f64,
    /// Distance used by the spatial predicates.
    pub tolerance: f64,
    /// Number of positions sampled when linearizing an arc.
    pub arc_points: usize,
    /// Signed-area threshold below which three positions are collinear.
    pub collinear_epsilon: f64,
    /// Whether geographic EPSG:4326 input carries latitude first.
    pub switch_axes: bool,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        GeometryConfig {
            accuracy: DEFAULT_ACCURACY,
            tolerance: DEFAULT_TOLERANCE,
            arc_points: DEFAULT_ARC_POINTS,
            collinear_epsilon: DEFAULT_COLLINEAR_EPSILON,
            switch_axes: false,
        }
    }
}

impl GeometryConfig {
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_arc_points(mut self, arc_points: usize) -> Self {
        self.arc_points = arc_points;
        self
    }
}
