//! Approximation of circular arcs and circles by polylines.
//!
//! All fitting happens on positions shifted so that the bounding box of the
//! three control positions is centred on the origin. The first and last
//! sampled positions are always the exact control positions.

use crate::config::{GeometryConfig, DEFAULT_ARC_POINTS, DEFAULT_COLLINEAR_EPSILON, MAX_ARC_POINTS};
use crate::errors::{GeometryError, Result};
use crate::Position;
use log::debug;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// How many positions to sample per arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LinearizationCriterion {
    /// A fixed number of positions per arc.
    NumPoints(usize),
    /// As many positions as needed to keep the chord error below `error`,
    /// capped at `max_points` when that is non-zero.
    MaxError { error: f64, max_points: usize },
}

impl Default for LinearizationCriterion {
    fn default() -> Self {
        LinearizationCriterion::NumPoints(DEFAULT_ARC_POINTS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linearizer {
    criterion: LinearizationCriterion,
    collinear_epsilon: f64,
}

impl Default for Linearizer {
    fn default() -> Self {
        Linearizer::new(LinearizationCriterion::default())
    }
}

impl From<&GeometryConfig> for Linearizer {
    fn from(config: &GeometryConfig) -> Self {
        Linearizer {
            criterion: LinearizationCriterion::NumPoints(config.arc_points),
            collinear_epsilon: config.collinear_epsilon,
        }
    }
}

/// Three control positions moved next to the origin.
struct Shifted {
    offset: (f64, f64),
    points: [(f64, f64); 3],
}

impl Shifted {
    fn new(p0: &Position, p1: &Position, p2: &Position) -> Self {
        let min_x = p0.x.min(p1.x).min(p2.x);
        let max_x = p0.x.max(p1.x).max(p2.x);
        let min_y = p0.y.min(p1.y).min(p2.y);
        let max_y = p0.y.max(p1.y).max(p2.y);
        let offset = ((min_x + max_x) / 2., (min_y + max_y) / 2.);
        let shift = |p: &Position| (p.x - offset.0, p.y - offset.1);
        Shifted {
            offset,
            points: [shift(p0), shift(p1), shift(p2)],
        }
    }

    /// Signed area of the triangle, positive when counter-clockwise.
    fn signed_area(&self) -> f64 {
        let [a, b, c] = self.points;
        ((b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)) / 2.
    }

    fn circumcenter(&self) -> (f64, f64) {
        let [a, b, c] = self.points;
        let d = 2. * (a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1));
        let a2 = a.0 * a.0 + a.1 * a.1;
        let b2 = b.0 * b.0 + b.1 * b.1;
        let c2 = c.0 * c.0 + c.1 * c.1;
        (
            (a2 * (b.1 - c.1) + b2 * (c.1 - a.1) + c2 * (a.1 - b.1)) / d,
            (a2 * (c.0 - b.0) + b2 * (a.0 - c.0) + c2 * (b.0 - a.0)) / d,
        )
    }
}

/// The fitted circle through three positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Position,
    pub radius: f64,
    /// Direction of travel from the first through the second to the third
    /// position.
    pub clockwise: bool,
}

/// Fit the circle through three positions. Collinear input has none.
pub fn circumcircle(p0: &Position, p1: &Position, p2: &Position, epsilon: f64) -> Result<Circle> {
    let shifted = Shifted::new(p0, p1, p2);
    let area = shifted.signed_area();
    if area.abs() < epsilon {
        return Err(GeometryError::Collinear);
    }
    let (cx, cy) = shifted.circumcenter();
    let (ax, ay) = shifted.points[0];
    Ok(Circle {
        center: Position::new(cx + shifted.offset.0, cy + shifted.offset.1),
        radius: ((ax - cx).powi(2) + (ay - cy).powi(2)).sqrt(),
        clockwise: area < 0.,
    })
}

/// Angle swept travelling from `start` to `end` in the given direction,
/// in `(0, 2π]`.
fn sweep_angle(start: f64, end: f64, clockwise: bool) -> f64 {
    let delta = start - end;
    if clockwise {
        if delta <= 0. {
            delta + 2. * PI
        } else {
            delta
        }
    } else if delta < 0. {
        delta.abs()
    } else {
        2. * PI - delta
    }
}

/// Positions needed so that no chord strays further than `error` from an
/// arc of `radius` spanning `sweep` radians, never more than
/// [`MAX_ARC_POINTS`].
///
/// `error` must be positive and finite.
pub fn num_points_for_max_error(radius: f64, sweep: f64, error: f64) -> Result<usize> {
    if !(error > 0. && error.is_finite()) {
        return Err(GeometryError::InvalidParameter {
            name: "max error",
            value: error,
        });
    }
    let ratio = (1. - error / radius).max(-1.);
    let angle_step = 2. * ratio.acos();
    let steps = (sweep / angle_step).ceil();
    if steps.is_nan() {
        return Ok(2);
    }
    if steps >= MAX_ARC_POINTS as f64 {
        debug!("Max error {} needs more than {} positions", error, MAX_ARC_POINTS);
        return Ok(MAX_ARC_POINTS);
    }
    Ok((steps as usize).saturating_add(2).min(MAX_ARC_POINTS))
}

impl Linearizer {
    pub fn new(criterion: LinearizationCriterion) -> Self {
        Linearizer {
            criterion,
            collinear_epsilon: DEFAULT_COLLINEAR_EPSILON,
        }
    }

    pub fn with_collinear_epsilon(mut self, epsilon: f64) -> Self {
        self.collinear_epsilon = epsilon;
        self
    }

    pub fn criterion(&self) -> LinearizationCriterion {
        self.criterion
    }

    fn num_points(&self, circle: &Circle, sweep: f64) -> Result<usize> {
        match self.criterion {
            LinearizationCriterion::NumPoints(n) => Ok(n),
            LinearizationCriterion::MaxError { error, max_points } => {
                let n = num_points_for_max_error(circle.radius, sweep, error)?;
                let n = if max_points > 0 { n.min(max_points) } else { n };
                debug!("Using {} positions for arc linearization", n);
                Ok(n)
            }
        }
    }

    /// Sample the arc from `p0` through `p1` to `p2`.
    ///
    /// Yields the criterion's number of positions (at least two), or just
    /// `[p0, p2]` when the three are collinear. Fails only for an invalid
    /// max-error criterion.
    pub fn linearize_arc(&self, p0: &Position, p1: &Position, p2: &Position) -> Result<Vec<Position>> {
        let circle = match circumcircle(p0, p1, p2, self.collinear_epsilon) {
            Ok(circle) => circle,
            Err(_) => {
                debug!("Arc control positions are collinear, using a straight segment");
                return Ok(vec![*p0, *p2]);
            }
        };
        let start = (p0.y - circle.center.y).atan2(p0.x - circle.center.x);
        let end = (p2.y - circle.center.y).atan2(p2.x - circle.center.x);
        let sweep = sweep_angle(start, end, circle.clockwise);
        let n = self.num_points(&circle, sweep)?.max(2);
        let step = if circle.clockwise { -sweep } else { sweep } / (n - 1) as f64;

        let mut positions = Vec::with_capacity(n);
        positions.push(*p0);
        for i in 1..n - 1 {
            let angle = start + step * i as f64;
            let z = match (p0.z, p2.z) {
                (Some(z0), Some(z2)) => Some(z0 + (z2 - z0) * i as f64 / (n - 1) as f64),
                _ => None,
            };
            positions.push(on_circle(&circle, angle, z));
        }
        positions.push(*p2);
        Ok(positions)
    }

    /// Sample the full circle through the three positions, starting and
    /// ending at `p0`.
    ///
    /// Yields the criterion's number of steps plus one closing position, or
    /// `[p0, p1, p0]` when the three are collinear.
    pub fn linearize_circle(&self, p0: &Position, p1: &Position, p2: &Position) -> Result<Vec<Position>> {
        let circle = match circumcircle(p0, p1, p2, self.collinear_epsilon) {
            Ok(circle) => circle,
            Err(_) => {
                debug!("Circle control positions are collinear, using a straight segment");
                return Ok(vec![*p0, *p1, *p0]);
            }
        };
        let start = (p0.y - circle.center.y).atan2(p0.x - circle.center.x);
        let n = self.num_points(&circle, 2. * PI)?.max(3);
        let full = if circle.clockwise { -2. * PI } else { 2. * PI };
        let step = full / n as f64;

        let mut positions = Vec::with_capacity(n + 1);
        positions.push(*p0);
        for i in 1..n {
            positions.push(on_circle(&circle, start + step * i as f64, p0.z));
        }
        positions.push(*p0);
        Ok(positions)
    }

    /// Chain of arcs where each arc's last position starts the next:
    /// `p0 p1 p2`, `p2 p3 p4`, and so on. Needs an odd count of at least
    /// three positions.
    pub fn linearize_arc_string(&self, controls: &[Position]) -> Result<Vec<Position>> {
        if controls.len() < 3 || controls.len() % 2 == 0 {
            return Err(GeometryError::Format(format!(
                "Arc string needs an odd number of at least 3 positions, got {}",
                controls.len()
            )));
        }
        let mut positions = vec![controls[0]];
        for i in (0..controls.len() - 2).step_by(2) {
            let arc = self.linearize_arc(&controls[i], &controls[i + 1], &controls[i + 2])?;
            positions.extend(arc.into_iter().skip(1));
        }
        Ok(positions)
    }
}

fn on_circle(circle: &Circle, angle: f64, z: Option<f64>) -> Position {
    Position {
        x: circle.center.x + circle.radius * angle.cos(),
        y: circle.center.y + circle.radius * angle.sin(),
        z,
    }
}

/// Sample the arc through three positions with a fixed number of positions.
pub fn linearize_arc(p0: &Position, p1: &Position, p2: &Position, num_points: usize) -> Result<Vec<Position>> {
    Linearizer::new(LinearizationCriterion::NumPoints(num_points)).linearize_arc(p0, p1, p2)
}

/// Sample the circle through three positions with `num_points` steps.
pub fn linearize_circle(p0: &Position, p1: &Position, p2: &Position, num_points: usize) -> Result<Vec<Position>> {
    Linearizer::new(LinearizationCriterion::NumPoints(num_points)).linearize_circle(p0, p1, p2)
}
