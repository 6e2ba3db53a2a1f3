use crate::crs::{merge_crs, Crs};
use crate::errors::Result;
use crate::{Position, Surface};
use serde::{Deserialize, Serialize};

/// Anything that can report its axis-aligned bounding box.
pub trait HasEnvelope {
    fn envelope(&self) -> Result<Envelope>;
}

/// Axis-aligned bounding box; `min <= max` componentwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    min: Position,
    max: Position,
    crs: Option<Crs>,
}

fn min_z(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn max_z(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

impl Envelope {
    /// Build from two opposite corners in any order.
    pub fn new(p1: Position, p2: Position, crs: Option<Crs>) -> Self {
        Envelope {
            min: Position {
                x: p1.x.min(p2.x),
                y: p1.y.min(p2.y),
                z: min_z(p1.z, p2.z),
            },
            max: Position {
                x: p1.x.max(p2.x),
                y: p1.y.max(p2.y),
                z: max_z(p1.z, p2.z),
            },
            crs,
        }
    }

    pub fn from_bounds(min_x: f64, min_y: f64, max_x: f64, max_y: f64, crs: Option<Crs>) -> Self {
        Envelope::new(Position::new(min_x, min_y), Position::new(max_x, max_y), crs)
    }

    /// Smallest envelope holding every position, or `None` for an empty slice.
    pub fn of_positions(positions: &[Position], crs: Option<Crs>) -> Option<Self> {
        let (first, rest) = positions.split_first()?;
        let mut envelope = Envelope::new(*first, *first, crs);
        for position in rest {
            envelope.expand_to(position);
        }
        Some(envelope)
    }

    pub fn min(&self) -> &Position {
        &self.min
    }

    pub fn max(&self) -> &Position {
        &self.max
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn set_crs(&mut self, crs: Option<Crs>) {
        self.crs = crs;
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Position {
        Position {
            x: (self.max.x + self.min.x) / 2.,
            y: (self.max.y + self.min.y) / 2.,
            z: match (self.min.z, self.max.z) {
                (Some(a), Some(b)) => Some((a + b) / 2.),
                _ => None,
            },
        }
    }

    pub(crate) fn expand_to(&mut self, position: &Position) {
        self.min.x = self.min.x.min(position.x);
        self.min.y = self.min.y.min(position.y);
        self.min.z = min_z(self.min.z, position.z);
        self.max.x = self.max.x.max(position.x);
        self.max.y = self.max.y.max(position.y);
        self.max.z = max_z(self.max.z, position.z);
    }

    /// The smallest envelope holding both. Fails if both carry different
    /// coordinate systems.
    pub fn merge(&self, other: &Envelope) -> Result<Envelope> {
        let crs = merge_crs(self.crs(), other.crs())?;
        let mut merged = Envelope {
            min: self.min,
            max: self.max,
            crs,
        };
        merged.expand_to(&other.min);
        merged.expand_to(&other.max);
        Ok(merged)
    }

    /// Interior overlap test: boxes that only share an edge or a corner do
    /// not intersect.
    pub fn intersects(&self, other: &Envelope) -> bool {
        let x_overlap = (other.min.x >= self.min.x && other.min.x < self.max.x)
            || (other.max.x > self.min.x && other.max.x <= self.max.x)
            || (self.min.x >= other.min.x && self.min.x < other.max.x)
            || (self.max.x > other.min.x && self.max.x <= other.max.x);
        let y_overlap = (other.min.y >= self.min.y && other.min.y < self.max.y)
            || (other.max.y > self.min.y && other.max.y <= self.max.y)
            || (self.min.y >= other.min.y && self.min.y < other.max.y)
            || (self.max.y > other.min.y && self.max.y <= other.max.y);
        x_overlap && y_overlap
    }

    /// Closed overlap test, used as a cheap prefilter by the predicates.
    pub(crate) fn touches(&self, other: &Envelope, tolerance: f64) -> bool {
        self.min.x - tolerance <= other.max.x
            && self.max.x + tolerance >= other.min.x
            && self.min.y - tolerance <= other.max.y
            && self.max.y + tolerance >= other.min.y
    }

    pub fn contains_position(&self, point: &Position) -> bool {
        self.min.x <= point.x
            && point.x <= self.max.x
            && self.min.y <= point.y
            && point.y <= self.max.y
    }

    /// True if all four corners of `other` lie inside this envelope.
    pub fn contains(&self, other: &Envelope) -> bool {
        let corners = [
            Position::new(other.min.x, other.min.y),
            Position::new(other.min.x, other.max.y),
            Position::new(other.max.x, other.max.y),
            Position::new(other.max.x, other.min.y),
        ];
        corners.iter().all(|c| self.contains_position(c))
    }

    /// Grow (or shrink, for negative `distance`) on both axes.
    pub fn buffer(&self, distance: f64) -> Envelope {
        let mut min = self.min;
        let mut max = self.max;
        min.x -= distance;
        min.y -= distance;
        max.x += distance;
        max.y += distance;
        if min.x > max.x {
            std::mem::swap(&mut min.x, &mut max.x);
        }
        if min.y > max.y {
            std::mem::swap(&mut min.y, &mut max.y);
        }
        Envelope {
            min,
            max,
            crs: self.crs.clone(),
        }
    }

    pub fn translate(&self, offset: &[f64]) -> Envelope {
        Envelope {
            min: self.min.translate(offset),
            max: self.max.translate(offset),
            crs: self.crs.clone(),
        }
    }

    /// The rectangle as a single-patch surface.
    pub fn to_surface(&self) -> Surface {
        Surface::from_envelope(self)
    }

    pub fn approx_eq(&self, other: &Envelope, accuracy: f64) -> bool {
        self.crs == other.crs
            && self.min.approx_eq(&other.min, accuracy)
            && self.max.approx_eq(&other.max, accuracy)
    }
}
