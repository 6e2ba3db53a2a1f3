use crate::config::DEFAULT_ACCURACY;
use crate::errors::{InvariantViolation, Result};
use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A 2- or 3-ordinate tuple. The dimension is fixed at construction.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl From<(f64, f64)> for Position {
    fn from(coord: (f64, f64)) -> Self {
        Position::new(coord.0, coord.1)
    }
}

impl From<(f64, f64, f64)> for Position {
    fn from(coord: (f64, f64, f64)) -> Self {
        Position::new_3d(coord.0, coord.1, coord.2)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.z {
            Some(z) => write!(f, "({}, {}, {})", self.x, self.y, z),
            None => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y, z: None }
    }

    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Position { x, y, z: Some(z) }
    }

    /// Build from a slice of 2 or 3 ordinates.
    pub fn from_ordinates(ordinates: &[f64]) -> Result<Self> {
        match *ordinates {
            [x, y] => Ok(Position::new(x, y)),
            [x, y, z] => Ok(Position::new_3d(x, y, z)),
            _ => Err(InvariantViolation::InvalidDimension(ordinates.len()).into()),
        }
    }

    pub fn dimension(&self) -> usize {
        if self.z.is_some() {
            3
        } else {
            2
        }
    }

    pub fn ordinates(&self) -> Vec<f64> {
        match self.z {
            Some(z) => vec![self.x, self.y, z],
            None => vec![self.x, self.y],
        }
    }

    /// Same position with x and y exchanged.
    pub fn swapped(&self) -> Self {
        Position {
            x: self.y,
            y: self.x,
            z: self.z,
        }
    }

    pub fn translate(&self, offset: &[f64]) -> Self {
        let mut moved = *self;
        if let Some(dx) = offset.get(0) {
            moved.x += dx;
        }
        if let Some(dy) = offset.get(1) {
            moved.y += dy;
        }
        if let (Some(z), Some(dz)) = (moved.z, offset.get(2)) {
            moved.z = Some(z + dz);
        }
        moved
    }

    /// Cross product of the vector self x rhs
    pub fn cross(&self, rhs: Position) -> f64 {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Dot product of the vector self . rhs
    pub fn dot(&self, rhs: Position) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Euclidean distance, including z when both positions have one.
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = match (self.z, other.z) {
            (Some(a), Some(b)) => a - b,
            _ => 0.,
        };
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Ordinate-wise comparison within `accuracy`.
    ///
    /// A 2-D position never equals a 3-D one.
    pub fn approx_eq(&self, other: &Position, accuracy: f64) -> bool {
        let z_eq = match (self.z, other.z) {
            (Some(a), Some(b)) => (a - b).abs() <= accuracy,
            (None, None) => true,
            _ => false,
        };
        z_eq && (self.x - other.x).abs() <= accuracy && (self.y - other.y).abs() <= accuracy
    }
}

impl AbsDiffEq for Position {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        DEFAULT_ACCURACY
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.approx_eq(other, epsilon)
    }
}

/// Mixing a 2-D and a 3-D operand gives a 2-D result.
fn combine_z(a: Option<f64>, b: Option<f64>, f: impl Fn(f64, f64) -> f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        _ => None,
    }
}

impl Add for Position {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Position {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: combine_z(self.z, rhs.z, |a, b| a + b),
        }
    }
}

impl Sub for Position {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Position {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: combine_z(self.z, rhs.z, |a, b| a - b),
        }
    }
}

impl Mul<f64> for Position {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Position {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z.map(|z| z * rhs),
        }
    }
}
