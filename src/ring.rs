use crate::algorithms::polygon_area;
use crate::config::DEFAULT_ACCURACY;
use crate::crs::Crs;
use crate::envelope::{Envelope, HasEnvelope};
use crate::errors::{GeometryError, InvariantViolation, Result};
use crate::{Curve, CurveSegment, Position};
use std::convert::TryFrom;

/// A closed run of at least three positions, bounding a surface patch.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    positions: Vec<Position>,
    crs: Option<Crs>,
}

pub(crate) fn validate_ring(positions: &[Position], accuracy: f64) -> Result<()> {
    if positions.len() < 3 {
        Err(InvariantViolation::TooFewRingPositions {
            count: positions.len(),
        }
        .into())
    } else if !positions[0].approx_eq(&positions[positions.len() - 1], accuracy) {
        Err(InvariantViolation::RingNotClosed.into())
    } else {
        Ok(())
    }
}

impl<IP: Into<Position>> TryFrom<Vec<IP>> for Ring {
    type Error = GeometryError;

    fn try_from(positions: Vec<IP>) -> Result<Self> {
        Ring::new(positions.into_iter().map(|ip| ip.into()).collect(), None)
    }
}

impl Ring {
    pub fn new(positions: Vec<Position>, crs: Option<Crs>) -> Result<Self> {
        Ring::with_accuracy(positions, crs, DEFAULT_ACCURACY)
    }

    pub fn with_accuracy(positions: Vec<Position>, crs: Option<Crs>, accuracy: f64) -> Result<Self> {
        validate_ring(&positions, accuracy)?;
        Ok(Ring { positions, crs })
    }

    /// Caller guarantees at least three positions with first equal to last.
    pub(crate) fn from_closed_unchecked(positions: Vec<Position>, crs: Option<Crs>) -> Self {
        Ring { positions, crs }
    }

    /// Join continuous segments into one closed ring.
    pub fn from_segments(segments: &[CurveSegment], crs: Option<Crs>, accuracy: f64) -> Result<Self> {
        let curve = Curve::with_accuracy(segments.to_vec(), crs, accuracy)?;
        Ring::with_accuracy(curve.as_line_string(), curve.crs().cloned(), accuracy)
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub(crate) fn set_crs(&mut self, crs: Option<Crs>) {
        self.crs = crs;
    }

    pub fn coordinate_dimension(&self) -> usize {
        self.positions[0].dimension()
    }

    /// Length of the ring's perimeter.
    pub fn length(&self) -> f64 {
        self.positions
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }

    /// Signed planar area, positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        polygon_area::signed_area(&self.positions)
    }

    pub fn area(&self) -> f64 {
        polygon_area::ring_area(&self.positions)
    }

    pub fn is_clockwise(&self) -> bool {
        polygon_area::is_clockwise(&self.positions)
    }

    pub fn reversed(&self) -> Ring {
        let mut positions = self.positions.clone();
        positions.reverse();
        Ring {
            positions,
            crs: self.crs.clone(),
        }
    }

    pub(crate) fn translate(&mut self, offset: &[f64]) {
        for position in self.positions.iter_mut() {
            *position = position.translate(offset);
        }
    }

    pub fn as_segment(&self) -> CurveSegment {
        CurveSegment::new_unchecked(self.positions.clone(), self.crs.clone())
    }

    pub fn to_curve(&self) -> Curve {
        Curve::from_segment(self.as_segment())
    }
}

impl HasEnvelope for Ring {
    fn envelope(&self) -> Result<Envelope> {
        Envelope::of_positions(&self.positions, self.crs.clone())
            .ok_or_else(|| InvariantViolation::TooFewRingPositions { count: 0 }.into())
    }
}
