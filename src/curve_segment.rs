use crate::crs::Crs;
use crate::envelope::{Envelope, HasEnvelope};
use crate::errors::{InvariantViolation, Result};
use crate::Position;
use std::convert::TryFrom;

/// A piecewise-linear run of positions; the building block of curves.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSegment {
    positions: Vec<Position>,
    crs: Option<Crs>,
}

impl<IP: Into<Position>> TryFrom<Vec<IP>> for CurveSegment {
    type Error = crate::errors::GeometryError;

    fn try_from(positions: Vec<IP>) -> Result<Self> {
        CurveSegment::new(positions.into_iter().map(|ip| ip.into()).collect(), None)
    }
}

impl CurveSegment {
    pub fn new(positions: Vec<Position>, crs: Option<Crs>) -> Result<Self> {
        if positions.is_empty() {
            return Err(InvariantViolation::EmptySegment.into());
        }
        Ok(CurveSegment { positions, crs })
    }

    /// For callers that already hold a non-empty run.
    pub(crate) fn new_unchecked(positions: Vec<Position>, crs: Option<Crs>) -> Self {
        debug_assert!(!positions.is_empty());
        CurveSegment { positions, crs }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn into_positions(self) -> Vec<Position> {
        self.positions
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

    pub fn start(&self) -> Position {
        self.positions[0]
    }

    pub fn end(&self) -> Position {
        self.positions[self.positions.len() - 1]
    }

    pub fn coordinate_dimension(&self) -> usize {
        self.positions[0].dimension()
    }

    pub fn length(&self) -> f64 {
        self.positions
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }

    pub fn is_closed(&self, accuracy: f64) -> bool {
        self.start().approx_eq(&self.end(), accuracy)
    }

    pub fn reversed(&self) -> CurveSegment {
        let mut positions = self.positions.clone();
        positions.reverse();
        CurveSegment {
            positions,
            crs: self.crs.clone(),
        }
    }

    pub(crate) fn translate(&mut self, offset: &[f64]) {
        for position in self.positions.iter_mut() {
            *position = position.translate(offset);
        }
    }
}

impl HasEnvelope for CurveSegment {
    fn envelope(&self) -> Result<Envelope> {
        Envelope::of_positions(&self.positions, self.crs.clone())
            .ok_or_else(|| InvariantViolation::EmptySegment.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GeometryError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_empty_segment() {
        let err = CurveSegment::try_from(Vec::<Position>::new()).expect_err("Expected failure");
        assert_eq!(err, GeometryError::from(InvariantViolation::EmptySegment));
    }

    #[test]
    fn test_basic_segment() {
        let segment = CurveSegment::try_from(vec![(0., 0.), (3., 4.), (3., 5.)]).unwrap();
        assert_eq!(segment.len(), 3);
        assert_eq!(segment.start(), Position::new(0., 0.));
        assert_eq!(segment.end(), Position::new(3., 5.));
        assert_abs_diff_eq!(segment.length(), 6.0);
        assert!(!segment.is_closed(1e-6));
        let envelope = segment.envelope().unwrap();
        assert_eq!(envelope, Envelope::from_bounds(0., 0., 3., 5., None));
    }

    #[test]
    fn test_reversed() {
        let segment = CurveSegment::try_from(vec![(0., 0.), (1., 0.), (1., 1.)]).unwrap();
        let reversed = segment.reversed();
        assert_eq!(reversed.start(), Position::new(1., 1.));
        assert_eq!(reversed.end(), Position::new(0., 0.));
        assert_eq!(reversed.reversed(), segment);
    }
}
