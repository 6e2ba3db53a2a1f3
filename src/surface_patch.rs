use crate::algorithms::polygon_area;
use crate::crs::Crs;
use crate::envelope::{Envelope, HasEnvelope};
use crate::errors::Result;
use crate::{Position, Ring};

/// One exterior ring and any number of holes.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePatch {
    exterior: Ring,
    interiors: Vec<Ring>,
    crs: Option<Crs>,
}

impl SurfacePatch {
    pub fn new(exterior: Ring, interiors: Vec<Ring>, crs: Option<Crs>) -> Self {
        let crs = crs.or_else(|| exterior.crs().cloned());
        SurfacePatch {
            exterior,
            interiors,
            crs,
        }
    }

    /// Validate and build the rings from raw position runs.
    pub fn from_positions(
        exterior: Vec<Position>,
        interiors: Vec<Vec<Position>>,
        crs: Option<Crs>,
        accuracy: f64,
    ) -> Result<Self> {
        let exterior = Ring::with_accuracy(exterior, crs.clone(), accuracy)?;
        let interiors = interiors
            .into_iter()
            .map(|ring| Ring::with_accuracy(ring, crs.clone(), accuracy))
            .collect::<Result<Vec<Ring>>>()?;
        Ok(SurfacePatch::new(exterior, interiors, crs))
    }

    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    pub fn interiors(&self) -> &[Ring] {
        &self.interiors
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub(crate) fn set_crs(&mut self, crs: Option<Crs>) {
        self.exterior.set_crs(crs.clone());
        for ring in self.interiors.iter_mut() {
            ring.set_crs(crs.clone());
        }
        self.crs = crs;
    }

    pub fn coordinate_dimension(&self) -> usize {
        self.exterior.coordinate_dimension()
    }

    fn interior_positions(&self) -> Vec<&[Position]> {
        self.interiors.iter().map(|r| r.positions()).collect()
    }

    /// Exterior area less the area of every hole.
    pub fn area(&self) -> f64 {
        polygon_area::patch_area(self.exterior.positions(), &self.interior_positions())
    }

    pub fn centroid(&self) -> Position {
        polygon_area::patch_centroid(self.exterior.positions(), &self.interior_positions())
    }

    /// Total length of all rings.
    pub fn perimeter(&self) -> f64 {
        self.exterior.length() + self.interiors.iter().map(Ring::length).sum::<f64>()
    }

    pub(crate) fn translate(&mut self, offset: &[f64]) {
        self.exterior.translate(offset);
        for ring in self.interiors.iter_mut() {
            ring.translate(offset);
        }
    }
}

impl HasEnvelope for SurfacePatch {
    /// Holes lie inside the exterior, so the exterior alone bounds the patch.
    fn envelope(&self) -> Result<Envelope> {
        let mut envelope = self.exterior.envelope()?;
        envelope.set_crs(self.crs.clone());
        Ok(envelope)
    }
}
