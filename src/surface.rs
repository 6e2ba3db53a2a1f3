use crate::boundary::{Boundary, SurfaceBoundary};
use crate::crs::{merge_crs, Crs};
use crate::derived::DerivedCell;
use crate::envelope::{Envelope, HasEnvelope};
use crate::errors::{GeometryError, InvariantViolation, Result};
use crate::{Point, Position, Ring, SurfacePatch};

#[derive(Debug, Clone)]
struct SurfaceDerived {
    envelope: Envelope,
    centroid: Position,
    area: f64,
    perimeter: f64,
    boundary: Boundary,
}

/// One or more surface patches sharing a coordinate system.
#[derive(Debug, Clone)]
pub struct Surface {
    patches: Vec<SurfacePatch>,
    crs: Option<Crs>,
    derived: DerivedCell<SurfaceDerived>,
}

impl PartialEq for Surface {
    fn eq(&self, other: &Self) -> bool {
        self.patches == other.patches && self.crs == other.crs
    }
}

impl Surface {
    /// Every patch must be in `crs`, or all in one system when `crs` is unset.
    pub fn new(patches: Vec<SurfacePatch>, crs: Option<Crs>) -> Result<Self> {
        if patches.is_empty() {
            return Err(InvariantViolation::EmptySurface.into());
        }
        let crs = patches
            .iter()
            .try_fold(crs, |crs, patch| merge_crs(crs.as_ref(), patch.crs()))?;
        Ok(Surface {
            patches,
            crs,
            derived: DerivedCell::new(),
        })
    }

    pub fn from_patch(patch: SurfacePatch) -> Self {
        let crs = patch.crs().cloned();
        Surface {
            patches: vec![patch],
            crs,
            derived: DerivedCell::new(),
        }
    }

    /// The rectangle covered by `envelope`, as a single-patch surface.
    ///
    /// The ring runs min, (min x, max y), max, (max x, min y), min. For 3-D
    /// envelopes the two synthetic corners take the mean z.
    pub fn from_envelope(envelope: &Envelope) -> Self {
        let min = *envelope.min();
        let max = *envelope.max();
        let mid_z = match (min.z, max.z) {
            (Some(a), Some(b)) => Some(a + (b - a) * 0.5),
            _ => None,
        };
        let positions = vec![
            min,
            Position {
                x: min.x,
                y: max.y,
                z: mid_z,
            },
            max,
            Position {
                x: max.x,
                y: min.y,
                z: mid_z,
            },
            min,
        ];
        let crs = envelope.crs().cloned();
        let exterior = Ring::from_closed_unchecked(positions, crs.clone());
        Surface::from_patch(SurfacePatch::new(exterior, Vec::new(), crs))
    }

    pub fn patches(&self) -> &[SurfacePatch] {
        &self.patches
    }

    pub fn patch(&self, index: usize) -> Result<&SurfacePatch> {
        GeometryError::check_index(index, self.patches.len())?;
        Ok(&self.patches[index])
    }

    pub fn num_patches(&self) -> usize {
        self.patches.len()
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn set_crs(&mut self, crs: Option<Crs>) {
        for patch in self.patches.iter_mut() {
            patch.set_crs(crs.clone());
        }
        self.crs = crs;
        self.derived.invalidate();
    }

    pub fn coordinate_dimension(&self) -> usize {
        self.patches[0].coordinate_dimension()
    }

    pub fn translate(&mut self, offset: &[f64]) {
        for patch in self.patches.iter_mut() {
            patch.translate(offset);
        }
        self.derived.invalidate();
    }

    fn derived(&self) -> Result<&SurfaceDerived> {
        self.derived.get_or_compute(|| self.calculate_derived())
    }

    fn calculate_derived(&self) -> Result<SurfaceDerived> {
        let mut envelope = self.patches[0].envelope()?;
        for patch in &self.patches[1..] {
            envelope = envelope.merge(&patch.envelope()?)?;
        }
        envelope.set_crs(self.crs.clone());

        let areas: Vec<f64> = self.patches.iter().map(SurfacePatch::area).collect();
        let area: f64 = areas.iter().sum();
        let centroids: Vec<Position> = self.patches.iter().map(SurfacePatch::centroid).collect();
        let centroid = if self.patches.len() == 1 || area == 0. {
            centroids[0]
        } else {
            let mut weighted = Position {
                x: 0.,
                y: 0.,
                z: centroids[0].z.map(|_| 0.),
            };
            for (c, a) in centroids.iter().zip(areas.iter()) {
                weighted = weighted + *c * *a;
            }
            weighted * (1. / area)
        };

        let boundary = Boundary::Surface(SurfaceBoundary {
            exterior: self.patches.iter().map(|p| p.exterior().clone()).collect(),
            interior: self
                .patches
                .iter()
                .flat_map(|p| p.interiors().iter().cloned())
                .collect(),
        });
        let perimeter = self.patches.iter().map(SurfacePatch::perimeter).sum();

        Ok(SurfaceDerived {
            envelope,
            centroid,
            area,
            perimeter,
            boundary,
        })
    }

    pub fn area(&self) -> Result<f64> {
        Ok(self.derived()?.area)
    }

    /// Length of the boundary.
    pub fn perimeter(&self) -> Result<f64> {
        Ok(self.derived()?.perimeter)
    }

    pub fn centroid(&self) -> Result<Point> {
        Ok(Point::new(self.derived()?.centroid, self.crs.clone()))
    }

    pub fn boundary(&self) -> Result<&Boundary> {
        Ok(&self.derived()?.boundary)
    }
}

impl HasEnvelope for Surface {
    fn envelope(&self) -> Result<Envelope> {
        Ok(self.derived()?.envelope.clone())
    }
}
