use crate::{Position, Ring};

/// The two end points of an open curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveBoundary {
    pub start: Position,
    pub end: Position,
}

/// The rings bounding a surface, exterior rings of every patch first.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceBoundary {
    pub exterior: Vec<Ring>,
    pub interior: Vec<Ring>,
}

impl SurfaceBoundary {
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.exterior.iter().chain(self.interior.iter())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    /// Points and closed curves have no boundary.
    Empty,
    Curve(CurveBoundary),
    Surface(SurfaceBoundary),
    /// Boundaries of the members of an aggregate, in member order.
    Aggregate(Vec<Boundary>),
}

impl Boundary {
    pub fn is_empty(&self) -> bool {
        match self {
            Boundary::Empty => true,
            Boundary::Aggregate(members) => members.iter().all(Boundary::is_empty),
            _ => false,
        }
    }
}
