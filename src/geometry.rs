use crate::algorithms::predicates;
use crate::boundary::Boundary;
use crate::config::GeometryConfig;
use crate::crs::Crs;
use crate::envelope::{Envelope, HasEnvelope};
use crate::errors::{GeometryError, Result};
use crate::{
    Curve, MultiCurve, MultiGeometry, MultiPoint, MultiSurface, Point, Surface,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag of a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    Curve,
    Surface,
    MultiPoint,
    MultiCurve,
    MultiSurface,
    MultiGeometry,
}

impl GeometryType {
    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::Curve => "Curve",
            GeometryType::Surface => "Surface",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiCurve => "MultiCurve",
            GeometryType::MultiSurface => "MultiSurface",
            GeometryType::MultiGeometry => "MultiGeometry",
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            GeometryType::MultiPoint
                | GeometryType::MultiCurve
                | GeometryType::MultiSurface
                | GeometryType::MultiGeometry
        )
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    Curve(Curve),
    Surface(Surface),
    MultiPoint(MultiPoint),
    MultiCurve(MultiCurve),
    MultiSurface(MultiSurface),
    MultiGeometry(MultiGeometry),
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::Curve(_) => GeometryType::Curve,
            Geometry::Surface(_) => GeometryType::Surface,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiCurve(_) => GeometryType::MultiCurve,
            Geometry::MultiSurface(_) => GeometryType::MultiSurface,
            Geometry::MultiGeometry(_) => GeometryType::MultiGeometry,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.geometry_type().name()
    }

    pub fn crs(&self) -> Option<&Crs> {
        match self {
            Geometry::Point(g) => g.crs(),
            Geometry::Curve(g) => g.crs(),
            Geometry::Surface(g) => g.crs(),
            Geometry::MultiPoint(g) => g.crs(),
            Geometry::MultiCurve(g) => g.crs(),
            Geometry::MultiSurface(g) => g.crs(),
            Geometry::MultiGeometry(g) => g.crs(),
        }
    }

    pub fn set_crs(&mut self, crs: Option<Crs>) {
        match self {
            Geometry::Point(g) => g.set_crs(crs),
            Geometry::Curve(g) => g.set_crs(crs),
            Geometry::Surface(g) => g.set_crs(crs),
            Geometry::MultiPoint(g) => g.set_crs(crs),
            Geometry::MultiCurve(g) => g.set_crs(crs),
            Geometry::MultiSurface(g) => g.set_crs(crs),
            Geometry::MultiGeometry(g) => g.set_crs(crs),
        }
    }

    /// Topological dimension. Empty aggregates report 0.
    pub fn dimension(&self) -> usize {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => 0,
            Geometry::Curve(_) | Geometry::MultiCurve(_) => 1,
            Geometry::Surface(_) | Geometry::MultiSurface(_) => 2,
            Geometry::MultiGeometry(g) => g.iter().map(Geometry::dimension).max().unwrap_or(0),
        }
    }

    /// Number of ordinates per position: 2 or 3.
    pub fn coordinate_dimension(&self) -> Result<usize> {
        match self {
            Geometry::Point(g) => Ok(g.coordinate_dimension()),
            Geometry::Curve(g) => Ok(g.coordinate_dimension()),
            Geometry::Surface(g) => Ok(g.coordinate_dimension()),
            Geometry::MultiPoint(g) => g.coordinate_dimension(),
            Geometry::MultiCurve(g) => g.coordinate_dimension(),
            Geometry::MultiSurface(g) => g.coordinate_dimension(),
            Geometry::MultiGeometry(g) => g.coordinate_dimension(),
        }
    }

    pub fn centroid(&self) -> Result<Point> {
        match self {
            Geometry::Point(g) => Ok(g.centroid()),
            Geometry::Curve(g) => Ok(g.centroid()),
            Geometry::Surface(g) => g.centroid(),
            Geometry::MultiPoint(g) => g.centroid(),
            Geometry::MultiCurve(g) => g.centroid(),
            Geometry::MultiSurface(g) => g.centroid(),
            Geometry::MultiGeometry(g) => g.centroid(),
        }
    }

    pub fn boundary(&self) -> Result<Boundary> {
        match self {
            Geometry::Point(_) => Ok(Boundary::Empty),
            Geometry::Curve(g) => Ok(g.boundary().clone()),
            Geometry::Surface(g) => Ok(g.boundary()?.clone()),
            Geometry::MultiPoint(g) => Ok(g.boundary()?.clone()),
            Geometry::MultiCurve(g) => Ok(g.boundary()?.clone()),
            Geometry::MultiSurface(g) => Ok(g.boundary()?.clone()),
            Geometry::MultiGeometry(g) => Ok(g.boundary()?.clone()),
        }
    }

    /// Area of surface kinds. Points and curves have none.
    pub fn area(&self) -> Result<f64> {
        match self {
            Geometry::Surface(g) => g.area(),
            Geometry::MultiSurface(g) => g.area(),
            Geometry::MultiGeometry(g) => g.iter().map(Geometry::area).sum(),
            Geometry::Point(_)
            | Geometry::Curve(_)
            | Geometry::MultiPoint(_)
            | Geometry::MultiCurve(_) => Ok(0.),
        }
    }

    pub fn translate(&mut self, offset: &[f64]) {
        match self {
            Geometry::Point(g) => g.translate(offset),
            Geometry::Curve(g) => g.translate(offset),
            Geometry::Surface(g) => g.translate(offset),
            Geometry::MultiPoint(g) => g.translate(offset),
            Geometry::MultiCurve(g) => g.translate(offset),
            Geometry::MultiSurface(g) => g.translate(offset),
            Geometry::MultiGeometry(g) => g.translate(offset),
        }
    }

    /// True if the two geometries share at least one position, within
    /// `tolerance`.
    pub fn intersects(&self, other: &Geometry, tolerance: f64) -> Result<bool> {
        predicates::intersects(self, other, tolerance)
    }

    /// True if `other` lies entirely inside this geometry.
    pub fn contains(&self, other: &Geometry, tolerance: f64) -> Result<bool> {
        predicates::contains(self, other, tolerance)
    }

    /// [`Geometry::intersects`] within `config.tolerance`.
    pub fn intersects_with(&self, other: &Geometry, config: &GeometryConfig) -> Result<bool> {
        predicates::intersects_with(self, other, config)
    }

    pub fn contains_with(&self, other: &Geometry, config: &GeometryConfig) -> Result<bool> {
        predicates::contains_with(self, other, config)
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Geometry::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_curve(&self) -> Option<&Curve> {
        match self {
            Geometry::Curve(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_surface(&self) -> Option<&Surface> {
        match self {
            Geometry::Surface(s) => Some(s),
            _ => None,
        }
    }
}

impl HasEnvelope for Geometry {
    fn envelope(&self) -> Result<Envelope> {
        match self {
            Geometry::Point(g) => g.envelope(),
            Geometry::Curve(g) => g.envelope(),
            Geometry::Surface(g) => g.envelope(),
            Geometry::MultiPoint(g) => g.envelope(),
            Geometry::MultiCurve(g) => g.envelope(),
            Geometry::MultiSurface(g) => g.envelope(),
            Geometry::MultiGeometry(g) => g.envelope(),
        }
    }
}

macro_rules! impl_from_geometry {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Geometry {
                fn from(g: $variant) -> Self {
                    Geometry::$variant(g)
                }
            }
        )*
    };
}

impl_from_geometry!(Point, Curve, Surface, MultiPoint, MultiCurve, MultiSurface, MultiGeometry);

/// Expects a specific kind, for callers that built a geometry generically.
pub(crate) fn type_mismatch(expected: &'static str, found: &Geometry) -> GeometryError {
    crate::errors::InvariantViolation::TypeMismatch {
        expected,
        found: found.type_name(),
    }
    .into()
}
