mod aggregate;
mod boundary;
mod curve;
mod curve_segment;
mod derived;
mod envelope;
mod geometry;
mod point;
mod position;
mod ring;
mod surface;
mod surface_patch;
mod utils;

pub mod algorithms;
pub mod config;
pub mod crs;
pub mod errors;
pub mod factory;
pub mod from_wkt;
pub mod to_wkt;
pub mod wkb;

pub use aggregate::{Aggregate, AggregateMember, MultiCurve, MultiGeometry, MultiPoint, MultiSurface};
pub use boundary::{Boundary, CurveBoundary, SurfaceBoundary};
pub use config::GeometryConfig;
pub use crs::Crs;
pub use curve::{Curve, Orientation};
pub use curve_segment::CurveSegment;
pub use envelope::{Envelope, HasEnvelope};
pub use errors::{GeometryError, InvariantViolation, Result};
pub use factory::GeometryFactory;
pub use geometry::{Geometry, GeometryType};
pub use point::Point;
pub use position::Position;
pub use ring::Ring;
pub use surface::Surface;
pub use surface_patch::SurfacePatch;
