//! Construction entry points used by the text and binary adapters.
//!
//! A [`GeometryFactory`] carries the [`GeometryConfig`] that construction
//! needs (accuracy for closure and continuity checks, sample counts for
//! arcs). The axis-order helpers are free functions taking the swap decision
//! as an explicit flag.

use crate::algorithms::linearize::Linearizer;
use crate::config::GeometryConfig;
use crate::crs::Crs;
use crate::errors::{GeometryError, InvariantViolation, Result};
use crate::geometry::type_mismatch;
use crate::from_wkt;
use crate::wkb;
use crate::{
    Curve, CurveSegment, Envelope, Geometry, MultiCurve, MultiGeometry, MultiPoint,
    MultiSurface, Point, Position, Ring, Surface, SurfacePatch,
};
use std::f64::consts::PI;

/// Position from 2 or 3 ordinates, exchanging the first two when `swap_axes`
/// is set (latitude-first input).
pub fn create_position_with_axis_order(ordinates: &[f64], swap_axes: bool) -> Result<Position> {
    let position = Position::from_ordinates(ordinates)?;
    Ok(if swap_axes {
        position.swapped()
    } else {
        position
    })
}

pub fn create_envelope_with_axis_order(
    min: &[f64],
    max: &[f64],
    crs: Option<Crs>,
    swap_axes: bool,
) -> Result<Envelope> {
    let min = create_position_with_axis_order(min, swap_axes)?;
    let max = create_position_with_axis_order(max, swap_axes)?;
    Ok(Envelope::new(min, max, crs))
}

/// Split a flat ordinate array into positions of `dimension` ordinates.
pub fn positions_from_ordinates(ordinates: &[f64], dimension: usize) -> Result<Vec<Position>> {
    if dimension != 2 && dimension != 3 {
        return Err(InvariantViolation::InvalidDimension(dimension).into());
    }
    if ordinates.len() % dimension != 0 {
        return Err(InvariantViolation::RaggedOrdinates {
            len: ordinates.len(),
            dimension,
        }
        .into());
    }
    ordinates
        .chunks(dimension)
        .map(Position::from_ordinates)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryFactory {
    config: GeometryConfig,
}

impl GeometryFactory {
    pub fn new(config: GeometryConfig) -> Self {
        GeometryFactory { config }
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    /// Whether input in `crs` arrives latitude first.
    pub fn swap_axes_for(&self, crs: Option<&Crs>) -> bool {
        self.config.switch_axes && crs.map_or(false, Crs::is_epsg_4326)
    }

    pub fn create_position(&self, ordinates: &[f64]) -> Result<Position> {
        Position::from_ordinates(ordinates)
    }

    pub fn create_envelope(&self, min: Position, max: Position, crs: Option<Crs>) -> Envelope {
        Envelope::new(min, max, crs)
    }

    /// Envelope from `minx,miny,maxx,maxy` (or six ordinates for 3-D), the
    /// values separated by commas or semicolons.
    pub fn create_envelope_from_str(&self, bbox: &str, crs: Option<Crs>) -> Result<Envelope> {
        let ordinates = bbox
            .split(|c: char| c == ',' || c == ';')
            .map(|value| {
                let value = value.trim();
                value
                    .parse::<f64>()
                    .map_err(|_| GeometryError::Format(format!("Invalid bbox ordinate '{}'", value)))
            })
            .collect::<Result<Vec<f64>>>()?;
        let dimension = match ordinates.len() {
            4 => 2,
            6 => 3,
            n => {
                return Err(GeometryError::Format(format!(
                    "Expected 4 or 6 bbox ordinates, found {}",
                    n
                )))
            }
        };
        let swap_axes = self.swap_axes_for(crs.as_ref());
        let (min, max) = ordinates.split_at(dimension);
        create_envelope_with_axis_order(min, max, crs, swap_axes)
    }

    pub fn create_point(&self, position: Position, crs: Option<Crs>) -> Point {
        Point::new(position, crs)
    }

    pub fn create_point_from_wkb(&self, bytes: &[u8], crs: Option<Crs>) -> Result<Point> {
        wkb::decode_point(bytes, crs)
    }

    pub fn create_curve_segment(&self, positions: Vec<Position>, crs: Option<Crs>) -> Result<CurveSegment> {
        CurveSegment::new(positions, crs)
    }

    pub fn create_curve(&self, segments: Vec<CurveSegment>, crs: Option<Crs>) -> Result<Curve> {
        Curve::with_accuracy(segments, crs, self.config.accuracy)
    }

    pub fn create_curve_from_positions(&self, positions: Vec<Position>, crs: Option<Crs>) -> Result<Curve> {
        let segment = CurveSegment::new(positions, crs.clone())?;
        self.create_curve(vec![segment], crs)
    }

    pub fn create_curve_from_ordinates(
        &self,
        ordinates: &[f64],
        dimension: usize,
        crs: Option<Crs>,
    ) -> Result<Curve> {
        self.create_curve_from_positions(positions_from_ordinates(ordinates, dimension)?, crs)
    }

    pub fn create_curve_from_wkb(&self, bytes: &[u8], crs: Option<Crs>) -> Result<Curve> {
        wkb::decode_curve(bytes, crs)
    }

    /// Elliptical arc around `center`, from `start` to `end` degrees
    /// (counter-clockwise from the +x axis), in `segments` equal steps.
    pub fn create_curve_as_arc(
        &self,
        center: Position,
        radius_x: f64,
        radius_y: f64,
        segments: usize,
        start: f64,
        end: f64,
        crs: Option<Crs>,
    ) -> Result<Curve> {
        let segments = segments.max(1);
        let step = (end - start) / segments as f64;
        let positions = (0..=segments)
            .map(|i| ellipse_position(&center, radius_x, radius_y, (start + step * i as f64).to_radians()))
            .collect();
        self.create_curve_from_positions(positions, crs)
    }

    /// Polyline through the circular arc `p0 -> p1 -> p2`, sampled with the
    /// configured number of arc points.
    pub fn create_curve_from_arc(
        &self,
        p0: &Position,
        p1: &Position,
        p2: &Position,
        crs: Option<Crs>,
    ) -> Result<Curve> {
        let positions = Linearizer::from(&self.config).linearize_arc(p0, p1, p2)?;
        self.create_curve_from_positions(positions, crs)
    }

    pub fn create_surface_patch(
        &self,
        exterior: Vec<Position>,
        interiors: Vec<Vec<Position>>,
        crs: Option<Crs>,
    ) -> Result<SurfacePatch> {
        SurfacePatch::from_positions(exterior, interiors, crs, self.config.accuracy)
    }

    /// Patch bounded by closed curves.
    pub fn create_surface_patch_from_curves(
        &self,
        exterior: &Curve,
        interiors: &[Curve],
        crs: Option<Crs>,
    ) -> Result<SurfacePatch> {
        let ring = |curve: &Curve| {
            Ring::with_accuracy(curve.as_line_string(), crs.clone(), self.config.accuracy)
        };
        let exterior = ring(exterior)?;
        let interiors = interiors.iter().map(ring).collect::<Result<Vec<Ring>>>()?;
        Ok(SurfacePatch::new(exterior, interiors, crs))
    }

    pub fn create_surface(&self, patches: Vec<SurfacePatch>, crs: Option<Crs>) -> Result<Surface> {
        Surface::new(patches, crs)
    }

    pub fn create_surface_from_positions(
        &self,
        exterior: Vec<Position>,
        interiors: Vec<Vec<Position>>,
        crs: Option<Crs>,
    ) -> Result<Surface> {
        let patch = self.create_surface_patch(exterior, interiors, crs.clone())?;
        self.create_surface(vec![patch], crs)
    }

    pub fn create_surface_from_ordinates(
        &self,
        exterior: &[f64],
        interiors: &[Vec<f64>],
        dimension: usize,
        crs: Option<Crs>,
    ) -> Result<Surface> {
        let exterior = positions_from_ordinates(exterior, dimension)?;
        let interiors = interiors
            .iter()
            .map(|ordinates| positions_from_ordinates(ordinates, dimension))
            .collect::<Result<Vec<Vec<Position>>>>()?;
        self.create_surface_from_positions(exterior, interiors, crs)
    }

    pub fn create_surface_from_envelope(&self, envelope: &Envelope) -> Surface {
        Surface::from_envelope(envelope)
    }

    pub fn create_surface_from_wkb(&self, bytes: &[u8], crs: Option<Crs>) -> Result<Surface> {
        wkb::decode_surface_with_accuracy(bytes, crs, self.config.accuracy)
    }

    /// Ellipse around `center` approximated by `segments` edges.
    pub fn create_surface_as_ellipse(
        &self,
        center: Position,
        radius_x: f64,
        radius_y: f64,
        segments: usize,
        crs: Option<Crs>,
    ) -> Result<Surface> {
        let segments = segments.max(3);
        let step = 2. * PI / segments as f64;
        let mut positions: Vec<Position> = (0..segments)
            .map(|i| ellipse_position(&center, radius_x, radius_y, step * i as f64))
            .collect();
        positions.push(positions[0]);
        self.create_surface_from_positions(positions, Vec::new(), crs)
    }

    /// Surfaces joined along shared edges. Not supported.
    pub fn create_composite_surface(&self, _surfaces: Vec<Surface>, _crs: Option<Crs>) -> Result<Surface> {
        Err(GeometryError::NotImplemented("composite surfaces"))
    }

    pub fn create_multi_point(&self, points: Vec<Point>, crs: Option<Crs>) -> MultiPoint {
        MultiPoint::new(points, crs)
    }

    pub fn create_multi_point_from_wkb(&self, bytes: &[u8], crs: Option<Crs>) -> Result<MultiPoint> {
        wkb::decode_multi_point(bytes, crs)
    }

    pub fn create_multi_curve(&self, curves: Vec<Curve>, crs: Option<Crs>) -> MultiCurve {
        MultiCurve::new(curves, crs)
    }

    pub fn create_multi_curve_from_wkb(&self, bytes: &[u8], crs: Option<Crs>) -> Result<MultiCurve> {
        wkb::decode_multi_curve(bytes, crs)
    }

    pub fn create_multi_surface(&self, surfaces: Vec<Surface>, crs: Option<Crs>) -> MultiSurface {
        MultiSurface::new(surfaces, crs)
    }

    pub fn create_multi_surface_from_wkb(&self, bytes: &[u8], crs: Option<Crs>) -> Result<MultiSurface> {
        wkb::decode_multi_surface_with_accuracy(bytes, crs, self.config.accuracy)
    }

    pub fn create_multi_geometry(&self, members: Vec<Geometry>, crs: Option<Crs>) -> MultiGeometry {
        MultiGeometry::new(members, crs)
    }

    /// WKB has no tag for heterogeneous collections.
    pub fn create_multi_geometry_from_wkb(&self, _bytes: &[u8], _crs: Option<Crs>) -> Result<MultiGeometry> {
        Err(GeometryError::NotImplemented("MultiGeometry from WKB"))
    }

    /// Parse a single WKT geometry, closing rings within the configured
    /// accuracy.
    pub fn create_from_wkt(&self, text: &str, crs: Option<Crs>) -> Result<Geometry> {
        from_wkt::geometry_from_wkt_with_accuracy(text, crs, self.config.accuracy)
    }

    /// Decode any supported WKB record and check it is a `expected` kind.
    pub fn create_from_wkb(&self, bytes: &[u8], crs: Option<Crs>, expected: &'static str) -> Result<Geometry> {
        let geometry = wkb::decode_with_accuracy(bytes, crs, self.config.accuracy)?;
        if geometry.type_name() == expected {
            Ok(geometry)
        } else {
            Err(type_mismatch(expected, &geometry))
        }
    }
}

fn ellipse_position(center: &Position, radius_x: f64, radius_y: f64, angle: f64) -> Position {
    Position {
        x: center.x + radius_x * angle.cos(),
        y: center.y + radius_y * angle.sin(),
        z: center.z,
    }
}
