//! Pairwise `intersects` and `contains` over every geometry kind.
//!
//! Dispatch is a match over {point, curve, surface, aggregate} on both sides.
//! Aggregates recurse into their members: an aggregate intersects if any
//! member does, contains if any member contains, and is contained if every
//! member is contained.

use crate::algorithms::point_in_polygon::point_in_patch;
use crate::config::GeometryConfig;
use crate::envelope::HasEnvelope;
use crate::errors::{GeometryError, Result};
use crate::utils::{line_strings_cross, line_strings_intersect, segment_touches_position};
use crate::{Curve, Geometry, Position, Surface, SurfacePatch};
use std::cmp::Ordering;

/// A non-aggregate geometry, flattened to the positions the tests need.
enum Primitive {
    Point(Position),
    Curve(Vec<Position>),
    Surface(Vec<SurfacePatch>),
}

impl Primitive {
    fn from_curve(curve: &Curve) -> Self {
        Primitive::Curve(curve.as_line_string())
    }

    fn from_surface(surface: &Surface) -> Self {
        Primitive::Surface(surface.patches().to_vec())
    }
}

/// Members of an aggregate, or `None` for a primitive.
fn members(geometry: &Geometry) -> Option<Vec<Geometry>> {
    match geometry {
        Geometry::MultiPoint(a) => Some(a.iter().cloned().map(Geometry::Point).collect()),
        Geometry::MultiCurve(a) => Some(a.iter().cloned().map(Geometry::Curve).collect()),
        Geometry::MultiSurface(a) => Some(a.iter().cloned().map(Geometry::Surface).collect()),
        Geometry::MultiGeometry(a) => Some(a.members().to_vec()),
        _ => None,
    }
}

fn primitive(geometry: &Geometry) -> Option<Primitive> {
    match geometry {
        Geometry::Point(p) => Some(Primitive::Point(*p.position())),
        Geometry::Curve(c) => Some(Primitive::from_curve(c)),
        Geometry::Surface(s) => Some(Primitive::from_surface(s)),
        _ => None,
    }
}

/// True if `a` and `b` share at least one position, within `tolerance`.
pub fn intersects(a: &Geometry, b: &Geometry, tolerance: f64) -> Result<bool> {
    if let Some(members) = members(a) {
        return any_member(&members, |m| intersects(m, b, tolerance));
    }
    if let Some(members) = members(b) {
        return any_member(&members, |m| intersects(a, m, tolerance));
    }
    if !a.envelope()?.touches(&b.envelope()?, tolerance) {
        return Ok(false);
    }
    match (primitive(a), primitive(b)) {
        (Some(pa), Some(pb)) => Ok(primitives_intersect(&pa, &pb, tolerance)),
        _ => Ok(false),
    }
}

/// True if every position of `b` lies inside `a`.
///
/// Fails with `NotApplicable` when `a` has a lower dimension than `b`, and
/// with `NotImplemented` for curve/curve containment.
pub fn contains(a: &Geometry, b: &Geometry, tolerance: f64) -> Result<bool> {
    if let Some(members) = members(b) {
        if members.is_empty() {
            return Err(GeometryError::EmptyAggregate);
        }
        for member in &members {
            if !contains(a, member, tolerance)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }
    if let Some(members) = members(a) {
        return any_member(&members, |m| contains(m, b, tolerance));
    }
    let (pa, pb) = match (primitive(a), primitive(b)) {
        (Some(pa), Some(pb)) => (pa, pb),
        _ => return Ok(false),
    };
    match (&pa, &pb) {
        (Primitive::Point(_), Primitive::Curve(_))
        | (Primitive::Point(_), Primitive::Surface(_))
        | (Primitive::Curve(_), Primitive::Surface(_)) => Err(GeometryError::NotApplicable(
            "a geometry cannot contain one of higher dimension",
        )),
        (Primitive::Curve(_), Primitive::Curve(_)) => {
            Err(GeometryError::NotImplemented("curve/curve containment"))
        }
        _ => {
            if !a.envelope()?.buffer(tolerance).contains(&b.envelope()?) {
                return Ok(false);
            }
            Ok(primitive_contains(&pa, &pb, tolerance))
        }
    }
}

/// [`intersects`] with the tolerance of `config`.
pub fn intersects_with(a: &Geometry, b: &Geometry, config: &GeometryConfig) -> Result<bool> {
    intersects(a, b, config.tolerance)
}

/// [`contains`] with the tolerance of `config`.
pub fn contains_with(a: &Geometry, b: &Geometry, config: &GeometryConfig) -> Result<bool> {
    contains(a, b, config.tolerance)
}

fn any_member<F>(members: &[Geometry], mut test: F) -> Result<bool>
where
    F: FnMut(&Geometry) -> Result<bool>,
{
    for member in members {
        if test(member)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn primitives_intersect(a: &Primitive, b: &Primitive, tolerance: f64) -> bool {
    match (a, b) {
        (Primitive::Point(p), Primitive::Point(q)) => point_intersects_point(p, q, tolerance),
        (Primitive::Point(p), Primitive::Curve(line))
        | (Primitive::Curve(line), Primitive::Point(p)) => {
            point_intersects_line(p, line, tolerance)
        }
        (Primitive::Point(p), Primitive::Surface(patches))
        | (Primitive::Surface(patches), Primitive::Point(p)) => patches
            .iter()
            .any(|patch| point_intersects_patch(p, patch, tolerance)),
        (Primitive::Curve(a), Primitive::Curve(b)) => line_intersects_line(a, b, tolerance),
        (Primitive::Curve(line), Primitive::Surface(patches))
        | (Primitive::Surface(patches), Primitive::Curve(line)) => patches
            .iter()
            .any(|patch| line_intersects_patch(line, patch, tolerance)),
        (Primitive::Surface(a), Primitive::Surface(b)) => a
            .iter()
            .any(|pa| b.iter().any(|pb| patch_intersects_patch(pa, pb, tolerance))),
    }
}

fn primitive_contains(a: &Primitive, b: &Primitive, tolerance: f64) -> bool {
    match (a, b) {
        (Primitive::Point(p), Primitive::Point(q)) => point_intersects_point(p, q, tolerance),
        (Primitive::Curve(line), Primitive::Point(p)) => point_intersects_line(p, line, tolerance),
        (Primitive::Surface(patches), Primitive::Point(p)) => {
            patches.iter().any(|patch| point_in_patch(p, patch))
        }
        (Primitive::Surface(patches), Primitive::Curve(line)) => {
            patches
                .iter()
                .any(|patch| patch_contains_line(patch, line, tolerance))
        }
        (Primitive::Surface(container), Primitive::Surface(contained)) => contained
            .iter()
            .all(|inner| {
                container
                    .iter()
                    .any(|outer| patch_contains_patch(outer, inner, tolerance))
            }),
        _ => false,
    }
}

pub fn point_intersects_point(a: &Position, b: &Position, tolerance: f64) -> bool {
    a.distance(b) <= tolerance
}

pub fn point_intersects_line(point: &Position, line: &[Position], tolerance: f64) -> bool {
    if line.len() == 1 {
        return point_intersects_point(point, &line[0], tolerance);
    }
    line.windows(2)
        .any(|w| segment_touches_position(&w[0], &w[1], point, tolerance))
}

pub fn line_intersects_line(a: &[Position], b: &[Position], tolerance: f64) -> bool {
    match (a.len(), b.len()) {
        (1, _) => point_intersects_line(&a[0], b, tolerance),
        (_, 1) => point_intersects_line(&b[0], a, tolerance),
        _ => line_strings_intersect(a, b),
    }
}

/// Inside the patch, or on one of its rings.
pub fn point_intersects_patch(point: &Position, patch: &SurfacePatch, tolerance: f64) -> bool {
    point_in_patch(point, patch)
        || rings(patch).any(|ring| point_intersects_line(point, ring, tolerance))
}

/// Fully inside, or crossing the exterior or a hole boundary.
pub fn line_intersects_patch(line: &[Position], patch: &SurfacePatch, tolerance: f64) -> bool {
    line.iter().any(|p| point_in_patch(p, patch))
        || rings(patch).any(|ring| line_intersects_line(line, ring, tolerance))
}

pub fn patch_intersects_patch(a: &SurfacePatch, b: &SurfacePatch, tolerance: f64) -> bool {
    rings(a).any(|ra| rings(b).any(|rb| line_intersects_line(ra, rb, tolerance)))
        || point_in_patch(&a.exterior().positions()[0], b)
        || point_in_patch(&b.exterior().positions()[0], a)
}

/// Every position inside, and no segment properly crossing a ring or leaving
/// the patch through a ring vertex.
pub fn patch_contains_line(patch: &SurfacePatch, line: &[Position], tolerance: f64) -> bool {
    line.iter().all(|p| point_in_patch(p, patch))
        && !rings(patch).any(|ring| line_strings_cross(line, ring))
        && line
            .windows(2)
            .all(|w| segment_stays_in_patch(&w[0], &w[1], patch, tolerance))
}

/// Splits the segment at every ring vertex it passes through and checks the
/// middle of each piece.
fn segment_stays_in_patch(
    start: &Position,
    end: &Position,
    patch: &SurfacePatch,
    tolerance: f64,
) -> bool {
    let direction = *end - *start;
    let length_squared = direction.dot(direction);
    if length_squared == 0. {
        return true;
    }
    let mut params = vec![0., 1.];
    for ring in rings(patch) {
        for vertex in ring {
            if segment_touches_position(start, end, vertex, tolerance) {
                let t = (*vertex - *start).dot(direction) / length_squared;
                if t > 0. && t < 1. {
                    params.push(t);
                }
            }
        }
    }
    if params.len() == 2 {
        return true;
    }
    params.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    params.windows(2).all(|w| {
        let middle = *start + direction * ((w[0] + w[1]) * 0.5);
        point_intersects_patch(&middle, patch, tolerance)
    })
}

pub fn patch_contains_patch(outer: &SurfacePatch, inner: &SurfacePatch, tolerance: f64) -> bool {
    patch_contains_line(outer, inner.exterior().positions(), tolerance)
        && outer.interiors().iter().all(|hole| {
            // A hole of the container must not sit inside the contained patch.
            !point_in_patch(&hole.positions()[0], inner)
        })
}

fn rings(patch: &SurfacePatch) -> impl Iterator<Item = &[Position]> {
    std::iter::once(patch.exterior().positions())
        .chain(patch.interiors().iter().map(|ring| ring.positions()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TOLERANCE;
    use crate::{MultiCurve, MultiPoint, MultiSurface, Point, Ring};
    use std::convert::TryFrom;

    fn point(x: f64, y: f64) -> Geometry {
        Geometry::Point(Point::new(Position::new(x, y), None))
    }

    fn curve(coords: Vec<(f64, f64)>) -> Geometry {
        Geometry::Curve(Curve::try_from(coords).unwrap())
    }

    fn ring(coords: Vec<(f64, f64)>) -> Ring {
        Ring::try_from(coords).unwrap()
    }

    fn unit_square() -> SurfacePatch {
        SurfacePatch::new(
            ring(vec![(0., 0.), (1., 0.), (1., 1.), (0., 1.), (0., 0.)]),
            Vec::new(),
            None,
        )
    }

    fn unit_square_with_hole() -> SurfacePatch {
        SurfacePatch::new(
            ring(vec![(0., 0.), (1., 0.), (1., 1.), (0., 1.), (0., 0.)]),
            vec![ring(vec![
                (0.25, 0.25),
                (0.75, 0.25),
                (0.75, 0.75),
                (0.25, 0.75),
                (0.25, 0.25),
            ])],
            None,
        )
    }

    fn surface(patch: SurfacePatch) -> Geometry {
        Geometry::Surface(Surface::from_patch(patch))
    }

    const TOL: f64 = DEFAULT_TOLERANCE;

    #[test]
    fn test_point_in_surface_and_hole() {
        let square = surface(unit_square());
        assert!(contains(&square, &point(0.5, 0.5), TOL).unwrap());
        let holed = surface(unit_square_with_hole());
        assert!(!contains(&holed, &point(0.5, 0.5), TOL).unwrap());
        assert!(contains(&holed, &point(0.1, 0.1), TOL).unwrap());
    }

    #[test]
    fn test_point_point() {
        assert!(intersects(&point(1., 1.), &point(1., 1.), TOL).unwrap());
        assert!(intersects(&point(1., 1.), &point(1.05, 1.), 0.1).unwrap());
        assert!(!intersects(&point(1., 1.), &point(1.05, 1.), TOL).unwrap());
        assert!(contains(&point(1., 1.), &point(1., 1.), TOL).unwrap());
    }

    #[test]
    fn test_point_curve() {
        let c = curve(vec![(0., 0.), (2., 2.)]);
        assert!(intersects(&c, &point(1., 1.), TOL).unwrap());
        assert!(intersects(&point(1., 1.), &c, TOL).unwrap());
        assert!(!intersects(&c, &point(1., 0.), TOL).unwrap());
        assert!(contains(&c, &point(1., 1.), TOL).unwrap());
    }

    #[test]
    fn test_curve_curve() {
        let a = curve(vec![(0., 0.), (1., 1.)]);
        let b = curve(vec![(0., 1.), (1., 0.)]);
        let c = curve(vec![(0., 2.), (1., 2.)]);
        assert!(intersects(&a, &b, TOL).unwrap());
        assert!(!intersects(&a, &c, TOL).unwrap());
    }

    #[test]
    fn test_curve_surface() {
        let square = surface(unit_square());
        let inside = curve(vec![(0.2, 0.2), (0.8, 0.8)]);
        let crossing = curve(vec![(0.5, 0.5), (2., 0.5)]);
        let outside = curve(vec![(2., 2.), (3., 3.)]);
        assert!(intersects(&square, &inside, TOL).unwrap());
        assert!(intersects(&crossing, &square, TOL).unwrap());
        assert!(!intersects(&square, &outside, TOL).unwrap());
        assert!(contains(&square, &inside, TOL).unwrap());
        assert!(!contains(&square, &crossing, TOL).unwrap());

        // A curve inside the hole touches nothing of the holed surface
        let holed = surface(unit_square_with_hole());
        let in_hole = curve(vec![(0.4, 0.4), (0.6, 0.6)]);
        assert!(!intersects(&holed, &in_hole, TOL).unwrap());
        // Crossing the hole boundary
        let across_hole = curve(vec![(0.1, 0.5), (0.5, 0.5)]);
        assert!(intersects(&holed, &across_hole, TOL).unwrap());
        assert!(!contains(&holed, &across_hole, TOL).unwrap());
    }

    #[test]
    fn test_tolerance_from_config() {
        let a = point(1., 1.);
        let b = point(1.05, 1.);
        let config = GeometryConfig::default();
        assert!(!intersects_with(&a, &b, &config).unwrap());
        let config = config.with_tolerance(0.1);
        assert!(intersects_with(&a, &b, &config).unwrap());
        assert!(contains_with(&a, &b, &config).unwrap());
        let c = curve(vec![(0., 0.), (2., 0.)]);
        assert!(intersects_with(&c, &point(1., 0.05), &config).unwrap());
        assert!(!intersects(&c, &point(1., 0.05), TOL).unwrap());
    }

    // Exterior notched from the right: the notch tip runs (2, 1), (1, 2), (2, 3).
    fn notched_square() -> SurfacePatch {
        SurfacePatch::new(
            ring(vec![
                (0., 0.),
                (4., 0.),
                (4., 1.),
                (2., 1.),
                (1., 2.),
                (2., 3.),
                (4., 3.),
                (4., 4.),
                (0., 4.),
                (0., 0.),
            ]),
            Vec::new(),
            None,
        )
    }

    #[test]
    fn test_curve_through_ring_vertices() {
        let notched = surface(notched_square());
        // Enters the notch at (2, 1) and comes back at (2, 3).
        let across_notch = curve(vec![(2., 0.5), (2., 3.5)]);
        assert!(!contains(&notched, &across_notch, TOL).unwrap());
        assert!(intersects(&notched, &across_notch, TOL).unwrap());
        // Touching the notch tip from inside stays contained.
        let touching_tip = curve(vec![(1., 1.5), (1., 2.5)]);
        assert!(contains(&notched, &touching_tip, TOL).unwrap());
        let left_of_notch = curve(vec![(0.5, 0.5), (0.5, 3.5)]);
        assert!(contains(&notched, &left_of_notch, TOL).unwrap());

        // Same passage through the vertices of a hole.
        let holed = surface(SurfacePatch::new(
            ring(vec![(0., 0.), (4., 0.), (4., 4.), (0., 4.), (0., 0.)]),
            vec![ring(vec![(2., 1.), (3., 2.), (2., 3.), (1., 2.), (2., 1.)])],
            None,
        ));
        assert!(!contains(&holed, &across_notch, TOL).unwrap());
        // A patch whose exterior passes through the notch is not contained either.
        let spanning = surface(SurfacePatch::new(
            ring(vec![(2., 0.5), (2., 3.5), (0.5, 3.5), (0.5, 0.5), (2., 0.5)]),
            Vec::new(),
            None,
        ));
        assert!(!contains(&notched, &spanning, TOL).unwrap());
    }

    #[test]
    fn test_surface_surface() {
        let square = surface(unit_square());
        let overlapping = surface(SurfacePatch::new(
            ring(vec![(0.5, 0.5), (2., 0.5), (2., 2.), (0.5, 2.), (0.5, 0.5)]),
            Vec::new(),
            None,
        ));
        let inner = surface(SurfacePatch::new(
            ring(vec![(0.1, 0.1), (0.2, 0.1), (0.2, 0.2), (0.1, 0.1)]),
            Vec::new(),
            None,
        ));
        let far = surface(SurfacePatch::new(
            ring(vec![(5., 5.), (6., 5.), (6., 6.), (5., 5.)]),
            Vec::new(),
            None,
        ));
        assert!(intersects(&square, &overlapping, TOL).unwrap());
        assert!(intersects(&square, &inner, TOL).unwrap());
        assert!(intersects(&inner, &square, TOL).unwrap());
        assert!(!intersects(&square, &far, TOL).unwrap());
        assert!(contains(&square, &inner, TOL).unwrap());
        assert!(!contains(&inner, &square, TOL).unwrap());
        assert!(!contains(&square, &overlapping, TOL).unwrap());
    }

    #[test]
    fn test_aggregates() {
        let square = surface(unit_square());
        let points = Geometry::MultiPoint(MultiPoint::new(
            vec![
                Point::new(Position::new(0.5, 0.5), None),
                Point::new(Position::new(5., 5.), None),
            ],
            None,
        ));
        assert!(intersects(&square, &points, TOL).unwrap());
        assert!(intersects(&points, &square, TOL).unwrap());
        assert!(!contains(&square, &points, TOL).unwrap());

        let surfaces = Geometry::MultiSurface(MultiSurface::new(
            vec![Surface::from_patch(unit_square())],
            None,
        ));
        assert!(contains(&surfaces, &point(0.5, 0.5), TOL).unwrap());

        let empty = Geometry::MultiCurve(MultiCurve::default());
        assert!(!intersects(&square, &empty, TOL).unwrap());
        assert_eq!(
            contains(&square, &empty, TOL).unwrap_err(),
            GeometryError::EmptyAggregate
        );
    }

    #[test]
    fn test_unsupported() {
        let a = curve(vec![(0., 0.), (1., 1.)]);
        let b = curve(vec![(0., 0.), (0.5, 0.5)]);
        assert!(matches!(
            contains(&a, &b, TOL),
            Err(GeometryError::NotImplemented(_))
        ));
        assert!(matches!(
            contains(&point(0., 0.), &a, TOL),
            Err(GeometryError::NotApplicable(_))
        ));
        assert!(matches!(
            contains(&a, &surface(unit_square()), TOL),
            Err(GeometryError::NotApplicable(_))
        ));
    }
}
