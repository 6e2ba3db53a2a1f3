use crate::errors::{GeometryError, Result};
use crate::{Curve, Envelope, Geometry, Point, Position, Surface};
use std::fmt::Write;

fn write_position(out: &mut String, position: &Position) {
    let _ = match position.z {
        Some(z) => write!(out, "{} {} {}", position.x, position.y, z),
        None => write!(out, "{} {}", position.x, position.y),
    };
}

fn write_positions(out: &mut String, positions: &[Position]) {
    out.push('(');
    for (i, position) in positions.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_position(out, position);
    }
    out.push(')');
}

fn write_point_body(out: &mut String, point: &Point) {
    out.push('(');
    write_position(out, point.position());
    out.push(')');
}

fn write_curve_body(out: &mut String, curve: &Curve) {
    write_positions(out, &curve.as_line_string());
}

fn write_surface_body(out: &mut String, surface: &Surface) -> Result<()> {
    if surface.num_patches() != 1 {
        return Err(GeometryError::NotImplemented(
            "WKT for surfaces with several patches",
        ));
    }
    let patch = &surface.patches()[0];
    out.push('(');
    write_positions(out, patch.exterior().positions());
    for hole in patch.interiors() {
        out.push(',');
        write_positions(out, hole.positions());
    }
    out.push(')');
    Ok(())
}

/// Write `members` as a parenthesised list, or `EMPTY`.
fn write_members<'a, T: 'a, I, F>(out: &mut String, members: I, mut write_member: F) -> Result<()>
where
    I: ExactSizeIterator<Item = &'a T>,
    F: FnMut(&mut String, &T) -> Result<()>,
{
    if members.len() == 0 {
        out.push_str(" EMPTY");
        return Ok(());
    }
    out.push('(');
    for (i, member) in members.enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_member(out, member)?;
    }
    out.push(')');
    Ok(())
}

/// Keyword of a geometry, with a ` Z` tag when its positions are 3-D.
fn write_keyword(out: &mut String, keyword: &str, geometry: &Geometry) {
    out.push_str(keyword);
    if let Ok(3) = geometry.coordinate_dimension() {
        out.push_str(" Z");
    }
}

fn write_geometry(out: &mut String, geometry: &Geometry) -> Result<()> {
    match geometry {
        Geometry::Point(point) => {
            write_keyword(out, "POINT", geometry);
            write_point_body(out, point);
        }
        Geometry::Curve(curve) => {
            write_keyword(out, "LINESTRING", geometry);
            write_curve_body(out, curve);
        }
        Geometry::Surface(surface) => {
            write_keyword(out, "POLYGON", geometry);
            write_surface_body(out, surface)?;
        }
        Geometry::MultiPoint(points) => {
            write_keyword(out, "MULTIPOINT", geometry);
            write_members(out, points.iter(), |out, point| {
                write_point_body(out, point);
                Ok(())
            })?;
        }
        Geometry::MultiCurve(curves) => {
            write_keyword(out, "MULTILINESTRING", geometry);
            write_members(out, curves.iter(), |out, curve| {
                write_curve_body(out, curve);
                Ok(())
            })?;
        }
        Geometry::MultiSurface(surfaces) => {
            write_keyword(out, "MULTIPOLYGON", geometry);
            write_members(out, surfaces.iter(), write_surface_body)?;
        }
        Geometry::MultiGeometry(members) => {
            out.push_str("GEOMETRYCOLLECTION");
            write_members(out, members.iter(), write_geometry)?;
        }
    }
    Ok(())
}

/// Well-known text of a geometry. Coordinates are written with the shortest
/// representation that reads back to the same value; 3-D geometries carry
/// the `Z` tag (`POINT Z(1 2 3)`).
pub fn to_wkt(geometry: &Geometry) -> Result<String> {
    let mut out = String::new();
    write_geometry(&mut out, geometry)?;
    Ok(out)
}

/// `BOX3D(minx miny[ minz],maxx maxy[ maxz])`.
pub fn envelope_to_box3d(envelope: &Envelope) -> String {
    let mut out = String::from("BOX3D(");
    write_position(&mut out, envelope.min());
    out.push(',');
    write_position(&mut out, envelope.max());
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_wkt::{envelope_from_box3d, geometry_from_wkt};
    use crate::{MultiCurve, MultiGeometry, MultiPoint, MultiSurface, Ring, SurfacePatch};
    use std::convert::TryFrom;

    fn square_with_hole(offset: f64) -> Surface {
        let exterior = Ring::try_from(vec![
            (offset, 0.),
            (offset + 4., 0.),
            (offset + 4., 4.),
            (offset, 4.),
            (offset, 0.),
        ])
        .unwrap();
        let hole = Ring::try_from(vec![
            (offset + 1., 1.),
            (offset + 1., 2.5),
            (offset + 2., 2.5),
            (offset + 1., 1.),
        ])
        .unwrap();
        Surface::from_patch(SurfacePatch::new(exterior, vec![hole], None))
    }

    fn round_trip(geometry: Geometry) {
        let text = to_wkt(&geometry).unwrap();
        assert_eq!(geometry_from_wkt(&text, None).unwrap(), geometry, "{}", text);
    }

    #[test]
    fn test_text() {
        let point = Geometry::Point(Point::new(Position::new(1., 2.5), None));
        assert_eq!(to_wkt(&point).unwrap(), "POINT(1 2.5)");
        let curve = Geometry::Curve(Curve::try_from(vec![(0., 0.), (1., -1.)]).unwrap());
        assert_eq!(to_wkt(&curve).unwrap(), "LINESTRING(0 0,1 -1)");
        let surface = Geometry::Surface(square_with_hole(0.));
        assert_eq!(
            to_wkt(&surface).unwrap(),
            "POLYGON((0 0,4 0,4 4,0 4,0 0),(1 1,1 2.5,2 2.5,1 1))"
        );
        let empty = Geometry::MultiPoint(MultiPoint::default());
        assert_eq!(to_wkt(&empty).unwrap(), "MULTIPOINT EMPTY");
    }

    #[test]
    fn test_round_trips() {
        round_trip(Geometry::Point(Point::new(Position::new(0.1, 1e-7), None)));
        round_trip(Geometry::Curve(
            Curve::try_from(vec![(0., 0.), (1.25, 1.), (2., -0.3)]).unwrap(),
        ));
        round_trip(Geometry::Surface(square_with_hole(0.)));
        round_trip(Geometry::MultiPoint(MultiPoint::new(
            vec![
                Point::new(Position::new(2., 3.), None),
                Point::new(Position::new(7., 8.), None),
            ],
            None,
        )));
        round_trip(Geometry::MultiCurve(MultiCurve::new(
            vec![
                Curve::try_from(vec![(1., 1.), (5., 5.)]).unwrap(),
                Curve::try_from(vec![(1., 3.), (3., 1.)]).unwrap(),
            ],
            None,
        )));
        round_trip(Geometry::MultiSurface(MultiSurface::new(
            vec![square_with_hole(0.), square_with_hole(10.)],
            None,
        )));
        round_trip(Geometry::MultiGeometry(MultiGeometry::new(
            vec![
                Geometry::Point(Point::new(Position::new(1., 2.), None)),
                Geometry::Surface(square_with_hole(0.)),
            ],
            None,
        )));
    }

    #[test]
    fn test_3d_text() {
        let point = Geometry::Point(Point::new(Position::new_3d(1., 2., 3.), None));
        assert_eq!(to_wkt(&point).unwrap(), "POINT Z(1 2 3)");
        let curve = Geometry::Curve(Curve::try_from(vec![(0., 0., 1.), (1., 1., 2.)]).unwrap());
        assert_eq!(to_wkt(&curve).unwrap(), "LINESTRING Z(0 0 1,1 1 2)");
        let collection = Geometry::MultiGeometry(MultiGeometry::new(vec![point.clone(), curve], None));
        assert_eq!(
            to_wkt(&collection).unwrap(),
            "GEOMETRYCOLLECTION(POINT Z(1 2 3),LINESTRING Z(0 0 1,1 1 2))"
        );
    }

    #[test]
    fn test_3d_round_trips() {
        round_trip(Geometry::Point(Point::new(Position::new_3d(1., 2., 3.), None)));
        round_trip(Geometry::Curve(
            Curve::try_from(vec![(0., 0., -1.5), (1.25, 1., 0.), (2., -0.3, 7.)]).unwrap(),
        ));
        let exterior = Ring::try_from(vec![
            (0., 0., 1.),
            (4., 0., 1.),
            (4., 4., 2.),
            (0., 4., 2.),
            (0., 0., 1.),
        ])
        .unwrap();
        let surface = Surface::from_patch(SurfacePatch::new(exterior, Vec::new(), None));
        round_trip(Geometry::Surface(surface.clone()));
        round_trip(Geometry::MultiSurface(MultiSurface::new(vec![surface], None)));
        round_trip(Geometry::MultiPoint(MultiPoint::new(
            vec![
                Point::new(Position::new_3d(2., 3., 4.), None),
                Point::new(Position::new_3d(7., 8., 9.), None),
            ],
            None,
        )));
        round_trip(Geometry::MultiGeometry(MultiGeometry::new(
            vec![
                Geometry::Point(Point::new(Position::new_3d(1., 2., 3.), None)),
                Geometry::Point(Point::new(Position::new(1., 2.), None)),
            ],
            None,
        )));
    }

    #[test]
    fn test_box3d() {
        let envelope = Envelope::new(
            Position::new_3d(1., 2., 3.),
            Position::new_3d(4., 5., 6.),
            None,
        );
        let text = envelope_to_box3d(&envelope);
        assert_eq!(text, "BOX3D(1 2 3,4 5 6)");
        assert_eq!(envelope_from_box3d(&text, None).unwrap(), envelope);
        let flat = Envelope::from_bounds(0., 0., 1., 1., None);
        assert_eq!(envelope_to_box3d(&flat), "BOX3D(0 0,1 1)");
    }

    #[test]
    fn test_multi_patch_surface() {
        let first = square_with_hole(0.).patches()[0].clone();
        let second = square_with_hole(10.).patches()[0].clone();
        let surface = Geometry::Surface(Surface::new(vec![first, second], None).unwrap());
        assert!(matches!(
            to_wkt(&surface),
            Err(GeometryError::NotImplemented(_))
        ));
    }
}
