use crate::config::DEFAULT_ACCURACY;
use crate::crs::Crs;
use crate::errors::{GeometryError, Result};
use crate::{
    Curve, CurveSegment, Envelope, Geometry, MultiCurve, MultiGeometry, MultiPoint,
    MultiSurface, Point, Position, Ring, Surface, SurfacePatch,
};
use wkt::types;
use wkt::types::Coord;

impl From<Coord<f64>> for Position {
    fn from(coord: Coord<f64>) -> Self {
        Position {
            x: coord.x,
            y: coord.y,
            z: coord.z,
        }
    }
}

fn format_error<E: ToString>(e: E) -> GeometryError {
    GeometryError::Format(e.to_string())
}

/// Third ordinates in text order, one entry per coordinate.
type ZValues = std::vec::IntoIter<Option<f64>>;

fn coord_to_position(coord: Coord<f64>, zs: &mut ZValues) -> Position {
    let z = zs.next().flatten();
    Position {
        z: z.or(coord.z),
        ..Position::from(coord)
    }
}

fn linestring_to_positions(linestring: types::LineString<f64>, zs: &mut ZValues) -> Vec<Position> {
    linestring
        .0
        .into_iter()
        .map(|coord| coord_to_position(coord, zs))
        .collect()
}

/// The `wkt` tokenizer reads two ordinates per coordinate. Strip `Z` tags
/// and third ordinates from the text, returning the 2-D text and the z of
/// every coordinate in order.
fn split_z(wkt_str: &str) -> Result<(String, Vec<Option<f64>>)> {
    let mut flat = String::with_capacity(wkt_str.len());
    let mut zs = Vec::new();
    let mut rest = wkt_str;
    loop {
        let end = rest
            .find(|c: char| c == '(' || c == ')' || c == ',')
            .unwrap_or_else(|| rest.len());
        let (chunk, tail) = rest.split_at(end);
        flatten_chunk(chunk, &mut flat, &mut zs)?;
        match tail.chars().next() {
            Some(delimiter) => {
                flat.push(delimiter);
                rest = &tail[delimiter.len_utf8()..];
            }
            None => break,
        }
    }
    Ok((flat, zs))
}

fn flatten_chunk(chunk: &str, flat: &mut String, zs: &mut Vec<Option<f64>>) -> Result<()> {
    let words: Vec<&str> = chunk.split_whitespace().collect();
    let is_coordinate = !words.is_empty() && words.iter().all(|w| w.parse::<f64>().is_ok());
    if !is_coordinate {
        let kept: Vec<&str> = words
            .into_iter()
            .filter(|w| !w.eq_ignore_ascii_case("Z"))
            .collect();
        flat.push_str(&kept.join(" "));
        return Ok(());
    }
    match words.as_slice() {
        [_, _] => zs.push(None),
        [_, _, z] => zs.push(z.parse::<f64>().ok()),
        _ => {
            return Err(GeometryError::Format(format!(
                "Expected 2 or 3 ordinates, found '{}'",
                chunk.trim()
            )))
        }
    }
    flat.push_str(words[0]);
    flat.push(' ');
    flat.push_str(words[1]);
    Ok(())
}

/// Parse every geometry in a WKT string. 3-D coordinates are accepted with
/// or without the `Z` tag.
pub fn parse_wkt(wkt_str: &str, crs: Option<Crs>) -> Result<Vec<Geometry>> {
    parse_wkt_with_accuracy(wkt_str, crs, DEFAULT_ACCURACY)
}

/// [`parse_wkt`], closing rings within `accuracy`.
pub fn parse_wkt_with_accuracy(wkt_str: &str, crs: Option<Crs>, accuracy: f64) -> Result<Vec<Geometry>> {
    let (flat, zs) = split_z(wkt_str)?;
    let mut zs = zs.into_iter();
    let wkt_geoms = wkt::Wkt::from_str(&flat).map_err(format_error)?;
    wkt_geoms
        .items
        .into_iter()
        .map(|geom| from_wkt_geometry(geom, &crs, accuracy, &mut zs))
        .collect()
}

/// Parse a WKT string holding exactly one geometry.
pub fn geometry_from_wkt(wkt_str: &str, crs: Option<Crs>) -> Result<Geometry> {
    geometry_from_wkt_with_accuracy(wkt_str, crs, DEFAULT_ACCURACY)
}

pub fn geometry_from_wkt_with_accuracy(wkt_str: &str, crs: Option<Crs>, accuracy: f64) -> Result<Geometry> {
    let mut geoms = parse_wkt_with_accuracy(wkt_str, crs, accuracy)?;
    if geoms.len() != 1 {
        return Err(GeometryError::Format(format!(
            "Expected one WKT geometry, found {}",
            geoms.len()
        )));
    }
    Ok(geoms.remove(0))
}

fn from_wkt_geometry(
    geom: wkt::Geometry<f64>,
    crs: &Option<Crs>,
    accuracy: f64,
    zs: &mut ZValues,
) -> Result<Geometry> {
    match geom {
        wkt::Geometry::Point(p) => from_wkt_point(p, crs, zs).map(Geometry::Point),
        wkt::Geometry::LineString(ls) => from_wkt_linestring(ls, crs, zs).map(Geometry::Curve),
        wkt::Geometry::Polygon(p) => from_wkt_polygon(p, crs, accuracy, zs).map(Geometry::Surface),
        wkt::Geometry::MultiPoint(mp) => {
            let points = mp
                .0
                .into_iter()
                .map(|p| from_wkt_point(p, crs, zs))
                .collect::<Result<Vec<Point>>>()?;
            Ok(Geometry::MultiPoint(MultiPoint::new(points, crs.clone())))
        }
        wkt::Geometry::MultiLineString(mls) => {
            let curves = mls
                .0
                .into_iter()
                .map(|ls| from_wkt_linestring(ls, crs, zs))
                .collect::<Result<Vec<Curve>>>()?;
            Ok(Geometry::MultiCurve(MultiCurve::new(curves, crs.clone())))
        }
        wkt::Geometry::MultiPolygon(mpoly) => {
            let surfaces = mpoly
                .0
                .into_iter()
                .map(|p| from_wkt_polygon(p, crs, accuracy, zs))
                .collect::<Result<Vec<Surface>>>()?;
            Ok(Geometry::MultiSurface(MultiSurface::new(
                surfaces,
                crs.clone(),
            )))
        }
        wkt::Geometry::GeometryCollection(gc) => {
            let members = gc
                .0
                .into_iter()
                .map(|g| from_wkt_geometry(g, crs, accuracy, zs))
                .collect::<Result<Vec<Geometry>>>()?;
            Ok(Geometry::MultiGeometry(MultiGeometry::new(
                members,
                crs.clone(),
            )))
        }
    }
}

fn from_wkt_point(pt: types::Point<f64>, crs: &Option<Crs>, zs: &mut ZValues) -> Result<Point> {
    let coord = pt
        .0
        .ok_or_else(|| GeometryError::Format("Empty point".to_string()))?;
    Ok(Point::new(coord_to_position(coord, zs), crs.clone()))
}

fn from_wkt_linestring(ls: types::LineString<f64>, crs: &Option<Crs>, zs: &mut ZValues) -> Result<Curve> {
    let segment = CurveSegment::new(linestring_to_positions(ls, zs), crs.clone())?;
    Ok(Curve::from_segment(segment))
}

fn from_wkt_polygon(
    poly: types::Polygon<f64>,
    crs: &Option<Crs>,
    accuracy: f64,
    zs: &mut ZValues,
) -> Result<Surface> {
    let mut rings = poly
        .0
        .into_iter()
        .map(|ls| Ring::with_accuracy(linestring_to_positions(ls, zs), crs.clone(), accuracy))
        .collect::<Result<Vec<Ring>>>()?;
    if rings.is_empty() {
        return Err(GeometryError::Format("Empty polygon".to_string()));
    }
    let exterior = rings.remove(0);
    Ok(Surface::from_patch(SurfacePatch::new(
        exterior,
        rings,
        crs.clone(),
    )))
}

/// Parse `BOX3D(minx miny[ minz],maxx maxy[ maxz])`.
pub fn envelope_from_box3d(text: &str, crs: Option<Crs>) -> Result<Envelope> {
    let text = text.trim();
    let bad = || GeometryError::Format(format!("Invalid BOX3D: {}", text));
    let body = match (text.get(..5), text.get(5..)) {
        (Some(keyword), Some(body)) if keyword.eq_ignore_ascii_case("BOX3D") => body.trim(),
        _ => return Err(bad()),
    };
    if !body.starts_with('(') || !body.ends_with(')') {
        return Err(bad());
    }
    let corners = body[1..body.len() - 1]
        .split(',')
        .map(|corner| {
            let ordinates = corner
                .split_whitespace()
                .map(|o| o.parse::<f64>().map_err(|_| bad()))
                .collect::<Result<Vec<f64>>>()?;
            Position::from_ordinates(&ordinates)
        })
        .collect::<Result<Vec<Position>>>()?;
    match corners.as_slice() {
        [min, max] => Ok(Envelope::new(*min, *max, crs)),
        _ => Err(bad()),
    }
}
