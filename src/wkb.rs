//! Well-known binary encoding of the six simple geometry kinds.
//!
//! Every record starts with a byte-order byte (0 big endian, 1 little
//! endian) and a 32-bit type tag. Coordinates are always written as 2-D
//! pairs of doubles; z values are dropped.

use crate::config::DEFAULT_ACCURACY;
use crate::crs::Crs;
use crate::errors::{GeometryError, Result};
use crate::{
    Curve, CurveSegment, Geometry, MultiCurve, MultiPoint, MultiSurface, Point, Position, Ring,
    Surface, SurfacePatch,
};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use log::trace;
use std::io::Cursor;

pub const WKB_POINT: u32 = 1;
pub const WKB_LINE_STRING: u32 = 2;
pub const WKB_POLYGON: u32 = 3;
pub const WKB_MULTI_POINT: u32 = 4;
pub const WKB_MULTI_LINE_STRING: u32 = 5;
pub const WKB_MULTI_POLYGON: u32 = 6;

const COORD_SIZE: usize = 16;
const HEADER_SIZE: usize = 5;
const COUNT_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Big,
    Little,
}

impl Endianness {
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(Endianness::Big),
            1 => Ok(Endianness::Little),
            other => Err(GeometryError::Format(format!(
                "Unknown WKB byte order {}",
                other
            ))),
        }
    }

    pub fn byte(&self) -> u8 {
        match self {
            Endianness::Big => 0,
            Endianness::Little => 1,
        }
    }
}

macro_rules! read_primitive {
    ($name:ident, $ty:ty, $method:ident, $size:expr) => {
        pub fn $name(&mut self) -> Result<$ty> {
            self.require($size)?;
            let value = match self.order {
                Endianness::Big => self.cursor.$method::<BigEndian>(),
                Endianness::Little => self.cursor.$method::<LittleEndian>(),
            };
            value.map_err(|e| GeometryError::Format(e.to_string()))
        }
    };
}

macro_rules! write_primitive {
    ($name:ident, $ty:ty, $method:ident) => {
        pub fn $name(&mut self, value: $ty) {
            // Writing into a Vec cannot fail.
            let _ = match self.order {
                Endianness::Big => self.buffer.$method::<BigEndian>(value),
                Endianness::Little => self.buffer.$method::<LittleEndian>(value),
            };
        }
    };
}

/// Endian-aware reader that refuses to read past the end of its input.
pub struct WkbReader<'a> {
    cursor: Cursor<&'a [u8]>,
    order: Endianness,
}

impl<'a> WkbReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        WkbReader {
            cursor: Cursor::new(bytes),
            order: Endianness::Big,
        }
    }

    pub fn order(&self) -> Endianness {
        self.order
    }

    pub fn set_order(&mut self, order: Endianness) {
        self.order = order;
    }

    pub fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len();
        len.saturating_sub(self.cursor.position() as usize)
    }

    /// Fail unless at least `needed` bytes remain.
    pub fn require(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if needed > available {
            Err(GeometryError::TruncatedInput { needed, available })
        } else {
            Ok(())
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.require(1)?;
        self.cursor
            .read_u8()
            .map_err(|e| GeometryError::Format(e.to_string()))
    }

    read_primitive!(read_i16, i16, read_i16, 2);
    read_primitive!(read_i32, i32, read_i32, 4);
    read_primitive!(read_u32, u32, read_u32, 4);
    read_primitive!(read_i64, i64, read_i64, 8);
    read_primitive!(read_f32, f32, read_f32, 4);
    read_primitive!(read_f64, f64, read_f64, 8);

    /// A declared element count, checked against the bytes left given the
    /// minimum size of one element.
    fn read_count(&mut self, element_size: usize) -> Result<usize> {
        let count = self.read_u32()? as usize;
        self.require(count.saturating_mul(element_size))?;
        Ok(count)
    }

    /// Byte order and type tag of the next record. The order applies to the
    /// rest of the record.
    pub fn read_header(&mut self) -> Result<u32> {
        let order = Endianness::from_byte(self.read_u8()?)?;
        self.set_order(order);
        let tag = self.read_u32()?;
        trace!("WKB record tag {} ({:?})", tag, order);
        Ok(tag)
    }

    fn read_position(&mut self) -> Result<Position> {
        let x = self.read_f64()?;
        let y = self.read_f64()?;
        Ok(Position::new(x, y))
    }

    fn read_positions(&mut self) -> Result<Vec<Position>> {
        let count = self.read_count(COORD_SIZE)?;
        (0..count).map(|_| self.read_position()).collect()
    }
}

/// Endian-aware writer into an in-memory buffer.
pub struct WkbWriter {
    buffer: Vec<u8>,
    order: Endianness,
}

impl WkbWriter {
    pub fn new(order: Endianness) -> Self {
        WkbWriter {
            buffer: Vec::new(),
            order,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    write_primitive!(write_i16, i16, write_i16);
    write_primitive!(write_i32, i32, write_i32);
    write_primitive!(write_u32, u32, write_u32);
    write_primitive!(write_i64, i64, write_i64);
    write_primitive!(write_f32, f32, write_f32);
    write_primitive!(write_f64, f64, write_f64);

    fn write_header(&mut self, tag: u32) {
        self.write_u8(self.order.byte());
        self.write_u32(tag);
    }

    fn write_count(&mut self, count: usize) -> Result<()> {
        if count > u32::MAX as usize {
            return Err(GeometryError::Format(format!(
                "Count {} does not fit in a WKB record",
                count
            )));
        }
        self.write_u32(count as u32);
        Ok(())
    }

    fn write_position(&mut self, position: &Position) {
        self.write_f64(position.x);
        self.write_f64(position.y);
    }

    fn write_positions(&mut self, positions: &[Position]) -> Result<()> {
        self.write_count(positions.len())?;
        for position in positions {
            self.write_position(position);
        }
        Ok(())
    }
}

fn unexpected_tag(expected: u32, found: u32) -> GeometryError {
    GeometryError::Format(format!(
        "Expected WKB type {}, found {}",
        expected, found
    ))
}

fn expect_tag(reader: &mut WkbReader, expected: u32) -> Result<()> {
    let tag = reader.read_header()?;
    if tag == expected {
        Ok(())
    } else {
        Err(unexpected_tag(expected, tag))
    }
}

fn read_point_body(reader: &mut WkbReader, crs: &Option<Crs>) -> Result<Point> {
    Ok(Point::new(reader.read_position()?, crs.clone()))
}

fn read_curve_body(reader: &mut WkbReader, crs: &Option<Crs>) -> Result<Curve> {
    let segment = CurveSegment::new(reader.read_positions()?, crs.clone())?;
    Ok(Curve::from_segment(segment))
}

fn read_surface_body(reader: &mut WkbReader, crs: &Option<Crs>, accuracy: f64) -> Result<Surface> {
    let num_rings = reader.read_count(COUNT_SIZE)?;
    if num_rings == 0 {
        return Err(GeometryError::Format("Polygon without rings".to_string()));
    }
    let mut rings = Vec::with_capacity(num_rings);
    for _ in 0..num_rings {
        rings.push(Ring::with_accuracy(
            reader.read_positions()?,
            crs.clone(),
            accuracy,
        )?);
    }
    let exterior = rings.remove(0);
    Ok(Surface::from_patch(SurfacePatch::new(
        exterior,
        rings,
        crs.clone(),
    )))
}

fn read_members<T, F>(reader: &mut WkbReader, member_tag: u32, mut read_body: F) -> Result<Vec<T>>
where
    F: FnMut(&mut WkbReader) -> Result<T>,
{
    let count = reader.read_count(HEADER_SIZE)?;
    let mut members = Vec::with_capacity(count);
    for _ in 0..count {
        expect_tag(reader, member_tag)?;
        members.push(read_body(reader)?);
    }
    Ok(members)
}

pub fn decode_point(bytes: &[u8], crs: Option<Crs>) -> Result<Point> {
    let mut reader = WkbReader::new(bytes);
    expect_tag(&mut reader, WKB_POINT)?;
    read_point_body(&mut reader, &crs)
}

pub fn decode_curve(bytes: &[u8], crs: Option<Crs>) -> Result<Curve> {
    let mut reader = WkbReader::new(bytes);
    expect_tag(&mut reader, WKB_LINE_STRING)?;
    read_curve_body(&mut reader, &crs)
}

pub fn decode_surface(bytes: &[u8], crs: Option<Crs>) -> Result<Surface> {
    decode_surface_with_accuracy(bytes, crs, DEFAULT_ACCURACY)
}

/// Rings close when first and last position agree within `accuracy`.
pub fn decode_surface_with_accuracy(bytes: &[u8], crs: Option<Crs>, accuracy: f64) -> Result<Surface> {
    let mut reader = WkbReader::new(bytes);
    expect_tag(&mut reader, WKB_POLYGON)?;
    read_surface_body(&mut reader, &crs, accuracy)
}

pub fn decode_multi_point(bytes: &[u8], crs: Option<Crs>) -> Result<MultiPoint> {
    let mut reader = WkbReader::new(bytes);
    expect_tag(&mut reader, WKB_MULTI_POINT)?;
    let members = read_members(&mut reader, WKB_POINT, |r| read_point_body(r, &crs))?;
    Ok(MultiPoint::new(members, crs))
}

pub fn decode_multi_curve(bytes: &[u8], crs: Option<Crs>) -> Result<MultiCurve> {
    let mut reader = WkbReader::new(bytes);
    expect_tag(&mut reader, WKB_MULTI_LINE_STRING)?;
    let members = read_members(&mut reader, WKB_LINE_STRING, |r| read_curve_body(r, &crs))?;
    Ok(MultiCurve::new(members, crs))
}

pub fn decode_multi_surface(bytes: &[u8], crs: Option<Crs>) -> Result<MultiSurface> {
    decode_multi_surface_with_accuracy(bytes, crs, DEFAULT_ACCURACY)
}

pub fn decode_multi_surface_with_accuracy(
    bytes: &[u8],
    crs: Option<Crs>,
    accuracy: f64,
) -> Result<MultiSurface> {
    let mut reader = WkbReader::new(bytes);
    expect_tag(&mut reader, WKB_MULTI_POLYGON)?;
    let members = read_members(&mut reader, WKB_POLYGON, |r| {
        read_surface_body(r, &crs, accuracy)
    })?;
    Ok(MultiSurface::new(members, crs))
}

/// Decode any of the six supported kinds, dispatching on the type tag.
pub fn decode(bytes: &[u8], crs: Option<Crs>) -> Result<Geometry> {
    decode_with_accuracy(bytes, crs, DEFAULT_ACCURACY)
}

pub fn decode_with_accuracy(bytes: &[u8], crs: Option<Crs>, accuracy: f64) -> Result<Geometry> {
    let mut peek = WkbReader::new(bytes);
    let tag = peek.read_header()?;
    match tag {
        WKB_POINT => decode_point(bytes, crs).map(Geometry::Point),
        WKB_LINE_STRING => decode_curve(bytes, crs).map(Geometry::Curve),
        WKB_POLYGON => decode_surface_with_accuracy(bytes, crs, accuracy).map(Geometry::Surface),
        WKB_MULTI_POINT => decode_multi_point(bytes, crs).map(Geometry::MultiPoint),
        WKB_MULTI_LINE_STRING => decode_multi_curve(bytes, crs).map(Geometry::MultiCurve),
        WKB_MULTI_POLYGON => {
            decode_multi_surface_with_accuracy(bytes, crs, accuracy).map(Geometry::MultiSurface)
        }
        other => Err(GeometryError::Format(format!(
            "Unsupported WKB type {}",
            other
        ))),
    }
}

fn write_point(writer: &mut WkbWriter, point: &Point) {
    writer.write_header(WKB_POINT);
    writer.write_position(point.position());
}

fn write_curve(writer: &mut WkbWriter, curve: &Curve) -> Result<()> {
    writer.write_header(WKB_LINE_STRING);
    writer.write_positions(&curve.as_line_string())
}

fn write_surface(writer: &mut WkbWriter, surface: &Surface) -> Result<()> {
    if surface.num_patches() != 1 {
        return Err(GeometryError::NotImplemented(
            "WKB encoding of surfaces with several patches",
        ));
    }
    let patch = &surface.patches()[0];
    writer.write_header(WKB_POLYGON);
    writer.write_count(1 + patch.interiors().len())?;
    writer.write_positions(patch.exterior().positions())?;
    for hole in patch.interiors() {
        writer.write_positions(hole.positions())?;
    }
    Ok(())
}

/// Encode a geometry with the given byte order.
///
/// Multi geometries have no WKB form here and fail with `NotImplemented`.
pub fn encode(geometry: &Geometry, order: Endianness) -> Result<Vec<u8>> {
    let mut writer = WkbWriter::new(order);
    match geometry {
        Geometry::Point(point) => write_point(&mut writer, point),
        Geometry::Curve(curve) => write_curve(&mut writer, curve)?,
        Geometry::Surface(surface) => write_surface(&mut writer, surface)?,
        Geometry::MultiPoint(points) => {
            writer.write_header(WKB_MULTI_POINT);
            writer.write_count(points.len())?;
            for point in points {
                write_point(&mut writer, point);
            }
        }
        Geometry::MultiCurve(curves) => {
            writer.write_header(WKB_MULTI_LINE_STRING);
            writer.write_count(curves.len())?;
            for curve in curves {
                write_curve(&mut writer, curve)?;
            }
        }
        Geometry::MultiSurface(surfaces) => {
            writer.write_header(WKB_MULTI_POLYGON);
            writer.write_count(surfaces.len())?;
            for surface in surfaces {
                write_surface(&mut writer, surface)?;
            }
        }
        Geometry::MultiGeometry(_) => {
            return Err(GeometryError::NotImplemented("WKB encoding of MultiGeometry"));
        }
    }
    Ok(writer.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    fn square_with_hole() -> Surface {
        let exterior = Ring::try_from(vec![(0., 0.), (4., 0.), (4., 4.), (0., 4.), (0., 0.)]).unwrap();
        let hole = Ring::try_from(vec![(1., 1.), (1., 2.), (2., 2.), (2., 1.), (1., 1.)]).unwrap();
        Surface::from_patch(SurfacePatch::new(exterior, vec![hole], None))
    }

    fn round_trip(geometry: Geometry) {
        for order in &[Endianness::Big, Endianness::Little] {
            let bytes = encode(&geometry, *order).unwrap();
            assert_eq!(bytes[0], order.byte());
            assert_eq!(decode(&bytes, None).unwrap(), geometry);
        }
    }

    #[test]
    fn test_point_bytes() {
        let point = Geometry::Point(Point::new(Position::new(1., 2.), None));
        let bytes = encode(&point, Endianness::Little).unwrap();
        let mut expected = vec![1u8, 1, 0, 0, 0];
        expected.extend_from_slice(&1f64.to_le_bytes());
        expected.extend_from_slice(&2f64.to_le_bytes());
        assert_eq!(bytes, expected);

        let bytes = encode(&point, Endianness::Big).unwrap();
        let mut expected = vec![0u8, 0, 0, 0, 1];
        expected.extend_from_slice(&1f64.to_be_bytes());
        expected.extend_from_slice(&2f64.to_be_bytes());
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_round_trips() {
        round_trip(Geometry::Point(Point::new(Position::new(1.5, -2.5), None)));
        round_trip(Geometry::Curve(
            Curve::try_from(vec![(0., 0.), (1., 1.), (2., 0.)]).unwrap(),
        ));
        round_trip(Geometry::Surface(square_with_hole()));
        round_trip(Geometry::MultiPoint(MultiPoint::new(
            vec![
                Point::new(Position::new(0., 0.), None),
                Point::new(Position::new(1., 1.), None),
            ],
            None,
        )));
        round_trip(Geometry::MultiCurve(MultiCurve::new(
            vec![
                Curve::try_from(vec![(0., 0.), (1., 1.)]).unwrap(),
                Curve::try_from(vec![(2., 2.), (3., 3.), (4., 2.)]).unwrap(),
            ],
            None,
        )));
        round_trip(Geometry::MultiSurface(MultiSurface::new(
            vec![square_with_hole(), square_with_hole()],
            None,
        )));
    }

    #[test]
    fn test_crs_attached() {
        let point = Geometry::Point(Point::new(Position::new(1., 2.), None));
        let bytes = encode(&point, Endianness::Big).unwrap();
        let decoded = decode(&bytes, Some(Crs::new("EPSG:4326"))).unwrap();
        assert_eq!(decoded.crs(), Some(&Crs::new("EPSG:4326")));
    }

    #[test]
    fn test_z_dropped() {
        let point = Geometry::Point(Point::new(Position::new_3d(1., 2., 3.), None));
        let bytes = encode(&point, Endianness::Big).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + COORD_SIZE);
        let decoded = decode_point(&bytes, None).unwrap();
        assert_eq!(decoded.z(), None);
    }

    #[test]
    fn test_truncated_input() {
        let curve = Geometry::Curve(Curve::try_from(vec![(0., 0.), (1., 1.), (2., 0.)]).unwrap());
        let bytes = encode(&curve, Endianness::Little).unwrap();
        // Header (5) + count (4) + 3 coordinates (48); drop the last byte.
        let truncated = &bytes[..bytes.len() - 1];
        assert_eq!(
            decode(truncated, None).unwrap_err(),
            GeometryError::TruncatedInput {
                needed: 48,
                available: 47
            }
        );

        // A count far larger than the buffer is rejected before reading.
        let mut lying = vec![1u8, 2, 0, 0, 0];
        lying.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            decode(&lying, None),
            Err(GeometryError::TruncatedInput { .. })
        ));

        assert_eq!(
            decode(&[1u8, 1, 0], None).unwrap_err(),
            GeometryError::TruncatedInput {
                needed: 4,
                available: 2
            }
        );
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(
            decode(&[7u8, 1, 0, 0, 0], None),
            Err(GeometryError::Format(_))
        ));
        assert!(matches!(
            decode(&[1u8, 99, 0, 0, 0], None),
            Err(GeometryError::Format(_))
        ));
        let point = encode(
            &Geometry::Point(Point::new(Position::new(1., 2.), None)),
            Endianness::Big,
        )
        .unwrap();
        assert!(matches!(
            decode_curve(&point, None),
            Err(GeometryError::Format(_))
        ));
    }

    #[test]
    fn test_unsupported_encodings() {
        let mg = Geometry::MultiGeometry(Default::default());
        assert!(matches!(
            encode(&mg, Endianness::Big),
            Err(GeometryError::NotImplemented(_))
        ));
    }

    #[test]
    fn test_primitives() {
        let mut writer = WkbWriter::new(Endianness::Big);
        writer.write_i16(-2);
        writer.write_i32(-70000);
        writer.write_i64(1 << 40);
        writer.write_f32(1.5);
        writer.write_f64(-0.25);
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 2 + 4 + 8 + 4 + 8);
        let mut reader = WkbReader::new(&bytes);
        assert_eq!(reader.read_i16().unwrap(), -2);
        assert_eq!(reader.read_i32().unwrap(), -70000);
        assert_eq!(reader.read_i64().unwrap(), 1 << 40);
        assert_eq!(reader.read_f32().unwrap(), 1.5);
        assert_eq!(reader.read_f64().unwrap(), -0.25);
        assert_eq!(reader.remaining(), 0);
        assert!(reader.read_u8().is_err());
    }
}
