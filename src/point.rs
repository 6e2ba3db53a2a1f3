use crate::crs::Crs;
use crate::envelope::{Envelope, HasEnvelope};
use crate::errors::Result;
use crate::Position;
use serde::{Deserialize, Serialize};

/// A single position tagged with a coordinate system.
///
/// Its derived attributes are the position itself, so nothing is cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    position: Position,
    crs: Option<Crs>,
}

impl Point {
    pub fn new(position: Position, crs: Option<Crs>) -> Self {
        Point { position, crs }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn z(&self) -> Option<f64> {
        self.position.z
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn set_crs(&mut self, crs: Option<Crs>) {
        self.crs = crs;
    }

    pub fn coordinate_dimension(&self) -> usize {
        self.position.dimension()
    }

    pub fn translate(&mut self, offset: &[f64]) {
        self.position = self.position.translate(offset);
    }

    pub fn centroid(&self) -> Point {
        self.clone()
    }

    pub fn approx_eq(&self, other: &Point, accuracy: f64) -> bool {
        self.position.approx_eq(&other.position, accuracy)
    }
}

impl HasEnvelope for Point {
    fn envelope(&self) -> Result<Envelope> {
        Ok(Envelope::new(self.position, self.position, self.crs.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let p = Point::new(Position::new(1., 2.), Some(Crs::new("EPSG:4326")));
        assert_eq!((p.x(), p.y(), p.z()), (1., 2., None));
        assert_eq!(p.coordinate_dimension(), 2);
        assert_eq!(p.crs(), Some(&Crs::new("EPSG:4326")));

        let p = Point::new(Position::new_3d(1., 2., 3.), None);
        assert_eq!(p.z(), Some(3.));
        assert_eq!(p.coordinate_dimension(), 3);
        assert_eq!(p.centroid(), p);
    }

    #[test]
    fn test_translate() {
        let mut p = Point::new(Position::new_3d(1., 2., 3.), None);
        p.translate(&[1., -1., 2.]);
        assert_eq!(p.position(), &Position::new_3d(2., 1., 5.));

        // No z to move on a 2-D point
        let mut p = Point::new(Position::new(1., 2.), None);
        p.translate(&[1., 1., 1.]);
        assert_eq!(p.position(), &Position::new(2., 3.));
    }

    #[test]
    fn test_envelope_is_degenerate() {
        let mut p = Point::new(Position::new(1., 2.), None);
        p.set_crs(Some(Crs::new("EPSG:25832")));
        let envelope = p.envelope().unwrap();
        assert_eq!(envelope.min(), envelope.max());
        assert_eq!(envelope.min(), &Position::new(1., 2.));
        assert_eq!(envelope.crs(), Some(&Crs::new("EPSG:25832")));
    }

    #[test]
    fn test_approx_eq() {
        let a = Point::new(Position::new(1., 2.), None);
        assert!(a.approx_eq(&Point::new(Position::new(1.0005, 2.), None), 1e-3));
        assert!(!a.approx_eq(&Point::new(Position::new(1.01, 2.), None), 1e-3));
        assert!(!a.approx_eq(&Point::new(Position::new_3d(1., 2., 0.), None), 1e-3));
    }

    #[test]
    fn test_serde() {
        let p = Point::new(Position::new_3d(1., 2., 3.), Some(Crs::new("EPSG:4326")));
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(serde_json::from_str::<Point>(&json).unwrap(), p);
    }
}
