use crate::errors::{GeometryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a coordinate reference system, e.g. `EPSG:4326`.
///
/// Only the name is carried; definition and transformation live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crs(String);

impl Crs {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Crs(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// True for the usual spellings of geographic WGS84 (EPSG:4326).
    pub fn is_epsg_4326(&self) -> bool {
        let name = self.0.to_ascii_uppercase();
        name == "EPSG:4326"
            || name == "URN:OGC:DEF:CRS:EPSG::4326"
            || name == "URN:OGC:DEF:CRS:EPSG:6.6:4326"
            || name.ends_with("EPSG.XML#4326")
            || name.ends_with("/EPSG/0/4326")
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Crs {
    fn from(name: &str) -> Self {
        Crs::new(name)
    }
}

/// Combine two optional systems: an unset side adopts the other, two set
/// sides must be equal.
pub(crate) fn merge_crs(left: Option<&Crs>, right: Option<&Crs>) -> Result<Option<Crs>> {
    match (left, right) {
        (Some(l), Some(r)) if l != r => Err(GeometryError::CrsMismatch {
            left: l.to_string(),
            right: r.to_string(),
        }),
        (Some(l), _) => Ok(Some(l.clone())),
        (None, r) => Ok(r.cloned()),
    }
}
