use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeometryError>;

/// A construction-time invariant that the caller's input broke.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("Ring is not closed: first and last positions are not equal")]
    RingNotClosed,

    #[error("Ring has {count} positions, at least 3 are required")]
    TooFewRingPositions { count: usize },

    #[error("End of segment {index} does not match start of the following segment")]
    DiscontinuousSegments { index: usize },

    #[error("Curve segment has no positions")]
    EmptySegment,

    #[error("Curve has no segments")]
    EmptyCurve,

    #[error("Surface has no patches")]
    EmptySurface,

    #[error("Expected a {expected}, found a {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid orientation tag {0:?}, expected '+' or '-'")]
    InvalidOrientation(char),

    #[error("Position has {0} ordinates, expected 2 or 3")]
    InvalidDimension(usize),

    #[error("Ordinate array of length {len} is not a multiple of dimension {dimension}")]
    RaggedOrdinates { len: usize, dimension: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Invalid construction: {0}")]
    ConstructionInvariant(#[from] InvariantViolation),

    #[error("Index {index} out of range for length {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Not applicable: {0}")]
    NotApplicable(&'static str),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Coordinate systems {left} and {right} do not match")]
    CrsMismatch { left: String, right: String },

    #[error("Truncated input: needed {needed} bytes, {available} available")]
    TruncatedInput { needed: usize, available: usize },

    #[error("Aggregate has no members")]
    EmptyAggregate,

    #[error("Points are collinear, no circle passes through them")]
    Collinear,

    #[error("Invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

impl GeometryError {
    pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
        if index < len {
            Ok(())
        } else {
            Err(GeometryError::InvalidIndex { index, len })
        }
    }
}
