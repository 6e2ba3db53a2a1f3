use crate::boundary::{Boundary, CurveBoundary};
use crate::config::DEFAULT_ACCURACY;
use crate::crs::{merge_crs, Crs};
use crate::derived::DerivedCell;
use crate::envelope::{Envelope, HasEnvelope};
use crate::errors::{GeometryError, InvariantViolation, Result};
use crate::{CurveSegment, Geometry, MultiCurve, Point, Position};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Traversal direction of a curve. Storage order never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Forward
    }
}

impl Orientation {
    /// Parse the ISO 19107 orientation character.
    pub fn from_tag(tag: char) -> Result<Self> {
        match tag {
            '+' => Ok(Orientation::Forward),
            '-' => Ok(Orientation::Reverse),
            _ => Err(InvariantViolation::InvalidOrientation(tag).into()),
        }
    }

    pub fn tag(&self) -> char {
        match self {
            Orientation::Forward => '+',
            Orientation::Reverse => '-',
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Orientation::Forward => Orientation::Reverse,
            Orientation::Reverse => Orientation::Forward,
        }
    }
}

#[derive(Debug, Clone)]
struct CurveDerived {
    envelope: Envelope,
    centroid: Position,
    length: f64,
    boundary: Boundary,
}

/// An ordered, C0-continuous sequence of curve segments.
#[derive(Debug, Clone)]
pub struct Curve {
    segments: Vec<CurveSegment>,
    orientation: Orientation,
    crs: Option<Crs>,
    accuracy: f64,
    derived: DerivedCell<CurveDerived>,
}

impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
            && self.orientation == other.orientation
            && self.crs == other.crs
    }
}

/// Check that each segment starts where the previous one ended.
pub(crate) fn check_continuity(segments: &[CurveSegment], accuracy: f64) -> Result<()> {
    for (index, pair) in segments.windows(2).enumerate() {
        if !pair[0].end().approx_eq(&pair[1].start(), accuracy) {
            return Err(InvariantViolation::DiscontinuousSegments { index }.into());
        }
    }
    Ok(())
}

impl<IP: Into<Position>> TryFrom<Vec<IP>> for Curve {
    type Error = GeometryError;

    fn try_from(positions: Vec<IP>) -> Result<Self> {
        Ok(Curve::from_segment(CurveSegment::try_from(positions)?))
    }
}

impl Curve {
    pub fn new(segments: Vec<CurveSegment>, crs: Option<Crs>) -> Result<Self> {
        Curve::with_accuracy(segments, crs, DEFAULT_ACCURACY)
    }

    pub fn with_accuracy(segments: Vec<CurveSegment>, crs: Option<Crs>, accuracy: f64) -> Result<Self> {
        Curve::with_orientation(segments, Orientation::Forward, crs, accuracy)
    }

    pub fn with_orientation(
        segments: Vec<CurveSegment>,
        orientation: Orientation,
        crs: Option<Crs>,
        accuracy: f64,
    ) -> Result<Self> {
        if segments.is_empty() {
            return Err(InvariantViolation::EmptyCurve.into());
        }
        check_continuity(&segments, accuracy)?;
        let crs = match crs {
            Some(crs) => Some(crs),
            None => segments[0].crs().cloned(),
        };
        Ok(Curve {
            segments,
            orientation,
            crs,
            accuracy,
            derived: DerivedCell::new(),
        })
    }

    pub fn from_segment(segment: CurveSegment) -> Self {
        let crs = segment.crs().cloned();
        Curve {
            segments: vec![segment],
            orientation: Orientation::Forward,
            crs,
            accuracy: DEFAULT_ACCURACY,
            derived: DerivedCell::new(),
        }
    }

    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Result<&CurveSegment> {
        GeometryError::check_index(index, self.segments.len())?;
        Ok(&self.segments[index])
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn set_crs(&mut self, crs: Option<Crs>) {
        for segment in self.segments.iter_mut() {
            segment.set_crs(crs.clone());
        }
        self.crs = crs;
        self.derived.invalidate();
    }

    pub fn coordinate_dimension(&self) -> usize {
        self.segments[0].coordinate_dimension()
    }

    /// The full position run in traversal order. Positions shared by
    /// adjacent segments appear once.
    pub fn as_line_string(&self) -> Vec<Position> {
        let capacity = self.segments.iter().map(|s| s.len()).sum();
        let mut positions: Vec<Position> = Vec::with_capacity(capacity);
        match self.orientation {
            Orientation::Forward => {
                for segment in &self.segments {
                    push_run(&mut positions, segment.positions().iter());
                }
            }
            Orientation::Reverse => {
                for segment in self.segments.iter().rev() {
                    push_run(&mut positions, segment.positions().iter().rev());
                }
            }
        }
        positions
    }

    pub fn start_position(&self) -> Position {
        match self.orientation {
            Orientation::Forward => self.segments[0].start(),
            Orientation::Reverse => self.segments[self.segments.len() - 1].end(),
        }
    }

    pub fn end_position(&self) -> Position {
        match self.orientation {
            Orientation::Forward => self.segments[self.segments.len() - 1].end(),
            Orientation::Reverse => self.segments[0].start(),
        }
    }

    pub fn start_point(&self) -> Point {
        Point::new(self.start_position(), self.crs.clone())
    }

    pub fn end_point(&self) -> Point {
        Point::new(self.end_position(), self.crs.clone())
    }

    pub fn is_closed(&self) -> bool {
        self.start_position()
            .approx_eq(&self.end_position(), self.accuracy)
    }

    /// Same storage traversed the other way.
    pub fn reversed(&self) -> Curve {
        Curve {
            segments: self.segments.clone(),
            orientation: self.orientation.flipped(),
            crs: self.crs.clone(),
            accuracy: self.accuracy,
            derived: DerivedCell::new(),
        }
    }

    pub fn translate(&mut self, offset: &[f64]) {
        for segment in self.segments.iter_mut() {
            segment.translate(offset);
        }
        self.derived.invalidate();
    }

    fn derived(&self) -> &CurveDerived {
        self.derived.get_or_init(|| self.calculate_derived())
    }

    fn calculate_derived(&self) -> CurveDerived {
        let positions = self.as_line_string();
        let mut envelope = Envelope::new(positions[0], positions[0], self.crs.clone());
        for position in &positions[1..] {
            envelope.expand_to(position);
        }
        let length: f64 = self.segments.iter().map(|s| s.length()).sum();
        let centroid = line_centroid(&positions, length);
        let boundary = if self.is_closed() {
            Boundary::Empty
        } else {
            Boundary::Curve(CurveBoundary {
                start: self.start_position(),
                end: self.end_position(),
            })
        };
        CurveDerived {
            envelope,
            centroid,
            length,
            boundary,
        }
    }

    pub fn length(&self) -> f64 {
        self.derived().length
    }

    pub fn centroid(&self) -> Point {
        Point::new(self.derived().centroid, self.crs.clone())
    }

    pub fn boundary(&self) -> &Boundary {
        &self.derived().boundary
    }

    /// Splice two curves sharing an end point into one curve. Curves that do
    /// not touch come back as a two-member multi curve.
    ///
    /// End points match only if both are 2-D or both are 3-D and agree on
    /// every ordinate within the curve's accuracy.
    pub fn union(&self, other: &Curve) -> Result<Geometry> {
        let accuracy = self.accuracy.max(other.accuracy);
        let mine = self.as_line_string();
        let theirs = other.as_line_string();
        let (my_start, my_end) = (mine[0], mine[mine.len() - 1]);
        let (their_start, their_end) = (theirs[0], theirs[theirs.len() - 1]);

        let spliced: Option<Vec<Position>> = if my_end.approx_eq(&their_start, accuracy) {
            Some(concat(&mine, theirs.iter()))
        } else if my_end.approx_eq(&their_end, accuracy) {
            Some(concat(&mine, theirs.iter().rev()))
        } else if my_start.approx_eq(&their_end, accuracy) {
            Some(concat(&theirs, mine.iter()))
        } else if my_start.approx_eq(&their_start, accuracy) {
            let reversed: Vec<Position> = theirs.iter().rev().copied().collect();
            Some(concat(&reversed, mine.iter()))
        } else {
            None
        };

        let crs = merge_crs(self.crs(), other.crs())?;
        match spliced {
            Some(positions) => {
                let segment = CurveSegment::new(positions, crs.clone())?;
                let curve = Curve::with_accuracy(vec![segment], crs, accuracy)?;
                Ok(Geometry::Curve(curve))
            }
            None => Ok(Geometry::MultiCurve(MultiCurve::new(
                vec![self.clone(), other.clone()],
                crs,
            ))),
        }
    }
}

fn push_run<'a>(positions: &mut Vec<Position>, run: impl Iterator<Item = &'a Position>) {
    let skip = if positions.is_empty() { 0 } else { 1 };
    positions.extend(run.skip(skip).copied());
}

/// `head` followed by `tail` without its first (shared) position.
fn concat<'a>(head: &[Position], tail: impl Iterator<Item = &'a Position>) -> Vec<Position> {
    let mut positions = head.to_vec();
    positions.extend(tail.skip(1));
    positions
}

/// Length-weighted mean of segment midpoints; a curve of zero length falls
/// back to the mean of its positions.
fn line_centroid(positions: &[Position], length: f64) -> Position {
    if length == 0. {
        return crate::algorithms::polygon_area::mean_position(positions);
    }
    let mut sum = Position {
        x: 0.,
        y: 0.,
        z: positions[0].z.map(|_| 0.),
    };
    for w in positions.windows(2) {
        let weight = w[0].distance(&w[1]);
        sum = sum + (w[0] + w[1]) * (weight / 2.);
    }
    sum * (1. / length)
}

impl HasEnvelope for Curve {
    fn envelope(&self) -> Result<Envelope> {
        Ok(self.derived().envelope.clone())
    }
}
