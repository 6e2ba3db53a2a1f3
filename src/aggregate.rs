use crate::boundary::Boundary;
use crate::crs::Crs;
use crate::derived::DerivedCell;
use crate::envelope::{Envelope, HasEnvelope};
use crate::errors::{GeometryError, InvariantViolation, Result};
use crate::{Curve, Geometry, Point, Position, Surface};
use std::fmt;
use std::slice::Iter;

/// Behaviour an aggregate needs from its members.
pub trait AggregateMember: Clone + fmt::Debug + PartialEq + HasEnvelope {
    /// Type name of the aggregate holding this member kind.
    const AGGREGATE_NAME: &'static str;

    fn member_centroid(&self) -> Result<Position>;

    /// Weight of the member's centroid in the aggregate centroid.
    fn member_weight(&self) -> Result<f64> {
        Ok(1.)
    }

    fn member_area(&self) -> Result<f64> {
        Ok(0.)
    }

    /// Topological dimension: 0 for points, 1 for curves, 2 for surfaces.
    fn member_dimension(&self) -> usize;

    fn member_boundary(&self) -> Result<Boundary>;

    fn member_coordinate_dimension(&self) -> Result<usize>;

    fn member_crs(&self) -> Option<&Crs>;

    fn set_member_crs(&mut self, crs: Option<Crs>);

    fn translate_member(&mut self, offset: &[f64]);

    /// Members of `geometry` if it is an aggregate of the same kind.
    fn aggregate_members(geometry: &Geometry) -> Option<&[Self]>;
}

impl AggregateMember for Point {
    const AGGREGATE_NAME: &'static str = "MultiPoint";

    fn member_centroid(&self) -> Result<Position> {
        Ok(*self.position())
    }

    fn member_dimension(&self) -> usize {
        0
    }

    fn member_boundary(&self) -> Result<Boundary> {
        Ok(Boundary::Empty)
    }

    fn member_coordinate_dimension(&self) -> Result<usize> {
        Ok(self.coordinate_dimension())
    }

    fn member_crs(&self) -> Option<&Crs> {
        self.crs()
    }

    fn set_member_crs(&mut self, crs: Option<Crs>) {
        self.set_crs(crs);
    }

    fn translate_member(&mut self, offset: &[f64]) {
        self.translate(offset);
    }

    fn aggregate_members(geometry: &Geometry) -> Option<&[Self]> {
        match geometry {
            Geometry::MultiPoint(aggregate) => Some(aggregate.members()),
            _ => None,
        }
    }
}

impl AggregateMember for Curve {
    const AGGREGATE_NAME: &'static str = "MultiCurve";

    fn member_centroid(&self) -> Result<Position> {
        Ok(*self.centroid().position())
    }

    fn member_dimension(&self) -> usize {
        1
    }

    fn member_boundary(&self) -> Result<Boundary> {
        Ok(self.boundary().clone())
    }

    fn member_coordinate_dimension(&self) -> Result<usize> {
        Ok(self.coordinate_dimension())
    }

    fn member_crs(&self) -> Option<&Crs> {
        self.crs()
    }

    fn set_member_crs(&mut self, crs: Option<Crs>) {
        self.set_crs(crs);
    }

    fn translate_member(&mut self, offset: &[f64]) {
        self.translate(offset);
    }

    fn aggregate_members(geometry: &Geometry) -> Option<&[Self]> {
        match geometry {
            Geometry::MultiCurve(aggregate) => Some(aggregate.members()),
            _ => None,
        }
    }
}

impl AggregateMember for Surface {
    const AGGREGATE_NAME: &'static str = "MultiSurface";

    fn member_centroid(&self) -> Result<Position> {
        Ok(*self.centroid()?.position())
    }

    fn member_weight(&self) -> Result<f64> {
        self.area()
    }

    fn member_area(&self) -> Result<f64> {
        self.area()
    }

    fn member_dimension(&self) -> usize {
        2
    }

    fn member_boundary(&self) -> Result<Boundary> {
        Ok(self.boundary()?.clone())
    }

    fn member_coordinate_dimension(&self) -> Result<usize> {
        Ok(self.coordinate_dimension())
    }

    fn member_crs(&self) -> Option<&Crs> {
        self.crs()
    }

    fn set_member_crs(&mut self, crs: Option<Crs>) {
        self.set_crs(crs);
    }

    fn translate_member(&mut self, offset: &[f64]) {
        self.translate(offset);
    }

    fn aggregate_members(geometry: &Geometry) -> Option<&[Self]> {
        match geometry {
            Geometry::MultiSurface(aggregate) => Some(aggregate.members()),
            _ => None,
        }
    }
}

impl AggregateMember for Geometry {
    const AGGREGATE_NAME: &'static str = "MultiGeometry";

    fn member_centroid(&self) -> Result<Position> {
        Ok(*self.centroid()?.position())
    }

    fn member_dimension(&self) -> usize {
        self.dimension()
    }

    fn member_boundary(&self) -> Result<Boundary> {
        self.boundary()
    }

    fn member_coordinate_dimension(&self) -> Result<usize> {
        self.coordinate_dimension()
    }

    fn member_crs(&self) -> Option<&Crs> {
        self.crs()
    }

    fn set_member_crs(&mut self, crs: Option<Crs>) {
        self.set_crs(crs);
    }

    fn translate_member(&mut self, offset: &[f64]) {
        self.translate(offset);
    }

    fn aggregate_members(geometry: &Geometry) -> Option<&[Self]> {
        match geometry {
            Geometry::MultiGeometry(aggregate) => Some(aggregate.members()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct AggregateDerived {
    envelope: Envelope,
    centroid: Position,
    area: f64,
    dimension: usize,
    boundary: Boundary,
}

/// An ordered, growable collection of geometries of one member kind.
///
/// Members are addressed by index. Every mutator clears the derived
/// attributes; accessors on an empty aggregate fail with
/// [`GeometryError::EmptyAggregate`].
#[derive(Debug, Clone)]
pub struct Aggregate<M> {
    members: Vec<M>,
    crs: Option<Crs>,
    derived: DerivedCell<AggregateDerived>,
}

pub type MultiPoint = Aggregate<Point>;
pub type MultiCurve = Aggregate<Curve>;
pub type MultiSurface = Aggregate<Surface>;
pub type MultiGeometry = Aggregate<Geometry>;

impl<M: PartialEq> PartialEq for Aggregate<M> {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members && self.crs == other.crs
    }
}

impl<M: AggregateMember> Default for Aggregate<M> {
    fn default() -> Self {
        Aggregate::new(Vec::new(), None)
    }
}

impl<M: AggregateMember> Aggregate<M> {
    /// Build an aggregate. Without an explicit crs the first member's is used.
    pub fn new(members: Vec<M>, crs: Option<Crs>) -> Self {
        let crs = crs.or_else(|| members.first().and_then(|m| m.member_crs().cloned()));
        Aggregate {
            members,
            crs,
            derived: DerivedCell::new(),
        }
    }

    pub fn members(&self) -> &[M] {
        &self.members
    }

    pub fn into_members(self) -> Vec<M> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, M> {
        self.members.iter()
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn get(&self, index: usize) -> Result<&M> {
        GeometryError::check_index(index, self.members.len())?;
        Ok(&self.members[index])
    }

    /// Mutable access to one member. The aggregate's own derived attributes
    /// are cleared; the member clears its own when it is changed.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut M> {
        GeometryError::check_index(index, self.members.len())?;
        self.derived.invalidate();
        Ok(&mut self.members[index])
    }

    pub fn add(&mut self, member: M) {
        self.members.push(member);
        self.derived.invalidate();
    }

    /// Insert before `index`. An index equal to the length appends.
    pub fn insert_at(&mut self, index: usize, member: M) -> Result<()> {
        GeometryError::check_index(index, self.members.len() + 1)?;
        self.members.insert(index, member);
        self.derived.invalidate();
        Ok(())
    }

    /// Replace the member at `index`, returning the old one.
    pub fn set_at(&mut self, index: usize, member: M) -> Result<M> {
        GeometryError::check_index(index, self.members.len())?;
        let old = std::mem::replace(&mut self.members[index], member);
        self.derived.invalidate();
        Ok(old)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<M> {
        GeometryError::check_index(index, self.members.len())?;
        let old = self.members.remove(index);
        self.derived.invalidate();
        Ok(old)
    }

    /// Remove every member equal to `member`, returning whether any was found.
    pub fn remove(&mut self, member: &M) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != member);
        let removed = self.members.len() != before;
        if removed {
            self.derived.invalidate();
        }
        removed
    }

    pub fn remove_all(&mut self) {
        self.members.clear();
        self.derived.invalidate();
    }

    /// Append the members of another aggregate of the same kind.
    pub fn merge(&mut self, other: &Geometry) -> Result<()> {
        let members = M::aggregate_members(other).ok_or_else(|| {
            GeometryError::from(InvariantViolation::TypeMismatch {
                expected: M::AGGREGATE_NAME,
                found: other.type_name(),
            })
        })?;
        self.members.extend(members.iter().cloned());
        self.derived.invalidate();
        Ok(())
    }

    pub fn set_crs(&mut self, crs: Option<Crs>) {
        for member in self.members.iter_mut() {
            member.set_member_crs(crs.clone());
        }
        self.crs = crs;
        self.derived.invalidate();
    }

    pub fn translate(&mut self, offset: &[f64]) {
        for member in self.members.iter_mut() {
            member.translate_member(offset);
        }
        self.derived.invalidate();
    }

    fn derived(&self) -> Result<&AggregateDerived> {
        self.derived.get_or_compute(|| self.calculate_derived())
    }

    fn calculate_derived(&self) -> Result<AggregateDerived> {
        let first = self.members.first().ok_or(GeometryError::EmptyAggregate)?;

        let mut envelope = first.envelope()?;
        let mut weighted: Option<Position> = None;
        let mut unweighted: Option<Position> = None;
        let mut total_weight = 0.;
        let mut area = 0.;
        let mut dimension = 0;
        let mut boundaries = Vec::with_capacity(self.members.len());

        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                envelope = envelope.merge(&member.envelope()?)?;
            }
            let centroid = member.member_centroid()?;
            let weight = member.member_weight()?;
            weighted = Some(match weighted {
                Some(sum) => sum + centroid * weight,
                None => centroid * weight,
            });
            unweighted = Some(match unweighted {
                Some(sum) => sum + centroid,
                None => centroid,
            });
            total_weight += weight;
            area += member.member_area()?;
            dimension = dimension.max(member.member_dimension());
            boundaries.push(member.member_boundary()?);
        }
        envelope.set_crs(self.crs.clone());

        let count = self.members.len() as f64;
        // All-zero weights (degenerate surfaces) fall back to the plain mean.
        let centroid = match (weighted, unweighted) {
            (Some(sum), _) if total_weight != 0. => sum * (1. / total_weight),
            (_, Some(sum)) => sum * (1. / count),
            _ => return Err(GeometryError::EmptyAggregate),
        };

        Ok(AggregateDerived {
            envelope,
            centroid,
            area,
            dimension,
            boundary: Boundary::Aggregate(boundaries),
        })
    }

    pub fn centroid(&self) -> Result<Point> {
        Ok(Point::new(self.derived()?.centroid, self.crs.clone()))
    }

    pub fn boundary(&self) -> Result<&Boundary> {
        Ok(&self.derived()?.boundary)
    }

    /// Largest topological dimension among the members.
    pub fn dimension(&self) -> Result<usize> {
        Ok(self.derived()?.dimension)
    }

    pub fn coordinate_dimension(&self) -> Result<usize> {
        let first = self.members.first().ok_or(GeometryError::EmptyAggregate)?;
        first.member_coordinate_dimension()
    }
}

impl Aggregate<Surface> {
    /// Sum of the member areas.
    pub fn area(&self) -> Result<f64> {
        Ok(self.derived()?.area)
    }
}

impl<M: AggregateMember> HasEnvelope for Aggregate<M> {
    fn envelope(&self) -> Result<Envelope> {
        Ok(self.derived()?.envelope.clone())
    }
}

impl<'a, M> IntoIterator for &'a Aggregate<M> {
    type Item = &'a M;
    type IntoIter = Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
