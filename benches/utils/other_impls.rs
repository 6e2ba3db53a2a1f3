use rstar::{RTree, RTreeObject, AABB};
use spatial_schema::Position;

pub struct Segment {
    start: Position,
    end: Position,
}

impl RTreeObject for Segment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.start.x, self.start.y], [self.end.x, self.end.y])
    }
}

pub(crate) fn build_rstar(positions: &[Position]) -> RTree<Segment> {
    RTree::bulk_load(
        positions
            .windows(2)
            .map(|w| Segment {
                start: w[0],
                end: w[1],
            })
            .collect(),
    )
}

/// +1 for an upward edge with the point on its left, -1 for a downward edge
/// with the point on its right.
fn winding_number(point: Position, start: Position, end: Position) -> i32 {
    let side = (end - start).cross(point - start);
    if start.y <= point.y && end.y > point.y && side > 0. {
        1
    } else if start.y > point.y && end.y <= point.y && side < 0. {
        -1
    } else {
        0
    }
}

pub(crate) fn point_in_polygon_rstar(point: Position, rtree: &RTree<Segment>) -> bool {
    let mut wn: i32 = 0;

    let ray = AABB::from_corners([point.x, point.y], [f64::INFINITY, point.y]);
    for seg in rtree.locate_in_envelope_intersecting(&ray) {
        wn += winding_number(point, seg.start, seg.end);
    }

    wn != 0
}
