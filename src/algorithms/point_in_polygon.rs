use crate::{Position, SurfacePatch};

/// Ray-casting containment test against a closed ring.
///
/// A horizontal ray is cast from `point` towards +x and crossings are
/// counted; an odd count means inside. Vertices lying exactly on the ray are
/// not counted themselves: the ring is walked from the last vertex off the
/// ray line, and a crossing is only recorded when the next vertex off the
/// line is on the other side. Horizontal edges and tangent vertices are then
/// never double counted.
pub fn point_in_ring(point: &Position, ring: &[Position]) -> bool {
    if ring.len() < 4 {
        return false;
    }
    // The closing position repeats the first.
    let n = ring.len() - 1;
    let start = match (0..n).find(|&i| ring[i].y != point.y) {
        Some(start) => start,
        None => return false,
    };

    let mut inside = false;
    let mut previous = ring[start];
    for k in 1..=n {
        let current = ring[(start + k) % n];
        if current.y == point.y {
            continue;
        }
        if (current.y > point.y) != (previous.y > point.y) {
            let before = ring[(start + k - 1) % n];
            let crossing_x = if before.y == point.y {
                before.x
            } else {
                before.x + (point.y - before.y) * (current.x - before.x) / (current.y - before.y)
            };
            if point.x < crossing_x {
                inside = !inside;
            }
        }
        previous = current;
    }
    inside
}

/// Inside the exterior ring and inside none of the holes.
pub fn point_in_patch(point: &Position, patch: &SurfacePatch) -> bool {
    point_in_ring(point, patch.exterior().positions())
        && !patch
            .interiors()
            .iter()
            .any(|hole| point_in_ring(point, hole.positions()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(coords: Vec<(f64, f64)>) -> Vec<Position> {
        coords.into_iter().map(Position::from).collect()
    }

    #[test]
    fn check_containment() {
        let square = ring(vec![(0., 0.), (1., 0.), (1., 1.), (0., 1.), (0., 0.)]);
        assert!(point_in_ring(&Position::new(0.5, 0.5), &square));
        assert!(!point_in_ring(&Position::new(1.1, 0.5), &square));
        assert!(!point_in_ring(&Position::new(-0.1, 0.5), &square));
        assert!(!point_in_ring(&Position::new(0.5, 1.5), &square));
    }

    #[test]
    fn check_vertex_on_ray() {
        let diamond = ring(vec![(0., 1.), (1., 0.), (2., 1.), (1., 2.), (0., 1.)]);
        assert!(point_in_ring(&Position::new(0.5, 1.), &diamond));
        assert!(point_in_ring(&Position::new(1.5, 1.), &diamond));
        assert!(!point_in_ring(&Position::new(-1., 1.), &diamond));
        assert!(!point_in_ring(&Position::new(3., 1.), &diamond));
    }

    #[test]
    fn check_horizontal_edge_on_ray() {
        // Notch with a horizontal edge at y = 1
        let notched = ring(vec![
            (0., 0.),
            (4., 0.),
            (4., 2.),
            (3., 2.),
            (3., 1.),
            (2., 1.),
            (2., 2.),
            (0., 2.),
            (0., 0.),
        ]);
        assert!(point_in_ring(&Position::new(1., 1.), &notched));
        assert!(point_in_ring(&Position::new(1., 0.5), &notched));
        assert!(!point_in_ring(&Position::new(2.5, 1.5), &notched));
        assert!(!point_in_ring(&Position::new(5., 1.), &notched));
    }

    #[test]
    fn check_tangent_vertex() {
        let triangle = ring(vec![(0., 0.), (2., 0.), (1., 1.), (0., 0.)]);
        assert!(!point_in_ring(&Position::new(0., 1.), &triangle));
        assert!(point_in_ring(&Position::new(1., 0.5), &triangle));
    }
}
