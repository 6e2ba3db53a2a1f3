use crate::Position;
use log::warn;

/// Twice the signed area of the triangle (a, b, c); positive when
/// counter-clockwise.
pub fn triangle_signed_area2(a: Position, b: Position, c: Position) -> f64 {
    (b - a).cross(c - a)
}

/// Signed area of a closed ring (first == last), positive when
/// counter-clockwise. Coordinates are shifted to the first position before
/// summing to keep large offsets from swamping the cross products.
pub fn signed_area(ring: &[Position]) -> f64 {
    if ring.len() < 3 {
        return 0.;
    }
    let origin = ring[0];
    let mut sum = 0.;
    for w in ring.windows(2) {
        let a = w[0] - origin;
        let b = w[1] - origin;
        sum += a.cross(b);
    }
    sum / 2.
}

pub fn is_clockwise(ring: &[Position]) -> bool {
    signed_area(ring) < 0.
}

fn cross_3d(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot_3d(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn as_array(p: Position) -> [f64; 3] {
    [p.x, p.y, p.z.unwrap_or(0.)]
}

/// Unsigned area of a planar ring in 3-D space.
///
/// The plane normal is the cross product of the first two edges; it is
/// dotted with the sum of successive-vertex cross products.
pub fn area_3d(ring: &[Position]) -> f64 {
    if ring.len() < 4 {
        return 0.;
    }
    let p0 = as_array(ring[0]);
    let p1 = as_array(ring[1]);
    let p2 = as_array(ring[2]);
    let mut normal = cross_3d(
        [p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]],
        [p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]],
    );
    let mut sum = [0.; 3];
    for w in ring.windows(2) {
        let c = cross_3d(as_array(w[0]), as_array(w[1]));
        sum = [sum[0] + c[0], sum[1] + c[1], sum[2] + c[2]];
    }
    let mut norm = dot_3d(normal, normal).sqrt();
    if norm == 0. {
        // First three vertices are collinear; the summed cross products are
        // themselves normal to the plane.
        normal = sum;
        norm = dot_3d(normal, normal).sqrt();
        if norm == 0. {
            return 0.;
        }
    }
    let unit = [normal[0] / norm, normal[1] / norm, normal[2] / norm];
    (dot_3d(unit, sum) / 2.).abs()
}

/// Unsigned area of a ring, using the 3-D formula when it carries z.
pub fn ring_area(ring: &[Position]) -> f64 {
    match ring.first() {
        Some(p) if p.z.is_some() => area_3d(ring),
        _ => signed_area(ring).abs(),
    }
}

/// Exterior area minus the area of each hole.
pub fn patch_area(exterior: &[Position], interiors: &[&[Position]]) -> f64 {
    let holes: f64 = interiors.iter().map(|ring| ring_area(ring)).sum();
    ring_area(exterior) - holes
}

/// Centroid of a ring's enclosed area and the signed area used to weight it.
/// A ring without area returns the mean of its distinct positions.
pub fn ring_centroid(ring: &[Position]) -> (Position, f64) {
    let origin = ring[0];
    let mut area2 = 0.;
    let mut cx = 0.;
    let mut cy = 0.;
    for w in ring.windows(2) {
        let a = w[0] - origin;
        let b = w[1] - origin;
        let cross = a.cross(b);
        area2 += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    if area2 == 0. {
        return (mean_position(&ring[..ring.len().max(2) - 1]), 0.);
    }
    let area = area2 / 2.;
    let centroid = Position::new(origin.x + cx / (6. * area), origin.y + cy / (6. * area));
    (centroid, area)
}

/// Area-weighted centroid of an exterior ring with holes subtracted.
pub fn patch_centroid(exterior: &[Position], interiors: &[&[Position]]) -> Position {
    let (ext_centroid, ext_area) = ring_centroid(exterior);
    let ext_area = ext_area.abs();
    let mut weight = ext_area;
    let mut x = ext_centroid.x * ext_area;
    let mut y = ext_centroid.y * ext_area;
    for hole in interiors {
        let (hole_centroid, hole_area) = ring_centroid(hole);
        let hole_area = hole_area.abs();
        weight -= hole_area;
        x -= hole_centroid.x * hole_area;
        y -= hole_centroid.y * hole_area;
    }
    let mut centroid = if weight.abs() > 0. {
        Position::new(x / weight, y / weight)
    } else {
        warn!("Centroid of a patch without area, using the mean of its exterior");
        ext_centroid
    };
    if exterior[0].z.is_some() {
        centroid.z = mean_position(&exterior[..exterior.len() - 1]).z;
    }
    centroid
}

/// Arithmetic mean of the positions; z is kept only if every position has one.
pub fn mean_position(positions: &[Position]) -> Position {
    let n = positions.len().max(1) as f64;
    let x = positions.iter().map(|p| p.x).sum::<f64>() / n;
    let y = positions.iter().map(|p| p.y).sum::<f64>() / n;
    let z = if !positions.is_empty() && positions.iter().all(|p| p.z.is_some()) {
        Some(positions.iter().filter_map(|p| p.z).sum::<f64>() / n)
    } else {
        None
    };
    Position { x, y, z }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ring(coords: Vec<(f64, f64)>) -> Vec<Position> {
        coords.into_iter().map(|c| c.into()).collect()
    }

    #[test]
    fn test_unit_square() {
        let square = ring(vec![(0., 0.), (1., 0.), (1., 1.), (0., 1.), (0., 0.)]);
        assert_abs_diff_eq!(signed_area(&square), 1.0);
        assert!(!is_clockwise(&square));
        let (centroid, area) = ring_centroid(&square);
        assert_abs_diff_eq!(area, 1.0);
        assert_abs_diff_eq!(centroid, Position::new(0.5, 0.5));
    }

    #[test]
    fn test_clockwise() {
        let square = ring(vec![(0., 0.), (0., 1.), (1., 1.), (1., 0.), (0., 0.)]);
        assert_abs_diff_eq!(signed_area(&square), -1.0);
        assert!(is_clockwise(&square));
        assert_abs_diff_eq!(ring_area(&square), 1.0);
    }

    #[test]
    fn test_far_from_origin() {
        let square = ring(vec![
            (1e9, 1e9),
            (1e9 + 2., 1e9),
            (1e9 + 2., 1e9 + 2.),
            (1e9, 1e9 + 2.),
            (1e9, 1e9),
        ]);
        assert_abs_diff_eq!(signed_area(&square), 4.0);
        let (centroid, _) = ring_centroid(&square);
        assert_abs_diff_eq!(centroid, Position::new(1e9 + 1., 1e9 + 1.));
    }

    #[test]
    fn test_patch_with_hole() {
        let exterior = ring(vec![(0., 0.), (4., 0.), (4., 4.), (0., 4.), (0., 0.)]);
        let hole = ring(vec![(0., 0.), (0., 2.), (2., 2.), (2., 0.), (0., 0.)]);
        assert_abs_diff_eq!(patch_area(&exterior, &[&hole]), 12.0);
        let centroid = patch_centroid(&exterior, &[&hole]);
        // (16 * 2 - 4 * 1) / 12
        assert_abs_diff_eq!(centroid, Position::new(28. / 12., 28. / 12.));
    }

    #[test]
    fn test_area_3d() {
        // Unit square tilted into the x-z plane
        let square: Vec<Position> = vec![
            (0., 0., 0.).into(),
            (1., 0., 0.).into(),
            (1., 0., 1.).into(),
            (0., 0., 1.).into(),
            (0., 0., 0.).into(),
        ];
        assert_abs_diff_eq!(area_3d(&square), 1.0);
        assert_abs_diff_eq!(ring_area(&square), 1.0);
        // Flat square with constant z matches the 2-D result
        let flat: Vec<Position> = vec![
            (0., 0., 5.).into(),
            (2., 0., 5.).into(),
            (2., 2., 5.).into(),
            (0., 2., 5.).into(),
            (0., 0., 5.).into(),
        ];
        assert_abs_diff_eq!(area_3d(&flat), 4.0);
    }

    #[test]
    fn test_triangle_orientation() {
        let a = Position::new(0., 0.);
        let b = Position::new(1., 0.);
        let c = Position::new(0., 1.);
        assert!(triangle_signed_area2(a, b, c) > 0.);
        assert!(triangle_signed_area2(a, c, b) < 0.);
        assert_eq!(triangle_signed_area2(a, b, Position::new(2., 0.)), 0.);
    }
}
