use crate::Position;

/// Side of `point` relative to the directed segment `start -> end`.
///
/// Returns 1 or -1 for the two sides. Collinear points give 0 when they lie
/// on the segment, and 1 or -1 when they lie beyond its end or before its
/// start respectively.
pub(crate) fn relative_ccw(start: &Position, end: &Position, point: &Position) -> i32 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let mut px = point.x - start.x;
    let mut py = point.y - start.y;

    let mut ccw = px * dy - py * dx;
    if ccw == 0. {
        // Collinear: project onto the segment.
        ccw = px * dx + py * dy;
        if ccw > 0. {
            px -= dx;
            py -= dy;
            ccw = px * dx + py * dy;
            if ccw < 0. {
                ccw = 0.;
            }
        }
    }

    if ccw < 0. {
        -1
    } else if ccw > 0. {
        1
    } else {
        0
    }
}

/// Closed segment intersection: shared end points and collinear overlap count.
pub(crate) fn segments_intersect(
    start_a: &Position,
    end_a: &Position,
    start_b: &Position,
    end_b: &Position,
) -> bool {
    relative_ccw(start_a, end_a, start_b) * relative_ccw(start_a, end_a, end_b) <= 0
        && relative_ccw(start_b, end_b, start_a) * relative_ccw(start_b, end_b, end_a) <= 0
}

/// Proper crossing: each segment has its end points strictly on opposite
/// sides of the other.
pub(crate) fn segments_cross(
    start_a: &Position,
    end_a: &Position,
    start_b: &Position,
    end_b: &Position,
) -> bool {
    relative_ccw(start_a, end_a, start_b) * relative_ccw(start_a, end_a, end_b) < 0
        && relative_ccw(start_b, end_b, start_a) * relative_ccw(start_b, end_b, end_a) < 0
}

/// Does the segment pass within `tolerance` of `point`?
///
/// The point is widened to a square of half-width `tolerance`; the segment
/// hits it if an end point lies inside or it crosses one of the four edges.
pub(crate) fn segment_touches_position(
    start: &Position,
    end: &Position,
    point: &Position,
    tolerance: f64,
) -> bool {
    let inside = |p: &Position| {
        (p.x - point.x).abs() <= tolerance && (p.y - point.y).abs() <= tolerance
    };
    if inside(start) || inside(end) {
        return true;
    }
    let corners = [
        Position::new(point.x - tolerance, point.y - tolerance),
        Position::new(point.x + tolerance, point.y - tolerance),
        Position::new(point.x + tolerance, point.y + tolerance),
        Position::new(point.x - tolerance, point.y + tolerance),
    ];
    (0..4).any(|i| segments_intersect(start, end, &corners[i], &corners[(i + 1) % 4]))
}

/// Any segment of `a` intersects any segment of `b`.
pub(crate) fn line_strings_intersect(a: &[Position], b: &[Position]) -> bool {
    a.windows(2).any(|sa| {
        b.windows(2)
            .any(|sb| segments_intersect(&sa[0], &sa[1], &sb[0], &sb[1]))
    })
}

/// Any segment of `a` properly crosses any segment of `b`.
pub(crate) fn line_strings_cross(a: &[Position], b: &[Position]) -> bool {
    a.windows(2).any(|sa| {
        b.windows(2)
            .any(|sb| segments_cross(&sa[0], &sa[1], &sb[0], &sb[1]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_relative_ccw() {
        let (a, b) = (p(0., 0.), p(2., 0.));
        assert_eq!(relative_ccw(&a, &b, &p(1., 1.)), -relative_ccw(&a, &b, &p(1., -1.)));
        assert_eq!(relative_ccw(&a, &b, &p(1., 0.)), 0);
        assert_eq!(relative_ccw(&a, &b, &p(3., 0.)), 1);
        assert_eq!(relative_ccw(&a, &b, &p(-1., 0.)), -1);
    }

    #[test]
    fn test_segments_intersect() {
        assert!(segments_intersect(&p(0., 0.), &p(1., 1.), &p(0., 1.), &p(1., 0.)));
        assert!(!segments_intersect(&p(0., 0.), &p(1., 0.), &p(0., 1.), &p(1., 1.)));
        // Shared end point
        assert!(segments_intersect(&p(0., 0.), &p(1., 0.), &p(1., 0.), &p(1., 1.)));
        // Collinear overlap and collinear disjoint
        assert!(segments_intersect(&p(0., 0.), &p(2., 0.), &p(1., 0.), &p(3., 0.)));
        assert!(!segments_intersect(&p(0., 0.), &p(1., 0.), &p(2., 0.), &p(3., 0.)));
    }

    #[test]
    fn test_segments_cross() {
        assert!(segments_cross(&p(0., 0.), &p(1., 1.), &p(0., 1.), &p(1., 0.)));
        assert!(!segments_cross(&p(0., 0.), &p(1., 0.), &p(1., 0.), &p(1., 1.)));
    }

    #[test]
    fn test_segment_touches_position() {
        let (a, b) = (p(0., 0.), p(2., 2.));
        assert!(segment_touches_position(&a, &b, &p(1., 1.), 1e-9));
        assert!(segment_touches_position(&a, &b, &p(1., 1.), 0.));
        assert!(segment_touches_position(&a, &b, &p(1.05, 1.), 0.1));
        assert!(!segment_touches_position(&a, &b, &p(1.5, 1.), 0.1));
        assert!(!segment_touches_position(&a, &b, &p(3., 3.), 1e-9));
    }
}
