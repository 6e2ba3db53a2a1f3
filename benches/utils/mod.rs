#[allow(dead_code)]
pub mod other_impls;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use spatial_schema::{Envelope, GeometryFactory, Position, Surface};

//// Utility functions

/// A wobbly ellipse, so that rays cross many edges at varied slopes.
#[allow(dead_code)]
pub(crate) fn make_star_surface(num_segments: usize) -> Surface {
    let factory = GeometryFactory::default();
    let ellipse = factory
        .create_surface_as_ellipse(Position::new(0., 0.), 10., 6., num_segments, None)
        .unwrap();
    let mut positions: Vec<Position> = ellipse.patches()[0]
        .exterior()
        .positions()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let scale = if i % 2 == 0 { 1. } else { 0.8 };
            Position::new(p.x * scale, p.y * scale)
        })
        .collect();
    let first = positions[0];
    let last = positions.len() - 1;
    positions[last] = first;
    factory
        .create_surface_from_positions(positions, Vec::new(), None)
        .unwrap()
}

#[allow(dead_code)]
pub(crate) fn get_random_points(envelope: &Envelope, n: usize, seed: u64) -> Vec<Position> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut results = Vec::new();
    for _i in 0..n {
        results.push(Position::new(
            rng.gen_range(envelope.min().x, envelope.max().x),
            rng.gen_range(envelope.min().y, envelope.max().y),
        ));
    }

    results
}

#[allow(dead_code)]
pub(crate) fn get_random_arcs(n: usize, seed: u64) -> Vec<[Position; 3]> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut results = Vec::new();
    for _i in 0..n {
        let mut position = || Position::new(rng.gen_range(-100., 100.), rng.gen_range(-100., 100.));
        results.push([position(), position(), position()]);
    }

    results
}
