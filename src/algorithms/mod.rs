pub mod linearize;
pub mod point_in_polygon;
pub mod polygon_area;
pub mod predicates;

pub use linearize::{LinearizationCriterion, Linearizer};
pub use point_in_polygon::{point_in_patch, point_in_ring};
pub use predicates::{contains, intersects};
