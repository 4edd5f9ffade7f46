//! Coordinate reference system transformations.
//!
//! Wraps the pure-Rust `proj4rs` engine behind an explicit [`CrsRegistry`]:
//! each job owns its registry, so jobs with different CRS sets never share
//! process-wide projection state.

pub mod registry;
pub mod transform;
pub mod utm;

pub use registry::CrsRegistry;
pub use transform::{project_point, CoordinateTransform, Transformer};
pub use utm::utm_zone_for;
