//! Incremental constrained Delaunay triangulation over an arena-based
//! planar mesh.
//!
//! Two entry points cover `spec.md`'s scope: [`PointTriangulator`]
//! triangulates a point set plus optional constraint edges, and
//! [`PolygonTriangulator`] wraps it to triangulate a polygon (with holes)
//! by reduction to constrained point triangulation plus an inside/outside
//! flood fill.

pub mod error;
pub mod mesh;
pub mod point;
pub mod point_triangulator;
pub mod polygon_triangulator;
pub mod predicates;
pub mod rng;
pub mod snapshot;
pub mod validation;

pub use error::{Result, TriangulationError};
pub use point::{Point2, PointId};
pub use point_triangulator::{
  OutputEdge, OutputTriangle, PointTriangulator, PointTriangulatorOptions, TriangulationOutput,
};
pub use polygon_triangulator::{PolygonTriangulator, PolygonTriangulatorOptions};
pub use validation::ValidationReport;
