use super::{EdgeId, FaceId};
use crate::point::{Point2, PointId};

/// Marker type tagging [`super::Handle`]s that address vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexTag;

/// A mesh vertex: a position plus the edges and faces currently touching
/// it. Both lists are unordered — nothing in this crate relies on a
/// particular rotational order around a vertex.
#[derive(Debug, Clone)]
pub struct Vertex {
  pub position: Point2,
  /// Index of this vertex within the triangulator's input point vector.
  /// This mesh is arena-level infrastructure with no seed-vertex scheme of
  /// its own, so it does not require every vertex to trace back to one —
  /// `None` is used by mesh-only tests that build a triangle directly
  /// without going through a point triangulator. `PointTriangulator` always
  /// passes `Some`.
  pub input_index: Option<PointId>,
  pub edges: Vec<EdgeId>,
  pub faces: Vec<FaceId>,
}
