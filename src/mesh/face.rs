use super::{EdgeId, VertexId};

/// Marker type tagging [`super::Handle`]s that address faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceTag;

/// A triangular face. `edges[k]` always connects `vertices[k]` to
/// `vertices[(k + 1) % 3]`, and `vertices` is wound counterclockwise — both
/// invariants are upheld by every surgery primitive in
/// [`super::surgery`].
#[derive(Debug, Clone)]
pub struct Face {
  pub vertices: [VertexId; 3],
  pub edges: [EdgeId; 3],
}

impl Face {
  /// Local index (0, 1, or 2) of `v` within this face's vertex array.
  pub fn local_index_of(&self, v: VertexId) -> Option<usize> {
    self.vertices.iter().position(|&w| w == v)
  }

  pub fn contains_vertex(&self, v: VertexId) -> bool {
    self.vertices.contains(&v)
  }
}
