//! The half-adjacency planar mesh: three arenas of vertices, edges, and
//! faces addressed by generation-checked handles.

mod arena;
mod edge;
mod face;
mod surgery;
mod vertex;

pub use arena::{Arena, Handle};
pub use edge::{Edge, EdgeTag};
pub use face::{Face, FaceTag};
pub use vertex::{Vertex, VertexTag};

pub type VertexId = Handle<VertexTag>;
pub type EdgeId = Handle<EdgeTag>;
pub type FaceId = Handle<FaceTag>;

use crate::point::Point2;

/// A planar mesh of vertices, edges, and faces, with bidirectional
/// adjacency between all three. Mirrors `spec.md` §3: a single connected
/// mesh with a convex perimeter, all interior faces non-degenerate
/// triangles wound counterclockwise.
#[derive(Debug, Default)]
pub struct Mesh {
  pub(crate) vertices: Arena<Vertex>,
  pub(crate) edges: Arena<Edge>,
  pub(crate) faces: Arena<Face>,
}

impl Mesh {
  pub fn new() -> Mesh {
    Mesh::default()
  }

  pub fn vertex(&self, id: VertexId) -> &Vertex {
    self.vertices.get(id).expect("stale VertexId")
  }

  pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
    self.vertices.get_mut(id).expect("stale VertexId")
  }

  pub fn edge(&self, id: EdgeId) -> &Edge {
    self.edges.get(id).expect("stale EdgeId")
  }

  pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
    self.edges.get_mut(id).expect("stale EdgeId")
  }

  pub fn edge_opt(&self, id: EdgeId) -> Option<&Edge> {
    self.edges.get(id)
  }

  pub fn face(&self, id: FaceId) -> &Face {
    self.faces.get(id).expect("stale FaceId")
  }

  pub fn face_opt(&self, id: FaceId) -> Option<&Face> {
    self.faces.get(id)
  }

  pub fn face_mut(&mut self, id: FaceId) -> &mut Face {
    self.faces.get_mut(id).expect("stale FaceId")
  }

  pub fn position(&self, id: VertexId) -> Point2 {
    self.vertex(id).position
  }

  pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
    self.vertices.ids()
  }

  pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
    self.edges.ids()
  }

  pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
    self.faces.ids()
  }

  pub fn vertex_count(&self) -> usize {
    self.vertices.len()
  }

  pub fn face_count(&self) -> usize {
    self.faces.len()
  }

  /// Creates a vertex at `position` with no adjacency yet. Adjacency is
  /// filled in by whichever surgery primitive first attaches an edge or
  /// face to it.
  pub fn add_vertex(&mut self, position: Point2, input_index: Option<crate::point::PointId>) -> VertexId {
    self.vertices.insert(Vertex {
      position,
      input_index,
      edges: Vec::new(),
      faces: Vec::new(),
    })
  }

  /// Finds the local index (0, 1, or 2) of `vertex_id` within face `f`.
  pub fn face_local_index(&self, f: FaceId, vertex_id: VertexId) -> Option<usize> {
    self.face(f).vertices.iter().position(|&v| v == vertex_id)
  }

  /// Looks up the edge directly connecting `a` and `b`, if one exists.
  pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
    self
      .vertex(a)
      .edges
      .iter()
      .copied()
      .find(|&e| self.edge(e).other_vertex(a) == Some(b))
  }

  /// The face on the other side of `e` from `f`, if `e` is shared by two
  /// faces.
  pub fn neighbor_across_edge(&self, e: EdgeId, f: FaceId) -> Option<FaceId> {
    self.edge(e).faces.iter().copied().find(|&g| g != f)
  }

  /// The vertex of `f` opposite edge `e` (i.e. not one of `e`'s two
  /// endpoints).
  pub fn vertex_opposite_edge(&self, f: FaceId, e: EdgeId) -> VertexId {
    let edge = self.edge(e);
    *self
      .face(f)
      .vertices
      .iter()
      .find(|&&v| v != edge.vertices[0] && v != edge.vertices[1])
      .expect("edge not adjacent to face")
  }

  /// The edge of `f` opposite vertex `v` (i.e. the one not touching `v`).
  pub fn edge_opposite_vertex(&self, f: FaceId, v: VertexId) -> EdgeId {
    let face = self.face(f);
    let i = face.vertices.iter().position(|&w| w == v).expect("vertex not in face");
    face.edges[(i + 1) % 3]
  }

  #[cfg(test)]
  pub(crate) fn rotate_face_for_test(&mut self, f: FaceId) {
    let face = self.face_mut(f);
    face.vertices.rotate_left(1);
    face.edges.rotate_left(1);
  }
}
