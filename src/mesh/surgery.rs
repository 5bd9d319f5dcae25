//! Mesh surgery primitives: the small set of local, invariant-preserving
//! mutations that the point triangulator composes into insertion and
//! constraint-edge handling. Grounded in
//! `original_source/src/delaunay/EdgeOperations.cpp` and `FaceOperations.cpp`.

use super::{Edge, Face, FaceId, Mesh, VertexId};
use crate::error::{Result, TriangulationError};
use crate::point::{Point2, PointId};
use crate::predicates::orient2d;

fn remove_item<T: PartialEq>(v: &mut Vec<T>, item: &T) {
  if let Some(pos) = v.iter().position(|x| x == item) {
    v.remove(pos);
  }
}

impl Mesh {
  /// Flips the shared diagonal of the two triangles adjacent to `e`.
  ///
  /// `e` must be an interior edge (shared by exactly two faces) whose
  /// quadrilateral is strictly convex; callers (the legalization work list)
  /// are expected to have already checked the in-circle test before calling
  /// this.
  pub fn swap_edge(&mut self, e: super::EdgeId) -> Result<()> {
    let edge = self.edge(e).clone();
    if edge.faces.len() != 2 {
      return Err(TriangulationError::PreconditionViolation(
        "swap_edge requires an interior edge shared by two faces",
      ));
    }
    let f1 = edge.faces[0];
    let f2 = edge.faces[1];

    let i = self
      .face(f1)
      .edges
      .iter()
      .position(|&x| x == e)
      .ok_or(TriangulationError::InvariantViolation("edge missing from adjacent face"))?;
    let j = self
      .face(f2)
      .edges
      .iter()
      .position(|&x| x == e)
      .ok_or(TriangulationError::InvariantViolation("edge missing from adjacent face"))?;

    let face1 = self.face(f1).clone();
    let face2 = self.face(f2).clone();

    let v1 = face1.vertices[i];
    let v2 = face1.vertices[(i + 1) % 3];
    let v3 = face1.vertices[(i + 2) % 3];
    let v4 = face2.vertices[(j + 2) % 3];

    if face2.vertices[j] != v2 || face2.vertices[(j + 1) % 3] != v1 {
      return Err(TriangulationError::InvariantViolation(
        "adjacent faces disagree on shared edge direction",
      ));
    }

    let (p1, p2, p3, p4) = (self.position(v1), self.position(v2), self.position(v3), self.position(v4));
    if !orient2d(&p4, &p2, &p3).is_ccw() || !orient2d(&p3, &p1, &p4).is_ccw() {
      return Err(TriangulationError::PreconditionViolation(
        "quadrilateral is not strictly convex; cannot flip",
      ));
    }

    let e_v2v3 = face1.edges[(i + 1) % 3];
    let e_v3v1 = face1.edges[(i + 2) % 3];
    let e_v1v4 = face2.edges[(j + 1) % 3];
    let e_v4v2 = face2.edges[(j + 2) % 3];

    self.face_mut(f1).vertices = [v3, v1, v4];
    self.face_mut(f1).edges = [e_v3v1, e_v1v4, e];
    self.face_mut(f2).vertices = [v4, v2, v3];
    self.face_mut(f2).edges = [e_v4v2, e_v2v3, e];

    self.edge_mut(e).vertices = [v3, v4];
    remove_item(&mut self.edge_mut(e_v1v4).faces, &f2);
    self.edge_mut(e_v1v4).faces.push(f1);
    remove_item(&mut self.edge_mut(e_v2v3).faces, &f1);
    self.edge_mut(e_v2v3).faces.push(f2);

    remove_item(&mut self.vertex_mut(v1).edges, &e);
    remove_item(&mut self.vertex_mut(v1).faces, &f2);
    remove_item(&mut self.vertex_mut(v2).edges, &e);
    remove_item(&mut self.vertex_mut(v2).faces, &f1);
    self.vertex_mut(v3).edges.push(e);
    self.vertex_mut(v3).faces.push(f2);
    self.vertex_mut(v4).edges.push(e);
    self.vertex_mut(v4).faces.push(f1);

    Ok(())
  }

  /// Splits face `f` into three faces meeting at a new vertex at `p`,
  /// reusing `f`'s id for one of the three. Returns the new vertex.
  pub fn split_face(&mut self, f: FaceId, p: Point2, input_index: Option<PointId>) -> Result<VertexId> {
    let face = self.face(f).clone();
    let [v0, v1, v2] = face.vertices;
    let [e0, e1, e2] = face.edges;

    let v_new = self.add_vertex(p, input_index);

    let ev0 = self.edges_mut_insert(Edge {
      vertices: [v_new, v0],
      faces: Vec::new(),
      is_constraint: false,
      input_index: None,
    });
    let ev1 = self.edges_mut_insert(Edge {
      vertices: [v_new, v1],
      faces: Vec::new(),
      is_constraint: false,
      input_index: None,
    });
    let ev2 = self.edges_mut_insert(Edge {
      vertices: [v_new, v2],
      faces: Vec::new(),
      is_constraint: false,
      input_index: None,
    });

    let face_b = self.faces_mut_insert(Face { vertices: [v1, v2, v_new], edges: [e1, ev2, ev1] });
    let face_c = self.faces_mut_insert(Face { vertices: [v2, v0, v_new], edges: [e2, ev0, ev2] });
    let face_a = f;
    self.face_mut(face_a).vertices = [v0, v1, v_new];
    self.face_mut(face_a).edges = [e0, ev1, ev0];

    self.edge_mut(ev0).faces = vec![face_a, face_c];
    self.edge_mut(ev1).faces = vec![face_a, face_b];
    self.edge_mut(ev2).faces = vec![face_b, face_c];

    remove_item(&mut self.edge_mut(e1).faces, &f);
    self.edge_mut(e1).faces.push(face_b);
    remove_item(&mut self.edge_mut(e2).faces, &f);
    self.edge_mut(e2).faces.push(face_c);

    self.vertex_mut(v0).edges.push(ev0);
    self.vertex_mut(v0).faces.push(face_c);
    self.vertex_mut(v1).edges.push(ev1);
    self.vertex_mut(v1).faces.push(face_b);
    remove_item(&mut self.vertex_mut(v2).faces, &f);
    self.vertex_mut(v2).edges.push(ev2);
    self.vertex_mut(v2).faces.push(face_b);
    self.vertex_mut(v2).faces.push(face_c);

    self.vertex_mut(v_new).faces = vec![face_a, face_b, face_c];
    self.vertex_mut(v_new).edges = vec![ev0, ev1, ev2];

    Ok(v_new)
  }

  /// Splits edge `e` at `p`, replacing its one or two adjacent faces with
  /// two or four smaller faces meeting at the new vertex. Returns the new
  /// vertex.
  pub fn split_edge(&mut self, e: super::EdgeId, p: Point2, input_index: Option<PointId>) -> Result<VertexId> {
    let edge = self.edge(e).clone();
    let va = edge.vertices[0];
    let vb = edge.vertices[1];

    struct Side {
      face: FaceId,
      apex: VertexId,
      apex_edge: super::EdgeId,
    }
    let mut fwd: Option<Side> = None;
    let mut rev: Option<Side> = None;

    for &f in &edge.faces {
      let face = self.face(f).clone();
      let i = face.edges.iter().position(|&x| x == e).ok_or(TriangulationError::InvariantViolation(
        "edge missing from its own adjacent face",
      ))?;
      let a = face.vertices[i];
      let b = face.vertices[(i + 1) % 3];
      let apex = face.vertices[(i + 2) % 3];
      let apex_edge = face.edges[(i + 2) % 3];
      if a == va && b == vb {
        fwd = Some(Side { face: f, apex, apex_edge });
      } else if a == vb && b == va {
        rev = Some(Side { face: f, apex, apex_edge });
      } else {
        return Err(TriangulationError::InvariantViolation("face edge endpoints do not match shared edge"));
      }
    }

    // The two new faces on each side must not be inverted by the split,
    // mirroring `SplitEdgeWithOneAdjacentFace`'s `TestOrientation2d` asserts
    // in the original source.
    let (pva, pvb) = (self.position(va), self.position(vb));
    if let Some(ref side) = fwd {
      let pc = self.position(side.apex);
      if !orient2d(&pvb, &pc, &p).is_ccw() || !orient2d(&pc, &pva, &p).is_ccw() {
        return Err(TriangulationError::PreconditionViolation(
          "split_edge would invert a face on the forward side of the edge",
        ));
      }
    }
    if let Some(ref side) = rev {
      let pd = self.position(side.apex);
      if !orient2d(&pva, &pd, &p).is_ccw() || !orient2d(&pd, &pvb, &p).is_ccw() {
        return Err(TriangulationError::PreconditionViolation(
          "split_edge would invert a face on the reverse side of the edge",
        ));
      }
    }

    let v_new = self.add_vertex(p, input_index);
    self.edge_mut(e).vertices = [va, v_new];
    let e_vb = self.edges_mut_insert(Edge {
      vertices: [v_new, vb],
      faces: Vec::new(),
      is_constraint: edge.is_constraint,
      input_index: None,
    });

    remove_item(&mut self.vertex_mut(vb).edges, &e);
    self.vertex_mut(vb).edges.push(e_vb);
    let mut v_new_edges = vec![e, e_vb];
    let mut v_new_faces = Vec::new();

    if let Some(Side { face: f_fwd, apex: c, apex_edge: edge_c_va }) = fwd {
      let e_vc = self.edges_mut_insert(Edge {
        vertices: [v_new, c],
        faces: Vec::new(),
        is_constraint: false,
        input_index: None,
      });
      // edge(vb, c) is the face's third edge: neither `e` nor `edge_c_va`.
      let edge_vb_c = *self
        .face(f_fwd)
        .edges
        .iter()
        .find(|&&x| x != e && x != edge_c_va)
        .expect("triangle must have three distinct edges");

      let f_fwd2 = self.faces_mut_insert(Face { vertices: [v_new, vb, c], edges: [e_vb, edge_vb_c, e_vc] });
      self.face_mut(f_fwd).vertices = [va, v_new, c];
      self.face_mut(f_fwd).edges = [e, e_vc, edge_c_va];

      remove_item(&mut self.edge_mut(edge_vb_c).faces, &f_fwd);
      self.edge_mut(edge_vb_c).faces.push(f_fwd2);
      self.edge_mut(e_vc).faces = vec![f_fwd, f_fwd2];
      self.edge_mut(e_vb).faces.push(f_fwd2);

      remove_item(&mut self.vertex_mut(vb).faces, &f_fwd);
      self.vertex_mut(vb).faces.push(f_fwd2);
      self.vertex_mut(c).edges.push(e_vc);
      self.vertex_mut(c).faces.push(f_fwd2);

      v_new_edges.push(e_vc);
      v_new_faces.push(f_fwd);
      v_new_faces.push(f_fwd2);
    }

    if let Some(Side { face: f_rev, apex: d, apex_edge: edge_d_vb }) = rev {
      let e_vd = self.edges_mut_insert(Edge {
        vertices: [v_new, d],
        faces: Vec::new(),
        is_constraint: false,
        input_index: None,
      });
      let edge_va_d = *self
        .face(f_rev)
        .edges
        .iter()
        .find(|&&x| x != e && x != edge_d_vb)
        .expect("triangle must have three distinct edges");

      let f_rev2 = self.faces_mut_insert(Face { vertices: [v_new, va, d], edges: [e, edge_va_d, e_vd] });
      self.face_mut(f_rev).vertices = [vb, v_new, d];
      self.face_mut(f_rev).edges = [e_vb, e_vd, edge_d_vb];

      remove_item(&mut self.edge_mut(edge_va_d).faces, &f_rev);
      self.edge_mut(edge_va_d).faces.push(f_rev2);
      self.edge_mut(e_vd).faces = vec![f_rev, f_rev2];
      self.edge_mut(e_vb).faces.push(f_rev);

      remove_item(&mut self.vertex_mut(va).faces, &f_rev);
      self.vertex_mut(va).faces.push(f_rev2);
      self.vertex_mut(d).edges.push(e_vd);
      self.vertex_mut(d).faces.push(f_rev2);

      v_new_edges.push(e_vd);
      v_new_faces.push(f_rev);
      v_new_faces.push(f_rev2);
    }

    self.vertex_mut(v_new).edges = v_new_edges;
    self.vertex_mut(v_new).faces = v_new_faces;

    Ok(v_new)
  }

  /// Creates a new face spanning `v1, v2, v3` (which must already be
  /// counterclockwise and non-degenerate), creating whichever of its three
  /// edges do not already exist.
  pub fn create_triangle_and_edges(&mut self, v1: VertexId, v2: VertexId, v3: VertexId) -> Result<FaceId> {
    let (p1, p2, p3) = (self.position(v1), self.position(v2), self.position(v3));
    if !orient2d(&p1, &p2, &p3).is_ccw() {
      return Err(TriangulationError::PreconditionViolation(
        "create_triangle_and_edges requires a counterclockwise, non-degenerate triangle",
      ));
    }

    let pairs = [(v1, v2), (v2, v3), (v3, v1)];
    let mut edge_ids = [None; 3];
    for (k, &(a, b)) in pairs.iter().enumerate() {
      edge_ids[k] = Some(self.edge_between(a, b).unwrap_or_else(|| {
        self.edges_mut_insert(Edge {
          vertices: [a, b],
          faces: Vec::new(),
          is_constraint: false,
          input_index: None,
        })
      }));
    }
    let edges = [edge_ids[0].unwrap(), edge_ids[1].unwrap(), edge_ids[2].unwrap()];

    let face = self.faces_mut_insert(Face { vertices: [v1, v2, v3], edges });

    for &e in &edges {
      self.edge_mut(e).faces.push(face);
    }
    for &v in &[v1, v2, v3] {
      if !self.vertex(v).faces.contains(&face) {
        self.vertex_mut(v).faces.push(face);
      }
    }
    for (k, &(a, b)) in pairs.iter().enumerate() {
      let e = edges[k];
      if !self.vertex(a).edges.contains(&e) {
        self.vertex_mut(a).edges.push(e);
      }
      if !self.vertex(b).edges.contains(&e) {
        self.vertex_mut(b).edges.push(e);
      }
    }

    Ok(face)
  }

  /// Deletes `f` and every adjacent edge (and, transitively, every vertex)
  /// that is left with no other adjacency.
  pub fn delete_face_and_orphaned_all_adjacent_edges(&mut self, f: FaceId) -> Result<()> {
    self.delete_face_and_orphaned_edges(f, false)
  }

  /// As above, but never deletes an edge marked `is_constraint`, and never
  /// deletes vertices — used while retriangulating the cavity around a
  /// constraint edge, where the constrained boundary must survive.
  pub fn delete_face_and_orphaned_nonconstrained_adjacent_edges(&mut self, f: FaceId) -> Result<()> {
    self.delete_face_and_orphaned_edges(f, true)
  }

  fn delete_face_and_orphaned_edges(&mut self, f: FaceId, preserve_constraints: bool) -> Result<()> {
    let face = self
      .faces
      .get(f)
      .cloned()
      .ok_or(TriangulationError::StaleHandle)?;

    for &v in &face.vertices {
      remove_item(&mut self.vertex_mut(v).faces, &f);
    }

    for &e in &face.edges {
      let edge = self.edge_mut(e);
      remove_item(&mut edge.faces, &f);
      let now_empty = edge.faces.is_empty();
      let is_constraint = edge.is_constraint;
      if !now_empty {
        continue;
      }
      if preserve_constraints && is_constraint {
        continue;
      }
      let removed = self.edges.remove(e).expect("edge located by its own handle");
      if preserve_constraints {
        continue;
      }
      for &v in &removed.vertices {
        remove_item(&mut self.vertex_mut(v).edges, &e);
        if self.vertex(v).edges.is_empty() && self.vertex(v).faces.is_empty() {
          self.vertices.remove(v);
        }
      }
    }

    self.faces.remove(f);
    Ok(())
  }

  fn edges_mut_insert(&mut self, edge: Edge) -> super::EdgeId {
    self.edges.insert(edge)
  }

  fn faces_mut_insert(&mut self, face: Face) -> FaceId {
    self.faces.insert(face)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::point::Point2;

  fn square_mesh() -> (Mesh, [super::VertexId; 4]) {
    let mut mesh = Mesh::new();
    let v0 = mesh.add_vertex(Point2::new(0.0, 0.0), None);
    let v1 = mesh.add_vertex(Point2::new(1.0, 0.0), None);
    let v2 = mesh.add_vertex(Point2::new(1.0, 1.0), None);
    let v3 = mesh.add_vertex(Point2::new(0.0, 1.0), None);
    mesh.create_triangle_and_edges(v0, v1, v2).unwrap();
    mesh.create_triangle_and_edges(v0, v2, v3).unwrap();
    (mesh, [v0, v1, v2, v3])
  }

  #[test]
  fn create_triangle_and_edges_wires_adjacency_both_ways() {
    let mut mesh = Mesh::new();
    let v0 = mesh.add_vertex(Point2::new(0.0, 0.0), None);
    let v1 = mesh.add_vertex(Point2::new(1.0, 0.0), None);
    let v2 = mesh.add_vertex(Point2::new(0.0, 1.0), None);
    let f = mesh.create_triangle_and_edges(v0, v1, v2).unwrap();

    assert_eq!(mesh.face(f).vertices, [v0, v1, v2]);
    for &v in &[v0, v1, v2] {
      assert!(mesh.vertex(v).faces.contains(&f));
      assert_eq!(mesh.vertex(v).edges.len(), 2);
    }
    for &e in &mesh.face(f).edges {
      assert_eq!(mesh.edge(e).faces, vec![f]);
    }
  }

  #[test]
  fn create_triangle_and_edges_rejects_clockwise_winding() {
    let mut mesh = Mesh::new();
    let v0 = mesh.add_vertex(Point2::new(0.0, 0.0), None);
    let v1 = mesh.add_vertex(Point2::new(0.0, 1.0), None);
    let v2 = mesh.add_vertex(Point2::new(1.0, 0.0), None);
    assert!(mesh.create_triangle_and_edges(v0, v1, v2).is_err());
  }

  #[test]
  fn swap_edge_flips_the_shared_diagonal() {
    let (mut mesh, [v0, v1, v2, v3]) = square_mesh();
    let diagonal = mesh.edge_between(v0, v2).unwrap();
    mesh.swap_edge(diagonal).unwrap();
    assert!(mesh.edge_between(v1, v3).is_some());
    assert!(mesh.edge_between(v0, v2).is_none());
    for &v in &[v0, v1, v2, v3] {
      assert_eq!(mesh.vertex(v).faces.len(), 2);
    }
  }

  #[test]
  fn split_face_creates_three_faces_around_the_new_vertex() {
    let mut mesh = Mesh::new();
    let v0 = mesh.add_vertex(Point2::new(0.0, 0.0), None);
    let v1 = mesh.add_vertex(Point2::new(2.0, 0.0), None);
    let v2 = mesh.add_vertex(Point2::new(1.0, 2.0), None);
    let f = mesh.create_triangle_and_edges(v0, v1, v2).unwrap();

    let v_new = mesh.split_face(f, Point2::new(1.0, 0.7), None).unwrap();
    assert_eq!(mesh.vertex(v_new).faces.len(), 3);
    assert_eq!(mesh.vertex(v_new).edges.len(), 3);
    for &v in &[v0, v1, v2] {
      assert!(mesh.vertex(v).faces.iter().any(|&face| mesh.face(face).contains_vertex(v_new)));
    }
  }

  #[test]
  fn split_edge_on_boundary_creates_two_faces() {
    let mut mesh = Mesh::new();
    let v0 = mesh.add_vertex(Point2::new(0.0, 0.0), None);
    let v1 = mesh.add_vertex(Point2::new(2.0, 0.0), None);
    let v2 = mesh.add_vertex(Point2::new(1.0, 2.0), None);
    mesh.create_triangle_and_edges(v0, v1, v2).unwrap();
    let e = mesh.edge_between(v0, v1).unwrap();

    let v_new = mesh.split_edge(e, Point2::new(1.0, 0.0), None).unwrap();
    assert_eq!(mesh.vertex(v_new).faces.len(), 2);
    assert_eq!(mesh.face_count(), 2);
  }

  #[test]
  fn split_edge_interior_creates_four_faces() {
    let (mut mesh, [v0, _v1, v2, _v3]) = square_mesh();
    let diagonal = mesh.edge_between(v0, v2).unwrap();
    let v_new = mesh.split_edge(diagonal, Point2::new(0.5, 0.5), None).unwrap();
    assert_eq!(mesh.vertex(v_new).faces.len(), 4);
    assert_eq!(mesh.face_count(), 4);
  }

  #[test]
  fn delete_face_and_orphaned_all_adjacent_edges_removes_unshared_vertices() {
    let mut mesh = Mesh::new();
    let v0 = mesh.add_vertex(Point2::new(0.0, 0.0), None);
    let v1 = mesh.add_vertex(Point2::new(1.0, 0.0), None);
    let v2 = mesh.add_vertex(Point2::new(0.0, 1.0), None);
    let f = mesh.create_triangle_and_edges(v0, v1, v2).unwrap();

    mesh.delete_face_and_orphaned_all_adjacent_edges(f).unwrap();
    assert_eq!(mesh.face_count(), 0);
    assert_eq!(mesh.vertex_count(), 0);
  }

  #[test]
  fn delete_face_and_orphaned_nonconstrained_adjacent_edges_preserves_constraint() {
    let mut mesh = Mesh::new();
    let v0 = mesh.add_vertex(Point2::new(0.0, 0.0), None);
    let v1 = mesh.add_vertex(Point2::new(1.0, 0.0), None);
    let v2 = mesh.add_vertex(Point2::new(0.0, 1.0), None);
    let f = mesh.create_triangle_and_edges(v0, v1, v2).unwrap();
    let constrained = mesh.edge_between(v0, v1).unwrap();
    mesh.edge_mut(constrained).is_constraint = true;

    mesh.delete_face_and_orphaned_nonconstrained_adjacent_edges(f).unwrap();
    assert_eq!(mesh.face_count(), 0);
    assert!(mesh.edge_opt(constrained).is_some());
  }

  #[test]
  fn rotate_face_for_test_cycles_vertices_and_edges_together() {
    let mut mesh = Mesh::new();
    let v0 = mesh.add_vertex(Point2::new(0.0, 0.0), None);
    let v1 = mesh.add_vertex(Point2::new(1.0, 0.0), None);
    let v2 = mesh.add_vertex(Point2::new(0.0, 1.0), None);
    let f = mesh.create_triangle_and_edges(v0, v1, v2).unwrap();
    let before = mesh.face(f).vertices;
    mesh.rotate_face_for_test(f);
    assert_eq!(mesh.face(f).vertices, [before[1], before[2], before[0]]);
  }
}
