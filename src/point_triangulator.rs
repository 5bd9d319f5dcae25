//! Randomized incremental constrained Delaunay triangulation of a point set.
//!
//! Grounded in `original_source/src/delaunay/PointTriangulator.{h,cpp}`:
//! seed-triangle selection, point-location walk, edge legalization, and
//! cavity retriangulation for constraint edges all follow that algorithm,
//! rewritten over the arena mesh instead of a pointer graph.

use std::collections::HashMap;

use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, TriangulationError};
use crate::mesh::{EdgeId, FaceId, Mesh, VertexId};
use crate::point::{Point2, PointId};
use crate::predicates::{in_circle, orient2d, segments_intersect, Orientation};
use crate::rng::TriangulatorRng;
use crate::snapshot::{MeshSnapshotSink, NoopSnapshotSink, SnapshotAnnotation};
use crate::validation::ValidationReport;

/// Configuration for [`PointTriangulator`]. Mirrors the option table in
/// `spec.md` §6. The hook point behind `writeEntireSvgHistory` — handing
/// each mesh mutation to an external renderer — is
/// [`crate::snapshot::MeshSnapshotSink`], passed to
/// [`PointTriangulator::triangulate_with_snapshots`]; the actual SVG file
/// writer it would feed is out of scope, so there is no `svgFilename` field
/// here.
#[derive(Debug, Clone, Copy)]
pub struct PointTriangulatorOptions {
  pub shuffle_points: bool,
  pub seed: u64,
}

impl Default for PointTriangulatorOptions {
  fn default() -> PointTriangulatorOptions {
    PointTriangulatorOptions { shuffle_points: true, seed: 0x5EED }
  }
}

/// An output edge: a pair of input point indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputEdge {
  pub i: PointId,
  pub j: PointId,
}

/// An output triangle: its three vertices and the output index of each of
/// its three edges, counterclockwise, with edge `k` connecting vertex `k`
/// and vertex `(k + 1) % 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputTriangle {
  pub vertices: [PointId; 3],
  pub edges: [usize; 3],
}

#[derive(Debug, Clone, Default)]
pub struct TriangulationOutput {
  pub edges: Vec<OutputEdge>,
  pub triangles: Vec<OutputTriangle>,
}

/// Incremental constrained Delaunay triangulator over a fixed input point
/// set, with an optional set of constraint edges.
pub struct PointTriangulator {
  pub(crate) points: Vec<Point2>,
  pub(crate) constraint_edges: Vec<(PointId, PointId)>,
  pub(crate) options: PointTriangulatorOptions,
}

impl PointTriangulator {
  pub fn new(points: Vec<Point2>) -> PointTriangulator {
    PointTriangulator { points, constraint_edges: Vec::new(), options: PointTriangulatorOptions::default() }
  }

  pub fn with_options(
    points: Vec<Point2>,
    constraint_edges: Vec<(PointId, PointId)>,
    options: PointTriangulatorOptions,
  ) -> PointTriangulator {
    PointTriangulator { points, constraint_edges, options }
  }

  pub fn points(&self) -> &[Point2] {
    &self.points
  }

  /// Runs every check in `spec.md` §4.3 "Validation" and returns the
  /// resulting diagnostic flags. None of these flags imply the others;
  /// several may be set at once.
  pub fn validate(&self) -> ValidationReport {
    let mut report = ValidationReport::default();
    let n = self.points.len();

    if n < 3 {
      report.has_less_than_three_points = true;
    }
    for p in &self.points {
      if !p.is_finite() {
        report.some_points_are_nan = true;
      }
    }
    let mut seen_positions: std::collections::HashSet<(OrderedFloat<f64>, OrderedFloat<f64>)> =
      std::collections::HashSet::new();
    for p in &self.points {
      let key = (OrderedFloat(p.x()), OrderedFloat(p.y()));
      if !seen_positions.insert(key) {
        report.some_points_are_coincident = true;
      }
    }
    if n >= 3 {
      let all_colinear = (2..n).all(|k| orient2d(&self.points[0], &self.points[1], &self.points[k]).is_colinear());
      if all_colinear {
        report.all_points_are_colinear = true;
      }
    }

    for &(a, b) in &self.constraint_edges {
      if a == b || self.points[a.0].coincides_with(&self.points[b.0]) {
        report.some_edges_are_degenerate = true;
      }
    }

    for (k, &(a, b)) in self.constraint_edges.iter().enumerate() {
      let (pa, pb) = (self.points[a.0], self.points[b.0]);
      for (pid, p) in self.points.iter().enumerate() {
        if pid == a.0 || pid == b.0 {
          continue;
        }
        if orient2d(&pa, &pb, p).is_colinear() && crate::predicates::colinear_point_on_segment(&pa, &pb, p) {
          report.some_points_intersect_edges = true;
        }
      }
      for (k2, &(c, d)) in self.constraint_edges.iter().enumerate() {
        if k2 <= k {
          continue;
        }
        let (pc, pd) = (self.points[c.0], self.points[d.0]);
        let shares_endpoint = a == c || a == d || b == c || b == d;
        if shares_endpoint {
          continue;
        }
        if segments_intersect(&pa, &pb, &pc, &pd) {
          report.some_edges_intersect = true;
        }
      }
    }

    let mut seen_edges: std::collections::HashSet<(PointId, PointId)> = std::collections::HashSet::new();
    for &(a, b) in &self.constraint_edges {
      let key = if a.0 <= b.0 { (a, b) } else { (b, a) };
      if !seen_edges.insert(key) {
        report.some_edges_are_duplicates = true;
      }
    }

    report
  }

  /// Triangulates the input, assuming [`Self::validate`] has already
  /// returned an ok report. Per the error-handling design this is not
  /// re-checked here beyond a debug assertion: calling this on invalid
  /// input is a contract violation, not a recoverable error.
  ///
  /// Discards every mesh snapshot; see [`Self::triangulate_with_snapshots`]
  /// to receive one after each mutation.
  pub fn triangulate(&self) -> Result<TriangulationOutput> {
    self.triangulate_with_snapshots(&mut NoopSnapshotSink)
  }

  /// As [`Self::triangulate`], but hands `sink` a snapshot of the mesh
  /// after every mutating surgery operation (point insertion, legalization
  /// flip, constraint-edge cavity retriangulation), for external debug
  /// rendering.
  pub fn triangulate_with_snapshots(&self, sink: &mut dyn MeshSnapshotSink) -> Result<TriangulationOutput> {
    debug_assert!(self.validate().is_valid(), "triangulate() called on invalid input");

    let n = self.points.len();
    let mut rng = TriangulatorRng::new(self.options.seed);
    rng.reset_walk();

    let mut order: Vec<usize> = (0..n).collect();
    if self.options.shuffle_points {
      order.shuffle(rng.shuffle_rng());
    }

    let mut mesh = Mesh::new();
    let mut vertex_of: Vec<Option<VertexId>> = vec![None; n];

    let seed_end = self.create_seed_triangle(&mut mesh, &mut order, &mut vertex_of, sink)?;

    let step_bound = 100 * n.max(1);
    let mut steps = 0usize;
    for &pid in &order[seed_end..] {
      steps += 1;
      if steps > step_bound {
        return Err(TriangulationError::ExceededStepBound);
      }
      let p = self.points[pid];
      let f_star = self.find_nearest_face(&mesh, p, &mut rng)?;
      let v_new = match self.classify(&mesh, f_star, p) {
        Location::OnVertex => {
          return Err(TriangulationError::InvariantViolation("point coincides with an existing vertex"));
        }
        Location::OnEdge(local) => {
          let e = mesh.face(f_star).edges[local];
          let v = mesh.split_edge(e, p, Some(PointId(pid)))?;
          notify(sink, &mesh);
          v
        }
        Location::Inside => {
          let v = mesh.split_face(f_star, p, Some(PointId(pid)))?;
          notify(sink, &mesh);
          v
        }
        Location::Outside => self.add_vertex_outside_perimeter(&mut mesh, f_star, p, PointId(pid), sink)?,
      };
      vertex_of[pid] = Some(v_new);
      self.legalize_around(&mut mesh, v_new, &mut steps, step_bound, sink)?;
    }

    let vertex_of: Vec<VertexId> = vertex_of.into_iter().map(|v| v.expect("every point inserted")).collect();

    for (k, &(a, b)) in self.constraint_edges.iter().enumerate() {
      self.insert_constraint_edge(&mut mesh, vertex_of[a.0], vertex_of[b.0], k, sink)?;
    }

    Ok(self.emit_output(&mesh))
  }

  fn create_seed_triangle(
    &self,
    mesh: &mut Mesh,
    order: &mut [usize],
    vertex_of: &mut [Option<VertexId>],
    sink: &mut dyn MeshSnapshotSink,
  ) -> Result<usize> {
    if order.len() < 3 {
      return Err(TriangulationError::PreconditionViolation("fewer than three points"));
    }
    let p0 = self.points[order[0]];
    let p1 = self.points[order[1]];
    let mut found = None;
    for k in 2..order.len() {
      if !orient2d(&p0, &p1, &self.points[order[k]]).is_colinear() {
        found = Some(k);
        break;
      }
    }
    let k = found.ok_or(TriangulationError::PreconditionViolation("all points are colinear"))?;
    order.swap(2, k);

    if orient2d(&p0, &p1, &self.points[order[2]]).is_cw() {
      order.swap(1, 2);
    }

    let ids: Vec<VertexId> = (0..3)
      .map(|i| mesh.add_vertex(self.points[order[i]], Some(PointId(order[i]))))
      .collect();
    for i in 0..3 {
      vertex_of[order[i]] = Some(ids[i]);
    }
    mesh.create_triangle_and_edges(ids[0], ids[1], ids[2])?;
    notify(sink, mesh);
    Ok(3)
  }

  /// `findNearestFace` from `spec.md` §4.3.1.
  fn find_nearest_face(&self, mesh: &Mesh, p: Point2, rng: &mut TriangulatorRng) -> Result<FaceId> {
    let vertices: Vec<VertexId> = mesh.vertex_ids().collect();
    if vertices.is_empty() {
      return Err(TriangulationError::InvariantViolation("mesh has no vertices"));
    }
    let sample_size = (vertices.len() as f64).cbrt().ceil().max(1.0) as usize;
    let walk_rng = rng.walk_rng();

    let mut best = vertices[walk_rng.gen_range(0..vertices.len())];
    let mut best_dist = mesh.position(best).squared_distance(&p);
    for _ in 1..sample_size {
      let candidate = vertices[walk_rng.gen_range(0..vertices.len())];
      let dist = mesh.position(candidate).squared_distance(&p);
      if dist < best_dist {
        best = candidate;
        best_dist = dist;
      }
    }

    let start_faces = &mesh.vertex(best).faces;
    if start_faces.is_empty() {
      return Err(TriangulationError::InvariantViolation("vertex has no adjacent face"));
    }
    let mut f = start_faces[walk_rng.gen_range(0..start_faces.len())];

    let step_bound = 100 * mesh.face_count().max(1);
    for _ in 0..step_bound {
      let face = mesh.face(f).clone();
      let start = walk_rng.gen_range(0..3);
      let mut stepped = false;
      for offset in 0..3 {
        let local = (start + offset) % 3;
        let a = face.vertices[local];
        let b = face.vertices[(local + 1) % 3];
        let opposite = face.vertices[(local + 2) % 3];
        let (pa, pb, popp) = (mesh.position(a), mesh.position(b), mesh.position(opposite));
        let side_opposite = orient2d(&pa, &pb, &popp);
        let side_target = orient2d(&pa, &pb, &p);
        let separates = match (side_opposite, side_target) {
          (Orientation::CounterClockWise, Orientation::ClockWise) => true,
          (Orientation::ClockWise, Orientation::CounterClockWise) => true,
          _ => false,
        };
        if !separates {
          continue;
        }
        let edge = face.edges[local];
        if let Some(next) = mesh.neighbor_across_edge(edge, f) {
          f = next;
          stepped = true;
          break;
        }
      }
      if !stepped {
        return Ok(f);
      }
    }
    Err(TriangulationError::ExceededStepBound)
  }

  fn classify(&self, mesh: &Mesh, f: FaceId, p: Point2) -> Location {
    let face = mesh.face(f);
    let verts: Vec<Point2> = face.vertices.iter().map(|&v| mesh.position(v)).collect();
    for &v in &[0, 1, 2] {
      if verts[v].coincides_with(&p) {
        return Location::OnVertex;
      }
    }
    let signs: Vec<Orientation> =
      (0..3).map(|i| orient2d(&verts[i], &verts[(i + 1) % 3], &p)).collect();

    if signs.iter().any(|s| s.is_cw()) {
      return Location::Outside;
    }
    if let Some(local) = signs.iter().position(|s| s.is_colinear()) {
      return Location::OnEdge(local);
    }
    Location::Inside
  }

  /// `addVertexOutsidePerimeter` from `spec.md` §4.3.2.
  fn add_vertex_outside_perimeter(
    &self,
    mesh: &mut Mesh,
    f_star: FaceId,
    p: Point2,
    pid: PointId,
    sink: &mut dyn MeshSnapshotSink,
  ) -> Result<VertexId> {
    let hull = perimeter_vertices(mesh);
    let candidates: Vec<VertexId> = mesh.face(f_star).vertices.iter().copied().filter(|v| hull.contains(v)).collect();
    let start = candidates
      .iter()
      .copied()
      .min_by(|&a, &b| {
        mesh
          .position(a)
          .squared_distance(&p)
          .partial_cmp(&mesh.position(b).squared_distance(&p))
          .unwrap()
      })
      .ok_or(TriangulationError::InvariantViolation("no visible perimeter vertex found"))?;

    let v_new = mesh.add_vertex(p, Some(pid));

    let mut current = start;
    loop {
      let next = perimeter_step(mesh, current, true)
        .ok_or(TriangulationError::InvariantViolation("broken perimeter"))?;
      if orient2d(&p, &mesh.position(next), &mesh.position(current)).is_ccw() {
        mesh.create_triangle_and_edges(v_new, next, current)?;
        notify(sink, mesh);
        current = next;
      } else {
        break;
      }
    }

    let mut current = start;
    loop {
      let prev = perimeter_step(mesh, current, false)
        .ok_or(TriangulationError::InvariantViolation("broken perimeter"))?;
      if orient2d(&p, &mesh.position(current), &mesh.position(prev)).is_ccw() {
        mesh.create_triangle_and_edges(v_new, current, prev)?;
        notify(sink, mesh);
        current = prev;
      } else {
        break;
      }
    }

    Ok(v_new)
  }

  /// `legalizeAround` from `spec.md` §4.3.3.
  fn legalize_around(
    &self,
    mesh: &mut Mesh,
    v_new: VertexId,
    steps: &mut usize,
    step_bound: usize,
    sink: &mut dyn MeshSnapshotSink,
  ) -> Result<()> {
    let mut work: Vec<FaceId> = mesh.vertex(v_new).faces.clone();

    while let Some(f) = work.pop() {
      *steps += 1;
      if *steps > step_bound {
        return Err(TriangulationError::ExceededStepBound);
      }
      if mesh.face_opt(f).is_none() {
        continue;
      }
      let face = mesh.face(f).clone();
      let local = match face.vertices.iter().position(|&v| v == v_new) {
        Some(i) => i,
        None => continue,
      };
      let e_opp = face.edges[(local + 1) % 3];
      let edge = mesh.edge(e_opp).clone();
      if edge.faces.len() != 2 {
        continue;
      }
      let other_face = edge.faces.iter().copied().find(|&g| g != f).expect("edge has two faces");
      let v_opp = mesh.vertex_opposite_edge(other_face, e_opp);

      let (a, b, c) = (face.vertices[local], face.vertices[(local + 1) % 3], face.vertices[(local + 2) % 3]);
      let (pa, pb, pc, popp) = (mesh.position(a), mesh.position(b), mesh.position(c), mesh.position(v_opp));
      if in_circle(&pa, &pb, &pc, &popp) {
        mesh.swap_edge(e_opp)?;
        notify(sink, mesh);
        work.push(f);
        work.push(other_face);
      }
    }
    Ok(())
  }

  /// `insertConstraintEdge` from `spec.md` §4.3.4.
  ///
  /// Walks the chain of faces that the segment `(v0, v1)` passes through,
  /// deleting each one and splitting its two non-crossed edges' endpoints
  /// into `left`/`right` chains by which side of the segment they fall on,
  /// then retriangulates each chain with `triangulateCavityHalf`.
  fn insert_constraint_edge(
    &self,
    mesh: &mut Mesh,
    v0: VertexId,
    v1: VertexId,
    input_index: usize,
    sink: &mut dyn MeshSnapshotSink,
  ) -> Result<()> {
    if let Some(e) = mesh.edge_between(v0, v1) {
      mesh.edge_mut(e).is_constraint = true;
      mesh.edge_mut(e).input_index = Some(input_index);
      return Ok(());
    }

    let (p0, p1) = (mesh.position(v0), mesh.position(v1));

    let mut f = None;
    let mut e = None;
    for &candidate_f in &mesh.vertex(v0).faces.clone() {
      let candidate_e = mesh.edge_opposite_vertex(candidate_f, v0);
      let edge = mesh.edge(candidate_e);
      let (ea, eb) = (mesh.position(edge.vertices[0]), mesh.position(edge.vertices[1]));
      if segments_intersect(&p0, &p1, &ea, &eb) {
        f = Some(candidate_f);
        e = Some(candidate_e);
        break;
      }
    }
    let mut f = f.ok_or(TriangulationError::InvariantViolation("no face crosses constraint edge"))?;
    let mut e = e.unwrap();

    let mut left = vec![v0];
    let mut right = vec![v0];

    let step_bound = 100 * mesh.face_count().max(1);
    let mut steps = 0usize;
    loop {
      steps += 1;
      if steps > step_bound {
        return Err(TriangulationError::ExceededStepBound);
      }

      let edge = mesh.edge(e).clone();
      for &endpoint in &edge.vertices {
        let side = orient2d(&p0, &p1, &mesh.position(endpoint));
        if side.is_colinear() {
          return Err(TriangulationError::InvariantViolation(
            "constraint edge passes through an existing vertex",
          ));
        }
        let chain = if side.is_ccw() { &mut left } else { &mut right };
        if chain.last() != Some(&endpoint) {
          chain.push(endpoint);
        }
      }

      let next_face = mesh
        .neighbor_across_edge(e, f)
        .ok_or(TriangulationError::InvariantViolation("constraint walk fell off the mesh"))?;
      mesh.delete_face_and_orphaned_nonconstrained_adjacent_edges(f)?;
      notify(sink, mesh);
      f = next_face;

      if mesh.face(f).contains_vertex(v1) {
        mesh.delete_face_and_orphaned_nonconstrained_adjacent_edges(f)?;
        notify(sink, mesh);
        break;
      }

      let next_edge = mesh
        .face(f)
        .edges
        .iter()
        .copied()
        .find(|&cand| {
          if cand == e {
            return false;
          }
          let ce = mesh.edge(cand);
          let (ea, eb) = (mesh.position(ce.vertices[0]), mesh.position(ce.vertices[1]));
          segments_intersect(&p0, &p1, &ea, &eb)
        })
        .ok_or(TriangulationError::InvariantViolation("no edge of next face crosses constraint edge"))?;
      e = next_edge;
    }

    left.push(v1);
    right.push(v1);
    left.reverse();

    self.triangulate_cavity_half(mesh, &left, sink)?;
    self.triangulate_cavity_half(mesh, &right, sink)?;

    let e = mesh
      .edge_between(v0, v1)
      .ok_or(TriangulationError::InvariantViolation("cavity retriangulation did not produce the constraint edge"))?;
    mesh.edge_mut(e).is_constraint = true;
    mesh.edge_mut(e).input_index = Some(input_index);
    Ok(())
  }

  /// `triangulateCavityHalf` from `spec.md` §4.3.4.
  fn triangulate_cavity_half(&self, mesh: &mut Mesh, seq: &[VertexId], sink: &mut dyn MeshSnapshotSink) -> Result<()> {
    if seq.len() < 3 {
      return Ok(());
    }
    if seq.len() == 3 {
      mesh.create_triangle_and_edges(seq[0], seq[1], seq[2])?;
      notify(sink, mesh);
      return Ok(());
    }

    let first = seq[0];
    let last = seq[seq.len() - 1];
    let (pf, pl) = (mesh.position(first), mesh.position(last));
    let mut m = 1;
    for i in 2..(seq.len() - 1) {
      let pm = mesh.position(seq[m]);
      let pi = mesh.position(seq[i]);
      if in_circle(&pf, &pm, &pl, &pi) {
        m = i;
      }
    }

    mesh.create_triangle_and_edges(first, seq[m], last)?;
    notify(sink, mesh);
    self.triangulate_cavity_half(mesh, &seq[0..=m], sink)?;
    self.triangulate_cavity_half(mesh, &seq[m..], sink)?;
    Ok(())
  }

  fn emit_output(&self, mesh: &Mesh) -> TriangulationOutput {
    let num_constraints = self.constraint_edges.len();
    let mut output_edges: Vec<Option<OutputEdge>> = vec![None; num_constraints];
    let mut remaining: Vec<EdgeId> = Vec::new();
    let mut output_index_of: HashMap<EdgeId, usize> = HashMap::new();

    for e in mesh.edge_ids() {
      let edge = mesh.edge(e);
      if let Some(k) = edge.input_index {
        let (a, b) = self.constraint_edges[k];
        output_edges[k] = Some(OutputEdge { i: a, j: b });
        output_index_of.insert(e, k);
      } else {
        remaining.push(e);
      }
    }
    for (offset, &e) in remaining.iter().enumerate() {
      let index = num_constraints + offset;
      output_index_of.insert(e, index);
      let edge = mesh.edge(e);
      let a = mesh.vertex(edge.vertices[0]).input_index.expect("no synthetic vertices");
      let b = mesh.vertex(edge.vertices[1]).input_index.expect("no synthetic vertices");
      output_edges.push(Some(OutputEdge { i: a, j: b }));
    }

    let edges: Vec<OutputEdge> = output_edges.into_iter().map(|e| e.expect("every constraint edge emitted")).collect();

    let mut triangles = Vec::new();
    for f in mesh.face_ids() {
      let face = mesh.face(f);
      let vertices = [
        mesh.vertex(face.vertices[0]).input_index.expect("no synthetic vertices"),
        mesh.vertex(face.vertices[1]).input_index.expect("no synthetic vertices"),
        mesh.vertex(face.vertices[2]).input_index.expect("no synthetic vertices"),
      ];
      let edge_indices = [
        output_index_of[&face.edges[0]],
        output_index_of[&face.edges[1]],
        output_index_of[&face.edges[2]],
      ];
      triangles.push(OutputTriangle { vertices, edges: edge_indices });
    }

    TriangulationOutput { edges, triangles }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
  Inside,
  OnEdge(usize),
  Outside,
  OnVertex,
}

fn notify(sink: &mut dyn MeshSnapshotSink, mesh: &Mesh) {
  sink.on_snapshot(mesh, SnapshotAnnotation { reference_circle: None });
}

/// Every vertex with at least one boundary edge (an edge with only one
/// adjacent face).
fn perimeter_vertices(mesh: &Mesh) -> std::collections::HashSet<VertexId> {
  let mut set = std::collections::HashSet::new();
  for e in mesh.edge_ids() {
    let edge = mesh.edge(e);
    if edge.is_boundary() {
      set.insert(edge.vertices[0]);
      set.insert(edge.vertices[1]);
    }
  }
  set
}

/// Steps along the convex-hull perimeter from `from`.
///
/// Every boundary edge's single adjacent face stores it in the face's own
/// counterclockwise vertex order, `(origin, destination)`; following each
/// boundary edge's `origin -> destination` direction traces the whole
/// perimeter in one consistent rotational sense. `forward` follows that
/// sense; `!forward` follows the opposite one.
fn perimeter_step(mesh: &Mesh, from: VertexId, forward: bool) -> Option<VertexId> {
  for &e in &mesh.vertex(from).edges {
    let edge = mesh.edge(e);
    if !edge.is_boundary() {
      continue;
    }
    let f = edge.faces[0];
    let face = mesh.face(f);
    let local = face.edges.iter().position(|&x| x == e)?;
    if face.vertices[local] == from && forward {
      return Some(face.vertices[(local + 1) % 3]);
    }
    if face.vertices[(local + 1) % 3] == from && !forward {
      return Some(face.vertices[local]);
    }
  }
  None
}
