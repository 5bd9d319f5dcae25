//! Triangulation of a polygonal region (possibly with holes) by reduction
//! to the point triangulator plus an inside/outside flood fill.
//!
//! Grounded in `original_source/src/delaunay/PolygonTriangulator.{h,cpp}`:
//! the `ConnectivityEdge` concept becomes [`Connectivity`] below, and
//! `setTriangleNeighborhoodOrientation` becomes [`flood_fill`].

use std::collections::{HashMap, VecDeque};

use crate::error::Result;
use crate::point::{Point2, PointId};
use crate::point_triangulator::{OutputEdge, OutputTriangle, PointTriangulator, PointTriangulatorOptions};
use crate::validation::ValidationReport;

pub use PointTriangulatorOptions as PolygonTriangulatorOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriangleOrientation {
  Undetermined,
  Inside,
  Outside,
}

#[derive(Debug, Clone, Default)]
pub struct TriangulationOutput {
  pub edges: Vec<OutputEdge>,
  pub triangles: Vec<OutputTriangle>,
}

/// Triangulates one exterior polygon plus zero or more hole polygons (each
/// a cyclic sequence of point indices) and optional extra interior
/// constraint edges, emitting only the faces covering the polygon's
/// interior.
pub struct PolygonTriangulator {
  points: Vec<Point2>,
  polygons: Vec<Vec<PointId>>,
  extra_constraint_edges: Vec<(PointId, PointId)>,
  options: PolygonTriangulatorOptions,
}

impl PolygonTriangulator {
  pub fn new(points: Vec<Point2>, polygons: Vec<Vec<PointId>>) -> PolygonTriangulator {
    PolygonTriangulator {
      points,
      polygons,
      extra_constraint_edges: Vec::new(),
      options: PolygonTriangulatorOptions::default(),
    }
  }

  pub fn with_options(
    points: Vec<Point2>,
    polygons: Vec<Vec<PointId>>,
    extra_constraint_edges: Vec<(PointId, PointId)>,
    options: PolygonTriangulatorOptions,
  ) -> PolygonTriangulator {
    PolygonTriangulator { points, polygons, extra_constraint_edges, options }
  }

  fn aggregate_input_edges(&self) -> Vec<(PointId, PointId)> {
    let mut edges = Vec::new();
    for polygon in &self.polygons {
      for i in 0..polygon.len() {
        edges.push((polygon[i], polygon[(i + 1) % polygon.len()]));
      }
    }
    edges.extend(self.extra_constraint_edges.iter().copied());
    edges
  }

  /// Every check the point triangulator performs, plus the polygon-mode
  /// check from `spec.md` §4.4: at the leftmost input point, its polygon's
  /// two incident edges must turn counterclockwise (i.e. the polygon is
  /// wound the expected way — counterclockwise for the exterior, clockwise
  /// for holes).
  pub fn validate(&self) -> ValidationReport {
    let base = PointTriangulator::with_options(self.points.clone(), self.aggregate_input_edges(), self.options);
    let mut report = base.validate();

    if self.points.is_empty() {
      return report;
    }
    let leftmost = (0..self.points.len())
      .min_by(|&a, &b| {
        let (pa, pb) = (self.points[a], self.points[b]);
        pa.x().partial_cmp(&pb.x()).unwrap().then(pa.y().partial_cmp(&pb.y()).unwrap())
      })
      .unwrap();

    for polygon in &self.polygons {
      if let Some(i) = polygon.iter().position(|&p| p.0 == leftmost) {
        let n = polygon.len();
        let prev = polygon[(i + n - 1) % n];
        let cur = polygon[i];
        let next = polygon[(i + 1) % n];
        let (pp, pc, pn) = (self.points[prev.0], self.points[cur.0], self.points[next.0]);
        if !crate::predicates::orient2d(&pp, &pc, &pn).is_ccw() {
          report.exterior_perimeter_is_not_counterclockwise = true;
        }
      }
    }

    report
  }

  pub fn triangulate(&self) -> Result<TriangulationOutput> {
    debug_assert!(self.validate().is_valid(), "triangulate() called on invalid input");

    let aggregate_edges = self.aggregate_input_edges();
    let polygon_edge_count: usize = self.polygons.iter().map(|p| p.len()).sum();

    let base = PointTriangulator::with_options(self.points.clone(), aggregate_edges.clone(), self.options);
    let point_output = base.triangulate()?;

    let connectivity = Connectivity::build(&point_output.triangles);
    let orientation = flood_fill(&point_output, &connectivity, &aggregate_edges, polygon_edge_count)?;

    let mut remap: HashMap<usize, usize> = HashMap::new();
    let mut edges = Vec::new();
    let mut triangles = Vec::new();

    for (t_idx, triangle) in point_output.triangles.iter().enumerate() {
      if orientation[t_idx] != TriangleOrientation::Inside {
        continue;
      }
      let mut new_edge_indices = [0usize; 3];
      for k in 0..3 {
        let old_edge_index = triangle.edges[k];
        let new_index = *remap.entry(old_edge_index).or_insert_with(|| {
          edges.push(point_output.edges[old_edge_index]);
          edges.len() - 1
        });
        new_edge_indices[k] = new_index;
      }
      triangles.push(OutputTriangle { vertices: triangle.vertices, edges: new_edge_indices });
    }

    Ok(TriangulationOutput { edges, triangles })
  }
}

/// Maps each point-triangulator output edge index to the 1 or 2 triangles
/// (by index into `point_output.triangles`) adjacent to it.
struct Connectivity {
  adjacency: HashMap<usize, Vec<usize>>,
}

impl Connectivity {
  fn build(triangles: &[OutputTriangle]) -> Connectivity {
    let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();
    for (t_idx, triangle) in triangles.iter().enumerate() {
      for &e in &triangle.edges {
        adjacency.entry(e).or_default().push(t_idx);
      }
    }
    Connectivity { adjacency }
  }

  fn triangles_of(&self, edge_index: usize) -> &[usize] {
    self.adjacency.get(&edge_index).map(|v| v.as_slice()).unwrap_or(&[])
  }
}

/// Classifies every triangle INSIDE or OUTSIDE the polygon region by
/// flood-filling from triangles seeded at a polygon-boundary edge, per
/// `spec.md` §4.4 step 4.
fn flood_fill(
  point_output: &crate::point_triangulator::TriangulationOutput,
  connectivity: &Connectivity,
  aggregate_edges: &[(PointId, PointId)],
  polygon_edge_count: usize,
) -> Result<Vec<TriangleOrientation>> {
  let n_triangles = point_output.triangles.len();
  let mut orientation = vec![TriangleOrientation::Undetermined; n_triangles];

  // `point_output.edges[k]` for k < polygon_edge_count is the boundary edge
  // recorded at input position k, in its original (start -> end) direction.
  let boundary_direction: HashMap<usize, (PointId, PointId)> =
    (0..polygon_edge_count).map(|k| (k, aggregate_edges[k])).collect();

  let mut queue: VecDeque<usize> = VecDeque::new();

  for (&edge_index, &(start, end)) in &boundary_direction {
    for &t_idx in connectivity.triangles_of(edge_index) {
      if orientation[t_idx] != TriangleOrientation::Undetermined {
        continue;
      }
      let triangle = &point_output.triangles[t_idx];
      let local = triangle.edges.iter().position(|&e| e == edge_index).expect("edge belongs to this triangle");
      let (tri_start, tri_end) = (triangle.vertices[local], triangle.vertices[(local + 1) % 3]);
      orientation[t_idx] = if tri_start == start && tri_end == end {
        TriangleOrientation::Inside
      } else {
        TriangleOrientation::Outside
      };
      queue.push_back(t_idx);
    }
  }

  while let Some(t_idx) = queue.pop_front() {
    let label = orientation[t_idx];
    let triangle = &point_output.triangles[t_idx];
    for &e in &triangle.edges {
      if e < polygon_edge_count {
        continue;
      }
      for &neighbor in connectivity.triangles_of(e) {
        if neighbor == t_idx {
          continue;
        }
        if orientation[neighbor] == TriangleOrientation::Undetermined {
          orientation[neighbor] = label;
          queue.push_back(neighbor);
        }
      }
    }
  }

  Ok(orientation)
}
