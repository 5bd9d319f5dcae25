use cdt_core::point::Point2;
use cdt_core::{PointId, PointTriangulator, PointTriangulatorOptions};

fn pid(i: usize) -> PointId {
  PointId(i)
}

fn orient2d(a: Point2, b: Point2, c: Point2) -> f64 {
  geometry_predicates::orient2d([a.x(), a.y()], [b.x(), b.y()], [c.x(), c.y()])
}

fn assert_ccw_triangles(points: &[Point2], triangles: &[cdt_core::OutputTriangle]) {
  for t in triangles {
    let p0 = points[t.vertices[0].0];
    let p1 = points[t.vertices[1].0];
    let p2 = points[t.vertices[2].0];
    claims::assert_gt!(orient2d(p0, p1, p2), 0.0);
  }
}

fn assert_edges_match_triangle_winding(triangles: &[cdt_core::OutputTriangle], edges: &[cdt_core::OutputEdge]) {
  for t in triangles {
    for k in 0..3 {
      let e = &edges[t.edges[k]];
      let a = t.vertices[k];
      let b = t.vertices[(k + 1) % 3];
      assert!((e.i == a && e.j == b) || (e.i == b && e.j == a));
    }
  }
}

#[test]
fn scenario_a_minimal_triangle() {
  let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)];
  let t = PointTriangulator::new(points.clone());
  assert!(t.validate().is_valid());
  let out = t.triangulate().expect("triangulation should succeed");
  assert_eq!(out.triangles.len(), 1);
  assert_eq!(out.edges.len(), 3);
  assert_ccw_triangles(&points, &out.triangles);
  assert_edges_match_triangle_winding(&out.triangles, &out.edges);
}

#[test]
fn scenario_b_unit_square() {
  let points =
    vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(1.0, 1.0), Point2::new(0.0, 1.0)];
  let options = PointTriangulatorOptions { shuffle_points: false, ..PointTriangulatorOptions::default() };
  let t = PointTriangulator::with_options(points.clone(), Vec::new(), options);
  let out = t.triangulate().expect("triangulation should succeed");
  assert_eq!(out.triangles.len(), 2);
  assert_eq!(out.edges.len(), 5);
  assert_ccw_triangles(&points, &out.triangles);
}

#[test]
fn scenario_c_square_with_forced_diagonal() {
  let points =
    vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(1.0, 1.0), Point2::new(0.0, 1.0)];
  let constraints = vec![(pid(0), pid(2))];
  let t = PointTriangulator::with_options(points.clone(), constraints, PointTriangulatorOptions::default());
  let out = t.triangulate().expect("triangulation should succeed");
  assert_eq!(out.triangles.len(), 2);
  let diagonal_present = out.triangles.iter().any(|tri| {
    let vs = &tri.vertices;
    vs.contains(&pid(0)) && vs.contains(&pid(2))
  });
  assert!(diagonal_present);
  assert_eq!(out.edges[0].i, pid(0));
  assert_eq!(out.edges[0].j, pid(2));
}

#[test]
fn scenario_e_crossing_constraints_fail_validation() {
  let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), Point2::new(0.0, 1.0), Point2::new(1.0, 0.0)];
  let constraints = vec![(pid(0), pid(1)), (pid(2), pid(3))];
  let t = PointTriangulator::with_options(points, constraints, PointTriangulatorOptions::default());
  let report = t.validate();
  assert!(!report.is_valid());
  assert!(report.some_edges_intersect);
}

#[test]
fn scenario_f_three_colinear_points() {
  let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)];
  let t = PointTriangulator::new(points);
  let report = t.validate();
  assert!(!report.is_valid());
  assert!(report.all_points_are_colinear);
}

#[test]
fn property_13_colinear_points_plus_one_off_line() {
  let points = vec![
    Point2::new(0.0, 0.0),
    Point2::new(1.0, 0.0),
    Point2::new(2.0, 0.0),
    Point2::new(3.0, 0.0),
    Point2::new(1.5, 1.0),
  ];
  let t = PointTriangulator::new(points.clone());
  let out = t.triangulate().expect("triangulation should succeed");
  assert_eq!(out.triangles.len(), 3);
  assert_ccw_triangles(&points, &out.triangles);
}

#[test]
fn property_14_convex_polygon_produces_n_minus_two_triangles() {
  let n = 8;
  let points: Vec<Point2> = (0..n)
    .map(|i| {
      let theta = (i as f64) / (n as f64) * std::f64::consts::TAU;
      Point2::new(theta.cos(), theta.sin())
    })
    .collect();
  let t = PointTriangulator::new(points.clone());
  let out = t.triangulate().expect("triangulation should succeed");
  assert_eq!(out.triangles.len(), n - 2);
  assert_ccw_triangles(&points, &out.triangles);
}

#[test]
fn property_10_deterministic_without_shuffle() {
  let points: Vec<Point2> =
    (0..20).map(|i| Point2::new((i as f64 * 37.0) % 11.0, (i as f64 * 53.0) % 13.0)).collect();
  let options = PointTriangulatorOptions { shuffle_points: false, ..PointTriangulatorOptions::default() };
  let t1 = PointTriangulator::with_options(points.clone(), Vec::new(), options);
  let t2 = PointTriangulator::with_options(points, Vec::new(), options);
  let out1 = t1.triangulate().expect("first triangulation should succeed");
  let out2 = t2.triangulate().expect("second triangulation should succeed");
  assert_eq!(out1.triangles, out2.triangles);
  assert_eq!(out1.edges, out2.edges);
}

#[test]
fn property_11_deterministic_with_fixed_seed_shuffle() {
  let points: Vec<Point2> =
    (0..20).map(|i| Point2::new((i as f64 * 37.0) % 11.0, (i as f64 * 53.0) % 13.0)).collect();
  let t1 = PointTriangulator::new(points.clone());
  let t2 = PointTriangulator::new(points);
  let out1 = t1.triangulate().expect("first triangulation should succeed");
  let out2 = t2.triangulate().expect("second triangulation should succeed");
  assert_eq!(out1.triangles, out2.triangles);
  assert_eq!(out1.edges, out2.edges);
}

#[test]
fn property_3_every_edge_borders_one_or_two_triangles() {
  let points: Vec<Point2> =
    (0..15).map(|i| Point2::new((i as f64 * 41.0) % 10.0, (i as f64 * 31.0) % 9.0)).collect();
  let t = PointTriangulator::new(points);
  let out = t.triangulate().expect("triangulation should succeed");
  let mut uses = vec![0usize; out.edges.len()];
  for tri in &out.triangles {
    for &e in &tri.edges {
      uses[e] += 1;
    }
  }
  for &count in &uses {
    assert!(count == 1 || count == 2);
  }
}

#[test]
fn property_4_every_input_point_appears_in_some_triangle() {
  let points: Vec<Point2> =
    (0..15).map(|i| Point2::new((i as f64 * 41.0) % 10.0, (i as f64 * 31.0) % 9.0)).collect();
  let t = PointTriangulator::new(points.clone());
  let out = t.triangulate().expect("triangulation should succeed");
  let mut seen = vec![false; points.len()];
  for tri in &out.triangles {
    for v in tri.vertices {
      seen[v.0] = true;
    }
  }
  assert!(seen.iter().all(|&s| s));
}

#[test]
fn property_9_euler_formula_holds() {
  let points: Vec<Point2> =
    (0..15).map(|i| Point2::new((i as f64 * 41.0) % 10.0, (i as f64 * 31.0) % 9.0)).collect();
  let t = PointTriangulator::new(points);
  let out = t.triangulate().expect("triangulation should succeed");
  let v = out.triangles.iter().flat_map(|tri| tri.vertices).map(|p| p.0).collect::<std::collections::HashSet<_>>().len();
  let e = out.edges.len();
  let f = out.triangles.len();
  assert_eq!(v as isize - e as isize + f as isize, 1);
}

#[test]
fn universal_invariant_delaunay_property_holds_unconstrained() {
  let points: Vec<Point2> =
    (0..30).map(|i| Point2::new((i as f64 * 17.0) % 9.0, (i as f64 * 29.0) % 7.0)).collect();
  let t = PointTriangulator::new(points.clone());
  let out = t.triangulate().expect("triangulation should succeed");
  for tri in &out.triangles {
    let (a, b, c) = (points[tri.vertices[0].0], points[tri.vertices[1].0], points[tri.vertices[2].0]);
    for (idx, p) in points.iter().enumerate() {
      if tri.vertices.iter().any(|v| v.0 == idx) {
        continue;
      }
      let sign = geometry_predicates::incircle([a.x(), a.y()], [b.x(), b.y()], [c.x(), c.y()], [p.x(), p.y()]);
      claims::assert_le!(sign, 1e-9);
    }
  }
}
