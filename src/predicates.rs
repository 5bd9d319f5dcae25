//! Exact/adaptive-precision geometric predicates.
//!
//! All topology-deciding tests funnel through here so that the rest of the
//! crate never compares floating point coordinates directly. Backed by
//! `geometry_predicates`, which implements Shewchuk's adaptive-precision
//! orientation and in-circle tests.

use crate::point::Point2;

/// Orientation of an ordered triple of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
  CounterClockWise,
  ClockWise,
  CoLinear,
}

impl Orientation {
  pub fn is_ccw(self) -> bool {
    matches!(self, Orientation::CounterClockWise)
  }

  pub fn is_cw(self) -> bool {
    matches!(self, Orientation::ClockWise)
  }

  pub fn is_colinear(self) -> bool {
    matches!(self, Orientation::CoLinear)
  }

  pub fn reverse(self) -> Orientation {
    match self {
      Orientation::CounterClockWise => Orientation::ClockWise,
      Orientation::ClockWise => Orientation::CounterClockWise,
      Orientation::CoLinear => Orientation::CoLinear,
    }
  }
}

/// Sign of twice the signed area of triangle `(a, b, c)`.
pub fn orient2d(a: &Point2, b: &Point2, c: &Point2) -> Orientation {
  let sign = geometry_predicates::orient2d(
    [a.array[0], a.array[1]],
    [b.array[0], b.array[1]],
    [c.array[0], c.array[1]],
  );
  if sign > 0.0 {
    Orientation::CounterClockWise
  } else if sign < 0.0 {
    Orientation::ClockWise
  } else {
    Orientation::CoLinear
  }
}

/// `true` if `d` lies strictly inside the circle through `a, b, c` (which
/// must be given in counterclockwise order).
pub fn in_circle(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> bool {
  let sign = geometry_predicates::incircle(
    [a.array[0], a.array[1]],
    [b.array[0], b.array[1]],
    [c.array[0], c.array[1]],
    [d.array[0], d.array[1]],
  );
  sign > 0.0
}

/// `true` if `p`, known to be colinear with `a` and `b`, lies within the
/// closed segment `(a, b)`'s bounding interval.
pub fn colinear_point_on_segment(a: &Point2, b: &Point2, p: &Point2) -> bool {
  on_segment(a, b, p)
}

/// `true` if segments `(a, b)` and `(c, d)` intersect, including touching at
/// an endpoint. Used while walking the mesh to find the edge a constraint
/// crosses.
pub fn segments_intersect(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> bool {
  let o1 = orient2d(a, b, c);
  let o2 = orient2d(a, b, d);
  let o3 = orient2d(c, d, a);
  let o4 = orient2d(c, d, b);

  if o1 != o2 && o3 != o4 {
    return true;
  }

  (o1.is_colinear() && on_segment(a, b, c))
    || (o2.is_colinear() && on_segment(a, b, d))
    || (o3.is_colinear() && on_segment(c, d, a))
    || (o4.is_colinear() && on_segment(c, d, b))
}

fn on_segment(a: &Point2, b: &Point2, p: &Point2) -> bool {
  p.x() >= a.x().min(b.x())
    && p.x() <= a.x().max(b.x())
    && p.y() >= a.y().min(b.y())
    && p.y() <= a.y().max(b.y())
}
