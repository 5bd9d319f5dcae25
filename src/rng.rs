//! Two independently seeded PRNG streams, per the reproducibility contract:
//! shuffling the input point order must not perturb the sequence of random
//! choices made while walking the mesh during point location, and vice versa.

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Owns the two PRNG streams a [`crate::point_triangulator::PointTriangulator`]
/// run needs.
///
/// `walk` is reset once per `triangulate()` call (not once per point
/// insertion, and not once per walk step) so that two triangulations of the
/// same input with the same seed produce byte-identical meshes.
pub struct TriangulatorRng {
  seed: u64,
  shuffle: SmallRng,
  walk: SmallRng,
}

impl TriangulatorRng {
  pub fn new(seed: u64) -> TriangulatorRng {
    TriangulatorRng {
      seed,
      shuffle: SmallRng::seed_from_u64(seed),
      walk: SmallRng::seed_from_u64(seed.wrapping_add(0x9E37_79B9_7F4A_7C15)),
    }
  }

  pub fn shuffle_rng(&mut self) -> &mut SmallRng {
    &mut self.shuffle
  }

  pub fn walk_rng(&mut self) -> &mut SmallRng {
    &mut self.walk
  }

  /// Resets the walk stream to its initial state for this seed. Called once
  /// at the start of every `triangulate()` invocation.
  pub fn reset_walk(&mut self) {
    self.walk = SmallRng::seed_from_u64(self.seed.wrapping_add(0x9E37_79B9_7F4A_7C15));
  }
}

impl Default for TriangulatorRng {
  fn default() -> TriangulatorRng {
    TriangulatorRng::new(0x5EED)
  }
}
