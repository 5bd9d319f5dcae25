use std::fmt;

/// An internal invariant or surgery-primitive precondition was violated.
///
/// These only ever arise from a logic bug in the mesh or triangulation
/// algorithms themselves, never from malformed caller input — malformed
/// input is reported through [`crate::validation::ValidationReport`] instead.
/// Per the error-handling design, a logic bug is a fatal condition: there is
/// no graceful recovery because the mesh's topological integrity is the
/// algorithm's foundation. Callers that see this variant should treat it as
/// a bug report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangulationError {
  /// A surgery primitive was called with a handle that no longer refers to
  /// a live element (it was deleted, or belongs to a different mesh).
  StaleHandle,
  /// A surgery primitive's documented precondition did not hold.
  PreconditionViolation(&'static str),
  /// A §3 adjacency invariant was found violated while performing an
  /// operation.
  InvariantViolation(&'static str),
  /// An iterative process (insertion loop, legalization work list) exceeded
  /// its defensive step bound without terminating. This indicates a logic
  /// bug in the predicates or topology, not a resource limit a caller can
  /// work around.
  ExceededStepBound,
}

impl fmt::Display for TriangulationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TriangulationError::StaleHandle => write!(f, "handle refers to a deleted mesh element"),
      TriangulationError::PreconditionViolation(msg) => {
        write!(f, "precondition violated: {}", msg)
      }
      TriangulationError::InvariantViolation(msg) => write!(f, "invariant violated: {}", msg),
      TriangulationError::ExceededStepBound => {
        write!(f, "exceeded defensive step bound during triangulation")
      }
    }
  }
}

impl std::error::Error for TriangulationError {}

pub type Result<T> = std::result::Result<T, TriangulationError>;
