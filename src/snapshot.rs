//! The SVG-rendering collaborator interface, kept at the boundary only —
//! no renderer is implemented here, per the explicit Non-goal in `spec.md`
//! §1. Mirrors `original_source`'s `onSnapshot`/`writeToSvgFile` hook.

use crate::mesh::Mesh;

/// An optional extra point or reference circle to annotate a snapshot with,
/// as the original debug SVG writer supports.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotAnnotation {
  pub reference_circle: Option<(crate::point::Point2, f64)>,
}

/// A sink that receives a mesh snapshot after a mutation, for external
/// debug rendering. The default implementation does nothing; callers that
/// want SVG history (`writeEntireSvgHistory` in `spec.md` §6) provide their
/// own renderer.
pub trait MeshSnapshotSink {
  fn on_snapshot(&mut self, mesh: &Mesh, annotation: SnapshotAnnotation) {
    let _ = (mesh, annotation);
  }
}

/// The default sink: discards every snapshot.
#[derive(Debug, Default)]
pub struct NoopSnapshotSink;

impl MeshSnapshotSink for NoopSnapshotSink {}
