//! Pluggable side-effect recorders snapshotted alongside every operation.
//!
//! Subsystems that track side-channel state the undo log does not own —
//! the canonical example is a dirty-resource tracker noting which terrain
//! chunks an edit touched — register an [`Environment`] with the history's
//! [`EnvironmentRegistry`]. Every recorded operation snapshots all
//! registered recorders at add time; each undo/redo traversal replays
//! those snapshots before the operation itself runs, restoring the
//! side-channel state that accompanied the original edit.

use std::any::Any;
use std::fmt;

/// Opaque snapshot produced by an [`Environment`] recorder.
pub type EnvironmentSnapshot = Box<dyn Any + Send>;

/// A side-effect recorder snapshotted with each operation.
///
/// Implementations choose their own snapshot representation; the registry
/// stores it as an opaque [`EnvironmentSnapshot`] and hands it back to the
/// same recorder on replay. Recorders are registered for the lifetime of
/// their owning subsystem — snapshots taken while a recorder was
/// registered are silently skipped on replay once it is deregistered.
pub trait Environment: Send {
    /// Captures the recorder's current side-channel state.
    fn record(&mut self) -> EnvironmentSnapshot;

    /// Re-applies a snapshot previously returned by [`record`](Self::record).
    fn replay(&mut self, snapshot: &(dyn Any + Send));
}

/// Stable handle to a registered [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvironmentId(u64);

/// Ordered registry of [`Environment`] recorders.
///
/// Owned by the [`History`](crate::History) so registration scope follows
/// the editing session rather than a process-wide static.
#[derive(Default)]
pub struct EnvironmentRegistry {
    recorders: Vec<(EnvironmentId, Box<dyn Environment>)>,
    next_id: u64,
}

impl EnvironmentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a recorder, returning its handle.
    pub fn register(&mut self, recorder: Box<dyn Environment>) -> EnvironmentId {
        let id = EnvironmentId(self.next_id);
        self.next_id += 1;
        self.recorders.push((id, recorder));
        id
    }

    /// Removes a recorder. Returns it so the owning subsystem can reclaim
    /// any state it holds, or `None` if the id was already deregistered.
    pub fn deregister(&mut self, id: EnvironmentId) -> Option<Box<dyn Environment>> {
        let index = self.recorders.iter().position(|(rid, _)| *rid == id)?;
        Some(self.recorders.remove(index).1)
    }

    /// Returns the number of registered recorders.
    pub fn len(&self) -> usize {
        self.recorders.len()
    }

    /// Returns `true` if no recorders are registered.
    pub fn is_empty(&self) -> bool {
        self.recorders.is_empty()
    }

    /// Snapshots every registered recorder, in registration order.
    pub(crate) fn record_all(&mut self) -> Vec<(EnvironmentId, EnvironmentSnapshot)> {
        self.recorders
            .iter_mut()
            .map(|(id, recorder)| (*id, recorder.record()))
            .collect()
    }

    /// Replays a snapshot set. Snapshots whose recorder has been
    /// deregistered since they were taken are skipped.
    pub(crate) fn replay_all(&mut self, snapshots: &[(EnvironmentId, EnvironmentSnapshot)]) {
        for (id, snapshot) in snapshots {
            if let Some((_, recorder)) = self.recorders.iter_mut().find(|(rid, _)| rid == id) {
                recorder.replay(snapshot.as_ref());
            }
        }
    }
}

impl fmt::Debug for EnvironmentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentRegistry")
            .field("recorders", &self.recorders.len())
            .finish()
    }
}
