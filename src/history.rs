//! The barrier-grouped undo/redo stack.
//!
//! [`History`] owns two ordered lists of sealed [`Barrier`]s plus the
//! currently open barrier receiving new operations. Client code records an
//! [`Operation`] for every change it makes and seals the group with
//! [`barrier`](History::barrier) when the user-visible action completes;
//! [`undo`](History::undo) replays the latest sealed group in reverse and
//! collects the inverse operations into a redo barrier under the same
//! label.

use std::fmt;

use crate::barrier::{Barrier, Entry};
use crate::environment::{Environment, EnvironmentId, EnvironmentRegistry};
use crate::operation::{Editable, Operation, OperationError, OperationResult};

/// Undo depth a typical editor session configures when it does not pick
/// its own limit.
pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// Error type for history replay.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// `undo`/`redo` was called while the open barrier still holds pending
    /// operations — the caller must seal the gesture with
    /// [`History::barrier`] first.
    #[error("cannot replay history with {0} pending operation(s) in the open barrier")]
    BarrierOpen(usize),
    /// An operation failed while replaying.
    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Where [`History::add`] routes incoming operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplayMode {
    /// Not replaying: adds go to the open undo barrier.
    Idle,
    /// Undoing: adds are inverses, collected for the redo barrier.
    Undoing,
    /// Redoing: adds regenerate the undo barrier through the normal path.
    Redoing,
}

/// Manages the undo and redo barrier stacks for one editing session.
///
/// # Example
///
/// ```ignore
/// let mut history = History::with_undo_limit(DEFAULT_UNDO_LIMIT);
/// let mut scene = Scene::new();
///
/// // Record the pre-change state, make the change, seal the gesture.
/// history.add(Box::new(MoveEntity::capture(&scene, entity)));
/// scene.translate(entity, delta);
/// history.barrier("Move entity", true);
///
/// // Drive the edit menu.
/// if history.can_undo() {
///     let label = history.undo(&mut scene)?;
/// }
/// ```
pub struct History<T: Editable> {
    /// Sealed barriers, oldest first.
    undo_list: Vec<Barrier<T>>,
    /// Sealed redo barriers, next-to-redo last.
    redo_list: Vec<Barrier<T>>,
    /// The barrier currently receiving operations.
    open: Barrier<T>,
    /// Inverse entries collected while an undo replay is in flight.
    pending_redo: Vec<Entry<T>>,
    environments: EnvironmentRegistry,
    mode: ReplayMode,
    undo_limit: Option<usize>,
    /// Sealed save-affecting barriers between the current state and the
    /// last save: positive = undos away, negative = redos away, `None` =
    /// permanently unreachable (evicted, discarded with the redo branch,
    /// or forced dirty).
    save_distance: Option<i64>,
}

impl<T: Editable> History<T> {
    /// Creates an empty history with unbounded undo depth.
    pub fn new() -> Self {
        Self {
            undo_list: Vec::new(),
            redo_list: Vec::new(),
            open: Barrier::open(),
            pending_redo: Vec::new(),
            environments: EnvironmentRegistry::new(),
            mode: ReplayMode::Idle,
            undo_limit: None,
            save_distance: Some(0),
        }
    }

    /// Creates an empty history that keeps at most `limit` sealed barriers,
    /// evicting the oldest when a new one is sealed.
    pub fn with_undo_limit(limit: usize) -> Self {
        Self {
            undo_limit: Some(limit),
            ..Self::new()
        }
    }

    /// Records an operation.
    ///
    /// Outside a replay the operation lands in the open barrier (after the
    /// redundancy scan — see [`Operation::is_redundant_with`]) and the redo
    /// list is cleared. During an undo replay it is collected for the redo
    /// barrier instead; during a redo replay it regenerates the undo
    /// barrier through the normal path, coalescing included. Every stored
    /// operation snapshots the registered [`Environment`]s at add time.
    pub fn add(&mut self, op: Box<dyn Operation<T>>) {
        match self.mode {
            ReplayMode::Undoing => {
                let snapshots = self.environments.record_all();
                self.pending_redo.push(Entry { op, snapshots });
            }
            ReplayMode::Idle | ReplayMode::Redoing => self.add_undo(op),
        }
    }

    fn add_undo(&mut self, op: Box<dyn Operation<T>>) {
        if self.mode == ReplayMode::Idle {
            self.invalidate_redo();
        }
        if self.open.contains_redundant(op.as_ref()) {
            // The earliest capture holds the pre-gesture state; this one
            // is a duplicate intermediate.
            log::trace!("discarding redundant operation {op:?}");
            return;
        }
        let snapshots = self.environments.record_all();
        self.open.push(Entry { op, snapshots });
    }

    /// Seals the open barrier under `label`, closing one undo step.
    ///
    /// Forward history is invalidated by the new checkpoint, so the redo
    /// list is cleared even when nothing was recorded. If the open barrier
    /// is empty and `skip_if_no_change` is set, no history entry is
    /// created; if it is empty and the flag is not set, a warning is
    /// logged and the empty barrier sealed anyway. Sealing enforces the
    /// configured undo limit.
    pub fn barrier(&mut self, label: &str, skip_if_no_change: bool) {
        self.invalidate_redo();
        if self.open.is_empty() {
            if skip_if_no_change {
                return;
            }
            log::warn!("sealing barrier {label:?} with no recorded operations");
        }
        self.seal(label.to_owned());
    }

    /// Undoes the most recent sealed barrier.
    ///
    /// The open barrier must be empty ([`HistoryError::BarrierOpen`]
    /// otherwise) — an in-flight gesture cannot be undone. Replays the
    /// barrier's operations in reverse insertion order, pushing the redo
    /// barrier they generate under the same label, and returns that label,
    /// or `Ok(None)` if there was nothing to undo.
    pub fn undo(&mut self, target: &mut T) -> Result<Option<String>, HistoryError> {
        if !self.open.is_empty() {
            return Err(HistoryError::BarrierOpen(self.open.len()));
        }
        let Some(mut barrier) = self.undo_list.pop() else {
            return Ok(None);
        };
        let label = barrier.label().to_owned();
        let affects_save = barrier.affects_save();

        self.mode = ReplayMode::Undoing;
        let result = self.replay(&mut barrier, target);
        self.mode = ReplayMode::Idle;

        let entries = std::mem::take(&mut self.pending_redo);
        self.redo_list.push(Barrier::sealed(label.clone(), entries));
        if affects_save {
            if let Some(d) = &mut self.save_distance {
                *d -= 1;
            }
        }
        result?;
        Ok(Some(label))
    }

    /// Redoes the most recently undone barrier.
    ///
    /// Mirror image of [`undo`](Self::undo): the replayed inverses flow
    /// through the normal recording path, regenerating a fresh undoable
    /// barrier that is re-sealed under the redo barrier's original label.
    pub fn redo(&mut self, target: &mut T) -> Result<Option<String>, HistoryError> {
        if !self.open.is_empty() {
            return Err(HistoryError::BarrierOpen(self.open.len()));
        }
        let Some(mut barrier) = self.redo_list.pop() else {
            return Ok(None);
        };
        let label = barrier.label().to_owned();

        self.mode = ReplayMode::Redoing;
        let result = self.replay(&mut barrier, target);
        self.mode = ReplayMode::Idle;

        self.seal(label.clone());
        result?;
        Ok(Some(label))
    }

    /// Returns `true` if there is a sealed barrier to undo and no gesture
    /// is mid-flight.
    pub fn can_undo(&self) -> bool {
        !self.undo_list.is_empty() && self.open.is_empty()
    }

    /// Returns `true` if there is a sealed barrier to redo and no gesture
    /// is mid-flight.
    pub fn can_redo(&self) -> bool {
        !self.redo_list.is_empty() && self.open.is_empty()
    }

    /// Label of the barrier `level` undo steps away (0 = next to undo).
    pub fn undo_info(&self, level: usize) -> Option<&str> {
        self.undo_list.iter().rev().nth(level).map(Barrier::label)
    }

    /// Label of the barrier `level` redo steps away (0 = next to redo).
    pub fn redo_info(&self, level: usize) -> Option<&str> {
        self.redo_list.iter().rev().nth(level).map(Barrier::label)
    }

    /// Number of sealed undo barriers.
    pub fn undo_count(&self) -> usize {
        self.undo_list.len()
    }

    /// Number of sealed redo barriers.
    pub fn redo_count(&self) -> usize {
        self.redo_list.len()
    }

    /// Number of operations recorded in the open barrier.
    pub fn pending_count(&self) -> usize {
        self.open.len()
    }

    /// The configured undo depth, if bounded.
    pub fn undo_limit(&self) -> Option<usize> {
        self.undo_limit
    }

    /// Discards all history and pending state.
    ///
    /// If the current state was the saved state it remains so; otherwise
    /// the save point is permanently lost and
    /// [`needs_save`](Self::needs_save) latches `true` until the next
    /// [`set_save_point`](Self::set_save_point).
    pub fn clear(&mut self) {
        self.undo_list.clear();
        self.redo_list.clear();
        self.open = Barrier::open();
        self.pending_redo.clear();
        if self.save_distance != Some(0) {
            self.save_distance = None;
        }
    }

    /// Records the current state as the last-saved state.
    pub fn set_save_point(&mut self) {
        self.save_distance = Some(0);
    }

    /// Returns `true` if the document differs (or can no longer be proven
    /// equal) to the state at the last save point.
    pub fn needs_save(&self) -> bool {
        self.save_distance != Some(0)
    }

    /// Marks the document dirty regardless of history depth, until the
    /// next [`set_save_point`](Self::set_save_point). Used when something
    /// outside the undo log changed the document.
    pub fn force_save(&mut self) {
        self.save_distance = None;
    }

    /// Registers a side-effect recorder snapshotted with every operation
    /// recorded from now on.
    pub fn register_environment(&mut self, recorder: Box<dyn Environment>) -> EnvironmentId {
        self.environments.register(recorder)
    }

    /// Deregisters a recorder. Snapshots already stored for it are skipped
    /// on later replays.
    pub fn deregister_environment(&mut self, id: EnvironmentId) -> Option<Box<dyn Environment>> {
        self.environments.deregister(id)
    }

    /// The session's environment registry.
    pub fn environments(&self) -> &EnvironmentRegistry {
        &self.environments
    }

    fn replay(&mut self, barrier: &mut Barrier<T>, target: &mut T) -> OperationResult {
        while let Some(mut entry) = barrier.pop_entry() {
            self.environments.replay_all(&entry.snapshots);
            entry.op.undo(target, self)?;
        }
        Ok(())
    }

    fn invalidate_redo(&mut self) {
        self.redo_list.clear();
        // A save point sitting in the discarded redo branch is gone.
        if matches!(self.save_distance, Some(d) if d < 0) {
            self.save_distance = None;
        }
    }

    fn seal(&mut self, label: String) {
        let mut sealed = std::mem::replace(&mut self.open, Barrier::open());
        sealed.set_label(label);
        if sealed.affects_save() {
            if let Some(d) = &mut self.save_distance {
                *d += 1;
            }
        }
        self.undo_list.push(sealed);
        self.enforce_undo_limit();
    }

    fn enforce_undo_limit(&mut self) {
        let Some(limit) = self.undo_limit else {
            return;
        };
        while self.undo_list.len() > limit {
            let evicted = self.undo_list.remove(0);
            log::debug!("undo limit {limit}: evicting barrier {:?}", evicted.label());
        }
        if let Some(d) = self.save_distance {
            let reachable = self.undo_list.iter().filter(|b| b.affects_save()).count() as i64;
            if d > reachable {
                self.save_distance = None;
            }
        }
    }
}

impl<T: Editable> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Editable> fmt::Debug for History<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("undo_count", &self.undo_list.len())
            .field("redo_count", &self.redo_list.len())
            .field("pending_count", &self.open.len())
            .field("undo_limit", &self.undo_limit)
            .field("save_distance", &self.save_distance)
            .finish()
    }
}
