//! Editable targets and reversible operations.
//!
//! This module defines the leaf abstractions of the command log:
//!
//! - [`Editable`] — marker trait for types that can be edited
//! - [`Operation`] — one reversible unit of state change
//! - [`OperationError`] / [`OperationResult`] — error handling for operations
//!
//! Operations are self-contained: each implementation captures whatever
//! pre-change state it needs (target identifiers, old values, touched
//! resource ids) at the moment the change is made.

use std::any::Any;
use std::fmt;

use crate::history::History;

/// Helper trait for downcasting trait objects to concrete types.
///
/// Automatically implemented for all `'static` types. Used by
/// [`Operation::is_redundant_with`] to downcast `&dyn Operation<T>` to the
/// concrete operation type when deciding whether two captures coalesce.
pub trait AsAny: 'static {
    /// Returns a reference to `self` as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: 'static> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Marker trait for types that serve as editing targets.
///
/// Implement this on whatever your operations mutate — a scene, a document,
/// a terrain block cache.
pub trait Editable: 'static {}

/// Error type for operation replay failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperationError {
    /// The object the operation captured no longer exists on the target.
    #[error("target not found: {0}")]
    TargetNotFound(String),
    /// The target is in a state the operation cannot revert from.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// A custom error with a description.
    #[error("{0}")]
    Custom(String),
}

/// Result type for operation replay.
pub type OperationResult<T = ()> = Result<T, OperationError>;

/// One reversible unit of state change.
///
/// An operation is constructed by client code immediately *before* the
/// change it describes is made, capturing the pre-change state, and handed
/// to [`History::add`](crate::History::add). It is owned by the open
/// [`Barrier`](crate::Barrier) it lands in and replayed at most once per
/// undo/redo traversal of that barrier.
///
/// # Inverse operations
///
/// [`undo`](Self::undo) receives the owning [`History`] so it can push the
/// operation's *inverse* with [`History::add`](crate::History::add) before
/// reverting the target. While a replay is in flight the history routes
/// those adds to the opposite stack, which is how undo populates the redo
/// barrier and redo regenerates a fresh undoable barrier.
///
/// ```ignore
/// #[derive(Debug)]
/// struct SetHeight {
///     block: BlockId,
///     prev: f32,
/// }
///
/// impl Operation<Terrain> for SetHeight {
///     fn undo(&mut self, target: &mut Terrain, history: &mut History<Terrain>) -> OperationResult {
///         // Capture the inverse first, then revert.
///         history.add(Box::new(SetHeight {
///             block: self.block,
///             prev: target.height(self.block),
///         }));
///         target.set_height(self.block, self.prev);
///         Ok(())
///     }
/// }
/// ```
///
/// # Coalescing
///
/// Operations produced by incremental gestures (each mouse move of a drag)
/// can override [`is_redundant_with`](Self::is_redundant_with) so that the
/// open barrier keeps only the first capture — the one holding the original
/// pre-gesture state. Use [`AsAny::as_any`] on `earlier` to downcast.
pub trait Operation<T: Editable>: fmt::Debug + AsAny + Send {
    /// Reverts the target to the state captured at construction.
    ///
    /// Implementations push their inverse via `history.add(..)` *before*
    /// mutating the target, so the inverse captures the current (about to
    /// be reverted) state.
    fn undo(&mut self, target: &mut T, history: &mut History<T>) -> OperationResult;

    /// Whether this operation's data is redundant against `earlier`, an
    /// operation already recorded in the open barrier.
    ///
    /// When this returns `true` the *new* operation (self) is discarded and
    /// the earlier capture kept, so a long drag collapses into a single
    /// undo step holding the pre-drag state. Implementations downcast
    /// `earlier` to their own type; operations of different concrete types
    /// are never redundant.
    ///
    /// Default: `false` (no coalescing).
    fn is_redundant_with(&self, earlier: &dyn Operation<T>) -> bool {
        let _ = earlier;
        false
    }

    /// Whether this operation represents a document content change.
    ///
    /// Return `false` for operations that record UI-only state (entity
    /// selection, camera bookmarks): they stay fully undoable but never
    /// perturb [`History::needs_save`](crate::History::needs_save).
    /// Inverse operations pushed during [`undo`](Self::undo) are expected
    /// to report the same value.
    ///
    /// Default: `true`.
    fn affects_save(&self) -> bool {
        true
    }
}
