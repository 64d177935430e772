//! # editor-history
//!
//! Barrier-grouped undo/redo command log for editor applications.
//!
//! This crate provides the foundational types for a linear undo/redo
//! system in which operations are grouped into named checkpoints:
//!
//! - [`Editable`] — marker trait for types that can be edited
//! - [`Operation`] — one reversible unit of state change
//! - [`Barrier`] — a named, ordered group of operations bounding one
//!   undo/redo step
//! - [`Environment`] — a pluggable side-effect recorder snapshotted and
//!   replayed alongside each operation
//! - [`History`] — the stack manager owning both barrier lists, the
//!   environment registry, and the save point
//!
//! # Recording model
//!
//! Client code constructs an [`Operation`] capturing the pre-change state
//! immediately before mutating its target, hands it to [`History::add`],
//! and seals the gesture with [`History::barrier`] when the user-visible
//! action completes. Repeated captures within one gesture (every mouse
//! move of a drag) coalesce through [`Operation::is_redundant_with`], so
//! a drag collapses into a single undo step holding the pre-drag state.
//!
//! During [`History::undo`] each operation pushes its *inverse* back
//! through [`History::add`]; the history routes those adds into the redo
//! barrier, which keeps the undone checkpoint's label so redo restores
//! the same named step.
//!
//! # Example
//!
//! ```
//! use editor_history::{AsAny, Editable, History, Operation, OperationResult};
//!
//! struct Document {
//!     x: f32,
//! }
//!
//! impl Editable for Document {}
//!
//! #[derive(Debug)]
//! struct SetX {
//!     prev: f32,
//! }
//!
//! impl Operation<Document> for SetX {
//!     fn undo(&mut self, target: &mut Document, history: &mut History<Document>) -> OperationResult {
//!         history.add(Box::new(SetX { prev: target.x }));
//!         target.x = self.prev;
//!         Ok(())
//!     }
//!
//!     fn is_redundant_with(&self, earlier: &dyn Operation<Document>) -> bool {
//!         earlier.as_any().downcast_ref::<SetX>().is_some()
//!     }
//! }
//!
//! let mut history = History::new();
//! let mut doc = Document { x: 0.0 };
//!
//! history.add(Box::new(SetX { prev: doc.x }));
//! doc.x = 5.0;
//! history.barrier("Set X", true);
//!
//! assert_eq!(history.undo_info(0), Some("Set X"));
//! history.undo(&mut doc).unwrap();
//! assert_eq!(doc.x, 0.0);
//! history.redo(&mut doc).unwrap();
//! assert_eq!(doc.x, 5.0);
//! ```

mod barrier;
mod environment;
mod history;
mod operation;

pub use barrier::Barrier;
pub use environment::{Environment, EnvironmentId, EnvironmentRegistry, EnvironmentSnapshot};
pub use history::{DEFAULT_UNDO_LIMIT, History, HistoryError};
pub use operation::{AsAny, Editable, Operation, OperationError, OperationResult};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
