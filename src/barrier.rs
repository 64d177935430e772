//! Named groups of operations bounding one undo/redo step.

use std::fmt;

use crate::environment::{EnvironmentId, EnvironmentSnapshot};
use crate::operation::{Editable, Operation};

/// One recorded operation plus the environment snapshots captured when it
/// was added.
pub(crate) struct Entry<T: Editable> {
    pub(crate) op: Box<dyn Operation<T>>,
    pub(crate) snapshots: Vec<(EnvironmentId, EnvironmentSnapshot)>,
}

/// An ordered group of operations recorded between two user-visible
/// checkpoints, labelled with the action name shown in the edit menu
/// ("Move entity", "Rotate", ...).
///
/// A barrier is mutable only while it is the open barrier of a
/// [`History`](crate::History); sealed barriers are immutable until they
/// are popped for replay. Operations replay in reverse insertion order,
/// and the inverse barrier pushed to the opposite stack carries the same
/// label so redo restores the same named checkpoint.
pub struct Barrier<T: Editable> {
    label: String,
    entries: Vec<Entry<T>>,
}

impl<T: Editable> Barrier<T> {
    /// Creates an open, unlabelled barrier. The label is assigned when the
    /// history seals it.
    pub(crate) fn open() -> Self {
        Self {
            label: String::new(),
            entries: Vec::new(),
        }
    }

    /// Creates a sealed barrier from replay-collected entries.
    pub(crate) fn sealed(label: String, entries: Vec<Entry<T>>) -> Self {
        Self { label, entries }
    }

    /// The checkpoint name this barrier was sealed under.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn set_label(&mut self, label: String) {
        self.label = label;
    }

    /// Number of recorded operations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no operations have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if any recorded operation changes document content.
    pub fn affects_save(&self) -> bool {
        self.entries.iter().any(|entry| entry.op.affects_save())
    }

    pub(crate) fn push(&mut self, entry: Entry<T>) {
        self.entries.push(entry);
    }

    /// Pops the most recently recorded entry (replay order).
    pub(crate) fn pop_entry(&mut self) -> Option<Entry<T>> {
        self.entries.pop()
    }

    /// Whether `op` duplicates a capture already recorded here.
    pub(crate) fn contains_redundant(&self, op: &dyn Operation<T>) -> bool {
        self.entries
            .iter()
            .any(|entry| op.is_redundant_with(entry.op.as_ref()))
    }
}

impl<T: Editable> fmt::Debug for Barrier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Barrier")
            .field("label", &self.label)
            .field("operations", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::History;
    use crate::operation::{AsAny, OperationResult};

    struct Counter {
        value: i32,
    }

    impl Editable for Counter {}

    #[derive(Debug)]
    struct SetValue {
        prev: i32,
    }

    impl Operation<Counter> for SetValue {
        fn undo(&mut self, target: &mut Counter, _history: &mut History<Counter>) -> OperationResult {
            target.value = self.prev;
            Ok(())
        }

        fn is_redundant_with(&self, earlier: &dyn Operation<Counter>) -> bool {
            earlier.as_any().downcast_ref::<SetValue>().is_some()
        }
    }

    #[derive(Debug)]
    struct SelectEntity;

    impl Operation<Counter> for SelectEntity {
        fn undo(&mut self, _target: &mut Counter, _history: &mut History<Counter>) -> OperationResult {
            Ok(())
        }

        fn affects_save(&self) -> bool {
            false
        }
    }

    fn entry(op: impl Operation<Counter>) -> Entry<Counter> {
        Entry {
            op: Box::new(op),
            snapshots: Vec::new(),
        }
    }

    #[test]
    fn seal_assigns_label() {
        let mut barrier = Barrier::<Counter>::open();
        assert_eq!(barrier.label(), "");
        barrier.set_label("Move entity".into());
        assert_eq!(barrier.label(), "Move entity");
    }

    #[test]
    fn entries_pop_in_reverse_insertion_order() {
        let mut barrier = Barrier::<Counter>::open();
        barrier.push(entry(SetValue { prev: 1 }));
        barrier.push(entry(SetValue { prev: 2 }));
        assert_eq!(barrier.len(), 2);

        let last = barrier.pop_entry().unwrap();
        let set = last.op.as_ref().as_any().downcast_ref::<SetValue>().unwrap();
        assert_eq!(set.prev, 2);
        assert_eq!(barrier.len(), 1);
    }

    #[test]
    fn redundancy_scan_matches_recorded_type() {
        let mut barrier = Barrier::<Counter>::open();
        barrier.push(entry(SetValue { prev: 1 }));
        assert!(barrier.contains_redundant(&SetValue { prev: 5 }));
        assert!(!barrier.contains_redundant(&SelectEntity));
    }

    #[test]
    fn affects_save_requires_a_content_operation() {
        let mut barrier = Barrier::<Counter>::open();
        assert!(!barrier.affects_save());
        barrier.push(entry(SelectEntity));
        assert!(!barrier.affects_save());
        barrier.push(entry(SetValue { prev: 0 }));
        assert!(barrier.affects_save());
    }
}
