use criterion::{Criterion, black_box, criterion_group, criterion_main};

use editor_history::{
    AsAny, DEFAULT_UNDO_LIMIT, Editable, History, Operation, OperationResult,
};

struct Doc {
    value: i64,
}

impl Editable for Doc {}

#[derive(Debug)]
struct SetValue {
    prev: i64,
}

impl Operation<Doc> for SetValue {
    fn undo(&mut self, target: &mut Doc, history: &mut History<Doc>) -> OperationResult {
        history.add(Box::new(SetValue { prev: target.value }));
        target.value = self.prev;
        Ok(())
    }
}

#[derive(Debug)]
struct CoalescingSet {
    prev: i64,
}

impl Operation<Doc> for CoalescingSet {
    fn undo(&mut self, target: &mut Doc, history: &mut History<Doc>) -> OperationResult {
        history.add(Box::new(CoalescingSet { prev: target.value }));
        target.value = self.prev;
        Ok(())
    }

    fn is_redundant_with(&self, earlier: &dyn Operation<Doc>) -> bool {
        earlier.as_any().downcast_ref::<CoalescingSet>().is_some()
    }
}

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

fn bench_add_and_barrier(c: &mut Criterion) {
    c.bench_function("add_and_barrier_100", |b| {
        b.iter(|| {
            let mut history = History::with_undo_limit(DEFAULT_UNDO_LIMIT);
            let mut doc = Doc { value: 0 };
            for i in 0..100 {
                history.add(Box::new(SetValue { prev: doc.value }));
                doc.value = black_box(i);
                history.barrier("Set value", true);
            }
            black_box(history.undo_count())
        });
    });
}

fn bench_coalescing_drag(c: &mut Criterion) {
    c.bench_function("coalescing_drag_100_steps", |b| {
        b.iter(|| {
            let mut history = History::new();
            let mut doc = Doc { value: 0 };
            for i in 0..100 {
                history.add(Box::new(CoalescingSet { prev: doc.value }));
                doc.value = black_box(i);
            }
            history.barrier("Drag", true);
            black_box(history.undo_count())
        });
    });
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

fn bench_undo_redo_cycle(c: &mut Criterion) {
    c.bench_function("undo_redo_cycle_depth_50", |b| {
        b.iter(|| {
            let mut history = History::new();
            let mut doc = Doc { value: 0 };
            for i in 0..50 {
                history.add(Box::new(SetValue { prev: doc.value }));
                doc.value = i;
                history.barrier("Set value", true);
            }
            while history.can_undo() {
                history.undo(&mut doc).unwrap();
            }
            while history.can_redo() {
                history.redo(&mut doc).unwrap();
            }
            black_box(doc.value)
        });
    });
}

criterion_group!(
    benches,
    bench_add_and_barrier,
    bench_coalescing_drag,
    bench_undo_redo_cycle,
);
criterion_main!(benches);
