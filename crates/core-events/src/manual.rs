//! Deterministic scheduler driven by explicit time advancement.
//!
//! Useful for synchronous hosts that already own a clock tick and for tests that must not
//! sleep. Tasks run on the thread that calls `advance`, in deadline order (ties in schedule order).

use crate::Scheduler;
use std::sync::Mutex;
use std::time::Duration;

type Task = Box<dyn FnOnce() + Send + 'static>;

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct Inner {
    now: Duration,
    seq: u64,
    pending: Vec<Pending>,
}

#[derive(Default)]
pub struct ManualScheduler {
    inner: Mutex<Inner>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since construction according to this scheduler.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of tasks that have not run yet (including stale timer tasks).
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Move the clock forward and run every task whose deadline has been reached.
    pub fn advance(&self, by: Duration) {
        let due = {
            let mut inner = self.lock();
            inner.now += by;
            let now = inner.now;
            let (mut due, keep): (Vec<_>, Vec<_>) =
                inner.pending.drain(..).partition(|p| p.due <= now);
            inner.pending = keep;
            due.sort_by_key(|p| (p.due, p.seq));
            due
        };
        // Run outside the lock so tasks may schedule follow-up work.
        for p in due {
            (p.task)();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Tasks run outside the lock; a poisoned guard still holds consistent data.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut inner = self.lock();
        let due = inner.now + delay;
        let seq = inner.seq;
        inner.seq += 1;
        inner.pending.push(Pending { due, seq, task });
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &inner.now)
            .field("pending", &inner.pending.len())
            .finish()
    }
}
