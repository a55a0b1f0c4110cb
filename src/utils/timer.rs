//! Timer sources for callbacks that run on a later turn of the event loop.
//!
//! [`TimeoutScheduler`] wraps `setTimeout`. [`ManualScheduler`] is a virtual
//! clock for tests: nothing runs until [`ManualScheduler::advance`] is called.

use gloo_timers::callback::Timeout;

/// One-shot deferred callbacks.
pub trait Scheduler {
    /// Run `task` once, `delay_ms` milliseconds from now.
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
}

/// Browser `setTimeout`. Scheduled callbacks cannot be cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let _ = Timeout::new(delay_ms, task).forget();
    }
}

#[cfg(any(test, feature = "mock"))]
pub use manual::ManualScheduler;

#[cfg(any(test, feature = "mock"))]
mod manual {
    use std::cell::{Cell, RefCell};

    use super::Scheduler;

    struct Pending {
        due: u64,
        seq: u64,
        task: Box<dyn FnOnce()>,
    }

    /// Deterministic virtual clock.
    ///
    /// Tasks due at the same instant run in the order they were scheduled.
    /// Tasks scheduled from inside a running task are picked up by the same
    /// [`advance`](Self::advance) call if they fall due within it.
    #[derive(Default)]
    pub struct ManualScheduler {
        now: Cell<u64>,
        seq: Cell<u64>,
        queue: RefCell<Vec<Pending>>,
    }

    impl ManualScheduler {
        pub fn new() -> Self {
            Self::default()
        }

        /// Milliseconds elapsed on the virtual clock.
        pub fn now(&self) -> u64 {
            self.now.get()
        }

        /// Number of callbacks not yet run.
        pub fn pending(&self) -> usize {
            self.queue.borrow().len()
        }

        /// Move the clock forward by `ms`, running every task that falls due.
        pub fn advance(&self, ms: u64) {
            let target = self.now.get() + ms;
            while let Some(next) = self.pop_due(target) {
                self.now.set(next.due);
                (next.task)();
            }
            self.now.set(target);
        }

        fn pop_due(&self, target: u64) -> Option<Pending> {
            let mut queue = self.queue.borrow_mut();
            let index = queue
                .iter()
                .enumerate()
                .filter(|(_, p)| p.due <= target)
                .min_by_key(|(_, p)| (p.due, p.seq))
                .map(|(i, _)| i)?;
            Some(queue.remove(index))
        }
    }

    impl Scheduler for ManualScheduler {
        fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
            let seq = self.seq.get();
            self.seq.set(seq + 1);
            self.queue.borrow_mut().push(Pending {
                due: self.now.get() + u64::from(delay_ms),
                seq,
                task,
            });
        }
    }
}
