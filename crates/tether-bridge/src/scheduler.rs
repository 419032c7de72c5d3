//! Deferred task scheduling.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks after a delay.
///
/// Each call schedules an independent task; there is no cancellation and no
/// coalescing of tasks scheduled close together.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task);
}

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct Timeline {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Timeline {
    /// Remove the earliest task due at or before `deadline`. Ties run in
    /// scheduling order.
    fn pop_due(&mut self, deadline: Duration) -> Option<Pending> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= deadline)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        Some(self.pending.swap_remove(index))
    }
}

/// Scheduler driven by virtual time.
///
/// Nothing runs until [`ManualScheduler::advance`] moves the clock. Clones
/// share the same timeline.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    timeline: Rc<RefCell<Timeline>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.timeline.borrow().now
    }

    /// Tasks scheduled but not yet run.
    pub fn pending(&self) -> usize {
        self.timeline.borrow().pending.len()
    }

    /// Move the clock forward by `by`, running every task that falls due.
    ///
    /// Tasks scheduled by a running task also run if they fall due within
    /// the window. Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let deadline = self.now() + by;
        let mut ran = 0;

        loop {
            let next = {
                let mut timeline = self.timeline.borrow_mut();
                let next = timeline.pop_due(deadline);
                if let Some(pending) = &next {
                    timeline.now = pending.due;
                }
                next
            };

            match next {
                Some(pending) => {
                    (pending.task)();
                    ran += 1;
                }
                None => break,
            }
        }

        self.timeline.borrow_mut().now = deadline;
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut timeline = self.timeline.borrow_mut();
        let due = timeline.now + delay;
        let seq = timeline.next_seq;
        timeline.next_seq += 1;
        timeline.pending.push(Pending { due, seq, task });
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let timeline = self.timeline.borrow();
        f.debug_struct("ManualScheduler")
            .field("now", &timeline.now)
            .field("pending", &timeline.pending.len())
            .finish()
    }
}
