//! One-shot timers.
//!
//! Widgets schedule deferred work through the [`TimerHost`] capability they
//! were given, never through a global. [`TimerQueue`] is the bundled host: a
//! platform loop calls [`TimerQueue::poll`] once per frame, tests drive it with
//! [`TimerQueue::advance`].

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use web_time::{Duration, Instant};

new_key_type! {
    pub struct TimerId;
}

pub trait TimerHost {
    /// Arms a one-shot timer. `f` runs once, no earlier than `delay` from now.
    fn set_timeout(&self, delay: Duration, f: Box<dyn FnOnce()>) -> TimerId;

    /// Disarms a timer. Clearing a fired or unknown id is a no-op.
    fn clear_timeout(&self, id: TimerId);
}

struct Pending {
    deadline: Duration,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

struct QueueInner {
    now: Duration,
    next_seq: u64,
    pending: SlotMap<TimerId, Pending>,
}

/// Timer queue running on its own timeline: `now` only moves when the owner
/// advances it, so firing order is deterministic.
pub struct TimerQueue {
    inner: RefCell<QueueInner>,
    origin: Instant,
}

impl TimerQueue {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            inner: RefCell::new(QueueInner {
                now: Duration::ZERO,
                next_seq: 0,
                pending: SlotMap::with_key(),
            }),
            origin: Instant::now(),
        })
    }

    /// Time elapsed on the queue's timeline.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Moves the timeline forward by `by`, firing every timer that comes due,
    /// including timers armed by callbacks during the advance. Returns the
    /// number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        self.run_until(target)
    }

    /// Catches the timeline up with the wall clock.
    pub fn poll(&self) -> usize {
        let target = self.origin.elapsed();
        if target <= self.now() {
            return 0;
        }
        self.run_until(target)
    }

    fn run_until(&self, target: Duration) -> usize {
        let mut fired = 0;
        loop {
            let due = {
                let mut inner = self.inner.borrow_mut();
                let next = inner
                    .pending
                    .iter()
                    .filter(|(_, p)| p.deadline <= target)
                    .min_by_key(|(_, p)| (p.deadline, p.seq))
                    .map(|(id, _)| id);
                match next.and_then(|id| inner.pending.remove(id)) {
                    Some(p) => {
                        inner.now = inner.now.max(p.deadline);
                        Some(p.callback)
                    }
                    None => {
                        inner.now = inner.now.max(target);
                        None
                    }
                }
            };
            match due {
                Some(callback) => {
                    callback();
                    fired += 1;
                }
                None => break,
            }
        }
        fired
    }
}

impl TimerHost for TimerQueue {
    fn set_timeout(&self, delay: Duration, f: Box<dyn FnOnce()>) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let deadline = inner.now + delay;
        inner.pending.insert(Pending {
            deadline,
            seq,
            callback: f,
        })
    }

    fn clear_timeout(&self, id: TimerId) {
        self.inner.borrow_mut().pending.remove(id);
    }
}
