//! Deterministic stand-ins for the host clock and scheduler.
//!
//! Nothing here touches real time or a real event loop, so a whole session
//! can be stepped through from a unit test.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::origin::Clock;
use crate::scheduler::{Scheduler, Task};

/// Settable clock. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<u64>>);

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self(Rc::new(Cell::new(start_ms)))
    }

    /// Moves the clock to `now_ms`. Going backwards is a caller bug.
    pub fn set(&self, now_ms: u64) {
        debug_assert!(now_ms >= self.0.get(), "ManualClock moved backwards");
        self.0.set(now_ms);
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

/// Scheduler driven by hand.
///
/// - [`fire_frame`](Self::fire_frame) plays one compositor tick.
/// - [`run_until_idle`](Self::run_until_idle) drains the FIFO task queue.
/// - [`post`](Self::post) queues ordinary work ahead of whatever comes next.
#[derive(Default)]
pub struct ManualScheduler {
    frame_tasks: Vec<Task>,
    queue: VecDeque<Task>,
    frame_requests: usize,
    idle_requests: usize,
    frames_fired: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues ordinary work on the same FIFO queue idle continuations use.
    pub fn post(&mut self, task: impl FnOnce(&mut dyn Scheduler) + 'static) {
        self.queue.push_back(Box::new(task));
    }

    /// Runs the frame continuations that were pending when the tick started.
    ///
    /// Continuations registered while the tick runs wait for the next one.
    /// Returns how many ran.
    pub fn fire_frame(&mut self) -> usize {
        let due = std::mem::take(&mut self.frame_tasks);
        let count = due.len();
        self.frames_fired += 1;
        for task in due {
            task(&mut *self);
        }
        count
    }

    /// Drains the task queue in FIFO order, including tasks queued while
    /// draining. Returns how many ran.
    pub fn run_until_idle(&mut self) -> usize {
        let mut count = 0;
        while let Some(task) = self.queue.pop_front() {
            task(&mut *self);
            count += 1;
        }
        count
    }

    pub fn pending_frames(&self) -> usize {
        self.frame_tasks.len()
    }

    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Total `on_next_frame` calls seen.
    pub fn frame_requests(&self) -> usize {
        self.frame_requests
    }

    /// Total `on_queue_idle` calls seen.
    pub fn idle_requests(&self) -> usize {
        self.idle_requests
    }

    pub fn frames_fired(&self) -> u64 {
        self.frames_fired
    }
}

impl Scheduler for ManualScheduler {
    fn on_next_frame(&mut self, task: Task) {
        self.frame_requests += 1;
        self.frame_tasks.push(task);
    }

    fn on_queue_idle(&mut self, task: Task) {
        self.idle_requests += 1;
        self.queue.push_back(task);
    }
}
