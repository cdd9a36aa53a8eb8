use std::collections::VecDeque;

use tempo_probe::{Scheduler, Task};

/// The runtime's implementation of the probe scheduling primitives.
///
/// - Frame continuations run right after the next frame has been presented.
///   Ones registered while those run wait for the frame after.
/// - Deferred tasks share one FIFO queue, drained when winit reports that its
///   event queue is empty (`about_to_wait`). A drain runs exactly the tasks
///   queued when it started.
#[derive(Default)]
pub struct HostScheduler {
    frame_tasks: Vec<Task>,
    queue: VecDeque<Task>,
}

impl HostScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues ordinary deferred work (same queue as idle continuations).
    #[cfg(test)]
    pub(crate) fn post(&mut self, task: impl FnOnce(&mut dyn Scheduler) + 'static) {
        self.queue.push_back(Box::new(task));
    }

    /// `true` if something is waiting on the next presented frame.
    pub fn wants_frame(&self) -> bool {
        !self.frame_tasks.is_empty()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn run_frame_tasks(&mut self) -> usize {
        let due = std::mem::take(&mut self.frame_tasks);
        let count = due.len();
        for task in due {
            task(&mut *self);
        }
        count
    }

    pub(crate) fn drain_queue(&mut self) -> usize {
        let count = self.queue.len();
        for _ in 0..count {
            let Some(task) = self.queue.pop_front() else {
                break;
            };
            task(&mut *self);
        }
        count
    }
}

impl Scheduler for HostScheduler {
    fn on_next_frame(&mut self, task: Task) {
        log::trace!("frame continuation queued ({} pending)", self.frame_tasks.len() + 1);
        self.frame_tasks.push(task);
    }

    fn on_queue_idle(&mut self, task: Task) {
        log::trace!("idle continuation queued behind {} task(s)", self.queue.len());
        self.queue.push_back(task);
    }
}
