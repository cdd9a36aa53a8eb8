/// A continuation handed to the host.
///
/// It receives the scheduler back when it runs, so a stage can queue the
/// next one without holding a reference to the host.
pub type Task = Box<dyn FnOnce(&mut dyn Scheduler)>;

/// The two host scheduling primitives the probe consumes.
///
/// Both are fire-and-forget: nothing is returned and nothing can be
/// cancelled. A host that never fires a primitive simply leaves the
/// continuation pending.
pub trait Scheduler {
    /// Run `task` at the next display-composition opportunity.
    ///
    /// Tied to the compositor/frame tick, not to a fixed-delay timer.
    fn on_next_frame(&mut self, task: Task);

    /// Run `task` once every piece of work queued before it has run.
    ///
    /// Queue order is first-in, first-out.
    fn on_queue_idle(&mut self, task: Task);
}
