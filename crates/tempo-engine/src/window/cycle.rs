//! Window-free half of the runtime loop.
//!
//! Fixes the order in which a redraw and an idle pass drive the app hooks and
//! the [`HostScheduler`]. The winit handler in `runtime.rs` only adapts its
//! window + GPU to [`FrameHooks`].

use super::scheduler::HostScheduler;

/// App-side steps of one redraw, in call order.
pub(crate) trait FrameHooks {
    /// Draws frame `frame_index`. Returns `true` if it was presented.
    fn frame(&mut self, frame_index: u64) -> bool;

    /// Frame continuations ran for the frame just presented.
    fn ticked(&mut self);

    /// First presented frame of this window.
    fn mounted(&mut self, mount_count: u32, scheduler: &mut HostScheduler);
}

/// Per-window redraw bookkeeping. Reset whenever the window is recreated.
#[derive(Debug, Default)]
pub(crate) struct WindowFrames {
    next_index: u64,
    mounted: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct FrameOutcome {
    pub frame_index: u64,
    pub presented: bool,
    /// Frame continuations run after this frame.
    pub tasks_run: usize,
    /// `Some(n)` if this frame mounted the window (n-th mount of the process).
    pub mounted: Option<u32>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct IdleOutcome {
    pub tasks_run: usize,
    /// Frame continuations are pending; the window needs a redraw.
    pub wants_frame: bool,
    /// The drain left tasks behind; keep the loop polling.
    pub keep_polling: bool,
}

#[derive(Default)]
pub(crate) struct Cycle {
    pub(crate) scheduler: HostScheduler,
    mounts: u32,
}

impl Cycle {
    /// Frame, then the compositor tick, then (once per window) the mount hook.
    ///
    /// A frame that was not presented runs nothing; its continuations wait.
    pub(crate) fn redraw(&mut self, frames: &mut WindowFrames, hooks: &mut impl FrameHooks) -> FrameOutcome {
        let frame_index = frames.next_index;
        frames.next_index += 1;

        let mut outcome = FrameOutcome {
            frame_index,
            presented: hooks.frame(frame_index),
            tasks_run: 0,
            mounted: None,
        };
        if !outcome.presented {
            return outcome;
        }

        outcome.tasks_run = self.scheduler.run_frame_tasks();
        if outcome.tasks_run > 0 {
            hooks.ticked();
        }

        if !frames.mounted {
            frames.mounted = true;
            self.mounts += 1;
            outcome.mounted = Some(self.mounts);
            hooks.mounted(self.mounts, &mut self.scheduler);
        }

        outcome
    }

    /// Drains the deferred queue, then calls `on_idle`.
    pub(crate) fn idle(&mut self, on_idle: impl FnOnce()) -> IdleOutcome {
        let tasks_run = self.scheduler.drain_queue();
        on_idle();

        IdleOutcome {
            tasks_run,
            wants_frame: self.scheduler.wants_frame(),
            keep_polling: self.scheduler.queued() > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use tempo_probe::testing::ManualClock;
    use tempo_probe::{Millis, Origin, Scheduler, SharedDisplay, StartupProbe};

    use super::*;

    /// Stand-in app: hosts a probe and mirrors the display into a list of
    /// titles the way a window title would change.
    struct FakeApp {
        clock: ManualClock,
        probe: StartupProbe,
        display: SharedDisplay,
        present: bool,
        shown: Option<u32>,
        titles: Vec<String>,
        calls: Vec<String>,
    }

    impl FakeApp {
        fn new() -> Self {
            let clock = ManualClock::new(1000);
            let display = SharedDisplay::new();
            let probe = StartupProbe::new(Origin::capture(&clock), Rc::new(clock.clone()), display.clone());
            Self {
                clock,
                probe,
                display,
                present: true,
                shown: None,
                titles: Vec::new(),
                calls: Vec::new(),
            }
        }

        fn sync(&mut self) {
            let revision = self.display.revision();
            if self.shown != Some(revision) {
                self.titles.push(self.display.summary());
                self.shown = Some(revision);
            }
        }
    }

    impl FrameHooks for FakeApp {
        fn frame(&mut self, frame_index: u64) -> bool {
            self.calls.push(format!("frame {frame_index}"));
            self.present
        }

        fn ticked(&mut self) {
            self.calls.push("ticked".into());
            self.sync();
        }

        fn mounted(&mut self, mount_count: u32, scheduler: &mut HostScheduler) {
            self.calls.push(format!("mounted {mount_count}"));
            self.sync();
            self.probe.arm(scheduler);
        }
    }

    fn idle(cycle: &mut Cycle, app: &mut FakeApp) -> IdleOutcome {
        cycle.idle(|| {
            app.calls.push("idle".into());
            app.sync();
        })
    }

    #[test]
    fn title_shows_each_checkpoint() {
        let mut cycle = Cycle::default();
        let mut frames = WindowFrames::default();
        let mut app = FakeApp::new();

        cycle.redraw(&mut frames, &mut app);
        assert!(idle(&mut cycle, &mut app).wants_frame);

        app.clock.set(1142);
        cycle.redraw(&mut frames, &mut app);
        app.clock.set(1148);
        idle(&mut cycle, &mut app);

        assert_eq!(
            app.titles,
            vec![
                "TTFP: measuring... | TTI: measuring...",
                "TTFP: 142 ms | TTI: measuring...",
                "TTFP: 142 ms | TTI: 148 ms",
            ]
        );
        assert!(app.probe.is_done());
    }

    #[test]
    fn hook_order_over_a_session() {
        let mut cycle = Cycle::default();
        let mut frames = WindowFrames::default();
        let mut app = FakeApp::new();

        cycle.redraw(&mut frames, &mut app);
        idle(&mut cycle, &mut app);
        cycle.redraw(&mut frames, &mut app);
        idle(&mut cycle, &mut app);
        cycle.redraw(&mut frames, &mut app);

        assert_eq!(
            app.calls,
            vec!["frame 0", "mounted 1", "idle", "frame 1", "ticked", "idle", "frame 2"]
        );
    }

    #[test]
    fn mounts_once_per_window() {
        let mut cycle = Cycle::default();
        let mut frames = WindowFrames::default();
        let mut app = FakeApp::new();

        assert_eq!(cycle.redraw(&mut frames, &mut app).mounted, Some(1));
        assert_eq!(cycle.redraw(&mut frames, &mut app).mounted, None);
        assert_eq!(cycle.redraw(&mut frames, &mut app).mounted, None);

        // Recreated window.
        let mut frames = WindowFrames::default();
        let out = cycle.redraw(&mut frames, &mut app);
        assert_eq!(out.frame_index, 0);
        assert_eq!(out.mounted, Some(2));
    }

    #[test]
    fn unpresented_first_frame_does_not_mount() {
        let mut cycle = Cycle::default();
        let mut frames = WindowFrames::default();
        let mut app = FakeApp::new();

        app.present = false;
        let out = cycle.redraw(&mut frames, &mut app);
        assert!(!out.presented);
        assert_eq!(out.mounted, None);
        assert!(!app.probe.phase().has_fired());

        app.present = true;
        assert_eq!(cycle.redraw(&mut frames, &mut app).mounted, Some(1));
    }

    #[test]
    fn skipped_frame_keeps_continuations_pending() {
        let mut cycle = Cycle::default();
        let mut frames = WindowFrames::default();
        let mut app = FakeApp::new();

        cycle.redraw(&mut frames, &mut app);
        assert!(cycle.scheduler.wants_frame());

        app.present = false;
        app.clock.set(1100);
        let out = cycle.redraw(&mut frames, &mut app);
        assert_eq!(out.tasks_run, 0);
        assert!(cycle.scheduler.wants_frame());
        assert_eq!(app.probe.session().first_paint(), None);

        app.present = true;
        app.clock.set(1130);
        assert_eq!(cycle.redraw(&mut frames, &mut app).tasks_run, 1);
        assert_eq!(app.probe.session().first_paint(), Some(Millis(130)));
    }

    #[test]
    fn idle_drains_before_the_hook() {
        let mut cycle = Cycle::default();
        let mut frames = WindowFrames::default();
        let mut app = FakeApp::new();

        cycle.redraw(&mut frames, &mut app);
        cycle.redraw(&mut frames, &mut app);
        assert_eq!(cycle.scheduler.queued(), 1);

        let display = app.display.clone();
        let out = cycle.idle(|| assert!(display.snapshot().is_complete()));
        assert_eq!(out.tasks_run, 1);
        assert!(!out.wants_frame);
        assert!(!out.keep_polling);
    }

    #[test]
    fn idle_reports_work_left_behind() {
        let mut cycle = Cycle::default();
        cycle.scheduler.post(|s| s.on_queue_idle(Box::new(|_: &mut dyn Scheduler| {})));

        let out = cycle.idle(|| {});
        assert_eq!(out.tasks_run, 1);
        assert!(out.keep_polling);

        let out = cycle.idle(|| {});
        assert_eq!(out.tasks_run, 1);
        assert!(!out.keep_polling);
    }
}
