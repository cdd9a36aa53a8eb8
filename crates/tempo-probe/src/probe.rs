//! The two-stage checkpoint state machine.
//!
//! ```text
//! Idle --arm--> Armed --on_next_frame--> AwaitingPaint --frame--> AwaitingIdle --idle--> Done
//! ```
//!
//! `arm` is the only external trigger and only works from `Idle`. Every
//! later trigger (a remount, a second lifecycle event) is ignored, so the
//! chain runs at most once per probe.

use std::cell::RefCell;
use std::rc::Rc;

use crate::metric::{Metric, Millis};
use crate::origin::{Clock, Origin};
use crate::scheduler::Scheduler;
use crate::sink::ResultSink;

/// Where a probe is in its one-shot sequence.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProbePhase {
    /// Not triggered yet.
    Idle,
    /// Trigger accepted; paint continuation about to be handed to the host.
    Armed,
    /// Waiting for the next compositor tick.
    AwaitingPaint,
    /// First paint recorded; waiting for the task queue to drain.
    AwaitingIdle,
    /// Both values recorded. Terminal.
    Done,
}

impl ProbePhase {
    /// `true` once the trigger has been accepted.
    pub fn has_fired(self) -> bool {
        self != ProbePhase::Idle
    }
}

/// Snapshot of one measurement session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Session {
    origin: Origin,
    first_paint: Option<Millis>,
    interactive: Option<Millis>,
    phase: ProbePhase,
}

impl Session {
    fn new(origin: Origin) -> Self {
        Self { origin, first_paint: None, interactive: None, phase: ProbePhase::Idle }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn first_paint(&self) -> Option<Millis> {
        self.first_paint
    }

    pub fn interactive(&self) -> Option<Millis> {
        self.interactive
    }

    pub fn phase(&self) -> ProbePhase {
        self.phase
    }
}

struct ProbeState {
    session: Session,
    clock: Rc<dyn Clock>,
}

impl ProbeState {
    fn elapsed_now(&self) -> Millis {
        self.session.origin.elapsed_at(self.clock.now_ms())
    }
}

/// Handle to the process's startup measurement.
///
/// Clones share one session. Meant to be owned by the UI component whose
/// first post-render lifecycle event calls [`arm`](Self::arm).
#[derive(Clone)]
pub struct StartupProbe {
    state: Rc<RefCell<ProbeState>>,
    // Kept apart from `state` so a sink may read the session while recording.
    sink: Rc<RefCell<dyn ResultSink>>,
}

impl StartupProbe {
    pub fn new<S>(origin: Origin, clock: Rc<dyn Clock>, sink: S) -> Self
    where
        S: ResultSink + 'static,
    {
        let state = ProbeState { session: Session::new(origin), clock };
        let sink: Rc<RefCell<dyn ResultSink>> = Rc::new(RefCell::new(sink));
        Self { state: Rc::new(RefCell::new(state)), sink }
    }

    pub fn session(&self) -> Session {
        self.state.borrow().session
    }

    pub fn phase(&self) -> ProbePhase {
        self.state.borrow().session.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase() == ProbePhase::Done
    }

    /// Starts the checkpoint chain. Returns `false` (and schedules nothing)
    /// if the probe was already armed.
    ///
    /// The phase is claimed before the host sees any continuation, so a host
    /// that re-enters `arm` from inside `on_next_frame` is still rejected.
    pub fn arm(&self, scheduler: &mut dyn Scheduler) -> bool {
        {
            let mut st = self.state.borrow_mut();
            let phase = st.session.phase;
            if phase.has_fired() {
                log::debug!("startup probe trigger ignored in phase {phase:?}");
                return false;
            }
            st.session.phase = ProbePhase::Armed;
        }

        log::debug!("startup probe armed");

        let probe = self.clone();
        let task = Box::new(move |s: &mut dyn Scheduler| probe.paint_checkpoint(s));

        self.state.borrow_mut().session.phase = ProbePhase::AwaitingPaint;
        scheduler.on_next_frame(task);
        true
    }

    fn paint_checkpoint(&self, scheduler: &mut dyn Scheduler) {
        let elapsed = {
            let mut st = self.state.borrow_mut();
            if st.session.phase != ProbePhase::AwaitingPaint {
                log::warn!("paint checkpoint fired in phase {:?}; ignored", st.session.phase);
                return;
            }
            let elapsed = st.elapsed_now();
            st.session.first_paint = Some(elapsed);
            st.session.phase = ProbePhase::AwaitingIdle;
            elapsed
        };

        self.sink.borrow_mut().record(Metric::FirstPaint, elapsed);

        let probe = self.clone();
        scheduler.on_queue_idle(Box::new(move |_: &mut dyn Scheduler| probe.idle_checkpoint()));
    }

    fn idle_checkpoint(&self) {
        let elapsed = {
            let mut st = self.state.borrow_mut();
            if st.session.phase != ProbePhase::AwaitingIdle {
                log::warn!("idle checkpoint fired in phase {:?}; ignored", st.session.phase);
                return;
            }
            let elapsed = st.elapsed_now();
            debug_assert!(
                st.session.first_paint.is_none_or(|fp| elapsed >= fp),
                "clock went backwards between checkpoints",
            );
            st.session.interactive = Some(elapsed);
            st.session.phase = ProbePhase::Done;
            elapsed
        };

        self.sink.borrow_mut().record(Metric::Interactive, elapsed);
        log::debug!("startup probe done");
    }
}
