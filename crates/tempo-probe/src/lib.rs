//! Tempo probe: startup latency measurement core.
//!
//! Measures two values per process launch, both relative to a time origin
//! captured as the first thing `main` does:
//!
//! - **TTFP** (time to first paint): origin → the first compositor tick after
//!   the hosting component mounted.
//! - **TTI** (time to interactive): origin → the first moment the host's task
//!   queue has drained all work queued before it.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use tempo_probe::prelude::*;
//!
//! let clock = SystemClock::new();
//! let origin = Origin::capture(&clock);
//!
//! // ... later, once the UI component exists:
//! let display = SharedDisplay::new();
//! let sink = Fanout::new()
//!     .with(DiagnosticSink::log())
//!     .with(display.clone());
//! let probe = StartupProbe::new(origin, Rc::new(clock), sink);
//!
//! // In the component's post-render lifecycle hook:
//! probe.arm(scheduler);
//! ```
//!
//! The host supplies the two scheduling primitives through [`Scheduler`];
//! `testing::ManualScheduler` (feature `testing`) is a deterministic stand-in
//! for tests.

pub mod display;
pub mod metric;
pub mod origin;
pub mod probe;
pub mod scheduler;
pub mod sink;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use display::{SharedDisplay, Slot, StartupDisplay};
pub use metric::{Metric, Millis};
pub use origin::{Clock, Origin, SystemClock};
pub use probe::{ProbePhase, Session, StartupProbe};
pub use scheduler::{Scheduler, Task};
pub use sink::{format_line, DiagnosticSink, Fanout, ResultSink, DIAGNOSTIC_TARGET};

/// Everything a host needs to wire up a probe.
pub mod prelude {
    pub use crate::display::{SharedDisplay, Slot, StartupDisplay};
    pub use crate::metric::{Metric, Millis};
    pub use crate::origin::{Clock, Origin, SystemClock};
    pub use crate::probe::{ProbePhase, Session, StartupProbe};
    pub use crate::scheduler::{Scheduler, Task};
    pub use crate::sink::{DiagnosticSink, Fanout, ResultSink};
}
