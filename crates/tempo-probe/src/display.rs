//! Two-slot display surface state.
//!
//! Hosts render [`StartupDisplay::summary`] (or each [`Slot`]) wherever they
//! have room: a label, a window title, an overlay. The state only ever moves
//! forward; each slot changes once.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::metric::{Metric, Millis};
use crate::sink::ResultSink;

/// One display slot.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Slot {
    /// Value not known yet. Renders as `measuring...`.
    #[default]
    Measuring,
    /// Renders as `<N> ms`.
    Measured(Millis),
}

impl Slot {
    pub fn value(self) -> Option<Millis> {
        match self {
            Slot::Measuring => None,
            Slot::Measured(ms) => Some(ms),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Measuring => f.write_str("measuring..."),
            Slot::Measured(ms) => write!(f, "{ms} ms"),
        }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct StartupDisplay {
    first_paint: Slot,
    interactive: Slot,
    /// Count of accepted slot updates. 2 for a completed session.
    revision: u32,
}

impl StartupDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, metric: Metric) -> Slot {
        match metric {
            Metric::FirstPaint => self.first_paint,
            Metric::Interactive => self.interactive,
        }
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn is_complete(&self) -> bool {
        self.first_paint != Slot::Measuring && self.interactive != Slot::Measuring
    }

    /// `"TTFP: <slot> | TTI: <slot>"`.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} | {}: {}",
            Metric::FirstPaint.label(),
            self.first_paint,
            Metric::Interactive.label(),
            self.interactive,
        )
    }

    /// Fills the slot for `metric`. Returns `false` if it was already filled.
    pub fn set(&mut self, metric: Metric, elapsed: Millis) -> bool {
        let slot = match metric {
            Metric::FirstPaint => &mut self.first_paint,
            Metric::Interactive => &mut self.interactive,
        };

        if let Slot::Measured(prev) = *slot {
            log::warn!("{metric} already displayed as {prev} ms; ignoring {elapsed} ms");
            return false;
        }

        *slot = Slot::Measured(elapsed);
        self.revision += 1;
        true
    }
}

/// Cloneable handle to a [`StartupDisplay`].
///
/// One clone goes into the probe's sink, another stays with the UI that
/// renders it. Single-threaded, like the rest of the probe.
#[derive(Debug, Clone, Default)]
pub struct SharedDisplay(Rc<RefCell<StartupDisplay>>);

impl SharedDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> StartupDisplay {
        self.0.borrow().clone()
    }

    pub fn revision(&self) -> u32 {
        self.0.borrow().revision()
    }

    pub fn summary(&self) -> String {
        self.0.borrow().summary()
    }
}

impl ResultSink for SharedDisplay {
    fn record(&mut self, metric: Metric, elapsed: Millis) {
        self.0.borrow_mut().set(metric, elapsed);
    }
}
