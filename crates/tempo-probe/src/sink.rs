//! Result delivery.
//!
//! The probe hands each computed duration to a [`ResultSink`] exactly once.
//! Two channels are provided: a diagnostic text line and the two-slot
//! display in [`crate::display`]. Either may be used alone.

use crate::metric::{Metric, Millis};

/// Log target used by [`DiagnosticSink::log`].
pub const DIAGNOSTIC_TARGET: &str = "tempo::startup";

/// Receives each startup metric once it is known.
pub trait ResultSink {
    fn record(&mut self, metric: Metric, elapsed: Millis);
}

impl<S: ResultSink + ?Sized> ResultSink for Box<S> {
    fn record(&mut self, metric: Metric, elapsed: Millis) {
        (**self).record(metric, elapsed)
    }
}

/// Formats the diagnostic line for one metric: `"TTFP: 142ms"`, `"TTI: 148ms"`.
pub fn format_line(metric: Metric, elapsed: Millis) -> String {
    format!("{}: {}ms", metric.label(), elapsed)
}

/// Writes one [`format_line`] line per recorded metric.
pub struct DiagnosticSink {
    write: Box<dyn FnMut(&str)>,
}

impl DiagnosticSink {
    /// Sends every line to `write`.
    pub fn new(write: impl FnMut(&str) + 'static) -> Self {
        Self { write: Box::new(write) }
    }

    /// Sends every line through the `log` facade at `info`, target
    /// [`DIAGNOSTIC_TARGET`].
    pub fn log() -> Self {
        Self::new(|line| log::info!(target: DIAGNOSTIC_TARGET, "{line}"))
    }
}

impl ResultSink for DiagnosticSink {
    fn record(&mut self, metric: Metric, elapsed: Millis) {
        let line = format_line(metric, elapsed);
        (self.write)(&line);
    }
}

/// Forwards every record to each inner sink, in insertion order.
#[derive(Default)]
pub struct Fanout {
    sinks: Vec<Box<dyn ResultSink>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl ResultSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl ResultSink for Fanout {
    fn record(&mut self, metric: Metric, elapsed: Millis) {
        for sink in &mut self.sinks {
            sink.record(metric, elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn capture() -> (Rc<RefCell<Vec<String>>>, DiagnosticSink) {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let out = lines.clone();
        let sink = DiagnosticSink::new(move |l| out.borrow_mut().push(l.to_string()));
        (lines, sink)
    }

    // ── format_line ───────────────────────────────────────────────────────

    #[test]
    fn line_shapes() {
        assert_eq!(format_line(Metric::FirstPaint, Millis(142)), "TTFP: 142ms");
        assert_eq!(format_line(Metric::Interactive, Millis(148)), "TTI: 148ms");
    }

    #[test]
    fn line_zero() {
        assert_eq!(format_line(Metric::FirstPaint, Millis(0)), "TTFP: 0ms");
    }

    // ── DiagnosticSink ────────────────────────────────────────────────────

    #[test]
    fn diagnostic_writes_one_line_per_record() {
        let (lines, mut sink) = capture();
        sink.record(Metric::FirstPaint, Millis(16));
        sink.record(Metric::Interactive, Millis(20));
        assert_eq!(*lines.borrow(), vec!["TTFP: 16ms", "TTI: 20ms"]);
    }

    #[test]
    fn log_sink_does_not_panic_without_logger() {
        let mut sink = DiagnosticSink::log();
        sink.record(Metric::FirstPaint, Millis(1));
    }

    // ── Fanout ────────────────────────────────────────────────────────────

    #[test]
    fn fanout_reaches_every_sink_in_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (order.clone(), order.clone());

        let mut fan = Fanout::new()
            .with(DiagnosticSink::new(move |l| a.borrow_mut().push(format!("a {l}"))))
            .with(DiagnosticSink::new(move |l| b.borrow_mut().push(format!("b {l}"))));

        fan.record(Metric::Interactive, Millis(5));
        assert_eq!(*order.borrow(), vec!["a TTI: 5ms", "b TTI: 5ms"]);
    }

    #[test]
    fn empty_fanout_is_a_no_op() {
        let mut fan = Fanout::new();
        fan.record(Metric::FirstPaint, Millis(3));
    }
}
