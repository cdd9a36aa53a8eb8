use std::rc::Rc;

use winit::event::WindowEvent;
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use tempo_engine::core::{App, AppControl, FrameCtx, IdleCtx, MountCtx, TickCtx, WindowCtx};
use tempo_engine::paint::Color;
use tempo_probe::{Clock, DiagnosticSink, Fanout, Origin, SharedDisplay, StartupDisplay, StartupProbe};

/// The measured component: a single window that hosts the startup probe and
/// shows its two values in the title bar.
pub struct ProbeApp {
    title: String,
    probe: StartupProbe,
    display: SharedDisplay,
    /// Display revision last pushed to the window title.
    shown: Option<u32>,
    exit_when_measured: bool,
}

impl ProbeApp {
    pub fn new(
        title: impl Into<String>,
        origin: Origin,
        clock: Rc<dyn Clock>,
        exit_when_measured: bool,
    ) -> Self {
        let display = SharedDisplay::new();
        let sink = Fanout::new()
            .with(DiagnosticSink::log())
            .with(display.clone());

        Self {
            title: title.into(),
            probe: StartupProbe::new(origin, clock, sink),
            display,
            shown: None,
            exit_when_measured,
        }
    }

    /// Title for the window before anything is measured.
    pub fn initial_title(&self) -> String {
        window_title(&self.title, &self.display.snapshot())
    }

    /// Title to show if the display changed since the last one shown.
    fn next_title(&mut self) -> Option<String> {
        let revision = self.display.revision();
        if self.shown == Some(revision) {
            return None;
        }
        self.shown = Some(revision);
        Some(window_title(&self.title, &self.display.snapshot()))
    }

    /// Pushes the display into the title bar if it changed. Returns `true`
    /// when it did.
    fn sync_title(&mut self, window: &WindowCtx<'_>) -> bool {
        match self.next_title() {
            Some(title) => {
                window.set_title(&title);
                true
            }
            None => false,
        }
    }
}

impl App for ProbeApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state.is_pressed() && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_mounted(&mut self, ctx: &mut MountCtx<'_>) {
        // A recreated window starts from the configured title.
        self.shown = None;
        self.sync_title(&ctx.window);

        if self.probe.arm(ctx.scheduler()) {
            log::debug!("startup probe armed on mount #{}", ctx.mount_count);
        } else {
            log::info!(
                "remount #{} ignored; probe already {:?}",
                ctx.mount_count,
                self.probe.phase(),
            );
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        ctx.present(status_color(&self.display.snapshot()))
    }

    fn on_ticked(&mut self, ctx: &mut TickCtx<'_>) {
        // TTFP lands here, one idle drain ahead of TTI.
        self.sync_title(&ctx.window);
    }

    fn on_idle(&mut self, ctx: &mut IdleCtx<'_>) -> AppControl {
        let changed = match &ctx.window {
            Some(window) => self.sync_title(window),
            None => false,
        };
        if changed {
            // Repaint so the clear color follows the display state.
            ctx.runtime.request_redraw();
        }

        if self.exit_when_measured && self.probe.is_done() {
            log::info!("startup measured; exiting");
            return AppControl::Exit;
        }

        AppControl::Continue
    }
}

/// `"<base> | TTFP: ... | TTI: ..."`.
pub fn window_title(base: &str, display: &StartupDisplay) -> String {
    format!("{base} | {}", display.summary())
}

/// Amber until both values are in, then green.
pub fn status_color(display: &StartupDisplay) -> Color {
    if display.is_complete() {
        Color::from_srgb_u8(0x1f, 0x6f, 0x43, 0xff)
    } else {
        Color::from_srgb_u8(0x7a, 0x5b, 0x12, 0xff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_probe::testing::{ManualClock, ManualScheduler};
    use tempo_probe::{Metric, Millis};

    #[test]
    fn title_shows_placeholders_first() {
        let d = StartupDisplay::new();
        assert_eq!(window_title("tempo", &d), "tempo | TTFP: measuring... | TTI: measuring...");
    }

    #[test]
    fn title_tracks_each_value() {
        let mut d = StartupDisplay::new();
        d.set(Metric::FirstPaint, Millis(142));
        assert_eq!(window_title("app", &d), "app | TTFP: 142 ms | TTI: measuring...");
        d.set(Metric::Interactive, Millis(148));
        assert_eq!(window_title("app", &d), "app | TTFP: 142 ms | TTI: 148 ms");
    }

    #[test]
    fn color_turns_green_only_when_complete() {
        let mut d = StartupDisplay::new();
        let measuring = status_color(&d);
        d.set(Metric::FirstPaint, Millis(1));
        assert_eq!(status_color(&d), measuring);
        d.set(Metric::Interactive, Millis(2));
        assert_ne!(status_color(&d), measuring);
    }

    #[test]
    fn initial_title_matches_empty_display() {
        let clock = ManualClock::new(0);
        let app = ProbeApp::new("t", Origin::capture(&clock), Rc::new(clock), false);
        assert_eq!(app.initial_title(), "t | TTFP: measuring... | TTI: measuring...");
    }

    #[test]
    fn title_changes_once_per_checkpoint() {
        let clock = ManualClock::new(1000);
        let mut app = ProbeApp::new("t", Origin::capture(&clock), Rc::new(clock.clone()), false);
        let mut scheduler = ManualScheduler::new();

        // Mount.
        assert_eq!(app.next_title().as_deref(), Some("t | TTFP: measuring... | TTI: measuring..."));
        assert!(app.probe.arm(&mut scheduler));
        assert_eq!(app.next_title(), None);

        clock.set(1142);
        scheduler.fire_frame();
        assert_eq!(app.next_title().as_deref(), Some("t | TTFP: 142 ms | TTI: measuring..."));

        clock.set(1148);
        scheduler.run_until_idle();
        assert_eq!(app.next_title().as_deref(), Some("t | TTFP: 142 ms | TTI: 148 ms"));
        assert_eq!(app.next_title(), None);
    }

    #[test]
    fn remount_reshows_the_current_title() {
        let clock = ManualClock::new(0);
        let mut app = ProbeApp::new("t", Origin::capture(&clock), Rc::new(clock), false);
        assert!(app.next_title().is_some());
        assert_eq!(app.next_title(), None);

        app.shown = None;
        assert_eq!(app.next_title().as_deref(), Some("t | TTFP: measuring... | TTI: measuring..."));
    }
}
