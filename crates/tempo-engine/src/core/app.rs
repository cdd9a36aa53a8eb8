use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::{FrameCtx, IdleCtx, MountCtx, TickCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Callback order for one window:
///
/// 1. `on_frame` for the first frame, which is presented.
/// 2. `on_mounted`, once that frame has gone out. Called again if the window
///    is recreated (e.g. after a suspend), so hooks must tolerate remounts.
/// 3. `on_frame` for every later redraw, followed by `on_ticked` when frame
///    continuations ran for it.
/// 4. `on_idle` whenever the event queue drains, after the deferred tasks.
pub trait App {
    /// Called for window events, before the runtime handles them.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Post-render lifecycle event.
    fn on_mounted(&mut self, ctx: &mut MountCtx<'_>) {
        let _ = ctx;
    }

    /// Called once per redraw. Call [`FrameCtx::present`] to put a frame out.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called right after frame continuations ran for a presented frame,
    /// before the next idle drain.
    fn on_ticked(&mut self, ctx: &mut TickCtx<'_>) {
        let _ = ctx;
    }

    /// Called after the runtime drained its deferred task queue.
    fn on_idle(&mut self, ctx: &mut IdleCtx<'_>) -> AppControl {
        let _ = ctx;
        AppControl::Continue
    }
}
