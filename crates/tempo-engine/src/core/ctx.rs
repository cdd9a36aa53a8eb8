use tempo_probe::Scheduler;
use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::paint::Color;
use crate::window::{HostScheduler, RuntimeCtx};

use super::app::AppControl;

/// Per-window handle.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame context passed to `App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub runtime: &'a mut RuntimeCtx,
    pub(crate) presented: bool,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Clears the surface to `clear` and presents it.
    ///
    /// Frame continuations only run for frames that were actually presented;
    /// a skipped frame leaves them pending for the next redraw.
    pub fn present(&mut self, clear: Color) -> AppControl {
        let frame = match self.gpu.begin_clear(clear) {
            Ok(f) => f,
            Err(err) => {
                if self.gpu.recover(err) == SurfaceErrorAction::Fatal {
                    return AppControl::Exit;
                }
                self.runtime.request_redraw();
                return AppControl::Continue;
            }
        };

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);
        self.presented = true;

        AppControl::Continue
    }

    pub fn presented(&self) -> bool {
        self.presented
    }
}

/// Context for `App::on_ticked`.
pub struct TickCtx<'a> {
    pub window: WindowCtx<'a>,
    pub runtime: &'a mut RuntimeCtx,
}

/// Context for `App::on_mounted`.
pub struct MountCtx<'a> {
    pub window: WindowCtx<'a>,
    pub runtime: &'a mut RuntimeCtx,
    /// 1 for the first mount of the process, 2 after the first remount, ...
    pub mount_count: u32,
    pub(crate) scheduler: &'a mut HostScheduler,
}

impl<'a> MountCtx<'a> {
    /// The host's frame tick + idle queue.
    pub fn scheduler(&mut self) -> &mut dyn Scheduler {
        &mut *self.scheduler
    }
}

/// Context for `App::on_idle`.
pub struct IdleCtx<'a> {
    /// `None` while suspended (no window exists).
    pub window: Option<WindowCtx<'a>>,
    pub runtime: &'a mut RuntimeCtx,
}
