use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, IdleCtx, MountCtx, TickCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};

use super::cycle::{Cycle, FrameHooks, WindowFrames};
use super::scheduler::HostScheduler;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tempo".to_string(),
            initial_size: LogicalSize::new(640.0, 360.0),
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn request_redraw(&mut self) {
        self.commands.push(Command::Redraw);
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    Redraw,
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop until the window closes or the app exits.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    frames: WindowFrames,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    cycle: Cycle,
    exit_requested: bool,
}

/// Adapts the app plus one borrowed window and GPU to the redraw steps.
struct WindowHooks<'a, 'w, A> {
    app: &'a mut A,
    id: WindowId,
    window: &'a Window,
    gpu: &'a mut Gpu<'w>,
    runtime: &'a mut RuntimeCtx,
    control: AppControl,
}

impl<A: CoreApp> FrameHooks for WindowHooks<'_, '_, A> {
    fn frame(&mut self, _frame_index: u64) -> bool {
        let mut ctx = FrameCtx {
            window: WindowCtx { id: self.id, window: self.window },
            gpu: &mut *self.gpu,
            runtime: &mut *self.runtime,
            presented: false,
        };
        if self.app.on_frame(&mut ctx) == AppControl::Exit {
            self.control = AppControl::Exit;
        }
        ctx.presented()
    }

    fn ticked(&mut self) {
        let mut ctx = TickCtx {
            window: WindowCtx { id: self.id, window: self.window },
            runtime: &mut *self.runtime,
        };
        self.app.on_ticked(&mut ctx);
    }

    fn mounted(&mut self, mount_count: u32, scheduler: &mut HostScheduler) {
        let mut ctx = MountCtx {
            window: WindowCtx { id: self.id, window: self.window },
            runtime: &mut *self.runtime,
            mount_count,
            scheduler,
        };
        self.app.on_mounted(&mut ctx);
    }
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            cycle: Cycle::default(),
            exit_requested: false,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            frames: WindowFrames::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::Redraw => {
                    if let Some(entry) = &self.window {
                        entry.with_window(|w| w.request_redraw());
                    }
                }
                Command::Exit => self.request_exit(),
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let mut runtime_ctx = RuntimeCtx::default();

        // Split borrows so the ouroboros closure does not capture `self`.
        let (app, cycle) = (&mut self.app, &mut self.cycle);
        let Some(entry) = self.window.as_mut() else {
            return;
        };

        let (outcome, control) = entry.with_mut(|fields| {
            let mut hooks = WindowHooks {
                app,
                id: fields.window.id(),
                window: fields.window,
                gpu: fields.gpu,
                runtime: &mut runtime_ctx,
                control: AppControl::Continue,
            };
            let outcome = cycle.redraw(fields.frames, &mut hooks);
            (outcome, hooks.control)
        });

        let frame = outcome.frame_index;
        if !outcome.presented {
            log::trace!("frame {frame} not presented; frame tasks kept");
        } else if outcome.tasks_run > 0 {
            log::trace!("frame {frame}: ran {} frame continuation(s)", outcome.tasks_run);
        }
        if let Some(n) = outcome.mounted {
            log::debug!("window mounted (mount #{n}) after frame {frame}");
        }

        if control == AppControl::Exit {
            runtime_ctx.exit();
        }

        self.apply_commands(event_loop, runtime_ctx);
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
            }
            Err(e) => {
                log::error!("failed to create window: {e:#}");
                self.request_exit();
                event_loop.exit();
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        // The surface must not outlive a suspend on mobile targets. The next
        // `resumed` builds a fresh window, which mounts again.
        if self.window.take().is_some() {
            log::debug!("suspended; window released");
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let mut runtime_ctx = RuntimeCtx::default();
        let mut control = AppControl::Continue;

        let (app, cycle, entry) = (&mut self.app, &mut self.cycle, self.window.as_ref());
        let outcome = cycle.idle(|| {
            let window = entry.map(|e| {
                let w = e.borrow_window();
                WindowCtx { id: w.id(), window: w }
            });
            let mut ctx = IdleCtx { window, runtime: &mut runtime_ctx };
            control = app.on_idle(&mut ctx);
        });
        if outcome.tasks_run > 0 {
            log::trace!("idle drain ran {} task(s)", outcome.tasks_run);
        }

        if control == AppControl::Exit {
            runtime_ctx.exit();
        }

        self.apply_commands(event_loop, runtime_ctx);
        if self.exit_requested {
            return;
        }

        if outcome.wants_frame {
            if let Some(entry) = &self.window {
                entry.with_window(|w| w.request_redraw());
            }
        }

        // Work queued during the drain gets its own pass once pending
        // events have been handled.
        let flow = if outcome.keep_polling { ControlFlow::Poll } else { ControlFlow::Wait };
        event_loop.set_control_flow(flow);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let ours = self
            .window
            .as_ref()
            .is_some_and(|e| e.borrow_window().id() == window_id);
        if !ours {
            return;
        }

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.request_exit();
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.window = None;
                self.request_exit();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.window.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.window.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}
