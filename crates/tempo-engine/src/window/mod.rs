//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the window, wires them to the GPU layer and
//! drives the host scheduler from the loop's redraw and idle callbacks.

mod cycle;
mod runtime;
mod scheduler;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
pub use scheduler::HostScheduler;
