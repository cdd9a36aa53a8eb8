//! Tempo engine crate.
//!
//! The platform + GPU host that the startup probe runs inside. It owns the
//! event loop and the window surface, and provides the two scheduling
//! primitives the probe consumes (frame tick, idle queue).

pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod window;
