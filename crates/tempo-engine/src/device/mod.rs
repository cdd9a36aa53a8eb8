//! GPU device + window surface.
//!
//! Only what a probe host needs: bring up a device bound to the window,
//! keep the swapchain sized, and clear + submit one frame at a time.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
