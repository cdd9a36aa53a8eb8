//! Colors used for surface clears.

mod color;

pub use color::Color;
