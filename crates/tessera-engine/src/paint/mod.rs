//! Paint model consumed by the batch generators.
//!
//! Scope:
//! - color representation (straight alpha, `[0, 1]` floats)
//! - gradient selection codes for shape items

pub mod color;
pub mod gradient;

pub use color::Color;
pub use gradient::{Gradient, GradientType};
