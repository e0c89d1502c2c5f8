//! Tessera engine crate.
//!
//! This crate owns the GPU batching layer of the renderer: per-kind vertex
//! buffers, their vertex/index generators, and the frame coordinator that
//! gates GPU work until the graphics context exists.

pub mod batch;
pub mod bus;
pub mod config;
pub mod coords;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod hub;
pub mod logging;
pub mod paint;

pub use config::BatchConfig;
pub use error::{BatchError, Result};
pub use hub::RenderHub;
