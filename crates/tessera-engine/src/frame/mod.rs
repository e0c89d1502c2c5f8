//! Frame lifecycle.
//!
//! The coordinator gates every frame operation on graphics-context readiness
//! and republishes frame boundaries on the bus.

mod cached;
mod coordinator;

pub use cached::CachedValue;
pub use coordinator::FrameCoordinator;
