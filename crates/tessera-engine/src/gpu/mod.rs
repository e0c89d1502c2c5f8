//! Graphics backend seam.
//!
//! The batching layer never talks to a native API directly. It calls a
//! [`GraphicsInvoker`], wrapped by the [`GpuService`] helpers for debug scopes
//! and bind/unbind pairs.
//!
//! Backends:
//! - [`RecordingInvoker`]: in-memory, records every call (tests, dry runs)
//! - [`WgpuInvoker`]: `wgpu` buffers behind GL-style handles

mod invoker;
mod layout;
mod recorder;
mod service;
mod wgpu_backend;

pub use invoker::{
    BlendFactor, BlendFunc, BufferId, BufferTarget, BufferUsage, GraphicsInvoker, VertexArrayId,
};
pub use layout::{AttributeSpec, VertexAttribute, VertexLayout};
pub use recorder::{GlCall, RecordingInvoker};
pub use service::GpuService;
pub use wgpu_backend::{GpuInit, WgpuInvoker};
