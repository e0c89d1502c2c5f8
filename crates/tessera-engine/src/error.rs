//! Error types for the batching layer.

use thiserror::Error;

use crate::batch::BatchKind;

/// Failure reported by a [`GraphicsInvoker`](crate::gpu::GraphicsInvoker) backend.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct InvokerError(pub String);

impl InvokerError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Errors raised by buffers, generators and the frame coordinator.
///
/// Every variant is a synchronous contract violation detected at the call that
/// raised it. Nothing is retried internally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BatchError {
    /// Upload or bind attempted before the buffer's first allocation.
    #[error("the {kind} buffer has not been initialized")]
    BufferNotInitialized { kind: BatchKind },

    /// Frame operation attempted before the graphics context was ready.
    #[error("the renderer has not been initialized")]
    RendererNotInitialized,

    /// A batch item carried an enumerated field outside its defined set.
    #[error("the value '{value}' of enum '{name}' is invalid")]
    InvalidEnumValue { name: &'static str, value: u32 },

    /// Per-item upload addressed a slot past the buffer capacity.
    #[error("batch index {index} is out of range for the {kind} buffer (capacity {capacity})")]
    BatchIndexOutOfRange { kind: BatchKind, index: u32, capacity: u32 },

    /// Requested capacity would overflow the `u32` index data.
    #[error("capacity {requested} for the {kind} buffer exceeds the limit of {max}")]
    CapacityTooLarge { kind: BatchKind, requested: u32, max: u32 },

    /// Operation attempted on a buffer whose GPU handles were released.
    #[error("the {kind} buffer has been disposed")]
    BufferDisposed { kind: BatchKind },

    /// The graphics backend rejected a call.
    #[error("graphics invoker failure: {0}")]
    Invoker(#[from] InvokerError),
}

/// Result type for batching operations.
pub type Result<T> = std::result::Result<T, BatchError>;
