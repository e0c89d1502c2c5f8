use std::fmt::Debug;

use bytemuck::Pod;

use crate::coords::Viewport;
use crate::error::Result;
use crate::gpu::AttributeSpec;

use super::{BatchBuffers, BatchKind, GpuBuffer};

/// Vertices emitted per batch item (one quad).
pub const VERTICES_PER_ITEM: usize = 4;

/// Indices emitted per batch item (two triangles).
pub const INDICES_PER_ITEM: usize = 6;

/// Largest capacity whose index data still fits in `u32`.
pub const MAX_CAPACITY: u32 = 1 << 30;

/// Per-kind strategy plugged into [`GpuBuffer`].
///
/// Implementors are zero-sized marker types; everything is resolved at compile
/// time.
pub trait Primitive: Sized + 'static {
    const KIND: BatchKind;

    /// One drawable instance for one frame.
    type Item;

    /// Exact GPU vertex; its byte layout must match [`Primitive::attributes`].
    type Vertex: Pod + Debug + PartialEq;

    /// Attribute list in shader-location order.
    fn attributes() -> &'static [AttributeSpec];

    /// Encodes one item into its quad, converting pixels to NDC with `viewport`.
    ///
    /// Must fail before producing anything when an enumerated field of the item
    /// is out of range.
    fn encode(item: &Self::Item, viewport: Viewport) -> Result<[Self::Vertex; VERTICES_PER_ITEM]>;

    /// Full index buffer for `capacity` slots.
    fn generate_indices(capacity: u32) -> Vec<u32> {
        quad_indices(capacity)
    }

    /// This kind's buffer inside the shared set.
    fn select(buffers: &mut BatchBuffers) -> &mut GpuBuffer<Self>;
}

/// `{0, 1, 2, 2, 1, 3}` per slot, offset by four vertices per slot.
///
/// `capacity` must not exceed [`MAX_CAPACITY`].
pub fn quad_indices(capacity: u32) -> Vec<u32> {
    debug_assert!(capacity <= MAX_CAPACITY);
    let mut indices = Vec::with_capacity(capacity as usize * INDICES_PER_ITEM);
    for slot in 0..capacity {
        let base = slot * VERTICES_PER_ITEM as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }
    indices
}
