use bytemuck::{Pod, Zeroable};

use crate::coords::{Vec2, Viewport};
use crate::error::Result;
use crate::gpu::AttributeSpec;
use crate::paint::Color;

use super::{BatchBuffers, BatchKind, GpuBuffer, Primitive, VERTICES_PER_ITEM};

/// Straight line segment of a given thickness.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LineItem {
    pub p1: Vec2,
    pub p2: Vec2,
    pub color: Color,
    /// Full thickness in pixels.
    pub thickness: f32,
}

impl LineItem {
    pub fn new(p1: Vec2, p2: Vec2, color: Color, thickness: f32) -> Self {
        Self { p1, p2, color, thickness }
    }
}

/// Vertex layout (24 bytes):
///
///  offset  0  position  [f32; 2]  loc 0  (NDC)
///  offset  8  color     [f32; 4]  loc 1
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

const ATTRIBUTES: [AttributeSpec; 2] = [
    AttributeSpec::new("vertex position", 2),
    AttributeSpec::new("color", 4),
];

/// Line batch strategy.
#[derive(Debug, Copy, Clone, Default)]
pub struct Lines;

impl Primitive for Lines {
    const KIND: BatchKind = BatchKind::Line;
    type Item = LineItem;
    type Vertex = LineVertex;

    fn attributes() -> &'static [AttributeSpec] {
        &ATTRIBUTES
    }

    /// Expands the segment into a quad.
    ///
    /// With `n = perp(p2 - p1)` scaled to half the thickness the vertices are
    /// `p1 - n, p2 - n, p1 + n, p2 + n`. A zero-length segment uses a vertical `n`.
    fn encode(item: &LineItem, viewport: Viewport) -> Result<[LineVertex; VERTICES_PER_ITEM]> {
        let dir = (item.p2 - item.p1).try_normalize().unwrap_or(Vec2::new(1.0, 0.0));
        let n = dir.perp() * (item.thickness.max(0.0) * 0.5);

        let corners = [item.p1 - n, item.p2 - n, item.p1 + n, item.p2 + n];
        let color = item.color.to_array();

        Ok(std::array::from_fn(|i| LineVertex {
            position: viewport.to_ndc(corners[i]),
            color,
        }))
    }

    fn select(buffers: &mut BatchBuffers) -> &mut GpuBuffer<Self> {
        &mut buffers.line
    }
}
