//! Batch buffers and their per-kind vertex generators.
//!
//! Every primitive kind shares one generic lifecycle, [`GpuBuffer`], and plugs
//! in a zero-sized [`Primitive`] strategy that fixes:
//! - the vertex attribute layout
//! - how one item is encoded into four vertices
//! - the index pattern for a given capacity
//!
//! Quads are emitted in the order top-left, top-right, bottom-left,
//! bottom-right and indexed as `{0, 1, 2, 2, 1, 3}` per slot.

mod buffer;
mod common;
mod glyph;
mod line;
mod primitive;
mod shape;
mod texture;

use std::fmt;

pub use buffer::{GpuBuffer, GpuHandles};
pub use common::{RenderEffects, TexturedVertex};
pub use glyph::{GlyphItem, Glyphs};
pub use line::{LineItem, LineVertex, Lines};
pub use primitive::{
    quad_indices, Primitive, INDICES_PER_ITEM, MAX_CAPACITY, VERTICES_PER_ITEM,
};
pub use shape::{ShapeItem, ShapeVertex, Shapes};
pub use texture::{TextureItem, Textures};

use crate::bus::Notification;
use crate::config::BatchConfig;
use crate::error::Result;
use crate::gpu::GraphicsInvoker;

/// Log target for per-item upload traces.
pub const UPLOAD_LOG_TARGET: &str = "tessera_engine::batch::upload";

/// Drawable primitive kind; one buffer exists per kind.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BatchKind {
    Shape,
    Texture,
    Line,
    Glyph,
}

impl BatchKind {
    pub const ALL: [BatchKind; 4] = [
        BatchKind::Shape,
        BatchKind::Texture,
        BatchKind::Line,
        BatchKind::Glyph,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            BatchKind::Shape => "shape",
            BatchKind::Texture => "texture",
            BatchKind::Line => "line",
            BatchKind::Glyph => "glyph",
        }
    }
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four batch buffers, one per kind.
pub struct BatchBuffers {
    pub shape: GpuBuffer<Shapes>,
    pub texture: GpuBuffer<Textures>,
    pub line: GpuBuffer<Lines>,
    pub glyph: GpuBuffer<Glyphs>,
}

impl BatchBuffers {
    /// Creates every buffer with its configured capacity; no GPU work happens here.
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            shape: GpuBuffer::new(config.capacity(BatchKind::Shape)),
            texture: GpuBuffer::new(config.capacity(BatchKind::Texture)),
            line: GpuBuffer::new(config.capacity(BatchKind::Line)),
            glyph: GpuBuffer::new(config.capacity(BatchKind::Glyph)),
        }
    }

    /// Delivers `n` to every buffer, in kind order.
    pub fn on_notification<G: GraphicsInvoker>(
        &mut self,
        gl: &mut G,
        n: &Notification,
    ) -> Result<()> {
        self.shape.on_notification(gl, n)?;
        self.texture.on_notification(gl, n)?;
        self.line.on_notification(gl, n)?;
        self.glyph.on_notification(gl, n)?;
        Ok(())
    }

    pub fn batch_size(&self, kind: BatchKind) -> u32 {
        match kind {
            BatchKind::Shape => self.shape.batch_size(),
            BatchKind::Texture => self.texture.batch_size(),
            BatchKind::Line => self.line.batch_size(),
            BatchKind::Glyph => self.glyph.batch_size(),
        }
    }

    pub fn all_initialized(&self) -> bool {
        self.shape.is_initialized()
            && self.texture.is_initialized()
            && self.line.is_initialized()
            && self.glyph.is_initialized()
    }

    pub fn dispose<G: GraphicsInvoker>(&mut self, gl: &mut G) {
        self.shape.dispose(gl);
        self.texture.dispose(gl);
        self.line.dispose(gl);
        self.glyph.dispose(gl);
    }
}
