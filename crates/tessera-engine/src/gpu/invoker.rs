use crate::error::InvokerError;
use crate::paint::Color;

use super::VertexAttribute;

/// Opaque vertex array handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexArrayId(pub u32);

/// Opaque buffer object handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(pub u32);

/// Buffer binding point.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data.
    Vertex,
    /// Element (index) data.
    Index,
}

/// Expected update frequency of a full buffer upload.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUsage {
    StaticDraw,
    DynamicDraw,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

/// Source/destination blend factors applied to color and alpha.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BlendFunc {
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

impl BlendFunc {
    /// Standard straight-alpha blending.
    pub const ALPHA: BlendFunc = BlendFunc {
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::OneMinusSrcAlpha,
    };
}

/// Opaque capability to create, bind and update GPU objects and to query or
/// set GPU state.
///
/// Calls mirror a GL-style state machine: data uploads and attribute pointers
/// act on whatever is currently bound. Handle creation and binding cannot
/// fail; data transfers report backend rejections as [`InvokerError`].
pub trait GraphicsInvoker {
    fn create_vertex_array(&mut self) -> VertexArrayId;
    fn create_buffer(&mut self) -> BufferId;

    /// Binds `vao`, or unbinds with `None`.
    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>);
    /// Binds `buffer` to `target`, or unbinds with `None`.
    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>);

    /// Replaces the whole storage of the buffer bound to `target`.
    fn buffer_data(
        &mut self,
        target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), InvokerError>;

    /// Overwrites `data.len()` bytes at `offset` in the buffer bound to `target`.
    fn buffer_sub_data(
        &mut self,
        target: BufferTarget,
        offset: u64,
        data: &[u8],
    ) -> Result<(), InvokerError>;

    /// Describes one attribute of the bound vertex buffer on the bound vertex array.
    fn vertex_attrib_pointer(&mut self, attribute: &VertexAttribute) -> Result<(), InvokerError>;
    fn enable_vertex_attrib_array(&mut self, index: u32) -> Result<(), InvokerError>;

    fn delete_vertex_array(&mut self, vao: VertexArrayId);
    fn delete_buffer(&mut self, buffer: BufferId);

    fn enable_blend(&mut self, func: BlendFunc);

    fn clear_color(&self) -> Color;
    fn set_clear_color(&mut self, color: Color);
    /// Clears the color buffer with the current clear color.
    fn clear_color_buffer(&mut self);

    fn push_debug_group(&mut self, label: &str);
    fn pop_debug_group(&mut self);
}
