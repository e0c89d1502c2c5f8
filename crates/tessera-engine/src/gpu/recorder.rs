use std::collections::HashMap;

use crate::error::InvokerError;
use crate::paint::Color;

use super::{
    BlendFunc, BufferId, BufferTarget, BufferUsage, GraphicsInvoker, VertexArrayId, VertexAttribute,
};

/// One call observed by [`RecordingInvoker`].
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateVertexArray(VertexArrayId),
    CreateBuffer(BufferId),
    BindVertexArray(Option<VertexArrayId>),
    BindBuffer(BufferTarget, Option<BufferId>),
    BufferData { target: BufferTarget, buffer: BufferId, len: usize, usage: BufferUsage },
    BufferSubData { target: BufferTarget, buffer: BufferId, offset: u64, len: usize },
    VertexAttribPointer(VertexAttribute),
    EnableVertexAttribArray(u32),
    DeleteVertexArray(VertexArrayId),
    DeleteBuffer(BufferId),
    EnableBlend(BlendFunc),
    SetClearColor(Color),
    ClearColorBuffer,
    PushDebugGroup(String),
    PopDebugGroup,
}

/// In-memory invoker that records every call and simulates buffer storage.
///
/// Uploads are validated the way a driver would: they require a bound buffer
/// and partial updates must stay inside the allocated storage.
#[derive(Debug)]
pub struct RecordingInvoker {
    calls: Vec<GlCall>,
    next_id: u32,

    storage: HashMap<BufferId, Vec<u8>>,
    attributes: HashMap<VertexArrayId, Vec<VertexAttribute>>,

    bound_vao: Option<VertexArrayId>,
    bound_vertex: Option<BufferId>,
    bound_index: Option<BufferId>,

    blend: Option<BlendFunc>,
    clear_color: Color,
    debug_groups: Vec<String>,
}

impl Default for RecordingInvoker {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            // 0 is the "no object" name in GL; start above it.
            next_id: 1,
            storage: HashMap::new(),
            attributes: HashMap::new(),
            bound_vao: None,
            bound_vertex: None,
            bound_index: None,
            blend: None,
            clear_color: Color::TRANSPARENT,
            debug_groups: Vec::new(),
        }
    }
}

impl RecordingInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    /// Drops the call log; simulated GPU state is kept.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of logged calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(*c)).count()
    }

    /// Current contents of `buffer`, if it has storage.
    pub fn buffer_contents(&self, buffer: BufferId) -> Option<&[u8]> {
        self.storage.get(&buffer).map(Vec::as_slice)
    }

    /// Attributes configured on `vao`.
    pub fn attributes(&self, vao: VertexArrayId) -> Option<&[VertexAttribute]> {
        self.attributes.get(&vao).map(Vec::as_slice)
    }

    pub fn bound_vertex_array(&self) -> Option<VertexArrayId> {
        self.bound_vao
    }

    pub fn bound_buffer(&self, target: BufferTarget) -> Option<BufferId> {
        match target {
            BufferTarget::Vertex => self.bound_vertex,
            BufferTarget::Index => self.bound_index,
        }
    }

    pub fn blend(&self) -> Option<BlendFunc> {
        self.blend
    }

    pub fn open_debug_groups(&self) -> usize {
        self.debug_groups.len()
    }

    /// Number of live (created and not deleted) objects.
    pub fn live_objects(&self) -> usize {
        let created = self.count(|c| {
            matches!(c, GlCall::CreateBuffer(_) | GlCall::CreateVertexArray(_))
        });
        let deleted = self.count(|c| {
            matches!(c, GlCall::DeleteBuffer(_) | GlCall::DeleteVertexArray(_))
        });
        created.saturating_sub(deleted)
    }

    fn next(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn bound(&self, target: BufferTarget) -> Result<BufferId, InvokerError> {
        self.bound_buffer(target)
            .ok_or_else(|| InvokerError::new(format!("no buffer bound to {target:?}")))
    }
}

impl GraphicsInvoker for RecordingInvoker {
    fn create_vertex_array(&mut self) -> VertexArrayId {
        let vao = VertexArrayId(self.next());
        self.calls.push(GlCall::CreateVertexArray(vao));
        vao
    }

    fn create_buffer(&mut self) -> BufferId {
        let buffer = BufferId(self.next());
        self.calls.push(GlCall::CreateBuffer(buffer));
        buffer
    }

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) {
        self.bound_vao = vao;
        self.calls.push(GlCall::BindVertexArray(vao));
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        match target {
            BufferTarget::Vertex => self.bound_vertex = buffer,
            BufferTarget::Index => self.bound_index = buffer,
        }
        self.calls.push(GlCall::BindBuffer(target, buffer));
    }

    fn buffer_data(
        &mut self,
        target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), InvokerError> {
        let buffer = self.bound(target)?;
        self.storage.insert(buffer, data.to_vec());
        self.calls.push(GlCall::BufferData { target, buffer, len: data.len(), usage });
        Ok(())
    }

    fn buffer_sub_data(
        &mut self,
        target: BufferTarget,
        offset: u64,
        data: &[u8],
    ) -> Result<(), InvokerError> {
        let buffer = self.bound(target)?;
        let store = self
            .storage
            .get_mut(&buffer)
            .ok_or_else(|| InvokerError::new(format!("{buffer:?} has no storage")))?;

        let start = offset as usize;
        let end = start + data.len();
        if end > store.len() {
            return Err(InvokerError::new(format!(
                "sub-data range {start}..{end} exceeds {buffer:?} size {}",
                store.len()
            )));
        }
        store[start..end].copy_from_slice(data);

        self.calls.push(GlCall::BufferSubData { target, buffer, offset, len: data.len() });
        Ok(())
    }

    fn vertex_attrib_pointer(&mut self, attribute: &VertexAttribute) -> Result<(), InvokerError> {
        let vao = self
            .bound_vao
            .ok_or_else(|| InvokerError::new("no vertex array bound"))?;
        self.bound(BufferTarget::Vertex)?;
        self.attributes.entry(vao).or_default().push(*attribute);
        self.calls.push(GlCall::VertexAttribPointer(*attribute));
        Ok(())
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) -> Result<(), InvokerError> {
        if self.bound_vao.is_none() {
            return Err(InvokerError::new("no vertex array bound"));
        }
        self.calls.push(GlCall::EnableVertexAttribArray(index));
        Ok(())
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayId) {
        self.attributes.remove(&vao);
        if self.bound_vao == Some(vao) {
            self.bound_vao = None;
        }
        self.calls.push(GlCall::DeleteVertexArray(vao));
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.storage.remove(&buffer);
        if self.bound_vertex == Some(buffer) {
            self.bound_vertex = None;
        }
        if self.bound_index == Some(buffer) {
            self.bound_index = None;
        }
        self.calls.push(GlCall::DeleteBuffer(buffer));
    }

    fn enable_blend(&mut self, func: BlendFunc) {
        self.blend = Some(func);
        self.calls.push(GlCall::EnableBlend(func));
    }

    fn clear_color(&self) -> Color {
        self.clear_color
    }

    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
        self.calls.push(GlCall::SetClearColor(color));
    }

    fn clear_color_buffer(&mut self) {
        self.calls.push(GlCall::ClearColorBuffer);
    }

    fn push_debug_group(&mut self, label: &str) {
        self.debug_groups.push(label.to_owned());
        self.calls.push(GlCall::PushDebugGroup(label.to_owned()));
    }

    fn pop_debug_group(&mut self) {
        self.debug_groups.pop();
        self.calls.push(GlCall::PopDebugGroup);
    }
}
