use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::error::InvokerError;
use crate::paint::Color;

use super::{
    BlendFactor, BlendFunc, BufferId, BufferTarget, BufferUsage, GraphicsInvoker, VertexArrayId,
    VertexAttribute,
};

/// Initialization parameters for a headless [`WgpuInvoker`].
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends wgpu may pick an adapter from.
    pub backends: wgpu::Backends,

    pub power_preference: wgpu::PowerPreference,

    /// Allow a software adapter (useful on CI machines without a GPU).
    pub force_fallback_adapter: bool,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}

/// Per-vertex-array state captured from attribute calls.
#[derive(Debug, Default)]
struct VertexArrayState {
    attributes: Vec<VertexAttribute>,
    enabled: Vec<u32>,
    vertex_buffer: Option<BufferId>,
    index_buffer: Option<BufferId>,
}

/// [`GraphicsInvoker`] backed by wgpu.
///
/// wgpu has no vertex array objects or global GL state, so this backend keeps
/// that state itself:
/// - buffer handles map to `wgpu::Buffer`s, recreated on every full upload
/// - partial uploads go through `Queue::write_buffer`
/// - vertex arrays record their attribute layout and attached buffers so a
///   renderer can build pipelines and bind slots from them
/// - clear requests and blend state are exposed for the next render pass
pub struct WgpuInvoker {
    device: wgpu::Device,
    queue: wgpu::Queue,

    next_id: u32,
    buffers: HashMap<BufferId, Option<wgpu::Buffer>>,
    vertex_arrays: HashMap<VertexArrayId, VertexArrayState>,

    bound_vao: Option<VertexArrayId>,
    bound_vertex: Option<BufferId>,
    bound_index: Option<BufferId>,

    blend: Option<wgpu::BlendState>,
    clear_color: Color,
    pending_clear: Option<wgpu::Color>,
    debug_groups: Vec<String>,
}

impl WgpuInvoker {
    /// Wraps an existing device/queue pair.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            next_id: 1,
            buffers: HashMap::new(),
            vertex_arrays: HashMap::new(),
            bound_vao: None,
            bound_vertex: None,
            bound_index: None,
            blend: None,
            clear_color: Color::TRANSPARENT,
            pending_clear: None,
            debug_groups: Vec::new(),
        }
    }

    /// Creates a device without a surface, blocking on adapter/device acquisition.
    pub fn headless(init: &GpuInit) -> Result<Self> {
        pollster::block_on(Self::headless_async(init))
    }

    async fn headless_async(init: &GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: init.force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        log::info!("using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tessera-engine device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        Ok(Self::new(device, queue))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// GPU buffer behind `id`, once it has storage.
    pub fn buffer(&self, id: BufferId) -> Option<&wgpu::Buffer> {
        self.buffers.get(&id).and_then(Option::as_ref)
    }

    /// Vertex and index buffers attached to `vao`.
    pub fn vertex_array_buffers(
        &self,
        vao: VertexArrayId,
    ) -> Option<(Option<BufferId>, Option<BufferId>)> {
        self.vertex_arrays
            .get(&vao)
            .map(|s| (s.vertex_buffer, s.index_buffer))
    }

    /// Enabled attributes of `vao` as wgpu vertex attributes, plus the array stride.
    pub fn vertex_layout(&self, vao: VertexArrayId) -> Option<(u64, Vec<wgpu::VertexAttribute>)> {
        let state = self.vertex_arrays.get(&vao)?;
        let stride = state.attributes.first().map_or(0, |a| a.stride as u64);
        let attrs = state
            .attributes
            .iter()
            .filter(|a| state.enabled.contains(&a.index))
            .filter_map(|a| {
                Some(wgpu::VertexAttribute {
                    format: float_format(a.components)?,
                    offset: a.offset as u64,
                    shader_location: a.index,
                })
            })
            .collect();
        Some((stride, attrs))
    }

    /// Blend state requested through [`GraphicsInvoker::enable_blend`].
    pub fn blend_state(&self) -> Option<wgpu::BlendState> {
        self.blend
    }

    /// Takes the pending clear, to be used as the next pass's `LoadOp::Clear`.
    pub fn take_clear(&mut self) -> Option<wgpu::Color> {
        self.pending_clear.take()
    }

    fn bound(&self, target: BufferTarget) -> Result<BufferId, InvokerError> {
        let bound = match target {
            BufferTarget::Vertex => self.bound_vertex,
            BufferTarget::Index => self.bound_index,
        };
        bound.ok_or_else(|| InvokerError::new(format!("no buffer bound to {target:?}")))
    }

    fn bound_vao_state(&mut self) -> Result<&mut VertexArrayState, InvokerError> {
        let vao = self
            .bound_vao
            .ok_or_else(|| InvokerError::new("no vertex array bound"))?;
        self.vertex_arrays
            .get_mut(&vao)
            .ok_or_else(|| InvokerError::new(format!("{vao:?} was deleted")))
    }
}

impl GraphicsInvoker for WgpuInvoker {
    fn create_vertex_array(&mut self) -> VertexArrayId {
        let vao = VertexArrayId(self.next_id);
        self.next_id += 1;
        self.vertex_arrays.insert(vao, VertexArrayState::default());
        vao
    }

    fn create_buffer(&mut self) -> BufferId {
        let id = BufferId(self.next_id);
        self.next_id += 1;
        self.buffers.insert(id, None);
        id
    }

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) {
        self.bound_vao = vao;
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        match target {
            BufferTarget::Vertex => self.bound_vertex = buffer,
            BufferTarget::Index => {
                self.bound_index = buffer;
                // Like GL, the element binding is captured by the bound vertex array.
                if let Some(buffer) = buffer {
                    if let Ok(state) = self.bound_vao_state() {
                        state.index_buffer = Some(buffer);
                    }
                }
            }
        }
    }

    fn buffer_data(
        &mut self,
        target: BufferTarget,
        data: &[u8],
        _usage: BufferUsage,
    ) -> Result<(), InvokerError> {
        let id = self.bound(target)?;
        let slot = self
            .buffers
            .get_mut(&id)
            .ok_or_else(|| InvokerError::new(format!("{id:?} was deleted")))?;

        let size = aligned_len(data.len()).max(wgpu::COPY_BUFFER_ALIGNMENT);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(match target {
                BufferTarget::Vertex => "tessera batch vbo",
                BufferTarget::Index => "tessera batch ibo",
            }),
            size,
            usage: wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::INDEX
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        if !data.is_empty() {
            write_padded(&self.queue, &buffer, 0, data);
        }
        if let Some(old) = slot.replace(buffer) {
            old.destroy();
        }
        Ok(())
    }

    fn buffer_sub_data(
        &mut self,
        target: BufferTarget,
        offset: u64,
        data: &[u8],
    ) -> Result<(), InvokerError> {
        let id = self.bound(target)?;
        let buffer = self
            .buffer(id)
            .ok_or_else(|| InvokerError::new(format!("{id:?} has no storage")))?;

        let end = offset + data.len() as u64;
        if end > buffer.size() {
            return Err(InvokerError::new(format!(
                "sub-data range {offset}..{end} exceeds {id:?} size {}",
                buffer.size()
            )));
        }
        if offset % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
            return Err(InvokerError::new(format!("offset {offset} is not 4-byte aligned")));
        }

        write_padded(&self.queue, buffer, offset, data);
        Ok(())
    }

    fn vertex_attrib_pointer(&mut self, attribute: &VertexAttribute) -> Result<(), InvokerError> {
        if float_format(attribute.components).is_none() {
            return Err(InvokerError::new(format!(
                "attribute '{}' has {} components; expected 1..=4",
                attribute.label, attribute.components
            )));
        }
        let vbo = self.bound(BufferTarget::Vertex)?;
        let state = self.bound_vao_state()?;
        state.vertex_buffer = Some(vbo);
        state.attributes.retain(|a| a.index != attribute.index);
        state.attributes.push(*attribute);
        Ok(())
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) -> Result<(), InvokerError> {
        let state = self.bound_vao_state()?;
        if !state.enabled.contains(&index) {
            state.enabled.push(index);
        }
        Ok(())
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayId) {
        self.vertex_arrays.remove(&vao);
        if self.bound_vao == Some(vao) {
            self.bound_vao = None;
        }
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        if let Some(Some(b)) = self.buffers.remove(&buffer) {
            b.destroy();
        }
        if self.bound_vertex == Some(buffer) {
            self.bound_vertex = None;
        }
        if self.bound_index == Some(buffer) {
            self.bound_index = None;
        }
    }

    fn enable_blend(&mut self, func: BlendFunc) {
        let component = wgpu::BlendComponent {
            src_factor: blend_factor(func.src),
            dst_factor: blend_factor(func.dst),
            operation: wgpu::BlendOperation::Add,
        };
        self.blend = Some(wgpu::BlendState { color: component, alpha: component });
    }

    fn clear_color(&self) -> Color {
        self.clear_color
    }

    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn clear_color_buffer(&mut self) {
        self.pending_clear = Some(self.clear_color.into());
    }

    fn push_debug_group(&mut self, label: &str) {
        log::trace!("begin group: {label}");
        self.debug_groups.push(label.to_owned());
    }

    fn pop_debug_group(&mut self) {
        if let Some(label) = self.debug_groups.pop() {
            log::trace!("end group: {label}");
        }
    }
}

fn float_format(components: u32) -> Option<wgpu::VertexFormat> {
    match components {
        1 => Some(wgpu::VertexFormat::Float32),
        2 => Some(wgpu::VertexFormat::Float32x2),
        3 => Some(wgpu::VertexFormat::Float32x3),
        4 => Some(wgpu::VertexFormat::Float32x4),
        _ => None,
    }
}

fn blend_factor(f: BlendFactor) -> wgpu::BlendFactor {
    match f {
        BlendFactor::Zero => wgpu::BlendFactor::Zero,
        BlendFactor::One => wgpu::BlendFactor::One,
        BlendFactor::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
    }
}

fn aligned_len(len: usize) -> u64 {
    let align = wgpu::COPY_BUFFER_ALIGNMENT;
    (len as u64).div_ceil(align) * align
}

/// `write_buffer` requires 4-byte multiples; pad the tail with zeros if needed.
fn write_padded(queue: &wgpu::Queue, buffer: &wgpu::Buffer, offset: u64, data: &[u8]) {
    if data.len() as u64 % wgpu::COPY_BUFFER_ALIGNMENT == 0 {
        queue.write_buffer(buffer, offset, data);
    } else {
        let mut padded = data.to_vec();
        padded.resize(aligned_len(data.len()) as usize, 0);
        queue.write_buffer(buffer, offset, &padded);
    }
}
