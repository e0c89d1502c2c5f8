use std::marker::PhantomData;

use bytemuck::{Pod, Zeroable};

use crate::bus::Notification;
use crate::coords::Viewport;
use crate::error::{BatchError, InvokerError, Result};
use crate::gpu::{
    BufferId, BufferTarget, BufferUsage, GpuService, GraphicsInvoker, VertexArrayId, VertexLayout,
};

use super::{BatchKind, Primitive, MAX_CAPACITY, UPLOAD_LOG_TARGET, VERTICES_PER_ITEM};

/// GPU objects owned by one buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GpuHandles {
    pub vao: VertexArrayId,
    pub vbo: BufferId,
    pub ebo: BufferId,
}

#[derive(Debug)]
enum BufferState {
    /// Waiting for the graphics context; no GPU objects exist.
    Pending,
    Ready(GpuHandles),
    /// Handles released; terminal.
    Disposed,
}

/// Batch buffer for one primitive kind.
///
/// Lifecycle:
/// - constructed with a capacity and no GPU objects
/// - [`init`](Self::init) creates the vertex array, vertex buffer and index
///   buffer exactly once, when the graphics context is ready
/// - capacity changes reallocate both buffers in full (or only record the new
///   size before `init`)
/// - [`dispose`](Self::dispose) releases the handles; it is idempotent and terminal
///
/// The CPU copy of the vertex data always holds `capacity × 4` vertices and
/// mirrors what was uploaded to the GPU.
pub struct GpuBuffer<P: Primitive> {
    state: BufferState,
    capacity: u32,
    viewport: Viewport,
    layout: VertexLayout,
    vertices: Vec<P::Vertex>,
    _kind: PhantomData<P>,
}

impl<P: Primitive> GpuBuffer<P> {
    /// Creates a pending buffer. Capacities above [`MAX_CAPACITY`] are clamped.
    pub fn new(capacity: u32) -> Self {
        if capacity > MAX_CAPACITY {
            log::warn!("{} capacity {capacity} clamped to {MAX_CAPACITY}", P::KIND);
        }
        let capacity = capacity.min(MAX_CAPACITY);
        let layout = VertexLayout::from_specs(P::attributes());
        debug_assert_eq!(
            layout.stride() as usize,
            std::mem::size_of::<P::Vertex>(),
            "{} vertex struct does not match its attribute layout",
            P::KIND
        );

        Self {
            state: BufferState::Pending,
            capacity,
            viewport: Viewport::default(),
            layout,
            vertices: zeroed_vertices::<P>(capacity),
            _kind: PhantomData,
        }
    }

    pub fn kind(&self) -> BatchKind {
        P::KIND
    }

    /// Current capacity in items.
    pub fn batch_size(&self) -> u32 {
        self.capacity
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, BufferState::Ready(_))
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self.state, BufferState::Disposed)
    }

    pub fn handles(&self) -> Option<GpuHandles> {
        match self.state {
            BufferState::Ready(h) => Some(h),
            _ => None,
        }
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Bytes occupied by one item's vertices.
    pub fn vertex_bytes_per_item(&self) -> u64 {
        self.layout.stride() as u64 * VERTICES_PER_ITEM as u64
    }

    /// Current vertex data as flat floats (`capacity × 4 × floats-per-vertex`).
    pub fn generate_data(&self) -> Vec<f32> {
        bytemuck::cast_slice::<P::Vertex, f32>(&self.vertices).to_vec()
    }

    /// Index data for the current capacity.
    pub fn generate_indices(&self) -> Vec<u32> {
        P::generate_indices(self.capacity)
    }

    /// Routes a bus notification to the matching lifecycle step.
    pub fn on_notification<G: GraphicsInvoker>(
        &mut self,
        gl: &mut G,
        n: &Notification,
    ) -> Result<()> {
        match *n {
            Notification::GraphicsContextReady => self.init(gl),
            Notification::BatchCapacityChanged { kind, size } if kind == P::KIND => {
                self.set_capacity(gl, size)
            }
            Notification::ViewportResized { width, height } => {
                self.set_viewport(Viewport::new(width as f32, height as f32));
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Creates the GPU objects and uploads the initial buffers.
    ///
    /// Only valid once the graphics context exists. Later calls are no-ops.
    pub fn init<G: GraphicsInvoker>(&mut self, gl: &mut G) -> Result<()> {
        match self.state {
            BufferState::Ready(_) => {
                log::debug!("{} buffer already initialized", P::KIND);
                return Ok(());
            }
            BufferState::Disposed => return Err(BatchError::BufferDisposed { kind: P::KIND }),
            BufferState::Pending => {}
        }

        let handles = GpuHandles {
            vao: gl.create_vertex_array(),
            vbo: gl.create_buffer(),
            ebo: gl.create_buffer(),
        };
        let indices = self.generate_indices();
        let vertices = &self.vertices;
        let layout = &self.layout;

        let setup = gl.debug_scope(&format!("{} buffer setup", P::KIND), |gl| -> Result<()> {
            gl.bind_vao(handles.vao);

            gl.bind_vbo(handles.vbo);
            upload(gl, BufferTarget::Vertex, vertices)?;

            gl.bind_ebo(handles.ebo);
            upload(gl, BufferTarget::Index, &indices)?;

            for attr in layout.attributes() {
                gl.vertex_attrib_pointer(attr)?;
                gl.enable_vertex_attrib_array(attr.index)?;
            }

            // Unbind the vertex array first so it keeps its element binding.
            gl.unbind_vao();
            gl.unbind_vbo();
            gl.unbind_ebo();
            Ok(())
        });

        if let Err(err) = setup {
            log::warn!("{} buffer setup failed: {err}", P::KIND);
            gl.unbind_vao();
            gl.delete_buffer(handles.ebo);
            gl.delete_buffer(handles.vbo);
            gl.delete_vertex_array(handles.vao);
            return Err(err);
        }

        log::debug!(
            "{} buffer initialized: capacity {}, stride {} bytes",
            P::KIND,
            self.capacity,
            self.layout.stride()
        );
        self.state = BufferState::Ready(handles);
        Ok(())
    }

    /// Binds the vertex array for the draw calls that follow.
    pub fn prepare_for_upload<G: GraphicsInvoker>(&mut self, gl: &mut G) -> Result<()> {
        let handles = self.ready_handles()?;
        gl.bind_vao(handles.vao);
        Ok(())
    }

    /// Encodes `item` into slot `batch_index` and uploads only that slot's bytes.
    pub fn upload_vertex_data<G: GraphicsInvoker>(
        &mut self,
        gl: &mut G,
        item: &P::Item,
        batch_index: u32,
    ) -> Result<()> {
        let handles = self.ready_handles()?;
        if batch_index >= self.capacity {
            log::warn!("{} upload at {batch_index} exceeds capacity {}", P::KIND, self.capacity);
            return Err(BatchError::BatchIndexOutOfRange {
                kind: P::KIND,
                index: batch_index,
                capacity: self.capacity,
            });
        }

        let quad = P::encode(item, self.viewport)?;
        let offset = batch_index as u64 * self.vertex_bytes_per_item();

        log::trace!(
            target: UPLOAD_LOG_TARGET,
            "{} item {batch_index}: {} bytes at offset {offset}",
            P::KIND,
            self.vertex_bytes_per_item()
        );

        gl.debug_scope(&format!("Update {} - BatchItem({batch_index})", P::KIND), |gl| {
            gl.bind_vbo(handles.vbo);
            let res = gl.buffer_sub_data(BufferTarget::Vertex, offset, bytemuck::cast_slice(&quad));
            gl.unbind_vbo();
            res
        })?;

        let start = batch_index as usize * VERTICES_PER_ITEM;
        self.vertices[start..start + VERTICES_PER_ITEM].copy_from_slice(&quad);
        Ok(())
    }

    /// Changes the capacity.
    ///
    /// Before `init` only the number is stored. Afterwards both GPU buffers are
    /// reallocated and re-uploaded in full; previous contents are discarded.
    /// When reallocation fails the buffer keeps its previous capacity and contents.
    pub fn set_capacity<G: GraphicsInvoker>(&mut self, gl: &mut G, capacity: u32) -> Result<()> {
        if self.is_disposed() {
            return Err(BatchError::BufferDisposed { kind: P::KIND });
        }
        if capacity > MAX_CAPACITY {
            log::warn!("{} capacity {capacity} exceeds the limit of {MAX_CAPACITY}", P::KIND);
            return Err(BatchError::CapacityTooLarge {
                kind: P::KIND,
                requested: capacity,
                max: MAX_CAPACITY,
            });
        }

        let vertices = zeroed_vertices::<P>(capacity);

        let BufferState::Ready(handles) = self.state else {
            self.capacity = capacity;
            self.vertices = vertices;
            log::debug!("{} capacity set to {capacity} (allocation deferred)", P::KIND);
            return Ok(());
        };

        let indices = P::generate_indices(capacity);
        let previous = &self.vertices;

        let resized = gl.debug_scope(&format!("{} buffer resize", P::KIND), |gl| -> Result<()> {
            gl.bind_vao(handles.vao);
            gl.bind_vbo(handles.vbo);

            let res = upload(gl, BufferTarget::Vertex, &vertices).and_then(|()| {
                gl.bind_ebo(handles.ebo);
                let res = upload(gl, BufferTarget::Index, &indices);
                if res.is_err() {
                    // The old index buffer stays; put the matching vertex storage back.
                    if let Err(err) = upload(gl, BufferTarget::Vertex, previous) {
                        log::warn!("{} vertex storage could not be restored: {err}", P::KIND);
                    }
                }
                res
            });

            gl.unbind_vao();
            gl.unbind_vbo();
            gl.unbind_ebo();
            Ok(res?)
        });

        if let Err(err) = resized {
            log::warn!("{} resize to {capacity} failed: {err}", P::KIND);
            return Err(err);
        }

        self.capacity = capacity;
        self.vertices = vertices;
        log::debug!("{} buffer reallocated for {capacity} items", P::KIND);
        Ok(())
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Releases the GPU handles. Safe to call repeatedly.
    pub fn dispose<G: GraphicsInvoker>(&mut self, gl: &mut G) {
        if let BufferState::Ready(handles) = self.state {
            gl.debug_scope(&format!("{} buffer dispose", P::KIND), |gl| {
                gl.delete_buffer(handles.ebo);
                gl.delete_buffer(handles.vbo);
                gl.delete_vertex_array(handles.vao);
            });
            log::debug!("{} buffer disposed", P::KIND);
        }
        self.state = BufferState::Disposed;
    }

    fn ready_handles(&self) -> Result<GpuHandles> {
        match self.state {
            BufferState::Ready(h) => Ok(h),
            BufferState::Pending => {
                log::warn!("{} buffer used before the graphics context was ready", P::KIND);
                Err(BatchError::BufferNotInitialized { kind: P::KIND })
            }
            BufferState::Disposed => Err(BatchError::BufferDisposed { kind: P::KIND }),
        }
    }
}

fn upload<G: GraphicsInvoker, T: Pod>(
    gl: &mut G,
    target: BufferTarget,
    data: &[T],
) -> std::result::Result<(), InvokerError> {
    gl.buffer_data(target, bytemuck::cast_slice(data), BufferUsage::DynamicDraw)
}

fn zeroed_vertices<P: Primitive>(capacity: u32) -> Vec<P::Vertex> {
    vec![P::Vertex::zeroed(); capacity as usize * VERTICES_PER_ITEM]
}
