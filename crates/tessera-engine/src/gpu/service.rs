use super::{BufferId, BufferTarget, GraphicsInvoker, VertexArrayId};

/// Debug-scope and bind/unbind helpers available on every invoker.
pub trait GpuService: GraphicsInvoker {
    /// Runs `f` inside a labeled debug group.
    ///
    /// The group is popped after `f` returns, whether it produced an error or not.
    fn debug_scope<T>(&mut self, label: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        self.push_debug_group(label);
        let out = f(self);
        self.pop_debug_group();
        out
    }

    fn bind_vao(&mut self, vao: VertexArrayId) {
        self.bind_vertex_array(Some(vao));
    }

    fn unbind_vao(&mut self) {
        self.bind_vertex_array(None);
    }

    fn bind_vbo(&mut self, vbo: BufferId) {
        self.bind_buffer(BufferTarget::Vertex, Some(vbo));
    }

    fn unbind_vbo(&mut self) {
        self.bind_buffer(BufferTarget::Vertex, None);
    }

    fn bind_ebo(&mut self, ebo: BufferId) {
        self.bind_buffer(BufferTarget::Index, Some(ebo));
    }

    fn unbind_ebo(&mut self) {
        self.bind_buffer(BufferTarget::Index, None);
    }
}

impl<G: GraphicsInvoker + ?Sized> GpuService for G {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvokerError;
    use crate::gpu::{BufferUsage, GlCall, RecordingInvoker};

    #[test]
    fn scope_closes_after_failure() {
        let mut gl = RecordingInvoker::new();
        let res: Result<(), InvokerError> = gl.debug_scope("failing upload", |gl| {
            // Nothing is bound, so the recorder rejects the upload.
            gl.buffer_data(BufferTarget::Vertex, &[0; 4], BufferUsage::DynamicDraw)
        });

        assert!(res.is_err());
        assert_eq!(gl.open_debug_groups(), 0);
        assert_eq!(gl.calls().last(), Some(&GlCall::PopDebugGroup));
    }
}
