//! Owner and dispatcher of the batching layer.

use crate::batch::{BatchBuffers, BatchKind, Primitive};
use crate::bus::{Channel, Notification, NotificationBus, SubscriptionId};
use crate::config::BatchConfig;
use crate::error::Result;
use crate::frame::FrameCoordinator;
use crate::gpu::GraphicsInvoker;
use crate::paint::Color;

/// Owns the invoker, the four batch buffers, the frame coordinator and the bus.
///
/// Startup is two-phase: [`new`](Self::new) registers every buffer without
/// touching the GPU, then [`context_ready`](Self::context_ready) delivers the
/// ready signal to all buffers before the coordinator reacts to it. The
/// coordinator's capacity pushes are therefore only seen by initialized
/// buffers.
///
/// Delivery order for each notification: buffers, coordinator, external
/// subscribers. Notifications published while handling one are queued and
/// delivered afterwards.
pub struct RenderHub<G: GraphicsInvoker> {
    gl: G,
    bus: NotificationBus,
    frame: FrameCoordinator,
    buffers: BatchBuffers,
}

impl<G: GraphicsInvoker> RenderHub<G> {
    pub fn new(gl: G, config: BatchConfig) -> Self {
        Self {
            gl,
            bus: NotificationBus::new(),
            buffers: BatchBuffers::new(&config),
            frame: FrameCoordinator::new(config),
        }
    }

    /// Signals that the graphics context exists.
    pub fn context_ready(&mut self) -> Result<()> {
        self.publish(Notification::GraphicsContextReady)
    }

    pub fn resize_viewport(&mut self, width: u32, height: u32) -> Result<()> {
        self.publish(Notification::ViewportResized { width, height })
    }

    pub fn set_batch_capacity(&mut self, kind: BatchKind, size: u32) -> Result<()> {
        self.publish(Notification::BatchCapacityChanged { kind, size })
    }

    /// Queues `n` and delivers everything pending.
    ///
    /// On error, delivery stops and notifications still queued are delivered by
    /// the next call.
    pub fn publish(&mut self, n: Notification) -> Result<()> {
        self.bus.push(n);
        self.pump()
    }

    pub fn begin(&mut self) -> Result<()> {
        self.frame.begin(&mut self.bus)?;
        self.pump()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.frame.clear(&mut self.gl)
    }

    pub fn end(&mut self) -> Result<()> {
        self.frame.end(&mut self.bus)?;
        self.pump()
    }

    /// Binds the vertex array of `P`'s buffer for drawing.
    pub fn prepare<P: Primitive>(&mut self) -> Result<()> {
        P::select(&mut self.buffers).prepare_for_upload(&mut self.gl)
    }

    /// Uploads one item into slot `index` of `P`'s buffer.
    pub fn upload<P: Primitive>(&mut self, item: &P::Item, index: u32) -> Result<()> {
        P::select(&mut self.buffers).upload_vertex_data(&mut self.gl, item, index)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&Notification) + 'static) -> SubscriptionId {
        self.bus.subscribe(callback)
    }

    pub fn subscribe_to(
        &mut self,
        channel: Channel,
        callback: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe_to(channel, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn clear_color(&self) -> Color {
        self.frame.clear_color(&self.gl)
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.frame.set_clear_color(&mut self.gl, color);
    }

    pub fn is_ready(&self) -> bool {
        self.frame.is_ready()
    }

    pub fn frame(&self) -> &FrameCoordinator {
        &self.frame
    }

    pub fn buffers(&self) -> &BatchBuffers {
        &self.buffers
    }

    pub fn invoker(&self) -> &G {
        &self.gl
    }

    pub fn invoker_mut(&mut self) -> &mut G {
        &mut self.gl
    }

    /// Releases every buffer's GPU handles. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.buffers.dispose(&mut self.gl);
    }

    fn pump(&mut self) -> Result<()> {
        while let Some(n) = self.bus.pop() {
            self.route(&n)?;
            self.bus.deliver(&n);
        }
        Ok(())
    }

    fn route(&mut self, n: &Notification) -> Result<()> {
        match n {
            Notification::GraphicsContextReady => {
                log::debug!("graphics context ready");
                self.buffers.on_notification(&mut self.gl, n)?;
                self.frame.on_context_ready(&mut self.gl, &mut self.bus);
            }
            Notification::BatchCapacityChanged { .. } | Notification::ViewportResized { .. } => {
                self.buffers.on_notification(&mut self.gl, n)?;
            }
            Notification::FrameBegan | Notification::FrameEnded => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::batch::{LineItem, Lines, ShapeItem, Shapes};
    use crate::coords::Vec2;
    use crate::error::BatchError;
    use crate::gpu::{GlCall, RecordingInvoker};

    fn hub() -> RenderHub<RecordingInvoker> {
        RenderHub::new(RecordingInvoker::new(), BatchConfig::uniform(16))
    }

    #[test]
    fn nothing_touches_the_gpu_before_ready() {
        let mut hub = hub();
        let item = ShapeItem::solid(Vec2::new(5.0, 5.0), Vec2::new(4.0, 4.0), Color::WHITE);

        assert_eq!(
            hub.upload::<Shapes>(&item, 0),
            Err(BatchError::BufferNotInitialized { kind: BatchKind::Shape })
        );
        assert_eq!(hub.begin(), Err(BatchError::RendererNotInitialized));
        hub.set_clear_color(Color::WHITE);
        hub.resize_viewport(640, 480).unwrap();

        assert!(hub.invoker().calls().is_empty());
    }

    #[test]
    fn ready_initializes_buffers_then_applies_configured_capacity() {
        let mut hub = hub();
        hub.context_ready().unwrap();

        assert!(hub.buffers().all_initialized());
        for kind in BatchKind::ALL {
            assert_eq!(hub.buffers().batch_size(kind), 16);
        }

        // Every buffer is set up before the first capacity push reallocates it.
        let calls = hub.invoker().calls();
        let last_setup = calls
            .iter()
            .rposition(|c| matches!(c, GlCall::PushDebugGroup(l) if l.ends_with("setup")))
            .unwrap();
        let first_resize = calls
            .iter()
            .position(|c| matches!(c, GlCall::PushDebugGroup(l) if l.ends_with("resize")))
            .unwrap();
        assert!(last_setup < first_resize);
    }

    #[test]
    fn buffers_start_at_configured_capacity() {
        let config = BatchConfig::uniform(16).with(BatchKind::Glyph, 64);
        let hub = RenderHub::new(RecordingInvoker::new(), config);

        assert_eq!(hub.buffers().batch_size(BatchKind::Shape), 16);
        assert_eq!(hub.buffers().batch_size(BatchKind::Glyph), 64);
        assert!(hub.invoker().calls().is_empty());
    }

    #[test]
    fn second_ready_is_harmless() {
        let mut hub = hub();
        hub.context_ready().unwrap();
        let calls = hub.invoker().calls().len();

        hub.context_ready().unwrap();
        assert_eq!(hub.invoker().calls().len(), calls);
    }

    #[test]
    fn frame_notifications_reach_subscribers() {
        let mut hub = hub();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        hub.subscribe_to(Channel::Frame, move |n| sink.borrow_mut().push(*n));

        hub.context_ready().unwrap();
        hub.begin().unwrap();
        hub.clear().unwrap();
        hub.end().unwrap();

        assert_eq!(*seen.borrow(), vec![Notification::FrameBegan, Notification::FrameEnded]);
    }

    #[test]
    fn viewport_feeds_encoding() {
        let mut hub = hub();
        hub.context_ready().unwrap();
        hub.resize_viewport(100, 100).unwrap();

        let item = LineItem::new(Vec2::new(0.0, 50.0), Vec2::new(100.0, 50.0), Color::WHITE, 0.0);
        hub.upload::<Lines>(&item, 0).unwrap();

        let data = hub.buffers().line.generate_data();
        // First vertex: (0, 50) → NDC (-1, 0).
        assert_eq!(&data[..2], &[-1.0, 0.0]);
    }

    #[test]
    fn dispose_releases_everything() {
        let mut hub = hub();
        hub.context_ready().unwrap();
        hub.dispose();
        hub.dispose();

        assert_eq!(hub.invoker().live_objects(), 0);
        assert_eq!(
            hub.prepare::<Lines>(),
            Err(BatchError::BufferDisposed { kind: BatchKind::Line })
        );
    }
}
