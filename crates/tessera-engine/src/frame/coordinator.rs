use crate::batch::BatchKind;
use crate::bus::{Notification, NotificationBus};
use crate::config::BatchConfig;
use crate::error::{BatchError, Result};
use crate::gpu::{BlendFunc, GraphicsInvoker};
use crate::paint::Color;

use super::CachedValue;

/// Gates and sequences render frames.
///
/// Nothing touches GPU state before [`on_context_ready`](Self::on_context_ready).
/// Until then `begin`, `clear` and `end` fail with
/// [`BatchError::RendererNotInitialized`] and the clear color is buffered.
#[derive(Debug)]
pub struct FrameCoordinator {
    ready: bool,
    in_frame: bool,
    /// Initial capacities, taken exactly once on context-ready.
    capacity_push: Option<BatchConfig>,
    clear_color: CachedValue<Color>,
}

impl FrameCoordinator {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            ready: false,
            in_frame: false,
            capacity_push: Some(config),
            clear_color: CachedValue::new(Color::TRANSPARENT),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    /// One-time GPU setup.
    ///
    /// Enables alpha blending, queues one capacity notification per kind and
    /// flushes a buffered clear color. Repeat deliveries are ignored.
    pub fn on_context_ready<G: GraphicsInvoker>(&mut self, gl: &mut G, bus: &mut NotificationBus) {
        if self.ready {
            log::debug!("context-ready delivered again; ignored");
            return;
        }
        self.ready = true;

        gl.enable_blend(BlendFunc::ALPHA);

        if let Some(config) = self.capacity_push.take() {
            for kind in BatchKind::ALL {
                bus.push(Notification::BatchCapacityChanged { kind, size: config.capacity(kind) });
            }
        }

        self.clear_color.go_live(|c| gl.set_clear_color(c));
        log::debug!("frame coordinator ready");
    }

    /// Starts a frame and publishes [`Notification::FrameBegan`].
    pub fn begin(&mut self, bus: &mut NotificationBus) -> Result<()> {
        self.ensure_ready("begin")?;
        if self.in_frame {
            log::debug!("begin called while a frame is open");
        }
        self.in_frame = true;
        bus.push(Notification::FrameBegan);
        Ok(())
    }

    /// Clears the color buffer with the current clear color.
    pub fn clear<G: GraphicsInvoker>(&mut self, gl: &mut G) -> Result<()> {
        self.ensure_ready("clear")?;
        gl.clear_color_buffer();
        Ok(())
    }

    /// Ends the frame and publishes [`Notification::FrameEnded`].
    pub fn end(&mut self, bus: &mut NotificationBus) -> Result<()> {
        self.ensure_ready("end")?;
        self.in_frame = false;
        bus.push(Notification::FrameEnded);
        Ok(())
    }

    pub fn clear_color<G: GraphicsInvoker>(&self, gl: &G) -> Color {
        self.clear_color.get(|| gl.clear_color())
    }

    pub fn set_clear_color<G: GraphicsInvoker>(&mut self, gl: &mut G, color: Color) {
        self.clear_color.set(color, |c| gl.set_clear_color(c));
    }

    fn ensure_ready(&self, op: &str) -> Result<()> {
        if self.ready {
            Ok(())
        } else {
            log::warn!("frame {op} before the graphics context was ready");
            Err(BatchError::RendererNotInitialized)
        }
    }
}
