//! Synchronous notification bus.
//!
//! Notifications are queued and delivered on the calling thread by the owner
//! of the bus (see [`RenderHub`](crate::RenderHub)). Components that react to a
//! notification may publish more; those are delivered after the current one
//! has reached every listener, so a signal is never observed half-delivered.

use std::collections::VecDeque;

use crate::batch::BatchKind;

/// Everything that travels over the bus.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Notification {
    /// The graphics context exists; GPU objects may be created. Sent once.
    GraphicsContextReady,
    /// New capacity for the buffer of `kind`.
    BatchCapacityChanged { kind: BatchKind, size: u32 },
    /// The drawable area changed size (pixels).
    ViewportResized { width: u32, height: u32 },
    FrameBegan,
    FrameEnded,
}

impl Notification {
    pub fn channel(&self) -> Channel {
        match self {
            Notification::GraphicsContextReady => Channel::ContextReady,
            Notification::BatchCapacityChanged { .. } => Channel::BatchCapacity,
            Notification::ViewportResized { .. } => Channel::Viewport,
            Notification::FrameBegan | Notification::FrameEnded => Channel::Frame,
        }
    }
}

/// Typed channel a subscriber can restrict itself to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Channel {
    ContextReady,
    BatchCapacity,
    Viewport,
    Frame,
}

/// Handle returned by [`NotificationBus::subscribe`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    /// `None` receives every channel.
    channel: Option<Channel>,
    callback: Box<dyn FnMut(&Notification)>,
}

/// FIFO of pending notifications plus external subscribers.
#[derive(Default)]
pub struct NotificationBus {
    queue: VecDeque<Notification>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `n` for delivery.
    pub fn push(&mut self, n: Notification) {
        self.queue.push_back(n);
    }

    /// Next pending notification.
    pub fn pop(&mut self) -> Option<Notification> {
        self.queue.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Subscribes to every channel.
    pub fn subscribe(&mut self, callback: impl FnMut(&Notification) + 'static) -> SubscriptionId {
        self.add(None, Box::new(callback))
    }

    /// Subscribes to one channel.
    pub fn subscribe_to(
        &mut self,
        channel: Channel,
        callback: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionId {
        self.add(Some(channel), Box::new(callback))
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Calls every subscriber listening on `n`'s channel, in subscription order.
    pub fn deliver(&mut self, n: &Notification) {
        let channel = n.channel();
        for sub in &mut self.subscribers {
            if sub.channel.is_none_or(|c| c == channel) {
                (sub.callback)(n);
            }
        }
    }

    fn add(
        &mut self,
        channel: Option<Channel>,
        callback: Box<dyn FnMut(&Notification)>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber { id, channel, callback });
        id
    }
}
