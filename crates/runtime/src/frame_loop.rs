use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::frame::Frame;

type Callback = Box<dyn FnMut(Frame)>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
    ticking: bool,
    /// Ids released while a tick had the callbacks checked out.
    released: Vec<SubscriptionId>,
}

impl Registry {
    /// Unregister `id`, handing back the callback so it is dropped after the
    /// registry borrow ends (a callback may own other subscriptions).
    fn release(&mut self, id: SubscriptionId) -> Option<Callback> {
        if self.ticking {
            self.released.push(id);
        }
        let pos = self.callbacks.iter().position(|(cid, _)| *cid == id)?;
        Some(self.callbacks.remove(pos).1)
    }
}

/// Per-frame callback driver.
///
/// Callbacks run once per [`FrameLoop::tick`] in registration order. Each
/// registration is owned by a [`Subscription`]; dropping it (or passing it to
/// [`FrameLoop::stop`]) unregisters the callback. Starting or stopping
/// subscriptions from inside a callback is allowed: a stopped callback never
/// runs again, and a newly started one first runs on the next tick.
///
/// The loop is single-threaded by construction (`!Send`).
#[derive(Default)]
pub struct FrameLoop {
    registry: Rc<RefCell<Registry>>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, callback: impl FnMut(Frame) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id = registry.next_id.wrapping_add(1);
        registry.callbacks.push((id, Box::new(callback)));
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn stop(&self, subscription: Subscription) {
        drop(subscription);
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().callbacks.len()
    }

    /// Run every registered callback for `frame`.
    pub fn tick(&self, frame: Frame) {
        // Check the callbacks out so they can borrow the registry themselves.
        let mut running = {
            let mut registry = self.registry.borrow_mut();
            registry.ticking = true;
            std::mem::take(&mut registry.callbacks)
        };

        for (id, callback) in &mut running {
            let released = self.registry.borrow().released.contains(id);
            if !released {
                callback(frame);
            }
        }

        let dropped = {
            let mut registry = self.registry.borrow_mut();
            registry.ticking = false;
            let released = std::mem::take(&mut registry.released);
            let (mut kept, dropped): (Vec<_>, Vec<_>) = running
                .into_iter()
                .partition(|(id, _)| !released.contains(id));
            // Anything registered during the tick goes after the existing callbacks.
            kept.append(&mut registry.callbacks);
            registry.callbacks = kept;
            dropped
        };
        drop(dropped);
    }
}

/// Handle for a registered frame callback. Releases the callback on drop.
#[must_use = "dropping a Subscription immediately unregisters its callback"]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let registry = registry.borrow();
        if registry.released.contains(&self.id) {
            return false;
        }
        // During a tick the callbacks are checked out, so "not released" means active.
        registry.ticking || registry.callbacks.iter().any(|(id, _)| *id == self.id)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let callback = registry.borrow_mut().release(self.id);
            drop(callback);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
