//! Clip bus implementation
//!
//! A directory from clip key to at most one registered handler. This is
//! deliberately not a broadcast mechanism: exactly one on-screen element
//! represents a given clip at a time, so a single-slot map is sufficient,
//! and overwrite-on-register resolves re-mount races to the newest element.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::key::ClipKey;
use super::update::ClipUpdate;

/// Handler invoked for every update published to a key
///
/// Handlers run synchronously under the bus lock, so delivery for a key is
/// strictly ordered and never races an unregister. A handler must not call
/// back into the bus.
pub type Handler = Box<dyn FnMut(ClipUpdate) + Send>;

struct Slot {
    /// Registration token, for stale-release detection
    token: u64,
    handler: Handler,
}

/// Directory of per-clip handlers
///
/// All operations are atomic at the granularity of one call. Register
/// always succeeds and silently replaces any previous handler for the key;
/// publish to an unregistered key is a silent drop, never an error or a
/// queue.
pub struct ClipBus {
    slots: Mutex<HashMap<ClipKey, Slot>>,
    next_token: AtomicU64,
}

impl ClipBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(1),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<ClipKey, Slot>> {
        // Recover the map if a handler panicked mid-publish; the remaining
        // registrations are still consistent.
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a handler for a key, replacing any existing one
    pub fn register(&self, key: ClipKey, handler: Handler) -> u64 {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let slot = Slot { token, handler };

        let replaced = self.slots().insert(key.clone(), slot).is_some();
        if replaced {
            tracing::debug!(key = %key, token = token, "Handler replaced");
        } else {
            tracing::debug!(key = %key, token = token, "Handler registered");
        }

        token
    }

    /// Remove the handler for a key, if any
    pub fn unregister(&self, key: &ClipKey) {
        if self.slots().remove(key).is_some() {
            tracing::debug!(key = %key, "Handler unregistered");
        }
    }

    /// Deliver an update to the handler registered for a key
    ///
    /// Silently drops the update if no handler is registered.
    pub fn publish(&self, key: &ClipKey, update: ClipUpdate) {
        let mut slots = self.slots();

        match slots.get_mut(key) {
            Some(slot) => (slot.handler)(update),
            None => {
                tracing::trace!(key = %key, "No handler for key, update dropped");
            }
        }
    }

    /// Register a handler and return a guard that unregisters on drop
    ///
    /// The guard releases only its own registration: if the key has since
    /// been re-registered by a newer element, dropping the stale guard
    /// leaves the newer handler in place.
    pub fn subscribe(self: &Arc<Self>, key: ClipKey, handler: Handler) -> Subscription {
        let token = self.register(key.clone(), handler);
        Subscription {
            bus: Arc::clone(self),
            key,
            token,
        }
    }

    /// Remove the handler for a key only if it still belongs to `token`
    fn release(&self, key: &ClipKey, token: u64) {
        let mut slots = self.slots();

        match slots.get(key) {
            Some(slot) if slot.token == token => {
                slots.remove(key);
                tracing::debug!(key = %key, token = token, "Subscription released");
            }
            Some(slot) => {
                // The key was re-registered after this guard was created.
                tracing::debug!(
                    key = %key,
                    stale = token,
                    current = slot.token,
                    "Stale subscription release ignored"
                );
            }
            None => {}
        }
    }

    /// Whether any handler is registered for the key
    pub fn is_registered(&self, key: &ClipKey) -> bool {
        self.slots().contains_key(key)
    }

    /// Number of currently registered handlers
    pub fn handler_count(&self) -> usize {
        self.slots().len()
    }
}

impl Default for ClipBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped handler registration
///
/// Holds one registration on the bus and releases it when dropped, so a
/// handler can never outlive the element that owns it, on any exit path.
pub struct Subscription {
    bus: Arc<ClipBus>,
    key: ClipKey,
    token: u64,
}

impl Subscription {
    /// The key this subscription is registered under
    pub fn key(&self) -> &ClipKey {
        &self.key
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.release(&self.key, self.token);
    }
}
