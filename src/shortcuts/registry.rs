//! Global key listener registry with scoped bindings.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

use super::keymap::{EditorCommand, Keymap};
use super::types::Keystroke;

/// Callback invoked with the command a keystroke maps to.
pub type CommandHandler = Arc<dyn Fn(EditorCommand) + Send + Sync>;

/// Unique identifier for a bound listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

struct Listener {
    keymap: Keymap,
    handler: CommandHandler,
}

#[derive(Default)]
struct RegistryInner {
    listeners: RwLock<HashMap<ListenerId, Listener>>,
    next_id: AtomicU64,
}

impl RegistryInner {
    fn remove(&self, id: ListenerId) -> bool {
        self.listeners.write().remove(&id).is_some()
    }
}

/// Dispatches key events to every bound listener.
///
/// Cloning the registry yields another handle to the same listener set.
#[derive(Clone, Default)]
pub struct ShortcutRegistry {
    inner: Arc<RegistryInner>,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a listener. It stays bound until the returned guard is dropped.
    #[must_use = "dropping the guard unbinds the listener immediately"]
    pub fn bind<F>(&self, keymap: Keymap, handler: F) -> ListenerGuard
    where
        F: Fn(EditorCommand) + Send + Sync + 'static,
    {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.inner.listeners.write().insert(
            id,
            Listener {
                keymap,
                handler: Arc::new(handler),
            },
        );
        debug!(listener = id.0, "bound key listener");

        ListenerGuard {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver a keystroke. Returns how many handlers ran.
    ///
    /// Handlers run after the listener lock is released, so a handler may
    /// bind or unbind listeners itself.
    pub fn dispatch(&self, keystroke: &Keystroke) -> usize {
        let matched: Vec<(EditorCommand, CommandHandler)> = {
            let listeners = self.inner.listeners.read();
            listeners
                .values()
                .filter_map(|l| {
                    l.keymap
                        .lookup(keystroke)
                        .map(|cmd| (cmd, Arc::clone(&l.handler)))
                })
                .collect()
        };

        trace!(%keystroke, handlers = matched.len(), "dispatching keystroke");

        for (command, handler) in &matched {
            handler(*command);
        }
        matched.len()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.read().len()
    }
}

/// Keeps a listener bound for as long as it is alive.
pub struct ListenerGuard {
    id: ListenerId,
    registry: Weak<RegistryInner>,
}

impl ListenerGuard {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Unbind now instead of at drop.
    pub fn release(self) {
        drop(self)
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            if inner.remove(self.id) {
                debug!(listener = self.id.0, "unbound key listener");
            }
        }
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}
