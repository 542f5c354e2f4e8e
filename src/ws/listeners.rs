//! Keyed listener registry with idempotent unsubscribe tokens.
//!
//! Handlers are stored per key and invoked from a snapshot taken under the
//! lock, so a handler may register or unregister listeners (including
//! itself) while being dispatched. A panicking handler is contained and
//! logged; the remaining handlers for the same event still run.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// A registered callback.
pub type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Identifies one registration. Unique per registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Deregistration token returned by every `on*` registration.
///
/// [`Subscription::unsubscribe`] removes exactly the registration that
/// produced it and may be called any number of times. Dropping the token
/// does not unregister; registrations live until explicitly removed.
#[derive(Clone)]
pub struct Subscription {
    id: HandlerId,
    remove: Arc<dyn Fn() + Send + Sync>,
}

impl Subscription {
    /// The id of the registration this token controls.
    #[must_use]
    pub const fn id(&self) -> HandlerId {
        self.id
    }

    /// Removes the registration. Later calls are no-ops.
    pub fn unsubscribe(&self) {
        (self.remove)();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

type Slots<K, T> = HashMap<K, Vec<(HandlerId, Handler<T>)>>;

/// Listener storage keyed by `K`, delivering `&T` to each handler.
pub struct ListenerRegistry<K, T> {
    next_id: AtomicU64,
    slots: Mutex<Slots<K, T>>,
}

impl<K, T> ListenerRegistry<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    T: 'static,
{
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, Slots<K, T>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `handler` under `key` and returns its id.
    pub fn add(&self, key: K, handler: Handler<T>) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.slots().entry(key).or_default().push((id, handler));
        id
    }

    /// Registers `handler` and returns a token bound to this registry.
    pub fn subscribe(self: &Arc<Self>, key: K, handler: Handler<T>) -> Subscription {
        let id = self.add(key.clone(), handler);
        let registry: Weak<Self> = Arc::downgrade(self);
        Subscription {
            id,
            remove: Arc::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.remove(&key, id);
                }
            }),
        }
    }

    /// Removes one registration. Returns `false` if it was already gone.
    pub fn remove(&self, key: &K, id: HandlerId) -> bool {
        let mut slots = self.slots();
        let Some(handlers) = slots.get_mut(key) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(hid, _)| *hid != id);
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            slots.remove(key);
        }
        removed
    }

    /// Removes every registration under `key`, or all registrations.
    pub fn clear(&self, key: Option<&K>) {
        let mut slots = self.slots();
        match key {
            Some(key) => {
                slots.remove(key);
            }
            None => slots.clear(),
        }
    }

    /// Number of handlers registered under `key`.
    #[must_use]
    pub fn count(&self, key: &K) -> usize {
        self.slots().get(key).map_or(0, Vec::len)
    }

    /// Invokes every handler registered under `key` with `event`, in
    /// registration order. Returns how many handlers ran to completion.
    pub fn dispatch(&self, key: &K, event: &T) -> usize {
        let handlers: Vec<(HandlerId, Handler<T>)> = match self.slots().get(key) {
            Some(list) => list
                .iter()
                .map(|(id, h)| (*id, Arc::clone(h)))
                .collect(),
            None => return 0,
        };

        let mut completed = 0;
        for (id, handler) in handlers {
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(()) => completed += 1,
                Err(panic) => {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "non-string panic payload".to_string());
                    tracing::error!(?key, handler = %id, %reason, "listener panicked");
                }
            }
        }
        completed
    }
}

impl<K, T> Default for ListenerRegistry<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    T: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, T> fmt::Debug for ListenerRegistry<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let counts: Vec<(&K, usize)> = slots.iter().map(|(k, v)| (k, v.len())).collect();
        f.debug_struct("ListenerRegistry")
            .field("handlers", &counts)
            .finish()
    }
}
