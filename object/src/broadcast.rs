use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use tracing::trace;

use crate::Change;

/// A change listener. Its identity is the address of the `Arc`, so the same
/// listener that was subscribed is the one that unsubscribes.
pub type Listener<V> = Arc<dyn Fn(&Change<V>) + Send + Sync + 'static>;

/// Wraps a closure as a [`Listener`]
pub fn listener<V, F>(f: F) -> Listener<V>
where F: Fn(&Change<V>) + Send + Sync + 'static {
    Arc::new(f)
}

/// Identifies a listener by address. Can only be derived from a listener and used for comparison.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListenerId(usize);

impl ListenerId {
    pub fn of<V>(listener: &Listener<V>) -> Self { ListenerId(Arc::as_ptr(listener) as *const () as usize) }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "l{:x}", self.0) }
}

/// Trait for types that can be converted into change listeners
pub trait IntoListener<V> {
    fn into_listener(self) -> Listener<V>;
}

impl<V, F> IntoListener<V> for F
where F: Fn(&Change<V>) + Send + Sync + 'static
{
    fn into_listener(self) -> Listener<V> { Arc::new(self) }
}

impl<V> IntoListener<V> for std::sync::mpsc::Sender<Change<V>>
where V: Clone + Send + 'static
{
    fn into_listener(self) -> Listener<V> {
        let sender = std::sync::Mutex::new(self);
        Arc::new(move |change: &Change<V>| {
            let _ = sender.lock().expect("sender lock is poisoned").send(change.clone()); // Ignore send errors
        })
    }
}

#[cfg(feature = "tokio")]
impl<V> IntoListener<V> for tokio::sync::mpsc::UnboundedSender<Change<V>>
where V: Clone + Send + 'static
{
    fn into_listener(self) -> Listener<V> {
        Arc::new(move |change: &Change<V>| {
            let _ = self.send(change.clone()); // Ignore send errors
        })
    }
}

/// The set of listeners attached to one object.
/// Listeners are called synchronously, in subscription order.
pub struct Broadcast<V> {
    listeners: RwLock<IndexMap<ListenerId, Listener<V>>>,
}

impl<V> Default for Broadcast<V> {
    fn default() -> Self { Self::new() }
}

impl<V> std::fmt::Debug for Broadcast<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.debug_struct("Broadcast").field("listeners", &self.len()).finish() }
}

impl<V> Broadcast<V> {
    pub fn new() -> Self { Self { listeners: RwLock::new(IndexMap::new()) } }

    /// Adds a listener. Returns false if that exact listener was already attached.
    pub fn subscribe(&self, listener: &Listener<V>) -> bool {
        let id = ListenerId::of(listener);
        let mut listeners = self.listeners.write().expect("listeners lock is poisoned");
        if listeners.contains_key(&id) {
            return false;
        }
        listeners.insert(id, listener.clone());
        trace!("listener {} subscribed", id);
        true
    }

    /// Removes a listener. Unknown listeners are ignored.
    pub fn unsubscribe(&self, listener: &Listener<V>) -> bool {
        let id = ListenerId::of(listener);
        let removed = self.listeners.write().expect("listeners lock is poisoned").shift_remove(&id);
        if removed.is_some() {
            trace!("listener {} unsubscribed", id);
        }
        removed.is_some()
    }

    pub fn contains(&self, listener: &Listener<V>) -> bool {
        self.listeners.read().expect("listeners lock is poisoned").contains_key(&ListenerId::of(listener))
    }

    pub fn len(&self) -> usize { self.listeners.read().expect("listeners lock is poisoned").len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Sends a change to every listener
    pub fn send(&self, change: &Change<V>) {
        // Clone the listeners to avoid holding the lock during callback execution
        let listeners: Vec<Listener<V>> = self.listeners.read().expect("listeners lock is poisoned").values().cloned().collect();
        trace!("sending change of {:?} to {} listeners", change.key, listeners.len());
        for listener in listeners {
            listener(change);
        }
    }
}
