use std::sync::{Arc, RwLock, RwLockReadGuard};

use tracing::trace;

use crate::property::Properties;
use crate::{Broadcast, Change, Listener, Object, Observable};

/// An observable key/value object.
///
/// Every mutation made through its API is reported to subscribed listeners
/// after it has been applied. Lookups that miss an own property fall back to
/// the optional prototype. Cloning an `ObservableMap` yields another handle to
/// the same object; equality is handle identity.
pub struct ObservableMap<V>(Arc<Inner<V>>);

struct Inner<V> {
    properties: RwLock<Properties<V>>,
    prototype: Option<ObservableMap<V>>,
    broadcast: Broadcast<V>,
}

impl<V> Clone for ObservableMap<V> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<V> PartialEq for ObservableMap<V> {
    fn eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl<V> Eq for ObservableMap<V> {}

impl<V: Clone + Send + Sync + 'static> Default for ObservableMap<V> {
    fn default() -> Self { Self::new() }
}

impl<V: Clone + Send + Sync + 'static> ObservableMap<V> {
    pub fn new() -> Self { Self::build(None) }

    /// Creates an empty object that inherits lookups from `prototype`
    pub fn with_prototype(prototype: ObservableMap<V>) -> Self { Self::build(Some(prototype)) }

    fn build(prototype: Option<ObservableMap<V>>) -> Self {
        Self(Arc::new(Inner { properties: RwLock::new(Properties::default()), prototype, broadcast: Broadcast::new() }))
    }

    pub fn prototype(&self) -> Option<&ObservableMap<V>> { self.0.prototype.as_ref() }

    pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }

    /// Defines an own property with an explicit enumerable flag.
    /// Non-enumerable properties are own properties but are left out of `keys`, `values` and `entries`.
    pub fn define(&self, key: impl Into<String>, value: V, enumerable: bool) {
        let key = key.into();
        let previous = self.write().define(key.clone(), value.clone(), enumerable);
        self.emit(match previous {
            Some(old) => Change::updated(key, old, value),
            None => Change::added(key, value),
        });
    }

    fn read(&self) -> RwLockReadGuard<'_, Properties<V>> { self.0.properties.read().expect("properties lock is poisoned") }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Properties<V>> { self.0.properties.write().expect("properties lock is poisoned") }

    // Callers must have released the properties lock
    fn emit(&self, change: Change<V>) {
        trace!("map {:p} changed {:?}", Arc::as_ptr(&self.0), change.key);
        self.0.broadcast.send(&change);
    }
}

impl<V: Clone + Send + Sync + 'static> Object for ObservableMap<V> {
    type Value = V;

    fn get(&self, key: &str) -> Option<V> {
        match self.read().get(key) {
            Some(value) => Some(value),
            None => self.0.prototype.as_ref().and_then(|prototype| prototype.get(key)),
        }
    }

    fn get_own(&self, key: &str) -> Option<V> { self.read().get(key) }

    fn has_own(&self, key: &str) -> bool { self.read().contains(key) }

    fn keys(&self) -> Vec<String> { self.read().keys() }

    fn values(&self) -> Vec<V> { self.read().values() }

    fn entries(&self) -> Vec<(String, V)> { self.read().entries() }

    fn len(&self) -> usize { self.read().len() }

    fn insert(&self, key: String, value: V) {
        let previous = self.write().assign(key.clone(), value.clone());
        self.emit(match previous {
            Some(old) => Change::updated(key, old, value),
            None => Change::added(key, value),
        });
    }

    fn remove(&self, key: &str) -> Option<V> {
        let removed = self.write().remove(key);
        if let Some(value) = &removed {
            self.emit(Change::removed(key, value.clone()));
        }
        removed
    }

    fn observable(&self) -> Option<&dyn Observable<V>> { Some(self) }
}

impl<V: Clone + Send + Sync + 'static> Observable<V> for ObservableMap<V> {
    fn subscribe(&self, listener: &Listener<V>) { self.0.broadcast.subscribe(listener); }

    fn unsubscribe(&self, listener: &Listener<V>) { self.0.broadcast.unsubscribe(listener); }

    fn listener_count(&self) -> usize { self.0.broadcast.len() }
}

impl<K, V> FromIterator<(K, V)> for ObservableMap<V>
where
    K: Into<String>,
    V: Clone + Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = Self::new();
        {
            let mut properties = map.write();
            for (key, value) in iter {
                properties.assign(key.into(), value);
            }
        }
        map
    }
}

impl<V: std::fmt::Debug + Clone> std::fmt::Debug for ObservableMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let properties = self.0.properties.read().expect("properties lock is poisoned");
        f.debug_struct("ObservableMap")
            .field("entries", &properties.entries())
            .field("listeners", &self.0.broadcast.len())
            .field("prototype", &self.0.prototype.is_some())
            .finish()
    }
}
