use std::sync::{Arc, RwLock};

use crate::property::Properties;
use crate::{Object, Observable};

/// A key/value object without the observable capability.
/// Mutations are applied silently, so reactive bindings refuse it.
pub struct PlainMap<V>(Arc<RwLock<Properties<V>>>);

impl<V> Clone for PlainMap<V> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<V> PartialEq for PlainMap<V> {
    fn eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl<V: Clone> Default for PlainMap<V> {
    fn default() -> Self { Self::new() }
}

impl<V: Clone> PlainMap<V> {
    pub fn new() -> Self { Self(Arc::new(RwLock::new(Properties::default()))) }

    fn with<R>(&self, f: impl FnOnce(&Properties<V>) -> R) -> R { f(&*self.0.read().expect("properties lock is poisoned")) }

    fn with_mut<R>(&self, f: impl FnOnce(&mut Properties<V>) -> R) -> R { f(&mut *self.0.write().expect("properties lock is poisoned")) }
}

impl<V: Clone + Send + Sync + 'static> Object for PlainMap<V> {
    type Value = V;

    fn get(&self, key: &str) -> Option<V> { self.with(|p| p.get(key)) }

    fn get_own(&self, key: &str) -> Option<V> { self.with(|p| p.get(key)) }

    fn has_own(&self, key: &str) -> bool { self.with(|p| p.contains(key)) }

    fn keys(&self) -> Vec<String> { self.with(|p| p.keys()) }

    fn values(&self) -> Vec<V> { self.with(|p| p.values()) }

    fn entries(&self) -> Vec<(String, V)> { self.with(|p| p.entries()) }

    fn insert(&self, key: String, value: V) { self.with_mut(|p| p.assign(key, value)); }

    fn remove(&self, key: &str) -> Option<V> { self.with_mut(|p| p.remove(key)) }

    fn observable(&self) -> Option<&dyn Observable<V>> { None }
}

impl<K, V> FromIterator<(K, V)> for PlainMap<V>
where
    K: Into<String>,
    V: Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = Self::new();
        map.with_mut(|properties| {
            for (key, value) in iter {
                properties.assign(key.into(), value);
            }
        });
        map
    }
}

impl<V: std::fmt::Debug + Clone> std::fmt::Debug for PlainMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlainMap").field("entries", &self.with(|p| p.entries())).finish()
    }
}
