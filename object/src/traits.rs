use crate::Listener;

/// The capability to report mutations to listeners
pub trait Observable<V>: Send + Sync {
    /// Attaches a listener. Attaching the same listener twice has no further effect.
    fn subscribe(&self, listener: &Listener<V>);

    /// Detaches a listener. Detaching a listener that was never attached is a no-op.
    fn unsubscribe(&self, listener: &Listener<V>);

    fn listener_count(&self) -> usize;
}

/// A mutable key/value object with string keys.
///
/// Implementations are cheap handles: cloning one yields another handle to the
/// same underlying object, and mutation goes through `&self`.
pub trait Object: Clone + Send + Sync + 'static {
    type Value: Clone + Send + Sync + 'static;

    /// Looks up a property, falling back to inherited properties
    fn get(&self, key: &str) -> Option<Self::Value>;

    /// Looks up an own property only
    fn get_own(&self, key: &str) -> Option<Self::Value>;

    /// Whether `key` is an own property, enumerable or not
    fn has_own(&self, key: &str) -> bool;

    /// Own enumerable keys in enumeration order
    fn keys(&self) -> Vec<String>;

    /// Values of own enumerable properties, in the order of [`keys`](Self::keys)
    fn values(&self) -> Vec<Self::Value>;

    /// Own enumerable key/value pairs, in the order of [`keys`](Self::keys)
    fn entries(&self) -> Vec<(String, Self::Value)>;

    fn len(&self) -> usize { self.keys().len() }

    fn is_empty(&self) -> bool { self.len() == 0 }

    /// Assigns an own property
    fn insert(&self, key: String, value: Self::Value);

    /// Removes an own property, returning its value
    fn remove(&self, key: &str) -> Option<Self::Value>;

    /// The observable capability of this object, if it has one
    fn observable(&self) -> Option<&dyn Observable<Self::Value>>;
}

/// Whether `object` can report its mutations
pub fn is_observable<O: Object>(object: &O) -> bool { object.observable().is_some() }
