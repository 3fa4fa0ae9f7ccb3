use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use reactive_object::{Change, Listener, Object};
use reactive_tracker::{Dependency, Tracker, ambient};
use tracing::{debug, trace};

use crate::error::{BindingError, Result};

/// Presents one observable key/value object as a single reactive unit.
///
/// Reads (`get`, `has`, `keys`, ...) register the binding's [`Dependency`] with
/// the active computation. Mutations made through the binding, rebinding, and
/// changes the object reports on its own each invalidate that dependency exactly
/// once, after the change has been applied.
///
/// The binding only owns its subscription to the object. It is released by
/// [`close`](Self::close) or when the binding is dropped.
pub struct ReactiveBinding<O: Object> {
    object: RwLock<Option<O>>,
    listener: Listener<O::Value>,
    dependency: Dependency,
    tracker: Arc<dyn Tracker>,
    // number of writes the binding is applying itself; their echoes are not counted twice
    writing: Arc<AtomicUsize>,
    closed: AtomicBool,
}

impl<O: Object> ReactiveBinding<O> {
    /// Creates an unbound binding tracked by the current computation stack
    pub fn new() -> Self { Self::with_tracker(ambient()) }

    /// Creates an unbound binding whose reads register with `tracker`
    pub fn with_tracker(tracker: Arc<dyn Tracker>) -> Self {
        let dependency = Dependency::new();
        let writing = Arc::new(AtomicUsize::new(0));
        let listener: Listener<O::Value> = {
            let dependency = dependency.clone();
            let writing = writing.clone();
            Arc::new(move |change: &Change<O::Value>| {
                if writing.load(Ordering::Acquire) > 0 {
                    return;
                }
                trace!("bound object changed {:?}", change.key);
                dependency.changed();
            })
        };
        Self { object: RwLock::new(None), listener, dependency, tracker, writing, closed: AtomicBool::new(false) }
    }

    /// Creates a binding over `object`. Fails with [`BindingError::NotObservable`]
    /// if the object cannot report its mutations.
    pub fn with_object(object: O) -> Result<Self> { Self::builder().object(object).build() }

    pub fn builder() -> BindingBuilder<O> { BindingBuilder { tracker: None, object: None } }

    /// The dependency every read registers and every change invalidates
    pub fn dependency(&self) -> &Dependency { &self.dependency }

    /// Whether an object is bound. Not tracked.
    pub fn is_bound(&self) -> bool { self.current().is_some() }

    pub fn is_closed(&self) -> bool { self.closed.load(Ordering::Acquire) }

    /// The bound object, or `None` when unbound
    pub fn get_object(&self) -> Option<O> {
        self.depend();
        self.current()
    }

    /// The value of `key` on the bound object, inherited properties included.
    /// `None` when unbound or when the object has no such property.
    pub fn get(&self, key: &str) -> Option<O::Value> {
        self.depend();
        self.current().and_then(|object| object.get(key))
    }

    /// Whether `key` is an own property of the bound object
    pub fn has(&self, key: &str) -> bool {
        self.depend();
        self.current().is_some_and(|object| object.has_own(key))
    }

    /// Own enumerable keys of the bound object, empty when unbound
    pub fn keys(&self) -> Vec<String> {
        self.depend();
        self.current().map(|object| object.keys()).unwrap_or_default()
    }

    /// Values in the order of [`keys`](Self::keys), empty when unbound
    pub fn values(&self) -> Vec<O::Value> {
        self.depend();
        self.current().map(|object| object.values()).unwrap_or_default()
    }

    /// Key/value pairs in the order of [`keys`](Self::keys), empty when unbound
    pub fn entries(&self) -> Vec<(String, O::Value)> {
        self.depend();
        self.current().map(|object| object.entries()).unwrap_or_default()
    }

    /// Number of own enumerable properties, zero when unbound
    pub fn len(&self) -> usize {
        self.depend();
        self.current().map_or(0, |object| object.len())
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Replaces the bound object, or clears it with `None`.
    ///
    /// The listener moves from the previous object to the new one and the
    /// dependency is invalidated, even when the new object is the one already bound.
    pub fn bind(&self, object: Option<O>) -> Result<()> {
        if self.is_closed() {
            return Err(rejected(BindingError::Closed));
        }
        if object.as_ref().is_some_and(|object| object.observable().is_none()) {
            return Err(rejected(BindingError::NotObservable));
        }

        {
            let mut slot = self.object.write().expect("object lock is poisoned");
            if let Some(previous) = slot.take() {
                unsubscribe(&previous, &self.listener);
            }
            if let Some(next) = &object {
                if let Some(observable) = next.observable() {
                    observable.subscribe(&self.listener);
                }
            }
            *slot = object;
            debug!("binding {} {}", self.dependency.id(), if slot.is_some() { "bound" } else { "unbound" });
        }

        self.dependency.changed();
        Ok(())
    }

    /// Clears the bound object. Same as `bind(None)`.
    pub fn unbind(&self) -> Result<()> { self.bind(None) }

    /// Assigns `object[key] = value` and invalidates, whether or not the value changed
    pub fn set_property(&self, key: impl Into<String>, value: O::Value) -> Result<()> {
        if self.is_closed() {
            return Err(rejected(BindingError::Closed));
        }
        let Some(object) = self.current() else {
            return Err(rejected(BindingError::NoBoundObject));
        };

        let key = key.into();
        trace!("binding {} set {:?}", self.dependency.id(), key);
        {
            let _writing = Writing::enter(&self.writing);
            object.insert(key, value);
        }
        self.dependency.changed();
        Ok(())
    }

    /// Removes an own property of the bound object and invalidates.
    /// Does nothing when unbound or when `key` is absent or only inherited.
    pub fn delete(&self, key: &str) {
        if self.is_closed() {
            return;
        }
        let Some(object) = self.current() else {
            return;
        };
        if !object.has_own(key) {
            return;
        }

        trace!("binding {} delete {:?}", self.dependency.id(), key);
        {
            let _writing = Writing::enter(&self.writing);
            object.remove(key);
        }
        self.dependency.changed();
    }

    /// Detaches from the bound object and makes the binding inert.
    ///
    /// Reads afterwards return absent or empty results without registering,
    /// `bind` and `set_property` fail with [`BindingError::Closed`]. Invalidates
    /// once if an object was bound. Closing twice is a no-op.
    pub fn close(&self) {
        if self.detach() {
            self.dependency.changed();
        }
    }

    /// Returns whether an object was bound at the time of closing
    fn detach(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        let previous = self.object.write().expect("object lock is poisoned").take();
        debug!("binding {} closed", self.dependency.id());
        match previous {
            Some(previous) => {
                unsubscribe(&previous, &self.listener);
                true
            }
            None => false,
        }
    }

    fn current(&self) -> Option<O> { self.object.read().expect("object lock is poisoned").clone() }

    fn depend(&self) {
        if !self.is_closed() && self.tracker.active() {
            self.dependency.depend_in(self.tracker.as_ref());
        }
    }
}

impl<O: Object> Default for ReactiveBinding<O> {
    fn default() -> Self { Self::new() }
}

impl<O: Object> Drop for ReactiveBinding<O> {
    fn drop(&mut self) { self.detach(); }
}

impl<O: Object> std::fmt::Debug for ReactiveBinding<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveBinding")
            .field("bound", &self.is_bound())
            .field("closed", &self.is_closed())
            .field("dependency", &self.dependency)
            .finish()
    }
}

/// Builder for a [`ReactiveBinding`] with an injected tracker and/or an initial object
pub struct BindingBuilder<O: Object> {
    tracker: Option<Arc<dyn Tracker>>,
    object: Option<O>,
}

impl<O: Object> BindingBuilder<O> {
    pub fn tracker(mut self, tracker: Arc<dyn Tracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn object(mut self, object: O) -> Self {
        self.object = Some(object);
        self
    }

    pub fn build(self) -> Result<ReactiveBinding<O>> {
        let binding = match self.tracker {
            Some(tracker) => ReactiveBinding::with_tracker(tracker),
            None => ReactiveBinding::new(),
        };
        if let Some(object) = self.object {
            binding.bind(Some(object))?;
        }
        Ok(binding)
    }
}

fn unsubscribe<O: Object>(object: &O, listener: &Listener<O::Value>) {
    if let Some(observable) = object.observable() {
        observable.unsubscribe(listener);
    }
}

fn rejected(error: BindingError) -> BindingError {
    debug!("binding operation rejected: {}", error);
    error
}

/// Counts one in-flight write until dropped, also while unwinding
struct Writing<'a>(&'a AtomicUsize);

impl<'a> Writing<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::AcqRel);
        Self(count)
    }
}

impl Drop for Writing<'_> {
    fn drop(&mut self) { self.0.fetch_sub(1, Ordering::AcqRel); }
}
