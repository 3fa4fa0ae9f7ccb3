use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::{Computation, ComputationId, CurrentComputation, Tracker, scheduler};

/// A unique identifier for a dependency that cannot be forged.
/// Derived from the address of the shared state, like a broadcast id.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DependencyId(usize);

impl std::fmt::Display for DependencyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "d{:x}", self.0) }
}

/// A handle that accumulates interested computations via [`depend`](Self::depend)
/// and invalidates all of them via [`changed`](Self::changed).
///
/// Cloning a `Dependency` shares the same set of dependents.
#[derive(Clone, Default)]
pub struct Dependency(Arc<Inner>);

#[derive(Default)]
struct Inner {
    dependents: Mutex<BTreeMap<ComputationId, Computation>>,
    generation: AtomicU64,
}

impl Dependency {
    pub fn new() -> Self { Self::default() }

    pub fn id(&self) -> DependencyId { DependencyId(Arc::as_ptr(&self.0) as usize) }

    /// Registers the current computation, if any. Returns whether one was active.
    pub fn depend(&self) -> bool { self.depend_in(&CurrentComputation) }

    /// Registers the computation that `tracker` reports as current, if any
    pub fn depend_in(&self, tracker: &dyn Tracker) -> bool {
        match tracker.current() {
            Some(computation) => {
                self.register(&computation);
                true
            }
            None => false,
        }
    }

    /// Registers `computation` until its next invalidation. Returns false if it was already registered.
    pub fn register(&self, computation: &Computation) -> bool {
        let id = computation.id();
        {
            let mut dependents = self.0.dependents.lock().expect("dependents lock is poisoned");
            if dependents.contains_key(&id) {
                return false;
            }
            dependents.insert(id, computation.clone());
        }
        trace!("{} depends on {}", id, self.id());

        let weak = Arc::downgrade(&self.0);
        computation.on_invalidate(move |_| {
            if let Some(inner) = weak.upgrade() {
                let _removed = inner.dependents.lock().expect("dependents lock is poisoned").remove(&id);
            }
        });
        true
    }

    /// Invalidates every computation registered since the last change
    pub fn changed(&self) {
        self.0.generation.fetch_add(1, Ordering::AcqRel);
        // Clone the dependents to avoid holding the lock while invalidating
        let dependents: Vec<Computation> =
            self.0.dependents.lock().expect("dependents lock is poisoned").values().cloned().collect();
        trace!("{} changed, invalidating {} computations", self.id(), dependents.len());

        scheduler::batch(|| {
            for computation in dependents {
                computation.invalidate();
            }
        });
    }

    pub fn has_dependents(&self) -> bool { !self.0.dependents.lock().expect("dependents lock is poisoned").is_empty() }

    /// Number of times [`changed`](Self::changed) has been called
    pub fn generation(&self) -> u64 { self.0.generation.load(Ordering::Acquire) }
}

impl std::fmt::Debug for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dependency")
            .field("id", &self.id())
            .field("dependents", &self.0.dependents.lock().expect("dependents lock is poisoned").len())
            .field("generation", &self.generation())
            .finish()
    }
}
