use std::sync::Arc;

use crate::{Computation, CurrentComputation};

/// Source of the "current computation" that reads register against.
///
/// Data sources hold an `Arc<dyn Tracker>` instead of consulting ambient state,
/// so tests and embedders can substitute their own context.
pub trait Tracker: Send + Sync {
    /// The computation that reads should register, if any
    fn current(&self) -> Option<Computation>;

    /// Whether a computation is currently running
    fn active(&self) -> bool { self.current().is_some() }
}

impl Tracker for CurrentComputation {
    fn current(&self) -> Option<Computation> { CurrentComputation::current() }

    fn active(&self) -> bool { CurrentComputation::active() }
}

/// The default tracker, backed by the [`CurrentComputation`] stack
pub fn ambient() -> Arc<dyn Tracker> { Arc::new(CurrentComputation) }
