use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{trace, warn};

use crate::CurrentComputation;
use crate::scheduler::{self, DepthGuard};

/// A unique identifier for a computation, used for deduplication by dependencies
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ComputationId(usize);

impl std::fmt::Display for ComputationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "c{}", self.0) }
}

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

type InvalidateCallback = Box<dyn FnOnce(&Computation) + Send + 'static>;

/// A unit of re-computation. It runs its function once when created and again
/// after every invalidation, until it is stopped.
///
/// Cloning a `Computation` shares the same underlying state.
#[derive(Clone)]
pub struct Computation(Arc<Inner>);

struct Inner {
    id: ComputationId,
    func: Box<dyn Fn(&Computation) + Send + Sync>,
    state: Mutex<State>,
}

struct State {
    invalidated: bool,
    stopped: bool,
    first_run: bool,
    run_count: usize,
    on_invalidate: Vec<InvalidateCallback>,
    // autoruns created during the last run; stopped before the next one
    children: Vec<Computation>,
}

/// Creates a computation and runs `f` right away with the computation as the current context.
///
/// Every [`Dependency`](crate::Dependency) that `f` reads registers the computation;
/// when one of them changes, `f` runs again. An autorun created inside another
/// computation is stopped when its parent re-runs or stops.
pub fn autorun<F>(f: F) -> Computation
where F: Fn(&Computation) + Send + Sync + 'static {
    let computation = Computation(Arc::new(Inner {
        id: ComputationId(NEXT_ID.fetch_add(1, Ordering::Relaxed)),
        func: Box::new(f),
        state: Mutex::new(State {
            invalidated: false,
            stopped: false,
            first_run: true,
            run_count: 0,
            on_invalidate: Vec::new(),
            children: Vec::new(),
        }),
    }));

    if let Some(parent) = CurrentComputation::current() {
        parent.state().children.push(computation.clone());
    }

    trace!("autorun {} created", computation.id());
    computation.run();
    scheduler::flush_if_idle();
    computation
}

impl Computation {
    pub fn id(&self) -> ComputationId { self.0.id }

    fn state(&self) -> MutexGuard<'_, State> { self.0.state.lock().expect("computation state lock is poisoned") }

    /// True until the first run has returned
    pub fn first_run(&self) -> bool { self.state().first_run }

    pub fn is_invalidated(&self) -> bool { self.state().invalidated }

    pub fn is_stopped(&self) -> bool { self.state().stopped }

    /// Number of times the function has been run
    pub fn run_count(&self) -> usize { self.state().run_count }

    /// Registers a one-shot callback for the next invalidation.
    /// If the computation is already invalidated, the callback runs immediately.
    pub fn on_invalidate<F>(&self, callback: F)
    where F: FnOnce(&Computation) + Send + 'static {
        let mut state = self.state();
        if state.invalidated {
            drop(state);
            CurrentComputation::nonreactive(|| callback(self));
        } else {
            state.on_invalidate.push(Box::new(callback));
        }
    }

    /// Sends `()` on `sender` at the next invalidation
    #[cfg(feature = "tokio")]
    pub fn notify_on_invalidate(&self, sender: tokio::sync::mpsc::UnboundedSender<()>) {
        self.on_invalidate(move |_| {
            let _ = sender.send(()); // Ignore send errors
        });
    }

    /// Marks the computation stale and schedules a re-run.
    /// Invalidating an already invalidated computation does nothing.
    pub fn invalidate(&self) {
        let (callbacks, stopped) = {
            let mut state = self.state();
            if state.invalidated {
                return;
            }
            state.invalidated = true;
            (std::mem::take(&mut state.on_invalidate), state.stopped)
        };
        trace!("{} invalidated", self.id());

        if !stopped {
            scheduler::enqueue(self.clone());
        }
        CurrentComputation::nonreactive(|| {
            for callback in callbacks {
                callback(self);
            }
        });
        scheduler::flush_if_idle();
    }

    /// Invalidates the computation and prevents any further re-run
    pub fn stop(&self) {
        let children = {
            let mut state = self.state();
            if state.stopped {
                return;
            }
            state.stopped = true;
            std::mem::take(&mut state.children)
        };
        trace!("{} stopped", self.id());
        self.invalidate();
        for child in children {
            child.stop();
        }
    }

    /// Re-runs the function if the computation is invalidated and not stopped
    pub(crate) fn recompute(&self) {
        let due = {
            let state = self.state();
            state.invalidated && !state.stopped
        };
        if due {
            trace!("{} re-running", self.id());
            self.run();
        }
    }

    fn run(&self) {
        let children = {
            let mut state = self.state();
            state.invalidated = false;
            state.run_count += 1;
            std::mem::take(&mut state.children)
        };
        for child in children {
            child.stop();
        }

        let outcome = {
            let _depth = DepthGuard::enter();
            let _current = CurrentComputation::enter(self.clone());
            catch_unwind(AssertUnwindSafe(|| (self.0.func)(self)))
        };

        match outcome {
            Ok(()) => self.state().first_run = false,
            Err(panic) => {
                warn!("{} panicked while running and was stopped", self.id());
                self.stop();
                resume_unwind(panic);
            }
        }
    }
}

impl std::fmt::Debug for Computation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("Computation")
            .field("id", &self.0.id)
            .field("invalidated", &state.invalidated)
            .field("stopped", &state.stopped)
            .field("run_count", &state.run_count)
            .finish()
    }
}
