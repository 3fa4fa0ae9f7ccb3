use std::collections::VecDeque;

use tracing::trace;

use crate::Computation;

/// When invalidated computations re-run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushPolicy {
    /// Re-run as soon as the outermost run, batch or invalidation completes
    #[default]
    Immediate,
    /// Re-run only when [`flush`] is called
    Deferred,
}

struct Scheduler {
    pending: VecDeque<Computation>,
    policy: FlushPolicy,
    // running computations and open batches
    depth: usize,
    flushing: bool,
}

impl Scheduler {
    const fn new() -> Self { Self { pending: VecDeque::new(), policy: FlushPolicy::Immediate, depth: 0, flushing: false } }
}

#[cfg(feature = "singlethread")]
thread_local! {
    static SCHEDULER: std::cell::RefCell<Scheduler> = const { std::cell::RefCell::new(Scheduler::new()) };
}

#[cfg(not(feature = "singlethread"))]
static SCHEDULER: std::sync::Mutex<Scheduler> = std::sync::Mutex::new(Scheduler::new());

#[cfg(feature = "singlethread")]
fn with_scheduler<R>(f: impl FnOnce(&mut Scheduler) -> R) -> R { SCHEDULER.with(|scheduler| f(&mut *scheduler.borrow_mut())) }

#[cfg(not(feature = "singlethread"))]
fn with_scheduler<R>(f: impl FnOnce(&mut Scheduler) -> R) -> R {
    f(&mut *SCHEDULER.lock().expect("scheduler lock is poisoned"))
}

/// Sets the flush policy for this scheduler
pub fn set_flush_policy(policy: FlushPolicy) { with_scheduler(|scheduler| scheduler.policy = policy) }

pub fn flush_policy() -> FlushPolicy { with_scheduler(|scheduler| scheduler.policy) }

/// Re-runs every pending computation, including ones invalidated while flushing.
/// Calling this from inside a flush is a no-op.
pub fn flush() {
    let started = with_scheduler(|scheduler| {
        if scheduler.flushing {
            false
        } else {
            scheduler.flushing = true;
            true
        }
    });
    if !started {
        return;
    }

    let _flushing = FlushGuard;
    let mut reruns = 0usize;
    while let Some(computation) = with_scheduler(|scheduler| scheduler.pending.pop_front()) {
        computation.recompute();
        reruns += 1;
    }
    if reruns > 0 {
        trace!("flushed {} computations", reruns);
    }
}

/// Runs `f` with flushing held back, so several invalidations produce one round of re-runs
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
    let result = {
        let _depth = DepthGuard::enter();
        f()
    };
    flush_if_idle();
    result
}

pub(crate) fn enqueue(computation: Computation) { with_scheduler(|scheduler| scheduler.pending.push_back(computation)) }

/// Flushes if the policy is immediate and nothing is running, batching or flushing
pub(crate) fn flush_if_idle() {
    let idle = with_scheduler(|scheduler| {
        scheduler.policy == FlushPolicy::Immediate && scheduler.depth == 0 && !scheduler.flushing && !scheduler.pending.is_empty()
    });
    if idle {
        flush();
    }
}

/// Marks a computation run or batch in progress until dropped
pub(crate) struct DepthGuard {
    _private: (),
}

impl DepthGuard {
    pub(crate) fn enter() -> Self {
        with_scheduler(|scheduler| scheduler.depth += 1);
        Self { _private: () }
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) { with_scheduler(|scheduler| scheduler.depth -= 1) }
}

struct FlushGuard;

impl Drop for FlushGuard {
    fn drop(&mut self) { with_scheduler(|scheduler| scheduler.flushing = false) }
}
