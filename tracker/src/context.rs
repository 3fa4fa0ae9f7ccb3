use std::cell::RefCell;

use crate::Computation;

// Thread-local stack for nested computations. `None` entries mark nonreactive sections.
// Per thread under either feature; a computation is only current on the thread running it.
thread_local! {
    static COMPUTATION_STACK: RefCell<Vec<Option<Computation>>> = const { RefCell::new(Vec::new()) };
}

fn with_stack<R>(f: impl FnOnce(&mut Vec<Option<Computation>>) -> R) -> R {
    COMPUTATION_STACK.with(|stack| f(&mut *stack.borrow_mut()))
}

/// Manages the stack of running computations
/// and answers whether a computation is currently active
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentComputation;

impl CurrentComputation {
    /// The innermost running computation, if any
    pub fn current() -> Option<Computation> { with_stack(|stack| stack.last().cloned().flatten()) }

    /// Whether reads right now would be tracked
    pub fn active() -> bool { with_stack(|stack| matches!(stack.last(), Some(Some(_)))) }

    /// Pushes a computation onto the stack, making it current
    pub fn push(computation: Computation) { with_stack(|stack| stack.push(Some(computation))) }

    /// Removes the innermost entry, restoring the previous one
    pub fn pop() {
        // dropped outside of the stack borrow
        let _popped = with_stack(|stack| stack.pop());
    }

    /// Removes a specific computation from the stack
    pub fn remove(computation: &Computation) {
        let target = computation.id();
        let _removed = with_stack(|stack| {
            let position = stack.iter().rposition(|entry| entry.as_ref().is_some_and(|c| c.id() == target))?;
            Some(stack.remove(position))
        });
    }

    /// Makes `computation` current until the returned guard is dropped
    pub fn enter(computation: Computation) -> ContextGuard {
        with_stack(|stack| stack.push(Some(computation)));
        ContextGuard { _private: () }
    }

    /// Runs `f` with no current computation, so nothing it reads is tracked
    pub fn nonreactive<R>(f: impl FnOnce() -> R) -> R {
        with_stack(|stack| stack.push(None));
        let _guard = ContextGuard { _private: () };
        f()
    }

    /// Number of entries on the stack, nonreactive sections included
    pub fn depth() -> usize { with_stack(|stack| stack.len()) }
}

/// Pops the entry pushed by [`CurrentComputation::enter`] or
/// [`CurrentComputation::nonreactive`], also while unwinding
#[must_use = "the computation is only current while the guard is alive"]
pub struct ContextGuard {
    _private: (),
}

impl Drop for ContextGuard {
    fn drop(&mut self) { CurrentComputation::pop(); }
}
