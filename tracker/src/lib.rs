/*!
Dependency tracking for reactive bindings

A [`Dependency`] is a handle that data sources hold. Reading a source calls
[`Dependency::depend`], which registers the currently running [`Computation`];
mutating it calls [`Dependency::changed`], which invalidates every registered
computation. Invalidated computations re-run when the scheduler flushes.

# Basic usage

```rust
use reactive_tracker::*;
use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};

let dependency = Dependency::new();
let runs = Arc::new(AtomicUsize::new(0));

let computation = {
    let dependency = dependency.clone();
    let runs = runs.clone();
    autorun(move |_| {
        dependency.depend();
        runs.fetch_add(1, Ordering::SeqCst);
    })
};
assert_eq!(runs.load(Ordering::SeqCst), 1);

// re-runs right away under the default flush policy
dependency.changed();
assert_eq!(runs.load(Ordering::SeqCst), 2);

computation.stop();
dependency.changed();
assert_eq!(runs.load(Ordering::SeqCst), 2);
```

# Flush policy

With [`FlushPolicy::Deferred`] invalidated computations wait for an explicit
[`flush`], which is the pull-based mode:

```rust
use reactive_tracker::*;

set_flush_policy(FlushPolicy::Deferred);
let dependency = Dependency::new();
let computation = {
    let dependency = dependency.clone();
    autorun(move |_| {
        dependency.depend();
    })
};
dependency.changed();
assert!(computation.is_invalidated());
flush();
assert!(!computation.is_invalidated());
assert_eq!(computation.run_count(), 2);
```
*/

mod computation;
mod context;
mod dependency;
mod scheduler;
mod tracker;

pub use computation::*;
pub use context::*;
pub use dependency::*;
pub use scheduler::{FlushPolicy, batch, flush, flush_policy, set_flush_policy};
pub use tracker::*;
