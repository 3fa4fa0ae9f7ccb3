mod common;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use common::*;
use reactive_binding::ReactiveBinding;
use reactive_object::{Object, ObservableMap};
use reactive_tracker::{Computation, CurrentComputation, FlushPolicy, Tracker, autorun, batch, flush, set_flush_policy};

#[test]
fn test_reads_rerun_on_binding_mutations() -> Result<()> {
    let binding = Arc::new(Binding::with_object(map(&[("a", 1)]))?);
    let (computation, take) = {
        let binding = binding.clone();
        watch(move || binding.get("a"))
    };
    assert_eq!(take(), [Some(1)]);

    binding.set_property("a", 2)?;
    assert_eq!(take(), [Some(2)]);

    // no equality check: writing the same value still re-runs
    binding.set_property("a", 2)?;
    assert_eq!(take(), [Some(2)]);

    binding.delete("a");
    assert_eq!(take(), [None]);

    // a missing key is a no-op
    binding.delete("a");
    assert!(take().is_empty());

    computation.stop();
    binding.set_property("a", 3)?;
    assert!(take().is_empty());
    Ok(())
}

#[test]
fn test_external_changes_rerun_once() -> Result<()> {
    let object = map(&[]);
    let binding = Arc::new(Binding::with_object(object.clone())?);
    let (_computation, take) = {
        let binding = binding.clone();
        watch(move || binding.keys())
    };
    assert_eq!(take(), [Vec::<String>::new()]);

    object.insert("x".to_string(), 1);
    object.insert("y".to_string(), 2);
    object.remove("x");
    assert_eq!(take(), [vec!["x".to_string()], vec!["x".to_string(), "y".to_string()], vec!["y".to_string()]]);
    Ok(())
}

#[test]
fn test_rebinding_moves_the_source() -> Result<()> {
    let first = map(&[("n", 1)]);
    let second = map(&[("n", 2)]);
    let binding = Arc::new(Binding::with_object(first.clone())?);
    let (_computation, take) = {
        let binding = binding.clone();
        watch(move || binding.get("n"))
    };
    assert_eq!(take(), [Some(1)]);

    binding.bind(Some(second.clone()))?;
    assert_eq!(take(), [Some(2)]);

    // the old object no longer drives the computation
    first.insert("n".to_string(), 10);
    assert!(take().is_empty());

    second.insert("n".to_string(), 20);
    assert_eq!(take(), [Some(20)]);

    // rebinding the same object is still one change
    binding.bind(Some(second.clone()))?;
    assert_eq!(take(), [Some(20)]);
    Ok(())
}

#[test]
fn test_every_reader_is_invalidated() -> Result<()> {
    let binding = Arc::new(Binding::with_object(map(&[("a", 1)]))?);
    let (_has, take_has) = {
        let binding = binding.clone();
        watch(move || binding.has("a"))
    };
    let (_len, take_len) = {
        let binding = binding.clone();
        watch(move || binding.len())
    };
    let (_object, take_object) = {
        let binding = binding.clone();
        watch(move || binding.get_object().is_some())
    };

    binding.unbind()?;
    assert_eq!(take_has(), [true, false]);
    assert_eq!(take_len(), [1, 0]);
    assert_eq!(take_object(), [true, false]);
    Ok(())
}

#[test]
fn test_reads_outside_a_computation_register_nothing() -> Result<()> {
    let binding = Binding::with_object(map(&[("a", 1)]))?;
    binding.get("a");
    binding.keys();
    binding.entries();
    assert!(!binding.dependency().has_dependents());
    Ok(())
}

#[test]
fn test_nonreactive_reads_are_untracked() -> Result<()> {
    let binding = Arc::new(Binding::with_object(map(&[("a", 1)]))?);
    let (_computation, take) = {
        let binding = binding.clone();
        watch(move || CurrentComputation::nonreactive(|| binding.get("a")))
    };
    binding.set_property("a", 2)?;
    assert_eq!(take(), [Some(1)]);
    Ok(())
}

#[test]
fn test_batched_mutations_rerun_once() -> Result<()> {
    let binding = Arc::new(Binding::with_object(map(&[]))?);
    let (_computation, take) = {
        let binding = binding.clone();
        watch(move || binding.len())
    };

    batch(|| -> Result<()> {
        binding.set_property("a", 1)?;
        binding.set_property("b", 2)?;
        binding.delete("a");
        Ok(())
    })?;
    assert_eq!(take(), [0, 1]);
    Ok(())
}

#[test]
fn test_deferred_flush_sees_post_mutation_state() -> Result<()> {
    set_flush_policy(FlushPolicy::Deferred);
    let binding = Arc::new(Binding::with_object(map(&[("a", 1)]))?);
    let (computation, take) = {
        let binding = binding.clone();
        watch(move || binding.entries())
    };

    binding.set_property("a", 2)?;
    binding.set_property("b", 3)?;
    assert!(computation.is_invalidated());
    assert_eq!(take(), [vec![("a".to_string(), 1)]]);

    flush();
    assert_eq!(take(), [vec![("a".to_string(), 2), ("b".to_string(), 3)]]);
    set_flush_policy(FlushPolicy::Immediate);
    Ok(())
}

#[test]
fn test_computation_can_write_other_bindings() -> Result<()> {
    let source = Arc::new(Binding::with_object(map(&[("n", 1)]))?);
    let target_object = map(&[]);
    let target = Arc::new(Binding::with_object(target_object.clone())?);

    let _copy = {
        let (source, target) = (source.clone(), target.clone());
        autorun(move |_| {
            if let Some(n) = source.get("n") {
                target.set_property("double", n * 2).unwrap();
            }
        })
    };
    let (_reader, take) = {
        let target = target.clone();
        watch(move || target.get("double"))
    };
    assert_eq!(take(), [Some(2)]);

    source.set_property("n", 5)?;
    assert_eq!(target_object.get("double"), Some(10));
    assert_eq!(take(), [Some(10)]);
    Ok(())
}

/// Hands out a fixed computation and counts how often the binding asked
struct RecordingTracker {
    computation: Mutex<Option<Computation>>,
    asked: Mutex<usize>,
}

impl Tracker for RecordingTracker {
    fn current(&self) -> Option<Computation> { self.computation.lock().unwrap().clone() }

    fn active(&self) -> bool {
        *self.asked.lock().unwrap() += 1;
        self.computation.lock().unwrap().is_some()
    }
}

#[test]
fn test_injected_tracker_sees_every_read() -> Result<()> {
    let tracker = Arc::new(RecordingTracker { computation: Mutex::new(None), asked: Mutex::new(0) });
    let binding: ReactiveBinding<ObservableMap<i32>> =
        ReactiveBinding::builder().tracker(tracker.clone()).object(map(&[("a", 1)])).build()?;

    binding.get("a");
    binding.has("a");
    binding.keys();
    binding.values();
    binding.entries();
    binding.get_object();
    assert_eq!(*tracker.asked.lock().unwrap(), 6);
    assert!(!binding.dependency().has_dependents());

    // the ambient stack is ignored in favour of the injected tracker
    let computation = autorun(|_| {});
    *tracker.computation.lock().unwrap() = Some(computation.clone());
    binding.get("a");
    assert!(binding.dependency().has_dependents());

    binding.set_property("a", 2)?;
    assert_eq!(computation.run_count(), 2);
    assert!(!binding.dependency().has_dependents());
    Ok(())
}
