mod common;
use std::sync::Arc;

use anyhow::Result;
use common::*;
use reactive_binding::BindingError;
use reactive_object::{Object, Observable};

#[test]
fn test_close_detaches_and_invalidates_once() -> Result<()> {
    let object = map(&[("a", 1)]);
    let binding = Arc::new(Binding::with_object(object.clone())?);
    let (_computation, take) = {
        let binding = binding.clone();
        watch(move || binding.get("a"))
    };
    assert_eq!(object.listener_count(), 1);

    binding.close();
    binding.close();
    assert_eq!(take(), [Some(1), None]);
    assert_eq!(object.listener_count(), 0);

    // later changes to the object are not observed
    object.insert("a".to_string(), 2);
    assert!(take().is_empty());
    Ok(())
}

#[test]
fn test_closed_binding_is_inert() -> Result<()> {
    let object = map(&[("a", 1)]);
    let binding = Binding::with_object(object.clone())?;
    binding.close();

    assert!(binding.is_closed());
    assert!(!binding.is_bound());
    assert_eq!(binding.get("a"), None);
    assert!(binding.keys().is_empty());
    assert_eq!(binding.bind(Some(object.clone())), Err(BindingError::Closed));
    assert_eq!(binding.set_property("a", 2), Err(BindingError::Closed));
    binding.delete("a");
    assert_eq!(object.get("a"), Some(1));
    assert_eq!(object.listener_count(), 0);
    Ok(())
}

#[test]
fn test_closing_an_unbound_binding_does_not_invalidate() {
    let binding = Binding::new();
    binding.close();
    assert_eq!(binding.dependency().generation(), 0);
}

#[test]
fn test_drop_releases_the_listener() -> Result<()> {
    let object = map(&[("a", 1)]);
    {
        let first = Binding::with_object(object.clone())?;
        let second = Binding::with_object(object.clone())?;
        assert_eq!(object.listener_count(), 2);
        drop(first);
        assert_eq!(object.listener_count(), 1);
        assert_eq!(second.get("a"), Some(1));
    }
    assert_eq!(object.listener_count(), 0);
    Ok(())
}

#[test]
fn test_failed_rebind_changes_nothing() -> Result<()> {
    let object = map(&[("a", 1)]);
    let binding = Arc::new(Binding::with_object(object.clone())?);
    let (_computation, take) = {
        let binding = binding.clone();
        watch(move || binding.get("a"))
    };
    take();

    let generation = binding.dependency().generation();
    assert!(binding.set(vec![reactive_binding::Argument::key("a")]).is_err());
    assert!(binding.set(vec![]).is_err());
    assert_eq!(binding.dependency().generation(), generation);
    assert!(take().is_empty());

    // still subscribed
    object.insert("a".to_string(), 2);
    assert_eq!(take(), [Some(2)]);
    Ok(())
}
