use reactive_object::Object;
use tracing::debug;

use crate::ReactiveBinding;
use crate::error::{BindingError, Result};

/// One positional argument forwarded by a dynamically typed host
pub enum Argument<O: Object> {
    Null,
    Object(O),
    Key(String),
    Value(O::Value),
}

impl<O: Object> Argument<O> {
    pub fn key(key: impl Into<String>) -> Self { Argument::Key(key.into()) }

    fn describe(&self) -> &'static str {
        match self {
            Argument::Null => "null",
            Argument::Object(_) => "object",
            Argument::Key(_) => "key",
            Argument::Value(_) => "value",
        }
    }
}

impl<O: Object> From<O> for Argument<O> {
    fn from(object: O) -> Self { Argument::Object(object) }
}

impl<O: Object> From<Option<O>> for Argument<O> {
    fn from(object: Option<O>) -> Self { object.map_or(Argument::Null, Argument::Object) }
}

impl<O: Object> std::fmt::Debug for Argument<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Argument::Key(key) => f.debug_tuple("Key").field(key).finish(),
            other => f.write_str(other.describe()),
        }
    }
}

impl<O: Object> ReactiveBinding<O> {
    /// Dispatches an argument list the way a host without typed overloads calls in.
    ///
    /// One argument rebinds (`Null` unbinds), a key followed by a value assigns a
    /// property. Prefer [`bind`](Self::bind) and [`set_property`](Self::set_property)
    /// from Rust.
    pub fn set(&self, args: Vec<Argument<O>>) -> Result<()> {
        let count = args.len();
        let mut args = args.into_iter();
        match (args.next(), args.next(), args.next()) {
            (Some(Argument::Null), None, None) => self.bind(None),
            (Some(Argument::Object(object)), None, None) => self.bind(Some(object)),
            // a lone key or value is not an object, so it cannot be observed
            (Some(other), None, None) => {
                debug!("set called with a lone {}", other.describe());
                Err(BindingError::NotObservable)
            }
            (Some(Argument::Key(key)), Some(Argument::Value(value)), None) => self.set_property(key, value),
            (Some(first), Some(second), None) => {
                debug!("set called with ({}, {})", first.describe(), second.describe());
                Err(BindingError::InvalidArgument("expected a key and a value"))
            }
            _ => {
                debug!("set called with {} arguments", count);
                Err(BindingError::InvalidArgumentCount(count))
            }
        }
    }
}
