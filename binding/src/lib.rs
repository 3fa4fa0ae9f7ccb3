/*!
Reactive bindings over observable key/value objects

A [`ReactiveBinding`] wraps zero or one [`Object`](object::Object) that can
report its own mutations. Reading through the binding inside a tracked
computation registers that computation; any change to the bound object, made
through the binding or directly, re-runs it.

```rust
use reactive_binding::object::{Object, ObservableMap};
use reactive_binding::tracker::autorun;
use reactive_binding::ReactiveBinding;
use std::sync::{Arc, Mutex};

let settings: ObservableMap<i32> = [("volume", 3)].into_iter().collect();
let binding = Arc::new(ReactiveBinding::with_object(settings.clone())?);
let seen = Arc::new(Mutex::new(Vec::new()));

let computation = {
    let binding = binding.clone();
    let seen = seen.clone();
    autorun(move |_| seen.lock().unwrap().push(binding.get("volume")))
};

binding.set_property("volume", 4)?;
// a direct mutation of the object is observed as well
settings.insert("volume".to_string(), 5);
binding.unbind()?;
assert_eq!(*seen.lock().unwrap(), [Some(3), Some(4), Some(5), None]);

computation.stop();
binding.close();
# Ok::<(), reactive_binding::BindingError>(())
```
*/

mod arguments;
mod binding;
mod error;

pub use arguments::*;
pub use binding::*;
pub use error::*;

pub use reactive_object as object;
pub use reactive_tracker as tracker;
