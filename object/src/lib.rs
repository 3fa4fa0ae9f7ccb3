/*!
Observable key/value objects

[`Object`] is the key/value surface a reactive binding reads and writes.
Objects that can report their own mutations expose the [`Observable`]
capability through [`Object::observable`]; that query is the only thing a
binding checks before subscribing.

```rust
use reactive_object::*;
use std::sync::{Arc, Mutex};

let map: ObservableMap<i32> = [("a", 1)].into_iter().collect();
let seen = Arc::new(Mutex::new(Vec::new()));
let on_change = {
    let seen = seen.clone();
    listener(move |change: &Change<i32>| seen.lock().unwrap().push(change.key.clone()))
};

assert!(is_observable(&map));
map.observable().unwrap().subscribe(&on_change);
map.insert("b".to_string(), 2);
map.remove("a");
assert_eq!(*seen.lock().unwrap(), ["b", "a"]);
assert_eq!(map.keys(), ["b"]);
```
*/

mod broadcast;
mod change;
mod map;
mod plain;
mod property;
mod traits;

pub use broadcast::*;
pub use change::*;
pub use map::*;
pub use plain::*;
pub use traits::*;
