use std::str::FromStr;
use std::sync::{Arc, Mutex};

use reactive_binding::ReactiveBinding;
use reactive_object::ObservableMap;
use reactive_tracker::{Computation, autorun};
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    // if LOG_LEVEL env var is set, use it
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        tracing_subscriber::fmt().with_max_level(Level::from_str(&level).unwrap()).with_test_writer().init();
    } else {
        tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init();
    }
}

pub type Binding = ReactiveBinding<ObservableMap<i32>>;

#[allow(unused)]
pub fn map(entries: &[(&str, i32)]) -> ObservableMap<i32> { entries.iter().map(|(key, value)| (*key, *value)).collect() }

/// Runs `read` in an autorun and records what it returned on every run.
/// The returned closure drains the recorded values.
#[allow(unused)]
pub fn watch<T, F>(read: F) -> (Computation, Box<dyn Fn() -> Vec<T> + Send + Sync>)
where
    T: Send + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    let seen = Arc::new(Mutex::new(Vec::new()));
    let computation = {
        let seen = seen.clone();
        autorun(move |_| {
            let value = read();
            seen.lock().unwrap().push(value);
        })
    };
    let take = Box::new(move || seen.lock().unwrap().drain(..).collect());
    (computation, take)
}
