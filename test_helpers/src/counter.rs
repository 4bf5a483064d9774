//! Call recording for deferred parameters and processors.
//!
//! A [`CallCounter`] is cloned into a closure which calls
//! [`CallCounter::record`]; the test keeps the other clone and inspects how
//! often, and with which arguments, the closure ran.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use vhost_config_test_helpers::counter::CallCounter;
//!
//! let counter = CallCounter::new();
//! let seen = counter.clone();
//! let compute = move |args: &[serde_json::Value]| seen.record(args);
//! compute(&[json!("first")]);
//! assert_eq!(counter.count(), 1);
//! assert_eq!(counter.calls(), vec![vec![json!("first")]]);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

/// Shared log of the argument lists a closure was called with.
#[derive(Clone, Debug, Default)]
pub struct CallCounter {
    calls: Arc<Mutex<Vec<Vec<Value>>>>,
}

impl CallCounter {
    /// Create a counter with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call with `args`.
    pub fn record(&self, args: &[Value]) {
        self.calls.lock().push(args.to_vec());
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Copy of every recorded argument list, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<Value>> {
        self.calls.lock().clone()
    }
}
