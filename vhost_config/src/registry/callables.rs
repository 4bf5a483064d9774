//! Registry of named deferred computations.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::ConfigResult;
use crate::value::{Deferred, static_reference};

/// Maps `Type::member` tokens to deferred computations.
///
/// A string parameter value with that shape is invoked when, and only when,
/// its token is registered here; any other string stays a literal.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vhost_config::CallableRegistry;
///
/// let mut callables = CallableRegistry::new();
/// callables.register("Storage::default_quota", |_args| Ok(json!(5_000)));
/// assert!(callables.resolve("Storage::default_quota").is_some());
/// assert!(callables.resolve("Storage::missing").is_none());
/// ```
#[derive(Clone, Default)]
pub struct CallableRegistry {
    callables: BTreeMap<String, Deferred>,
}

impl CallableRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` under `name`, replacing any previous entry.
    ///
    /// Names that are not shaped `Type::member` are stored but can never be
    /// reached from configuration data.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&[Value]) -> ConfigResult<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        if static_reference(&name).is_none() {
            tracing::warn!(%name, "callable name is not a Type::member reference");
        }
        self.callables.insert(name, Arc::new(f));
        self
    }

    /// Look up the callable a parameter string refers to.
    #[must_use]
    pub fn resolve(&self, token: &str) -> Option<&Deferred> {
        static_reference(token).and_then(|name| self.callables.get(name))
    }

    /// Number of registered callables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callables.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callables.is_empty()
    }
}

impl fmt::Debug for CallableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableRegistry")
            .field("callables", &self.callables.keys().collect::<Vec<_>>())
            .finish()
    }
}
