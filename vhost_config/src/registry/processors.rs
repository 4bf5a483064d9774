//! Named post-processing transforms applied to evaluated values.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use super::builtins;

/// Failure reported by a processor for an unsuitable input.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProcessorError {
    message: String,
}

impl ProcessorError {
    /// Create an error carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A registered transform.
///
/// The first argument is the running value; the remaining arguments are the
/// ones forwarded by the caller of [`crate::Resolver::get_with`].
pub type Processor = Arc<dyn Fn(&[Value]) -> Result<Value, ProcessorError> + Send + Sync>;

/// Closed mapping from processor name to transform.
///
/// # Examples
///
/// ```
/// use serde_json::{Value, json};
/// use vhost_config::ProcessorRegistry;
///
/// let mut processors = ProcessorRegistry::with_builtins();
/// processors.register("double", |args| {
///     let n = args.first().and_then(Value::as_i64).unwrap_or_default();
///     Ok(json!(n * 2))
/// });
/// assert!(processors.contains("double"));
/// assert!(processors.contains("trim"));
/// ```
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    processors: BTreeMap<String, Processor>,
}

impl ProcessorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in processors: `trim`,
    /// `lowercase`, `uppercase`, `csv`, `integer` and `boolean`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::install(&mut registry);
        registry
    }

    /// Register `f` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Result<Value, ProcessorError> + Send + Sync + 'static,
    {
        self.processors.insert(name.into(), Arc::new(f));
        self
    }

    /// Look up the processor registered as `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Processor> {
        self.processors.get(name)
    }

    /// Returns `true` when `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.processors.contains_key(name)
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("processors", &self.processors.keys().collect::<Vec<_>>())
            .finish()
    }
}
