//! Builder for [`Resolver`] instances.

use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};

use crate::provider::LayerProvider;
use crate::registry::{CallableRegistry, ProcessorRegistry};
use crate::snapshot::Staging;

use super::Resolver;

/// Builder for [`Resolver`].
///
/// Registries are fixed once [`ResolverBuilder::build`] runs.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use vhost_config::{CallableRegistry, MemoryLayers, ProcessorRegistry, Resolver};
///
/// let mut callables = CallableRegistry::new();
/// callables.register("Storage::quota", |_args| Ok(json!(2048)));
///
/// let resolver = Resolver::builder(
///     MemoryLayers::new().with_base_value("quota", json!("Storage::quota")),
/// )
/// .processors(ProcessorRegistry::with_builtins())
/// .callables(callables)
/// .build();
/// assert_eq!(resolver.get("quota")?, Some(json!(2048)));
/// # Ok::<_, std::sync::Arc<vhost_config::ConfigError>>(())
/// ```
#[must_use]
pub struct ResolverBuilder {
    provider: Arc<dyn LayerProvider>,
    processors: ProcessorRegistry,
    callables: CallableRegistry,
}

impl ResolverBuilder {
    /// Creates a builder reading layers from `provider`, with the built-in
    /// processors and no callables.
    pub fn new(provider: impl LayerProvider + 'static) -> Self {
        Self::from_shared(Arc::new(provider))
    }

    /// Creates a builder around an already shared provider.
    pub fn from_shared(provider: Arc<dyn LayerProvider>) -> Self {
        Self {
            provider,
            processors: ProcessorRegistry::with_builtins(),
            callables: CallableRegistry::new(),
        }
    }

    /// Replaces the processor registry.
    pub fn processors(mut self, processors: ProcessorRegistry) -> Self {
        self.processors = processors;
        self
    }

    /// Replaces the callable registry.
    pub fn callables(mut self, callables: CallableRegistry) -> Self {
        self.callables = callables;
        self
    }

    /// Build the resolver. No layer is read until the first access.
    pub fn build(self) -> Resolver {
        Resolver {
            provider: self.provider,
            processors: self.processors,
            callables: self.callables,
            defaults: OnceLock::new(),
            chains: OnceLock::new(),
            snapshot: RwLock::new(None),
            staging: Staging::default(),
            load_lock: Mutex::new(()),
        }
    }
}
