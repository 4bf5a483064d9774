//! In-memory layer provider.

use std::collections::BTreeMap;

use crate::ConfigResult;
use crate::value::{ChainTable, ParameterMap, RawValue};

use super::{Layer, LayerProvider};

/// Layer provider backed by in-memory maps.
///
/// Values may be deferred closures, which makes this the provider of choice
/// for embedding applications that compute parameters at runtime.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vhost_config::{MemoryLayers, Resolver};
///
/// let layers = MemoryLayers::new()
///     .with_default("timeout", json!(10))
///     .with_base_value("timeout", json!(20))
///     .with_base_value("virtualhost", json!("tenant1"))
///     .with_virtualhost_value("tenant1", "timeout", json!(30));
///
/// let resolver = Resolver::new(layers);
/// assert_eq!(resolver.get("timeout")?, Some(json!(30)));
/// # Ok::<_, std::sync::Arc<vhost_config::ConfigError>>(())
/// ```
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct MemoryLayers {
    defaults: ParameterMap,
    chains: ChainTable,
    base: Option<ParameterMap>,
    virtualhosts: BTreeMap<String, ParameterMap>,
}

impl MemoryLayers {
    /// Create a provider with no layers. The base layer is absent until a
    /// base value is added or [`MemoryLayers::with_base`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a default value.
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    /// Install `parameters` as the base layer, creating it even when empty.
    pub fn with_base(mut self, parameters: ParameterMap) -> Self {
        self.base = Some(parameters);
        self
    }

    /// Add a value to the base layer, creating the layer if needed.
    pub fn with_base_value(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.base
            .get_or_insert_with(ParameterMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Declare an override layer for `virtualhost`, even when it stays empty.
    pub fn with_virtualhost(mut self, virtualhost: impl Into<String>) -> Self {
        self.virtualhosts.entry(virtualhost.into()).or_default();
        self
    }

    /// Add a value to the override layer for `virtualhost`.
    pub fn with_virtualhost_value(
        mut self,
        virtualhost: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<RawValue>,
    ) -> Self {
        self.virtualhosts
            .entry(virtualhost.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Attach a processor chain to `key`.
    pub fn with_chain<I, S>(mut self, key: impl Into<String>, processors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chains
            .insert(key.into(), processors.into_iter().map(Into::into).collect());
        self
    }
}

impl LayerProvider for MemoryLayers {
    fn defaults(&self) -> ConfigResult<Layer> {
        Ok(Layer::defaults(self.defaults.clone(), None))
    }

    fn processor_chains(&self) -> ConfigResult<ChainTable> {
        Ok(self.chains.clone())
    }

    fn base(&self) -> ConfigResult<Option<Layer>> {
        Ok(self
            .base
            .as_ref()
            .map(|parameters| Layer::base(parameters.clone(), None)))
    }

    fn base_location(&self) -> String {
        "memory:base".to_owned()
    }

    fn virtualhost(&self, virtualhost: &str) -> ConfigResult<Option<Layer>> {
        Ok(self
            .virtualhosts
            .get(virtualhost)
            .map(|parameters| Layer::virtualhost(parameters.clone(), None)))
    }

    fn virtualhost_location(&self, virtualhost: &str) -> String {
        format!("memory:virtualhost/{virtualhost}")
    }

    fn list_virtualhosts(&self) -> ConfigResult<Vec<String>> {
        Ok(self.virtualhosts.keys().cloned().collect())
    }
}
