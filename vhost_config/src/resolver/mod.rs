//! Public resolver surface.
//!
//! [`Resolver`] is the configuration context object: it owns the layer
//! provider, the registries, the per-resolver caches of defaults and
//! processor chains, and the live snapshot. Share it by reference or behind
//! an [`Arc`]; every method takes `&self`.

mod builder;

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::evaluate::Evaluator;
use crate::merge::{build_snapshot, selects_virtualhost};
use crate::provider::LayerProvider;
use crate::registry::{CallableRegistry, ProcessorRegistry};
use crate::snapshot::{Snapshot, Staging};
use crate::value::{ChainTable, ParameterMap};
use crate::{ConfigResult, ConfigResultExt};

pub use builder::ResolverBuilder;

/// Marker that turns a key into a family query.
pub const FAMILY_WILDCARD: char = '*';

/// Lazily merged, memoizing view over layered configuration.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use vhost_config::{MemoryLayers, Resolver};
///
/// let resolver = Resolver::new(
///     MemoryLayers::new()
///         .with_default("db.host", json!("localhost"))
///         .with_base_value("db.port", json!(5432))
///         .with_base_value("other.x", json!(true)),
/// );
///
/// assert_eq!(resolver.get("db.port")?, Some(json!(5432)));
/// assert_eq!(resolver.get("missing")?, None);
/// assert_eq!(
///     resolver.get("db.*")?,
///     Some(json!({"host": "localhost", "port": 5432}))
/// );
/// # Ok::<_, std::sync::Arc<vhost_config::ConfigError>>(())
/// ```
pub struct Resolver {
    provider: Arc<dyn LayerProvider>,
    processors: ProcessorRegistry,
    callables: CallableRegistry,
    defaults: OnceLock<ParameterMap>,
    chains: OnceLock<ChainTable>,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    staging: Staging,
    load_lock: Mutex<()>,
}

impl Resolver {
    /// Resolver over `provider` with the built-in processors and no
    /// callables.
    #[must_use]
    pub fn new(provider: impl LayerProvider + 'static) -> Self {
        ResolverBuilder::new(provider).build()
    }

    /// Creates a builder for a resolver over `provider`.
    pub fn builder(provider: impl LayerProvider + 'static) -> ResolverBuilder {
        ResolverBuilder::new(provider)
    }

    /// Ensure a snapshot is loaded.
    ///
    /// With `None`, this is a no-op once any snapshot exists, whichever
    /// virtualhost it was built for. With `Some(id)`, a fresh snapshot for
    /// `id` is always built and replaces the live one. `Some("")` and
    /// `Some("0")` select no virtualhost: they are no-ops once a snapshot
    /// exists and otherwise build one without consulting the `virtualhost`
    /// parameter. The live snapshot is only replaced after every required
    /// layer was read, so a failed load leaves the previous one in place.
    ///
    /// A deferred `virtualhost` parameter runs while the load is in
    /// progress. Reads it makes through this resolver see the defaults and
    /// base merged so far; it must not read `virtualhost` itself or start
    /// another load.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::MissingConfigSource`] when the base
    /// layer or the selected override layer is absent,
    /// [`crate::ConfigError::InvalidParameterType`] when the `virtualhost`
    /// parameter is neither a string nor falsy, and any error reported by
    /// the provider.
    pub fn load(&self, virtualhost: Option<&str>) -> ConfigResult<()> {
        self.ensure(virtualhost).map(drop)
    }

    fn ensure(&self, virtualhost: Option<&str>) -> ConfigResult<Arc<Snapshot>> {
        let switching = virtualhost.is_some_and(selects_virtualhost);
        if !switching {
            if let Some(snapshot) = self.staging.visible().or_else(|| self.live()) {
                return Ok(snapshot);
            }
        }

        let _guard = self.load_lock.lock();
        if !switching {
            if let Some(snapshot) = self.live() {
                tracing::debug!("snapshot loaded concurrently; reusing it");
                return Ok(snapshot);
            }
        }

        let defaults = self.cached_defaults()?;
        let evaluator = self.evaluator()?;
        let snapshot = Arc::new(build_snapshot(
            self.provider.as_ref(),
            defaults,
            &evaluator,
            virtualhost,
            &self.staging,
        )?);
        tracing::debug!(
            virtualhost = snapshot.virtualhost().unwrap_or("<none>"),
            keys = snapshot.len(),
            "configuration snapshot built"
        );
        *self.snapshot.write() = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    fn live(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().clone()
    }

    fn cached_defaults(&self) -> ConfigResult<&ParameterMap> {
        if let Some(defaults) = self.defaults.get() {
            return Ok(defaults);
        }
        let layer = self.provider.defaults()?;
        Ok(self.defaults.get_or_init(|| layer.into_parameters()))
    }

    fn cached_chains(&self) -> ConfigResult<&ChainTable> {
        if let Some(chains) = self.chains.get() {
            return Ok(chains);
        }
        let chains = self.provider.processor_chains()?;
        Ok(self.chains.get_or_init(|| chains))
    }

    fn evaluator(&self) -> ConfigResult<Evaluator<'_>> {
        Ok(Evaluator::new(
            &self.processors,
            &self.callables,
            self.cached_chains()?,
        ))
    }

    /// Resolve `key` without arguments. See [`Resolver::get_with`].
    ///
    /// # Errors
    ///
    /// See [`Resolver::get_with`].
    pub fn get(&self, key: &str) -> ConfigResult<Option<Value>> {
        self.get_with(key, &[])
    }

    /// Resolve `key`, forwarding `args` to a deferred computation and to the
    /// key's processors.
    ///
    /// A key ending in `*` is a family query: every parameter starting with
    /// the remaining prefix is resolved with its own key prepended to `args`,
    /// and the results come back as an object keyed by suffix. Family
    /// queries always return `Some`, possibly an empty object.
    ///
    /// Absent keys resolve to `None`. A key is evaluated once per snapshot:
    /// after the first successful resolution the cached value is returned
    /// and `args` are ignored, even when they differ from the first call.
    ///
    /// # Errors
    ///
    /// Returns load errors (see [`Resolver::load`]),
    /// [`crate::ConfigError::UnknownProcessor`] when the key's chain names an
    /// unregistered processor, and any error raised by a deferred
    /// computation or processor.
    pub fn get_with(&self, key: &str, args: &[Value]) -> ConfigResult<Option<Value>> {
        let snapshot = self.ensure(None)?;
        let evaluator = self.evaluator()?;
        match key.strip_suffix(FAMILY_WILDCARD) {
            Some(prefix) => snapshot
                .family(prefix, args, &evaluator)
                .map(|set| Some(Value::Object(set))),
            None => snapshot.get(key, args, &evaluator),
        }
    }

    /// Resolve every parameter starting with `prefix`, keyed by suffix.
    ///
    /// Equivalent to a family query for `prefix*` without the wrapping
    /// `Value`.
    ///
    /// # Errors
    ///
    /// See [`Resolver::get_with`].
    pub fn family(&self, prefix: &str, args: &[Value]) -> ConfigResult<Map<String, Value>> {
        let snapshot = self.ensure(None)?;
        let evaluator = self.evaluator()?;
        snapshot.family(prefix, args, &evaluator)
    }

    /// Resolve `key` and deserialise it into `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_json::json;
    /// use vhost_config::{MemoryLayers, Resolver};
    ///
    /// let resolver = Resolver::new(MemoryLayers::new().with_base_value("port", json!(8080)));
    /// let port: Option<u16> = resolver.get_as("port")?;
    /// assert_eq!(port, Some(8080));
    /// # Ok::<_, std::sync::Arc<vhost_config::ConfigError>>(())
    /// ```
    ///
    /// # Errors
    ///
    /// See [`Resolver::get_with`]; additionally returns
    /// [`crate::ConfigError::Gathering`] when the value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<Option<T>> {
        self.get(key)?
            .map(|value| serde_json::from_value(value).into_config())
            .transpose()
    }

    /// Whether `key` is present in the snapshot. Nothing is evaluated.
    ///
    /// # Errors
    ///
    /// Returns load errors (see [`Resolver::load`]).
    pub fn exists(&self, key: &str) -> ConfigResult<bool> {
        Ok(self.ensure(None)?.contains(key))
    }

    /// Virtualhost of the live snapshot, without loading one.
    #[must_use]
    pub fn current_virtualhost(&self) -> Option<String> {
        self.live()
            .and_then(|snapshot| snapshot.virtualhost().map(str::to_owned))
    }

    /// Every virtualhost the provider has an override source for.
    ///
    /// # Errors
    ///
    /// Returns any error reported by the provider.
    pub fn list_virtualhosts(&self) -> ConfigResult<Vec<String>> {
        self.provider.list_virtualhosts()
    }

    /// Run `callback` once per virtualhost with that virtualhost's snapshot
    /// live, or once with the default snapshot when there are none.
    ///
    /// The callback reads configuration through this resolver. The last
    /// virtualhost's snapshot stays live afterwards.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_json::json;
    /// use vhost_config::{MemoryLayers, Resolver};
    ///
    /// let resolver = Resolver::new(
    ///     MemoryLayers::new()
    ///         .with_base_value("site", json!("main"))
    ///         .with_virtualhost_value("a", "site", json!("site-a"))
    ///         .with_virtualhost_value("b", "site", json!("site-b")),
    /// );
    /// let mut sites = Vec::new();
    /// resolver.run_for_each_virtualhost(|| {
    ///     sites.push(resolver.get("site")?);
    ///     Ok(())
    /// })?;
    /// assert_eq!(sites, vec![Some(json!("site-a")), Some(json!("site-b"))]);
    /// # Ok::<_, std::sync::Arc<vhost_config::ConfigError>>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the first load or callback error; later virtualhosts are not
    /// visited.
    pub fn run_for_each_virtualhost<F>(&self, mut callback: F) -> ConfigResult<()>
    where
        F: FnMut() -> ConfigResult<()>,
    {
        let virtualhosts = self.list_virtualhosts()?;
        if virtualhosts.is_empty() {
            self.load(None)?;
            return callback();
        }
        for virtualhost in &virtualhosts {
            tracing::debug!(%virtualhost, "switching virtualhost");
            self.load(Some(virtualhost))?;
            callback()?;
        }
        Ok(())
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("processors", &self.processors)
            .field("callables", &self.callables)
            .field("virtualhost", &self.current_virtualhost())
            .field("loaded", &self.live().is_some())
            .finish_non_exhaustive()
    }
}
