//! Layered, lazily evaluated configuration for multi-virtualhost services.
//!
//! A [`Resolver`] merges three layers of parameters, lowest precedence
//! first: defaults, the mandatory base configuration, and the override layer
//! of the selected virtualhost. Values may be literals, deferred closures,
//! or `Type::member` references to callables registered with a
//! [`CallableRegistry`]. Each parameter is evaluated on first access, run
//! through its configured processor chain, and cached for the lifetime of
//! the snapshot.
//!
//! Layers come from a [`LayerProvider`]: [`MemoryLayers`] for programmatic
//! setup and tests, [`DirectoryLayers`] for configuration files on disk.
//!
//! ```rust
//! use serde_json::json;
//! use vhost_config::{MemoryLayers, Resolver};
//!
//! let resolver = Resolver::new(
//!     MemoryLayers::new()
//!         .with_default("timeout", json!(10))
//!         .with_base_value("timeout", json!(20))
//!         .with_base_value("virtualhost", json!("tenant1"))
//!         .with_virtualhost_value("tenant1", "timeout", json!(30)),
//! );
//! assert_eq!(resolver.get("timeout")?, Some(json!(30)));
//! assert_eq!(resolver.current_virtualhost().as_deref(), Some("tenant1"));
//! # Ok::<_, std::sync::Arc<vhost_config::ConfigError>>(())
//! ```

use std::sync::Arc;

mod error;
mod evaluate;
mod merge;
mod provider;
mod registry;
mod resolver;
mod result_ext;
mod snapshot;
pub mod value;

pub use error::ConfigError;
pub use merge::VIRTUALHOST_KEY;
pub use provider::{
    CONFIG_DIR_ENV, DirectoryLayers, DirectoryLayersBuilder, Layer, LayerProvenance,
    LayerProvider, MemoryLayers,
};
pub use registry::{CallableRegistry, Processor, ProcessorError, ProcessorRegistry};
pub use resolver::{FAMILY_WILDCARD, Resolver, ResolverBuilder};
pub use result_ext::{ConfigResultExt, ResultIntoFigment};
pub use value::{ChainTable, Deferred, ParameterMap, RawValue};

/// Result type returned by the resolver and its providers.
///
/// Errors are shared so a failure can be cloned cheaply into every caller
/// that observed it.
pub type ConfigResult<T> = Result<T, Arc<ConfigError>>;
