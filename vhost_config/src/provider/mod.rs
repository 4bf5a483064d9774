//! Sources of configuration layers.
//!
//! The resolver never touches storage itself; it asks a [`LayerProvider`]
//! for the defaults, the processor chains, the base layer and per-virtualhost
//! overrides. [`MemoryLayers`] keeps everything in memory and is the only
//! provider able to carry deferred closures; [`DirectoryLayers`] reads files
//! from a configuration root.

mod directory;
mod layer;
mod memory;

pub use directory::{CONFIG_DIR_ENV, DirectoryLayers, DirectoryLayersBuilder};
pub use layer::{Layer, LayerProvenance};
pub use memory::MemoryLayers;

use crate::ConfigResult;
use crate::value::ChainTable;

/// Supplies the raw layers a [`crate::Resolver`] merges.
///
/// Absent optional sources (defaults, processor chains) are reported as empty
/// values. Absent mandatory sources (base, a selected virtualhost) are
/// reported as `Ok(None)`; the resolver turns them into
/// [`crate::ConfigError::MissingConfigSource`] using the matching
/// `*_location` method.
pub trait LayerProvider: Send + Sync {
    /// Default parameter values.
    ///
    /// # Errors
    ///
    /// Returns an error when the source exists but cannot be read.
    fn defaults(&self) -> ConfigResult<Layer>;

    /// Processor names to run, per parameter key.
    ///
    /// # Errors
    ///
    /// Returns an error when the source exists but cannot be read.
    fn processor_chains(&self) -> ConfigResult<ChainTable>;

    /// The main configuration, or `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the source exists but cannot be read.
    fn base(&self) -> ConfigResult<Option<Layer>>;

    /// Human-readable location of the base source.
    fn base_location(&self) -> String;

    /// Overrides for `virtualhost`, or `None` when they do not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the source exists but cannot be read.
    fn virtualhost(&self, virtualhost: &str) -> ConfigResult<Option<Layer>>;

    /// Human-readable location of the override source for `virtualhost`.
    fn virtualhost_location(&self, virtualhost: &str) -> String;

    /// Every virtualhost with an override source, in provider order.
    ///
    /// # Errors
    ///
    /// Returns an error when the sources cannot be enumerated.
    fn list_virtualhosts(&self) -> ConfigResult<Vec<String>>;
}
