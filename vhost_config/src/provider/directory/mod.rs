//! Filesystem layer provider.
//!
//! Layout under the configuration root, with the default names:
//!
//! ```text
//! <root>/defaults.toml            optional default values
//! <root>/processors.toml          optional processor chains
//! <root>/config/config.toml       mandatory base configuration
//! <root>/config/<vhost>.conf.toml one override file per virtualhost
//! ```
//!
//! All access goes through a `cap-std` directory handle opened on the root,
//! so virtualhost names cannot reach files outside it.

mod builder;
mod error;
mod parser;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde_json::{Map, Value};

use crate::ConfigResult;
use crate::value::{ChainTable, static_parameters};

use super::{Layer, LayerProvider};
pub use builder::DirectoryLayersBuilder;
use error::file_error;
use parser::{parse_chains, parse_table};

/// Environment variable naming the configuration root for
/// [`DirectoryLayers::from_env`].
pub const CONFIG_DIR_ENV: &str = "VHOST_CONFIG_DIR";

/// Layer provider reading configuration files from a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryLayers {
    root: Utf8PathBuf,
    config_dir: String,
    extension: String,
    defaults_stem: String,
    processors_stem: String,
    base_stem: String,
}

impl DirectoryLayers {
    /// Provider reading from `root` with the default layout.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self::builder(root).build()
    }

    /// Creates a builder for a provider reading from `root`.
    #[must_use]
    pub fn builder(root: impl Into<Utf8PathBuf>) -> DirectoryLayersBuilder {
        DirectoryLayersBuilder::new(root)
    }

    /// Provider rooted at the directory named by `VHOST_CONFIG_DIR`.
    ///
    /// Returns `None` when the variable is unset, empty or not UTF-8.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let root = std::env::var(CONFIG_DIR_ENV).ok()?;
        (!root.trim().is_empty()).then(|| Self::new(root))
    }

    /// The configuration root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn relative_defaults(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}.{}", self.defaults_stem, self.extension))
    }

    fn relative_processors(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}.{}", self.processors_stem, self.extension))
    }

    fn relative_base(&self) -> Utf8PathBuf {
        Utf8Path::new(&self.config_dir).join(format!("{}.{}", self.base_stem, self.extension))
    }

    fn relative_virtualhost(&self, virtualhost: &str) -> Utf8PathBuf {
        Utf8Path::new(&self.config_dir).join(format!("{virtualhost}{}", self.override_suffix()))
    }

    fn override_suffix(&self) -> String {
        format!(".conf.{}", self.extension)
    }

    /// Absolute path of the base configuration file.
    #[must_use]
    pub fn base_path(&self) -> Utf8PathBuf {
        self.root.join(self.relative_base())
    }

    /// Absolute path of the override file for `virtualhost`.
    #[must_use]
    pub fn virtualhost_path(&self, virtualhost: &str) -> Utf8PathBuf {
        self.root.join(self.relative_virtualhost(virtualhost))
    }

    /// Open the root, or `None` when it does not exist.
    fn open_root(&self) -> ConfigResult<Option<Dir>> {
        match Dir::open_ambient_dir(&self.root, ambient_authority()) {
            Ok(dir) => Ok(Some(dir)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(file_error(&self.root, e)),
        }
    }

    /// Read and parse `relative`, or `None` when it is not a regular file.
    fn read_table(&self, relative: &Utf8Path) -> ConfigResult<Option<Map<String, Value>>> {
        let Some(dir) = self.open_root()? else {
            return Ok(None);
        };
        if !dir.is_file(relative) {
            return Ok(None);
        }
        let path = self.root.join(relative);
        let data = dir
            .read_to_string(relative)
            .map_err(|e| file_error(&path, e))?;
        parse_table(&path, &data).map(Some)
    }
}

impl LayerProvider for DirectoryLayers {
    fn defaults(&self) -> ConfigResult<Layer> {
        let relative = self.relative_defaults();
        let table = self.read_table(&relative)?;
        let path = table.is_some().then(|| self.root.join(&relative));
        Ok(Layer::defaults(
            static_parameters(table.unwrap_or_default()),
            path,
        ))
    }

    fn processor_chains(&self) -> ConfigResult<ChainTable> {
        let relative = self.relative_processors();
        match self.read_table(&relative)? {
            Some(table) => parse_chains(&self.root.join(&relative), table),
            None => Ok(ChainTable::new()),
        }
    }

    fn base(&self) -> ConfigResult<Option<Layer>> {
        let relative = self.relative_base();
        Ok(self
            .read_table(&relative)?
            .map(|table| Layer::base(static_parameters(table), Some(self.root.join(&relative)))))
    }

    fn base_location(&self) -> String {
        self.base_path().into_string()
    }

    fn virtualhost(&self, virtualhost: &str) -> ConfigResult<Option<Layer>> {
        let relative = self.relative_virtualhost(virtualhost);
        Ok(self.read_table(&relative)?.map(|table| {
            Layer::virtualhost(static_parameters(table), Some(self.root.join(&relative)))
        }))
    }

    fn virtualhost_location(&self, virtualhost: &str) -> String {
        self.virtualhost_path(virtualhost).into_string()
    }

    /// Virtualhosts named by `<id>.conf.<ext>` files in the configuration
    /// directory, sorted by name. A missing directory yields an empty list.
    fn list_virtualhosts(&self) -> ConfigResult<Vec<String>> {
        let config_path = self.root.join(&self.config_dir);
        let Some(root) = self.open_root()? else {
            return Ok(Vec::new());
        };
        let dir = match root.open_dir(&self.config_dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(file_error(&config_path, e)),
        };
        let suffix = self.override_suffix();
        let mut virtualhosts = Vec::new();
        for entry in dir.entries().map_err(|e| file_error(&config_path, e))? {
            let name = match entry.and_then(|entry| entry.file_name()) {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(path = %config_path, error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if let Some(id) = name.strip_suffix(&suffix).filter(|id| !id.is_empty()) {
                virtualhosts.push(id.to_owned());
            }
        }
        virtualhosts.sort_unstable();
        Ok(virtualhosts)
    }
}

#[cfg(test)]
mod tests;
