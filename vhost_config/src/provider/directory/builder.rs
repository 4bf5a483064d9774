//! Builder for filesystem layer providers.
//!
//! The builder lets applications rename the files the provider reads before
//! producing a [`DirectoryLayers`] instance.

use camino::Utf8PathBuf;

use super::DirectoryLayers;

/// Builder for [`DirectoryLayers`].
///
/// # Examples
///
/// ```rust
/// use vhost_config::DirectoryLayers;
///
/// let layers = DirectoryLayers::builder("/srv/filesender")
///     .extension("json")
///     .config_dir("etc")
///     .build();
/// assert_eq!(layers.base_path().as_str(), "/srv/filesender/etc/config.json");
/// assert_eq!(
///     layers.virtualhost_path("tenant1").as_str(),
///     "/srv/filesender/etc/tenant1.conf.json"
/// );
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct DirectoryLayersBuilder {
    root: Utf8PathBuf,
    config_dir: String,
    extension: String,
    defaults_stem: String,
    processors_stem: String,
    base_stem: String,
}

impl DirectoryLayersBuilder {
    /// Creates a builder reading from `root` with the default file names.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            config_dir: String::from("config"),
            extension: String::from("toml"),
            defaults_stem: String::from("defaults"),
            processors_stem: String::from("processors"),
            base_stem: String::from("config"),
        }
    }

    /// Sets the directory, relative to the root, holding the base and
    /// virtualhost files.
    pub fn config_dir(mut self, dir: impl Into<String>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Sets the file extension, which also selects the parser.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_owned();
        self
    }

    /// Overrides the stem of the defaults file.
    pub fn defaults_stem(mut self, stem: impl Into<String>) -> Self {
        self.defaults_stem = stem.into();
        self
    }

    /// Overrides the stem of the processor chain file.
    pub fn processors_stem(mut self, stem: impl Into<String>) -> Self {
        self.processors_stem = stem.into();
        self
    }

    /// Overrides the stem of the base configuration file.
    pub fn base_stem(mut self, stem: impl Into<String>) -> Self {
        self.base_stem = stem.into();
        self
    }

    /// Build the provider.
    pub fn build(self) -> DirectoryLayers {
        DirectoryLayers {
            root: self.root,
            config_dir: self.config_dir,
            extension: self.extension,
            defaults_stem: self.defaults_stem,
            processors_stem: self.processors_stem,
            base_stem: self.base_stem,
        }
    }
}
