//! Writers for on-disk configuration trees.
//!
//! [`ConfigTree`] lays files out the way the directory provider expects,
//! using the default names and the `toml` extension.
//!
//! # Examples
//!
//! ```no_run
//! use vhost_config_test_helpers::tree::ConfigTree;
//!
//! # fn run() -> anyhow::Result<()> {
//! let tree = ConfigTree::new("/tmp/vhost-config-demo");
//! tree.base("timeout = 20\nvirtualhost = \"tenant1\"\n")?;
//! tree.virtualhost("tenant1", "timeout = 30\n")?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Configuration root that test files are written into.
#[derive(Clone, Debug)]
pub struct ConfigTree {
    root: Utf8PathBuf,
}

impl ConfigTree {
    /// Use `root` as the configuration root. Nothing is created until a
    /// file is written.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configuration root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write `defaults.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn defaults(&self, contents: &str) -> Result<Utf8PathBuf> {
        self.file("defaults.toml", contents)
    }

    /// Write `processors.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn processors(&self, contents: &str) -> Result<Utf8PathBuf> {
        self.file("processors.toml", contents)
    }

    /// Write `config/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn base(&self, contents: &str) -> Result<Utf8PathBuf> {
        self.file("config/config.toml", contents)
    }

    /// Write `config/<virtualhost>.conf.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn virtualhost(&self, virtualhost: &str, contents: &str) -> Result<Utf8PathBuf> {
        self.file(&format!("config/{virtualhost}.conf.toml"), contents)
    }

    /// Write `relative` under the root, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or the file cannot be written.
    pub fn file(&self, relative: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        std::fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }

    /// Delete `relative` under the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    pub fn remove(&self, relative: &str) -> Result<()> {
        let path = self.root.join(relative);
        std::fs::remove_file(&path).with_context(|| format!("remove {path}"))
    }
}
