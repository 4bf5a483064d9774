//! Configuration roots inside a `figment::Jail`.
//!
//! [`with_config_root`] lays out a configuration tree in the jail's
//! temporary directory and points an environment variable at it, so tests
//! that discover the root from the environment stay isolated from each
//! other and from the host.
//!
//! # Examples
//!
//! ```
//! use vhost_config_test_helpers::jail::with_config_root;
//!
//! # fn run() -> anyhow::Result<()> {
//! let found = with_config_root(
//!     "DEMO_CONFIG_DIR",
//!     &[("config/config.toml", "timeout = 20\n")],
//!     |_jail, tree| Ok(std::env::var("DEMO_CONFIG_DIR").ok() == Some(tree.root().to_string())),
//! )?;
//! assert!(found);
//! # Ok(())
//! # }
//! # run().expect("jail runs");
//! ```

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use figment::Jail;

use crate::tree::ConfigTree;

/// Write `files` under a fresh jail directory, set `env_var` to that
/// directory, and run `f` with the jail and the tree.
///
/// `files` pairs a path relative to the root with the file contents. The
/// jail restores the environment once `f` returns.
///
/// # Errors
///
/// Returns an error if the jail directory is not UTF-8, a file cannot be
/// written, or `f` fails.
pub fn with_config_root<F, T>(env_var: &str, files: &[(&str, &str)], f: F) -> Result<T>
where
    F: FnOnce(&mut Jail, &ConfigTree) -> figment::error::Result<T>,
{
    let mut output = None;
    Jail::try_with(|jail| {
        let root = Utf8PathBuf::from_path_buf(jail.directory().to_path_buf()).map_err(|path| {
            figment::Error::from(format!("jail directory {} is not UTF-8", path.display()))
        })?;
        let tree = ConfigTree::new(root);
        for (relative, contents) in files {
            tree.file(relative, contents)
                .map_err(|e| figment::Error::from(format!("{e:#}")))?;
        }
        jail.set_env(env_var, tree.root());
        output = Some(f(jail, &tree)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.context("jail closure did not return a value")
}
