//! Error constructors shared by the filesystem provider.

use crate::ConfigError;

use std::error::Error;
use std::sync::Arc;

use camino::Utf8Path;

/// Construct a [`ConfigError::File`] for a configuration path.
pub(super) fn file_error(
    path: &Utf8Path,
    err: impl Into<Box<dyn Error + Send + Sync>>,
) -> Arc<ConfigError> {
    Arc::new(ConfigError::File {
        path: path.as_std_path().to_path_buf(),
        source: err.into(),
    })
}

pub(super) fn invalid_data(path: &Utf8Path, msg: impl Into<String>) -> Arc<ConfigError> {
    file_error(
        path,
        std::io::Error::new(std::io::ErrorKind::InvalidData, msg.into()),
    )
}
