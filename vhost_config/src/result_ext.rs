//! Extensions for mapping errors to `ConfigResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(ConfigError::…(e)))`
//! patterns when converting external error types into the crate's
//! `ConfigResult<T>` alias (`Result<T, Arc<ConfigError>>`).
//!
//! # Examples
//!
//! ```
//! use vhost_config::{ConfigResult, ConfigResultExt};
//!
//! fn port() -> ConfigResult<u16> {
//!     // serde_json::Error implements Into<ConfigError>
//!     serde_json::from_value(serde_json::json!(8080)).into_config()
//! }
//! # assert_eq!(port().ok(), Some(8080));
//! ```

use crate::{ConfigError, ConfigResult};
use std::sync::Arc;

/// Generic extension for mapping any `Result<T, E>` with `E: Into<ConfigError>`
/// into a `ConfigResult<T>`.
pub trait ConfigResultExt<T, E> {
    /// Convert `Result<T, E>` into `ConfigResult<T>` using `Into<ConfigError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<ConfigError>`.
    fn into_config(self) -> ConfigResult<T>;
}

impl<T, E> ConfigResultExt<T, E> for Result<T, E>
where
    E: Into<ConfigError>,
{
    fn into_config(self) -> ConfigResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}

/// Convert shared resolver errors into `figment::Error`, the error type of
/// closures run inside a `figment::Jail`.
pub trait ResultIntoFigment<T> {
    /// Map the `Arc<ConfigError>` error into a `figment::Error`.
    ///
    /// A gathering error held by no one else is unwrapped to the
    /// `figment::Error` it carries; anything else keeps its message text.
    ///
    /// # Errors
    ///
    /// Returns the converted `figment::Error`.
    fn to_figment(self) -> Result<T, figment::Error>;
}

impl<T> ResultIntoFigment<T> for Result<T, Arc<ConfigError>> {
    fn to_figment(self) -> Result<T, figment::Error> {
        self.map_err(|e| {
            Arc::try_unwrap(e).map_or_else(
                |shared| figment::Error::from(shared.to_string()),
                figment::Error::from,
            )
        })
    }
}
