//! Trait-based conversions between external error types and `ConfigError`.

use figment::Error as FigmentError;

use super::ConfigError;

/// Convert JSON encoding or decoding failures into
/// [`ConfigError::Gathering`].
impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Gathering(Box::new(FigmentError::from(format!(
            "JSON error: {} at line {}, column {}",
            e,
            e.line(),
            e.column()
        ))))
    }
}

impl From<FigmentError> for ConfigError {
    fn from(e: FigmentError) -> Self {
        Self::Gathering(e.into())
    }
}

impl From<ConfigError> for FigmentError {
    /// Allow using `?` in tests that return `figment::Error`.
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Gathering(fe) => *fe,
            other => Self::from(other.to_string()),
        }
    }
}
