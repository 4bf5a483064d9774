//! Constructors and classification helpers for `ConfigError`.

use std::sync::Arc;

use figment::Error as FigmentError;

use super::ConfigError;

impl ConfigError {
    /// Stable, user-facing message code for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use vhost_config::ConfigError;
    /// let e = ConfigError::missing_source("config/config.toml");
    /// assert_eq!(e.code(), "config_file_missing");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingConfigSource { .. } => "config_file_missing",
            Self::InvalidParameterType { .. } => "config_bad_parameter",
            Self::UnknownProcessor { .. } => "config_unknown_processor",
            Self::File { .. } | Self::Gathering(_) => "config_file_invalid",
            Self::Processor { .. } => "config_processor_failed",
            Self::Evaluation { .. } => "config_evaluation_failed",
        }
    }

    /// Construct a [`ConfigError::MissingConfigSource`] for `path`.
    #[must_use]
    pub fn missing_source(path: impl Into<String>) -> Self {
        Self::MissingConfigSource { path: path.into() }
    }

    /// Construct a [`ConfigError::InvalidParameterType`].
    #[must_use]
    pub fn invalid_type(key: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidParameterType {
            key: key.into(),
            expected,
        }
    }

    /// Construct a [`ConfigError::UnknownProcessor`].
    #[must_use]
    pub fn unknown_processor(name: impl Into<String>) -> Self {
        Self::UnknownProcessor { name: name.into() }
    }

    /// Construct a [`ConfigError::Evaluation`].
    ///
    /// Deferred computations use this to report their own failures.
    ///
    /// ```
    /// use vhost_config::ConfigError;
    /// let e = ConfigError::evaluation("quota", "backend unreachable");
    /// assert_eq!(e.to_string(), "evaluation of 'quota' failed: backend unreachable");
    /// ```
    #[must_use]
    pub fn evaluation(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Evaluation {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Construct a gathering error from a [`figment::Error`].
    #[must_use]
    pub fn gathering(source: FigmentError) -> Self {
        Self::Gathering(Box::new(source))
    }

    /// Wrap `self` in an [`Arc`] for use in a [`crate::ConfigResult`].
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
