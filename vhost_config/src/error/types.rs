//! Primary error enum for layer loading and parameter resolution.

use figment::Error as FigmentError;
use thiserror::Error;

/// Errors that can occur while loading layers or resolving parameters.
///
/// Every variant is fatal to the operation that produced it. The `Display`
/// text carries operator-facing detail; [`ConfigError::code`] gives the stable
/// message code suitable for end users.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A mandatory configuration source could not be found.
    #[error("File {path} not found")]
    MissingConfigSource {
        /// Location of the missing source as reported by the layer provider.
        path: String,
    },

    /// A parameter holds a value of the wrong primitive type.
    #[error("parameter : {key} (expected {expected})")]
    InvalidParameterType {
        /// Parameter whose value has the wrong type.
        key: String,
        /// Name of the type the resolver expected.
        expected: &'static str,
    },

    /// A processor chain names a processor that is not registered.
    #[error("processor : {name}")]
    UnknownProcessor {
        /// Name of the unregistered processor.
        name: String,
    },

    /// A configuration source exists but could not be read or parsed.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: std::path::PathBuf,
        /// Underlying error reported by the reader or parser.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Parsed configuration data does not have the expected shape.
    #[error("Failed to gather configuration: {0}")]
    Gathering(#[from] Box<FigmentError>),

    /// A registered processor rejected the value it was given.
    #[error("processor {name} failed for '{key}': {message}")]
    Processor {
        /// Processor that failed.
        name: String,
        /// Parameter being processed.
        key: String,
        /// Human-readable explanation of the failure.
        message: String,
    },

    /// A deferred computation failed to produce a value.
    #[error("evaluation of '{key}' failed: {message}")]
    Evaluation {
        /// Parameter being evaluated.
        key: String,
        /// Human-readable explanation of the failure.
        message: String,
    },
}
