//! Error types produced by the configuration resolver.

mod constructors;
mod conversions;
mod types;

pub use types::ConfigError;

#[cfg(test)]
mod tests;
