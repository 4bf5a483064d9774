//! Closed registries consulted by the lazy evaluator.
//!
//! Both registries are populated before a [`crate::Resolver`] is built and are
//! read-only afterwards. Configuration data can only reach code that was
//! registered here by name.

mod builtins;
mod callables;
mod processors;

pub use callables::CallableRegistry;
pub use processors::{Processor, ProcessorError, ProcessorRegistry};

#[cfg(test)]
mod tests;
