//! Test helpers shared across crates.
//!
//! This crate provides configuration tree writers, call counters for
//! deferred parameters, and jailed configuration roots.

pub mod counter;
pub mod jail;
pub mod tree;
