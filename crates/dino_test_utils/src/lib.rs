//! # Dino Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Battle fixtures and builders
//! - Store fakes (flaky, slow)
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod stores;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
