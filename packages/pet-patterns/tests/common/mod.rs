//! Common test utilities for pet-patterns
//!
//! Builders and canned programs shared by the integration tests.

#![allow(dead_code)]

mod builders;
mod fixtures;

pub use builders::*;
pub use fixtures::*;
