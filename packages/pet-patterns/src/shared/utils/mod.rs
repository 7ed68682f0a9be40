//! Shared utilities

pub mod similarity;
