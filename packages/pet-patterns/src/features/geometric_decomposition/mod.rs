//! Geometric decomposition feature
//!
//! Loop nests whose loops are all do-all or reduction are reported with a
//! chunk limit and a task-count estimate.

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::*;
