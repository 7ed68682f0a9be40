//! Pipeline pattern feature
//!
//! Independent of the other loop passes; may run at any point after the
//! graph is built.

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::*;
