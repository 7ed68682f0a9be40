//! Loop parallelism feature: reduction and do-all detection
//!
//! Reduction must be evaluated first; later passes treat reduction loops as
//! already parallel.

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::*;
