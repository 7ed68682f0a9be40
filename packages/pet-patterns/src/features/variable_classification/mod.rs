//! Variable classification feature
//!
//! Splits the variables of a region into private/shared/first-private,
//! in/out dependency and reduction classes for suggestion records.

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::*;
pub use infrastructure::*;
pub use ports::*;
