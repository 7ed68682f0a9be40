//! PET graph feature
//!
//! Typed multigraph of computation units, functions and loops, plus the
//! read-only query layer every detector builds on.
//!
//! ## Architecture
//! - **Domain**: ingestion records (`CuRecord`, `DependenceRecord`, `PetInput`)
//! - **Infrastructure**: `PetGraph` storage, builder, dependency and
//!   workload queries

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::*;
