pub mod builder;
pub mod dependency;
pub mod graph;
pub mod workload;

#[cfg(test)]
pub(crate) mod fixtures;

pub use builder::PetGraphBuilder;
pub use dependency::LoopScope;
pub use graph::{EdgeView, PetGraph};
