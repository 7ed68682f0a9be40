pub mod dependency_classifier;

pub use dependency_classifier::DependencyVariableClassifier;
