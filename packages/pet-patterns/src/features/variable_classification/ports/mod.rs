//! Variable classification port
use petgraph::stable_graph::NodeIndex;

use crate::features::pet_graph::PetGraph;
use crate::features::variable_classification::domain::{PatternContext, VariableClassification};
use crate::shared::models::{AnalysisFacts, Variable};

/// Port trait for variable classifiers
///
/// Detectors treat the classifier as an opaque service; alternative
/// implementations (e.g. backed by a points-to analysis) plug in here.
pub trait VariableClassifier: Send + Sync {
    /// Classify the variables of `node`
    ///
    /// `seed_private`/`seed_shared` are caller-known classes; they lead the
    /// respective output lists.
    fn classify(
        &self,
        graph: &PetGraph,
        facts: &AnalysisFacts,
        node: NodeIndex,
        context: PatternContext,
        seed_private: &[Variable],
        seed_shared: &[Variable],
    ) -> VariableClassification;
}
