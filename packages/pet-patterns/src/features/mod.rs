//! Feature modules
//!
//! ```text
//! pet_graph                 graph model, ingestion, dependency queries
//! variable_classification   data-sharing classes for suggestion records
//! loop_parallelism          reduction, do-all
//! pipeline_pattern          pipeline score of loops
//! task_parallelism          fork/worker/barrier roles, tasks, taskwaits
//! geometric_decomposition   chunked loop nests
//! ```

pub mod geometric_decomposition;
pub mod loop_parallelism;
pub mod pet_graph;
pub mod pipeline_pattern;
pub mod task_parallelism;
pub mod variable_classification;
