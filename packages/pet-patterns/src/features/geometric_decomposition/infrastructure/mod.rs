pub mod chunk_limit;
pub mod detector;

pub use chunk_limit::{chunk_limit, inner_loops, LoopIterationCache};
pub use detector::{estimate_num_tasks, GeometricDecompositionDetector};
