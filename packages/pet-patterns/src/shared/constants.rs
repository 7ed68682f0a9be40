//! Default detection constants

/// Similarity above which a loop is reported as do-all
pub const DEFAULT_DO_ALL_THRESHOLD: f64 = 0.9;

/// Tasks below this workload are merged into a neighbour or their parent
pub const DEFAULT_WORKLOAD_THRESHOLD: u64 = 10_000;

/// Fewer children than this triggers hoisting of the heaviest child
pub const DEFAULT_MIN_PARALLELISM: usize = 3;

/// Maximum line gap between two tasks that still counts as adjacent
pub const DEFAULT_NEIGHBOUR_LINE_GAP: u32 = 2;

/// All-ones 14-bit line number emitted for synthetic FORK nodes
pub const FORK_SENTINEL_LINE: u32 = 16_383;

/// Safety cap for the barrier fixpoint pass
pub const DEFAULT_MAX_FIXPOINT_ITERATIONS: usize = 10_000;

/// Name of the FUNC node the task tree is rooted at
pub const DEFAULT_ENTRY_FUNCTION: &str = "main";

/// Pragma text attached to geometric decomposition suggestions
pub const GEOMETRIC_DECOMPOSITION_PRAGMA: &str =
    "for (i = 0; i < num-tasks; i++) #pragma omp task";
