pub mod role;
pub mod suggestion;
pub mod task;

pub use role::{MwType, RoleMap};
pub use suggestion::{ParallelRegionInfo, TaskParallelismResult, TaskPragma, TaskSuggestion};
pub use task::Task;
