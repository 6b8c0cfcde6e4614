//! Filesystem operations: plan building, execution and the copy primitives.

mod execute;
mod helpers;
mod io_copy;
mod metadata;
mod plan;

pub use execute::execute;
pub use helpers::hint_for;
pub use io_copy::{CopyResult, DurabilityMode};
pub use metadata::apply_metadata;
pub use plan::{CopyOperation, CopyPlan, build_plan};
