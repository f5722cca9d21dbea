//! Data persistence and file operations

pub mod jsonl;
pub mod opportunities;
pub mod allocations;

pub use jsonl::*;
pub use opportunities::*;
pub use allocations::*;
