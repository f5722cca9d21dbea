//! Cycle orchestration

pub mod context;
pub mod scanner;

pub use context::*;
pub use scanner::*;
