//! Opportunity ranking and capital allocation

pub mod ranker;
pub mod allocator;

pub use ranker::*;
pub use allocator::*;
