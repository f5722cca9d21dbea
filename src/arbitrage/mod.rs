//! Opportunity discovery: cross-venue evaluation and multi-hop cycle search

pub mod gas;
pub mod profit;
pub mod valuation;
pub mod scoring;
pub mod evaluator;
pub mod graph;
pub mod path_search;

pub use gas::*;
pub use profit::*;
pub use valuation::*;
pub use scoring::*;
pub use evaluator::*;
pub use graph::*;
pub use path_search::*;
