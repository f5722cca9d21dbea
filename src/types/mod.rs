//! Core data types and structures

pub mod quote;
pub mod snapshot;
pub mod opportunity;
pub mod allocation;
pub mod ledger;

pub use quote::*;
pub use snapshot::*;
pub use opportunity::*;
pub use allocation::*;
pub use ledger::*;
