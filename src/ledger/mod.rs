//! Realized performance tracking

pub mod performance;

pub use performance::*;
