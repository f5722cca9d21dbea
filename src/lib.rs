//! Arbitrage Pipeline - opportunity evaluation across trading venues
//!
//! Ingests quotes from multiple venues, finds cross-venue spreads and
//! multi-hop cycles, ranks them by risk-adjusted return and allocates a
//! capital budget under position and strategy caps.

pub mod config;
pub mod types;
pub mod errors;
pub mod network;
pub mod arbitrage;
pub mod allocation;
pub mod ledger;
pub mod engine;
pub mod execution;
pub mod validation;
pub mod utils;
pub mod storage;

#[cfg(test)]
mod test_helpers;

// Re-export commonly used items
pub use config::Config;
pub use errors::{PipelineError, PipelineResult};
pub use types::*;
