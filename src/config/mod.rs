//! Configuration management for the arbitrage pipeline

pub mod settings;

pub use settings::*;
