//! Error types and the scan circuit breaker

pub mod pipeline_error;
pub mod circuit_breaker;

pub use pipeline_error::*;
pub use circuit_breaker::*;
