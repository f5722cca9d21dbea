//! Quote validation at ingestion

pub mod quotes;

pub use quotes::*;
