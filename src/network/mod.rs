//! Venue access: adapters, retry and concurrent fetch

pub mod retry;
pub mod source;
pub mod fetch;
pub mod simulated;

pub use retry::*;
pub use source::*;
pub use fetch::*;
pub use simulated::*;
