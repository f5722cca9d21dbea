//! Logging and console reporting

pub mod logging;
pub mod display;

pub use logging::*;
pub use display::*;
