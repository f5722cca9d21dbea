//! Simulated execution

pub mod simulation;

pub use simulation::*;
