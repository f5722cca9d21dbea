//! Custom error types for the pipeline

use std::time::Duration;
use thiserror::Error;
use crate::types::VenueId;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid quote from {venue}: {reason}")]
    InvalidQuote {
        venue: VenueId,
        reason: String,
    },

    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    #[error("Venue fetch failed: {venue} - {message}")]
    VenueFetch {
        venue: VenueId,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
        retry_count: u32,
    },

    #[error("Venue fetch timed out: {venue} after {timeout:?}")]
    VenueTimeout {
        venue: VenueId,
        timeout: Duration,
    },

    #[error("Circuit breaker active: {reason}")]
    CircuitBreakerOpen {
        reason: String,
        cooldown_remaining: Duration,
    },

    #[error("Storage error: {context}")]
    Storage {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
