//! Circuit breaker for scan cycles whose venue fetches all fail

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{error, info};
use super::{PipelineError, PipelineResult};

#[derive(Clone)]
pub struct CircuitBreaker {
    pub consecutive_failures: Arc<RwLock<u32>>,
    pub is_open: Arc<RwLock<bool>>,
    pub opened_at: Arc<RwLock<Option<Instant>>>,
    pub max_consecutive_failures: u32,
    pub cooldown_duration: Duration,
}

impl CircuitBreaker {
    pub fn new(max_consecutive_failures: u32, cooldown_secs: u64) -> Self {
        Self {
            consecutive_failures: Arc::new(RwLock::new(0)),
            is_open: Arc::new(RwLock::new(false)),
            opened_at: Arc::new(RwLock::new(None)),
            max_consecutive_failures: max_consecutive_failures.max(1),
            cooldown_duration: Duration::from_secs(cooldown_secs),
        }
    }

    pub async fn record_success(&self) {
        *self.consecutive_failures.write().await = 0;
        *self.is_open.write().await = false;
    }

    /// Returns true when this failure tripped the breaker.
    pub async fn record_failure(&self) -> bool {
        let mut failures = self.consecutive_failures.write().await;
        *failures += 1;

        if *failures >= self.max_consecutive_failures {
            *self.is_open.write().await = true;
            *self.opened_at.write().await = Some(Instant::now());
            error!("Circuit breaker OPEN after {} consecutive failed scan cycles", *failures);
            return true;
        }
        false
    }

    pub async fn check(&self) -> PipelineResult<()> {
        if !*self.is_open.read().await {
            return Ok(());
        }

        let elapsed = self
            .opened_at
            .read()
            .await
            .map(|t| t.elapsed())
            .unwrap_or(self.cooldown_duration);

        if elapsed >= self.cooldown_duration {
            info!("Circuit breaker cooldown complete, resetting");
            *self.is_open.write().await = false;
            *self.consecutive_failures.write().await = 0;
            return Ok(());
        }

        Err(PipelineError::CircuitBreakerOpen {
            reason: format!("{} consecutive failed scan cycles", self.max_consecutive_failures),
            cooldown_remaining: self.cooldown_duration - elapsed,
        })
    }
}
