//! Periodic scan loop: fetch, evaluate, publish

use std::sync::Arc;
use std::time::Duration;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use crate::errors::CircuitBreaker;
use crate::network::{fetch_quotes_concurrently, QuoteRequest, QuoteSource, RetryConfig};
use crate::types::AllocationPlan;
use super::{CycleInput, StrategyContext};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanSummary {
    pub cycles_run: u64,
    pub failed_cycles: u64,
    pub skipped_cycles: u64,
    pub plans_published: u64,
}

pub struct Scanner {
    sources: Vec<Arc<dyn QuoteSource>>,
    requests: Vec<QuoteRequest>,
    context: StrategyContext,
    circuit_breaker: CircuitBreaker,
    retry: RetryConfig,
    interval: Duration,
    quote_timeout: Duration,
}

impl Scanner {
    pub fn new(
        sources: Vec<Arc<dyn QuoteSource>>,
        requests: Vec<QuoteRequest>,
        context: StrategyContext,
    ) -> Self {
        let config = context.config();
        let circuit_breaker = CircuitBreaker::new(
            config.max_consecutive_failed_cycles,
            config.circuit_breaker_cooldown_secs,
        );
        let retry = RetryConfig::attempts(config.quote_retry_attempts);
        let interval = Duration::from_secs(config.scan_interval_secs.max(1));
        let quote_timeout = Duration::from_millis(config.quote_timeout_ms);

        Self {
            sources,
            requests,
            context,
            circuit_breaker,
            retry,
            interval,
            quote_timeout,
        }
    }

    /// Shared handle, e.g. for reporting the breaker state.
    pub fn circuit_breaker(&self) -> CircuitBreaker {
        self.circuit_breaker.clone()
    }

    /// Runs until `shutdown` flips to true (or its sender is dropped) or the
    /// plan receiver goes away.
    ///
    /// Shutdown is honoured between cycles and while quotes are being
    /// fetched. Once a snapshot exists the cycle runs to completion, so a
    /// plan is never half built.
    pub async fn run(
        self,
        mut shutdown: watch::Receiver<bool>,
        plans: mpsc::Sender<AllocationPlan>,
    ) -> ScanSummary {
        let mut summary = ScanSummary::default();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            venues = self.sources.len(),
            requests = self.requests.len(),
            interval_secs = self.interval.as_secs(),
            "Scanner started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.changed() => break,
            }
            if *shutdown.borrow() {
                break;
            }

            if let Err(e) = self.circuit_breaker.check().await {
                debug!("Skipping scan: {}", e);
                summary.skipped_cycles += 1;
                continue;
            }

            let outcome = tokio::select! {
                outcome = fetch_quotes_concurrently(
                    &self.sources,
                    &self.requests,
                    self.quote_timeout,
                    &self.retry,
                ) => outcome,
                _ = shutdown.changed() => break,
            };

            if outcome.all_failed() {
                summary.failed_cycles += 1;
                warn!("Every venue failed this cycle");
                if self.circuit_breaker.record_failure().await {
                    error!("Scanning paused until the circuit breaker cools down");
                }
                continue;
            }
            self.circuit_breaker.record_success().await;

            let input = CycleInput::from_config(outcome.quotes, self.context.config());
            let report = self.context.run_cycle(input).await;
            summary.cycles_run += 1;

            if report.plan.is_empty() {
                continue;
            }
            if plans.send(report.plan).await.is_err() {
                warn!("Plan receiver dropped, stopping scanner");
                break;
            }
            summary.plans_published += 1;
        }

        info!(
            cycles = summary.cycles_run,
            failed = summary.failed_cycles,
            skipped = summary.skipped_cycles,
            plans = summary.plans_published,
            "Scanner stopped"
        );
        summary
    }
}
