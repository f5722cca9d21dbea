//! Append-only performance ledger shared across scan cycles

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use crate::errors::{PipelineError, PipelineResult};
use crate::storage::{append_jsonl, daily_file};
use crate::types::{LedgerEntry, Strategy, StrategyStats};

const MIN_ADJUSTMENT: Decimal = dec!(0.25);

/// Cloneable handle; every clone appends to the same entry list.
///
/// Appends are serialized by one mutex, which also covers the optional
/// JSONL mirror so file order always matches memory order.
#[derive(Clone)]
pub struct PerformanceLedger {
    entries: Arc<Mutex<Vec<LedgerEntry>>>,
    output_dir: Option<PathBuf>,
    min_samples: u64,
}

impl PerformanceLedger {
    pub fn new(min_samples: u64) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            output_dir: None,
            min_samples,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub async fn append(&self, entry: LedgerEntry) -> PipelineResult<()> {
        let mut entries = self.entries.lock().await;

        if let Some(dir) = &self.output_dir {
            append_jsonl(&daily_file(dir, "ledger", "entries"), &entry).map_err(|source| {
                PipelineError::Storage {
                    context: format!("ledger entry for allocation {}", entry.allocation_id),
                    source,
                }
            })?;
        }

        debug!(
            allocation_id = %entry.allocation_id,
            strategy = %entry.strategy,
            realized = %entry.realized_profit,
            success = entry.success,
            "Ledger entry recorded"
        );
        entries.push(entry);
        Ok(())
    }

    pub async fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn stats(&self, strategy: Strategy) -> StrategyStats {
        let entries = self.entries.lock().await;
        entries
            .iter()
            .filter(|e| e.strategy == strategy)
            .fold(StrategyStats::default(), |mut stats, e| {
                stats.executions += 1;
                stats.successes += u64::from(e.success);
                stats.expected_profit += e.expected_profit;
                stats.realized_profit += e.realized_profit;
                stats
            })
    }

    pub async fn total_realized_profit(&self) -> Decimal {
        self.entries.lock().await.iter().map(|e| e.realized_profit).sum()
    }

    /// Per-strategy multiplier for ranking scores: the strategy's hit rate,
    /// clamped to `[0.25, 1]`. Strategies with fewer than `min_samples`
    /// entries get no adjustment.
    pub async fn confidence_adjustments(&self) -> HashMap<Strategy, Decimal> {
        let mut adjustments = HashMap::new();
        for strategy in [Strategy::CrossVenue, Strategy::MultiHop] {
            let stats = self.stats(strategy).await;
            if stats.executions < self.min_samples.max(1) {
                continue;
            }
            let adjustment = stats.hit_rate().max(MIN_ADJUSTMENT).min(Decimal::ONE);
            info!(
                strategy = %strategy,
                executions = stats.executions,
                adjustment = %adjustment,
                "Ledger confidence adjustment"
            );
            adjustments.insert(strategy, adjustment);
        }
        adjustments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(strategy: Strategy, realized: Decimal, success: bool) -> LedgerEntry {
        LedgerEntry {
            allocation_id: uuid::Uuid::new_v4().to_string(),
            opportunity_id: uuid::Uuid::new_v4().to_string(),
            strategy,
            capital: dec!(1000),
            expected_profit: dec!(10),
            realized_profit: realized,
            success,
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn appends_are_kept_in_order() {
        let ledger = PerformanceLedger::new(1);
        let first = entry(Strategy::CrossVenue, dec!(5), true);
        let second = entry(Strategy::MultiHop, dec!(-2), false);
        let ids = [first.allocation_id.clone(), second.allocation_id.clone()];

        ledger.append(first).await.unwrap();
        ledger.append(second).await.unwrap();

        let recorded: Vec<String> = ledger.entries().await.into_iter().map(|e| e.allocation_id).collect();
        assert_eq!(recorded, ids);
        assert_eq!(ledger.total_realized_profit().await, dec!(3));
    }

    #[tokio::test]
    async fn stats_are_per_strategy() {
        let ledger = PerformanceLedger::new(1);
        ledger.append(entry(Strategy::MultiHop, dec!(8), true)).await.unwrap();
        ledger.append(entry(Strategy::MultiHop, dec!(0), false)).await.unwrap();
        ledger.append(entry(Strategy::CrossVenue, dec!(4), true)).await.unwrap();

        let stats = ledger.stats(Strategy::MultiHop).await;
        assert_eq!(stats.executions, 2);
        assert_eq!(stats.successes, 1);
        assert_eq!(stats.realized_profit, dec!(8));
        assert_eq!(stats.hit_rate(), dec!(0.5));
    }

    #[tokio::test]
    async fn adjustments_need_enough_samples_and_are_clamped() {
        let ledger = PerformanceLedger::new(3);
        for _ in 0..3 {
            ledger.append(entry(Strategy::MultiHop, dec!(-1), false)).await.unwrap();
        }
        ledger.append(entry(Strategy::CrossVenue, dec!(1), true)).await.unwrap();

        let adjustments = ledger.confidence_adjustments().await;
        assert_eq!(adjustments.get(&Strategy::MultiHop), Some(&dec!(0.25)));
        assert_eq!(adjustments.get(&Strategy::CrossVenue), None);
    }

    #[tokio::test]
    async fn concurrent_appends_are_all_recorded() {
        let ledger = PerformanceLedger::new(1);
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let ledger = ledger.clone();
                tokio::spawn(async move {
                    ledger.append(entry(Strategy::CrossVenue, dec!(1), true)).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(ledger.len().await, 16);
    }

    #[tokio::test]
    async fn mirrors_entries_to_jsonl() {
        let dir = std::env::temp_dir().join(format!("arb-pipeline-ledger-{}", uuid::Uuid::new_v4()));
        let ledger = PerformanceLedger::new(1).with_output_dir(&dir);

        ledger.append(entry(Strategy::MultiHop, dec!(2), true)).await.unwrap();

        let contents = std::fs::read_to_string(daily_file(&dir, "ledger", "entries")).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("\"multi_hop\""));
        std::fs::remove_dir_all(&dir).ok();
    }
}
