//! Performance ledger record types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use super::{Allocation, Strategy};

/// Realized outcome of one executed allocation.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub allocation_id: String,
    pub opportunity_id: String,
    pub strategy: Strategy,
    pub capital: Decimal,
    pub expected_profit: Decimal,
    pub realized_profit: Decimal,
    pub success: bool,
    pub recorded_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn record(allocation: &Allocation, realized_profit: Decimal, success: bool) -> Self {
        Self {
            allocation_id: allocation.id.clone(),
            opportunity_id: allocation.opportunity_id.clone(),
            strategy: allocation.strategy,
            capital: allocation.capital_assigned,
            expected_profit: allocation.expected_profit,
            realized_profit,
            success,
            recorded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StrategyStats {
    pub executions: u64,
    pub successes: u64,
    pub expected_profit: Decimal,
    pub realized_profit: Decimal,
}

impl StrategyStats {
    pub fn hit_rate(&self) -> Decimal {
        if self.executions == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.successes) / Decimal::from(self.executions)
    }
}
