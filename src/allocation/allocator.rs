//! Greedy capital allocation under position and strategy caps

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use tracing::{debug, info};
use crate::config::Config;
use crate::types::{Allocation, AllocationPlan, Strategy};
use super::RankedOpportunity;

#[derive(Debug, Clone)]
pub struct AllocatorConfig {
    pub total_capital: Decimal,
    /// Cap per opportunity, in percent of total capital.
    pub max_position_size_pct: Decimal,
    /// Cap per strategy tag, in percent of total capital.
    pub max_strategy_allocation_pct: Decimal,
    /// Allocations smaller than this are not worth executing.
    pub min_allocation: Decimal,
}

impl AllocatorConfig {
    pub fn from_config(config: &Config, total_capital: Decimal) -> Self {
        Self {
            total_capital,
            max_position_size_pct: config.max_position_size_pct,
            max_strategy_allocation_pct: config.max_strategy_allocation_pct,
            min_allocation: config.min_allocation_usd,
        }
    }

    pub fn position_cap(&self) -> Decimal {
        self.total_capital * self.max_position_size_pct / dec!(100)
    }

    pub fn strategy_cap(&self) -> Decimal {
        self.total_capital * self.max_strategy_allocation_pct / dec!(100)
    }
}

/// Walks `ranked` in order, giving each opportunity
/// `min(input, position cap, strategy budget left, capital left)`.
///
/// Entries that would receive nothing (or less than `min_allocation`) are
/// left out of the plan. Breaking a cap is an allocator bug and panics.
pub fn allocate_capital(ranked: Vec<RankedOpportunity>, config: &AllocatorConfig) -> AllocationPlan {
    let total_capital = config.total_capital.max(Decimal::ZERO);
    let position_cap = config.position_cap();
    let strategy_cap = config.strategy_cap();

    let mut remaining_capital = total_capital;
    let mut strategy_used: HashMap<Strategy, Decimal> = HashMap::new();
    let mut allocations = Vec::new();
    let mut opportunities = Vec::new();

    for RankedOpportunity { opportunity, score } in ranked {
        if remaining_capital <= Decimal::ZERO {
            break;
        }

        let strategy = opportunity.strategy();
        let used = strategy_used.get(&strategy).copied().unwrap_or(Decimal::ZERO);
        let strategy_remaining = strategy_cap - used;
        if strategy_remaining <= Decimal::ZERO {
            debug!(strategy = %strategy, "Strategy budget exhausted, skipping {}", opportunity.id);
            continue;
        }

        let capital = opportunity
            .input_amount
            .min(position_cap)
            .min(strategy_remaining)
            .min(remaining_capital);
        if capital <= Decimal::ZERO || capital < config.min_allocation {
            continue;
        }

        remaining_capital -= capital;
        strategy_used.insert(strategy, used + capital);

        assert!(capital <= opportunity.input_amount, "allocation exceeds opportunity input");
        assert!(capital <= position_cap, "allocation exceeds position cap");
        assert!(used + capital <= strategy_cap, "allocation exceeds {} strategy cap", strategy);
        assert!(remaining_capital >= Decimal::ZERO, "allocation exceeds total capital");

        // capital <= input, so the ratio is at most one and the product cannot overflow.
        let expected_profit = opportunity.net_profit * (capital / opportunity.input_amount);
        allocations.push(Allocation {
            id: uuid::Uuid::new_v4().to_string(),
            opportunity_id: opportunity.id.clone(),
            strategy,
            capital_assigned: capital,
            score,
            expected_profit,
        });
        opportunities.push(opportunity);
    }

    let total_assigned: Decimal = allocations.iter().map(|a| a.capital_assigned).sum();
    assert!(total_assigned <= total_capital, "allocations exceed total capital");

    info!(
        allocations = allocations.len(),
        total_assigned = %total_assigned,
        total_capital = %total_capital,
        "Capital allocated"
    );

    AllocationPlan {
        cycle_id: uuid::Uuid::new_v4().to_string(),
        created_at: Utc::now(),
        total_capital,
        total_assigned,
        allocations,
        opportunities,
    }
}
