//! Simulated execution of allocations, feeding the performance ledger

use rand::Rng;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::time::Duration;
use tracing::info;
use crate::types::{Allocation, LedgerEntry, Opportunity};

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub base_latency_ms: u64,
    /// Extra latency per leg beyond the second.
    pub latency_per_extra_leg_ms: u64,
    /// Upper bound of the random execution slippage on success.
    pub max_execution_slippage_bps: i64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            base_latency_ms: 100,
            latency_per_extra_leg_ms: 50,
            max_execution_slippage_bps: 50,
        }
    }
}

/// Plays out one allocation. It succeeds with probability equal to the
/// opportunity's confidence score; a success realizes the expected profit
/// minus random execution slippage, a failure loses the pro-rated gas.
pub async fn simulate_allocation(
    allocation: &Allocation,
    opportunity: &Opportunity,
    config: &SimulationConfig,
) -> LedgerEntry {
    let extra_legs = opportunity.kind.legs().saturating_sub(2) as u64;
    let latency = config.base_latency_ms + config.latency_per_extra_leg_ms * extra_legs;

    let confidence = opportunity.confidence_score.to_f64().unwrap_or(0.0);
    let is_successful = rand::random::<f64>() < confidence;
    let slippage_bps = rand::rng().random_range(0..=config.max_execution_slippage_bps.max(0));

    tokio::time::sleep(Duration::from_millis(latency)).await;

    let realized_profit = if is_successful {
        allocation.expected_profit - allocation.capital_assigned * Decimal::new(slippage_bps, 4)
    } else if opportunity.input_amount.is_zero() {
        Decimal::ZERO
    } else {
        -opportunity.estimated_gas_cost * allocation.capital_assigned / opportunity.input_amount
    };

    info!(
        allocation_id = %allocation.id,
        strategy = %allocation.strategy,
        success = is_successful,
        realized = %realized_profit.round_dp(2),
        "Simulated execution"
    );

    LedgerEntry::record(allocation, realized_profit, is_successful)
}

/// Success probability implied by a score, for display.
pub fn success_probability_pct(opportunity: &Opportunity) -> Decimal {
    (opportunity.confidence_score * dec!(100)).round_dp(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::Strategy;

    fn instant() -> SimulationConfig {
        SimulationConfig {
            base_latency_ms: 0,
            latency_per_extra_leg_ms: 0,
            max_execution_slippage_bps: 0,
        }
    }

    fn allocation_for(opportunity: &Opportunity, capital: Decimal) -> Allocation {
        Allocation {
            id: "alloc-1".to_string(),
            opportunity_id: opportunity.id.clone(),
            strategy: opportunity.strategy(),
            capital_assigned: capital,
            score: Decimal::ONE,
            expected_profit: opportunity.net_profit * capital / opportunity.input_amount,
        }
    }

    #[tokio::test]
    async fn certain_opportunity_realizes_expected_profit() {
        let opp = multi_hop(2, dec!(1000), dec!(1020), Decimal::ONE);
        let allocation = allocation_for(&opp, dec!(500));

        let entry = simulate_allocation(&allocation, &opp, &instant()).await;

        assert!(entry.success);
        assert_eq!(entry.realized_profit, dec!(10));
        assert_eq!(entry.strategy, Strategy::MultiHop);
    }

    #[tokio::test]
    async fn hopeless_opportunity_loses_gas() {
        let mut opp = multi_hop(2, dec!(1000), dec!(1020), Decimal::ZERO);
        opp.estimated_gas_cost = dec!(4);
        let allocation = allocation_for(&opp, dec!(500));

        let entry = simulate_allocation(&allocation, &opp, &instant()).await;

        assert!(!entry.success);
        assert_eq!(entry.realized_profit, dec!(-2));
    }

    #[test]
    fn probability_is_confidence_in_percent() {
        let opp = single_hop(dec!(1000), dec!(1020), dec!(0.85));
        assert_eq!(success_probability_pct(&opp), dec!(85.0));
    }
}
