//! Display and printing utilities

use rust_decimal::Decimal;
use std::time::Instant;
use tracing::{info, warn};
use crate::{
    errors::CircuitBreaker,
    execution::success_probability_pct,
    ledger::PerformanceLedger,
    types::{AllocationPlan, LedgerEntry, Opportunity, OpportunityKind, Strategy},
};

#[derive(Debug, Clone, Default)]
pub struct SessionCounters {
    pub plans_received: u64,
    pub allocations_executed: u64,
    pub expected_profit: Decimal,
}

pub async fn print_session_stats(
    start_time: Instant,
    counters: &SessionCounters,
    ledger: &PerformanceLedger,
    circuit_breaker: &CircuitBreaker,
) {
    let runtime = start_time.elapsed().as_secs() / 60;

    info!("\n📊 Session Statistics ({} minutes)", runtime);
    info!("   📈 ALLOCATION:");
    info!("     Plans received: {}", counters.plans_received);
    info!("     Allocations executed: {}", counters.allocations_executed);
    info!("     Expected profit: ${:.2}", counters.expected_profit);

    info!("   🧾 LEDGER:");
    for strategy in [Strategy::CrossVenue, Strategy::MultiHop] {
        let stats = ledger.stats(strategy).await;
        info!(
            "     {}: {} executions, hit rate {:.1}%, realized ${:.2} (expected ${:.2})",
            strategy,
            stats.executions,
            stats.hit_rate() * Decimal::ONE_HUNDRED,
            stats.realized_profit,
            stats.expected_profit,
        );
    }
    info!("     Total realized profit: ${:.2}", ledger.total_realized_profit().await);

    info!("   ⚙️  SYSTEM:");
    info!("     Circuit breaker: {}",
        if *circuit_breaker.is_open.read().await { "OPEN" } else { "CLOSED" }
    );
    info!("");
}

pub fn print_opportunity(opportunity: &Opportunity) {
    warn!("\n🎯 {} OPPORTUNITY #{}", opportunity.strategy(), opportunity.id);
    warn!("📍 Route: {}", opportunity.route());
    if let OpportunityKind::SingleHop { buy_venue, sell_venue, buy_price, sell_price } = &opportunity.kind {
        warn!("   Buy on {} at {:.6}, sell on {} at {:.6}", buy_venue, buy_price, sell_venue, sell_price);
    }
    warn!("💰 Profit Analysis:");
    warn!("   Input:    {:.4}", opportunity.input_amount);
    warn!("   Gross:    {:.4}", opportunity.gross_output_amount);
    warn!("   Gas:      {:.4}", opportunity.estimated_gas_cost);
    warn!("   Slippage: {:.4}", opportunity.estimated_slippage_cost);
    warn!("   Net:      {:.4} ({:.3}%)", opportunity.net_profit, opportunity.net_profit_pct);
    warn!("📊 Confidence: {} ({}% success)", opportunity.confidence_score, success_probability_pct(opportunity));
}

pub fn print_allocation_plan(plan: &AllocationPlan) {
    if plan.is_empty() {
        info!("No capital allocated this cycle");
        return;
    }

    warn!("\n🧮 ALLOCATION PLAN #{}", plan.cycle_id);
    warn!("   Assigned ${:.2} of ${:.2}", plan.total_assigned, plan.total_capital);
    for (rank, allocation) in plan.allocations.iter().enumerate() {
        let route = plan
            .opportunity_for(allocation)
            .map(|o| o.route())
            .unwrap_or_default();
        warn!(
            "   {}. [{}] ${:.2} score {:.4} expected ${:.2} via {}",
            rank + 1,
            allocation.strategy,
            allocation.capital_assigned,
            allocation.score,
            allocation.expected_profit,
            route,
        );
    }
}

pub fn print_ledger_entry(entry: &LedgerEntry) {
    if entry.success {
        warn!(
            "✅ Executed {} ({}): realized ${:.2} vs expected ${:.2}",
            entry.allocation_id, entry.strategy, entry.realized_profit, entry.expected_profit
        );
    } else {
        warn!(
            "❌ Execution failed {} ({}): realized ${:.2}",
            entry.allocation_id, entry.strategy, entry.realized_profit
        );
    }
}
