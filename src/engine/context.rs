//! One evaluation cycle: quotes in, allocation plan out

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use crate::allocation::{allocate_capital, rank_opportunities, AllocatorConfig};
use crate::arbitrage::{
    evaluate_snapshot, find_cycles, ConfidenceScorer, GasModel, ProfitConfig, QuoteGraph,
    SearchConfig, SearchStats, SettlementPrices,
};
use crate::config::Config;
use crate::ledger::PerformanceLedger;
use crate::storage::{save_allocation_plan, save_opportunity};
use crate::types::{AllocationPlan, Opportunity, RawQuote};
use crate::validation::{ingest_quotes, IngestReport};

const MAX_QUOTE_AGE_SECS: u64 = 86_400;

#[derive(Debug, Clone)]
pub struct CycleInput {
    pub quotes: Vec<RawQuote>,
    pub gas_price_gwei: Decimal,
    pub native_token_price_usd: Decimal,
    pub total_capital: Decimal,
}

impl CycleInput {
    /// Gas and capital inputs taken from configuration.
    pub fn from_config(quotes: Vec<RawQuote>, config: &Config) -> Self {
        Self {
            quotes,
            gas_price_gwei: config.default_gas_price_gwei,
            native_token_price_usd: config.native_token_price_usd,
            total_capital: config.total_capital_usd,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub plan: AllocationPlan,
    pub ingest: IngestReport,
    pub single_hop_found: usize,
    pub multi_hop_found: usize,
    pub search: SearchStats,
}

impl CycleReport {
    pub fn opportunities_found(&self) -> usize {
        self.single_hop_found + self.multi_hop_found
    }
}

/// Everything a cycle needs, passed explicitly instead of living in globals.
#[derive(Clone)]
pub struct StrategyContext {
    config: Config,
    scorer: Arc<dyn ConfidenceScorer>,
    ledger: PerformanceLedger,
    output_dir: Option<PathBuf>,
}

impl StrategyContext {
    pub fn new(config: Config, scorer: Arc<dyn ConfidenceScorer>, ledger: PerformanceLedger) -> Self {
        Self {
            config,
            scorer,
            ledger,
            output_dir: None,
        }
    }

    /// Mirrors every accepted opportunity and plan into JSONL files.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> &PerformanceLedger {
        &self.ledger
    }

    pub async fn run_cycle(&self, input: CycleInput) -> CycleReport {
        let max_age = Duration::seconds(self.config.max_quote_age_secs.min(MAX_QUOTE_AGE_SECS) as i64);
        let (snapshot, ingest) = ingest_quotes(input.quotes, Utc::now(), max_age);

        let gas = GasModel::from_gas_price(
            input.gas_price_gwei,
            self.config.gas_units_per_hop,
            input.native_token_price_usd,
        );
        let profit = ProfitConfig::from_config(&self.config);

        let prices = SettlementPrices::from_snapshot(&snapshot, &self.config.settlement_token);

        let mut opportunities =
            evaluate_snapshot(&snapshot, &prices, &profit, &gas, self.scorer.as_ref());
        let single_hop_found = opportunities.len();

        let graph = QuoteGraph::from_snapshot(&snapshot);
        let search_config = SearchConfig::from_config(&self.config);
        let mut search = SearchStats::default();
        for start in &self.config.start_tokens {
            let result = find_cycles(&graph, &prices, start, &search_config, &gas, self.scorer.as_ref());
            search.edges_explored += result.stats.edges_explored;
            search.branches_pruned += result.stats.branches_pruned;
            search.cycles_completed += result.stats.cycles_completed;
            opportunities.extend(result.opportunities);
        }
        let multi_hop_found = opportunities.len() - single_hop_found;

        self.persist_opportunities(&opportunities);

        let adjustments = self.ledger.confidence_adjustments().await;
        let ranked = rank_opportunities(opportunities, &adjustments);
        let plan = allocate_capital(
            ranked,
            &AllocatorConfig::from_config(&self.config, input.total_capital),
        );

        if !plan.is_empty() {
            if let Some(dir) = &self.output_dir {
                if let Err(e) = save_allocation_plan(dir, &plan) {
                    warn!("Failed to save allocation plan {}: {}", plan.cycle_id, e);
                }
            }
        }

        info!(
            quotes = ingest.accepted,
            venues = snapshot.venues().len(),
            single_hop = single_hop_found,
            multi_hop = multi_hop_found,
            allocations = plan.allocations.len(),
            "Cycle complete"
        );

        CycleReport {
            plan,
            ingest,
            single_hop_found,
            multi_hop_found,
            search,
        }
    }

    fn persist_opportunities(&self, opportunities: &[Opportunity]) {
        let Some(dir) = &self.output_dir else {
            return;
        };
        for opp in opportunities {
            if let Err(e) = save_opportunity(dir, opp) {
                warn!("Failed to save opportunity {}: {}", opp.id, e);
            }
        }
    }
}
