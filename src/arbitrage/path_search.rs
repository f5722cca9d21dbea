//! Depth-bounded multi-hop cycle search

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use crate::config::{Config, MAX_HOPS, MIN_HOPS};
use crate::types::{CycleEconomics, Opportunity, OpportunityKind, Quote, TokenId, VenueId};
use super::{ConfidenceScorer, GasModel, ProfitConfig, QuoteGraph, SettlementPrices};

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub max_hops: usize,
    /// Settlement value pushed through every candidate cycle, converted
    /// into the start token before the first hop.
    pub trade_size: Decimal,
    pub profit: ProfitConfig,
}

impl SearchConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_hops: config.max_hops,
            trade_size: config.trade_size_usd,
            profit: ProfitConfig::from_config(config),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchStats {
    pub edges_explored: usize,
    pub branches_pruned: usize,
    pub cycles_completed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub opportunities: Vec<Opportunity>,
    pub stats: SearchStats,
}

/// Outcome of pushing the frontier amount across one edge.
struct Step {
    amount: Decimal,
    /// Settlement value of `amount`, when its token is priced.
    value: Option<Decimal>,
    gas_cost: Decimal,
    slippage_cost: Decimal,
}

/// Partial path being extended by the search.
struct Frontier<'g> {
    tokens: Vec<&'g TokenId>,
    venues: Vec<&'g VenueId>,
    amount: Decimal,
    gas_cost: Decimal,
    slippage_cost: Decimal,
}

struct Search<'g, 'a> {
    graph: &'g QuoteGraph,
    prices: &'a SettlementPrices,
    start: &'g TokenId,
    config: &'a SearchConfig,
    gas: &'a GasModel,
    scorer: &'a dyn ConfidenceScorer,
    result: SearchResult,
}

/// Enumerates simple cycles `start -> ... -> start` of 2..=`max_hops` legs.
///
/// Every hop converts the running amount at the edge's quoted rate and adds
/// that venue's gas plus slippage on the trade size. A branch is pruned as
/// soon as its running amount hits zero or overflows, or once its
/// accumulated cost reaches the settlement value of what it still holds.
/// Tokens without a settlement price are carried through unvalued. The
/// start token must be priced. Intermediate tokens never repeat within a
/// path.
pub fn find_cycles(
    graph: &QuoteGraph,
    prices: &SettlementPrices,
    start: &TokenId,
    config: &SearchConfig,
    gas: &GasModel,
    scorer: &dyn ConfidenceScorer,
) -> SearchResult {
    if !(MIN_HOPS..=MAX_HOPS).contains(&config.max_hops)
        || config.trade_size <= Decimal::ZERO
        || !graph.contains_token(start)
    {
        return SearchResult::default();
    }
    let Some(start_amount) = prices
        .from_settlement(start, config.trade_size)
        .filter(|amount| *amount > Decimal::ZERO)
    else {
        debug!(start = %start, settlement = %prices.settlement(), "Start token has no settlement price");
        return SearchResult::default();
    };

    let mut search = Search {
        graph,
        prices,
        start,
        config,
        gas,
        scorer,
        result: SearchResult::default(),
    };
    let root = Frontier {
        tokens: vec![start],
        venues: Vec::new(),
        amount: start_amount,
        gas_cost: Decimal::ZERO,
        slippage_cost: Decimal::ZERO,
    };
    search.extend(&root);

    debug!(
        start = %start,
        explored = search.result.stats.edges_explored,
        pruned = search.result.stats.branches_pruned,
        cycles = search.result.stats.cycles_completed,
        found = search.result.opportunities.len(),
        "Multi-hop search finished"
    );

    search.result
}

impl<'g> Search<'g, '_> {
    fn extend(&mut self, frontier: &Frontier<'g>) {
        let Some(current) = frontier.tokens.last() else {
            return;
        };
        let hops = frontier.venues.len() + 1;
        let hop_slippage = self.config.profit.slippage_cost(self.config.trade_size);

        for edge in self.graph.edges_from(current) {
            self.result.stats.edges_explored += 1;

            let next = edge.token_out();
            let Some(step) = self.step(frontier, edge, hop_slippage) else {
                self.result.stats.branches_pruned += 1;
                continue;
            };

            if next == self.start {
                if hops >= MIN_HOPS {
                    // The start token is always priced, so the value is known.
                    if let Some(value) = step.value {
                        self.complete(frontier, edge.venue_id(), value, step.gas_cost, step.slippage_cost);
                    }
                }
                continue;
            }

            if hops >= self.config.max_hops || frontier.tokens.contains(&next) {
                continue;
            }

            let mut tokens = frontier.tokens.clone();
            tokens.push(next);
            let mut venues = frontier.venues.clone();
            venues.push(edge.venue_id());
            self.extend(&Frontier {
                tokens,
                venues,
                amount: step.amount,
                gas_cost: step.gas_cost,
                slippage_cost: step.slippage_cost,
            });
        }
    }

    /// Applies one edge to the frontier, or `None` when the branch must be
    /// pruned.
    fn step(&self, frontier: &Frontier<'g>, edge: &Quote, hop_slippage: Decimal) -> Option<Step> {
        let amount = edge.amount_out_for(frontier.amount)?;
        if amount <= Decimal::ZERO {
            return None;
        }
        let gas_cost = frontier.gas_cost.checked_add(self.gas.leg_cost(edge.venue_id()))?;
        let slippage_cost = frontier.slippage_cost.checked_add(hop_slippage)?;
        let cost = gas_cost.checked_add(slippage_cost)?;

        let value = match self.prices.price(edge.token_out()) {
            Some(price) => Some(amount.checked_mul(price)?),
            None => None,
        };
        if value.is_some_and(|value| cost >= value) {
            return None;
        }

        Some(Step {
            amount,
            value,
            gas_cost,
            slippage_cost,
        })
    }

    fn complete(
        &mut self,
        frontier: &Frontier<'g>,
        closing_venue: &'g VenueId,
        gross_output_amount: Decimal,
        gas_cost: Decimal,
        slippage_cost: Decimal,
    ) {
        self.result.stats.cycles_completed += 1;

        let economics = CycleEconomics {
            input_amount: self.config.trade_size,
            gross_output_amount,
            gas_cost,
            slippage_cost,
        };
        if !self.config.profit.accepts(&economics) {
            return;
        }

        let mut token_path: Vec<TokenId> = frontier.tokens.iter().map(|t| (*t).clone()).collect();
        token_path.push(self.start.clone());
        let mut venue_path: Vec<VenueId> = frontier.venues.iter().map(|v| (*v).clone()).collect();
        venue_path.push(closing_venue.clone());

        let kind = OpportunityKind::MultiHop { hops: venue_path.len() };
        let confidence = self.scorer.score(&kind);
        let Some(opportunity) = Opportunity::new(kind, token_path, venue_path, economics, confidence) else {
            return;
        };

        debug!(
            route = %opportunity.route(),
            net_profit = %opportunity.net_profit,
            confidence = %opportunity.confidence_score,
            "Multi-hop opportunity"
        );
        self.result.opportunities.push(opportunity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrage::HopPenaltyScorer;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn edge(venue: &str, from: &str, to: &str, rate: Decimal) -> Quote {
        Quote::new(
            VenueId::new(venue),
            TokenId::new(from),
            TokenId::new(to),
            dec!(1),
            rate,
            Utc::now(),
        )
        .unwrap()
    }

    fn config(max_hops: usize) -> SearchConfig {
        SearchConfig {
            max_hops,
            trade_size: dec!(10000),
            profit: ProfitConfig {
                min_profit_pct: dec!(0.5),
                min_profit_usd: Decimal::ZERO,
                max_slippage_bps: 0,
            },
        }
    }

    /// Graph over `quotes` together with the USDC prices they imply.
    fn market(quotes: Vec<Quote>) -> (QuoteGraph, SettlementPrices) {
        let prices = SettlementPrices::from_quotes(&quotes, &TokenId::new("USDC"));
        (QuoteGraph::from_quotes(quotes), prices)
    }

    fn search(market: &(QuoteGraph, SettlementPrices), max_hops: usize, gas: &GasModel) -> SearchResult {
        let (graph, prices) = market;
        find_cycles(
            graph,
            prices,
            &TokenId::new("USDC"),
            &config(max_hops),
            gas,
            &HopPenaltyScorer::default(),
        )
    }

    fn triangle() -> (QuoteGraph, SettlementPrices) {
        // 1.01 * 1.0 * 1.01 - 1 = 2.01% round trip
        market(vec![
            edge("V1", "USDC", "TOKEN_A", dec!(1.01)),
            edge("V2", "TOKEN_A", "TOKEN_B", dec!(1.0)),
            edge("V3", "TOKEN_B", "USDC", dec!(1.01)),
        ])
    }

    #[test]
    fn finds_the_triangle() {
        let result = search(&triangle(), 3, &GasModel::default());

        assert_eq!(result.opportunities.len(), 1);
        let opp = &result.opportunities[0];
        let tokens: Vec<&str> = opp.token_path.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(tokens, vec!["USDC", "TOKEN_A", "TOKEN_B", "USDC"]);
        assert_eq!(
            opp.venue_path,
            vec![VenueId::new("V1"), VenueId::new("V2"), VenueId::new("V3")]
        );
        assert_eq!(opp.kind, OpportunityKind::MultiHop { hops: 3 });
        assert_eq!(opp.net_profit, dec!(201));
        assert_eq!(opp.confidence_score, dec!(0.75));
    }

    #[test]
    fn hop_limit_hides_longer_cycles() {
        let result = search(&triangle(), 2, &GasModel::default());
        assert!(result.opportunities.is_empty());
    }

    #[test]
    fn intermediate_tokens_never_repeat() {
        let graph = market(vec![
            edge("V1", "USDC", "A", dec!(1.1)),
            edge("V1", "A", "B", dec!(1.1)),
            edge("V1", "B", "A", dec!(1.1)),
            edge("V1", "A", "USDC", dec!(1.1)),
        ]);
        let result = search(&graph, 4, &GasModel::default());

        // USDC->A->USDC only; USDC->A->B->A->USDC revisits A.
        assert_eq!(result.opportunities.len(), 1);
        assert_eq!(result.opportunities[0].token_path.len(), 3);
    }

    #[test]
    fn non_closing_paths_are_never_returned() {
        let graph = market(vec![
            edge("V1", "USDC", "A", dec!(2)),
            edge("V1", "A", "B", dec!(2)),
        ]);
        let result = search(&graph, 4, &GasModel::default());
        assert!(result.opportunities.is_empty());
        assert_eq!(result.stats.cycles_completed, 0);
    }

    #[test]
    fn prunes_when_gas_swallows_the_trade() {
        let gas = GasModel::flat(dec!(6000));
        let result = search(&triangle(), 3, &gas);
        assert!(result.opportunities.is_empty());
        assert!(result.stats.branches_pruned > 0);
        // Second hop would push cost to 12000 >= 10201 held, so the cycle never completes.
        assert_eq!(result.stats.cycles_completed, 0);
    }

    #[test]
    fn prunes_once_cost_exceeds_the_value_still_held() {
        // Half the trade remains after the second hop; gas is a fraction of the trade size.
        let market = market(vec![
            edge("V1", "USDC", "A", dec!(1)),
            edge("V2", "A", "USDC", dec!(0.1)),
        ]);
        let result = search(&market, 2, &GasModel::flat(dec!(1500)));
        assert!(result.opportunities.is_empty());
        assert_eq!(result.stats.cycles_completed, 0);
        assert!(result.stats.branches_pruned >= 1);
    }

    #[test]
    fn overflowing_branch_is_pruned() {
        let market = market(vec![
            edge("V1", "USDC", "A", dec!(1_000_000_000_000_000)),
            edge("V2", "A", "B", dec!(1_000_000_000_000_000)),
            edge("V3", "B", "USDC", dec!(0.000000000000000000000000001)),
        ]);
        let result = search(&market, 3, &GasModel::default());
        assert!(result.opportunities.is_empty());
        assert!(result.stats.branches_pruned >= 1);
    }

    #[test]
    fn trade_size_is_converted_into_a_priced_start_token() {
        // WETH is worth 2000 USDC, so 10000 USDC of trade size is 5 WETH.
        let (graph, prices) = market(vec![
            edge("V0", "WETH", "USDC", dec!(2000)),
            edge("V1", "WETH", "DAI", dec!(2000)),
            edge("V2", "DAI", "WETH", dec!(0.000505)),
        ]);
        let result = find_cycles(
            &graph,
            &prices,
            &TokenId::new("WETH"),
            &config(2),
            &GasModel::default(),
            &HopPenaltyScorer::default(),
        );

        let weth_cycle = result
            .opportunities
            .iter()
            .find(|opp| opp.venue_path == vec![VenueId::new("V1"), VenueId::new("V2")])
            .unwrap();
        assert_eq!(weth_cycle.input_amount, dec!(10000));
        // 5 WETH -> 10000 DAI -> 5.05 WETH, worth 10100 USDC.
        assert_eq!(weth_cycle.gross_output_amount, dec!(10100));
        assert_eq!(weth_cycle.net_profit, dec!(100));
    }

    #[test]
    fn unpriced_start_or_bad_hops_yield_nothing() {
        let (graph, prices) = triangle();
        let gas = GasModel::default();
        let scorer = HopPenaltyScorer::default();
        assert!(find_cycles(&graph, &prices, &TokenId::new("DAI"), &config(3), &gas, &scorer)
            .opportunities
            .is_empty());
        assert!(find_cycles(&graph, &prices, &TokenId::new("USDC"), &config(1), &gas, &scorer)
            .opportunities
            .is_empty());
        assert!(find_cycles(&graph, &prices, &TokenId::new("USDC"), &config(5), &gas, &scorer)
            .opportunities
            .is_empty());

        let unpriced = SettlementPrices::settlement_only(TokenId::new("DAI"));
        assert!(find_cycles(&graph, &unpriced, &TokenId::new("USDC"), &config(3), &gas, &scorer)
            .opportunities
            .is_empty());
    }
}
