//! Risk-adjusted opportunity ranking

use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;
use crate::types::{Opportunity, Strategy};

#[derive(Debug, Clone)]
pub struct RankedOpportunity {
    pub opportunity: Opportunity,
    pub score: Decimal,
}

/// `net_profit_pct * confidence * adjustment`; the adjustment is the
/// ledger's view of how reliably the strategy has realized its estimates.
pub fn risk_adjusted_score(opportunity: &Opportunity, adjustment: Decimal) -> Decimal {
    opportunity.net_profit_pct * opportunity.confidence_score * adjustment
}

/// Orders opportunities by descending score, then descending net profit.
/// The sort is stable, so full ties keep their scan order.
pub fn rank_opportunities(
    opportunities: Vec<Opportunity>,
    adjustments: &HashMap<Strategy, Decimal>,
) -> Vec<RankedOpportunity> {
    let mut ranked: Vec<RankedOpportunity> = opportunities
        .into_iter()
        .map(|opportunity| {
            let adjustment = adjustments
                .get(&opportunity.strategy())
                .copied()
                .unwrap_or(Decimal::ONE);
            RankedOpportunity {
                score: risk_adjusted_score(&opportunity, adjustment),
                opportunity,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.opportunity.net_profit.cmp(&a.opportunity.net_profit))
    });

    debug!("Ranked {} opportunities", ranked.len());
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use rust_decimal_macros::dec;

    fn multi(gross: Decimal, confidence: Decimal) -> Opportunity {
        multi_hop(3, dec!(1000), gross, confidence)
    }

    #[test]
    fn sorts_by_score_descending() {
        let ranked = rank_opportunities(
            vec![
                multi(dec!(1010), dec!(1)),   // 1% * 1 = 1
                multi(dec!(1030), dec!(0.5)), // 3% * 0.5 = 1.5
                multi(dec!(1020), dec!(0.9)), // 2% * 0.9 = 1.8
            ],
            &HashMap::new(),
        );
        let scores: Vec<Decimal> = ranked.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![dec!(1.8), dec!(1.5), dec!(1)]);
    }

    #[test]
    fn score_ties_break_on_profit_then_scan_order() {
        let a = multi_hop(2, dec!(1000), dec!(1020), dec!(0.5));
        let b = multi(dec!(1020), dec!(0.5));
        let c = multi(dec!(1010), dec!(1));
        let ids = [a.id.clone(), b.id.clone(), c.id.clone()];

        let ranked = rank_opportunities(vec![c, a, b], &HashMap::new());
        let order: Vec<&str> = ranked.iter().map(|r| r.opportunity.id.as_str()).collect();

        // All score 1.0; a and b out-earn c, a was scanned before b.
        assert_eq!(order, vec![ids[0].as_str(), ids[1].as_str(), ids[2].as_str()]);
    }

    #[test]
    fn adjustment_demotes_a_strategy() {
        let single = single_hop(dec!(1000), dec!(1030), dec!(0.85));
        let routed = multi(dec!(1020), dec!(0.75));

        let adjustments = HashMap::from([(Strategy::CrossVenue, dec!(0.25))]);
        let ranked = rank_opportunities(vec![single, routed], &adjustments);

        assert_eq!(ranked[0].opportunity.strategy(), Strategy::MultiHop);
    }
}
