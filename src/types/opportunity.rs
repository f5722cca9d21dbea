//! Arbitrage opportunity types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;
use super::{TokenId, VenueId};

/// Strategy tag used for per-strategy capital caps and ledger statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    CrossVenue,
    MultiHop,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::CrossVenue => f.write_str("cross_venue"),
            Strategy::MultiHop => f.write_str("multi_hop"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpportunityKind {
    /// Buy token_in where it is cheapest, sell it where it is dearest.
    SingleHop {
        buy_venue: VenueId,
        sell_venue: VenueId,
        buy_price: Decimal,
        sell_price: Decimal,
    },
    MultiHop {
        hops: usize,
    },
}

impl OpportunityKind {
    pub fn strategy(&self) -> Strategy {
        match self {
            OpportunityKind::SingleHop { .. } => Strategy::CrossVenue,
            OpportunityKind::MultiHop { .. } => Strategy::MultiHop,
        }
    }

    /// Number of swap legs the executor has to land.
    pub fn legs(&self) -> usize {
        match self {
            OpportunityKind::SingleHop { .. } => 2,
            OpportunityKind::MultiHop { hops } => *hops,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Opportunity {
    pub id: String,
    pub detected_at: DateTime<Utc>,
    pub kind: OpportunityKind,
    pub token_path: Vec<TokenId>,
    pub venue_path: Vec<VenueId>,
    pub input_amount: Decimal,
    pub gross_output_amount: Decimal,
    pub estimated_gas_cost: Decimal,
    pub estimated_slippage_cost: Decimal,
    pub net_profit: Decimal,
    pub net_profit_pct: Decimal,
    pub confidence_score: Decimal,
}

/// Amounts of a fully simulated cycle, all in the settlement token.
#[derive(Debug, Clone, Copy)]
pub struct CycleEconomics {
    pub input_amount: Decimal,
    pub gross_output_amount: Decimal,
    pub gas_cost: Decimal,
    pub slippage_cost: Decimal,
}

impl CycleEconomics {
    /// `None` when the subtraction leaves the `Decimal` range.
    pub fn net_profit(&self) -> Option<Decimal> {
        self.gross_output_amount
            .checked_sub(self.input_amount)?
            .checked_sub(self.gas_cost)?
            .checked_sub(self.slippage_cost)
    }

    /// Net profit as a percentage of the input (`3` means 3%).
    pub fn net_profit_pct(&self) -> Option<Decimal> {
        if self.input_amount.is_zero() {
            return Some(Decimal::ZERO);
        }
        self.net_profit()?
            .checked_div(self.input_amount)?
            .checked_mul(dec!(100))
    }
}

impl Opportunity {
    pub fn new(
        kind: OpportunityKind,
        token_path: Vec<TokenId>,
        venue_path: Vec<VenueId>,
        economics: CycleEconomics,
        confidence_score: Decimal,
    ) -> Option<Self> {
        debug_assert!(token_path.len() >= 2);
        debug_assert_eq!(venue_path.len() + 1, token_path.len());
        debug_assert_eq!(token_path.first(), token_path.last());
        let net_profit = economics.net_profit()?;
        let net_profit_pct = economics.net_profit_pct()?;

        Some(Self {
            id: uuid::Uuid::new_v4().to_string(),
            detected_at: Utc::now(),
            kind,
            token_path,
            venue_path,
            input_amount: economics.input_amount,
            gross_output_amount: economics.gross_output_amount,
            estimated_gas_cost: economics.gas_cost,
            estimated_slippage_cost: economics.slippage_cost,
            net_profit,
            net_profit_pct,
            confidence_score,
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.kind.strategy()
    }

    /// Token the cycle starts and ends in.
    pub fn start_token(&self) -> &TokenId {
        &self.token_path[0]
    }

    /// Human readable route, e.g. `USDC -[v1]-> WETH -[v2]-> USDC`.
    pub fn route(&self) -> String {
        let mut route = self.token_path[0].to_string();
        for (venue, token) in self.venue_path.iter().zip(self.token_path.iter().skip(1)) {
            route.push_str(&format!(" -[{}]-> {}", venue, token));
        }
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_profit_deducts_every_cost() {
        let economics = CycleEconomics {
            input_amount: dec!(1000),
            gross_output_amount: dec!(1030),
            gas_cost: dec!(5),
            slippage_cost: dec!(2.5),
        };
        assert_eq!(economics.net_profit(), Some(dec!(22.5)));
        assert_eq!(economics.net_profit_pct(), Some(dec!(2.25)));
    }

    #[test]
    fn overflowing_economics_yield_no_opportunity() {
        let economics = CycleEconomics {
            input_amount: dec!(0.0000000001),
            gross_output_amount: Decimal::MAX,
            gas_cost: Decimal::ZERO,
            slippage_cost: Decimal::ZERO,
        };
        assert!(economics.net_profit().is_some());
        assert_eq!(economics.net_profit_pct(), None);

        let opp = Opportunity::new(
            OpportunityKind::MultiHop { hops: 2 },
            vec![TokenId::new("USDC"), TokenId::new("WETH"), TokenId::new("USDC")],
            vec![VenueId::new("v1"), VenueId::new("v2")],
            economics,
            dec!(0.85),
        );
        assert!(opp.is_none());
    }

    #[test]
    fn route_renders_venues_between_tokens() {
        let opp = Opportunity::new(
            OpportunityKind::MultiHop { hops: 2 },
            vec![TokenId::new("USDC"), TokenId::new("WETH"), TokenId::new("USDC")],
            vec![VenueId::new("v1"), VenueId::new("v2")],
            CycleEconomics {
                input_amount: dec!(1),
                gross_output_amount: dec!(1),
                gas_cost: Decimal::ZERO,
                slippage_cost: Decimal::ZERO,
            },
            dec!(0.85),
        )
        .unwrap();
        assert_eq!(opp.route(), "USDC -[v1]-> WETH -[v2]-> USDC");
        assert_eq!(opp.strategy(), Strategy::MultiHop);
        assert_eq!(opp.start_token(), &TokenId::new("USDC"));
    }
}
