//! Profitability thresholds shared by the evaluator and the path search

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use crate::config::Config;
use crate::types::CycleEconomics;

#[derive(Debug, Clone)]
pub struct ProfitConfig {
    /// Minimum net profit in percent of the input (`0.5` means 0.5%).
    pub min_profit_pct: Decimal,
    pub min_profit_usd: Decimal,
    pub max_slippage_bps: u32,
}

impl ProfitConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_profit_pct: config.min_profit_pct,
            min_profit_usd: config.min_profit_usd,
            max_slippage_bps: config.max_slippage_bps,
        }
    }

    pub fn slippage_cost(&self, notional: Decimal) -> Decimal {
        notional.saturating_mul(Decimal::from(self.max_slippage_bps) / dec!(10000))
    }

    /// Economics whose profit cannot be represented are never accepted.
    pub fn accepts(&self, economics: &CycleEconomics) -> bool {
        let (Some(net_profit), Some(net_profit_pct)) =
            (economics.net_profit(), economics.net_profit_pct())
        else {
            return false;
        };
        net_profit > Decimal::ZERO
            && net_profit >= self.min_profit_usd
            && net_profit_pct >= self.min_profit_pct
    }
}
