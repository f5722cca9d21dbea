//! Pipeline configuration settings and environment variable handling

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::env;
use std::str::FromStr;
use crate::errors::{PipelineError, PipelineResult};
use crate::types::TokenId;

// Configuration constants
pub const MIN_HOPS: usize = 2;
pub const MAX_HOPS: usize = 4;
pub const MAX_SLIPPAGE_BPS: u32 = 500; // 5%
pub const MAX_PROFIT_PCT: Decimal = dec!(100);
pub const PRICE_STALENESS_SECONDS: u64 = 10;

// Gas Constants
pub const DEFAULT_GAS_PRICE_GWEI: u32 = 50;
pub const MAX_GAS_PRICE_GWEI: u32 = 200;
pub const DEFAULT_GAS_UNITS_PER_HOP: u64 = 150_000;

// Scanner Constants
pub const DEFAULT_QUOTE_TIMEOUT_MS: u64 = 2_000;
pub const MIN_SCAN_INTERVAL_SECS: u64 = 1;

#[derive(Debug, Clone)]
pub struct Config {
    /// Token every profit, cost and trade size is denominated in.
    pub settlement_token: TokenId,
    // Profitability
    pub min_profit_pct: Decimal,
    pub min_profit_usd: Decimal,
    pub max_slippage_bps: u32,
    // Path search
    pub max_hops: usize,
    pub trade_size_usd: Decimal,
    pub start_tokens: Vec<TokenId>,
    pub hop_confidence_base: Decimal,
    pub hop_confidence_penalty: Decimal,
    // Gas
    pub gas_units_per_hop: u64,
    pub default_gas_price_gwei: Decimal,
    pub native_token_price_usd: Decimal,
    // Allocation
    pub total_capital_usd: Decimal,
    pub max_position_size_pct: Decimal,
    pub max_strategy_allocation_pct: Decimal,
    pub min_allocation_usd: Decimal,
    pub ledger_min_samples: u64,
    // Scanning
    pub quote_timeout_ms: u64,
    pub quote_retry_attempts: u32,
    pub max_quote_age_secs: u64,
    pub scan_interval_secs: u64,
    pub max_consecutive_failed_cycles: u32,
    pub circuit_breaker_cooldown_secs: u64,
    pub enable_persistence: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settlement_token: TokenId::new("USDC"),
            min_profit_pct: dec!(0.5),
            min_profit_usd: dec!(10),
            max_slippage_bps: 50,
            max_hops: 3,
            trade_size_usd: dec!(10000),
            start_tokens: vec![TokenId::new("USDC")],
            hop_confidence_base: dec!(0.85),
            hop_confidence_penalty: dec!(0.10),
            gas_units_per_hop: DEFAULT_GAS_UNITS_PER_HOP,
            default_gas_price_gwei: Decimal::from(DEFAULT_GAS_PRICE_GWEI),
            native_token_price_usd: dec!(3000),
            total_capital_usd: dec!(100000),
            max_position_size_pct: dec!(20),
            max_strategy_allocation_pct: dec!(60),
            min_allocation_usd: dec!(100),
            ledger_min_samples: 10,
            quote_timeout_ms: DEFAULT_QUOTE_TIMEOUT_MS,
            quote_retry_attempts: 2,
            max_quote_age_secs: PRICE_STALENESS_SECONDS,
            scan_interval_secs: 5,
            max_consecutive_failed_cycles: 5,
            circuit_breaker_cooldown_secs: 300, // 5 minutes
            enable_persistence: true,
        }
    }
}

fn env_decimal(key: &str) -> Option<Decimal> {
    env::var(key).ok().and_then(|s| Decimal::from_str(s.trim()).ok())
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl Config {
    pub fn load() -> Self {
        let defaults = Self::default();

        Self {
            settlement_token: env::var("SETTLEMENT_TOKEN")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(TokenId::new)
                .unwrap_or(defaults.settlement_token),
            min_profit_pct: env_decimal("MIN_PROFIT_PCT")
                .unwrap_or(defaults.min_profit_pct)
                .max(Decimal::ZERO)
                .min(MAX_PROFIT_PCT),
            min_profit_usd: env_decimal("MIN_PROFIT_USD")
                .unwrap_or(defaults.min_profit_usd)
                .max(Decimal::ZERO),
            max_slippage_bps: env_parse("MAX_SLIPPAGE_BPS")
                .unwrap_or(defaults.max_slippage_bps)
                .min(MAX_SLIPPAGE_BPS),
            max_hops: env_parse("MAX_HOPS")
                .unwrap_or(defaults.max_hops)
                .clamp(MIN_HOPS, MAX_HOPS),
            trade_size_usd: env_decimal("TRADE_SIZE_USD")
                .filter(|v| *v > Decimal::ZERO)
                .unwrap_or(defaults.trade_size_usd),
            start_tokens: env::var("START_TOKENS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(TokenId::new)
                        .collect::<Vec<_>>()
                })
                .filter(|tokens| !tokens.is_empty())
                .unwrap_or(defaults.start_tokens),
            hop_confidence_base: env_decimal("HOP_CONFIDENCE_BASE")
                .unwrap_or(defaults.hop_confidence_base)
                .max(Decimal::ZERO)
                .min(Decimal::ONE),
            hop_confidence_penalty: env_decimal("HOP_CONFIDENCE_PENALTY")
                .unwrap_or(defaults.hop_confidence_penalty)
                .max(Decimal::ZERO)
                .min(Decimal::ONE),
            gas_units_per_hop: env_parse("GAS_UNITS_PER_HOP")
                .unwrap_or(defaults.gas_units_per_hop),
            default_gas_price_gwei: env_decimal("GAS_PRICE_GWEI")
                .unwrap_or(defaults.default_gas_price_gwei)
                .max(Decimal::ZERO)
                .min(Decimal::from(MAX_GAS_PRICE_GWEI)),
            native_token_price_usd: env_decimal("NATIVE_TOKEN_PRICE_USD")
                .unwrap_or(defaults.native_token_price_usd)
                .max(Decimal::ZERO),
            total_capital_usd: env_decimal("TOTAL_CAPITAL_USD")
                .unwrap_or(defaults.total_capital_usd)
                .max(Decimal::ZERO),
            max_position_size_pct: env_decimal("MAX_POSITION_SIZE_PCT")
                .unwrap_or(defaults.max_position_size_pct)
                .max(Decimal::ZERO)
                .min(dec!(100)),
            max_strategy_allocation_pct: env_decimal("MAX_STRATEGY_ALLOCATION_PCT")
                .unwrap_or(defaults.max_strategy_allocation_pct)
                .max(Decimal::ZERO)
                .min(dec!(100)),
            min_allocation_usd: env_decimal("MIN_ALLOCATION_USD")
                .unwrap_or(defaults.min_allocation_usd)
                .max(Decimal::ZERO),
            ledger_min_samples: env_parse("LEDGER_MIN_SAMPLES")
                .unwrap_or(defaults.ledger_min_samples),
            quote_timeout_ms: env_parse("QUOTE_TIMEOUT_MS")
                .unwrap_or(defaults.quote_timeout_ms)
                .max(1),
            quote_retry_attempts: env_parse("QUOTE_RETRY_ATTEMPTS")
                .unwrap_or(defaults.quote_retry_attempts)
                .max(1),
            max_quote_age_secs: env_parse("MAX_QUOTE_AGE_SECS")
                .unwrap_or(defaults.max_quote_age_secs),
            scan_interval_secs: env_parse("SCAN_INTERVAL_SECS")
                .unwrap_or(defaults.scan_interval_secs)
                .max(MIN_SCAN_INTERVAL_SECS),
            max_consecutive_failed_cycles: env_parse("MAX_CONSECUTIVE_FAILED_CYCLES")
                .unwrap_or(defaults.max_consecutive_failed_cycles)
                .max(1),
            circuit_breaker_cooldown_secs: env_parse("CIRCUIT_BREAKER_COOLDOWN_SECS")
                .unwrap_or(defaults.circuit_breaker_cooldown_secs),
            enable_persistence: env::var("ENABLE_PERSISTENCE")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        }
    }

    /// Rejects values that `load` would clamp but a programmatic caller may
    /// still have set.
    pub fn validate(&self) -> PipelineResult<()> {
        let invalid = |field: &'static str, reason: String| {
            Err(PipelineError::InvalidConfig { field, reason })
        };

        if !(MIN_HOPS..=MAX_HOPS).contains(&self.max_hops) {
            return invalid(
                "max_hops",
                format!("{} is outside {}..={}", self.max_hops, MIN_HOPS, MAX_HOPS),
            );
        }
        if self.min_profit_pct < Decimal::ZERO {
            return invalid("min_profit_pct", format!("{} is negative", self.min_profit_pct));
        }
        if self.min_profit_usd < Decimal::ZERO {
            return invalid("min_profit_usd", format!("{} is negative", self.min_profit_usd));
        }
        if self.max_slippage_bps > MAX_SLIPPAGE_BPS {
            return invalid(
                "max_slippage_bps",
                format!("{} exceeds {}", self.max_slippage_bps, MAX_SLIPPAGE_BPS),
            );
        }
        if self.trade_size_usd <= Decimal::ZERO {
            return invalid("trade_size_usd", format!("{} is not positive", self.trade_size_usd));
        }
        if self.settlement_token.0.trim().is_empty() {
            return invalid("settlement_token", "no settlement token configured".to_string());
        }
        if self.start_tokens.is_empty() {
            return invalid("start_tokens", "no start token configured".to_string());
        }
        if self.total_capital_usd < Decimal::ZERO {
            return invalid("total_capital_usd", format!("{} is negative", self.total_capital_usd));
        }
        for (field, pct) in [
            ("max_position_size_pct", self.max_position_size_pct),
            ("max_strategy_allocation_pct", self.max_strategy_allocation_pct),
        ] {
            if pct < Decimal::ZERO || pct > dec!(100) {
                return invalid(field, format!("{} is outside 0..=100", pct));
            }
        }
        for (field, value) in [
            ("hop_confidence_base", self.hop_confidence_base),
            ("hop_confidence_penalty", self.hop_confidence_penalty),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return invalid(field, format!("{} is outside 0..=1", value));
            }
        }
        if self.quote_timeout_ms == 0 {
            return invalid("quote_timeout_ms", "must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_hops_outside_range() {
        for hops in [0, 1, 5] {
            let config = Config { max_hops: hops, ..Config::default() };
            assert!(matches!(
                config.validate(),
                Err(PipelineError::InvalidConfig { field: "max_hops", .. })
            ));
        }
    }

    #[test]
    fn rejects_position_cap_above_hundred_percent() {
        let config = Config { max_position_size_pct: dec!(150), ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn settles_in_usdc_by_default() {
        assert_eq!(Config::default().settlement_token, TokenId::new("USDC"));
        let config = Config { settlement_token: TokenId::new(""), ..Config::default() };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig { field: "settlement_token", .. })
        ));
    }

    #[test]
    fn rejects_empty_start_tokens() {
        let config = Config { start_tokens: vec![], ..Config::default() };
        assert!(config.validate().is_err());
    }
}
