//! Confidence scoring for opportunities

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use crate::config::Config;
use crate::types::OpportunityKind;

/// Pluggable confidence model. Implementations must return a value in `0..=1`.
pub trait ConfidenceScorer: Send + Sync {
    fn score(&self, kind: &OpportunityKind) -> Decimal;
}

/// Penalizes every leg beyond the second: longer paths have more chances
/// to fail between legs.
#[derive(Debug, Clone)]
pub struct HopPenaltyScorer {
    pub base: Decimal,
    pub per_hop_penalty: Decimal,
}

impl Default for HopPenaltyScorer {
    fn default() -> Self {
        Self {
            base: dec!(0.85),
            per_hop_penalty: dec!(0.10),
        }
    }
}

impl HopPenaltyScorer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base: config.hop_confidence_base,
            per_hop_penalty: config.hop_confidence_penalty,
        }
    }
}

impl ConfidenceScorer for HopPenaltyScorer {
    fn score(&self, kind: &OpportunityKind) -> Decimal {
        let extra_hops = Decimal::from(kind.legs().saturating_sub(2));
        (self.base - self.per_hop_penalty * extra_hops)
            .max(Decimal::ZERO)
            .min(Decimal::ONE)
    }
}
