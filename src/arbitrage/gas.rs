//! Per-leg gas cost model in settlement units

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use crate::types::VenueId;

const GWEI_PER_NATIVE: Decimal = dec!(1_000_000_000);

#[derive(Debug, Clone, Default)]
pub struct GasModel {
    per_leg_cost: Decimal,
    venue_costs: HashMap<VenueId, Decimal>,
}

impl GasModel {
    pub fn flat(per_leg_cost: Decimal) -> Self {
        Self {
            per_leg_cost,
            venue_costs: HashMap::new(),
        }
    }

    /// Converts a gas price into the USD cost of one swap leg.
    pub fn from_gas_price(
        gas_price_gwei: Decimal,
        gas_units_per_hop: u64,
        native_token_price_usd: Decimal,
    ) -> Self {
        let native_cost = gas_price_gwei * Decimal::from(gas_units_per_hop) / GWEI_PER_NATIVE;
        Self::flat(native_cost * native_token_price_usd)
    }

    pub fn with_venue_cost(mut self, venue: VenueId, cost: Decimal) -> Self {
        self.venue_costs.insert(venue, cost);
        self
    }

    pub fn leg_cost(&self, venue: &VenueId) -> Decimal {
        self.venue_costs.get(venue).copied().unwrap_or(self.per_leg_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_gwei_to_usd_per_leg() {
        let gas = GasModel::from_gas_price(dec!(50), 150_000, dec!(3000));
        // 150k gas * 50 gwei = 0.0075 native = $22.50
        assert_eq!(gas.leg_cost(&VenueId::new("any")), dec!(22.5));
    }

    #[test]
    fn venue_override_wins() {
        let gas = GasModel::flat(dec!(5)).with_venue_cost(VenueId::new("cheap"), dec!(1));
        assert_eq!(gas.leg_cost(&VenueId::new("cheap")), dec!(1));
        assert_eq!(gas.leg_cost(&VenueId::new("other")), dec!(5));
    }
}
