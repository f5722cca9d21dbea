//! Capital allocation types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use super::{Opportunity, Strategy};

#[derive(Debug, Clone, Serialize)]
pub struct Allocation {
    pub id: String,
    pub opportunity_id: String,
    pub strategy: Strategy,
    pub capital_assigned: Decimal,
    pub score: Decimal,
    /// Net profit scaled to the assigned capital.
    pub expected_profit: Decimal,
}

/// Ordered output of one allocation cycle, handed to the executor.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationPlan {
    pub cycle_id: String,
    pub created_at: DateTime<Utc>,
    pub total_capital: Decimal,
    pub total_assigned: Decimal,
    pub allocations: Vec<Allocation>,
    pub opportunities: Vec<Opportunity>,
}

impl AllocationPlan {
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    pub fn opportunity_for(&self, allocation: &Allocation) -> Option<&Opportunity> {
        self.opportunities
            .iter()
            .find(|o| o.id == allocation.opportunity_id)
    }

    pub fn expected_profit(&self) -> Decimal {
        self.allocations.iter().map(|a| a.expected_profit).sum()
    }
}
