//! Allocation plan storage

use anyhow::Result;
use std::path::Path;
use tracing::info;
use crate::types::AllocationPlan;
use super::{append_jsonl, daily_file};

pub fn save_allocation_plan(base: &Path, plan: &AllocationPlan) -> Result<()> {
    append_jsonl(&daily_file(base, "allocations", "plans"), plan)?;

    info!(
        cycle_id = %plan.cycle_id,
        allocations = plan.allocations.len(),
        total_assigned = %plan.total_assigned,
        "Saved allocation plan"
    );

    Ok(())
}
