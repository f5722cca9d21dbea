//! Arbitrage opportunity storage

use anyhow::Result;
use std::path::Path;
use tracing::info;
use crate::types::Opportunity;
use super::{append_jsonl, daily_file};

pub fn save_opportunity(base: &Path, opp: &Opportunity) -> Result<()> {
    append_jsonl(&daily_file(base, "opportunities", "arbitrage"), opp)?;

    info!(
        opportunity_id = %opp.id,
        strategy = %opp.strategy(),
        profit = %opp.net_profit,
        "Saved arbitrage opportunity"
    );

    Ok(())
}
