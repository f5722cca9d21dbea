//! Arbitrage Pipeline - demo entry point
//!
//! Scans a set of simulated venues, prints every allocation plan, plays the
//! allocations out against a simulated executor and feeds the results back
//! into the performance ledger.

use arb_pipeline::*;
use anyhow::Result;
use rust_decimal_macros::dec;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use arb_pipeline::arbitrage::HopPenaltyScorer;
use arb_pipeline::engine::{Scanner, StrategyContext};
use arb_pipeline::execution::{simulate_allocation, SimulationConfig};
use arb_pipeline::ledger::PerformanceLedger;
use arb_pipeline::network::{QuoteRequest, QuoteSource, SimulatedVenue};

const TOKENS: [&str; 4] = ["USDC", "WETH", "WBTC", "DAI"];

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    let _logging_guard = utils::setup_logging()?;
    utils::setup_output_directories()?;

    // Load configuration
    let config = Config::load();
    config.validate()?;

    info!("🔎 Arbitrage Pipeline v{}", env!("CARGO_PKG_VERSION"));
    info!("📋 Configuration:");
    info!("   Settlement Token: {}", config.settlement_token);
    info!("   Min Profit: {}% / ${}", config.min_profit_pct, config.min_profit_usd);
    info!("   Max Slippage: {} bps", config.max_slippage_bps);
    info!("   Max Hops: {}", config.max_hops);
    info!("   Trade Size: ${}", config.trade_size_usd);
    info!("   Capital: ${} (position cap {}%, strategy cap {}%)",
        config.total_capital_usd,
        config.max_position_size_pct,
        config.max_strategy_allocation_pct
    );
    info!("   Scan Interval: {}s", config.scan_interval_secs);
    info!("   Persistence: {}", config.enable_persistence);

    let output_dir = Path::new(storage::OUTPUT_DIR);
    let mut ledger = PerformanceLedger::new(config.ledger_min_samples);
    if config.enable_persistence {
        ledger = ledger.with_output_dir(output_dir);
    }

    let scorer = Arc::new(HopPenaltyScorer::from_config(&config));
    let mut context = StrategyContext::new(config.clone(), scorer, ledger.clone());
    if config.enable_persistence {
        context = context.with_output_dir(output_dir);
    }

    let sources = simulated_venues();
    let requests = quote_requests(&config);
    info!("✅ {} venues, {} quote requests per cycle", sources.len(), requests.len());

    let scanner = Scanner::new(sources, requests, context);
    let circuit_breaker = scanner.circuit_breaker();

    // Setup shutdown handler
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("\n📛 Received shutdown signal (Ctrl+C)...");
        let _ = shutdown_tx.send(true);
    });

    let (plan_tx, mut plan_rx) = mpsc::channel(16);
    let scan_handle = tokio::spawn(scanner.run(shutdown_rx, plan_tx));

    info!("\n🚀 Starting scanner...\n");

    let start_time = Instant::now();
    let simulation = SimulationConfig::default();
    let mut counters = utils::SessionCounters::default();

    // Scanner drops the sender on shutdown, which ends this loop.
    while let Some(plan) = plan_rx.recv().await {
        counters.plans_received += 1;
        counters.expected_profit += plan.expected_profit();
        utils::print_allocation_plan(&plan);

        for allocation in &plan.allocations {
            let Some(opportunity) = plan.opportunity_for(allocation) else {
                warn!("Allocation {} has no opportunity in its plan", allocation.id);
                continue;
            };
            utils::print_opportunity(opportunity);

            let entry = simulate_allocation(allocation, opportunity, &simulation).await;
            utils::print_ledger_entry(&entry);
            if let Err(e) = ledger.append(entry).await {
                error!("Ledger append failed: {}", e);
            }
            counters.allocations_executed += 1;
        }

        if counters.plans_received % 10 == 0 {
            utils::print_session_stats(start_time, &counters, &ledger, &circuit_breaker).await;
        }
    }

    let summary = scan_handle.await?;
    info!(
        "Scanner finished: {} cycles, {} failed, {} skipped, {} plans",
        summary.cycles_run, summary.failed_cycles, summary.skipped_cycles, summary.plans_published
    );

    // Print final statistics
    utils::print_session_stats(start_time, &counters, &ledger, &circuit_breaker).await;

    Ok(())
}

/// Four venues with slightly different books; jitter opens and closes spreads.
fn simulated_venues() -> Vec<Arc<dyn QuoteSource>> {
    let uniswap = SimulatedVenue::new("uniswap")
        .with_pair("USDC", "WETH", dec!(0.000333))
        .with_pair("WETH", "WBTC", dec!(0.05))
        .with_pair("USDC", "DAI", dec!(1.0));
    let sushiswap = SimulatedVenue::new("sushiswap")
        .with_pair("USDC", "WETH", dec!(0.0003345))
        .with_pair("WBTC", "USDC", dec!(62500))
        .with_jitter_bps(45);
    let curve = SimulatedVenue::new("curve")
        .with_pair("USDC", "DAI", dec!(1.0015))
        .with_pair("DAI", "WETH", dec!(0.000334))
        .with_jitter_bps(10);
    let flaky = SimulatedVenue::new("flaky-dex")
        .with_pair("USDC", "WETH", dec!(0.00034))
        .with_failure_rate(0.3)
        .with_max_latency_ms(3_000);

    vec![Arc::new(uniswap), Arc::new(sushiswap), Arc::new(curve), Arc::new(flaky)]
}

/// Every ordered pair of the demo tokens, sized at the configured trade size.
fn quote_requests(config: &Config) -> Vec<QuoteRequest> {
    TOKENS
        .iter()
        .flat_map(|a| TOKENS.iter().map(move |b| (*a, *b)))
        .filter(|(a, b)| a != b)
        .map(|(a, b)| {
            let amount_in = if a == "USDC" || a == "DAI" {
                config.trade_size_usd
            } else {
                dec!(1)
            };
            QuoteRequest::new(TokenId::new(a), TokenId::new(b), amount_in)
        })
        .collect()
}
