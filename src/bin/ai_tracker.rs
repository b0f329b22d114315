//! AI Tracker - daily digest of open-source AI repositories
//!
//! Usage:
//!   cargo run --release --bin ai_tracker -- [--trend-timeframe lifetime|30days|7days]
//!   cargo run --release --bin ai_tracker -- --commercial
//!   cargo run --release --bin ai_tracker -- --multi-timeframe
//!   cargo run --release --bin ai_tracker -- --reset [--no-backup]
//!   cargo run --release --bin ai_tracker -- --stats
//!
//! Environment variables: see `TrackerConfig::from_env`.

use ai_repo_tracker::pipeline::{CycleReport, TrackerConfig, TrackerEngine};
use ai_repo_tracker::ranking::Timeframe;
use clap::Parser;
use log::info;

const RECENT_LIMIT: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "ai_tracker", version, about = "Track open-source AI repositories")]
struct Args {
    /// Trend window: lifetime, 30days or 7days
    #[arg(long, default_value = "lifetime")]
    trend_timeframe: Timeframe,

    /// Run the 30-day and 7-day trending cycles back to back
    #[arg(long, conflicts_with_all = ["commercial", "reset", "stats"])]
    multi_timeframe: bool,

    /// Track projects with commercial value instead
    #[arg(long, conflicts_with_all = ["reset", "stats"])]
    commercial: bool,

    /// Clear the sent-records store
    #[arg(long, conflicts_with = "stats")]
    reset: bool,

    /// Skip the snapshot backup when resetting
    #[arg(long, requires = "reset")]
    no_backup: bool,

    /// Print sent-records statistics
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let config = TrackerConfig::from_env()?;

    info!("📊 Configuration:");
    info!("   ├─ Store: {}", config.store_path);
    info!("   ├─ Page size: {}", config.page_size);
    info!("   ├─ Top K: {}", config.top_k);
    info!("   └─ Commit policy: {:?}", config.commit_policy);

    let mut engine = TrackerEngine::from_config(&config)?;

    if args.stats {
        print_stats(&engine);
        return Ok(());
    }

    if args.reset {
        match engine.reset(!args.no_backup)? {
            Some(path) => println!("📋 Backup written to {}", path),
            None => println!("No snapshot to back up"),
        }
        println!("🔄 Sent records cleared");
        return Ok(());
    }

    if args.multi_timeframe {
        for report in engine.run_multi().await {
            log_report(&report);
        }
    } else if args.commercial {
        log_report(&engine.run_commercial(args.trend_timeframe).await);
    } else {
        log_report(&engine.run(args.trend_timeframe).await);
    }

    Ok(())
}

fn log_report(report: &CycleReport) {
    info!("🏁 {}", report);
}

fn print_stats(engine: &TrackerEngine) {
    let stats = engine.stats();

    println!("📊 Sent records");
    println!("   ├─ Total: {}", stats.total);
    match (&stats.most_recent_sent_at, &stats.most_recent_name) {
        (Some(at), Some(name)) => println!("   ├─ Latest: {} ({})", name, at.to_rfc3339()),
        _ => println!("   ├─ Latest: none"),
    }
    println!("   └─ Storage: {}", stats.storage);

    let recent = engine.store().recent(RECENT_LIMIT);
    if recent.is_empty() {
        return;
    }

    println!();
    println!("🕒 Most recent");
    for (i, (_, record)) in recent.iter().enumerate() {
        let sent = record
            .sent_at()
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| record.sent_date.clone());
        println!("   {}. {} ({}) - {}", i + 1, record.full_name, sent, record.url);
    }
}
