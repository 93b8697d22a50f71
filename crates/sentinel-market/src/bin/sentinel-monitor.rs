//! Market monitor CLI
//!
//! Polls a watchlist on a fixed cadence, prints a per-symbol overview and
//! fires the configured alert rules.
//!
//! # Usage
//!
//! ```bash
//! # Optional provider keys; without them the keyless source and the
//! # bundled sample data still serve
//! export ALPHA_VANTAGE_API_KEY="..."
//! export FINNHUB_API_KEY="..."
//!
//! cargo run --bin sentinel-monitor -p sentinel-market -- --symbols NVDA,MSFT --once
//! ```

use chrono::{Duration as ChronoDuration, Utc};
use clap::Parser;
use sentinel_market::alerts::{AlertChannel, AlertEvaluator};
use sentinel_market::analytics::{self, SymbolSnapshot};
use sentinel_market::config::MarketConfig;
use sentinel_market::selector::SourceSelector;
use std::env;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "sentinel-monitor")]
#[command(about = "Watchlist monitor with analytics and alerts", long_about = None)]
struct Args {
    /// Symbols to watch, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "NVDA,MSFT,GOOGL,AMZN,META")]
    symbols: Vec<String>,

    /// Look-back window in calendar days
    #[arg(short, long, default_value_t = 90)]
    days: i64,

    /// Poll interval in seconds (overrides the configured cadence)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "warn,sentinel_market=info".to_string()),
        )
        .init();

    let args = Args::parse();

    let mut config = MarketConfig::default().with_env_keys();
    if let Some(interval) = args.interval {
        config.alerts.monitor_interval_seconds = interval;
    }
    config.validate()?;

    let selector = SourceSelector::from_config(&config);
    let mut evaluator = AlertEvaluator::new(config.cooldown());

    info!(
        symbols = args.symbols.len(),
        days = args.days,
        interval = config.alerts.monitor_interval_seconds,
        "starting monitor"
    );

    let mut ticker =
        tokio::time::interval(Duration::from_secs(config.alerts.monitor_interval_seconds.max(1)));

    loop {
        ticker.tick().await;
        run_cycle(&args, &config, &selector, &mut evaluator).await;

        if args.once {
            break;
        }
    }

    Ok(())
}

async fn run_cycle(
    args: &Args,
    config: &MarketConfig,
    selector: &SourceSelector,
    evaluator: &mut AlertEvaluator,
) {
    let end = Utc::now();
    let start = end - ChronoDuration::days(args.days.max(1));

    println!(
        "\n=== Market overview at {} ===",
        end.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let mut snapshots: Vec<SymbolSnapshot> = Vec::new();

    for symbol in &args.symbols {
        let result = match selector.fetch(symbol, start, end).await {
            Ok(result) => result,
            Err(err) => {
                warn!(%symbol, error = %err, "skipping symbol");
                continue;
            }
        };

        let Some(snapshot) = analytics::snapshot(
            &result,
            config.significance_window,
            config.significance_threshold,
        ) else {
            warn!(%symbol, "no data in window");
            continue;
        };

        print_snapshot(&snapshot);

        for event in evaluator.evaluate(&config.alert_rules, &snapshot) {
            match event.channel {
                AlertChannel::Console if config.alerts.notifications.console => {
                    println!(
                        "  !! ALERT [{}] {}",
                        event.rule_id,
                        event.payload["observed"]
                    );
                }
                // Email delivery is an external collaborator; record the
                // event so an operator can wire it up.
                _ => info!(rule = %event.rule_id, payload = %event.payload, "alert fired"),
            }
        }

        snapshots.push(snapshot);
    }

    print_movers(&snapshots);
}

fn print_snapshot(snap: &SymbolSnapshot) {
    let fmt_pct = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:+.2}%"));

    println!(
        "{:<6} {:>10.2}  day {:>8}  period {:>8}  vol {:>8}  [{}]",
        snap.symbol,
        snap.latest_close,
        fmt_pct(snap.daily_change_pct),
        fmt_pct(snap.period_change_pct),
        fmt_pct(snap.annualized_volatility_pct),
        snap.source_name,
    );

    for m in &snap.significant_moves {
        println!(
            "  significant move on {}: z = {:+.2}",
            m.timestamp.format("%Y-%m-%d"),
            m.z_score
        );
    }
}

fn print_movers(snapshots: &[SymbolSnapshot]) {
    let mut ranked: Vec<&SymbolSnapshot> = snapshots
        .iter()
        .filter(|s| s.period_change_pct.is_some())
        .collect();
    if ranked.len() < 2 {
        return;
    }
    ranked.sort_by(|a, b| {
        b.period_change_pct
            .unwrap_or(f64::NEG_INFINITY)
            .total_cmp(&a.period_change_pct.unwrap_or(f64::NEG_INFINITY))
    });

    let best = ranked[0];
    let worst = ranked[ranked.len() - 1];
    println!(
        "top mover: {} ({:+.2}%), worst: {} ({:+.2}%)",
        best.symbol,
        best.period_change_pct.unwrap_or(0.0),
        worst.symbol,
        worst.period_change_pct.unwrap_or(0.0),
    );
}
