//! `fxb replay`: config -> event script -> session on the paper host ->
//! key=value report (+ optional artifacts).

use std::path::Path;

use anyhow::{bail, Context, Result};
use fxb_broker_paper::PaperHost;
use fxb_config::{report_unused_keys, FxConfig, UnusedKeyPolicy};
use fxb_execution::price_to_micros;
use fxb_runtime::{load_events_csv, ReplayWindow, Session, SessionReport};
use fxb_strategy::{FixedBracketParams, FixedBracketStrategy};
use tracing::{info, warn};

pub struct ReplayArgs {
    pub config_paths: Vec<String>,
    pub events: String,
    pub exports: Option<String>,
    pub strict_config: bool,
}

/// Typed config -> strategy parameters (decimal offsets become micros).
pub fn strategy_params(cfg: &FxConfig) -> Result<FixedBracketParams> {
    let s = &cfg.strategy;
    Ok(FixedBracketParams {
        symbol: s.symbol.clone(),
        resolution_secs: s.resolution_secs,
        take_profit_offset_micros: price_to_micros(s.take_profit)
            .context("invalid /strategy/take_profit")?,
        stop_loss_offset_micros: price_to_micros(s.stop_loss)
            .context("invalid /strategy/stop_loss")?,
        quantity: s.quantity,
        history_len: s.history_len,
        seed: cfg.run.seed,
    })
}

pub fn run_replay(args: ReplayArgs) -> Result<()> {
    let loaded = super::load_config(&args.config_paths)?;

    let policy = if args.strict_config {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let unused = report_unused_keys(&loaded.config_json, policy)?;
    for p in &unused.unused_leaf_pointers {
        warn!(pointer = %p, "config key is not read by replay");
    }

    let cfg = loaded.typed()?;
    let params = strategy_params(&cfg)?;
    let symbol = params.symbol.clone();

    let events = load_events_csv(&args.events, cfg.strategy.resolution_secs)
        .with_context(|| format!("load events failed: {}", args.events))?;
    info!(events = events.len(), path = %args.events, "event script loaded");

    let window = ReplayWindow::new(cfg.run.start, cfg.run.end);
    let mut session = Session::new(Box::new(FixedBracketStrategy::new(params)), window)?;
    let mut paper = PaperHost::new();
    let report = session.run(&events, &mut paper)?;

    let run_id = fxb_artifacts::new_run_id();
    print_report(&run_id.to_string(), &loaded.config_hash, &symbol, &report);

    if let Some(root) = &args.exports {
        let out = fxb_artifacts::write_run_artifacts(fxb_artifacts::WriteRunArtifactsArgs {
            exports_root: Path::new(root),
            run_id,
            strategy: &report.strategy,
            symbol: &symbol,
            config_hash: &loaded.config_hash,
            halted: report.halted,
            halt_reason: report.halt_reason.as_deref(),
            summary: &report.summary,
            trades: &report.trades,
        })?;
        println!("artifacts_dir={}", out.run_dir.display());
    }

    if report.halted {
        bail!(
            "session halted: {}",
            report.halt_reason.as_deref().unwrap_or("unknown")
        );
    }
    Ok(())
}

fn print_report(run_id: &str, config_hash: &str, symbol: &str, r: &SessionReport) {
    println!("run_id={run_id}");
    println!("config_hash={config_hash}");
    println!("strategy={}", r.strategy);
    println!("symbol={symbol}");
    println!("halted={}", r.halted);
    println!("halt_reason={}", r.halt_reason.as_deref().unwrap_or(""));
    println!("events_processed={}", r.events_processed);
    println!("events_skipped={}", r.events_skipped);
    println!("trades={}", r.trades.len());
    println!("total_entries={}", r.summary.total_entries);
    println!("winning_trades={}", r.summary.winning_trades);
    println!("losing_trades={}", r.summary.losing_trades);
    println!("win_rate={:.4}", r.summary.win_rate);
}
