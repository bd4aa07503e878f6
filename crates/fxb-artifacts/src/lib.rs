use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fxb_execution::micros_to_price;
use fxb_ledger::{RunSummary, TradeRecord};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const SCHEMA_VERSION: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: i32,
    pub run_id: Uuid,
    pub strategy: String,
    pub symbol: String,
    pub config_hash: String,
    pub created_at_utc: DateTime<Utc>,
    pub artifacts: ArtifactList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactList {
    pub manifest_json: String,
    pub trades_csv: String,
    pub summary_json: String,
}

/// Contents of `summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummaryFile {
    pub run_id: Uuid,
    pub halted: bool,
    pub halt_reason: Option<String>,
    #[serde(flatten)]
    pub summary: RunSummary,
}

pub struct WriteRunArtifactsArgs<'a> {
    pub exports_root: &'a Path, // e.g. ./exports
    pub run_id: Uuid,
    pub strategy: &'a str,
    pub symbol: &'a str,
    pub config_hash: &'a str,
    pub halted: bool,
    pub halt_reason: Option<&'a str>,
    pub summary: &'a RunSummary,
    pub trades: &'a [TradeRecord],
}

pub struct WriteRunArtifactsResult {
    pub run_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub trades_path: PathBuf,
    pub summary_path: PathBuf,
}

pub fn new_run_id() -> Uuid {
    Uuid::new_v4()
}

/// Write `<exports_root>/<run_id>/{manifest.json,trades.csv,summary.json}`.
/// Existing files for the same run id are overwritten.
pub fn write_run_artifacts(args: WriteRunArtifactsArgs<'_>) -> Result<WriteRunArtifactsResult> {
    let run_dir = args.exports_root.join(args.run_id.to_string());
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("create exports dir failed: {}", run_dir.display()))?;

    let trades_path = run_dir.join("trades.csv");
    write_trades_csv(&trades_path, args.trades)?;

    let summary_path = run_dir.join("summary.json");
    let summary = RunSummaryFile {
        run_id: args.run_id,
        halted: args.halted,
        halt_reason: args.halt_reason.map(str::to_string),
        summary: args.summary.clone(),
    };
    write_json(&summary_path, &summary)?;

    let manifest = RunManifest {
        schema_version: SCHEMA_VERSION,
        run_id: args.run_id,
        strategy: args.strategy.to_string(),
        symbol: args.symbol.to_string(),
        config_hash: args.config_hash.to_string(),
        created_at_utc: Utc::now(),
        artifacts: ArtifactList {
            manifest_json: "manifest.json".to_string(),
            trades_csv: "trades.csv".to_string(),
            summary_json: "summary.json".to_string(),
        },
    };
    let manifest_path = run_dir.join("manifest.json");
    write_json(&manifest_path, &manifest)?;

    Ok(WriteRunArtifactsResult {
        run_dir,
        manifest_path,
        trades_path,
        summary_path,
    })
}

pub const TRADES_CSV_HEADER: [&str; 7] = [
    "date", "trade_id", "order_id", "leg_type", "status", "price", "quantity",
];

/// One row per leg, labels as the trade table prints them.
fn write_trades_csv(path: &Path, trades: &[TradeRecord]) -> Result<()> {
    let mut w = csv::Writer::from_path(path)
        .with_context(|| format!("create trades csv failed: {}", path.display()))?;
    w.write_record(TRADES_CSV_HEADER)?;
    for r in trades {
        w.write_record([
            r.date.to_rfc3339(),
            r.trade_id.to_string(),
            r.order_id.to_string(),
            r.leg_type.to_string(),
            r.status.to_string(),
            format!("{:.6}", micros_to_price(r.price_micros)),
            r.quantity.to_string(),
        ])
        .with_context(|| format!("write trades csv failed: {}", path.display()))?;
    }
    w.flush()
        .with_context(|| format!("flush trades csv failed: {}", path.display()))?;
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize json failed")?;
    fs::write(path, format!("{json}\n"))
        .with_context(|| format!("write failed: {}", path.display()))
}
