use chrono::{TimeZone, Utc};
use fxb_artifacts::{
    new_run_id, write_run_artifacts, RunManifest, RunSummaryFile, WriteRunArtifactsArgs,
};
use fxb_execution::OrderId;
use fxb_ledger::{LegStatus, LegType, RunSummary, TradeId, TradeRecord};

fn trades() -> Vec<TradeRecord> {
    let date = Utc.with_ymd_and_hms(2021, 1, 4, 10, 0, 0).unwrap();
    let row = |n: &str, leg_type, status, price_micros, quantity| TradeRecord {
        date,
        trade_id: TradeId::new("K3J9QZ1M0PXA"),
        order_id: OrderId::new(n),
        leg_type,
        status,
        price_micros,
        quantity,
    };
    vec![
        row("ORD-000001", LegType::Entry, LegStatus::Filled, 1_000_000, 1),
        row("ORD-000002", LegType::TakeProfit, LegStatus::TakeProfitHit, 1_003_000, -1),
        row("ORD-000003", LegType::StopLoss, LegStatus::Canceled, 999_000, -1),
    ]
}

#[test]
fn scenario_run_artifacts_written() {
    // GIVEN: a finished run with one winning bracket
    let dir = tempfile::tempdir().unwrap();
    let run_id = new_run_id();
    let summary = RunSummary::from_counts(1, 1, 0);
    let trades = trades();

    // WHEN: artifacts are written
    let out = write_run_artifacts(WriteRunArtifactsArgs {
        exports_root: dir.path(),
        run_id,
        strategy: "fixed_bracket",
        symbol: "AUDUSD",
        config_hash: "abc123",
        halted: false,
        halt_reason: None,
        summary: &summary,
        trades: &trades,
    })
    .unwrap();

    // THEN: all three files live under <exports>/<run_id>/
    assert_eq!(out.run_dir, dir.path().join(run_id.to_string()));

    let manifest: RunManifest =
        serde_json::from_str(&std::fs::read_to_string(&out.manifest_path).unwrap()).unwrap();
    assert_eq!(manifest.run_id, run_id);
    assert_eq!(manifest.config_hash, "abc123");
    assert_eq!(manifest.artifacts.trades_csv, "trades.csv");

    let s: RunSummaryFile =
        serde_json::from_str(&std::fs::read_to_string(&out.summary_path).unwrap()).unwrap();
    assert!(!s.halted);
    assert_eq!(s.summary.winning_trades, 1);
    assert_eq!(s.summary.win_rate, 1.0);

    let csv = std::fs::read_to_string(&out.trades_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "date,trade_id,order_id,leg_type,status,price,quantity"
    );
    assert_eq!(
        lines[2],
        "2021-01-04T10:00:00+00:00,K3J9QZ1M0PXA,ORD-000002,Take Profit,Take Profit Hit,1.003000,-1"
    );
    assert_eq!(lines.len(), 4);
}

#[test]
fn scenario_halted_run_records_reason() {
    let dir = tempfile::tempdir().unwrap();
    let summary = RunSummary::from_counts(0, 0, 0);
    let out = write_run_artifacts(WriteRunArtifactsArgs {
        exports_root: dir.path(),
        run_id: new_run_id(),
        strategy: "fixed_bracket",
        symbol: "AUDUSD",
        config_hash: "abc123",
        halted: true,
        halt_reason: Some("no quote for AUDUSD"),
        summary: &summary,
        trades: &[],
    })
    .unwrap();

    let s: RunSummaryFile =
        serde_json::from_str(&std::fs::read_to_string(&out.summary_path).unwrap()).unwrap();
    assert!(s.halted);
    assert_eq!(s.halt_reason.as_deref(), Some("no quote for AUDUSD"));
    assert_eq!(s.summary.win_rate, 0.0);

    let csv = std::fs::read_to_string(&out.trades_path).unwrap();
    assert_eq!(csv.lines().count(), 1);
}
