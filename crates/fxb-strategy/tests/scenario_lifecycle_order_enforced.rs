use chrono::{TimeZone, Utc};
use fxb_execution::{ExecutionHost, HostResult, OrderEvent, OrderId};
use fxb_strategy::*;

#[derive(Default)]
struct SeqHost {
    next: u64,
}

impl SeqHost {
    fn id(&mut self) -> HostResult<OrderId> {
        self.next += 1;
        Ok(OrderId::new(format!("ORD-{}", self.next)))
    }
}

impl ExecutionHost for SeqHost {
    fn submit_market_order(&mut self, _: &str, _: i64) -> HostResult<OrderId> {
        self.id()
    }
    fn submit_limit_order(&mut self, _: &str, _: i64, _: i64) -> HostResult<OrderId> {
        self.id()
    }
    fn submit_stop_order(&mut self, _: &str, _: i64, _: i64) -> HostResult<OrderId> {
        self.id()
    }
    fn cancel_order(&mut self, _: &OrderId) -> HostResult<()> {
        Ok(())
    }
}

fn hourly_slice() -> Slice {
    let t = Utc.with_ymd_and_hms(2021, 1, 4, 10, 0, 0).unwrap();
    Slice::from_bar(
        QuoteBar::new("AUDUSD", t, 1_000_000, 1_000_000, 1_000_000, 1_000_000),
        3600,
    )
}

#[test]
fn scenario_lifecycle_order_enforced() {
    let mut exec = SeqHost::default();
    let mut host = StrategyHost::new();
    host.register(Box::new(FixedBracketStrategy::new(FixedBracketParams {
        seed: Some(3),
        ..FixedBracketParams::default()
    })))
    .unwrap();

    // GIVEN: not started
    // WHEN/THEN: data and order events are refused
    assert_eq!(
        host.on_data(&hourly_slice(), &mut exec).unwrap_err(),
        StrategyHostError::NotRunning
    );
    assert_eq!(
        host.on_order_event(&OrderEvent::filled("ORD-1"), &mut exec)
            .unwrap_err(),
        StrategyHostError::NotRunning
    );
    assert_eq!(exec.next, 0);

    // GIVEN: started
    host.start().unwrap();
    assert_eq!(host.start().unwrap_err(), StrategyHostError::AlreadyStarted);
    host.on_data(&hourly_slice(), &mut exec).unwrap();
    assert_eq!(host.phase(), HostPhase::Running);

    // WHEN: the run ends
    let report = host.finish().unwrap();
    assert_eq!(report.summary.total_entries, 1);
    assert_eq!(report.trades.len(), 3);

    // THEN: nothing more is accepted
    assert_eq!(host.phase(), HostPhase::Finished);
    assert_eq!(
        host.on_data(&hourly_slice(), &mut exec).unwrap_err(),
        StrategyHostError::NotRunning
    );
    assert_eq!(host.finish().unwrap_err(), StrategyHostError::NotRunning);
}

#[test]
fn scenario_start_without_strategy_fails() {
    let mut host = StrategyHost::new();
    assert_eq!(
        host.start().unwrap_err(),
        StrategyHostError::NoStrategyRegistered
    );
    assert_eq!(host.phase(), HostPhase::Idle);
}
