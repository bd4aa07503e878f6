use fxb_execution::{ExecutionHost, OrderEvent};
use tracing::info;

use crate::{Slice, Strategy, StrategyHostError, StrategyRunReport, StrategySpec};

/// Lifecycle position of a [`StrategyHost`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostPhase {
    Idle,
    Running,
    Finished,
}

/// StrategyHost enforces:
/// - exactly one strategy
/// - lifecycle order: start -> (data | order events)* -> end
/// - slice resolution matches the strategy's declared resolution
pub struct StrategyHost {
    strategy: Option<Box<dyn Strategy>>,
    spec: Option<StrategySpec>,
    phase: HostPhase,
}

impl Default for StrategyHost {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyHost {
    pub fn new() -> Self {
        Self {
            strategy: None,
            spec: None,
            phase: HostPhase::Idle,
        }
    }

    /// Register a strategy. Only one.
    pub fn register(&mut self, s: Box<dyn Strategy>) -> Result<(), StrategyHostError> {
        if self.strategy.is_some() {
            return Err(StrategyHostError::MultiStrategyNotAllowed);
        }
        self.spec = Some(s.spec());
        self.strategy = Some(s);
        Ok(())
    }

    pub fn spec(&self) -> Result<StrategySpec, StrategyHostError> {
        self.spec.clone().ok_or(StrategyHostError::NoStrategyRegistered)
    }

    pub fn phase(&self) -> HostPhase {
        self.phase
    }

    fn strategy_mut(&mut self) -> Result<&mut Box<dyn Strategy>, StrategyHostError> {
        self.strategy
            .as_mut()
            .ok_or(StrategyHostError::NoStrategyRegistered)
    }

    fn require_running(&self) -> Result<(), StrategyHostError> {
        if self.phase == HostPhase::Running {
            Ok(())
        } else {
            Err(StrategyHostError::NotRunning)
        }
    }

    pub fn start(&mut self) -> Result<(), StrategyHostError> {
        if self.phase != HostPhase::Idle {
            return Err(StrategyHostError::AlreadyStarted);
        }
        let spec = self.spec()?;
        self.strategy_mut()?.on_run_start();
        self.phase = HostPhase::Running;
        info!(strategy = %spec.name, symbol = %spec.symbol, "run started");
        Ok(())
    }

    pub fn on_data(
        &mut self,
        slice: &Slice,
        host: &mut dyn ExecutionHost,
    ) -> Result<(), StrategyHostError> {
        self.require_running()?;
        let spec = self.spec()?;
        if slice.resolution_secs != spec.resolution_secs {
            return Err(StrategyHostError::ResolutionMismatch {
                expected_secs: spec.resolution_secs,
                got_secs: slice.resolution_secs,
            });
        }
        self.strategy_mut()?.on_data(slice, host)?;
        Ok(())
    }

    pub fn on_order_event(
        &mut self,
        event: &OrderEvent,
        host: &mut dyn ExecutionHost,
    ) -> Result<(), StrategyHostError> {
        self.require_running()?;
        self.strategy_mut()?.on_order_event(event, host)?;
        Ok(())
    }

    /// Close the run and collect the strategy's report.
    pub fn finish(&mut self) -> Result<StrategyRunReport, StrategyHostError> {
        self.require_running()?;
        let report = self.strategy_mut()?.on_run_end();
        self.phase = HostPhase::Finished;
        Ok(report)
    }
}
