use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `/strategy` section. Prices are decimal offsets from the bar close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub symbol: String,
    pub resolution_secs: i64,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub quantity: i64,
    pub history_len: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            symbol: "AUDUSD".to_string(),
            resolution_secs: 3600,
            take_profit: 0.003,
            stop_loss: 0.001,
            quantity: 1,
            history_len: 500,
        }
    }
}

/// `/run` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Trade id RNG seed. Absent: entropy.
    pub seed: Option<u64>,
    /// Replay window start (inclusive), RFC 3339.
    pub start: Option<DateTime<Utc>>,
    /// Replay window end (exclusive), RFC 3339.
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    pub strategy: StrategyConfig,
    pub run: RunConfig,
}

impl FxConfig {
    /// Read the typed view out of merged config JSON and validate it.
    /// Missing sections and keys take their defaults.
    pub fn from_json(config_json: &Value) -> Result<Self> {
        let strategy = match config_json.pointer("/strategy") {
            Some(v) => StrategyConfig::deserialize(v).context("invalid /strategy section")?,
            None => StrategyConfig::default(),
        };
        let run = match config_json.pointer("/run") {
            Some(v) => RunConfig::deserialize(v).context("invalid /run section")?,
            None => RunConfig::default(),
        };
        let cfg = Self { strategy, run };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.strategy;
        if s.symbol.trim().is_empty() {
            bail!("CONFIG_INVALID /strategy/symbol must not be empty");
        }
        if s.resolution_secs <= 0 {
            bail!(
                "CONFIG_INVALID /strategy/resolution_secs must be > 0 (got {})",
                s.resolution_secs
            );
        }
        if !(s.take_profit.is_finite() && s.take_profit > 0.0) {
            bail!(
                "CONFIG_INVALID /strategy/take_profit must be > 0 (got {})",
                s.take_profit
            );
        }
        if !(s.stop_loss.is_finite() && s.stop_loss > 0.0) {
            bail!(
                "CONFIG_INVALID /strategy/stop_loss must be > 0 (got {})",
                s.stop_loss
            );
        }
        if s.quantity <= 0 {
            bail!(
                "CONFIG_INVALID /strategy/quantity must be > 0 (got {})",
                s.quantity
            );
        }
        if s.history_len == 0 {
            bail!("CONFIG_INVALID /strategy/history_len must be > 0");
        }
        if let (Some(start), Some(end)) = (self.run.start, self.run.end) {
            if start >= end {
                bail!("CONFIG_INVALID /run/start ({start}) must be before /run/end ({end})");
            }
        }
        Ok(())
    }
}
