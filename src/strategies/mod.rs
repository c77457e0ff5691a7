//! Trading strategies
//!
//! One sub-module per signal variant, unified behind the `Strategy` trait
//! and selected by name from configuration. Each strategy is a pure
//! function of the (previous, latest) indicator frames.

pub mod candle_reversal;
pub mod ema_crossover;
pub mod psar_trend;
pub mod rsi_momentum;

use anyhow::{bail, Context, Result};

use crate::frame::{compute_frames, latest_pair, IndicatorFrame, IndicatorSettings};
use crate::risk::BracketParams;
use crate::types::{Candle, Signal, SignalError};

/// Trading strategy trait
pub trait Strategy: std::fmt::Debug + Send + Sync {
    /// Strategy name as it appears in configuration
    fn name(&self) -> &'static str;

    /// Indicators this strategy needs computed on the series
    fn settings(&self) -> IndicatorSettings;

    /// Produce a decision from two consecutive fully-defined frames
    fn evaluate(&self, previous: &IndicatorFrame, latest: &IndicatorFrame) -> Signal;

    /// Stop rule and risk-reward ratio for bracket construction
    fn bracket_params(&self) -> BracketParams;
}

/// Create a strategy from the raw `strategy` section of the config
///
/// The section must carry a `name` field; the remaining fields are parsed
/// by the selected strategy's own config struct.
pub fn create(strategy: &serde_json::Value) -> Result<Box<dyn Strategy>> {
    let name = strategy
        .get("name")
        .and_then(|v| v.as_str())
        .context("'name' is required in the 'strategy' section of config")?;

    match name {
        "ema_crossover" => ema_crossover::create(strategy),
        "rsi_momentum" => rsi_momentum::create(strategy),
        "psar_trend" => psar_trend::create(strategy),
        "candle_reversal" => candle_reversal::create(strategy),
        other => bail!(
            "unknown strategy '{}' (known: ema_crossover, rsi_momentum, psar_trend, candle_reversal)",
            other
        ),
    }
}

/// Outcome of one evaluation cycle
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub signal: Signal,
    /// The candle that produced the signal; brackets are derived from it
    pub signal_candle: Candle,
}

/// Run one full evaluation over a fresh candle series
///
/// Annotates the series, drops the warm-up prefix, and evaluates the
/// strategy on the last two defined rows. `InsufficientData` means the
/// caller should wait for more history, not guess.
pub fn evaluate_series(
    strategy: &dyn Strategy,
    candles: &[Candle],
) -> Result<Evaluation, SignalError> {
    let settings = strategy.settings();
    let frames = compute_frames(candles, &settings)?;
    let (previous, latest) = latest_pair(&frames, &settings)?;

    Ok(Evaluation {
        signal: strategy.evaluate(previous, latest),
        signal_candle: latest.candle.clone(),
    })
}
