//! Candle Reversal Strategy
//!
//! Engulfing-reversal pattern on raw OHLC, no indicators.

mod config;
mod strategy;

pub use config::CandleReversalConfig;
pub use strategy::CandleReversalStrategy;

use crate::strategies::Strategy;
use anyhow::Result;

/// Create strategy from the raw config section (called by the registry)
pub fn create(strategy: &serde_json::Value) -> Result<Box<dyn Strategy>> {
    let config: CandleReversalConfig = serde_json::from_value(strategy.clone())
        .map_err(|e| anyhow::anyhow!("Failed to parse candle_reversal config: {}", e))?;
    Ok(Box::new(CandleReversalStrategy::new(config)))
}
