//! Parabolic SAR Trend Strategy
//!
//! Entry on a PSAR flip, filtered by EMA trend, RSI momentum, and ADX
//! strength.

mod config;
mod strategy;

pub use config::PsarTrendConfig;
pub use strategy::PsarTrendStrategy;

use crate::strategies::Strategy;
use anyhow::Result;

/// Create strategy from the raw config section (called by the registry)
pub fn create(strategy: &serde_json::Value) -> Result<Box<dyn Strategy>> {
    let config: PsarTrendConfig = serde_json::from_value(strategy.clone())
        .map_err(|e| anyhow::anyhow!("Failed to parse psar_trend config: {}", e))?;
    Ok(Box::new(PsarTrendStrategy::new(config)))
}
