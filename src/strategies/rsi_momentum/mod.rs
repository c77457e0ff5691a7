//! RSI Momentum Strategy
//!
//! Fast RSI swings confirmed by volume surge and trend strength, with a
//! secondary breakout rule for strongly trending regimes.

mod config;
mod strategy;

pub use config::RsiMomentumConfig;
pub use strategy::RsiMomentumStrategy;

use crate::strategies::Strategy;
use anyhow::Result;

/// Create strategy from the raw config section (called by the registry)
pub fn create(strategy: &serde_json::Value) -> Result<Box<dyn Strategy>> {
    let config: RsiMomentumConfig = serde_json::from_value(strategy.clone())
        .map_err(|e| anyhow::anyhow!("Failed to parse rsi_momentum config: {}", e))?;
    Ok(Box::new(RsiMomentumStrategy::new(config)))
}
