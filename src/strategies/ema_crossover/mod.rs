//! EMA Crossover Strategy
//!
//! Entry on a fast/slow EMA cross confirmed by the RSI band.

mod config;
mod strategy;

pub use config::EmaCrossoverConfig;
pub use strategy::EmaCrossoverStrategy;

use crate::strategies::Strategy;
use anyhow::Result;

/// Create strategy from the raw config section (called by the registry)
pub fn create(strategy: &serde_json::Value) -> Result<Box<dyn Strategy>> {
    let config: EmaCrossoverConfig = serde_json::from_value(strategy.clone())
        .map_err(|e| anyhow::anyhow!("Failed to parse ema_crossover config: {}", e))?;
    Ok(Box::new(EmaCrossoverStrategy::new(config)))
}
