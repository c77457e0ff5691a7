//! Candle reversal configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandleReversalConfig {
    /// Take profit as a multiple of the stop distance (default: 2.5)
    #[serde(default = "default_tp_risk_ratio")]
    pub tp_risk_ratio: f64,
}

fn default_tp_risk_ratio() -> f64 {
    2.5
}

impl Default for CandleReversalConfig {
    fn default() -> Self {
        Self { tp_risk_ratio: 2.5 }
    }
}
