//! EMA Crossover configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmaCrossoverConfig {
    /// Fast EMA period (default: 20)
    #[serde(default = "default_short_ema")]
    pub short_ema: usize,

    /// Slow EMA period (default: 50)
    #[serde(default = "default_long_ema")]
    pub long_ema: usize,

    /// RSI period (default: 14)
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// RSI above this blocks buys (default: 70)
    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: f64,

    /// RSI below this blocks sells (default: 30)
    #[serde(default = "default_rsi_oversold")]
    pub rsi_oversold: f64,

    /// RSI midline separating buy and sell bands (default: 50)
    #[serde(default = "default_rsi_midline")]
    pub rsi_midline: f64,

    /// Stop loss as a fraction of entry (default: 0.005 = 0.5%)
    #[serde(default = "default_stop_loss_pct")]
    pub stop_loss_pct: f64,

    /// Take profit as a multiple of the stop distance (default: 3.0)
    #[serde(default = "default_tp_risk_ratio")]
    pub tp_risk_ratio: f64,
}

fn default_short_ema() -> usize {
    20
}
fn default_long_ema() -> usize {
    50
}
fn default_rsi_period() -> usize {
    14
}
fn default_rsi_overbought() -> f64 {
    70.0
}
fn default_rsi_oversold() -> f64 {
    30.0
}
fn default_rsi_midline() -> f64 {
    50.0
}
fn default_stop_loss_pct() -> f64 {
    0.005
}
fn default_tp_risk_ratio() -> f64 {
    3.0
}

impl Default for EmaCrossoverConfig {
    fn default() -> Self {
        Self {
            short_ema: 20,
            long_ema: 50,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            rsi_midline: 50.0,
            stop_loss_pct: 0.005,
            tp_risk_ratio: 3.0,
        }
    }
}
