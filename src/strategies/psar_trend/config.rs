//! Parabolic SAR trend configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsarTrendConfig {
    /// PSAR initial acceleration factor (default: 0.02)
    #[serde(default = "default_af_step")]
    pub af_step: f64,

    /// PSAR maximum acceleration factor (default: 0.2)
    #[serde(default = "default_af_max")]
    pub af_max: f64,

    /// Fast EMA period for short-term momentum (default: 20)
    #[serde(default = "default_short_ema")]
    pub short_ema: usize,

    /// Slow EMA period for the overall trend (default: 50)
    #[serde(default = "default_long_ema")]
    pub long_ema: usize,

    /// ADX period (default: 14)
    #[serde(default = "default_adx_period")]
    pub adx_period: usize,

    /// Minimum ADX for a tradeable trend (default: 25)
    #[serde(default = "default_adx_threshold")]
    pub adx_threshold: f64,

    /// RSI period (default: 14)
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// RSI above this blocks buys (default: 70)
    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: f64,

    /// RSI below this blocks sells (default: 30)
    #[serde(default = "default_rsi_oversold")]
    pub rsi_oversold: f64,

    /// RSI midline for momentum direction (default: 50)
    #[serde(default = "default_rsi_midline")]
    pub rsi_midline: f64,

    /// Stop loss as a fraction of entry (default: 0.005 = 0.5%)
    #[serde(default = "default_stop_loss_pct")]
    pub stop_loss_pct: f64,

    /// Take profit as a multiple of the stop distance (default: 3.0)
    #[serde(default = "default_tp_risk_ratio")]
    pub tp_risk_ratio: f64,
}

fn default_af_step() -> f64 {
    0.02
}
fn default_af_max() -> f64 {
    0.2
}
fn default_short_ema() -> usize {
    20
}
fn default_long_ema() -> usize {
    50
}
fn default_adx_period() -> usize {
    14
}
fn default_adx_threshold() -> f64 {
    25.0
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

impl Default for PsarTrendConfig {
    fn default() -> Self {
        Self {
            af_step: 0.02,
            af_max: 0.2,
            short_ema: 20,
            long_ema: 50,
            adx_period: 14,
            adx_threshold: 25.0,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            rsi_midline: 50.0,
            stop_loss_pct: 0.005,
            tp_risk_ratio: 3.0,
        }
    }
}
