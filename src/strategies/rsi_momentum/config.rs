//! RSI Momentum configuration
//!
//! Every threshold is a parameter; deployments of this rule set tend to
//! retune the bands per market, so nothing is hardcoded.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsiMomentumConfig {
    /// RSI period (default: 30)
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Volume EMA period (default: 14)
    #[serde(default = "default_volume_ema_period")]
    pub volume_ema_period: usize,

    /// ADX period (default: 14)
    #[serde(default = "default_adx_period")]
    pub adx_period: usize,

    /// Minimum RSI change between frames for the follow rule (default: 3.0)
    #[serde(default = "default_follow_delta")]
    pub follow_delta: f64,

    /// RSI midline separating the directional bands (default: 50)
    #[serde(default = "default_rsi_midline")]
    pub rsi_midline: f64,

    /// Width of the follow-rule band on each side of the midline
    /// (default: 5 -> buys from 45-50, sells from 50-55)
    #[serde(default = "default_follow_band")]
    pub follow_band: f64,

    /// Minimum ADX for the follow rule (default: 20)
    #[serde(default = "default_adx_follow")]
    pub adx_follow: f64,

    /// Minimum relative volume change for the follow rule (default: 0.75)
    #[serde(default = "default_volume_surge")]
    pub volume_surge: f64,

    /// Minimum RSI change for the breakout rule (default: 1.0)
    #[serde(default = "default_breakout_delta")]
    pub breakout_delta: f64,

    /// Breakout buys require previous RSI below this (default: 65)
    #[serde(default = "default_breakout_buy_max")]
    pub breakout_buy_max: f64,

    /// Breakout sells require previous RSI above this (default: 35)
    #[serde(default = "default_breakout_sell_min")]
    pub breakout_sell_min: f64,

    /// ADX range for the breakout rule; the ceiling filters out exhausted
    /// trends (defaults: 45 to 50)
    #[serde(default = "default_adx_breakout_floor")]
    pub adx_breakout_floor: f64,
    #[serde(default = "default_adx_breakout_ceiling")]
    pub adx_breakout_ceiling: f64,

    /// Take profit as a multiple of the stop distance (default: 5.0)
    #[serde(default = "default_tp_risk_ratio")]
    pub tp_risk_ratio: f64,
}

fn default_rsi_period() -> usize {
    30
}
fn default_volume_ema_period() -> usize {
    14
}
fn default_adx_period() -> usize {
    14
}
fn default_follow_delta() -> f64 {
    3.0
}
fn default_rsi_midline() -> f64 {
    50.0
}
fn default_follow_band() -> f64 {
    5.0
}
fn default_adx_follow() -> f64 {
    20.0
}
fn default_volume_surge() -> f64 {
    0.75
}
fn default_breakout_delta() -> f64 {
    1.0
}
fn default_breakout_buy_max() -> f64 {
    65.0
}
fn default_breakout_sell_min() -> f64 {
    35.0
}
fn default_adx_breakout_floor() -> f64 {
    45.0
}
fn default_adx_breakout_ceiling() -> f64 {
    50.0
}
fn default_tp_risk_ratio() -> f64 {
    5.0
}

impl Default for RsiMomentumConfig {
    fn default() -> Self {
        Self {
            rsi_period: 30,
            volume_ema_period: 14,
            adx_period: 14,
            follow_delta: 3.0,
            rsi_midline: 50.0,
            follow_band: 5.0,
            adx_follow: 20.0,
            volume_surge: 0.75,
            breakout_delta: 1.0,
            breakout_buy_max: 65.0,
            breakout_sell_min: 35.0,
            adx_breakout_floor: 45.0,
            adx_breakout_ceiling: 50.0,
            tp_risk_ratio: 5.0,
        }
    }
}
