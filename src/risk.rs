//! Risk bracket calculation
//!
//! Turns a signal into a submittable bracket: stop-loss per the strategy's
//! stop rule, take-profit from a fixed risk-reward ratio, both rounded to
//! the exchange tick size.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{BracketOrder, Candle, Side};

/// Fallback stop distance when the computed risk is non-positive, as a
/// fraction of the entry price
const MIN_RISK_FRACTION: f64 = 0.001;

/// How the stop-loss price is derived from the signal candle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopRule {
    /// Stop at a fixed fraction below (buy) or above (sell) the entry
    PercentOfEntry(f64),
    /// Stop at the signal candle's low (buy) or high (sell)
    SignalCandleExtremum,
}

/// Stop rule plus take-profit ratio, supplied by the strategy
#[derive(Debug, Clone, Copy)]
pub struct BracketParams {
    pub stop_rule: StopRule,
    pub risk_reward_ratio: f64,
}

/// Round a price to the nearest multiple of the exchange tick size
///
/// A tick size of zero (or less) is a degenerate value some instrument
/// endpoints return; the price passes through unrounded rather than
/// dividing by zero.
pub fn round_to_tick(price: f64, tick_size: f64) -> f64 {
    if tick_size <= 0.0 {
        return price;
    }
    (price / tick_size).round() * tick_size
}

/// Compute the full bracket for a signal
///
/// Entry is estimated at the signal candle's close. A non-positive stop
/// distance is replaced with `entry * 0.001` and the stop recomputed on the
/// correct side; the adjustment is logged, never silent.
pub fn compute_bracket(
    side: Side,
    signal_candle: &Candle,
    params: &BracketParams,
    size: u32,
    tick_size: f64,
) -> BracketOrder {
    let entry = signal_candle.close;

    let mut stop_loss = match (side, params.stop_rule) {
        (Side::Buy, StopRule::PercentOfEntry(pct)) => entry * (1.0 - pct),
        (Side::Sell, StopRule::PercentOfEntry(pct)) => entry * (1.0 + pct),
        (Side::Buy, StopRule::SignalCandleExtremum) => signal_candle.low,
        (Side::Sell, StopRule::SignalCandleExtremum) => signal_candle.high,
    };

    let mut risk = match side {
        Side::Buy => entry - stop_loss,
        Side::Sell => stop_loss - entry,
    };

    if risk <= 0.0 {
        risk = entry * MIN_RISK_FRACTION;
        stop_loss = match side {
            Side::Buy => entry - risk,
            Side::Sell => entry + risk,
        };
        warn!(
            "non-positive risk for {} at entry {:.2}; stop adjusted to {:.2}",
            side, entry, stop_loss
        );
    }

    let take_profit = match side {
        Side::Buy => entry + risk * params.risk_reward_ratio,
        Side::Sell => entry - risk * params.risk_reward_ratio,
    };

    BracketOrder {
        side,
        entry_estimate: entry,
        stop_loss: round_to_tick(stop_loss, tick_size),
        take_profit: round_to_tick(take_profit, tick_size),
        size,
    }
}
