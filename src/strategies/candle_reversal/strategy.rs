//! Candle reversal signal logic
//!
//! Buy: previous candle green, latest wicks below its low, then closes
//! above its high. Sell is the mirror image. The sweep-and-reclaim shape is
//! the whole signal; no indicator filters.

use super::CandleReversalConfig;
use crate::frame::{IndicatorFrame, IndicatorSettings};
use crate::risk::{BracketParams, StopRule};
use crate::strategies::Strategy;
use crate::types::Signal;

#[derive(Debug)]
pub struct CandleReversalStrategy {
    config: CandleReversalConfig,
}

impl CandleReversalStrategy {
    pub fn new(config: CandleReversalConfig) -> Self {
        CandleReversalStrategy { config }
    }
}

impl Strategy for CandleReversalStrategy {
    fn name(&self) -> &'static str {
        "candle_reversal"
    }

    fn settings(&self) -> IndicatorSettings {
        // Raw OHLC only; the two-row minimum still applies
        IndicatorSettings::default()
    }

    fn evaluate(&self, previous: &IndicatorFrame, latest: &IndicatorFrame) -> Signal {
        let prev = &previous.candle;
        let cur = &latest.candle;

        if prev.is_bullish() && cur.low < prev.low && cur.close > prev.high {
            return Signal::Buy;
        }

        if prev.is_bearish() && cur.high > prev.high && cur.close < prev.low {
            return Signal::Sell;
        }

        Signal::Flat
    }

    fn bracket_params(&self) -> BracketParams {
        BracketParams {
            stop_rule: StopRule::SignalCandleExtremum,
            risk_reward_ratio: self.config.tp_risk_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Candle;
    use chrono::Utc;

    fn frame(open: f64, high: f64, low: f64, close: f64) -> IndicatorFrame {
        IndicatorFrame::from_candle(Candle::new_unchecked(
            Utc::now(),
            open,
            high,
            low,
            close,
            1000.0,
        ))
    }

    fn strategy() -> CandleReversalStrategy {
        CandleReversalStrategy::new(CandleReversalConfig::default())
    }

    #[test]
    fn test_bullish_reversal_buys() {
        // Green candle 100->105 (low 101, high 105.5); latest sweeps the low
        // to 99 and closes at 106, above the previous high
        let previous = frame(100.0, 105.5, 101.0, 105.0);
        let latest = frame(104.0, 106.5, 99.0, 106.0);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Buy);
    }

    #[test]
    fn test_bearish_reversal_sells() {
        let previous = frame(105.0, 105.5, 100.5, 101.0);
        let latest = frame(102.0, 107.0, 99.5, 100.0);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Sell);
    }

    #[test]
    fn test_no_sweep_no_signal() {
        // Latest closes above the previous high but never undercut its low
        let previous = frame(100.0, 105.5, 101.0, 105.0);
        let latest = frame(104.0, 106.5, 102.0, 106.0);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Flat);
    }

    #[test]
    fn test_no_reclaim_no_signal() {
        // Sweeps the low but closes inside the previous range
        let previous = frame(100.0, 105.5, 101.0, 105.0);
        let latest = frame(104.0, 105.0, 99.0, 104.5);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Flat);
    }

    #[test]
    fn test_doji_previous_candle_no_signal() {
        // Previous open == close is neither bullish nor bearish
        let previous = frame(100.0, 101.0, 99.0, 100.0);
        let latest = frame(100.0, 102.0, 98.0, 101.5);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Flat);
    }
}
