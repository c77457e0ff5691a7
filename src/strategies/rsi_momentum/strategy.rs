//! RSI momentum signal logic
//!
//! Two rule tiers. The follow rule wants a fast RSI move out of a narrow
//! band around the midline, backed by a volume surge and a trending ADX.
//! The breakout rule accepts a smaller RSI move inside a wider band, but
//! only while ADX sits in a bounded range (above it the trend is treated
//! as exhausted). Follow outranks breakout; the first matching rule wins.

use super::RsiMomentumConfig;
use crate::frame::{IndicatorFrame, IndicatorSettings};
use crate::risk::{BracketParams, StopRule};
use crate::strategies::Strategy;
use crate::types::Signal;

#[derive(Debug)]
pub struct RsiMomentumStrategy {
    config: RsiMomentumConfig,
}

impl RsiMomentumStrategy {
    pub fn new(config: RsiMomentumConfig) -> Self {
        RsiMomentumStrategy { config }
    }
}

impl Strategy for RsiMomentumStrategy {
    fn name(&self) -> &'static str {
        "rsi_momentum"
    }

    fn settings(&self) -> IndicatorSettings {
        IndicatorSettings {
            rsi: Some(self.config.rsi_period),
            adx: Some(self.config.adx_period),
            volume_ema: Some(self.config.volume_ema_period),
            volume_change: true,
            ..Default::default()
        }
    }

    fn evaluate(&self, previous: &IndicatorFrame, latest: &IndicatorFrame) -> Signal {
        let (Some(prev_rsi), Some(rsi), Some(adx), Some(volume_ema), Some(volume_change)) = (
            previous.rsi,
            latest.rsi,
            latest.adx,
            latest.volume_ema,
            latest.volume_change,
        ) else {
            return Signal::Flat;
        };

        let cfg = &self.config;
        let volume = latest.candle.volume;
        let volume_backed = volume > volume_ema && volume_change >= cfg.volume_surge;

        let follow_sell = prev_rsi - rsi >= cfg.follow_delta
            && volume_backed
            && prev_rsi > cfg.rsi_midline
            && prev_rsi < cfg.rsi_midline + cfg.follow_band
            && adx >= cfg.adx_follow;
        let follow_buy = rsi - prev_rsi >= cfg.follow_delta
            && volume_backed
            && prev_rsi < cfg.rsi_midline
            && prev_rsi > cfg.rsi_midline - cfg.follow_band
            && adx >= cfg.adx_follow;

        let breakout_adx = adx >= cfg.adx_breakout_floor && adx < cfg.adx_breakout_ceiling;
        let breakout_sell =
            prev_rsi - rsi >= cfg.breakout_delta && prev_rsi > cfg.breakout_sell_min && breakout_adx;
        let breakout_buy =
            rsi - prev_rsi >= cfg.breakout_delta && prev_rsi < cfg.breakout_buy_max && breakout_adx;

        // Tier order is part of the contract: follow before breakout, and
        // within a tier the directional bands are mutually exclusive.
        if follow_sell {
            Signal::Sell
        } else if follow_buy {
            Signal::Buy
        } else if breakout_sell {
            Signal::Sell
        } else if breakout_buy {
            Signal::Buy
        } else {
            Signal::Flat
        }
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

    fn frame(rsi: f64, adx: f64, volume: f64, volume_ema: f64, volume_change: f64) -> IndicatorFrame {
        let mut f = IndicatorFrame::from_candle(Candle::new_unchecked(
            Utc::now(),
            100.0,
            101.0,
            99.0,
            100.0,
            volume,
        ));
        f.rsi = Some(rsi);
        f.adx = Some(adx);
        f.volume_ema = Some(volume_ema);
        f.volume_change = Some(volume_change);
        f
    }

    fn strategy() -> RsiMomentumStrategy {
        RsiMomentumStrategy::new(RsiMomentumConfig::default())
    }

    #[test]
    fn test_follow_buy_fires() {
        // prev RSI 47 (inside 45-50), +4 delta, strong volume, ADX 25
        let previous = frame(47.0, 25.0, 1000.0, 900.0, 0.5);
        let latest = frame(51.0, 25.0, 2000.0, 1100.0, 1.0);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Buy);
    }

    #[test]
    fn test_follow_sell_fires() {
        let previous = frame(53.0, 25.0, 1000.0, 900.0, 0.5);
        let latest = frame(49.0, 25.0, 2000.0, 1100.0, 1.0);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Sell);
    }

    #[test]
    fn test_follow_requires_volume_above_ema() {
        let previous = frame(47.0, 25.0, 1000.0, 900.0, 0.5);
        let latest = frame(51.0, 25.0, 900.0, 1100.0, 1.0);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Flat);
    }

    #[test]
    fn test_follow_requires_volume_surge() {
        let previous = frame(47.0, 25.0, 1000.0, 900.0, 0.5);
        let latest = frame(51.0, 25.0, 2000.0, 1100.0, 0.2);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Flat);
    }

    #[test]
    fn test_follow_requires_band() {
        // prev RSI 40 is outside the 45-50 buy band
        let previous = frame(40.0, 25.0, 1000.0, 900.0, 0.5);
        let latest = frame(44.0, 25.0, 2000.0, 1100.0, 1.0);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Flat);
    }

    #[test]
    fn test_breakout_buy_in_adx_window() {
        // Small delta, wide band, ADX inside [45, 50)
        let previous = frame(60.0, 47.0, 1000.0, 1100.0, 0.0);
        let latest = frame(61.5, 47.0, 1000.0, 1100.0, 0.0);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Buy);
    }

    #[test]
    fn test_breakout_sell_in_adx_window() {
        let previous = frame(40.0, 47.0, 1000.0, 1100.0, 0.0);
        let latest = frame(38.5, 47.0, 1000.0, 1100.0, 0.0);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Sell);
    }

    #[test]
    fn test_breakout_blocked_above_adx_ceiling() {
        let previous = frame(60.0, 55.0, 1000.0, 1100.0, 0.0);
        let latest = frame(61.5, 55.0, 1000.0, 1100.0, 0.0);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Flat);
    }

    #[test]
    fn test_follow_outranks_breakout() {
        // RSI 47 -> 51 with surge and ADX 47: follow-buy and breakout-buy
        // both match; the follow tier answers. A custom config where the
        // tiers disagree on direction would also resolve to the follow tier.
        let previous = frame(47.0, 47.0, 1000.0, 900.0, 0.5);
        let latest = frame(51.0, 47.0, 2000.0, 1100.0, 1.0);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Buy);
    }

    #[test]
    fn test_missing_volume_change_is_flat() {
        let previous = frame(47.0, 25.0, 1000.0, 900.0, 0.5);
        let mut latest = frame(51.0, 25.0, 2000.0, 1100.0, 1.0);
        latest.volume_change = None;
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Flat);
    }
}
