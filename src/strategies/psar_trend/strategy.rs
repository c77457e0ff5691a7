//! Parabolic SAR trend signal logic
//!
//! Four conditions per direction, all required: a PSAR flip (or the first
//! defined PSAR point establishing the trend), EMA alignment, RSI between
//! the midline and the exhaustion threshold, ADX above the strength floor.
//! The two directions are evaluated independently; if both somehow fire the
//! state is inconsistent and the strategy stays flat.

use super::PsarTrendConfig;
use crate::frame::{IndicatorFrame, IndicatorSettings, PsarConfig};
use crate::risk::{BracketParams, StopRule};
use crate::strategies::Strategy;
use crate::types::Signal;

#[derive(Debug)]
pub struct PsarTrendStrategy {
    config: PsarTrendConfig,
}

impl PsarTrendStrategy {
    pub fn new(config: PsarTrendConfig) -> Self {
        PsarTrendStrategy { config }
    }
}

impl Strategy for PsarTrendStrategy {
    fn name(&self) -> &'static str {
        "psar_trend"
    }

    fn settings(&self) -> IndicatorSettings {
        IndicatorSettings {
            short_ema: Some(self.config.short_ema),
            long_ema: Some(self.config.long_ema),
            rsi: Some(self.config.rsi_period),
            adx: Some(self.config.adx_period),
            psar: Some(PsarConfig {
                af_step: self.config.af_step,
                af_max: self.config.af_max,
            }),
            ..Default::default()
        }
    }

    fn evaluate(&self, previous: &IndicatorFrame, latest: &IndicatorFrame) -> Signal {
        let (Some(prev_short), Some(prev_long), Some(cur_short), Some(cur_long), Some(rsi), Some(adx)) = (
            previous.short_ema,
            previous.long_ema,
            latest.short_ema,
            latest.long_ema,
            latest.rsi,
            latest.adx,
        ) else {
            return Signal::Flat;
        };
        let Some(cur_psar) = latest.psar else {
            return Signal::Flat;
        };

        let cfg = &self.config;
        let strong_trend = adx > cfg.adx_threshold;

        // A flip is the SAR crossing from one side of price to the other
        // between the two frames. A series that starts directly in a trend
        // (previous PSAR undefined) counts as trend establishment.
        let (buy_flip, sell_flip) = match previous.psar {
            Some(prev_psar) => (
                prev_psar.value > previous.candle.close && cur_psar.value < latest.candle.close,
                prev_psar.value < previous.candle.close && cur_psar.value > latest.candle.close,
            ),
            None => (cur_psar.is_rising(), cur_psar.is_falling()),
        };

        let ema_buy = cur_short > cur_long || (prev_short <= prev_long && cur_short > cur_long);
        let ema_sell = cur_short < cur_long || (prev_short >= prev_long && cur_short < cur_long);

        let rsi_buy = rsi > cfg.rsi_midline && rsi < cfg.rsi_overbought;
        let rsi_sell = rsi < cfg.rsi_midline && rsi > cfg.rsi_oversold;

        let buy = buy_flip && ema_buy && rsi_buy && strong_trend;
        let sell = sell_flip && ema_sell && rsi_sell && strong_trend;

        match (buy, sell) {
            (true, false) => Signal::Buy,
            (false, true) => Signal::Sell,
            // Both firing means contradictory inputs; emit nothing rather
            // than pick a side.
            _ => Signal::Flat,
        }
    }

    fn bracket_params(&self) -> BracketParams {
        BracketParams {
            stop_rule: StopRule::PercentOfEntry(self.config.stop_loss_pct),
            risk_reward_ratio: self.config.tp_risk_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{PsarPoint, PsarTrend};
    use crate::types::Candle;
    use chrono::Utc;

    #[allow(clippy::too_many_arguments)]
    fn frame(
        close: f64,
        short_ema: f64,
        long_ema: f64,
        rsi: f64,
        adx: f64,
        psar: Option<(f64, PsarTrend)>,
    ) -> IndicatorFrame {
        let mut f = IndicatorFrame::from_candle(Candle::new_unchecked(
            Utc::now(),
            close,
            close + 1.0,
            close - 1.0,
            close,
            1000.0,
        ));
        f.short_ema = Some(short_ema);
        f.long_ema = Some(long_ema);
        f.rsi = Some(rsi);
        f.adx = Some(adx);
        f.psar = psar.map(|(value, trend)| PsarPoint { value, trend });
        f
    }

    fn strategy() -> PsarTrendStrategy {
        PsarTrendStrategy::new(PsarTrendConfig::default())
    }

    #[test]
    fn test_bullish_flip_with_all_filters_buys() {
        // SAR above price, then below; EMAs aligned up; RSI 60; ADX 30
        let previous = frame(100.0, 101.0, 100.5, 55.0, 30.0, Some((102.0, PsarTrend::Falling)));
        let latest = frame(103.0, 102.0, 101.0, 60.0, 30.0, Some((99.0, PsarTrend::Rising)));
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Buy);
    }

    #[test]
    fn test_bearish_flip_with_all_filters_sells() {
        let previous = frame(100.0, 99.5, 100.5, 45.0, 30.0, Some((98.0, PsarTrend::Rising)));
        let latest = frame(97.0, 98.0, 100.0, 40.0, 30.0, Some((101.0, PsarTrend::Falling)));
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Sell);
    }

    #[test]
    fn test_weak_adx_blocks_flip() {
        let previous = frame(100.0, 101.0, 100.5, 55.0, 20.0, Some((102.0, PsarTrend::Falling)));
        let latest = frame(103.0, 102.0, 101.0, 60.0, 20.0, Some((99.0, PsarTrend::Rising)));
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Flat);
    }

    #[test]
    fn test_overbought_rsi_blocks_buy_flip() {
        let previous = frame(100.0, 101.0, 100.5, 68.0, 30.0, Some((102.0, PsarTrend::Falling)));
        let latest = frame(103.0, 102.0, 101.0, 75.0, 30.0, Some((99.0, PsarTrend::Rising)));
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Flat);
    }

    #[test]
    fn test_ema_misalignment_blocks_buy_flip() {
        // SAR flips up but short EMA still below long
        let previous = frame(100.0, 99.0, 100.5, 55.0, 30.0, Some((102.0, PsarTrend::Falling)));
        let latest = frame(103.0, 99.5, 101.0, 60.0, 30.0, Some((99.0, PsarTrend::Rising)));
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Flat);
    }

    #[test]
    fn test_trend_establishment_from_undefined_psar() {
        // Previous frame has no PSAR state yet; latest opens rising
        let previous = frame(100.0, 101.0, 100.5, 55.0, 30.0, None);
        let latest = frame(103.0, 102.0, 101.0, 60.0, 30.0, Some((99.0, PsarTrend::Rising)));
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Buy);
    }

    #[test]
    fn test_no_flip_no_signal() {
        // SAR stays below price both frames
        let previous = frame(100.0, 101.0, 100.5, 55.0, 30.0, Some((98.0, PsarTrend::Rising)));
        let latest = frame(103.0, 102.0, 101.0, 60.0, 30.0, Some((99.0, PsarTrend::Rising)));
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Flat);
    }

    #[test]
    fn test_missing_psar_on_latest_is_flat() {
        let previous = frame(100.0, 101.0, 100.5, 55.0, 30.0, Some((102.0, PsarTrend::Falling)));
        let latest = frame(103.0, 102.0, 101.0, 60.0, 30.0, None);
        assert_eq!(strategy().evaluate(&previous, &latest), Signal::Flat);
    }
}
