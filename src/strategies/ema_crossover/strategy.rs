//! EMA crossover signal logic

use super::EmaCrossoverConfig;
use crate::frame::{IndicatorFrame, IndicatorSettings};
use crate::risk::{BracketParams, StopRule};
use crate::strategies::Strategy;
use crate::types::Signal;

#[derive(Debug)]
pub struct EmaCrossoverStrategy {
    config: EmaCrossoverConfig,
}

impl EmaCrossoverStrategy {
    pub fn new(config: EmaCrossoverConfig) -> Self {
        EmaCrossoverStrategy { config }
    }
}

impl Strategy for EmaCrossoverStrategy {
    fn name(&self) -> &'static str {
        "ema_crossover"
    }

    fn settings(&self) -> IndicatorSettings {
        IndicatorSettings {
            short_ema: Some(self.config.short_ema),
            long_ema: Some(self.config.long_ema),
            rsi: Some(self.config.rsi_period),
            ..Default::default()
        }
    }

    fn evaluate(&self, previous: &IndicatorFrame, latest: &IndicatorFrame) -> Signal {
        let (Some(prev_short), Some(prev_long), Some(cur_short), Some(cur_long), Some(rsi)) = (
            previous.short_ema,
            previous.long_ema,
            latest.short_ema,
            latest.long_ema,
            latest.rsi,
        ) else {
            return Signal::Flat;
        };

        // Equality on the previous row counts as "not yet crossed"; the
        // cross fires only once the latest row is strictly through.
        let crossed_up = prev_short <= prev_long && cur_short > cur_long;
        let crossed_down = prev_short >= prev_long && cur_short < cur_long;

        // Buy is evaluated first; the bands make the two directions
        // mutually exclusive in practice.
        if crossed_up && rsi > self.config.rsi_midline && rsi < self.config.rsi_overbought {
            return Signal::Buy;
        }

        if crossed_down && rsi < self.config.rsi_midline && rsi > self.config.rsi_oversold {
            return Signal::Sell;
        }

        Signal::Flat
    }

    fn bracket_params(&self) -> BracketParams {
        BracketParams {
            stop_rule: StopRule::PercentOfEntry(self.config.stop_loss_pct),
            risk_reward_ratio: self.config.tp_risk_ratio,
        }
    }
}
