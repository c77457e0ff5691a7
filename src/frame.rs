//! Indicator-annotated candle series
//!
//! Replaces the "latest row of a table" access pattern with a typed frame:
//! each candle is paired with the indicator values a strategy declared it
//! needs. Warm-up rows carry `None` and are dropped before evaluation.

use crate::indicators::{adx, ema, psar, rsi, PsarPoint};
use crate::types::{Candle, SignalError};

/// Parabolic SAR parameters
#[derive(Debug, Clone, Copy)]
pub struct PsarConfig {
    pub af_step: f64,
    pub af_max: f64,
}

/// Which indicators a strategy needs, and at what periods
///
/// Unset slots are never computed; their frame fields stay `None` and do not
/// participate in warm-up accounting or row dropping.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSettings {
    pub short_ema: Option<usize>,
    pub long_ema: Option<usize>,
    pub rsi: Option<usize>,
    pub adx: Option<usize>,
    pub volume_ema: Option<usize>,
    pub volume_change: bool,
    pub psar: Option<PsarConfig>,
}

impl IndicatorSettings {
    /// Longest warm-up across the requested indicators
    pub fn warmup(&self) -> usize {
        let mut warmup = 0usize;
        if let Some(p) = self.short_ema {
            warmup = warmup.max(p.saturating_sub(1));
        }
        if let Some(p) = self.long_ema {
            warmup = warmup.max(p.saturating_sub(1));
        }
        if let Some(p) = self.rsi {
            warmup = warmup.max(p);
        }
        if let Some(p) = self.adx {
            warmup = warmup.max((2 * p).saturating_sub(1));
        }
        if let Some(p) = self.volume_ema {
            warmup = warmup.max(p.saturating_sub(1));
        }
        if self.volume_change {
            warmup = warmup.max(1);
        }
        if self.psar.is_some() {
            warmup = warmup.max(1);
        }
        warmup
    }

    /// Minimum series length for one evaluation: the warm-up plus a defined
    /// previous row and the current row
    pub fn min_candles(&self) -> usize {
        self.warmup() + 2
    }
}

/// One candle annotated with the computed indicator values
///
/// `None` means either the indicator was not requested or the row is inside
/// its warm-up period.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub candle: Candle,
    pub short_ema: Option<f64>,
    pub long_ema: Option<f64>,
    pub rsi: Option<f64>,
    pub adx: Option<f64>,
    pub volume_ema: Option<f64>,
    pub volume_change: Option<f64>,
    pub psar: Option<PsarPoint>,
}

impl IndicatorFrame {
    /// A bare frame with no indicator values (used by strategies that only
    /// read raw OHLC)
    pub fn from_candle(candle: Candle) -> Self {
        IndicatorFrame {
            candle,
            short_ema: None,
            long_ema: None,
            rsi: None,
            adx: None,
            volume_ema: None,
            volume_change: None,
            psar: None,
        }
    }

    /// True when every indicator requested in `settings` is defined on this row
    pub fn is_defined(&self, settings: &IndicatorSettings) -> bool {
        if settings.short_ema.is_some() && self.short_ema.is_none() {
            return false;
        }
        if settings.long_ema.is_some() && self.long_ema.is_none() {
            return false;
        }
        if settings.rsi.is_some() && self.rsi.is_none() {
            return false;
        }
        if settings.adx.is_some() && self.adx.is_none() {
            return false;
        }
        if settings.volume_ema.is_some() && self.volume_ema.is_none() {
            return false;
        }
        if settings.volume_change && self.volume_change.is_none() {
            return false;
        }
        if settings.psar.is_some() && self.psar.is_none() {
            return false;
        }
        true
    }
}

/// Annotate a candle series with the indicators requested in `settings`
///
/// Errors with `InsufficientData` when the series is shorter than the
/// warm-up plus the two rows a crossover comparison needs. Indicator values
/// are causal: row i uses candles 0..=i only.
pub fn compute_frames(
    candles: &[Candle],
    settings: &IndicatorSettings,
) -> Result<Vec<IndicatorFrame>, SignalError> {
    let required = settings.min_candles();
    if candles.len() < required {
        return Err(SignalError::InsufficientData {
            required,
            available: candles.len(),
        });
    }

    let close: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let high: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let low: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let volume: Vec<f64> = candles.iter().map(|c| c.volume).collect();

    let none = || vec![None; candles.len()];
    let short_ema = settings.short_ema.map_or_else(none, |p| ema(&close, p));
    let long_ema = settings.long_ema.map_or_else(none, |p| ema(&close, p));
    let rsi_values = settings.rsi.map_or_else(none, |p| rsi(&close, p));
    let adx_values = settings
        .adx
        .map_or_else(none, |p| adx(&high, &low, &close, p));
    let volume_ema = settings.volume_ema.map_or_else(none, |p| ema(&volume, p));
    let psar_values = match settings.psar {
        Some(cfg) => psar(&high, &low, &close, cfg.af_step, cfg.af_max),
        None => vec![None; candles.len()],
    };

    let mut frames = Vec::with_capacity(candles.len());
    for (i, candle) in candles.iter().enumerate() {
        let volume_change = if settings.volume_change && i > 0 {
            // Zero previous volume uses a unit denominator, matching the
            // exchange feed's replace-zero convention
            let prev = if volume[i - 1] == 0.0 { 1.0 } else { volume[i - 1] };
            Some((volume[i] - volume[i - 1]) / prev)
        } else {
            None
        };

        frames.push(IndicatorFrame {
            candle: candle.clone(),
            short_ema: short_ema[i],
            long_ema: long_ema[i],
            rsi: rsi_values[i],
            adx: adx_values[i],
            volume_ema: volume_ema[i],
            volume_change,
            psar: psar_values[i],
        });
    }

    Ok(frames)
}

/// Drop the undefined warm-up prefix and return the usable tail
///
/// Errors with `InsufficientData` if fewer than two fully-defined rows
/// remain.
pub fn defined_tail<'a>(
    frames: &'a [IndicatorFrame],
    settings: &IndicatorSettings,
) -> Result<&'a [IndicatorFrame], SignalError> {
    let start = frames
        .iter()
        .position(|f| f.is_defined(settings))
        .unwrap_or(frames.len());
    let tail = &frames[start..];
    if tail.len() < 2 {
        return Err(SignalError::InsufficientData {
            required: settings.min_candles(),
            available: frames.len(),
        });
    }
    Ok(tail)
}

/// The (previous, latest) pair of fully-defined frames a strategy evaluates
pub fn latest_pair<'a>(
    frames: &'a [IndicatorFrame],
    settings: &IndicatorSettings,
) -> Result<(&'a IndicatorFrame, &'a IndicatorFrame), SignalError> {
    let tail = defined_tail(frames, settings)?;
    Ok((&tail[tail.len() - 2], &tail[tail.len() - 1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn flat_candles(count: usize) -> Vec<Candle> {
        let start = Utc::now() - Duration::minutes(count as i64 * 5);
        (0..count)
            .map(|i| {
                Candle::new_unchecked(
                    start + Duration::minutes(i as i64 * 5),
                    100.0,
                    101.0,
                    99.0,
                    100.0,
                    1000.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_warmup_accounting() {
        let settings = IndicatorSettings {
            short_ema: Some(20),
            long_ema: Some(50),
            rsi: Some(14),
            adx: Some(14),
            ..Default::default()
        };
        // long EMA: 49, ADX: 27, RSI: 14
        assert_eq!(settings.warmup(), 49);
        assert_eq!(settings.min_candles(), 51);
    }

    #[test]
    fn test_insufficient_candles_is_an_error() {
        let settings = IndicatorSettings {
            rsi: Some(14),
            ..Default::default()
        };
        let candles = flat_candles(10);
        let err = compute_frames(&candles, &settings).unwrap_err();
        assert!(matches!(
            err,
            SignalError::InsufficientData {
                required: 16,
                available: 10
            }
        ));
    }

    #[test]
    fn test_defined_tail_drops_warmup_prefix() {
        let settings = IndicatorSettings {
            rsi: Some(14),
            ..Default::default()
        };
        let candles = flat_candles(30);
        let frames = compute_frames(&candles, &settings).unwrap();
        let tail = defined_tail(&frames, &settings).unwrap();

        assert_eq!(tail.len(), 30 - 14);
        assert!(tail.iter().all(|f| f.rsi.is_some()));
    }

    #[test]
    fn test_unrequested_indicators_stay_none() {
        let settings = IndicatorSettings {
            rsi: Some(14),
            ..Default::default()
        };
        let candles = flat_candles(30);
        let frames = compute_frames(&candles, &settings).unwrap();
        assert!(frames.iter().all(|f| f.adx.is_none() && f.psar.is_none()));
    }

    #[test]
    fn test_latest_pair_returns_adjacent_defined_rows() {
        let settings = IndicatorSettings {
            short_ema: Some(3),
            volume_change: true,
            ..Default::default()
        };
        let candles = flat_candles(10);
        let frames = compute_frames(&candles, &settings).unwrap();
        let (previous, latest) = latest_pair(&frames, &settings).unwrap();

        assert_eq!(previous.candle.datetime, candles[8].datetime);
        assert_eq!(latest.candle.datetime, candles[9].datetime);
    }

    #[test]
    fn test_volume_change_zero_denominator() {
        let settings = IndicatorSettings {
            volume_change: true,
            ..Default::default()
        };
        let mut candles = flat_candles(3);
        candles[1].volume = 0.0;
        candles[2].volume = 500.0;
        let frames = compute_frames(&candles, &settings).unwrap();

        assert_eq!(frames[0].volume_change, None);
        assert_eq!(frames[2].volume_change, Some(500.0));
    }
}
