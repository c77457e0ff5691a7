//! Technical indicators
//!
//! Pure, causal functions over price history. Every indicator returns one
//! value per input row, with `None` for the warm-up prefix where the value
//! is not yet defined. A value at index i depends only on rows <= i.

/// Calculate Exponential Moving Average
///
/// Seeded with the simple average of the first `period` values, then the
/// standard 2/(period+1) smoothing. Defined from index `period - 1`.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(values.len());

    if values.is_empty() || period == 0 {
        result.resize(values.len(), None);
        return result;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut ema_value: Option<f64> = None;

    for (i, &value) in values.iter().enumerate() {
        if i + 1 < period {
            result.push(None);
        } else if i + 1 == period {
            let sum: f64 = values[0..period].iter().sum();
            ema_value = Some(sum / period as f64);
            result.push(ema_value);
        } else if let Some(prev) = ema_value {
            let next = (value - prev) * multiplier + prev;
            ema_value = Some(next);
            result.push(ema_value);
        }
    }

    result
}

/// Calculate True Range
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(high.len());

    for i in 0..high.len() {
        let tr_value = if i == 0 {
            high[i] - low[i]
        } else {
            let hl = high[i] - low[i];
            let hc = (high[i] - close[i - 1]).abs();
            let lc = (low[i] - close[i - 1]).abs();
            hl.max(hc).max(lc)
        };
        tr.push(tr_value);
    }

    tr
}

/// Calculate RSI (Relative Strength Index), Wilder's smoothing
///
/// Average gain/loss are seeded with the simple mean of the first `period`
/// price changes, then follow Wilder's recursion. Defined from index `period`.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return result;
    }

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for i in 1..=period {
        let change = values[i] - values[i - 1];
        if change > 0.0 {
            gain_sum += change;
        } else {
            loss_sum -= change;
        }
    }

    let p = period as f64;
    let mut avg_gain = gain_sum / p;
    let mut avg_loss = loss_sum / p;
    result[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in period + 1..values.len() {
        let change = values[i] - values[i - 1];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        result[i] = Some(rsi_value(avg_gain, avg_loss));
    }

    result
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // Flat history is neutral; pure gains saturate the oscillator
        if avg_gain == 0.0 {
            50.0
        } else {
            100.0
        }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// Calculate Average Directional Index (ADX)
///
/// Wilder-smoothed +DI/-DI from directional movement and true range, DX from
/// the DI spread, ADX as Wilder's average of DX. Defined from index
/// `2 * period - 1`.
pub fn adx(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<Option<f64>> {
    let len = high.len();
    let mut result = vec![None; len];
    if period == 0 || len < 2 * period {
        return result;
    }

    let tr = true_range(high, low, close);
    let mut plus_dm = vec![0.0; len];
    let mut minus_dm = vec![0.0; len];
    for i in 1..len {
        let up_move = high[i] - high[i - 1];
        let down_move = low[i - 1] - low[i];
        if up_move > down_move && up_move > 0.0 {
            plus_dm[i] = up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            minus_dm[i] = down_move;
        }
    }

    let p = period as f64;
    let mut sm_tr: f64 = tr[1..=period].iter().sum();
    let mut sm_plus: f64 = plus_dm[1..=period].iter().sum();
    let mut sm_minus: f64 = minus_dm[1..=period].iter().sum();

    // DX defined from index `period`
    let mut dx = vec![0.0; len];
    dx[period] = dx_value(sm_plus, sm_minus, sm_tr);
    for i in period + 1..len {
        sm_tr = sm_tr - sm_tr / p + tr[i];
        sm_plus = sm_plus - sm_plus / p + plus_dm[i];
        sm_minus = sm_minus - sm_minus / p + minus_dm[i];
        dx[i] = dx_value(sm_plus, sm_minus, sm_tr);
    }

    let seed: f64 = dx[period..2 * period].iter().sum::<f64>() / p;
    result[2 * period - 1] = Some(seed);
    let mut adx_value = seed;
    for i in 2 * period..len {
        adx_value = (adx_value * (p - 1.0) + dx[i]) / p;
        result[i] = Some(adx_value);
    }

    result
}

fn dx_value(sm_plus: f64, sm_minus: f64, sm_tr: f64) -> f64 {
    if sm_tr <= 0.0 {
        return 0.0;
    }
    let plus_di = 100.0 * sm_plus / sm_tr;
    let minus_di = 100.0 * sm_minus / sm_tr;
    let di_sum = plus_di + minus_di;
    if di_sum > 0.0 {
        100.0 * (plus_di - minus_di).abs() / di_sum
    } else {
        0.0
    }
}

/// Direction of the parabolic SAR trend at a given row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PsarTrend {
    Rising,
    Falling,
}

/// One parabolic SAR point: the stop level and the trend it trails
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsarPoint {
    pub value: f64,
    pub trend: PsarTrend,
}

impl PsarPoint {
    pub fn is_rising(&self) -> bool {
        self.trend == PsarTrend::Rising
    }

    pub fn is_falling(&self) -> bool {
        self.trend == PsarTrend::Falling
    }
}

/// Calculate Parabolic SAR
///
/// Sequential recurrence carrying (trend, extreme point, acceleration
/// factor). The SAR accelerates toward the extreme point, is clamped to the
/// prior two lows (rising) or highs (falling), and flips direction when the
/// current bar crosses it. Defined from index 1.
pub fn psar(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    af_step: f64,
    af_max: f64,
) -> Vec<Option<PsarPoint>> {
    let len = high.len();
    let mut result = vec![None; len];
    if len < 2 {
        return result;
    }

    let mut rising = close[1] >= close[0];
    let mut sar = if rising { low[0] } else { high[0] };
    let mut extreme = if rising { high[1] } else { low[1] };
    let mut af = af_step;

    result[1] = Some(point(sar, rising));

    for i in 2..len {
        let mut next = sar + af * (extreme - sar);

        if rising {
            // SAR never rises into the prior two bars' range
            next = next.min(low[i - 1]).min(low[i - 2]);
            if low[i] < next {
                // Flip: stop becomes the prior extreme, trend reverses
                rising = false;
                sar = extreme;
                extreme = low[i];
                af = af_step;
            } else {
                sar = next;
                if high[i] > extreme {
                    extreme = high[i];
                    af = (af + af_step).min(af_max);
                }
            }
        } else {
            next = next.max(high[i - 1]).max(high[i - 2]);
            if high[i] > next {
                rising = true;
                sar = extreme;
                extreme = high[i];
                af = af_step;
            } else {
                sar = next;
                if low[i] < extreme {
                    extreme = low[i];
                    af = (af + af_step).min(af_max);
                }
            }
        }

        result[i] = Some(point(sar, rising));
    }

    result
}

fn point(value: f64, rising: bool) -> PsarPoint {
    PsarPoint {
        value,
        trend: if rising {
            PsarTrend::Rising
        } else {
            PsarTrend::Falling
        },
    }
}
