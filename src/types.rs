//! Core data types used across the trading system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for candle data
#[derive(Debug, Error)]
pub enum CandleValidationError {
    #[error("high ({high}) must be >= low ({low})")]
    HighLessThanLow { high: f64, low: f64 },

    #[error("volume ({0}) must be >= 0")]
    NegativeVolume(f64),

    #[error("open ({open}) must be between low ({low}) and high ({high})")]
    OpenOutOfRange { open: f64, low: f64, high: f64 },

    #[error("close ({close}) must be between low ({low}) and high ({high})")]
    CloseOutOfRange { close: f64, low: f64, high: f64 },

    #[error("prices must be positive: open={open}, high={high}, low={low}, close={close}")]
    NonPositivePrice {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },
}

/// OHLCV candlestick data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Create a new candle with validation
    pub fn new(
        datetime: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, CandleValidationError> {
        let candle = Self {
            datetime,
            open,
            high,
            low,
            close,
            volume,
        };
        candle.validate()?;
        Ok(candle)
    }

    /// Create a candle without validation (for trusted sources or when validation is done separately)
    pub fn new_unchecked(
        datetime: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            datetime,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Validate the candle data
    pub fn validate(&self) -> Result<(), CandleValidationError> {
        if self.open <= 0.0 || self.high <= 0.0 || self.low <= 0.0 || self.close <= 0.0 {
            return Err(CandleValidationError::NonPositivePrice {
                open: self.open,
                high: self.high,
                low: self.low,
                close: self.close,
            });
        }

        if self.high < self.low {
            return Err(CandleValidationError::HighLessThanLow {
                high: self.high,
                low: self.low,
            });
        }

        if self.volume < 0.0 {
            return Err(CandleValidationError::NegativeVolume(self.volume));
        }

        if self.open < self.low || self.open > self.high {
            return Err(CandleValidationError::OpenOutOfRange {
                open: self.open,
                low: self.low,
                high: self.high,
            });
        }

        if self.close < self.low || self.close > self.high {
            return Err(CandleValidationError::CloseOutOfRange {
                close: self.close,
                low: self.low,
                high: self.high,
            });
        }

        Ok(())
    }

    /// Candle closed higher than it opened
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Candle closed lower than it opened
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Trading pair symbol using Arc<str> for cheap cloning
///
/// Symbols are cloned on every polling cycle when handed to the exchange
/// client and notifications. Using Arc<str> instead of String reduces heap
/// allocations from O(n) to O(1) per clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(#[serde(with = "arc_str_serde")] std::sync::Arc<str>);

/// Custom serde for Arc<str>
mod arc_str_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::sync::Arc;

    pub fn serialize<S>(value: &Arc<str>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Arc<str>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Arc::from(s.as_str()))
    }
}

impl Symbol {
    pub fn new(s: impl AsRef<str>) -> Self {
        Symbol(std::sync::Arc::from(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Wire representation expected by the exchange order API
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-cycle decision produced by a strategy
///
/// `Flat` means no trade this cycle. A strategy emits at most one non-flat
/// decision per evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Flat,
}

impl Signal {
    /// The order side this signal maps to, if any
    pub fn side(&self) -> Option<Side> {
        match self {
            Signal::Buy => Some(Side::Buy),
            Signal::Sell => Some(Side::Sell),
            Signal::Flat => None,
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => f.write_str("buy"),
            Signal::Sell => f.write_str("sell"),
            Signal::Flat => f.write_str("flat"),
        }
    }
}

/// A fully computed entry order with protective stop and target
///
/// Invariant: for Buy, stop_loss < entry_estimate < take_profit; for Sell,
/// take_profit < entry_estimate < stop_loss. Both exit prices are rounded to
/// the exchange tick size before submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketOrder {
    pub side: Side,
    pub entry_estimate: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub size: u32,
}

impl BracketOrder {
    /// Stop distance in price points
    pub fn risk_points(&self) -> f64 {
        (self.entry_estimate - self.stop_loss).abs()
    }

    /// Target distance in price points
    pub fn reward_points(&self) -> f64 {
        (self.take_profit - self.entry_estimate).abs()
    }
}

/// Errors from the signal engine
///
/// Recoverable at the cycle level: the polling loop logs it and waits for
/// the next tick.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("insufficient candle history: need {required}, have {available}")]
    InsufficientData { required: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_candle_validation_rejects_inverted_range() {
        let result = Candle::new(Utc::now(), 100.0, 95.0, 105.0, 100.0, 10.0);
        assert!(matches!(
            result,
            Err(CandleValidationError::HighLessThanLow { .. })
        ));
    }

    #[test]
    fn test_candle_validation_rejects_close_outside_range() {
        let result = Candle::new(Utc::now(), 100.0, 105.0, 95.0, 110.0, 10.0);
        assert!(matches!(
            result,
            Err(CandleValidationError::CloseOutOfRange { .. })
        ));
    }

    #[test]
    fn test_candle_direction() {
        let green = Candle::new_unchecked(Utc::now(), 100.0, 106.0, 99.0, 105.0, 10.0);
        assert!(green.is_bullish());
        assert!(!green.is_bearish());

        let red = Candle::new_unchecked(Utc::now(), 105.0, 106.0, 99.0, 100.0, 10.0);
        assert!(red.is_bearish());
    }

    #[test]
    fn test_signal_to_side() {
        assert_eq!(Signal::Buy.side(), Some(Side::Buy));
        assert_eq!(Signal::Sell.side(), Some(Side::Sell));
        assert_eq!(Signal::Flat.side(), None);
    }

    #[test]
    fn test_bracket_distances() {
        let bracket = BracketOrder {
            side: Side::Buy,
            entry_estimate: 100.0,
            stop_loss: 99.0,
            take_profit: 102.5,
            size: 1,
        };
        assert_eq!(bracket.risk_points(), 1.0);
        assert_eq!(bracket.reward_points(), 2.5);
    }
}
