//! Delta Exchange Strategy Runner
//!
//! A signal-driven trading system for Delta Exchange derivatives: indicator
//! annotation over candle history, pluggable signal strategies, bracket
//! order construction, and a fail-closed per-account trade gate.

pub mod config;
pub mod exchange;
pub mod frame;
pub mod gate;
pub mod indicators;
pub mod notify;
pub mod risk;
pub mod strategies;
pub mod types;

pub use config::Config;
pub use strategies::Strategy;
pub use types::*;
