//! One-shot signal check command
//!
//! Fetches history, runs a single evaluation, and reports the decision and
//! the bracket it would produce. Never touches accounts or places orders.

use anyhow::Result;
use chrono::{Duration as ChronoDuration, Utc};
use tracing::{info, warn};

use delta_strategies::config::Config;
use delta_strategies::exchange::{resolution_secs, DeltaClient};
use delta_strategies::risk::compute_bracket;
use delta_strategies::strategies;
use delta_strategies::types::SignalError;

const LOOKBACK_SLACK: usize = 8;

pub fn run(config_path: String) -> Result<()> {
    let config = Config::from_file(&config_path)?;
    info!("Loaded configuration from: {}", config_path);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_async(config))
}

async fn run_async(config: Config) -> Result<()> {
    let strategy = strategies::create(&config.strategy)?;
    let trading = &config.trading;
    let market = DeltaClient::public(&config.exchange.base_url);

    let candle_secs = resolution_secs(&trading.resolution)?;
    let lookback = (strategy.settings().min_candles() + LOOKBACK_SLACK) as i64 * candle_secs as i64;
    let end = Utc::now();
    let start = end - ChronoDuration::seconds(lookback);

    let candles = market
        .fetch_candles(trading.symbol.as_str(), &trading.resolution, start, end)
        .await?;
    info!(
        strategy = strategy.name(),
        symbol = %trading.symbol,
        candles = candles.len(),
        "Evaluating"
    );

    let evaluation = match strategies::evaluate_series(strategy.as_ref(), &candles) {
        Ok(evaluation) => evaluation,
        Err(SignalError::InsufficientData { required, available }) => {
            warn!(required, available, "Not enough candle history");
            return Ok(());
        }
    };

    info!(
        signal = %evaluation.signal,
        close = evaluation.signal_candle.close,
        at = %evaluation.signal_candle.datetime,
        "Evaluation complete"
    );

    let Some(side) = evaluation.signal.side() else {
        return Ok(());
    };

    let product = market.get_product(trading.symbol.as_str()).await?;
    let order = compute_bracket(
        side,
        &evaluation.signal_candle,
        &strategy.bracket_params(),
        trading.order_size,
        product.tick_size,
    );

    info!(
        side = order.side.as_str(),
        entry = order.entry_estimate,
        stop_loss = order.stop_loss,
        take_profit = order.take_profit,
        risk = order.risk_points(),
        reward = order.reward_points(),
        size = order.size,
        "Bracket this signal would produce"
    );

    Ok(())
}
