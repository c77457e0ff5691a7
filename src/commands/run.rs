//! Polling trade loop command
//!
//! Fetches fresh candle history every cycle, evaluates the configured
//! strategy on the latest two frames, and fans any signal out to every
//! configured account. Paper mode logs the bracket instead of placing it.

use anyhow::Result;
use chrono::{Duration as ChronoDuration, Utc};
use tracing::{error, info, warn};

use delta_strategies::config::Config;
use delta_strategies::exchange::{resolution_secs, DeltaClient};
use delta_strategies::gate::can_open_new_trade;
use delta_strategies::notify::TelegramNotifier;
use delta_strategies::risk::compute_bracket;
use delta_strategies::strategies::{self, Strategy};
use delta_strategies::types::{BracketOrder, SignalError};

/// Extra candles beyond the indicator warm-up, as slack for gaps
const LOOKBACK_SLACK: usize = 8;

pub fn run(config_path: String, live: bool, interval_override: Option<u64>) -> Result<()> {
    let config = Config::from_file(&config_path)?;
    info!("Loaded configuration from: {}", config_path);

    if config.accounts.is_empty() && live {
        anyhow::bail!("Live mode requires at least one account in config or DELTA_API_KEY/DELTA_API_SECRET");
    }

    if live {
        warn!("⚠️  LIVE TRADING MODE - REAL MONEY AT RISK!");
        warn!("Press Ctrl+C within 5 seconds to abort...");
        std::thread::sleep(std::time::Duration::from_secs(5));
    } else {
        info!("Paper mode: signals and brackets are logged, no orders placed");
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_async(config, live, interval_override))
}

async fn run_async(config: Config, live: bool, interval_override: Option<u64>) -> Result<()> {
    let strategy = strategies::create(&config.strategy)?;
    info!(
        strategy = strategy.name(),
        symbol = %config.trading.symbol,
        resolution = %config.trading.resolution,
        accounts = config.accounts.len(),
        "Starting trade loop"
    );

    let notifier = config
        .telegram
        .as_ref()
        .map(|t| TelegramNotifier::new(t.bot_token.clone(), t.chat_id.clone()));

    let interval_secs = interval_override.unwrap_or(config.trading.poll_interval_secs);
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = process_cycle(&config, strategy.as_ref(), live, notifier.as_ref()).await {
                    error!("Cycle failed: {:#}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, stopping trade loop");
                break;
            }
        }
    }

    Ok(())
}

async fn process_cycle(
    config: &Config,
    strategy: &dyn Strategy,
    live: bool,
    notifier: Option<&TelegramNotifier>,
) -> Result<()> {
    let trading = &config.trading;
    let market = DeltaClient::public(&config.exchange.base_url);

    let candle_secs = resolution_secs(&trading.resolution)?;
    let lookback = (strategy.settings().min_candles() + LOOKBACK_SLACK) as i64 * candle_secs as i64;
    let end = Utc::now();
    let start = end - ChronoDuration::seconds(lookback);

    let candles = match market
        .fetch_candles(trading.symbol.as_str(), &trading.resolution, start, end)
        .await
    {
        Ok(candles) => candles,
        Err(e) => {
            if let Some(notifier) = notifier {
                notifier.fetch_failed(trading.symbol.as_str(), &format!("{:#}", e)).await;
            }
            return Err(e);
        }
    };

    let evaluation = match strategies::evaluate_series(strategy, &candles) {
        Ok(evaluation) => evaluation,
        Err(SignalError::InsufficientData { required, available }) => {
            warn!(
                required,
                available, "Not enough candle history yet, skipping cycle"
            );
            return Ok(());
        }
    };

    let Some(side) = evaluation.signal.side() else {
        info!(
            close = evaluation.signal_candle.close,
            "No signal this cycle"
        );
        return Ok(());
    };

    info!(signal = %evaluation.signal, close = evaluation.signal_candle.close, "Signal fired");

    let product = market.get_product(trading.symbol.as_str()).await?;
    let order = compute_bracket(
        side,
        &evaluation.signal_candle,
        &strategy.bracket_params(),
        trading.order_size,
        product.tick_size,
    );
    info!(
        side = side.as_str(),
        entry = order.entry_estimate,
        stop_loss = order.stop_loss,
        take_profit = order.take_profit,
        "Bracket computed"
    );

    if !live {
        info!("[PAPER] Would place {} bracket order for {}", side, trading.symbol);
        return Ok(());
    }

    for account in &config.accounts {
        let client = DeltaClient::new(
            &config.exchange.base_url,
            account.api_key.clone(),
            account.api_secret.clone(),
        );
        place_for_account(
            &client,
            product.id,
            &order,
            config.trading.symbol.as_str(),
            strategy.name(),
            notifier,
        )
        .await;
    }

    Ok(())
}

/// Gate, place, and notify for a single account; failures never abort the
/// cycle for the remaining accounts
async fn place_for_account(
    client: &DeltaClient,
    product_id: u64,
    order: &BracketOrder,
    symbol: &str,
    strategy_name: &str,
    notifier: Option<&TelegramNotifier>,
) {
    let label = client.key_label();

    let activity = client.account_activity(product_id).await;
    if !can_open_new_trade(activity) {
        info!(client = %label, "Account has open activity, skipping new order");
        return;
    }

    match client.place_bracket_order(product_id, order).await {
        Ok(_) => {
            info!(client = %label, side = order.side.as_str(), "Order placed");
            if let Some(notifier) = notifier {
                notifier.trade_alert(symbol, strategy_name, order).await;
            }
        }
        Err(e) => {
            error!(client = %label, "Order failed: {:#}", e);
            if let Some(notifier) = notifier {
                notifier.order_failed(symbol, &format!("{:#}", e)).await;
            }
        }
    }
}
