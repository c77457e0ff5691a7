//! Telegram alerting
//!
//! Optional push notifications for placed orders and failures. Delivery
//! problems are logged and swallowed; an unreachable Telegram API must
//! never stall the trading loop.

use reqwest;
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::BracketOrder;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        TelegramNotifier {
            bot_token,
            chat_id,
            client: reqwest::Client::new(),
        }
    }

    /// Send a raw Markdown message; failures are logged, not returned
    pub async fn send(&self, text: &str) {
        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API_URL, self.bot_token);
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };

        match self.client.post(&url).json(&request).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Telegram alert delivered");
            }
            Ok(response) => {
                warn!(status = %response.status(), "Telegram API rejected message");
            }
            Err(e) => {
                warn!(error = %e, "Failed to send Telegram message");
            }
        }
    }

    pub async fn trade_alert(&self, symbol: &str, strategy: &str, order: &BracketOrder) {
        let text = format_trade_alert(symbol, strategy, order);
        self.send(&text).await;
    }

    pub async fn order_failed(&self, symbol: &str, reason: &str) {
        let text = format!(
            "❌ *Order Failed!* ❌\nSymbol: `{}`\nReason: `{}`",
            symbol, reason
        );
        self.send(&text).await;
    }

    pub async fn fetch_failed(&self, symbol: &str, reason: &str) {
        let text = format!(
            "❌ *Data Fetch Error!* ❌\nSymbol: `{}`\nReason: `{}`",
            symbol, reason
        );
        self.send(&text).await;
    }
}

fn format_trade_alert(symbol: &str, strategy: &str, order: &BracketOrder) -> String {
    format!(
        "🚀 *Trade Alert!* 🚀\n\
         Strategy: `{}`\n\
         Symbol: `{}`\n\
         Side: *{}*\n\
         Entry (est): `{:.2}`\n\
         Stop Loss: `{:.2}`\n\
         Take Profit: `{:.2}`\n\
         Size: `{}`",
        strategy,
        symbol,
        order.side.as_str().to_uppercase(),
        order.entry_estimate,
        order.stop_loss,
        order.take_profit,
        order.size,
    )
}
