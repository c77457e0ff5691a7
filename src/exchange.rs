//! Delta Exchange API client
//!
//! HTTP client for the Delta Exchange India REST API (v2). Candle history
//! is public; orders, positions and open-order queries are signed with
//! HMAC-SHA256 over `method + timestamp + path + query + body`.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use reqwest;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, info};

use crate::gate::AccountActivity;
use crate::types::{BracketOrder, Candle};

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_BASE_URL: &str = "https://api.india.delta.exchange";

const DEFAULT_TICK_SIZE: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct DeltaClient {
    base_url: String,
    api_key: String,
    api_secret: String,
    client: reqwest::Client,
}

impl DeltaClient {
    pub fn new(base_url: impl Into<String>, api_key: String, api_secret: String) -> Self {
        DeltaClient {
            base_url: base_url.into(),
            api_key,
            api_secret,
            client: reqwest::Client::new(),
        }
    }

    /// Client for public endpoints only (candles, products); signed calls
    /// made through it will be rejected by the exchange
    pub fn public(base_url: impl Into<String>) -> Self {
        Self::new(base_url, String::new(), String::new())
    }

    /// API key truncated for logging, never the full key
    pub fn key_label(&self) -> String {
        truncate_key(&self.api_key)
    }

    fn generate_signature(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn signed_get(&self, path: &str, query: &str) -> reqwest::RequestBuilder {
        let timestamp = Utc::now().timestamp().to_string();
        let payload = format!("GET{}{}{}", timestamp, path, query);
        let signature = self.generate_signature(&payload);

        let url = format!("{}{}{}", self.base_url, path, query);
        self.client
            .get(&url)
            .header("api-key", &self.api_key)
            .header("timestamp", timestamp)
            .header("signature", signature)
    }

    fn signed_post(&self, path: &str, body: &str) -> reqwest::RequestBuilder {
        let timestamp = Utc::now().timestamp().to_string();
        let payload = format!("POST{}{}{}", timestamp, path, body);
        let signature = self.generate_signature(&payload);

        let url = format!("{}{}", self.base_url, path);
        self.client
            .post(&url)
            .header("api-key", &self.api_key)
            .header("timestamp", timestamp)
            .header("signature", signature)
            .header("Content-Type", "application/json")
            .body(body.to_string())
    }

    /// Fetch historical candles, sorted oldest first
    pub async fn fetch_candles(
        &self,
        symbol: &str,
        resolution: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Candle>> {
        let url = format!("{}/v2/history/candles", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("resolution", resolution),
                ("start", &start.timestamp().to_string()),
                ("end", &end.timestamp().to_string()),
            ])
            .send()
            .await
            .context("Failed to fetch candles")?;

        let body: CandleHistoryResponse = response
            .json()
            .await
            .context("Failed to parse candle history response")?;

        let Some(raw) = body.result else {
            bail!("Candle history response missing 'result' key");
        };

        let candles = candles_from_history(raw)?;
        debug!(symbol, resolution, count = candles.len(), "Fetched candles");
        Ok(candles)
    }

    /// Look up a product by symbol (market id and tick size)
    pub async fn get_product(&self, symbol: &str) -> Result<Product> {
        let url = format!("{}/v2/products/{}", self.base_url, symbol);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch product {}", symbol))?;

        let body: ProductResponse = response
            .json()
            .await
            .context("Failed to parse product response")?;

        let raw = body
            .result
            .with_context(|| format!("Product response missing 'result' for {}", symbol))?;

        // tick_size comes back string-encoded; fall back to a sane default
        // rather than refusing to trade
        let tick_size = raw
            .tick_size
            .as_deref()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(DEFAULT_TICK_SIZE);

        Ok(Product {
            id: raw.id,
            symbol: raw.symbol,
            tick_size,
        })
    }

    /// Open orders across the account
    pub async fn get_live_orders(&self) -> Result<Vec<LiveOrder>> {
        let path = "/v2/orders";
        let query = "?states=open,pending";
        let response = self
            .signed_get(path, query)
            .send()
            .await
            .context("Failed to fetch live orders")?;

        let body: LiveOrdersResponse = response
            .json()
            .await
            .context("Failed to parse live orders response")?;

        Ok(body.result.unwrap_or_default())
    }

    /// Current position for a product; size 0 when flat
    pub async fn get_position(&self, product_id: u64) -> Result<Position> {
        let path = "/v2/positions";
        let query = format!("?product_id={}", product_id);
        let response = self
            .signed_get(path, &query)
            .send()
            .await
            .context("Failed to fetch position")?;

        let body: PositionResponse = response
            .json()
            .await
            .context("Failed to parse position response")?;

        Ok(body.result.unwrap_or_default())
    }

    /// Snapshot of account activity used by the trade gate
    pub async fn account_activity(&self, product_id: u64) -> Result<AccountActivity> {
        let open_orders = self.get_live_orders().await?;
        let position = self.get_position(product_id).await?;

        Ok(AccountActivity {
            open_orders: open_orders.len(),
            position_size: position.size,
        })
    }

    /// Place a market order with attached stop-loss and take-profit legs
    pub async fn place_bracket_order(
        &self,
        product_id: u64,
        order: &BracketOrder,
    ) -> Result<OrderResponse> {
        let request = OrderRequest::from_bracket(product_id, order);
        let body = serde_json::to_string(&request)?;
        let response = self
            .signed_post("/v2/orders", &body)
            .send()
            .await
            .context("Failed to place bracket order")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read order response")?;

        if !status.is_success() {
            bail!("Order rejected ({}): {}", status, text);
        }

        let parsed: OrderResponse =
            serde_json::from_str(&text).context("Failed to parse order response")?;
        info!(
            client = %self.key_label(),
            side = order.side.as_str(),
            "Bracket order placed"
        );
        Ok(parsed)
    }
}

/// Validate and sort raw history rows, oldest first
///
/// Rows are checked at construction; an exchange row with an inverted
/// range or non-positive price is a malformed response, not input for the
/// indicator engine.
fn candles_from_history(raw: Vec<RawCandle>) -> Result<Vec<Candle>> {
    let mut candles = raw
        .into_iter()
        .map(|c| {
            let datetime = Utc
                .timestamp_opt(c.time, 0)
                .single()
                .with_context(|| format!("Invalid candle timestamp {}", c.time))?;
            Candle::new(datetime, c.open, c.high, c.low, c.close, c.volume)
                .with_context(|| format!("Malformed candle at timestamp {}", c.time))
        })
        .collect::<Result<Vec<Candle>>>()?;

    candles.sort_by_key(|c| c.datetime);
    Ok(candles)
}

/// Seconds per candle for a resolution string like "1m", "5m", "1h", "1d"
pub fn resolution_secs(resolution: &str) -> Result<u64> {
    let mut chars = resolution.chars();
    let unit = chars
        .next_back()
        .with_context(|| format!("Invalid resolution '{}'", resolution))?;
    let count: u64 = chars
        .as_str()
        .parse()
        .with_context(|| format!("Invalid resolution '{}'", resolution))?;
    let unit_secs = match unit {
        'm' => 60,
        'h' => 3600,
        'd' => 86400,
        'w' => 604800,
        other => bail!("Unsupported resolution unit '{}'", other),
    };
    Ok(count * unit_secs)
}

/// Shorten an API key for log lines: first 6 and last 4 characters
pub fn truncate_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 10 {
        return key.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[derive(Debug, Deserialize)]
struct CandleHistoryResponse {
    result: Option<Vec<RawCandle>>,
}

#[derive(Debug, Deserialize)]
struct RawCandle {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: u64,
    pub symbol: String,
    pub tick_size: f64,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    result: Option<RawProduct>,
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    id: u64,
    symbol: String,
    tick_size: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LiveOrder {
    pub id: u64,
    #[serde(default)]
    pub product_id: Option<u64>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LiveOrdersResponse {
    result: Option<Vec<LiveOrder>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub size: f64,
}

#[derive(Debug, Deserialize)]
struct PositionResponse {
    result: Option<Position>,
}

#[derive(Debug, Serialize)]
struct OrderRequest {
    product_id: u64,
    size: u32,
    side: String,
    order_type: String,
    post_only: bool,
    bracket_stop_loss_price: f64,
    bracket_stop_loss_limit_price: f64,
    bracket_take_profit_price: f64,
    bracket_take_profit_limit_price: f64,
}

#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub success: Option<bool>,
}

impl OrderRequest {
    fn from_bracket(product_id: u64, order: &BracketOrder) -> Self {
        OrderRequest {
            product_id,
            size: order.size,
            side: order.side.as_str().to_string(),
            order_type: "market_order".to_string(),
            post_only: false,
            bracket_stop_loss_price: order.stop_loss,
            bracket_stop_loss_limit_price: order.stop_loss,
            bracket_take_profit_price: order.take_profit,
            bracket_take_profit_limit_price: order.take_profit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    #[test]
    fn test_truncate_key() {
        assert_eq!(truncate_key("abcdef1234567890wxyz"), "abcdef...wxyz");
        // Short keys pass through untouched
        assert_eq!(truncate_key("short"), "short");
    }

    #[test]
    fn test_signature_is_hex_and_deterministic() {
        let client = DeltaClient::new(
            DEFAULT_BASE_URL,
            "key".to_string(),
            "secret".to_string(),
        );
        let sig1 = client.generate_signature("GET1234567890/v2/orders");
        let sig2 = client.generate_signature("GET1234567890/v2/orders");

        assert_eq!(sig1, sig2);
        assert_eq!(sig1.len(), 64);
        assert!(sig1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_varies_with_payload() {
        let client = DeltaClient::new(
            DEFAULT_BASE_URL,
            "key".to_string(),
            "secret".to_string(),
        );
        let sig1 = client.generate_signature("GET1234567890/v2/orders");
        let sig2 = client.generate_signature("GET1234567891/v2/orders");
        assert_ne!(sig1, sig2);
    }

    #[test]
    fn test_candle_history_parse() {
        let body = r#"{"result":[{"time":1700000000,"open":100.0,"high":105.0,"low":99.0,"close":104.0,"volume":1234.5}]}"#;
        let parsed: CandleHistoryResponse = serde_json::from_str(body).unwrap();
        let candles = parsed.result.unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].close, 104.0);
    }

    #[test]
    fn test_history_rows_are_validated() {
        // Inverted high/low must surface as an error, not flow into the
        // indicator engine
        let raw = vec![
            RawCandle {
                time: 1700000000,
                open: 100.0,
                high: 105.0,
                low: 99.0,
                close: 104.0,
                volume: 10.0,
            },
            RawCandle {
                time: 1700000060,
                open: 100.0,
                high: 95.0,
                low: 105.0,
                close: 100.0,
                volume: 10.0,
            },
        ];
        let err = candles_from_history(raw).unwrap_err();
        assert!(err.to_string().contains("Malformed candle"));
    }

    #[test]
    fn test_history_rows_sorted_ascending() {
        let row = |time| RawCandle {
            time,
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.0,
            volume: 10.0,
        };
        let candles = candles_from_history(vec![row(1700000120), row(1700000000)]).unwrap();
        assert!(candles[0].datetime < candles[1].datetime);
    }

    #[test]
    fn test_candle_history_missing_result() {
        let body = r#"{"error":"unavailable"}"#;
        let parsed: CandleHistoryResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.result.is_none());
    }

    #[test]
    fn test_product_tick_size_string_parse() {
        let body = r#"{"result":{"id":27,"symbol":"BTCUSD","tick_size":"0.5"}}"#;
        let parsed: ProductResponse = serde_json::from_str(body).unwrap();
        let raw = parsed.result.unwrap();
        assert_eq!(raw.id, 27);
        assert_eq!(raw.tick_size.as_deref(), Some("0.5"));
    }

    #[test]
    fn test_order_request_mirrors_bracket_prices() {
        let order = BracketOrder {
            side: Side::Buy,
            entry_estimate: 100.0,
            stop_loss: 99.0,
            take_profit: 102.5,
            size: 1,
        };
        let request = OrderRequest::from_bracket(27, &order);
        assert_eq!(request.bracket_stop_loss_price, request.bracket_stop_loss_limit_price);
        assert_eq!(
            request.bracket_take_profit_price,
            request.bracket_take_profit_limit_price
        );
        assert_eq!(request.side, "buy");
        assert_eq!(request.order_type, "market_order");
    }

    #[test]
    fn test_resolution_secs() {
        assert_eq!(resolution_secs("1m").unwrap(), 60);
        assert_eq!(resolution_secs("15m").unwrap(), 900);
        assert_eq!(resolution_secs("4h").unwrap(), 14400);
        assert_eq!(resolution_secs("1d").unwrap(), 86400);
        assert!(resolution_secs("1x").is_err());
        assert!(resolution_secs("").is_err());
    }

    #[test]
    fn test_resolution_secs_multibyte_is_error_not_panic() {
        assert!(resolution_secs("5м").is_err()); // Cyrillic em
        assert!(resolution_secs("１m").is_err()); // fullwidth digit
    }

    #[test]
    fn test_truncate_key_multibyte() {
        // Character boundaries, not byte offsets
        assert_eq!(truncate_key("ключключключ"), "ключкл...ключ");
        assert_eq!(truncate_key("ключ"), "ключ");
    }

    #[test]
    fn test_position_defaults_to_flat() {
        let body = r#"{"result":{}}"#;
        let parsed: PositionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result.unwrap().size, 0.0);
    }
}
