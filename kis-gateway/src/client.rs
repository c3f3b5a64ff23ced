use crate::config::KisConfig;
use async_trait::async_trait;
use log::debug;
use rebalance_engine::error::GatewayError;
use rebalance_engine::models::{Side, TradeMode};
use rebalance_engine::providers::{MarketData, OrderExecutor};
use serde::Deserialize;
use serde_json::{json, Value};

const QUOTE_PATH: &str = "/uapi/domestic-stock/v1/quotations/inquire-price";
const ORDER_PATH: &str = "/uapi/domestic-stock/v1/trading/order-cash";
const QUOTE_TR_ID: &str = "FHKST01010100";

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    output: QuoteOutput,
}

#[derive(Debug, Deserialize)]
struct QuoteOutput {
    /// Current traded price, returned by the API as a decimal string.
    stck_prpr: String,
}

/// HTTP client for the KIS trading API: price quotations and cash orders.
/// Implements the engine's market-data and order-execution boundaries.
#[derive(Debug, Clone)]
pub struct KisClient {
    http: reqwest::Client,
    config: KisConfig,
}

impl KisClient {
    pub fn new(config: KisConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Cash-order transaction id, keyed by environment and side.
    fn tr_id(&self, side: Side) -> &'static str {
        match (self.config.mode, side) {
            (TradeMode::Practice, Side::Buy) => "VTTC0802U",
            (TradeMode::Practice, Side::Sell) => "VTTC0801U",
            (TradeMode::Live, Side::Buy) => "TTTC0802U",
            (TradeMode::Live, Side::Sell) => "TTTC0801U",
        }
    }

    pub async fn get_price(&self, code: &str) -> Result<f64, GatewayError> {
        let url = format!("{}{}", self.config.base_url(), QUOTE_PATH);
        let response = self
            .http
            .get(&url)
            .header("authorization", format!("Bearer {}", self.config.access_token))
            .header("appkey", &self.config.app_key)
            .header("appsecret", &self.config.app_secret)
            .header("tr_id", QUOTE_TR_ID)
            .query(&[("fid_cond_mrkt_div_code", "J"), ("fid_input_iscd", code)])
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let quote: QuoteResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Payload(e.to_string()))?;
        let price = quote
            .output
            .stck_prpr
            .trim()
            .parse::<f64>()
            .map_err(|e| GatewayError::Payload(format!("stck_prpr: {}", e)))?;

        debug!("quote {} = {}", code, price);
        Ok(price)
    }

    /// Market cash order (ORD_DVSN 00, price 0). The broker's JSON body is
    /// returned as-is, success or rejection alike, so the caller can record
    /// it verbatim.
    pub async fn send_order(
        &self,
        code: &str,
        quantity: u32,
        side: Side,
    ) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.config.base_url(), ORDER_PATH);
        let body = json!({
            "CANO": self.config.cano,
            "ACNT_PRDT_CD": self.config.acnt_prdt_cd,
            "PDNO": code,
            "ORD_DVSN": "00",
            "ORD_QTY": quantity.to_string(),
            "ORD_UNPR": "0",
        });

        let response = self
            .http
            .post(&url)
            .header("authorization", format!("Bearer {}", self.config.access_token))
            .header("appkey", &self.config.app_key)
            .header("appsecret", &self.config.app_secret)
            .header("tr_id", self.tr_id(side))
            .header("custtype", "P")
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::Payload(e.to_string()))
    }
}

#[async_trait]
impl MarketData for KisClient {
    async fn price(&self, code: &str) -> Result<f64, GatewayError> {
        self.get_price(code).await
    }
}

#[async_trait]
impl OrderExecutor for KisClient {
    async fn send_order(
        &self,
        code: &str,
        quantity: u32,
        side: Side,
    ) -> Result<Value, GatewayError> {
        KisClient::send_order(self, code, quantity, side).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(mode: TradeMode) -> KisClient {
        let config = KisConfig::new(
            mode,
            "key".into(),
            "secret".into(),
            "token".into(),
            "1234567801",
        )
        .unwrap();
        KisClient::new(config)
    }

    #[test]
    fn tr_id_matches_environment_and_side() {
        let practice = client(TradeMode::Practice);
        assert_eq!(practice.tr_id(Side::Buy), "VTTC0802U");
        assert_eq!(practice.tr_id(Side::Sell), "VTTC0801U");

        let live = client(TradeMode::Live);
        assert_eq!(live.tr_id(Side::Buy), "TTTC0802U");
        assert_eq!(live.tr_id(Side::Sell), "TTTC0801U");
    }

    #[test]
    fn quote_payload_parses_string_price() {
        let raw = r#"{"output": {"stck_prpr": "71500"}}"#;
        let quote: QuoteResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(quote.output.stck_prpr.parse::<f64>().unwrap(), 71500.0);
    }
}
