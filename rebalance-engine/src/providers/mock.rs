use super::{MarketData, OrderExecutor, SellSignal, TargetProvider};
use crate::error::{GatewayError, ProviderError};
use crate::models::{Side, TargetList};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Fixed price table. An unknown code behaves like a failed quote lookup.
#[derive(Debug, Default, Clone)]
pub struct MockMarket {
    prices: HashMap<String, f64>,
}

impl MockMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, code: impl Into<String>, price: f64) -> Self {
        self.prices.insert(code.into(), price);
        self
    }
}

#[async_trait]
impl MarketData for MockMarket {
    async fn price(&self, code: &str) -> Result<f64, GatewayError> {
        self.prices.get(code).copied().ok_or_else(|| GatewayError::Status {
            status: 500,
            body: format!("no quote for {}", code),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedOrder {
    pub code: String,
    pub quantity: u32,
    pub side: Side,
}

/// Records every submission. Clones share the call log, so tests can keep a
/// handle after boxing one copy into the engine.
#[derive(Debug, Default, Clone)]
pub struct MockExecutor {
    calls: Arc<Mutex<Vec<RecordedOrder>>>,
    fail: bool,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every submission fails at the transport level.
    pub fn failing() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<RecordedOrder> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderExecutor for MockExecutor {
    async fn send_order(
        &self,
        code: &str,
        quantity: u32,
        side: Side,
    ) -> Result<Value, GatewayError> {
        self.calls.lock().unwrap().push(RecordedOrder {
            code: code.to_string(),
            quantity,
            side,
        });

        if self.fail {
            return Err(GatewayError::Transport("connection refused".into()));
        }
        Ok(json!({
            "rt_cd": "0",
            "msg1": "order accepted",
            "code": code,
            "qty": quantity.to_string(),
        }))
    }
}

/// Canned target lists keyed by run date. A missing date reproduces the
/// "no data for this date" provider failure.
#[derive(Debug, Default, Clone)]
pub struct StaticTargets {
    lists: HashMap<NaiveDate, TargetList>,
}

impl StaticTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(mut self, date: NaiveDate, list: TargetList) -> Self {
        self.lists.insert(date, list);
        self
    }
}

#[async_trait]
impl TargetProvider for StaticTargets {
    async fn targets_for(&self, date: NaiveDate) -> Result<TargetList, ProviderError> {
        self.lists
            .get(&date)
            .cloned()
            .ok_or(ProviderError::NoData(date))
    }
}

/// Sell-flags a fixed set of codes.
#[derive(Debug, Default, Clone)]
pub struct StaticSellSignal {
    codes: HashSet<String>,
}

impl StaticSellSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.codes.insert(code.into());
        self
    }
}

#[async_trait]
impl SellSignal for StaticSellSignal {
    async fn should_sell(&self, code: &str) -> Result<bool, ProviderError> {
        Ok(self.codes.contains(code))
    }
}
