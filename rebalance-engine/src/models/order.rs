use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Also used to key audit streams (`buy_orders.log` / `sell_orders.log`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound buy/sell request. Required fields are typed; anything else the
/// caller sends rides along in `extra` and is preserved verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub code: String,
    pub quantity: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderRequest {
    pub fn new(code: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity,
            extra: Map::new(),
        }
    }
}

/// One order attempt. Immutable once written; persisted append-only by the
/// audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: Uuid,
    pub code: String,
    pub quantity: u32,
    pub side: Side,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderRecord {
    pub fn new(code: impl Into<String>, quantity: u32, side: Side) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: code.into(),
            quantity,
            side,
            timestamp: Utc::now(),
            extra: Map::new(),
        }
    }

    pub fn from_request(request: OrderRequest, side: Side) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: request.code,
            quantity: request.quantity,
            side,
            timestamp: Utc::now(),
            extra: request.extra,
        }
    }
}
