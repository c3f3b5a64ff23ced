use super::order::Side;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Simulation vs. real-money execution, selected once at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeMode {
    #[serde(rename = "practice")]
    Practice,
    #[serde(rename = "real")]
    Live,
}

impl TradeMode {
    pub fn is_practice(&self) -> bool {
        matches!(self, TradeMode::Practice)
    }
}

/// One action taken during a run: what was ordered, at what market price,
/// and the broker's raw acknowledgement (or a recorded failure).
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub code: String,
    pub action: Side,
    pub price: f64,
    pub result: Value,
}

/// Output of one rebalance pass. Returned to the caller, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub message: String,
    pub mode: TradeMode,
    pub date: NaiveDate,
    pub details: Vec<ReportEntry>,
}
