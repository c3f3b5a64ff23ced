use super::order::OrderRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The engine's local record of an instrument it believes is currently held.
/// Absence means "no known open position", not a confirmed flat balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub code: String,
    pub order_data: OrderRecord,
}

impl Position {
    pub fn new(order_data: OrderRecord) -> Self {
        Self {
            code: order_data.code.clone(),
            order_data,
        }
    }
}

/// Read-only view of the registry for status reporting.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub open_positions: HashMap<String, Position>,
    pub count: usize,
}
