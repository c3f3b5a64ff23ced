use serde::{Deserialize, Serialize};

/// One instrument of the monthly rebalance list. The weight doubles as the
/// order quantity (truncated to whole units).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetEntry {
    pub code: String,
    pub weight: f64,
    pub target_price: f64,
}

/// The target list for one run, in provider order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetList {
    pub stocks: Vec<TargetEntry>,
}

impl TargetList {
    pub fn new(stocks: Vec<TargetEntry>) -> Self {
        Self { stocks }
    }
}
