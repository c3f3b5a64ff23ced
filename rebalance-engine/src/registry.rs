use crate::models::{OrderRecord, Position, StatusSnapshot};
use std::collections::HashMap;

/// In-memory map from instrument code to its open-position record. This is
/// the engine's local view of what it believes is held; it is never
/// reconciled against the brokerage. At most one entry per code.
#[derive(Debug, Default)]
pub struct PositionRegistry {
    positions: HashMap<String, Position>,
}

impl PositionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the position for the order's code. A second buy
    /// for the same code simply replaces the tracked order.
    pub fn open(&mut self, order: OrderRecord) {
        self.positions
            .insert(order.code.clone(), Position::new(order));
    }

    /// Removes the position for `code` if present. Absent is a no-op, not
    /// an error.
    pub fn close(&mut self, code: &str) -> Option<Position> {
        self.positions.remove(code)
    }

    pub fn get(&self, code: &str) -> Option<&Position> {
        self.positions.get(code)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            open_positions: self.positions.clone(),
            count: self.positions.len(),
        }
    }
}
