use crate::error::{GatewayError, ProviderError};
use crate::models::{Side, TargetList};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

pub mod mock;

/// Live market price source.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Current price for an instrument code.
    async fn price(&self, code: &str) -> Result<f64, GatewayError>;
}

/// Order submission against the brokerage.
#[async_trait]
pub trait OrderExecutor: Send + Sync {
    /// Submits a cash order and returns the broker's raw acknowledgement.
    /// Not guaranteed idempotent; callers must not retry blindly.
    async fn send_order(&self, code: &str, quantity: u32, side: Side)
        -> Result<Value, GatewayError>;
}

/// Supplies the target instrument list for a run date.
#[async_trait]
pub trait TargetProvider: Send + Sync {
    /// Fails when no target data exists for the date.
    async fn targets_for(&self, date: NaiveDate) -> Result<TargetList, ProviderError>;
}

/// Signals that an instrument should be liquidated this run.
#[async_trait]
pub trait SellSignal: Send + Sync {
    async fn should_sell(&self, code: &str) -> Result<bool, ProviderError>;
}
