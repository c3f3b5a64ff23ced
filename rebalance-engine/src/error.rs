use chrono::NaiveDate;
use thiserror::Error;

/// Failure of the rebalance target or sell-condition provider. Aborts the
/// current run when it comes from the target list.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no rebalance data for {0}")]
    NoData(NaiveDate),
    #[error("provider failure: {0}")]
    Other(String),
}

/// Failure of an outbound brokerage call. Degraded per instrument by the
/// engine: a price failure becomes 0.0, an order failure is recorded in the
/// run report entry.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed payload: {0}")]
    Payload(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected before any state mutation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Aborts the run with no orders placed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("audit log write failed: {0}")]
    Audit(#[from] std::io::Error),
}
