use crate::audit::OrderLogger;
use crate::error::EngineError;
use crate::models::{
    OrderRecord, OrderRequest, ReportEntry, RunReport, Side, StatusSnapshot, TradeMode,
};
use crate::providers::{MarketData, OrderExecutor, SellSignal, TargetProvider};
use crate::registry::PositionRegistry;
use chrono::{Datelike, NaiveDate, Utc};
use log::{info, warn};
use serde_json::{json, Value};

/// The rebalance orchestrator: owns the position registry and audit log,
/// and drives the monthly decide-submit-record pass against the injected
/// collaborators.
pub struct Rebalancer {
    registry: PositionRegistry,
    audit: OrderLogger,
    market: Box<dyn MarketData>,
    executor: Box<dyn OrderExecutor>,
    targets: Box<dyn TargetProvider>,
    sell_signal: Box<dyn SellSignal>,
    mode: TradeMode,
}

impl Rebalancer {
    pub fn new(
        audit: OrderLogger,
        market: Box<dyn MarketData>,
        executor: Box<dyn OrderExecutor>,
        targets: Box<dyn TargetProvider>,
        sell_signal: Box<dyn SellSignal>,
        mode: TradeMode,
    ) -> Self {
        Self {
            registry: PositionRegistry::new(),
            audit,
            market,
            executor,
            targets,
            sell_signal,
            mode,
        }
    }

    pub fn mode(&self) -> TradeMode {
        self.mode
    }

    /// Current local view of open positions. Read-only, no brokerage
    /// reconciliation.
    pub fn status(&self) -> StatusSnapshot {
        self.registry.snapshot()
    }

    /// Records a caller-submitted buy: audit line + registry open. No broker
    /// call; the caller has already placed (or simulated) the order.
    pub fn submit_buy(&mut self, request: OrderRequest) -> Result<OrderRecord, EngineError> {
        self.submit(request, Side::Buy)
    }

    /// Records a caller-submitted sell: audit line + registry close (absent
    /// code is a no-op).
    pub fn submit_sell(&mut self, request: OrderRequest) -> Result<OrderRecord, EngineError> {
        self.submit(request, Side::Sell)
    }

    fn submit(&mut self, request: OrderRequest, side: Side) -> Result<OrderRecord, EngineError> {
        if request.code.trim().is_empty() {
            return Err(EngineError::InvalidRequest(
                "instrument code must be non-empty".into(),
            ));
        }

        let order = OrderRecord::from_request(request, side);
        self.audit.record(side, &order)?;
        self.apply(&order);
        info!("{} order logged for {} x{}", side, order.code, order.quantity);
        Ok(order)
    }

    /// One rebalance pass for `date` (first of the current month when not
    /// given). A target-provider failure aborts with zero orders placed;
    /// per-instrument price/order failures degrade and are recorded.
    pub async fn run_rebalance(
        &mut self,
        date: Option<NaiveDate>,
    ) -> Result<RunReport, EngineError> {
        let date = date.unwrap_or_else(current_month_start);
        let targets = self.targets.targets_for(date).await?;
        let mode_label = if self.mode.is_practice() { "practice" } else { "real" };
        info!(
            "rebalance run {} ({}): {} targets",
            date,
            mode_label,
            targets.stocks.len()
        );

        let mut details = Vec::new();

        for entry in &targets.stocks {
            let quantity = entry.weight.max(0.0) as u32;

            let current_price = match self.market.price(&entry.code).await {
                Ok(price) => price,
                Err(e) => {
                    // Conservative default: 0 never exceeds a positive
                    // target, so a dead quote feed cannot trigger a buy.
                    warn!("price lookup failed for {}: {}; using 0", entry.code, e);
                    0.0
                }
            };

            // Momentum rule: enter only once the market trades strictly
            // above the target price.
            if current_price > entry.target_price {
                let result = self.place(&entry.code, quantity, Side::Buy).await?;
                details.push(ReportEntry {
                    code: entry.code.clone(),
                    action: Side::Buy,
                    price: current_price,
                    result,
                });
            }

            // Checked independently of the buy branch; both may fire for
            // the same code in one pass.
            match self.sell_signal.should_sell(&entry.code).await {
                Ok(true) => {
                    let result = self.place(&entry.code, quantity, Side::Sell).await?;
                    details.push(ReportEntry {
                        code: entry.code.clone(),
                        action: Side::Sell,
                        price: current_price,
                        result,
                    });
                }
                Ok(false) => {}
                Err(e) => {
                    warn!("sell signal failed for {}: {}; holding", entry.code, e);
                }
            }
        }

        info!("rebalance run {} complete: {} actions", date, details.len());
        Ok(RunReport {
            message: "auto trade completed".into(),
            mode: self.mode,
            date,
            details,
        })
    }

    /// Submits one order and records it. The registry updates regardless of
    /// the executor outcome: it tracks intent, not confirmed fills.
    async fn place(&mut self, code: &str, quantity: u32, side: Side) -> Result<Value, EngineError> {
        let result = match self.executor.send_order(code, quantity, side).await {
            Ok(ack) => ack,
            Err(e) => {
                warn!("{} order failed for {}: {}", side, code, e);
                json!({ "status": "ERROR", "msg": e.to_string() })
            }
        };

        let order = OrderRecord::new(code, quantity, side);
        self.audit.record(side, &order)?;
        self.apply(&order);
        Ok(result)
    }

    fn apply(&mut self, order: &OrderRecord) {
        match order.side {
            Side::Buy => self.registry.open(order.clone()),
            Side::Sell => {
                self.registry.close(&order.code);
            }
        }
    }
}

fn current_month_start() -> NaiveDate {
    let today = Utc::now().date_naive();
    today.with_day(1).unwrap_or(today)
}

#[cfg(test)]
mod tests;
