use super::*;
use crate::error::ProviderError;
use crate::models::{TargetEntry, TargetList};
use crate::providers::mock::{MockExecutor, MockMarket, StaticSellSignal, StaticTargets};
use async_trait::async_trait;
use std::fs;
use tempfile::TempDir;

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
}

fn target(code: &str, weight: f64, target_price: f64) -> TargetEntry {
    TargetEntry {
        code: code.into(),
        weight,
        target_price,
    }
}

struct Harness {
    engine: Rebalancer,
    executor: MockExecutor,
    log_dir: TempDir,
}

fn harness(
    market: MockMarket,
    targets: StaticTargets,
    sell_signal: StaticSellSignal,
) -> Harness {
    let log_dir = tempfile::tempdir().unwrap();
    let executor = MockExecutor::new();
    let engine = Rebalancer::new(
        OrderLogger::new(log_dir.path()),
        Box::new(market),
        Box::new(executor.clone()),
        Box::new(targets),
        Box::new(sell_signal),
        TradeMode::Practice,
    );
    Harness {
        engine,
        executor,
        log_dir,
    }
}

fn audit_lines(log_dir: &TempDir, side: Side) -> Vec<String> {
    let path = OrderLogger::new(log_dir.path()).stream_path(side);
    match fs::read_to_string(path) {
        Ok(content) => content.lines().map(|l| l.to_string()).collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn buy_fires_when_market_trades_above_target() {
    let targets = StaticTargets::new()
        .with_list(run_date(), TargetList::new(vec![target("AAA", 10.0, 100.0)]));
    let market = MockMarket::new().with_price("AAA", 105.0);
    let mut h = harness(market, targets, StaticSellSignal::new());

    let report = h.engine.run_rebalance(Some(run_date())).await.unwrap();

    assert_eq!(report.details.len(), 1);
    let entry = &report.details[0];
    assert_eq!(entry.code, "AAA");
    assert_eq!(entry.action, Side::Buy);
    assert_eq!(entry.price, 105.0);
    assert_eq!(entry.result["rt_cd"], "0");

    assert_eq!(
        h.executor.calls(),
        vec![crate::providers::mock::RecordedOrder {
            code: "AAA".into(),
            quantity: 10,
            side: Side::Buy,
        }]
    );
    assert!(h.engine.status().open_positions.contains_key("AAA"));
    assert_eq!(audit_lines(&h.log_dir, Side::Buy).len(), 1);
}

#[tokio::test]
async fn equal_price_never_triggers_a_buy() {
    let targets = StaticTargets::new()
        .with_list(run_date(), TargetList::new(vec![target("AAA", 10.0, 100.0)]));
    let market = MockMarket::new().with_price("AAA", 100.0);
    let mut h = harness(market, targets, StaticSellSignal::new());

    let report = h.engine.run_rebalance(Some(run_date())).await.unwrap();

    assert!(report.details.is_empty());
    assert!(h.executor.calls().is_empty());
    assert!(h.engine.status().open_positions.is_empty());
    assert!(audit_lines(&h.log_dir, Side::Buy).is_empty());
}

#[tokio::test]
async fn market_data_failure_defaults_to_zero_and_buys_nothing() {
    let targets = StaticTargets::new()
        .with_list(run_date(), TargetList::new(vec![target("AAA", 10.0, 100.0)]));
    // No quote registered for AAA: the lookup fails and the price degrades
    // to 0, which can never exceed a positive target.
    let mut h = harness(MockMarket::new(), targets, StaticSellSignal::new());

    let report = h.engine.run_rebalance(Some(run_date())).await.unwrap();

    assert!(report.details.is_empty());
    assert!(h.executor.calls().is_empty());
}

#[tokio::test]
async fn sell_signal_closes_the_tracked_position() {
    let targets = StaticTargets::new()
        .with_list(run_date(), TargetList::new(vec![target("AAA", 10.0, 100.0)]));
    let market = MockMarket::new().with_price("AAA", 90.0);
    let sell = StaticSellSignal::new().with_code("AAA");
    let mut h = harness(market, targets, sell);

    h.engine
        .submit_buy(OrderRequest::new("AAA", 10))
        .unwrap();
    assert_eq!(h.engine.status().count, 1);

    let report = h.engine.run_rebalance(Some(run_date())).await.unwrap();

    assert_eq!(report.details.len(), 1);
    assert_eq!(report.details[0].action, Side::Sell);
    assert_eq!(report.details[0].price, 90.0);
    assert!(h.engine.status().open_positions.is_empty());
    assert_eq!(audit_lines(&h.log_dir, Side::Sell).len(), 1);
}

#[tokio::test]
async fn buy_and_sell_can_both_fire_for_one_code() {
    let targets = StaticTargets::new()
        .with_list(run_date(), TargetList::new(vec![target("AAA", 10.0, 100.0)]));
    let market = MockMarket::new().with_price("AAA", 105.0);
    let sell = StaticSellSignal::new().with_code("AAA");
    let mut h = harness(market, targets, sell);

    let report = h.engine.run_rebalance(Some(run_date())).await.unwrap();

    assert_eq!(report.details.len(), 2);
    assert_eq!(report.details[0].action, Side::Buy);
    assert_eq!(report.details[1].action, Side::Sell);
    // The buy opened the position and the sell in the same pass closed it.
    assert!(h.engine.status().open_positions.is_empty());
    assert_eq!(h.executor.calls().len(), 2);
}

#[tokio::test]
async fn target_provider_failure_aborts_with_no_side_effects() {
    let market = MockMarket::new().with_price("AAA", 105.0);
    let mut h = harness(market, StaticTargets::new(), StaticSellSignal::new());

    let err = h.engine.run_rebalance(Some(run_date())).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Provider(ProviderError::NoData(_))
    ));

    assert!(h.executor.calls().is_empty());
    assert!(h.engine.status().open_positions.is_empty());
    assert!(audit_lines(&h.log_dir, Side::Buy).is_empty());
    assert!(audit_lines(&h.log_dir, Side::Sell).is_empty());
}

#[tokio::test]
async fn executor_failure_is_recorded_and_the_run_continues() {
    let targets = StaticTargets::new().with_list(
        run_date(),
        TargetList::new(vec![
            target("AAA", 10.0, 100.0),
            target("BBB", 5.0, 50.0),
        ]),
    );
    let market = MockMarket::new()
        .with_price("AAA", 105.0)
        .with_price("BBB", 60.0);

    let log_dir = tempfile::tempdir().unwrap();
    let executor = MockExecutor::failing();
    let mut engine = Rebalancer::new(
        OrderLogger::new(log_dir.path()),
        Box::new(market),
        Box::new(executor.clone()),
        Box::new(targets),
        Box::new(StaticSellSignal::new()),
        TradeMode::Practice,
    );

    let report = engine.run_rebalance(Some(run_date())).await.unwrap();

    assert_eq!(report.details.len(), 2);
    for entry in &report.details {
        assert_eq!(entry.result["status"], "ERROR");
    }
    // Registry tracks intent: both buys are open despite failed submissions.
    assert_eq!(engine.status().count, 2);
    assert_eq!(executor.calls().len(), 2);
}

#[tokio::test]
async fn fractional_weights_truncate_to_whole_units() {
    let targets = StaticTargets::new()
        .with_list(run_date(), TargetList::new(vec![target("AAA", 10.9, 100.0)]));
    let market = MockMarket::new().with_price("AAA", 105.0);
    let mut h = harness(market, targets, StaticSellSignal::new());

    h.engine.run_rebalance(Some(run_date())).await.unwrap();
    assert_eq!(h.executor.calls()[0].quantity, 10);
}

struct BrokenSellSignal;

#[async_trait]
impl SellSignal for BrokenSellSignal {
    async fn should_sell(&self, _code: &str) -> Result<bool, ProviderError> {
        Err(ProviderError::Other("signal source offline".into()))
    }
}

#[tokio::test]
async fn sell_signal_failure_degrades_to_hold() {
    let targets = StaticTargets::new()
        .with_list(run_date(), TargetList::new(vec![target("AAA", 10.0, 100.0)]));
    let market = MockMarket::new().with_price("AAA", 90.0);

    let log_dir = tempfile::tempdir().unwrap();
    let executor = MockExecutor::new();
    let mut engine = Rebalancer::new(
        OrderLogger::new(log_dir.path()),
        Box::new(market),
        Box::new(executor.clone()),
        Box::new(targets),
        Box::new(BrokenSellSignal),
        TradeMode::Practice,
    );

    let report = engine.run_rebalance(Some(run_date())).await.unwrap();
    assert!(report.details.is_empty());
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn report_metadata_carries_mode_and_date() {
    let targets = StaticTargets::new()
        .with_list(run_date(), TargetList::new(vec![]));
    let mut h = harness(MockMarket::new(), targets, StaticSellSignal::new());

    let report = h.engine.run_rebalance(Some(run_date())).await.unwrap();
    assert_eq!(report.mode, TradeMode::Practice);
    assert_eq!(report.date, run_date());
    assert_eq!(report.message, "auto trade completed");
}

#[test]
fn submit_rejects_empty_code_before_any_mutation() {
    let log_dir = tempfile::tempdir().unwrap();
    let mut engine = Rebalancer::new(
        OrderLogger::new(log_dir.path()),
        Box::new(MockMarket::new()),
        Box::new(MockExecutor::new()),
        Box::new(StaticTargets::new()),
        Box::new(StaticSellSignal::new()),
        TradeMode::Practice,
    );

    let err = engine.submit_buy(OrderRequest::new("  ", 10)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidRequest(_)));
    assert!(engine.status().open_positions.is_empty());
    assert!(audit_lines(&log_dir, Side::Buy).is_empty());
}

#[test]
fn submit_buy_then_sell_round_trip() {
    let log_dir = tempfile::tempdir().unwrap();
    let mut engine = Rebalancer::new(
        OrderLogger::new(log_dir.path()),
        Box::new(MockMarket::new()),
        Box::new(MockExecutor::new()),
        Box::new(StaticTargets::new()),
        Box::new(StaticSellSignal::new()),
        TradeMode::Practice,
    );

    let mut request = OrderRequest::new("005930", 10);
    request
        .extra
        .insert("strategy".into(), serde_json::Value::String("rolling-k".into()));
    let order = engine.submit_buy(request).unwrap();
    assert_eq!(order.side, Side::Buy);
    assert_eq!(engine.status().count, 1);
    assert_eq!(
        engine.status().open_positions["005930"].order_data.extra["strategy"],
        "rolling-k"
    );

    engine.submit_sell(OrderRequest::new("005930", 10)).unwrap();
    assert_eq!(engine.status().count, 0);

    assert_eq!(audit_lines(&log_dir, Side::Buy).len(), 1);
    assert_eq!(audit_lines(&log_dir, Side::Sell).len(), 1);
}

#[test]
fn submit_sell_for_unknown_code_is_logged_but_harmless() {
    let log_dir = tempfile::tempdir().unwrap();
    let mut engine = Rebalancer::new(
        OrderLogger::new(log_dir.path()),
        Box::new(MockMarket::new()),
        Box::new(MockExecutor::new()),
        Box::new(StaticTargets::new()),
        Box::new(StaticSellSignal::new()),
        TradeMode::Practice,
    );

    engine.submit_sell(OrderRequest::new("UNKNOWN", 1)).unwrap();
    assert_eq!(engine.status().count, 0);
    assert_eq!(audit_lines(&log_dir, Side::Sell).len(), 1);
}
