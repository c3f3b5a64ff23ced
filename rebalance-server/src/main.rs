mod args;
mod schedule;

use args::Args;
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use kis_gateway::{KisClient, KisConfig};
use log::info;
use rebalance_engine::audit::OrderLogger;
use rebalance_engine::engine::Rebalancer;
use rebalance_engine::models::OrderRequest;
use schedule::FileSchedule;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

// One mutex over the whole engine: overlapping requests serialize on the
// position registry and audit log.
#[derive(Clone)]
struct AppState {
    engine: Arc<Mutex<Rebalancer>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    info!("=== Rebalance Server Starting ===");

    let config = KisConfig::from_env()?;
    let mode = config.mode;
    info!("broker environment: {:?}", mode);

    let client = KisClient::new(config);
    let schedule = FileSchedule::new(args.targets.clone());

    let engine = Rebalancer::new(
        OrderLogger::new(args.log_dir.clone()),
        Box::new(client.clone()),
        Box::new(client),
        Box::new(schedule.clone()),
        Box::new(schedule),
        mode,
    );
    let state = AppState {
        engine: Arc::new(Mutex::new(engine)),
    };

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/order/buy", post(buy_order))
        .route("/order/sell", post(sell_order))
        .route("/order/status", get(order_status))
        .route("/auto-trade/run", post(run_auto_trade))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", args.port);
    info!("Rebalance Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn buy_order(State(state): State<AppState>, Json(req): Json<OrderRequest>) -> impl IntoResponse {
    let mut engine = state.engine.lock().await;
    match engine.submit_buy(req) {
        Ok(order) => Json(json!({"message": "Buy order logged", "data": order})),
        Err(e) => Json(json!({"status": "ERROR", "msg": e.to_string()})),
    }
}

async fn sell_order(State(state): State<AppState>, Json(req): Json<OrderRequest>) -> impl IntoResponse {
    let mut engine = state.engine.lock().await;
    match engine.submit_sell(req) {
        Ok(order) => Json(json!({"message": "Sell order logged", "data": order})),
        Err(e) => Json(json!({"status": "ERROR", "msg": e.to_string()})),
    }
}

async fn order_status(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.lock().await;
    Json(json!(engine.status()))
}

async fn run_auto_trade(State(state): State<AppState>) -> impl IntoResponse {
    let mut engine = state.engine.lock().await;
    match engine.run_rebalance(None).await {
        Ok(report) => Json(json!(report)),
        Err(e) => Json(json!({"status": "ERROR", "msg": e.to_string()})),
    }
}
